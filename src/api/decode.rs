// Typed decode layer — translates raw outcomes into records or the error
// taxonomy. Decode failures are only ever produced after a successful
// transport/status outcome.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::detect::image::{detect_image, DecodedImage, ImageFormat};
use crate::engine::collector::ResponseOutcome;
use crate::error::{Error, Result};

/// Decode a success body into `T`. A schema mismatch never surfaces a
/// partially populated value.
pub fn decode_as<T: DeserializeOwned>(outcome: ResponseOutcome) -> Result<T> {
    let body = into_body(outcome)?;
    serde_json::from_slice(&body).map_err(|e| Error::MalformedPayload {
        detail: e.to_string(),
    })
}

/// Decode a success body as an encoded image, sniffing the format from its
/// leading magic bytes.
pub fn decode_image(outcome: ResponseOutcome) -> Result<DecodedImage> {
    let body = into_body(outcome)?;
    match detect_image(&body) {
        ImageFormat::Unknown => Err(Error::MalformedPayload {
            detail: "unrecognized image signature".to_string(),
        }),
        format => Ok(DecodedImage {
            format,
            bytes: body,
        }),
    }
}

fn into_body(outcome: ResponseOutcome) -> Result<Bytes> {
    match outcome {
        ResponseOutcome::Success { body } => Ok(body),
        ResponseOutcome::Failure { status: None, .. } => Err(Error::Transport {
            detail: "no response received".to_string(),
        }),
        ResponseOutcome::Failure {
            status: Some(status),
            body,
        } => Err(Error::HttpStatus {
            status,
            body: body.unwrap_or_default(),
        }),
    }
}
