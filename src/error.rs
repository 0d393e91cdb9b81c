// Error taxonomy for the request pipeline and the typed decode layer.

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The shared engine was accessed before setup.
    #[error("engine is not initialized, call engine::initialize first")]
    NotInitialized,

    /// The descriptor's target URL failed to parse. Surfaced before any
    /// network activity.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No HTTP response was obtained at all.
    #[error("connection failed: {detail}")]
    Transport { detail: String },

    /// A response arrived, but its status was not 200. The body is carried
    /// verbatim, since servers return diagnostic payloads on error.
    #[error("unexpected http status {status}")]
    HttpStatus { status: u16, body: Bytes },

    /// The response body outgrew the local accumulation limit. Fatal for the
    /// request, never retried.
    #[error("response body exceeded {limit} bytes")]
    BufferOverflow { limit: usize },

    /// A 200 response whose body failed schema or image decode.
    #[error("malformed payload: {detail}")]
    MalformedPayload { detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
