// Streaming response collector — drives the read loop and classifies the
// terminal state of one request.

use bytes::{Bytes, BytesMut};
use reqwest::Response;
use tracing::{debug, warn};

use crate::config::READ_BUFFER_BYTES;
use crate::error::{Error, Result};

/// Terminal outcome of one request. Exactly one of these is produced per
/// dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The response completed with status 200.
    Success { body: Bytes },
    /// Any other status. `status: None` marks a transport failure where no
    /// HTTP response was obtained at all.
    Failure {
        status: Option<u16>,
        body: Option<Bytes>,
    },
}

/// Per-request accumulator. Appends arrive in stream order; growing past the
/// limit aborts the request.
pub(crate) struct BodyCollector {
    buf: BytesMut,
    limit: usize,
}

impl BodyCollector {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(READ_BUFFER_BYTES.min(limit)),
            limit,
        }
    }

    pub(crate) fn append(&mut self, chunk: &[u8]) -> Result<()> {
        if self.buf.len() + chunk.len() > self.limit {
            return Err(Error::BufferOverflow { limit: self.limit });
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Classify the finished stream: exactly 200 is success, anything else
    /// keeps the body as a diagnostic payload.
    pub(crate) fn finish(self, status: u16) -> ResponseOutcome {
        let body = self.buf.freeze();
        if status == 200 {
            ResponseOutcome::Success { body }
        } else {
            ResponseOutcome::Failure {
                status: Some(status),
                body: Some(body),
            }
        }
    }
}

/// Accumulate the whole body of `response`, then classify by status. A break
/// in the stream mid-read is reported as a transport failure carrying no
/// status, matching a request that never got a response.
pub(crate) async fn collect(mut response: Response, limit: usize) -> Result<ResponseOutcome> {
    let status = response.status().as_u16();
    let mut collector = BodyCollector::new(limit);

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => collector.append(&chunk)?,
            Ok(None) => break,
            Err(e) => {
                warn!("response stream broke mid-read: {}", e);
                return Ok(ResponseOutcome::Failure {
                    status: None,
                    body: None,
                });
            }
        }
    }

    debug!("collected {} bytes, status {}", collector.buf.len(), status);
    Ok(collector.finish(status))
}
