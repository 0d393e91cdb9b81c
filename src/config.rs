use serde::Deserialize;

/// Number of dispatch permits held by an engine, the cap on concurrent
/// in-flight requests.
pub const WORKER_PERMITS: usize = 4;

/// Initial capacity of the per-request response accumulator (64 KiB).
pub const READ_BUFFER_BYTES: usize = 64 * 1024;

/// Maximum bytes accepted for a single response body (64 MB).
pub const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;

/// Maximum redirect depth before a request is failed.
pub const MAX_REDIRECTS: usize = 10;

/// Canonical base URL of the catalog API.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Top-level configuration for the request engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Concurrent in-flight request cap.
    pub worker_permits: usize,
    /// Redirect depth cap.
    pub max_redirects: usize,
    /// Per-response body size cap in bytes.
    pub max_response_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_permits: WORKER_PERMITS,
            max_redirects: MAX_REDIRECTS,
            max_response_bytes: MAX_RESPONSE_BYTES,
        }
    }
}
