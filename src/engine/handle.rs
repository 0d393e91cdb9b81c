// Engine lifecycle — one shared HTTP client plus a fixed pool of dispatch
// permits, with a test-payload substitution path that skips the network.

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::{header, redirect, Client};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::collector::{self, ResponseOutcome};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::request::descriptor::{Method, RequestDescriptor};

static SHARED: RwLock<Option<Arc<Engine>>> = RwLock::new(None);

/// Idempotent process-wide setup: returns the already-installed engine, or
/// constructs one from `config` and installs it. Double-checked under the
/// write lock, so a concurrent first-call race constructs exactly one engine.
pub fn initialize(config: EngineConfig) -> Result<Arc<Engine>> {
    if let Some(engine) = SHARED.read().as_ref() {
        return Ok(Arc::clone(engine));
    }
    let mut slot = SHARED.write();
    if let Some(engine) = slot.as_ref() {
        return Ok(Arc::clone(engine));
    }
    let engine = Arc::new(Engine::new(config)?);
    *slot = Some(Arc::clone(&engine));
    Ok(engine)
}

/// Unconditionally replace the shared engine with one that satisfies every
/// request from `payload` without any network activity.
pub fn initialize_for_test(payload: impl Into<Bytes>) -> Arc<Engine> {
    let engine = Arc::new(Engine::with_test_payload(payload));
    *SHARED.write() = Some(Arc::clone(&engine));
    engine
}

/// The installed engine, or `Error::NotInitialized`.
pub fn shared() -> Result<Arc<Engine>> {
    SHARED
        .read()
        .as_ref()
        .map(Arc::clone)
        .ok_or(Error::NotInitialized)
}

/// Owns the network client and the dispatch permits. Engines are cheap to
/// share behind an `Arc` and are usually constructed once at startup and
/// injected into every component that issues requests.
pub struct Engine {
    client: Client,
    permits: Semaphore,
    max_response_bytes: usize,
    test_payload: Option<Bytes>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| Error::Transport {
                detail: e.to_string(),
            })?;
        Ok(Self {
            client,
            permits: Semaphore::new(config.worker_permits),
            max_response_bytes: config.max_response_bytes,
            test_payload: None,
        })
    }

    /// An engine whose dispatch resolves synchronously to `payload`,
    /// regardless of method or URL.
    pub fn with_test_payload(payload: impl Into<Bytes>) -> Self {
        let config = EngineConfig::default();
        Self {
            client: Client::new(),
            permits: Semaphore::new(config.worker_permits),
            max_response_bytes: config.max_response_bytes,
            test_payload: Some(payload.into()),
        }
    }

    /// Execute one request to its terminal outcome. Exactly one outcome is
    /// produced per call; nothing is retried, and there is no cancellation.
    /// A caller with no further interest simply drops the future.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<ResponseOutcome> {
        // The test payload short-circuits before URL validation and before a
        // permit is taken: test-mode dispatch is fully synchronous.
        if let Some(payload) = &self.test_payload {
            return Ok(ResponseOutcome::Success {
                body: payload.clone(),
            });
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Error::Transport {
                detail: e.to_string(),
            })?;

        let url = descriptor.build_url()?;
        debug!("dispatch {} {}", descriptor.method().as_str(), url);

        let mut request = match descriptor.method() {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };

        for (name, value) in descriptor.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = descriptor.encoding().content_type() {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if descriptor.cache_bypass() {
            request = request.header(header::CACHE_CONTROL, "no-cache");
        }
        if descriptor.method() == Method::Post {
            if let Some(body) = descriptor.upload_payload() {
                request = request.body(body);
            }
        }

        match request.send().await {
            Ok(response) => collector::collect(response, self.max_response_bytes).await,
            Err(e) => {
                warn!("request to {} failed with no response: {}", url, e);
                Ok(ResponseOutcome::Failure {
                    status: None,
                    body: None,
                })
            }
        }
    }
}
