// Typed REST client — verbs over the fixed resource kinds. Each verb accepts
// either the canonical collection URL or an arbitrary absolute URL, which is
// how pagination cursors and cross-resource references are followed.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::decode;
use super::types::{Character, Episode, Location, Page};
use crate::config::DEFAULT_BASE_URL;
use crate::detect::image::DecodedImage;
use crate::engine::handle::{self, Engine};
use crate::error::Result;
use crate::request::descriptor::RequestDescriptor;
use crate::request::encoding::UploadEncoding;

/// Client over an injected engine handle. Cheap to clone; every clone shares
/// the same engine.
#[derive(Clone)]
pub struct ApiClient {
    engine: Arc<Engine>,
    base_url: String,
}

impl ApiClient {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Client over the process-wide installed engine, or `NotInitialized`
    /// when setup has not happened yet.
    pub fn shared() -> Result<Self> {
        handle::shared().map(Self::new)
    }

    /// Point the canonical collection URLs somewhere else. Integration tests
    /// aim this at a local mock upstream.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// One page of characters: the canonical first page when `page` is
    /// `None`, otherwise the exact cursor URL.
    pub async fn characters(&self, page: Option<&str>) -> Result<Page<Character>> {
        self.fetch(&self.collection_url("character", page)).await
    }

    /// A single character by its absolute URL.
    pub async fn character(&self, url: &str) -> Result<Character> {
        self.fetch(url).await
    }

    pub async fn locations(&self, page: Option<&str>) -> Result<Page<Location>> {
        self.fetch(&self.collection_url("location", page)).await
    }

    pub async fn location(&self, url: &str) -> Result<Location> {
        self.fetch(url).await
    }

    pub async fn episodes(&self, page: Option<&str>) -> Result<Page<Episode>> {
        self.fetch(&self.collection_url("episode", page)).await
    }

    pub async fn episode(&self, url: &str) -> Result<Episode> {
        self.fetch(url).await
    }

    /// Fetch raw image bytes. Image requests always skip intermediary
    /// response caches.
    pub async fn image(&self, url: &str) -> Result<DecodedImage> {
        let descriptor = RequestDescriptor::get(url)
            .with_encoding(UploadEncoding::Raw)
            .bypass_cache();
        let outcome = self.engine.execute(&descriptor).await?;
        decode::decode_image(outcome)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let descriptor = RequestDescriptor::get(url);
        let outcome = self.engine.execute(&descriptor).await?;
        decode::decode_as(outcome)
    }

    fn collection_url(&self, path: &str, page: Option<&str>) -> String {
        match page {
            Some(url) => url.to_string(),
            None => format!("{}/{}", self.base_url, path),
        }
    }
}
