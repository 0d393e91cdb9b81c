// Immutable description of one outbound request.

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;
use url::Url;

use super::encoding::{render_value, UploadEncoding};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// The fully specified representation of one outbound request. Built with
/// the consuming methods below, then dispatched unchanged.
///
/// Parameters keep their insertion order; a null-valued parameter is dropped
/// from both query string and upload body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    params: Vec<(String, Value)>,
    encoding: UploadEncoding,
    raw_body: Option<Bytes>,
    cache_bypass: bool,
}

impl RequestDescriptor {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            params: Vec::new(),
            encoding: UploadEncoding::Json,
            raw_body: None,
            cache_bypass: false,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_encoding(mut self, encoding: UploadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Attach caller-supplied payload bytes and switch to raw encoding.
    pub fn raw_body(mut self, body: impl Into<Bytes>) -> Self {
        self.raw_body = Some(body.into());
        self.encoding = UploadEncoding::Raw;
        self
    }

    /// Skip any intermediary response cache for this request.
    pub fn bypass_cache(mut self) -> Self {
        self.cache_bypass = true;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn encoding(&self) -> UploadEncoding {
        self.encoding
    }

    pub fn cache_bypass(&self) -> bool {
        self.cache_bypass
    }

    /// Final request URL. Read requests with at least one non-null parameter
    /// get a percent-encoded query string appended in insertion order; write
    /// requests never mutate the URL.
    pub fn build_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if self.method == Method::Get {
            let live: Vec<_> = self
                .params
                .iter()
                .filter(|(_, value)| !value.is_null())
                .collect();
            if !live.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (name, value) in live {
                    pairs.append_pair(name, &render_value(value));
                }
            }
        }
        Ok(url)
    }

    /// Upload payload for write requests, per the chosen encoding.
    pub fn upload_payload(&self) -> Option<Bytes> {
        self.encoding.payload(&self.params, self.raw_body.as_ref())
    }
}
