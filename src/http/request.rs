//! Request description and header merging.
//!
//! # Responsibilities
//! - Collect per-call transport options (method, headers, body)
//! - Merge caller headers over the client's defaults
//! - Produce the [`TransportRequest`] handed to a transport
//!
//! # Design Decisions
//! - Header names compare case-insensitively (they are `HeaderName`s)
//! - A caller header replaces every default value with the same name;
//!   multiple caller values for one name are all kept

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

/// Content type asserted by default on every request.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// The default header set: `Content-Type: application/json`.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers
}

/// Merge caller headers over defaults.
///
/// Colliding names take the caller's values; the rest are added.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// Optional transport options for a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set a header, replacing any earlier value for the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as JSON and use it as the body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(self)
    }
}

/// A fully merged request, ready for a transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// The address as supplied by the caller (may be relative).
    pub address: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    pub fn build(address: &str, defaults: &HeaderMap, options: RequestOptions) -> Self {
        Self {
            address: address.to_string(),
            method: options.method,
            headers: merge_headers(defaults, &options.headers),
            body: options.body,
        }
    }
}
