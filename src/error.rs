//! Error taxonomy for normalized requests.
//!
//! # Kinds
//! - `Transport`: the transport primitive failed (connect, DNS, timeout, body read).
//! - `Decode`: a structured content type was declared but the body is not valid JSON.
//! - `Http`: the response completed with a non-2xx status. Carries the [`HttpError`] record.
//! - `Validation`: a decoded payload could not be converted into the caller's type.
//! - `Config`: the client could not be built from its configuration.
//!
//! # Design Decisions
//! - Transport and decode failures are wrapped without modification; the original
//!   error stays reachable through `source()`.
//! - Only non-2xx statuses produce an `HttpError`.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::http::response::Payload;

/// Errors raised by the transport primitive.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The address could not be turned into an absolute URL.
    #[error("invalid address `{address}`: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// Any other failure reported by a custom transport.
    #[error("{0}")]
    Other(String),
}

/// The error record produced for non-2xx responses.
///
/// `data` holds the body decoded with the same content-type rule the success
/// path uses, so callers can inspect structured error payloads directly.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename = "http_error")]
#[error("{message}")]
pub struct HttpError {
    message: String,
    status: u16,
    status_text: String,
    data: Payload,
    url: String,
}

impl HttpError {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        data: Payload,
        url: impl Into<String>,
    ) -> Self {
        let status_text = status_text.into();
        Self {
            message: format!("Fetch error: {} {}", status, status_text),
            status,
            status_text,
            data,
            url: url.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The decoded response body.
    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// The address exactly as the caller supplied it.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_data(self) -> Payload {
        self.data
    }
}

/// Errors that can occur while performing a normalized request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to decode JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// Typed conversion failed after a successful response.
    #[error("response does not match `{target}`: {reason}")]
    Validation { target: &'static str, reason: String },

    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),
}

impl FetchError {
    /// The error record, if this failure came from a non-2xx status.
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            FetchError::Http(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        self.as_http().map(HttpError::status)
    }
}

/// Result type for normalized requests.
pub type FetchResult<T> = Result<T, FetchError>;
