//! Response normalizer.
//!
//! # Flow
//! ```text
//! address + RequestOptions
//!     → merge with default headers
//!     → Transport::send (exactly one round trip)
//!     → RawResponse::decode (JSON if Content-Type contains the marker, else text)
//!     → 2xx: Ok(Payload)
//!     → otherwise: Err(FetchError::Http(HttpError { status, data, url, .. }))
//! ```
//!
//! # Design Decisions
//! - Decoding happens once, before the status branch, so the error record carries
//!   the same value the success path would have returned
//! - A malformed JSON body is reported as `FetchError::Decode` regardless of status
//! - No retries, no caching, no shared mutable state between calls

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::validation::ValidationError;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{FetchError, FetchResult, HttpError};
use crate::http::request::{default_headers, merge_headers, RequestOptions, TransportRequest};
use crate::http::response::Payload;
use crate::http::transport::{ReqwestTransport, Transport};

/// Client that performs normalized requests over an injected transport.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    defaults: HeaderMap,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a client over any transport, using the standard default headers.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            defaults: default_headers(),
        }
    }

    /// Build a `reqwest`-backed client from configuration.
    ///
    /// Extra `default_headers` from the config are layered over the standard
    /// `Content-Type` default using the same merge rule as per-call headers.
    pub fn from_config(config: &ClientConfig) -> FetchResult<Self> {
        let transport = ReqwestTransport::from_config(config)?;

        let mut extra = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::from(ValidationError::InvalidHeaderName(name.clone())))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::from(ValidationError::InvalidHeaderValue(name.clone())))?;
            extra.append(header, value);
        }

        let mut client = Self::new(transport);
        client.defaults = merge_headers(&client.defaults, &extra);
        Ok(client)
    }

    /// Headers applied to every request before caller overrides.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.defaults
    }

    /// Perform one request and return the decoded payload.
    pub async fn request(&self, address: &str, options: RequestOptions) -> FetchResult<Payload> {
        let request_id = Uuid::new_v4();
        let request = TransportRequest::build(address, &self.defaults, options);

        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            url = %address,
            "Sending request"
        );

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!(request_id = %request_id, error = %e, "Transport failed");
            e
        })?;

        let data = response.decode().map_err(|e| {
            tracing::debug!(
                request_id = %request_id,
                status = response.status.as_u16(),
                error = %e,
                "Failed to decode structured body"
            );
            e
        })?;

        if !response.status.is_success() {
            tracing::debug!(
                request_id = %request_id,
                status = response.status.as_u16(),
                url = %address,
                "Request failed with non-success status"
            );
            return Err(HttpError::new(
                response.status.as_u16(),
                response.status_text,
                data,
                address,
            )
            .into());
        }

        tracing::debug!(
            request_id = %request_id,
            status = response.status.as_u16(),
            structured = matches!(data, Payload::Json(_)),
            "Request completed"
        );
        Ok(data)
    }

    /// Perform one request and convert the payload into `T`.
    ///
    /// Non-2xx responses still fail with [`FetchError::Http`]; a payload that
    /// does not fit `T` fails with [`FetchError::Validation`].
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        address: &str,
        options: RequestOptions,
    ) -> FetchResult<T> {
        let payload = self.request(address, options).await?;
        payload.parse().map_err(|e| FetchError::Validation {
            target: std::any::type_name::<T>(),
            reason: e.to_string(),
        })
    }

    /// `GET` with no extra options.
    pub async fn get(&self, address: &str) -> FetchResult<Payload> {
        self.request(address, RequestOptions::default()).await
    }
}
