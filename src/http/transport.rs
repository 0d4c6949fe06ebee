//! Transport primitive.
//!
//! # Responsibilities
//! - Define the capability a [`FetchClient`](super::client::FetchClient) uses to
//!   perform one network round trip
//! - Provide the production implementation on top of `reqwest`
//!
//! # Design Decisions
//! - The transport returns a fully buffered [`RawResponse`]; streaming is not supported
//! - Transports never inspect status codes; normalization belongs to the client
//! - Relative addresses are resolved against the configured base URL
//! - Status text is the reason phrase the server sent, falling back to the
//!   canonical phrase, then to an empty string

use std::time::Duration;

use futures_util::future::BoxFuture;
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::{ClientConfig, ConfigError};
use crate::error::{FetchResult, TransportError};
use crate::http::request::TransportRequest;
use crate::http::response::RawResponse;

/// A capability that performs exactly one HTTP round trip.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    ///
    /// The configuration is validated first; problems surface as
    /// [`FetchError::Config`](crate::error::FetchError::Config).
    pub fn from_config(config: &ClientConfig) -> FetchResult<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let mut headers = HeaderMap::new();
        if let Some(agent) = &config.user_agent {
            let value = HeaderValue::from_str(agent)
                .map_err(|_| ConfigError::from(ValidationError::InvalidUserAgent))?;
            headers.insert(USER_AGENT, value);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs));
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(TransportError::from)?;

        let base_url = config
            .base_url
            .as_deref()
            .map(|base| {
                Url::parse(base)
                    .map_err(|_| ConfigError::from(ValidationError::InvalidBaseUrl(base.to_string())))
            })
            .transpose()?;

        Ok(Self { client, base_url })
    }

    /// Wrap an existing `reqwest::Client` (e.g. for custom TLS).
    pub fn with_client(client: reqwest::Client, base_url: Option<Url>) -> Self {
        Self { client, base_url }
    }

    /// Resolve an address into an absolute URL.
    pub fn resolve(&self, address: &str) -> Result<Url, TransportError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(address),
            None => Url::parse(address),
        };
        resolved.map_err(|source| TransportError::InvalidAddress {
            address: address.to_string(),
            source,
        })
    }

    async fn execute(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
        let url = self.resolve(&request.address)?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let url = response.url().to_string();
        let status = response.status();
        let status_text = match response.extensions().get::<ReasonPhrase>() {
            Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        };
        let headers = response.headers().clone();

        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            url,
            status,
            status_text,
            headers,
            body,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<RawResponse, TransportError>> {
        Box::pin(self.execute(request))
    }
}
