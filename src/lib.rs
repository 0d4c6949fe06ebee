//! Normalizing HTTP fetch client.
//!
//! Performs one request per call, decodes the body by its declared content
//! type (JSON or text) and turns non-2xx responses into a structured
//! [`HttpError`].
//!
//! ```rust,no_run
//! use fetch_client::{ClientConfig, FetchClient, FetchError};
//!
//! # async fn run() -> Result<(), FetchError> {
//! let config = ClientConfig {
//!     base_url: Some("http://localhost:3000".into()),
//!     ..Default::default()
//! };
//! let client = FetchClient::from_config(&config)?;
//!
//! match client.get("/api/items/99").await {
//!     Ok(payload) => println!("{:?}", payload),
//!     Err(FetchError::Http(record)) => eprintln!("{} ({})", record.message(), record.url()),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod observability;

pub use config::ClientConfig;
pub use error::{FetchError, FetchResult, HttpError, TransportError};
pub use http::{FetchClient, Payload, RequestOptions, Transport};
