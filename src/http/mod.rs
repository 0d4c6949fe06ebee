//! HTTP request/response normalization.
//!
//! # Data Flow
//! ```text
//! caller
//!     → request.rs (RequestOptions, header merge)
//!     → transport.rs (one round trip, buffered RawResponse)
//!     → response.rs (content-type detection, decode to Payload)
//!     → client.rs (status branch → Payload or HttpError)
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod transport;

pub use client::FetchClient;
pub use request::{RequestOptions, TransportRequest};
pub use response::{Payload, RawResponse};
pub use transport::{ReqwestTransport, Transport};
