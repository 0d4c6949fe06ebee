//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::client (debug events with request_id, method, url, status)
//!     → tracing subscriber installed by logging.rs
//!     → stderr
//! ```
//!
//! The library only emits events; installing a subscriber is left to the binary.

pub mod logging;
