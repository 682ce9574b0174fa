//! Authenticated HTTP client for the ESG backend.
//!
//! - transport.rs: request/response types and the `Transport` seam (gloo-net in the browser)
//! - error.rs: `ApiError` classification and its mapping to UI outcomes
//! - single_flight.rs: coalescing of concurrent token refreshes
//! - client.rs: `ApiClient`, bearer attachment and refresh-then-retry-once

pub mod client;
pub mod error;
pub mod single_flight;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use error::{ApiError, ErrorOutcome};
pub use transport::{GlooTransport, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
