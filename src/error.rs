//! Error types.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - [`Error`] is an infrastructure failure: binding the listener, reading the
//!   socket. It is returned from [`Server`](crate::Server) and ends the process.
//! - [`Fault`] is an unhandled failure inside the request pipeline. It never
//!   reaches the transport; the
//!   [`ErrorBoundary`](crate::middleware::ErrorBoundary) turns it into a
//!   generic `500`.
//!
//! Lookup misses, bad ids and malformed payloads are neither. Handlers answer
//! them with a plain [`Response`](crate::Response).

/// The error type returned by rollcall's fallible server operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An unhandled fault raised somewhere downstream of the error boundary.
///
/// The message and source chain are logged in full; none of it is ever
/// written to a response body.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), source: None }
    }

    /// Wraps an underlying error, keeping it as the `source()` of the fault.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self { message: message.into(), source: Some(source.into()) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for Fault {
    fn from(e: serde_json::Error) -> Self {
        Self::with_source("json serialization failed", e)
    }
}
