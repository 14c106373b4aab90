//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the place for
//! cross-cutting concerns. Every request walks an ordered list of layers,
//! outermost first, and ends at an [`Endpoint`] (the router). Responses
//! travel back through the same layers in reverse:
//!
//! ```text
//! request ─► ErrorBoundary ─► Authenticator ─► RequestLogger ─► Router
//! response ◄──────────────────────────────────────────────────────┘
//! ```
//!
//! A layer may short-circuit by returning without calling [`Next::run`]; the
//! authenticator does this for bad credentials.
//!
//! Built-in middleware:
//! - [`ErrorBoundary`]: recovers faults and panics as a generic `500`
//! - [`Authenticator`]: bearer-credential shape check with exempt paths
//! - [`RequestLogger`]: per-request log records with method, path, status, latency

mod auth;
mod error_boundary;
mod logger;

use std::sync::Arc;

use tracing::error;

use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

pub use auth::Authenticator;
pub use error_boundary::ErrorBoundary;
pub use logger::RequestLogger;

/// A pipeline stage that wraps everything after it.
pub trait Middleware: Send + Sync + 'static {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome>;
}

/// The innermost stage of a pipeline, reached after every layer has run.
pub trait Endpoint: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture<'_, Outcome>;
}

/// The remainder of the pipeline, as seen from one layer.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Middleware>],
    endpoint: &'a dyn Endpoint,
}

impl<'a> Next<'a> {
    /// Hands `req` to the next layer, or to the endpoint after the last one.
    pub fn run(self, req: Request) -> BoxFuture<'a, Outcome> {
        match self.rest.split_first() {
            Some((layer, rest)) => layer.handle(req, Next { rest, endpoint: self.endpoint }),
            None => self.endpoint.call(req),
        }
    }
}

/// A fixed, ordered chain of middleware in front of an endpoint.
///
/// Layers are added outermost first and cannot be reordered once composed.
pub struct Pipeline {
    layers: Vec<Arc<dyn Middleware>>,
    endpoint: Box<dyn Endpoint>,
}

impl Pipeline {
    pub fn new(endpoint: impl Endpoint) -> Self {
        Self { layers: Vec::new(), endpoint: Box::new(endpoint) }
    }

    /// Appends `layer` inside every layer added before it.
    pub fn layer(mut self, layer: impl Middleware) -> Self {
        self.layers.push(Arc::new(layer));
        self
    }

    /// Runs `req` through every layer and the endpoint.
    ///
    /// Never fails. A fault that escapes the chain, which only happens when
    /// no [`ErrorBoundary`] was layered in, becomes a bare `500`.
    pub async fn call(&self, req: Request) -> Response {
        let next = Next { rest: &self.layers, endpoint: self.endpoint.as_ref() };
        match next.run(req).await {
            Ok(res) => res,
            Err(fault) => {
                error!(error = %fault, detail = ?fault, "fault escaped the pipeline");
                Response::status(Status::InternalServerError)
            }
        }
    }
}
