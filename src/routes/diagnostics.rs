//! Diagnostic-only routes.
//!
//! These exist to exercise the error boundary from outside the process.
//! Disable them in any deployment that faces real traffic
//! (`--diagnostic-routes=false`).

use crate::error::Fault;
use crate::request::Request;
use crate::response::Response;
use crate::store::UserStore;

/// `GET /test/error`: always fails with an unhandled fault.
pub async fn fail(_req: Request, _store: UserStore) -> Result<Response, Fault> {
    Err(Fault::new("Test exception for middleware validation"))
}
