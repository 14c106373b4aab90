//! Bearer-credential gate.
//!
//! This is a shape check, not verification: a credential passes when the
//! `Authorization` value is `Bearer ` followed by at least one character.
//! No signature, issuer or expiry is looked at.

use tracing::warn;

use super::{Middleware, Next};
use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const AUTHORIZATION: &str = "authorization";
const BEARER_PREFIX: &str = "Bearer ";
const UNAUTHORIZED_BODY: &[u8] = br#"{"error":"Unauthorized. Valid token required."}"#;

/// Documentation surfaces that never require a credential.
const DEFAULT_EXEMPT_PREFIXES: [&str; 2] = ["/openapi", "/swagger"];

#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    Missing,
    Invalid,
}

/// Rejects requests to protected paths that lack a bearer credential.
///
/// Exempt paths are the root `/` and anything under one of the exempt
/// prefixes. Prefixes match whole path segments, ignoring ASCII case, so
/// `/swagger/v1/swagger.json` is exempt and `/swaggerish` is not.
#[derive(Debug, Clone)]
pub struct Authenticator {
    exempt_prefixes: Vec<String>,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::with_exempt_prefixes(DEFAULT_EXEMPT_PREFIXES)
    }

    pub fn with_exempt_prefixes<I, P>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self { exempt_prefixes: prefixes.into_iter().map(Into::into).collect() }
    }

    fn is_exempt(&self, path: &str) -> bool {
        path == "/" || self.exempt_prefixes.iter().any(|p| starts_with_segments(path, p))
    }

    fn check(&self, req: &Request) -> Result<(), Rejection> {
        if !req.has_header(AUTHORIZATION) {
            return Err(Rejection::Missing);
        }
        match req.header(AUTHORIZATION) {
            Some(value) if is_well_formed(value) => Ok(()),
            _ => Err(Rejection::Invalid),
        }
    }
}

impl Default for Authenticator {
    fn default() -> Self { Self::new() }
}

impl Middleware for Authenticator {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        if self.is_exempt(req.path()) {
            return next.run(req);
        }

        match self.check(&req) {
            Ok(()) => next.run(req),
            Err(rejection) => {
                match rejection {
                    Rejection::Missing => {
                        warn!(path = %req.path(), "request missing Authorization header");
                    }
                    Rejection::Invalid => warn!(path = %req.path(), "invalid token provided"),
                }
                Box::pin(async { Ok(unauthorized()) })
            }
        }
    }
}

fn unauthorized() -> Response {
    Response::builder()
        .status(Status::Unauthorized)
        .json(UNAUTHORIZED_BODY.to_vec())
}

fn is_well_formed(value: &str) -> bool {
    value.starts_with(BEARER_PREFIX) && value.len() > BEARER_PREFIX.len()
}

/// `true` when `path` equals `prefix` or continues it with a `/`.
fn starts_with_segments(path: &str, prefix: &str) -> bool {
    match path.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => {
            matches!(path.as_bytes().get(prefix.len()), None | Some(b'/'))
        }
        _ => false,
    }
}
