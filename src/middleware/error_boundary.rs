//! Outermost layer: turns every unhandled fault into a generic `500`.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::error;

use super::{Middleware, Next};
use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const INTERNAL_ERROR_BODY: &[u8] = br#"{"error":"Internal server error."}"#;

/// Recovers faults raised anywhere downstream.
///
/// Both kinds are caught: a returned [`Fault`](crate::Fault) and a panic
/// while polling the rest of the pipeline. The full detail goes to the log at
/// error level; the caller only ever sees `{"error": "Internal server error."}`.
/// Whatever the downstream had built is discarded. On success this layer
/// passes the response through untouched.
///
/// It must be the first layer so faults in the authenticator and the request
/// logger are caught as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBoundary;

impl Middleware for ErrorBoundary {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        let method = req.method();
        let path = req.path().to_owned();

        Box::pin(async move {
            match AssertUnwindSafe(next.run(req)).catch_unwind().await {
                Ok(Ok(res)) => Ok(res),
                Ok(Err(fault)) => {
                    error!(%method, %path, error = %fault, detail = ?fault, "an unhandled fault occurred");
                    Ok(internal_error())
                }
                Err(payload) => {
                    error!(%method, %path, panic = panic_message(payload.as_ref()), "a handler panicked");
                    Ok(internal_error())
                }
            }
        })
    }
}

fn internal_error() -> Response {
    Response::builder()
        .status(Status::InternalServerError)
        .json(INTERNAL_ERROR_BODY.to_vec())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload.downcast_ref::<&'static str>().copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fault;
    use crate::method::Method;
    use crate::middleware::{Endpoint, Pipeline};
    use crate::request::test_support::request;
    use crate::telemetry::capture::Captured;

    enum Behaviour {
        Succeed,
        Fail,
        Panic,
    }

    impl Endpoint for Behaviour {
        fn call(&self, _req: Request) -> BoxFuture<'_, Outcome> {
            Box::pin(async move {
                match self {
                    Self::Succeed => Ok(Response::builder()
                        .status(Status::Created)
                        .header("location", "/users/1")
                        .json(b"{}".to_vec())),
                    Self::Fail => Err(Fault::new("downstream broke")),
                    Self::Panic => panic!("downstream panicked"),
                }
            })
        }
    }

    async fn run(endpoint: Behaviour) -> Response {
        Pipeline::new(endpoint)
            .layer(ErrorBoundary)
            .call(request(Method::Get, "/users", &[], ""))
            .await
    }

    #[tokio::test]
    async fn transparent_on_success() {
        let res = run(Behaviour::Succeed).await;
        assert_eq!(res.status_code(), 201);
        assert_eq!(res.header("location"), Some("/users/1"));
        assert_eq!(res.body(), b"{}");
    }

    #[tokio::test]
    async fn returned_fault_becomes_generic_500() {
        let res = run(Behaviour::Fail).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.body(), INTERNAL_ERROR_BODY);
    }

    #[tokio::test]
    async fn panic_becomes_generic_500() {
        let res = run(Behaviour::Panic).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), INTERNAL_ERROR_BODY);
        assert!(res.header("location").is_none());
    }

    #[tokio::test]
    async fn fault_is_logged_at_error_level() {
        let (logs, _guard) = Captured::install();
        run(Behaviour::Fail).await;

        let record = logs.find("an unhandled fault occurred").expect("fault record");
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["fields"]["method"], "GET");
        assert_eq!(record["fields"]["path"], "/users");
        assert_eq!(record["fields"]["error"], "downstream broke");
    }

    #[tokio::test]
    async fn panic_is_logged_with_its_message() {
        let (logs, _guard) = Captured::install();
        run(Behaviour::Panic).await;

        let record = logs.find("a handler panicked").expect("panic record");
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["fields"]["path"], "/users");
        assert_eq!(record["fields"]["panic"], "downstream panicked");
    }

    #[tokio::test]
    async fn success_logs_nothing() {
        let (logs, _guard) = Captured::install();
        run(Behaviour::Succeed).await;
        assert!(logs.records().iter().all(|r| r["level"] != "ERROR"));
    }

    #[test]
    fn panic_messages_are_extracted() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "<non-string panic payload>");
    }
}
