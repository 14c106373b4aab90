//! Per-request log records.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use super::{Middleware, Next};
use crate::handler::{BoxFuture, Outcome};
use crate::request::Request;

/// Logs every request on the way in and its status and latency on the way out.
///
/// Sits inside the error boundary, so a fault passes straight through it
/// without a completion record; the boundary logs that one instead. The
/// response is never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn handle<'a>(&'a self, req: Request, next: Next<'a>) -> BoxFuture<'a, Outcome> {
        let method = req.method();
        let path = req.path().to_owned();

        Box::pin(async move {
            info!(
                %method,
                %path,
                started_at = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "request started"
            );
            let start = Instant::now();

            let res = next.run(req).await?;

            info!(
                %method,
                %path,
                status = res.status_code(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "request completed"
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fault;
    use crate::method::Method;
    use crate::middleware::{Endpoint, Pipeline};
    use crate::request::test_support::request;
    use crate::response::Response;
    use crate::status::Status;
    use crate::telemetry::capture::Captured;

    struct Fixed(bool);

    impl Endpoint for Fixed {
        fn call(&self, _req: Request) -> BoxFuture<'_, Outcome> {
            let ok = self.0;
            Box::pin(async move {
                if ok {
                    Ok(Response::status(Status::NoContent))
                } else {
                    Err(Fault::new("nope"))
                }
            })
        }
    }

    #[tokio::test]
    async fn leaves_response_untouched() {
        let res = Pipeline::new(Fixed(true))
            .layer(RequestLogger)
            .call(request(Method::Delete, "/users/1", &[], ""))
            .await;

        assert_eq!(res.status_code(), 204);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn passes_faults_through() {
        let next_fault = Next {
            rest: &[],
            endpoint: &Fixed(false),
        };
        let out = RequestLogger.handle(request(Method::Get, "/x", &[], ""), next_fault).await;
        assert_eq!(out.unwrap_err().message(), "nope");
    }

    #[tokio::test]
    async fn records_start_and_completion() {
        let (logs, _guard) = Captured::install();

        Pipeline::new(Fixed(true))
            .layer(RequestLogger)
            .call(request(Method::Get, "/users", &[], ""))
            .await;

        let started = logs.find("request started").expect("start record");
        assert_eq!(started["level"], "INFO");
        assert_eq!(started["fields"]["method"], "GET");
        assert_eq!(started["fields"]["path"], "/users");
        let at = started["fields"]["started_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(at).is_ok(), "not RFC 3339: {at}");

        let completed = logs.find("request completed").expect("completion record");
        assert_eq!(completed["level"], "INFO");
        assert_eq!(completed["fields"]["method"], "GET");
        assert_eq!(completed["fields"]["path"], "/users");
        assert_eq!(completed["fields"]["status"], 204);
        assert!(completed["fields"]["elapsed_ms"].is_u64());
    }

    #[tokio::test]
    async fn fault_leaves_no_completion_record() {
        let (logs, _guard) = Captured::install();

        let next_fault = Next {
            rest: &[],
            endpoint: &Fixed(false),
        };
        let _ = RequestLogger.handle(request(Method::Post, "/users", &[], ""), next_fault).await;

        assert!(logs.find("request started").is_some());
        assert!(logs.find("request completed").is_none());
    }
}
