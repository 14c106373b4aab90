//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is the last
//! stage of the [`Pipeline`](crate::middleware::Pipeline): by the time a
//! request gets here it has already passed the error boundary, the
//! authenticator and the request logger.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, Handler, Outcome};
use crate::method::Method;
use crate::middleware::Endpoint;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// One radix tree per HTTP method, plus the shared state `S` handed to every
/// handler. Build it once at startup; each [`Router::on`] call returns `self`
/// so registrations chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

enum Lookup<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error rather than a runtime condition.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Matches `path` against the tree for `method`. One trailing `/` is
    /// ignored, so `/users/` finds `/users`.
    fn lookup(&self, method: Method, path: &str) -> Lookup<S> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            let handler = Arc::clone(matched.value);
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(handler, params);
        }

        let elsewhere = self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok());
        if elsewhere { Lookup::MethodNotAllowed } else { Lookup::NotFound }
    }
}

impl<S> Endpoint for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn call(&self, req: Request) -> BoxFuture<'_, Outcome> {
        match self.lookup(req.method(), req.path()) {
            Lookup::Found(handler, params) => {
                handler.call(req.with_params(params), self.state.clone())
            }
            Lookup::MethodNotAllowed => {
                Box::pin(async { Ok(Response::status(Status::MethodNotAllowed)) })
            }
            Lookup::NotFound => Box::pin(async { Ok(Response::status(Status::NotFound)) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fault;
    use crate::request::test_support::request;

    async fn echo_id(req: Request, prefix: &'static str) -> Result<Response, Fault> {
        Ok(Response::text(format!("{prefix}{}", req.param("id").unwrap_or("-"))))
    }

    fn router() -> Router<&'static str> {
        Router::new("user:").on(Method::Get, "/users/{id}", echo_id)
    }

    #[tokio::test]
    async fn passes_params_and_state() {
        let res = router().call(request(Method::Get, "/users/7", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"user:7");
    }

    #[tokio::test]
    async fn trailing_slash_matches_the_same_route() {
        let res = router().call(request(Method::Get, "/users/7/", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"user:7");

        let res = router().call(request(Method::Patch, "/users/7/", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 405);
    }

    #[tokio::test]
    async fn only_one_trailing_slash_is_ignored() {
        let res = router().call(request(Method::Get, "/users/7//", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 404);

        let res = router().call(request(Method::Get, "/", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let res = router().call(request(Method::Get, "/nope", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 404);
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn known_path_wrong_method_is_not_allowed() {
        let res = router().call(request(Method::Patch, "/users/7", &[], "")).await.unwrap();
        assert_eq!(res.status_code(), 405);
    }
}
