//! Application assembly.

use crate::middleware::{Authenticator, ErrorBoundary, Pipeline, RequestLogger};
use crate::routes;
use crate::store::UserStore;

/// Builds the request pipeline in front of the user routes.
///
/// The order is fixed: the error boundary wraps everything so faults in
/// authentication and logging are recovered too, the authenticator rejects
/// before anything is logged as served, and the logger sits directly in
/// front of the router.
pub fn build(store: UserStore, diagnostic_routes: bool) -> Pipeline {
    Pipeline::new(routes::router(store, diagnostic_routes))
        .layer(ErrorBoundary)
        .layer(Authenticator::new())
        .layer(RequestLogger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::request::test_support::request;

    const TOKEN: (&str, &str) = ("authorization", "Bearer test-token");

    #[tokio::test]
    async fn unauthenticated_write_never_touches_store() {
        let store = UserStore::seeded();
        let app = build(store.clone(), true);

        let res = app
            .call(request(Method::Post, "/users", &[], r#"{"name":"X","email":"x@x.com","age":1}"#))
            .await;

        assert_eq!(res.status_code(), 401);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn fault_route_is_recovered() {
        let app = build(UserStore::seeded(), true);

        let res = app.call(request(Method::Get, "/test/error", &[TOKEN], "")).await;

        assert_eq!(res.status_code(), 500);
        assert_eq!(res.body(), br#"{"error":"Internal server error."}"#);
    }

    #[tokio::test]
    async fn fault_route_can_be_disabled() {
        let app = build(UserStore::seeded(), false);
        let res = app.call(request(Method::Get, "/test/error", &[TOKEN], "")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn auth_runs_before_routing() {
        let app = build(UserStore::seeded(), true);

        let unknown = app.call(request(Method::Get, "/nowhere", &[], "")).await;
        let root = app.call(request(Method::Get, "/", &[], "")).await;

        assert_eq!(unknown.status_code(), 401);
        assert_eq!(root.status_code(), 404);
    }
}
