//! Route table.

pub mod diagnostics;
pub mod users;

use crate::method::Method;
use crate::router::Router;
use crate::store::UserStore;

/// Every route the service answers, bound to `store`.
///
/// `GET /test/error` is only registered when `diagnostic_routes` is set.
pub fn router(store: UserStore, diagnostic_routes: bool) -> Router<UserStore> {
    let router = Router::new(store)
        .on(Method::Get,    "/users",      users::list)
        .on(Method::Post,   "/users",      users::create)
        .on(Method::Get,    "/users/{id}", users::get)
        .on(Method::Put,    "/users/{id}", users::update)
        .on(Method::Delete, "/users/{id}", users::delete);

    if diagnostic_routes {
        router.on(Method::Get, "/test/error", diagnostics::fail)
    } else {
        router
    }
}
