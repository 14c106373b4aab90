//! CRUD handlers over the [`UserStore`].
//!
//! A miss on `{id}` is a plain `404` with no body. An `{id}` that is not an
//! integer, or a body that is not a user object, is a `400` with no body.

use tracing::debug;

use crate::error::Fault;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::store::{UserPayload, UserStore};

/// `GET /users`
pub async fn list(_req: Request, store: UserStore) -> Result<Response, Fault> {
    Response::json_of(&store.list())
}

/// `GET /users/{id}`
pub async fn get(req: Request, store: UserStore) -> Result<Response, Fault> {
    let Some(id) = user_id(&req) else {
        return Ok(Response::status(Status::BadRequest));
    };
    match store.get(id) {
        Some(user) => Response::json_of(&user),
        None => Ok(Response::status(Status::NotFound)),
    }
}

/// `POST /users`
pub async fn create(req: Request, store: UserStore) -> Result<Response, Fault> {
    let Some(payload) = payload(&req) else {
        return Ok(Response::status(Status::BadRequest));
    };
    let user = store.create(payload);
    Response::builder()
        .status(Status::Created)
        .header("location", &format!("/users/{}", user.id))
        .json_of(&user)
}

/// `PUT /users/{id}`
pub async fn update(req: Request, store: UserStore) -> Result<Response, Fault> {
    let (Some(id), Some(payload)) = (user_id(&req), payload(&req)) else {
        return Ok(Response::status(Status::BadRequest));
    };
    match store.update(id, payload) {
        Some(user) => Response::json_of(&user),
        None => Ok(Response::status(Status::NotFound)),
    }
}

/// `DELETE /users/{id}`
pub async fn delete(req: Request, store: UserStore) -> Result<Response, Fault> {
    let Some(id) = user_id(&req) else {
        return Ok(Response::status(Status::BadRequest));
    };
    match store.delete(id) {
        Some(_) => Ok(Response::status(Status::NoContent)),
        None => Ok(Response::status(Status::NotFound)),
    }
}

fn user_id(req: &Request) -> Option<i32> {
    req.param("id")?.parse().ok()
}

fn payload(req: &Request) -> Option<UserPayload> {
    serde_json::from_slice(req.body())
        .inspect_err(|e| debug!(path = %req.path(), error = %e, "rejecting user payload"))
        .ok()
}
