//! # rollcall
//!
//! CRUD over an in-memory list of users, served over HTTP behind a small,
//! fixed middleware pipeline.
//!
//! ## The pipeline
//!
//! Every request walks the same chain, and responses come back through it
//! in reverse:
//!
//! ```text
//! ErrorBoundary ─► Authenticator ─► RequestLogger ─► Router ─► handler
//! ```
//!
//! - [`ErrorBoundary`](middleware::ErrorBoundary) recovers any fault or panic
//!   downstream and answers `500 {"error": "Internal server error."}`.
//! - [`Authenticator`](middleware::Authenticator) answers
//!   `401 {"error": "Unauthorized. Valid token required."}` unless the request
//!   carries `Authorization: Bearer <something>`. `/`, `/openapi/**` and
//!   `/swagger/**` are exempt. The check is syntactic only.
//! - [`RequestLogger`](middleware::RequestLogger) logs method, path, status
//!   and latency.
//!
//! ## Routes
//!
//! | Method & path | Success | Failure |
//! |---|---|---|
//! | `GET /users` | 200, all users | |
//! | `GET /users/{id}` | 200, user | 404 |
//! | `POST /users` | 201 + `Location` | 400 |
//! | `PUT /users/{id}` | 200, user | 404, 400 |
//! | `DELETE /users/{id}` | 204 | 404 |
//! | `GET /test/error` | | 500 (diagnostic only) |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use rollcall::{Server, UserStore, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rollcall::Error> {
//!     let app = app::build(UserStore::seeded(), false);
//!     Server::bind("0.0.0.0:3000".parse().unwrap()).await?.serve(app).await
//! }
//! ```
//!
//! Storage is a plain list in memory. Nothing survives a restart.
//!
//! ## Deployment
//!
//! rollcall is meant to sit behind a reverse proxy. Request bodies are
//! buffered whole before the pipeline sees them and there is no size cap
//! here, so limit them at the proxy (nginx `client_max_body_size`). TLS and
//! rate limiting live there too.

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod middleware;
pub mod routes;
pub mod store;
pub mod telemetry;

pub use error::{Error, Fault};
pub use handler::{BoxFuture, Handler, Outcome};
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{User, UserPayload, UserStore};
