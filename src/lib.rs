//! # relay
//!
//! HTTP handlers as continuations.
//!
//! A [`Handler`] writes something into the response and then *returns the
//! next handler*. Responses are assembled by composing small handlers rather
//! than by writing statements into one function body:
//!
//! ```text
//! code(418, html(view, done(), [Header::new("access-control-max-age", "3600")]))
//! ```
//!
//! reads as "status 418, then this rendered view with this extra header,
//! then stop". The chain ends at [`done()`], the terminal sentinel, and the
//! server drives it there.
//!
//! Cross-cutting behaviour lives in [`middleware`]: trace identifiers,
//! request logging and CORS each wrap a handler and return a handler, so
//! they compose with routes and with each other the same way.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{Method, StatusCode};
//! use relay::{code, health, middleware, text, Handler, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), relay::Error> {
//!     let app = Router::new()
//!         .on(Method::GET,  "/users/{id}", get_user())
//!         .on(Method::POST, "/users",      code(StatusCode::CREATED, text("created")))
//!         .on(Method::GET,  "/healthz",    health::liveness());
//!
//!     Server::bind("0.0.0.0:3000")?
//!         .serve(middleware::stack(app.into_handler()))
//!         .await
//! }
//!
//! fn get_user() -> Handler {
//!     Handler::from_fn(|_sink, req| {
//!         match req.param("id") {
//!             Some(id) => text(format!("user {id}")),
//!             None => code(StatusCode::BAD_REQUEST, relay::done()),
//!         }
//!     })
//! }
//! ```
//!
//! ## Writing order
//!
//! The status is written once; later writes are logged and ignored. Headers
//! must be set before the body is written. Neither rule is enforced by the
//! types: compose `code` outermost and header-setting steps before body steps.
//!
//! ## Termination
//!
//! A chain that never returns [`done()`] is cut off after
//! [`MAX_STEPS`] handler invocations and answered with `500`.

mod dispatch;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

#[cfg(test)]
mod testing;

pub mod health;
pub mod middleware;

pub use dispatch::{drive, run, MAX_STEPS};
pub use error::Error;
pub use handler::{code, done, html, text, with_headers, Handler, Header, View};
pub use request::Request;
pub use response::{ContentType, ResponseBuffer, ResponseSink, StatusRecorder};
pub use router::Router;
pub use server::Server;
