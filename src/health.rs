//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! ```rust
//! use http::Method;
//! use relay::{health, Router};
//!
//! let app = Router::new()
//!     .on(Method::GET, "/healthz", health::liveness())
//!     .on(Method::GET, "/readyz", health::readiness());
//! ```
//!
//! Gate readiness on your own dependencies by registering a different
//! handler under `/readyz`.

use http::StatusCode;

use crate::handler::{code, text, Handler};

/// `200 OK`, body `ok`. No dependencies: if the process answers, it is alive.
pub fn liveness() -> Handler {
    code(StatusCode::OK, text("ok"))
}

/// `200 OK`, body `ready`.
pub fn readiness() -> Handler {
    code(StatusCode::OK, text("ready"))
}
