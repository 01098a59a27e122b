//! Middleware layer.
//!
//! A middleware is a function from [`Handler`] to [`Handler`]. It is the
//! right place for cross-cutting concerns that every route shares:
//!
//! - [`trace`] — per-request trace identifier and `request` span
//! - [`Logging`] — one structured record per request
//! - [`Cors`] — `Access-Control-*` headers and preflight answers
//!
//! Wrap outermost-first. Tracing goes outside logging so the record carries
//! the trace id; CORS goes inside so it sets headers before any body write:
//!
//! ```rust
//! use relay::{middleware, Router};
//!
//! let app = middleware::stack(Router::new().into_handler());
//! ```

mod cors;
mod logging;
mod trace;

pub use cors::{cors, Cors, ALLOWED_HEADERS, ALLOWED_METHODS, MAX_AGE};
pub use logging::{client_addr, logging, Logging};
pub use trace::{get_trace_id, set_trace_id, trace, TraceId};

use crate::handler::Handler;

/// `trace(logging(cors(app)))` with default settings.
pub fn stack(app: Handler) -> Handler {
    trace(logging(cors(app)))
}
