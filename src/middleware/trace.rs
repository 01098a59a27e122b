//! Per-request trace identifiers.
//!
//! The identifier lives in the request's extensions under a type private to
//! this module, so no other code can read or overwrite the slot by accident.

use std::fmt;

use tracing::info_span;
use uuid::Uuid;

use crate::dispatch::drive;
use crate::handler::{done, Handler};
use crate::request::Request;

/// Correlation token attached to every log line of one request.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TraceId(String);

impl TraceId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
struct Slot(TraceId);

/// Returns `req` carrying a freshly generated trace identifier.
pub fn set_trace_id(req: Request) -> Request {
    req.with_extension(Slot(TraceId::generate()))
}

/// The request's trace identifier, if [`set_trace_id`] ran for it.
pub fn get_trace_id(req: &Request) -> Option<&TraceId> {
    req.extensions().get::<Slot>().map(|slot| &slot.0)
}

/// Middleware: gives every request a trace identifier before `next` runs.
///
/// The inner chain also runs inside a `request` span carrying the
/// identifier, so any event it logs is correlated without extra work.
pub fn trace(next: Handler) -> Handler {
    Handler::from_fn(move |sink, req| {
        let req = set_trace_id(req.clone());
        let span = match get_trace_id(&req) {
            Some(id) => info_span!("request", trace_id = %id),
            None => info_span!("request"),
        };
        let _entered = span.enter();
        drive(next.clone(), sink, &req);
        done()
    })
}
