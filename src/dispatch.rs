//! Driving a handler chain to completion.
//!
//! [`run`] is the only loop in the crate: invoke the current handler, take
//! the handler it returns, repeat until [`done()`](crate::done). Every step
//! gets the same sink and the same request.
//!
//! A chain that never reaches the sentinel (a handler returning itself, or
//! two handlers returning each other) is cut off after [`MAX_STEPS`].

use http::StatusCode;
use tracing::error;

use crate::error::Error;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::ResponseSink;

/// Upper bound on handler invocations per [`run`].
pub const MAX_STEPS: usize = 1024;

/// Runs `handler` and its successors until the sentinel is returned.
///
/// Returns the number of handlers invoked.
pub fn run(handler: Handler, sink: &mut dyn ResponseSink, req: &Request) -> Result<usize, Error> {
    let mut current = handler;
    for step in 0..MAX_STEPS {
        if current.is_done() {
            return Ok(step);
        }
        current = current.call(sink, req);
    }
    if current.is_done() {
        Ok(MAX_STEPS)
    } else {
        Err(Error::StepLimit(MAX_STEPS))
    }
}

/// [`run`] for use inside middleware, which has nowhere to return an error.
///
/// A chain cut off at [`MAX_STEPS`] is logged and answered with `500`. If the
/// chain already wrote a status, that status stands.
pub fn drive(handler: Handler, sink: &mut dyn ResponseSink, req: &Request) {
    if let Err(e) = run(handler, sink, req) {
        error!(path = req.path(), "{e}");
        sink.write_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
