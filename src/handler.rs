//! Handlers as continuations, and the combinators that build them.
//!
//! A [`Handler`] is a function of `(sink, request)` that performs some side
//! effect on the sink and then *returns the next handler to run*. A chain is
//! finished when a step returns [`done()`], the terminal sentinel.
//!
//! ```text
//! code(418, html(view, done(), [Header::new("access-control-max-age", "3600")]))
//!   step 1: write 418, invoke the html step
//!           set header, set content-type, render view into the body
//!           return done()
//!   step 2: done() → dispatch stops
//! ```
//!
//! Responses are therefore built by *returning data* rather than by a
//! sequence of statements, so a whole response reads as one expression and
//! a middleware can wrap any chain without knowing how many steps it has.
//!
//! Handlers are values: cloning one is an `Arc` clone, and combinators
//! never mutate the handlers they are given.

use std::fmt;
use std::io;
use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use tracing::{error, warn};

use crate::request::Request;
use crate::response::{ContentType, ResponseSink};

type StepFn = dyn Fn(&mut dyn ResponseSink, &Request) -> Handler + Send + Sync + 'static;

// ── Handler ───────────────────────────────────────────────────────────────────

/// One step of a response chain.
#[derive(Clone)]
pub struct Handler {
    inner: Inner,
}

#[derive(Clone)]
enum Inner {
    Done,
    Step(Arc<StepFn>),
}

impl Handler {
    /// Wraps a closure as a handler.
    ///
    /// ```rust
    /// use relay::{code, done, text, Handler};
    /// use http::StatusCode;
    ///
    /// let hello = Handler::from_fn(|_sink, req| {
    ///     if req.param("name").is_some() {
    ///         text("hello, friend")
    ///     } else {
    ///         code(StatusCode::NO_CONTENT, done())
    ///     }
    /// });
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut dyn ResponseSink, &Request) -> Handler + Send + Sync + 'static,
    {
        Self { inner: Inner::Step(Arc::new(f)) }
    }

    /// Runs this single step and returns its successor.
    ///
    /// Calling the sentinel is a no-op that returns the sentinel.
    pub fn call(&self, sink: &mut dyn ResponseSink, req: &Request) -> Handler {
        match &self.inner {
            Inner::Done => done(),
            Inner::Step(f) => f(sink, req),
        }
    }

    /// Whether this is the terminal sentinel.
    pub fn is_done(&self) -> bool {
        matches!(self.inner, Inner::Done)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Inner::Done => f.write_str("Handler(done)"),
            Inner::Step(_) => f.write_str("Handler(..)"),
        }
    }
}

/// The terminal sentinel: a handler that does nothing and returns itself.
pub fn done() -> Handler {
    Handler { inner: Inner::Done }
}

// ── Header ────────────────────────────────────────────────────────────────────

/// A response header to set, consumed by [`html`] and [`with_headers`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    fn apply(&self, sink: &mut dyn ResponseSink) {
        let name = HeaderName::try_from(self.key.as_str());
        let value = HeaderValue::try_from(self.value.as_str());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                sink.headers_mut().insert(name, value);
            }
            _ => warn!(key = %self.key, "skipping invalid response header"),
        }
    }
}

// ── View ──────────────────────────────────────────────────────────────────────

/// Something that renders itself as a response body.
///
/// This is the seam to a template engine. Any closure of the same shape is
/// a view:
///
/// ```rust
/// use std::io::Write;
/// use relay::{done, html};
///
/// let page = html(|out: &mut dyn Write| out.write_all(b"<h1>ok</h1>"), done(), []);
/// ```
pub trait View: Send + Sync + 'static {
    fn render(&self, out: &mut dyn io::Write) -> io::Result<()>;
}

impl<F> View for F
where
    F: Fn(&mut dyn io::Write) -> io::Result<()> + Send + Sync + 'static,
{
    fn render(&self, out: &mut dyn io::Write) -> io::Result<()> {
        self(out)
    }
}

// ── Combinators ───────────────────────────────────────────────────────────────

/// Writes `status`, then runs `next` and returns its successor.
pub fn code(status: StatusCode, next: Handler) -> Handler {
    Handler::from_fn(move |sink, req| {
        sink.write_status(status);
        next.call(sink, req)
    })
}

/// Writes `body` as a plain-text payload and finishes the chain.
///
/// Does not write a status; compose with [`code`] for anything but `200`.
pub fn text(body: impl Into<String>) -> Handler {
    let body: String = body.into();
    let body: Arc<str> = body.into();
    Handler::from_fn(move |sink, _req| {
        sink.set_content_type(ContentType::Text);
        sink.write_body(body.as_bytes());
        done()
    })
}

/// Sets `headers`, renders `view` as an HTML body, then continues with `next`.
///
/// The view is rendered into a private buffer first, so a failing render
/// never leaves a partial body behind. On failure the error is logged, a
/// generic `500` is written (or ignored with a warning if the chain already
/// wrote a status) and the chain finishes.
pub fn html<V, H>(view: V, next: Handler, headers: H) -> Handler
where
    V: View,
    H: IntoIterator<Item = Header>,
{
    let view = Arc::new(view);
    let headers: Arc<[Header]> = headers.into_iter().collect();
    Handler::from_fn(move |sink, _req| {
        for header in headers.iter() {
            header.apply(sink);
        }

        let mut rendered = Vec::new();
        if let Err(e) = view.render(&mut rendered) {
            error!("view render failed: {e}");
            sink.write_status(StatusCode::INTERNAL_SERVER_ERROR);
            sink.set_content_type(ContentType::Text);
            sink.write_body(b"Internal Server Error");
            return done();
        }

        sink.set_content_type(ContentType::Html);
        sink.write_body(&rendered);
        next.clone()
    })
}

/// Sets `headers`, then runs `next` and returns its successor.
pub fn with_headers<H>(headers: H, next: Handler) -> Handler
where
    H: IntoIterator<Item = Header>,
{
    let headers: Arc<[Header]> = headers.into_iter().collect();
    Handler::from_fn(move |sink, req| {
        for header in headers.iter() {
            header.apply(sink);
        }
        next.call(sink, req)
    })
}
