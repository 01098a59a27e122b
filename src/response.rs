//! The response sink handlers write into.
//!
//! A handler never builds a response value. It writes a status, headers and
//! body bytes into a [`ResponseSink`] supplied by whoever drives the chain.
//! The server supplies a [`ResponseBuffer`]; middleware may decorate it
//! (see [`StatusRecorder`]) to observe what the inner chain wrote.
//!
//! # Ordering
//!
//! The status is written at most once. A second write is a bug in the
//! composed chain; it is logged and ignored, never applied. The first body
//! write without a prior status implies `200 OK`.
//!
//! Headers set before the first body write are well-defined. Setting headers
//! after body bytes have been written is the caller's responsibility: the
//! buffer accepts it, a streaming sink may not.

use bytes::{Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::Full;
use tracing::warn;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values used by the body combinators.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Html,  // text/html; charset=utf-8
    Text,  // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Text => "text/plain; charset=utf-8",
        }
    }

    pub(crate) fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

// ── ResponseSink ──────────────────────────────────────────────────────────────

/// Write target for one response.
///
/// Exclusively owned by a single request for its whole lifetime.
pub trait ResponseSink {
    /// Writes the status line. Only the first call per response takes effect.
    fn write_status(&mut self, status: StatusCode);

    /// Response headers. See the module docs for ordering rules.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Appends `chunk` to the body.
    fn write_body(&mut self, chunk: &[u8]);

    /// Sets the `content-type` header.
    fn set_content_type(&mut self, content_type: ContentType) {
        self.headers_mut().insert(CONTENT_TYPE, content_type.header_value());
    }
}

// ── ResponseBuffer ────────────────────────────────────────────────────────────

/// In-memory [`ResponseSink`], turned into an `http::Response` once the
/// handler chain is done.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status written so far, if any.
    pub fn status(&self) -> Option<StatusCode> { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Finishes the response. A response nobody wrote a status for is `200 OK`.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseSink for ResponseBuffer {
    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(current) => {
                warn!(%current, ignored = %status, "superfluous status write");
            }
            None => self.status = Some(status),
        }
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_body(&mut self, chunk: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(chunk);
    }
}

// ── StatusRecorder ────────────────────────────────────────────────────────────

/// Sink decorator that forwards every write and remembers the status
/// explicitly written through it.
///
/// Only the first write is recorded, matching what the client receives.
/// Implicit statuses (a body write with no status) are not recorded.
pub struct StatusRecorder<'a> {
    inner: &'a mut dyn ResponseSink,
    status: Option<StatusCode>,
}

impl<'a> StatusRecorder<'a> {
    pub fn new(inner: &'a mut dyn ResponseSink) -> Self {
        Self { inner, status: None }
    }

    pub fn status(&self) -> Option<StatusCode> { self.status }
}

impl ResponseSink for StatusRecorder<'_> {
    fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
        self.inner.write_status(status);
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.inner.write_body(chunk);
    }
}
