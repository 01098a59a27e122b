//! Incoming HTTP request type.
//!
//! A [`Request`] doubles as the per-request context: besides method, URI,
//! headers and body it carries an [`Extensions`] map for request-scoped
//! values such as the trace identifier and matched path parameters.
//!
//! Handlers only ever see `&Request`. Middleware that needs to attach a
//! value derives a new request (`req.clone().with_extension(..)`) and drives
//! the inner chain with it, so nothing a handler observes changes under it.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{Extensions, HeaderMap, Method, Uri};

/// Path parameters captured by the [`Router`](crate::Router).
#[derive(Clone, Debug, Default)]
pub(crate) struct Params(pub(crate) HashMap<String, String>);

/// An incoming HTTP request together with its request-scoped context.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    remote_addr: SocketAddr,
    extensions: Extensions,
}

impl Request {
    /// Builds a request from `http` parts, a collected body and the peer
    /// address reported by the transport.
    pub fn from_parts(parts: http::request::Parts, body: Bytes, remote_addr: SocketAddr) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            remote_addr,
            extensions: parts.extensions,
        }
    }

    /// Convenience for callers that already hold a fully buffered
    /// `http::Request`, e.g. tests.
    pub fn from_http(req: http::Request<Bytes>, remote_addr: SocketAddr) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body, remote_addr)
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn extensions(&self) -> &Extensions { &self.extensions }

    /// The peer address of the TCP connection. Behind a reverse proxy this
    /// is the proxy, see [`client_addr`](crate::middleware::client_addr).
    pub fn remote_addr(&self) -> SocketAddr { self.remote_addr }

    /// Path plus query string, as sent by the client.
    pub fn request_uri(&self) -> &str {
        self.uri.path_and_query().map_or_else(|| self.uri.path(), |pq| pq.as_str())
    }

    /// Case-insensitive header lookup. Values that are not visible ASCII
    /// are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.extensions.get::<Params>()?.0.get(key).map(String::as_str)
    }

    /// Returns this request with `value` added to its extensions, replacing
    /// any previous value of the same type.
    pub fn with_extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }
}
