//! Cross-origin resource sharing.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use http::{HeaderValue, Method, StatusCode};

use crate::handler::{done, Handler};

pub const ALLOWED_METHODS: &str = "GET, POST, PATCH, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
pub const MAX_AGE: &str = "3600";

/// CORS middleware.
///
/// Sets the four `Access-Control-*` headers on every response and answers
/// preflight (`OPTIONS`) requests itself with `200`, never reaching the
/// wrapped handler.
///
/// ```rust
/// use http::HeaderValue;
/// use relay::{text, middleware::Cors};
///
/// let app = Cors::new()
///     .allow_origin(HeaderValue::from_static("https://example.com"))
///     .wrap(text("hi"));
/// ```
#[derive(Clone, Debug)]
pub struct Cors {
    allow_origin: HeaderValue,
}

impl Cors {
    /// Policy with an empty `Access-Control-Allow-Origin`, which browsers
    /// treat as matching no origin.
    pub fn new() -> Self {
        Self { allow_origin: HeaderValue::from_static("") }
    }

    /// Sets the `Access-Control-Allow-Origin` value, e.g. `*` or a single
    /// origin.
    pub fn allow_origin(mut self, origin: HeaderValue) -> Self {
        self.allow_origin = origin;
        self
    }

    pub fn wrap(self, next: Handler) -> Handler {
        Handler::from_fn(move |sink, req| {
            let headers = sink.headers_mut();
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS));
            headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));

            if req.method() == Method::OPTIONS {
                sink.write_status(StatusCode::OK);
                return done();
            }
            next.clone()
        })
    }
}

impl Default for Cors {
    fn default() -> Self { Self::new() }
}

/// [`Cors`] with the default policy.
pub fn cors(next: Handler) -> Handler {
    Cors::new().wrap(next)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use bytes::Bytes;
    use http::header::CONTENT_TYPE;

    use super::*;
    use crate::dispatch::run;
    use crate::handler::{code, text};
    use crate::request::Request;
    use crate::response::ResponseBuffer;

    fn request(method: Method) -> Request {
        let req = http::Request::builder()
            .method(method)
            .uri("/")
            .body(Bytes::new())
            .unwrap();
        Request::from_http(req, "127.0.0.1:5000".parse().unwrap())
    }

    fn assert_cors_headers(sink: &ResponseBuffer, origin: &str) {
        let headers = sink.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], origin);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], MAX_AGE);
    }

    #[test]
    fn passes_through_to_next() {
        let app = cors(code(StatusCode::CREATED, text("hello")));

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(Method::GET)).unwrap();

        assert_eq!(sink.status(), Some(StatusCode::CREATED));
        assert_eq!(sink.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(sink.body(), b"hello");
        assert_cors_headers(&sink, "");
    }

    #[test]
    fn preflight_short_circuits() {
        let reached = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&reached);
        let inner = Handler::from_fn(move |sink, _| {
            flag.store(true, Ordering::SeqCst);
            sink.write_body(b"should not appear");
            done()
        });

        let mut sink = ResponseBuffer::new();
        run(cors(inner), &mut sink, &request(Method::OPTIONS)).unwrap();

        assert!(!reached.load(Ordering::SeqCst));
        assert_eq!(sink.status(), Some(StatusCode::OK));
        assert!(sink.body().is_empty());
        assert_cors_headers(&sink, "");
    }

    #[test]
    fn configured_origin() {
        let app = Cors::new()
            .allow_origin(HeaderValue::from_static("*"))
            .wrap(done());

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(Method::POST)).unwrap();
        assert_cors_headers(&sink, "*");
    }
}
