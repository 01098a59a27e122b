//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is itself a
//! [`Handler`]: its step looks up the route and hands the request, with path
//! parameters attached, to the route's chain.

use std::collections::HashMap;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::dispatch::drive;
use crate::handler::{code, done, text, Handler};
use crate::request::Params;

/// The application route table.
///
/// Build it once at startup, turn it into a handler with
/// [`into_handler`](Router::into_handler) and pass that to
/// [`Server::serve`](crate::Server::serve). Each [`Router::on`] call returns
/// `self` so registrations chain naturally.
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use relay::{text, Router};
    /// # use http::Method;
    /// Router::new()
    ///     .on(Method::GET,    "/users/{id}", text("user"))
    ///     .on(Method::DELETE, "/users/{id}", text("deleted"));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with an existing one.
    pub fn on(mut self, method: Method, path: &str, handler: Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Option<(Handler, Params)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value.clone(), Params(params)))
    }

    /// Turns the table into a handler. Unmatched requests get `404 Not Found`.
    pub fn into_handler(self) -> Handler {
        let not_found = code(StatusCode::NOT_FOUND, text("Not Found"));
        Handler::from_fn(move |sink, req| match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                let req = req.clone().with_extension(params);
                drive(handler, sink, &req);
                done()
            }
            None => not_found.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::dispatch::run;
    use crate::request::Request;
    use crate::response::ResponseBuffer;

    fn app() -> Handler {
        let show = Handler::from_fn(|_, req| {
            let id = req.param("id").unwrap_or("unknown").to_owned();
            text(format!("user {id}"))
        });
        Router::new()
            .on(Method::GET, "/users/{id}", show)
            .on(Method::POST, "/users", code(StatusCode::CREATED, done()))
            .into_handler()
    }

    fn send(method: Method, path: &str) -> ResponseBuffer {
        let req = http::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap();
        let req = Request::from_http(req, "127.0.0.1:5000".parse().unwrap());
        let mut sink = ResponseBuffer::new();
        run(app(), &mut sink, &req).unwrap();
        sink
    }

    #[test]
    fn routes_with_params() {
        let sink = send(Method::GET, "/users/42");
        assert_eq!(sink.body(), b"user 42");
    }

    #[test]
    fn routes_by_method() {
        let sink = send(Method::POST, "/users");
        assert_eq!(sink.status(), Some(StatusCode::CREATED));
    }

    #[test]
    fn unknown_route_is_not_found() {
        for (method, path) in [(Method::GET, "/nope"), (Method::DELETE, "/users/42")] {
            let sink = send(method, path);
            assert_eq!(sink.status(), Some(StatusCode::NOT_FOUND));
            assert_eq!(sink.body(), b"Not Found");
        }
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        Router::new()
            .on(Method::GET, "/a/{x}", done())
            .on(Method::GET, "/a/{y}", done());
    }
}
