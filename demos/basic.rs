//! Minimal relay example: a few routes, an HTML page and the default
//! middleware stack.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/
//!   curl -i http://localhost:3000/users/42
//!   curl -i -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -i -X OPTIONS http://localhost:3000/users
//!   curl -i http://localhost:3000/healthz

use std::io::{self, Write};

use http::{Method, StatusCode};
use relay::{code, done, health, html, middleware, text, Handler, Header, Router, Server, View};

struct Landing {
    title: &'static str,
}

impl View for Landing {
    fn render(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "<!doctype html><title>{0}</title><h1>{0}</h1>", self.title)
    }
}

#[tokio::main]
async fn main() -> Result<(), relay::Error> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .on(Method::GET, "/", landing())
        .on(Method::GET, "/users/{id}", get_user())
        .on(Method::POST, "/users", create_user())
        .on(Method::DELETE, "/users/{id}", code(StatusCode::NO_CONTENT, done()))
        .on(Method::GET, "/healthz", health::liveness())
        .on(Method::GET, "/readyz", health::readiness());

    Server::bind("0.0.0.0:3000")?
        .serve(middleware::stack(app.into_handler()))
        .await
}

// GET /
fn landing() -> Handler {
    let page = Landing { title: "relay" };
    code(StatusCode::OK, html(page, done(), [Header::new("cache-control", "no-store")]))
}

// GET /users/{id}
fn get_user() -> Handler {
    Handler::from_fn(|_, req| {
        let id = req.param("id").unwrap_or("unknown");
        text(format!("user {id}"))
    })
}

// POST /users
fn create_user() -> Handler {
    Handler::from_fn(|_, req| {
        if req.body().is_empty() {
            return code(StatusCode::BAD_REQUEST, text("empty body"));
        }
        code(StatusCode::CREATED, relay::with_headers(
            [Header::new("location", "/users/99")],
            text("created"),
        ))
    })
}
