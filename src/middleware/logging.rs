//! Request logging.
//!
//! One `info` event per request, target `relay::request`:
//!
//! ```text
//! INFO relay::request: request url="/users/42" method="GET" took_ms=3 status=200 ip="10.0.0.7" trace_id="…"
//! ```
//!
//! `status` is the status the inner chain wrote explicitly, `0` if it wrote
//! none. On the ambient subscriber the trace id comes from the enclosing
//! `request` span. A pinned [`Dispatch`] never saw that span, so the id is
//! added as a field instead. Untraced requests carry neither.

use std::time::Instant;

use tracing::{info, Dispatch};

use crate::dispatch::drive;
use crate::handler::{done, Handler};
use crate::middleware::trace::get_trace_id;
use crate::request::Request;
use crate::response::StatusRecorder;

/// Request-logging middleware.
///
/// By default events go to whatever subscriber is current when the request
/// is handled. [`with_dispatch`](Logging::with_dispatch) pins them to a
/// specific one instead.
#[derive(Clone, Debug, Default)]
pub struct Logging {
    dispatch: Option<Dispatch>,
}

impl Logging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends request records to `dispatch` rather than the ambient subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn wrap(self, next: Handler) -> Handler {
        Handler::from_fn(move |sink, req| {
            let start = Instant::now();
            let status = {
                let mut recorder = StatusRecorder::new(sink);
                drive(next.clone(), &mut recorder, req);
                recorder.status()
            };
            let took_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            let status = status.map_or(0, |s| s.as_u16());
            let trace_id = match self.dispatch {
                Some(_) => get_trace_id(req).map(|id| id.as_str()),
                None => None,
            };

            let emit = || {
                info!(
                    target: "relay::request",
                    url = req.request_uri(),
                    method = req.method().as_str(),
                    took_ms,
                    status,
                    ip = %client_addr(req),
                    trace_id,
                    "request"
                );
            };
            match &self.dispatch {
                Some(dispatch) => tracing::dispatcher::with_default(dispatch, emit),
                None => emit(),
            }
            done()
        })
    }
}

/// [`Logging`] with the ambient subscriber.
pub fn logging(next: Handler) -> Handler {
    Logging::new().wrap(next)
}

/// Best guess at the client's address.
///
/// `X-Real-Ip`, then `X-Forwarded-For` (verbatim), then the transport peer.
pub fn client_addr(req: &Request) -> String {
    ["x-real-ip", "x-forwarded-for"]
        .into_iter()
        .filter_map(|name| req.header(name))
        .find(|value| !value.is_empty())
        .map_or_else(|| req.remote_addr().to_string(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::dispatch::run;
    use crate::handler::{code, text};
    use crate::middleware::trace::trace;
    use crate::response::ResponseBuffer;
    use crate::testing::json_logger;

    fn request(builder: http::request::Builder) -> Request {
        let req = builder.body(Bytes::new()).unwrap();
        Request::from_http(req, "192.0.2.1:7000".parse().unwrap())
    }

    #[test]
    fn one_record_with_final_status() {
        let (out, dispatch) = json_logger();
        let app = Logging::new()
            .with_dispatch(dispatch)
            .wrap(code(StatusCode::OK, done()));

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(http::Request::get("/?q=1"))).unwrap();

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.contains(r#""status":200"#), "{line}");
        assert!(line.contains(r#""url":"/?q=1""#), "{line}");
        assert!(line.contains(r#""method":"GET""#), "{line}");
        assert!(line.contains(r#""ip":"192.0.2.1:7000""#), "{line}");
        assert!(line.contains(r#""took_ms":"#), "{line}");
        assert!(!line.contains("trace_id"), "{line}");
    }

    #[test]
    fn unwritten_status_logs_zero() {
        let (out, dispatch) = json_logger();
        let app = Logging::new().with_dispatch(dispatch).wrap(text("implicit"));

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(http::Request::get("/"))).unwrap();

        assert_eq!(sink.status(), Some(StatusCode::OK));
        assert!(out.lines()[0].contains(r#""status":0"#));
    }

    #[test]
    fn includes_trace_id_when_traced() {
        let (out, dispatch) = json_logger();
        let app = trace(Logging::new().with_dispatch(dispatch).wrap(done()));

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(http::Request::get("/"))).unwrap();

        assert!(out.lines()[0].contains(r#""trace_id":""#));
    }

    #[test]
    fn ambient_record_takes_trace_id_from_the_span_only() {
        let (out, dispatch) = json_logger();
        let mut sink = ResponseBuffer::new();
        tracing::dispatcher::with_default(&dispatch, || {
            run(trace(logging(done())), &mut sink, &request(http::Request::get("/"))).unwrap();
        });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].matches("trace_id").count(), 1, "{}", lines[0]);
    }

    #[test]
    fn double_status_logs_what_the_client_got() {
        let (out, dispatch) = json_logger();
        let app = Logging::new()
            .with_dispatch(dispatch)
            .wrap(code(StatusCode::CREATED, code(StatusCode::NOT_FOUND, done())));

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(http::Request::get("/"))).unwrap();

        assert_eq!(sink.status(), Some(StatusCode::CREATED));
        assert!(out.lines()[0].contains(r#""status":201"#));
    }

    #[test]
    fn endless_chain_logs_server_error() {
        fn spin() -> Handler {
            Handler::from_fn(|_, _| spin())
        }

        let (out, dispatch) = json_logger();
        let app = Logging::new().with_dispatch(dispatch).wrap(spin());

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(http::Request::get("/"))).unwrap();

        assert_eq!(sink.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        let record = out.lines().into_iter().find(|l| l.contains("relay::request")).unwrap();
        assert!(record.contains(r#""status":500"#), "{record}");
    }

    #[test]
    fn forwards_writes_to_the_real_sink() {
        let (_out, dispatch) = json_logger();
        let app = Logging::new()
            .with_dispatch(dispatch)
            .wrap(code(StatusCode::IM_A_TEAPOT, text("tea")));

        let mut sink = ResponseBuffer::new();
        run(app, &mut sink, &request(http::Request::get("/"))).unwrap();

        assert_eq!(sink.status(), Some(StatusCode::IM_A_TEAPOT));
        assert_eq!(sink.body(), b"tea");
        assert_eq!(sink.headers().len(), 1);
    }

    #[test]
    fn client_addr_precedence() {
        let both = request(
            http::Request::get("/")
                .header("X-Real-Ip", "10.0.0.1")
                .header("X-Forwarded-For", "10.0.0.2, 10.0.0.3"),
        );
        assert_eq!(client_addr(&both), "10.0.0.1");

        let forwarded = request(http::Request::get("/").header("X-Forwarded-For", "10.0.0.2"));
        assert_eq!(client_addr(&forwarded), "10.0.0.2");

        let direct = request(http::Request::get("/"));
        assert_eq!(client_addr(&direct), "192.0.2.1:7000");

        let blank = request(http::Request::get("/").header("X-Real-Ip", ""));
        assert_eq!(client_addr(&blank), "192.0.2.1:7000");
    }
}
