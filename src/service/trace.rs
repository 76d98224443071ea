//! Request tracing for the status API
//!
//! Spans are keyed by the matched route (`/api/services/{name}/history`)
//! so one service's history polls aggregate under a single name; the
//! concrete service goes into its own field. The response status is
//! recorded on the span once known.

use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer},
};
use tracing::{Span, debug, field, info_span};

#[cfg(feature = "opentelemetry")]
use opentelemetry::{Context, propagation::Extractor, trace::TraceContextExt};
#[cfg(feature = "opentelemetry")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

const HISTORY_PREFIX: &str = "/api/services/";

pub type ApiTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    ApiMakeSpan,
    DefaultOnRequest,
    ApiOnResponse,
>;

pub fn http_trace_layer() -> ApiTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(ApiMakeSpan)
        .on_response(ApiOnResponse)
}

#[derive(Clone, Debug, Default)]
pub struct ApiMakeSpan;

impl<B> MakeSpan<B> for ApiMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let path = request.uri().path();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or(path, MatchedPath::as_str);

        let span = info_span!(
            "http.request",
            method = %request.method(),
            route = %route,
            service = field::Empty,
            status = field::Empty,
        );
        if let Some(service) = history_service(path) {
            span.record("service", service);
        }

        #[cfg(feature = "opentelemetry")]
        if let Some(parent) = remote_parent(request.headers()) {
            let _ = span.set_parent(parent);
        }

        span
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ApiOnResponse;

impl<B> OnResponse<B> for ApiOnResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        span.record("status", response.status().as_u16());
        debug!(latency_ms = latency.as_millis() as u64, "response sent");
    }
}

/// `name` of `/api/services/{name}/history`
fn history_service(path: &str) -> Option<&str> {
    path.strip_prefix(HISTORY_PREFIX)?
        .strip_suffix("/history")
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

#[cfg(feature = "opentelemetry")]
struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

#[cfg(feature = "opentelemetry")]
impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// W3C trace context of the caller, if it sent a valid one
#[cfg(feature = "opentelemetry")]
fn remote_parent(headers: &axum::http::HeaderMap) -> Option<Context> {
    let context = opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(headers))
    });

    let valid = context.span().span_context().is_valid();
    valid.then_some(context)
}
