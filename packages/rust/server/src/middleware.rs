//! Cross-cutting request middleware: CORS and request logging.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::config::CorsPolicy;

/// Answer preflight requests directly and stamp CORS headers on everything else.
pub async fn cors(State(policy): State<Arc<CorsPolicy>>, request: Request, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let preflight = request.method() == Method::OPTIONS;

    let mut response = if preflight {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    policy.apply(origin.as_ref(), preflight, response.headers_mut());
    response
}

/// Log each request with a fresh id, its status, and latency.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let id = Uuid::now_v7();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("request", %id, %method, %path);

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let status = response.status().as_u16();
        let duration_ms = start.elapsed().as_millis() as u64;

        if status >= 400 {
            warn!(status, duration_ms, "request completed with error");
        } else {
            info!(status, duration_ms, "request completed");
        }
        response
    }
    .instrument(span)
    .await
}
