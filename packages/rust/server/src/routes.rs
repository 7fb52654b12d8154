//! HTTP routes: `GET /health` and `POST /enrich`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use tracing::{error, instrument, warn};

use cravey_core::CsvProcessor;
use cravey_shared::{
    CraveyError, EnrichRequest, EnrichResponse, ErrorResponse, HealthResponse,
};

use crate::config::ServerConfig;
use crate::scratch;

/// Message returned when the body has no usable `csv_data`.
pub const MISSING_FIELD_MESSAGE: &str = "Missing csv_data field";

/// Per-router state shared by the handlers.
#[derive(Clone)]
struct AppState {
    version: Arc<str>,
    processor: Arc<dyn CsvProcessor>,
}

/// Build the application router for `config`.
///
/// Request bodies are not size-capped; large exports are expected.
pub fn router(config: &ServerConfig) -> Router {
    let state = AppState {
        version: Arc::from(config.version.as_str()),
        processor: Arc::clone(&config.processor),
    };
    let cors = Arc::new(config.cors.clone());

    Router::new()
        .route("/health", get(health))
        .route("/enrich", post(enrich))
        .layer(DefaultBodyLimit::disable())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(cors, crate::middleware::cors))
        .layer(middleware::from_fn(crate::middleware::log_requests))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(&*state.version))
}

#[instrument(skip_all, fields(bytes = body.len()))]
async fn enrich(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EnrichResponse>, ApiError> {
    let request = parse_request(&body)?;

    let processor = Arc::clone(&state.processor);
    let enriched_csv = tokio::task::spawn_blocking(move || {
        scratch::enrich_via_files(processor.as_ref(), &request.csv_data)
    })
    .await
    .map_err(|e| CraveyError::processing(format!("enrichment task failed: {e}")))??;

    Ok(Json(EnrichResponse { enriched_csv }))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

/// Pull `csv_data` out of a JSON body. Anything else is a client error.
fn parse_request(body: &[u8]) -> Result<EnrichRequest, CraveyError> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(EnrichRequest::from_value)
        .ok_or_else(|| CraveyError::input(MISSING_FIELD_MESSAGE))
}

// ---------------------------------------------------------------------------
// Error responses
// ---------------------------------------------------------------------------

/// A JSON `{"error": ...}` response with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<CraveyError> for ApiError {
    fn from(err: CraveyError) -> Self {
        if err.is_client_error() {
            warn!(error = %err, "rejected enrich request");
            Self::new(StatusCode::BAD_REQUEST, err.to_string())
        } else {
            error!(error = %err, "error during enrichment");
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_accepts_csv_data() {
        let req = parse_request(br#"{"csv_data":"name\nx\n"}"#).expect("request");
        assert_eq!(req.csv_data, "name\nx\n");
    }

    #[test]
    fn parse_request_rejects_everything_else() {
        let bodies: [&[u8]; 7] = [
            b"",
            b"not json",
            b"{}",
            br#"{"csv":"a"}"#,
            br#"{"csv_data":5}"#,
            b"[1,2]",
            b"null",
        ];
        for body in bodies {
            let err = parse_request(body).unwrap_err();
            assert!(err.is_client_error());
            assert_eq!(err.to_string(), MISSING_FIELD_MESSAGE);
        }
    }

    #[test]
    fn errors_map_to_status_codes() {
        let bad = ApiError::from(CraveyError::input(MISSING_FIELD_MESSAGE));
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let failed = ApiError::from(CraveyError::processing("processing failed: x"));
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.message, "processing failed: x");

        let missing = ApiError::from(CraveyError::missing_output(
            scratch::MISSING_OUTPUT_MESSAGE,
        ));
        assert_eq!(missing.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
