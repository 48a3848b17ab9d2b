//! HTTP gateway (Axum) over the [`RequestRouter`](crate::router::RequestRouter).
//!
//! Every response carries an `x-teller-status` header: the error kind on failure, the
//! decision (`match`, `keyword`, `unprocessed`, ...) on success.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::embedding::Modality;

pub use error::GatewayError;
pub use handler::{
    embedding_handler, face_embedding_handler, query_file_handler, query_text_handler,
    verify_face_handler, verify_handler, verify_voice_handler, voice_embedding_handler,
};
pub use state::HandlerState;

pub const TELLER_STATUS_HEADER: &str = "x-teller-status";
pub const TELLER_STATUS_HEALTHY: &str = "healthy";
pub const TELLER_STATUS_READY: &str = "ready";
pub const TELLER_STATUS_COLD: &str = "cold";
pub const TELLER_STATUS_ERROR: &str = "error";

pub fn create_router_with_state(state: HandlerState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/embedding/{modality}", post(embedding_handler))
        .route("/verify/{modality}", post(verify_handler))
        .route("/query/text", post(query_text_handler))
        .route("/query/file", post(query_file_handler))
        .route("/get_face_embedding", post(face_embedding_handler))
        .route("/get_voice_embedding", post(voice_embedding_handler))
        .route("/verify_face", post(verify_face_handler))
        .route("/verify_voice", post(verify_voice_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub storage: &'static str,
    /// `ready` once the classification bundle is in memory, `cold` before.
    pub model: &'static str,
    pub face_extractor: &'static str,
    pub voice_extractor: &'static str,
    pub transcriber: &'static str,
}

fn mode(is_stub: bool) -> &'static str {
    if is_stub { "stub" } else { "real" }
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        TELLER_STATUS_HEADER,
        HeaderValue::from_static(TELLER_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let storage_status = if state.storage_path.is_dir() {
        TELLER_STATUS_READY
    } else {
        TELLER_STATUS_ERROR
    };

    let classifier = state.router.classifier();
    let model_status = if classifier.registry().is_loaded(classifier.model_path()) {
        TELLER_STATUS_READY
    } else {
        TELLER_STATUS_COLD
    };

    let components = ComponentStatus {
        http: TELLER_STATUS_READY,
        storage: storage_status,
        model: model_status,
        face_extractor: mode(state.router.provider(Modality::Face).is_stub()),
        voice_extractor: mode(state.router.provider(Modality::Voice).is_stub()),
        transcriber: mode(state.router.transcriber().is_stub()),
    };

    let is_ready =
        components.storage == TELLER_STATUS_READY && components.model == TELLER_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(TELLER_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
