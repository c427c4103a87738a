//! API routes for the Q&A server

pub mod documents;
pub mod languages;
pub mod questions;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::server::state::AppState;
use crate::types::response::HealthResponse;

/// Room for multipart framing on top of the file size cap
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Request body cap for uploads
pub fn upload_body_limit(max_upload_size: usize) -> usize {
    max_upload_size.saturating_add(MULTIPART_OVERHEAD)
}

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Documents - with larger body limit for file uploads
        .route(
            "/documents",
            get(documents::list_documents)
                .post(documents::upload_document)
                .layer(DefaultBodyLimit::max(upload_body_limit(max_upload_size))),
        )
        .route(
            "/documents/:id",
            get(documents::get_document).delete(documents::delete_document),
        )
        // Questions
        .route("/questions", post(questions::ask_question))
        // Info
        .route("/languages", get(languages::list_languages))
        .route("/health", get(health))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let completion = state.completion();
    Json(HealthResponse {
        status: "ok".to_string(),
        documents_loaded: state.store().len(),
        completion_capability_configured: completion.is_configured(),
        provider: completion.name().to_string(),
        model: completion.model().to_string(),
        timestamp: Utc::now(),
    })
}
