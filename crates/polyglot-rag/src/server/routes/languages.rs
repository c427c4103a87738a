//! Supported language listing

use axum::Json;

use crate::types::response::LanguagesResponse;

/// GET /languages
pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse::supported())
}
