//! Document management endpoints

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::Upload;
use crate::server::state::AppState;
use crate::types::response::{
    DeleteResponse, DocumentDetail, DocumentListResponse, DocumentSummary, UploadResponse,
};

/// Multipart field names accepted for the uploaded file
const FILE_FIELDS: &[&str] = &["file", "pdf"];

/// POST /documents - Upload a PDF
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let limit = state.config().server.max_upload_size;
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(|s| s.to_string());

        if !FILE_FIELDS.contains(&name.as_str()) && filename.is_none() {
            tracing::debug!("Ignoring multipart field '{}'", name);
            continue;
        }

        let mime_type = field.content_type().map(|s| s.to_string());
        let data: Bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        if upload.is_none() {
            upload = Some(Upload {
                filename: filename.unwrap_or_else(|| "upload.pdf".to_string()),
                mime_type,
                data,
            });
        }
    }

    let upload = upload.ok_or_else(|| Error::validation("No file uploaded"))?;
    let doc = state.ingest().ingest(upload).await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(doc.as_ref()))))
}

fn multipart_error(err: MultipartError, limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge {
            size: super::upload_body_limit(limit),
            limit,
        }
    } else {
        Error::validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}

fn parse_document_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Error::validation(format!("Invalid document id: '{}'", raw)))
}

/// GET /documents - List all documents in upload order
pub async fn list_documents(State(state): State<AppState>) -> Json<DocumentListResponse> {
    let documents: Vec<DocumentSummary> = state
        .store()
        .list()
        .iter()
        .map(|doc| DocumentSummary::from(doc.as_ref()))
        .collect();

    let total_count = documents.len();

    Json(DocumentListResponse {
        documents,
        total_count,
    })
}

/// GET /documents/:id - Get a specific document
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentDetail>> {
    let id = parse_document_id(&id)?;
    let doc = state.store().get(&id)?;
    Ok(Json(DocumentDetail::from(doc.as_ref())))
}

/// DELETE /documents/:id - Delete a document and its stored upload
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_document_id(&id)?;
    let doc = state.store().remove(&id).await?;

    tracing::info!("Deleted document '{}' ({})", doc.original_name, id);

    Ok(Json(DeleteResponse {
        success: true,
        id,
        filename: doc.original_name.clone(),
    }))
}
