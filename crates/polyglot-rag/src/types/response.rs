//! Response types for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::Document;
use super::language::{LanguageTag, SUPPORTED_LANGUAGES};
use crate::error::FailureCategory;

/// Result of answering a question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// The question as answered
    pub question_text: String,
    /// Generated (or fallback) answer
    pub answer_text: String,
    /// Language the answer was requested in
    pub resolved_language: LanguageTag,
    /// True when the answer came from a fallback strategy
    pub degraded: bool,
    /// Why the primary path was skipped, when degraded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<FailureCategory>,
    /// When the answer was produced
    pub timestamp: DateTime<Utc>,
}

/// Response to a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub filename: String,
    pub page_count: u32,
    pub text_length: usize,
}

impl From<&Document> for UploadResponse {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.original_name.clone(),
            page_count: doc.page_count,
            text_length: doc.text_length(),
        }
    }
}

/// Document summary for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.original_name.clone(),
            uploaded_at: doc.uploaded_at,
        }
    }
}

/// Document listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub total_count: usize,
}

/// Full document record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub document: Document,
    pub text_length: usize,
}

impl From<&Document> for DocumentDetail {
    fn from(doc: &Document) -> Self {
        Self {
            text_length: doc.text_length(),
            document: doc.clone(),
        }
    }
}

/// Response to a successful deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub id: Uuid,
    pub filename: String,
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub documents_loaded: usize,
    pub completion_capability_configured: bool,
    pub provider: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

/// One supported language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

/// Supported language listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

impl LanguagesResponse {
    /// The built-in language table
    pub fn supported() -> Self {
        Self {
            languages: SUPPORTED_LANGUAGES
                .iter()
                .map(|(code, name)| LanguageInfo {
                    code: code.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}
