//! Ingested document record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

/// A document whose text has been extracted and registered
///
/// Immutable once constructed; the store hands out shared references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Filename as uploaded
    #[serde(rename = "filename")]
    pub original_name: String,
    /// Where the uploaded bytes were written
    pub storage_path: String,
    /// Plain text produced at ingestion
    pub extracted_text: String,
    /// Number of pages
    pub page_count: u32,
    /// SHA-256 of the uploaded bytes
    pub content_hash: String,
    /// Upload size in bytes
    pub size_bytes: u64,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
    /// Document info dictionary (title, author, producer...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub info: HashMap<String, String>,
}

impl Document {
    /// Create a new document record with a fresh ID
    pub fn new(
        original_name: String,
        storage_path: String,
        extracted_text: String,
        page_count: u32,
        data: &[u8],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name,
            storage_path,
            extracted_text,
            page_count,
            content_hash: hash_bytes(data),
            size_bytes: data.len() as u64,
            uploaded_at: Utc::now(),
            info: HashMap::new(),
        }
    }

    /// Length of the extracted text in characters
    pub fn text_length(&self) -> usize {
        self.extracted_text.chars().count()
    }
}

/// Hex-encoded SHA-256
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
