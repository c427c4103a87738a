//! PDF text extraction

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Text extracted from an uploaded document
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    /// Full plain text
    pub text: String,
    /// Number of pages
    pub page_count: u32,
    /// Document info dictionary entries
    pub info: HashMap<String, String>,
}

/// Trait for document-to-text extraction
///
/// Implementations:
/// - `PdfExtractor`: pdf-extract for text, lopdf for structure
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from document bytes
    async fn extract(&self, filename: &str, data: Bytes) -> Result<ExtractedText>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}

/// Native PDF extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Blocking extraction; run off the async executor
    fn extract_blocking(filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        // Page count and metadata are best-effort; text is what matters
        let (page_count, info) = match lopdf::Document::load_mem(data) {
            Ok(doc) => (doc.get_pages().len() as u32, read_info(&doc)),
            Err(e) => {
                tracing::debug!("lopdf could not load '{}': {}", filename, e);
                (1, HashMap::new())
            }
        };

        Ok(ExtractedText {
            text,
            page_count,
            info,
        })
    }
}

/// Read the trailer's /Info dictionary as strings
fn read_info(doc: &lopdf::Document) -> HashMap<String, String> {
    let Ok(info) = doc.trailer.get(b"Info") else {
        return HashMap::new();
    };

    let dict = match info {
        lopdf::Object::Reference(id) => doc.get_dictionary(*id).ok(),
        lopdf::Object::Dictionary(dict) => Some(dict),
        _ => None,
    };

    dict.map(|dict| {
        dict.iter()
            .filter_map(|(key, value)| match value {
                lopdf::Object::String(bytes, _) => Some((
                    String::from_utf8_lossy(key).to_string(),
                    String::from_utf8_lossy(bytes).trim().to_string(),
                )),
                _ => None,
            })
            .filter(|(_, value)| !value.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, filename: &str, data: Bytes) -> Result<ExtractedText> {
        let name = filename.to_string();
        tokio::task::spawn_blocking(move || Self::extract_blocking(&name, &data))
            .await
            .map_err(|e| {
                // pdf-extract panics on some malformed inputs
                Error::extraction(filename, format!("parser aborted: {}", e))
            })?
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}
