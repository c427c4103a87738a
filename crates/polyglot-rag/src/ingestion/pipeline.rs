//! Ingestion pipeline orchestration

use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;

use super::extractor::TextExtractor;
use crate::config::IngestionConfig;
use crate::error::{Error, Result};
use crate::storage::DocumentStore;
use crate::types::Document;

/// An uploaded file awaiting ingestion
#[derive(Debug, Clone)]
pub struct Upload {
    /// Filename as sent by the client
    pub filename: String,
    /// Declared content type, if any
    pub mime_type: Option<String>,
    /// File bytes
    pub data: Bytes,
}

/// Validates, persists, extracts and registers uploads
pub struct IngestPipeline {
    store: Arc<DocumentStore>,
    extractor: Arc<dyn TextExtractor>,
    config: IngestionConfig,
    max_upload_size: usize,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        store: Arc<DocumentStore>,
        extractor: Arc<dyn TextExtractor>,
        config: IngestionConfig,
        max_upload_size: usize,
    ) -> Self {
        Self {
            store,
            extractor,
            config,
            max_upload_size,
        }
    }

    /// Effective MIME type: the declared one, or a guess from the filename
    /// when the client sent none or a generic byte stream
    pub fn effective_mime(filename: &str, declared: Option<&str>) -> String {
        let declared = declared
            .map(|m| m.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty() && m != "application/octet-stream");

        declared.unwrap_or_else(|| {
            mime_guess::from_path(filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }

    /// Reject uploads that must never reach extraction
    fn validate(&self, upload: &Upload) -> Result<()> {
        let mime = Self::effective_mime(&upload.filename, upload.mime_type.as_deref());
        if mime != self.config.accepted_mime {
            return Err(Error::UnsupportedMediaType(mime));
        }

        if upload.data.len() > self.max_upload_size {
            return Err(Error::PayloadTooLarge {
                size: upload.data.len(),
                limit: self.max_upload_size,
            });
        }

        if upload.data.is_empty() {
            return Err(Error::validation("Uploaded file is empty"));
        }

        Ok(())
    }

    /// Full ingestion: validate + persist + extract + register
    pub async fn ingest(&self, upload: Upload) -> Result<Arc<Document>> {
        self.validate(&upload)?;

        let id = Uuid::new_v4();
        let storage_path = self
            .store
            .blobs()
            .store(&id, &upload.filename, &upload.data)
            .await?;

        let outcome = tokio::time::timeout(
            self.config.extraction_timeout(),
            self.extractor.extract(&upload.filename, upload.data.clone()),
        )
        .await;

        let extracted = match outcome {
            Ok(Ok(extracted)) if !extracted.text.trim().is_empty() => Ok(extracted),
            Ok(Ok(_)) => Err(Error::extraction(&upload.filename, "no extractable text")),
            Ok(Err(e @ Error::ExtractionFailed { .. })) => Err(e),
            Ok(Err(other)) => Err(Error::extraction(&upload.filename, other.to_string())),
            Err(_) => Err(Error::extraction(
                &upload.filename,
                format!("timed out after {}s", self.config.extraction_timeout_secs),
            )),
        };

        let extracted = match extracted {
            Ok(extracted) => extracted,
            Err(e) => {
                // The stored bytes stay on disk for inspection; nothing is registered
                tracing::error!("{} (upload kept at {})", e, storage_path);
                return Err(e);
            }
        };

        let mut doc = Document::new(
            upload.filename,
            storage_path,
            extracted.text,
            extracted.page_count,
            &upload.data,
        );
        doc.id = id;
        doc.info = extracted.info;

        let id = self.store.add(doc)?;
        let doc = self.store.get(&id)?;

        tracing::info!(
            "Ingested '{}' ({}): {} pages, {} chars via {}",
            doc.original_name,
            doc.id,
            doc.page_count,
            doc.text_length(),
            self.extractor.name()
        );

        Ok(doc)
    }
}
