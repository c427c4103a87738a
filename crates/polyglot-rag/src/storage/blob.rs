//! Backing storage for uploaded bytes

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;

/// Trait for raw upload storage
///
/// Implementations:
/// - `LocalBlobStore`: Local filesystem
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist upload bytes, returning the storage path
    async fn store(&self, doc_id: &Uuid, filename: &str, data: &[u8]) -> Result<String>;

    /// Delete a previously stored upload
    async fn delete(&self, storage_path: &str) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Filesystem blob store
pub struct LocalBlobStore {
    /// Directory uploads are written to
    storage_dir: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store, creating the directory if needed
    pub fn new(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;
        Ok(Self { storage_dir })
    }

    /// Directory uploads are written to
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Get path for an upload
    fn blob_path(&self, doc_id: &Uuid, filename: &str) -> PathBuf {
        self.storage_dir
            .join(format!("{}-{}", doc_id, sanitize_filename(filename)))
    }
}

/// Keep only characters that are safe in a single path component
fn sanitize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, doc_id: &Uuid, filename: &str, data: &[u8]) -> Result<String> {
        let path = self.blob_path(doc_id, filename);
        tokio::fs::write(&path, data).await?;
        Ok(path.to_string_lossy().to_string())
    }

    async fn delete(&self, storage_path: &str) -> Result<()> {
        tokio::fs::remove_file(storage_path).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "local-filesystem"
    }
}
