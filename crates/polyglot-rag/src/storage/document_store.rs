//! In-memory document registry
//!
//! Reads share a `parking_lot::RwLock`; `add` and `remove` take it
//! exclusively, so every snapshot (`list`, `all_text`) sees the store either
//! fully before or fully after a given mutation. Once `add` returns, the
//! document is visible to every later read.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::blob::BlobStore;
use crate::error::{Error, Result};
use crate::types::Document;

/// Separator placed between documents in `all_text`
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

#[derive(Default)]
struct Registry {
    /// Insertion order
    order: Vec<Uuid>,
    documents: HashMap<Uuid, Arc<Document>>,
}

/// Document store shared by every request
pub struct DocumentStore {
    registry: RwLock<Registry>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentStore {
    /// Create an empty store backed by the given blob storage
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            blobs,
        }
    }

    /// Register a document
    pub fn add(&self, doc: Document) -> Result<Uuid> {
        let mut registry = self.registry.write();
        let id = doc.id;
        if registry.documents.contains_key(&id) {
            return Err(Error::internal(format!("Duplicate document id: {}", id)));
        }
        registry.order.push(id);
        registry.documents.insert(id, Arc::new(doc));
        Ok(id)
    }

    /// Get a document by ID
    pub fn get(&self, id: &Uuid) -> Result<Arc<Document>> {
        self.registry
            .read()
            .documents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))
    }

    /// All documents in insertion order
    pub fn list(&self) -> Vec<Arc<Document>> {
        let registry = self.registry.read();
        registry
            .order
            .iter()
            .filter_map(|id| registry.documents.get(id).cloned())
            .collect()
    }

    /// Remove a document and delete its backing file
    ///
    /// The record is removed even if the file deletion fails; that failure is
    /// only logged.
    pub async fn remove(&self, id: &Uuid) -> Result<Arc<Document>> {
        let doc = {
            let mut registry = self.registry.write();
            let doc = registry
                .documents
                .remove(id)
                .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
            registry.order.retain(|existing| existing != id);
            doc
        };

        if let Err(e) = self.blobs.delete(&doc.storage_path).await {
            tracing::warn!(
                "Removed document {} but failed to delete {} ({}): {}",
                id,
                doc.storage_path,
                self.blobs.name(),
                e
            );
        }

        Ok(doc)
    }

    /// Every stored text in insertion order, separated by a blank line
    pub fn all_text(&self) -> String {
        let registry = self.registry.read();
        registry
            .order
            .iter()
            .filter_map(|id| registry.documents.get(id))
            .map(|doc| doc.extracted_text.as_str())
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR)
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.registry.read().order.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The blob storage backing this store
    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Blob store whose deletes always fail
    struct FailingBlobs {
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl BlobStore for FailingBlobs {
        async fn store(&self, _: &Uuid, filename: &str, _: &[u8]) -> Result<String> {
            Ok(format!("/nowhere/{}", filename))
        }

        async fn delete(&self, _: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Err(Error::internal("disk on fire"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn store() -> (DocumentStore, Arc<FailingBlobs>) {
        let blobs = Arc::new(FailingBlobs {
            deletes: AtomicUsize::new(0),
        });
        (DocumentStore::new(blobs.clone()), blobs)
    }

    fn doc(name: &str, text: &str) -> Document {
        Document::new(
            name.to_string(),
            format!("/nowhere/{}", name),
            text.to_string(),
            1,
            text.as_bytes(),
        )
    }

    #[test]
    fn test_empty_store() {
        let (store, _) = store();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert_eq!(store.all_text(), "");
        assert!(matches!(
            store.get(&Uuid::new_v4()),
            Err(Error::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_insertion_order() {
        let (store, _) = store();
        let ids: Vec<Uuid> = ["one", "two", "three"]
            .iter()
            .map(|t| store.add(doc(&format!("{}.pdf", t), t)).unwrap())
            .collect();

        let listed: Vec<Uuid> = store.list().iter().map(|d| d.id).collect();
        assert_eq!(listed, ids);
        assert_eq!(store.all_text(), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_read_your_writes() {
        let (store, _) = store();
        let id = store.add(doc("a.pdf", "Chhapaiya")).unwrap();
        assert_eq!(store.get(&id).unwrap().extracted_text, "Chhapaiya");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (store, _) = store();
        let d = doc("a.pdf", "text");
        store.add(d.clone()).unwrap();
        assert!(store.add(d).is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_survives_blob_failure() {
        let (store, blobs) = store();
        let keep = store.add(doc("keep.pdf", "keep")).unwrap();
        let gone = store.add(doc("gone.pdf", "gone")).unwrap();

        let removed = store.remove(&gone).await.unwrap();
        assert_eq!(removed.id, gone);
        assert_eq!(blobs.deletes.load(Ordering::SeqCst), 1);

        assert!(store.get(&gone).is_err());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, keep);
        assert_eq!(store.all_text(), "keep");
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_found() {
        let (store, _) = store();
        let id = store.add(doc("a.pdf", "text")).unwrap();

        assert!(store.remove(&id).await.is_ok());
        assert!(matches!(
            store.remove(&id).await,
            Err(Error::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_adds_all_visible() {
        let (store, _) = store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        store.add(doc(&format!("{}-{}.pdf", i, j), "x")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 200);
        assert_eq!(store.list().len(), 200);
    }
}
