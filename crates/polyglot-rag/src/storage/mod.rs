//! Document registry and upload storage

pub mod blob;
pub mod document_store;

pub use blob::{BlobStore, LocalBlobStore};
pub use document_store::DocumentStore;
