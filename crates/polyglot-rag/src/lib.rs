//! polyglot-rag: multilingual question answering over uploaded PDFs
//!
//! Uploaded PDFs are stored and their text extracted. Questions are answered
//! by an external completion model grounded in that text, in the language the
//! question was asked in. Answers degrade to curated or localized fallback
//! messages instead of failing when the model is unavailable.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod language;
pub mod pipeline;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{CompletionFailure, Error, FailureCategory, Result};
pub use types::{AnswerResult, Document, DocumentSelector, LanguageHint, LanguageTag, Question};
