//! Core types for the Q&A service

pub mod document;
pub mod language;
pub mod query;
pub mod response;

pub use document::Document;
pub use language::{LanguageHint, LanguageTag};
pub use query::{DocumentSelector, Question, QuestionRequest};
pub use response::AnswerResult;
