//! Question request types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::language::LanguageHint;
use crate::error::{Error, Result};

/// Which stored documents contribute context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentSelector {
    /// No context; general-knowledge answering
    #[default]
    None,
    /// A single document
    One(Uuid),
    /// Every stored document, in insertion order
    All,
}

impl DocumentSelector {
    /// Parse a client-supplied selector: absent/empty, `"all"`, or a document ID
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::None),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(s) => Uuid::parse_str(s)
                .map(Self::One)
                .map_err(|_| Error::validation(format!("Invalid document selector: '{}'", s))),
        }
    }
}

/// Question request body as sent by clients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    /// The question to answer
    #[serde(default, alias = "question")]
    pub question_text: String,

    /// Language tag or "auto" (default: auto)
    #[serde(default, alias = "language")]
    pub language_hint: Option<String>,

    /// Document ID, "all", or absent
    #[serde(default, alias = "fileId")]
    pub document_selector: Option<String>,

    /// Recorded audio; the question already carries its transcription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<String>,
}

/// A validated question, ready for the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub language_hint: LanguageHint,
    pub selector: DocumentSelector,
}

impl TryFrom<QuestionRequest> for Question {
    type Error = Error;

    fn try_from(request: QuestionRequest) -> Result<Self> {
        let text = request.question_text.trim();
        if text.is_empty() {
            return Err(Error::validation("Question is required"));
        }

        Ok(Self {
            text: text.to_string(),
            language_hint: LanguageHint::parse(request.language_hint.as_deref())?,
            selector: DocumentSelector::parse(request.document_selector.as_deref())?,
        })
    }
}
