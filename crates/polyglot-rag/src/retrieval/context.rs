//! Bounded grounding context

use std::sync::Arc;

use crate::error::Result;
use crate::storage::DocumentStore;
use crate::types::DocumentSelector;

/// Grounding text handed to the answer generator, never longer than the
/// assembler's budget (in characters)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context(String);

impl Context {
    /// No grounding
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap text that is already within budget
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

/// Picks which part of a text survives the budget
pub trait ExcerptStrategy: Send + Sync {
    /// Return an excerpt of `text`; the assembler clamps anything longer than `budget`
    fn excerpt(&self, text: &str, budget: usize) -> String;
}

/// Keep the first `budget` characters (titles, abstracts, front matter)
#[derive(Debug, Default, Clone, Copy)]
pub struct LeadingExcerpt;

impl ExcerptStrategy for LeadingExcerpt {
    fn excerpt(&self, text: &str, budget: usize) -> String {
        truncate_chars(text, budget).to_string()
    }
}

/// Longest prefix of `text` with at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Builds context for a document selector
pub struct ContextAssembler {
    store: Arc<DocumentStore>,
    budget: usize,
    strategy: Arc<dyn ExcerptStrategy>,
}

impl ContextAssembler {
    /// Create an assembler with the leading-excerpt strategy
    pub fn new(store: Arc<DocumentStore>, budget: usize) -> Self {
        Self::with_strategy(store, budget, Arc::new(LeadingExcerpt))
    }

    /// Create an assembler with a custom excerpt strategy
    pub fn with_strategy(
        store: Arc<DocumentStore>,
        budget: usize,
        strategy: Arc<dyn ExcerptStrategy>,
    ) -> Self {
        Self {
            store,
            budget,
            strategy,
        }
    }

    /// Character budget
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Build the context for a selector
    ///
    /// Fails only when a single-document selector names an unknown document.
    pub fn build_context(&self, selector: &DocumentSelector) -> Result<Context> {
        let text = match selector {
            DocumentSelector::None => return Ok(Context::empty()),
            DocumentSelector::One(id) => {
                let doc = self.store.get(id)?;
                self.strategy.excerpt(&doc.extracted_text, self.budget)
            }
            DocumentSelector::All => self.strategy.excerpt(&self.store.all_text(), self.budget),
        };

        Ok(Context(truncate_chars(&text, self.budget).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::LocalBlobStore;
    use crate::types::Document;
    use uuid::Uuid;

    fn store_with(texts: &[&str]) -> (Arc<DocumentStore>, Vec<Uuid>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(LocalBlobStore::new(dir.path().to_path_buf()).unwrap());
        let store = Arc::new(DocumentStore::new(blobs));
        let ids = texts
            .iter()
            .map(|t| {
                store
                    .add(Document::new("d.pdf".into(), "p".into(), t.to_string(), 1, t.as_bytes()))
                    .unwrap()
            })
            .collect();
        (store, ids, dir)
    }

    #[test]
    fn test_none_selector_is_empty() {
        let (store, _, _dir) = store_with(&["abc"]);
        let ctx = ContextAssembler::new(store, 10)
            .build_context(&DocumentSelector::None)
            .unwrap();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_single_document_truncated_from_start() {
        let (store, ids, _dir) = store_with(&["abcdefghij", "zzz"]);
        let ctx = ContextAssembler::new(store, 4)
            .build_context(&DocumentSelector::One(ids[0]))
            .unwrap();
        assert_eq!(ctx.as_str(), "abcd");
    }

    #[test]
    fn test_all_concatenates_then_truncates() {
        let (store, _, _dir) = store_with(&["one", "two", "three"]);
        let assembler = ContextAssembler::new(store, 8);

        let ctx = assembler.build_context(&DocumentSelector::All).unwrap();
        assert_eq!(ctx.as_str(), "one\n\ntwo");
        assert!(ctx.char_len() <= assembler.budget());
    }

    #[test]
    fn test_unknown_document_not_found() {
        let (store, _, _dir) = store_with(&[]);
        let err = ContextAssembler::new(store, 10)
            .build_context(&DocumentSelector::One(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        // Gujarati: multi-byte characters must not be split
        let (store, ids, _dir) = store_with(&["છપૈયા ગામ"]);
        let ctx = ContextAssembler::new(store, 3)
            .build_context(&DocumentSelector::One(ids[0]))
            .unwrap();
        assert_eq!(ctx.char_len(), 3);
        assert_eq!(ctx.as_str(), "છપૈ");
    }

    #[test]
    fn test_budget_holds_for_every_selector() {
        let long = "x".repeat(5000);
        let (store, ids, _dir) = store_with(&[long.as_str(), long.as_str(), "short"]);
        let assembler = ContextAssembler::new(store, 3000);

        for selector in [
            DocumentSelector::None,
            DocumentSelector::One(ids[0]),
            DocumentSelector::One(ids[2]),
            DocumentSelector::All,
        ] {
            assert!(assembler.build_context(&selector).unwrap().char_len() <= 3000);
        }
    }

    #[test]
    fn test_oversized_strategy_output_is_clamped() {
        struct Greedy;
        impl ExcerptStrategy for Greedy {
            fn excerpt(&self, text: &str, _: usize) -> String {
                text.repeat(3)
            }
        }

        let (store, ids, _dir) = store_with(&["abcdef"]);
        let ctx = ContextAssembler::with_strategy(store, 5, Arc::new(Greedy))
            .build_context(&DocumentSelector::One(ids[0]))
            .unwrap();
        assert_eq!(ctx.char_len(), 5);
    }
}
