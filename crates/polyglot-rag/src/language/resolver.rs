//! Resolves the language an answer must be produced in

use std::sync::Arc;
use std::time::Duration;

use super::LanguageService;
use crate::types::{LanguageHint, LanguageTag};

/// Turns a language hint into a concrete tag; never fails
pub struct LanguageResolver {
    service: Arc<dyn LanguageService>,
    fallback: LanguageTag,
    timeout: Duration,
}

impl LanguageResolver {
    pub fn new(
        service: Arc<dyn LanguageService>,
        fallback: LanguageTag,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            fallback,
            timeout,
        }
    }

    /// Explicit hints pass through untouched; `Auto` asks the detector and
    /// degrades to the fallback language on error or timeout
    pub async fn resolve(&self, question: &str, hint: &LanguageHint) -> LanguageTag {
        match hint {
            LanguageHint::Explicit(tag) => tag.clone(),
            LanguageHint::Auto => {
                match tokio::time::timeout(self.timeout, self.service.detect(question)).await {
                    Ok(Ok(detected)) => {
                        tracing::debug!(
                            "Detected language '{}' via {}",
                            detected,
                            self.service.name()
                        );
                        detected
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            "Language detection failed, using '{}': {}",
                            self.fallback,
                            e
                        );
                        self.fallback.clone()
                    }
                    Err(_) => {
                        tracing::warn!(
                            "Language detection timed out after {:?}, using '{}'",
                            self.timeout,
                            self.fallback
                        );
                        self.fallback.clone()
                    }
                }
            }
        }
    }
}
