//! Language detection, translation, and per-request language resolution

mod google;
mod resolver;

pub use google::GoogleTranslateClient;
pub use resolver::LanguageResolver;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::LanguageTag;

/// Trait for the external detection/translation capability
///
/// Implementations:
/// - `GoogleTranslateClient`: public translate endpoint
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Detect the language of a text
    async fn detect(&self, text: &str) -> Result<LanguageTag>;

    /// Translate a text into the target language
    async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String>;

    /// Get service name for logging
    fn name(&self) -> &str;
}
