//! Completion provider trait for generating answers

use async_trait::async_trait;

use super::prompt::ChatPrompt;
use crate::error::Result;

/// Trait for chat-completion backends
///
/// Errors should be `Error::Completion` with a classified
/// `CompletionFailure`; anything else is treated as unclassified.
///
/// Implementations:
/// - `GroqClient`: Groq's OpenAI-compatible API
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the prompt
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String>;

    /// Whether a credential is configured
    fn is_configured(&self) -> bool;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
