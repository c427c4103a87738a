//! Primary strategy: grounded completion, then translation if needed

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::completion::CompletionProvider;
use super::prompt::PromptBuilder;
use super::strategy::{AnswerInput, AnswerStrategy, StrategyOutcome, Unavailable};
use crate::error::CompletionFailure;
use crate::language::LanguageService;
use crate::types::LanguageTag;

/// Calls the completion capability with the grounded prompt
pub struct PrimaryCompletion {
    provider: Arc<dyn CompletionProvider>,
    languages: Arc<dyn LanguageService>,
    /// Language the model produces when not steered
    model_default: LanguageTag,
    completion_timeout: Duration,
    translation_timeout: Duration,
}

impl PrimaryCompletion {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        languages: Arc<dyn LanguageService>,
        model_default: LanguageTag,
        completion_timeout: Duration,
        translation_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            languages,
            model_default,
            completion_timeout,
            translation_timeout,
        }
    }

    /// Translate the answer when the model ignored the language instruction.
    /// Translation failures keep the untranslated answer.
    async fn localize(&self, answer: String, language: &LanguageTag) -> String {
        if *language == self.model_default {
            return answer;
        }

        if let Ok(Ok(detected)) =
            tokio::time::timeout(self.translation_timeout, self.languages.detect(&answer)).await
        {
            if detected == *language {
                return answer;
            }
        }

        match tokio::time::timeout(
            self.translation_timeout,
            self.languages.translate(&answer, language),
        )
        .await
        {
            Ok(Ok(translated)) => translated,
            Ok(Err(e)) => {
                tracing::warn!("Answer translation to '{}' failed: {}", language, e);
                answer
            }
            Err(_) => {
                tracing::warn!("Answer translation to '{}' timed out", language);
                answer
            }
        }
    }
}

#[async_trait]
impl AnswerStrategy for PrimaryCompletion {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_fallback(&self) -> bool {
        false
    }

    async fn attempt(
        &self,
        input: &AnswerInput,
        _: Option<&CompletionFailure>,
    ) -> StrategyOutcome {
        if !self.provider.is_configured() {
            return StrategyOutcome::Unavailable(Unavailable::Failed(
                CompletionFailure::MissingCredential,
            ));
        }

        let prompt = PromptBuilder::build(&input.question, &input.context, &input.language);

        let call = tokio::time::timeout(self.completion_timeout, self.provider.complete(&prompt));
        let failure = match call.await {
            Ok(Ok(answer)) if !answer.trim().is_empty() => {
                return StrategyOutcome::Success(self.localize(answer, &input.language).await)
            }
            Ok(Ok(_)) => CompletionFailure::Other("No response generated".to_string()),
            Ok(Err(e)) => CompletionFailure::from_error(e),
            Err(_) => CompletionFailure::Timeout,
        };

        StrategyOutcome::Unavailable(Unavailable::Failed(failure))
    }
}
