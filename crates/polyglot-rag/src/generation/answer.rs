//! Answer generator: runs the strategy chain and shapes the result

use chrono::Utc;
use std::sync::Arc;

use super::completion::CompletionProvider;
use super::fallback::{CannedAnswers, FailureNotice};
use super::primary::PrimaryCompletion;
use super::strategy::{AnswerInput, StrategyChain};
use crate::config::RagConfig;
use crate::error::{FailureCategory, Result};
use crate::language::LanguageService;
use crate::retrieval::Context;
use crate::types::{AnswerResult, LanguageTag};

/// Produces an answer for every question, degraded or not
pub struct AnswerGenerator {
    chain: StrategyChain,
    notice: FailureNotice,
}

impl AnswerGenerator {
    /// Primary completion, then canned topics, then the failure notice
    pub fn from_config(
        provider: Arc<dyn CompletionProvider>,
        languages: Arc<dyn LanguageService>,
        config: &RagConfig,
    ) -> Result<Self> {
        let fallback = LanguageTag::parse(&config.language.fallback)?;
        let model_default = LanguageTag::parse(&config.language.model_default)?;

        let primary = PrimaryCompletion::new(
            provider,
            languages,
            model_default,
            config.llm.timeout(),
            config.translation.timeout(),
        );

        let chain = StrategyChain::new()
            .then(Arc::new(primary))
            .then(Arc::new(CannedAnswers::new(fallback.clone())))
            .then(Arc::new(FailureNotice::new(fallback.clone())));

        Ok(Self::with_chain(chain, fallback))
    }

    pub fn with_chain(chain: StrategyChain, fallback: LanguageTag) -> Self {
        Self {
            chain,
            notice: FailureNotice::new(fallback),
        }
    }

    pub fn strategies(&self) -> Vec<&str> {
        self.chain.names()
    }

    /// Answer a question; never fails
    pub async fn answer(
        &self,
        question: &str,
        context: Context,
        language: LanguageTag,
    ) -> AnswerResult {
        let input = AnswerInput {
            question: question.to_string(),
            context,
            language,
        };

        let (answer_text, degraded, degraded_reason) = match self.chain.run(&input).await {
            Some(outcome) => {
                let reason = if outcome.degraded {
                    Some(
                        outcome
                            .cause
                            .as_ref()
                            .map(|c| c.category())
                            .unwrap_or(FailureCategory::Transient),
                    )
                } else {
                    None
                };
                tracing::info!(
                    "Answered via '{}' (degraded: {}, language: {})",
                    outcome.strategy,
                    outcome.degraded,
                    input.language
                );
                (outcome.text, outcome.degraded, reason)
            }
            None => {
                tracing::warn!("No strategy produced an answer");
                let category = FailureCategory::Transient;
                (
                    self.notice.message(category, &input.language).to_string(),
                    true,
                    Some(category),
                )
            }
        };

        AnswerResult {
            question_text: input.question,
            answer_text,
            resolved_language: input.language,
            degraded,
            degraded_reason,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompletionFailure, Error};
    use crate::generation::prompt::{ChatPrompt, Role};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Text(&'static str),
        Fail(CompletionFailure),
        Unconfigured,
        Hang,
    }

    struct StubCompletion {
        reply: Reply,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<ChatPrompt>>,
    }

    impl StubCompletion {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for StubCompletion {
        async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock() = Some(prompt.clone());
            match &self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail(failure) => Err(failure.clone().into()),
                Reply::Unconfigured => Err(CompletionFailure::MissingCredential.into()),
                Reply::Hang => std::future::pending().await,
            }
        }

        fn is_configured(&self) -> bool {
            !matches!(self.reply, Reply::Unconfigured)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    enum Translate {
        /// Prefix the text with the target tag
        Prefix,
        Fail,
        Hang,
    }

    /// Detects everything as English
    struct StubLanguages {
        translate: Translate,
        translations: AtomicUsize,
    }

    impl StubLanguages {
        fn new(translate: Translate) -> Arc<Self> {
            Arc::new(Self {
                translate,
                translations: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LanguageService for StubLanguages {
        async fn detect(&self, _text: &str) -> Result<LanguageTag> {
            Ok(LanguageTag::english())
        }

        async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String> {
            self.translations.fetch_add(1, Ordering::SeqCst);
            match self.translate {
                Translate::Prefix => Ok(format!("[{}] {}", target, text)),
                Translate::Fail => Err(Error::translation("unreachable")),
                Translate::Hang => std::future::pending().await,
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn generator(
        completion: Arc<StubCompletion>,
        languages: Arc<StubLanguages>,
    ) -> AnswerGenerator {
        generator_with(completion, languages, &RagConfig::default())
    }

    fn generator_with(
        completion: Arc<StubCompletion>,
        languages: Arc<StubLanguages>,
        config: &RagConfig,
    ) -> AnswerGenerator {
        AnswerGenerator::from_config(completion, languages, config).unwrap()
    }

    /// Smallest configurable outbound timeouts
    fn short_timeouts() -> RagConfig {
        let mut config = RagConfig::default();
        config.llm.timeout_secs = 1;
        config.translation.timeout_secs = 1;
        config
    }

    fn tag(code: &str) -> LanguageTag {
        LanguageTag::parse(code).unwrap()
    }

    #[tokio::test]
    async fn test_primary_answer_not_degraded() {
        let completion = StubCompletion::new(Reply::Text("Chhapaiya"));
        let gen = generator(completion.clone(), StubLanguages::new(Translate::Prefix));

        let result = gen
            .answer(
                "Where was Swaminarayan born?",
                Context::new("Swaminarayan was born in Chhapaiya."),
                LanguageTag::english(),
            )
            .await;

        assert_eq!(result.answer_text, "Chhapaiya");
        assert!(!result.degraded);
        assert!(result.degraded_reason.is_none());

        let prompt = completion.last_prompt.lock().clone().unwrap();
        assert!(prompt.messages.iter().any(|m| {
            m.role == Role::System && m.content.contains("Swaminarayan was born in Chhapaiya.")
        }));
    }

    #[tokio::test]
    async fn test_answer_translated_to_requested_language() {
        let languages = StubLanguages::new(Translate::Prefix);
        let gen = generator(StubCompletion::new(Reply::Text("Paris")), languages.clone());

        let result = gen.answer("Capitale ?", Context::empty(), tag("fr")).await;
        assert_eq!(result.answer_text, "[fr] Paris");
        assert_eq!(result.resolved_language, tag("fr"));
        assert_eq!(languages.translations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_translation_failure_keeps_answer() {
        let gen = generator(
            StubCompletion::new(Reply::Text("Paris")),
            StubLanguages::new(Translate::Fail),
        );
        let result = gen.answer("Capitale ?", Context::empty(), tag("fr")).await;
        assert_eq!(result.answer_text, "Paris");
        assert!(!result.degraded);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let completion = StubCompletion::new(Reply::Unconfigured);
        let gen = generator(completion.clone(), StubLanguages::new(Translate::Prefix));

        let result = gen.answer("What is Rust?", Context::empty(), LanguageTag::english()).await;
        assert!(result.degraded);
        assert_eq!(result.degraded_reason, Some(FailureCategory::Misconfigured));
        assert!(!result.answer_text.is_empty());
        assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_canned_topic_when_degraded() {
        let gen = generator(
            StubCompletion::new(Reply::Fail(CompletionFailure::Network("refused".into()))),
            StubLanguages::new(Translate::Prefix),
        );

        let result = gen
            .answer("Swaminarayan no janma kya thayo?", Context::empty(), tag("gu"))
            .await;
        assert!(result.degraded);
        assert_eq!(result.degraded_reason, Some(FailureCategory::Transient));
        assert!(result.answer_text.contains("Chhapaiya"));
    }

    #[tokio::test]
    async fn test_auth_and_rate_limit_are_distinguishable() {
        let auth = generator(
            StubCompletion::new(Reply::Fail(CompletionFailure::Authentication("401".into()))),
            StubLanguages::new(Translate::Prefix),
        );
        let limited = generator(
            StubCompletion::new(Reply::Fail(CompletionFailure::RateLimited("429".into()))),
            StubLanguages::new(Translate::Prefix),
        );

        let a = auth.answer("What is Rust?", Context::empty(), LanguageTag::english()).await;
        let r = limited.answer("What is Rust?", Context::empty(), LanguageTag::english()).await;

        assert_eq!(a.degraded_reason, Some(FailureCategory::Misconfigured));
        assert_eq!(r.degraded_reason, Some(FailureCategory::RateLimited));
        assert_ne!(a.answer_text, r.answer_text);
    }

    #[tokio::test]
    async fn test_empty_chain_still_answers() {
        let gen = AnswerGenerator::with_chain(StrategyChain::new(), LanguageTag::english());
        let result = gen.answer("q", Context::empty(), tag("es")).await;
        assert!(result.degraded);
        assert!(!result.answer_text.is_empty());
    }

    #[tokio::test]
    async fn test_blank_completion_degrades() {
        let completion = StubCompletion::new(Reply::Text("   "));
        let gen = generator(completion.clone(), StubLanguages::new(Translate::Prefix));

        let result = gen.answer("What is Rust?", Context::empty(), LanguageTag::english()).await;
        assert!(result.degraded);
        assert_eq!(result.degraded_reason, Some(FailureCategory::Transient));
        assert!(!result.answer_text.trim().is_empty());
        assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hanging_completion_times_out() {
        let gen = generator_with(
            StubCompletion::new(Reply::Hang),
            StubLanguages::new(Translate::Prefix),
            &short_timeouts(),
        );

        let result = gen.answer("What is Rust?", Context::empty(), LanguageTag::english()).await;
        assert!(result.degraded);
        assert_eq!(result.degraded_reason, Some(FailureCategory::Transient));
        assert!(!result.answer_text.is_empty());
    }

    #[tokio::test]
    async fn test_hanging_translation_keeps_answer() {
        let languages = StubLanguages::new(Translate::Hang);
        let gen = generator_with(
            StubCompletion::new(Reply::Text("Paris")),
            languages.clone(),
            &short_timeouts(),
        );

        let result = gen.answer("Capitale ?", Context::empty(), tag("fr")).await;
        assert_eq!(result.answer_text, "Paris");
        assert!(!result.degraded);
        assert_eq!(languages.translations.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_chain_order() {
        let gen = generator(
            StubCompletion::new(Reply::Text("x")),
            StubLanguages::new(Translate::Prefix),
        );
        assert_eq!(gen.strategies(), vec!["stub", "canned-topic", "failure-notice"]);
    }
}
