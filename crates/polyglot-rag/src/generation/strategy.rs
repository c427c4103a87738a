//! Ordered answer strategies and the combinator that runs them

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CompletionFailure;
use crate::retrieval::Context;
use crate::types::LanguageTag;

/// Everything a strategy may use to answer
#[derive(Debug, Clone)]
pub struct AnswerInput {
    pub question: String,
    pub context: Context,
    pub language: LanguageTag,
}

/// Why a strategy produced nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The strategy tried and the completion capability failed
    Failed(CompletionFailure),
    /// The strategy has nothing to offer for this input
    NotApplicable,
}

/// Tagged result of one strategy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Success(String),
    Unavailable(Unavailable),
}

/// One stage of the answer chain
#[async_trait]
pub trait AnswerStrategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Whether an answer from this strategy counts as degraded
    fn is_fallback(&self) -> bool;

    /// Try to answer; `cause` is the first failure seen earlier in the chain
    async fn attempt(
        &self,
        input: &AnswerInput,
        cause: Option<&CompletionFailure>,
    ) -> StrategyOutcome;
}

/// Which strategy answered, and what went wrong before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    pub text: String,
    pub strategy: String,
    pub degraded: bool,
    pub cause: Option<CompletionFailure>,
}

/// Tries strategies in order and stops at the first success
#[derive(Default)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn AnswerStrategy>>,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy to the end of the chain
    pub fn then(mut self, strategy: Arc<dyn AnswerStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Strategy names in order
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain; `None` only if every strategy was unavailable
    pub async fn run(&self, input: &AnswerInput) -> Option<ChainOutcome> {
        let mut cause: Option<CompletionFailure> = None;

        for strategy in &self.strategies {
            match strategy.attempt(input, cause.as_ref()).await {
                StrategyOutcome::Success(text) => {
                    return Some(ChainOutcome {
                        text,
                        strategy: strategy.name().to_string(),
                        degraded: strategy.is_fallback(),
                        cause,
                    });
                }
                StrategyOutcome::Unavailable(Unavailable::Failed(failure)) => {
                    tracing::warn!("Strategy '{}' failed: {}", strategy.name(), failure);
                    cause.get_or_insert(failure);
                }
                StrategyOutcome::Unavailable(Unavailable::NotApplicable) => {
                    tracing::debug!("Strategy '{}' not applicable", strategy.name());
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        name: &'static str,
        outcome: StrategyOutcome,
        fallback: bool,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, outcome: StrategyOutcome, fallback: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome,
                fallback,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AnswerStrategy for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn is_fallback(&self) -> bool {
            self.fallback
        }

        async fn attempt(&self, _: &AnswerInput, _: Option<&CompletionFailure>) -> StrategyOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn input() -> AnswerInput {
        AnswerInput {
            question: "q".to_string(),
            context: Context::empty(),
            language: LanguageTag::english(),
        }
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let first = Fixed::new("first", StrategyOutcome::Success("a".into()), false);
        let second = Fixed::new("second", StrategyOutcome::Success("b".into()), true);

        let outcome = StrategyChain::new()
            .then(first.clone())
            .then(second.clone())
            .run(&input())
            .await
            .unwrap();

        assert_eq!(outcome.text, "a");
        assert!(!outcome.degraded);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_cause_is_carried_forward() {
        let failing = Fixed::new(
            "primary",
            StrategyOutcome::Unavailable(Unavailable::Failed(CompletionFailure::Timeout)),
            false,
        );
        let skip = Fixed::new(
            "canned",
            StrategyOutcome::Unavailable(Unavailable::NotApplicable),
            true,
        );
        let last = Fixed::new("notice", StrategyOutcome::Success("sorry".into()), true);

        let chain = StrategyChain::new().then(failing).then(skip).then(last);
        assert_eq!(chain.names(), vec!["primary", "canned", "notice"]);

        let outcome = chain.run(&input()).await.unwrap();
        assert_eq!(outcome.strategy, "notice");
        assert!(outcome.degraded);
        assert_eq!(outcome.cause, Some(CompletionFailure::Timeout));
    }

    #[tokio::test]
    async fn test_all_unavailable() {
        let skip = Fixed::new(
            "skip",
            StrategyOutcome::Unavailable(Unavailable::NotApplicable),
            true,
        );
        assert!(StrategyChain::new().then(skip).run(&input()).await.is_none());
    }
}
