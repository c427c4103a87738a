//! Answer generation: grounded completion with a fallback chain

mod answer;
mod completion;
mod fallback;
mod groq;
mod primary;
pub mod prompt;
mod strategy;

pub use answer::AnswerGenerator;
pub use completion::CompletionProvider;
pub use fallback::{CannedAnswers, CannedTopic, FailureNotice, CANNED_TOPICS, FAILURE_NOTICES};
pub use groq::GroqClient;
pub use primary::PrimaryCompletion;
pub use prompt::{ChatMessage, ChatPrompt, PromptBuilder, Role};
pub use strategy::{
    AnswerInput, AnswerStrategy, ChainOutcome, StrategyChain, StrategyOutcome, Unavailable,
};
