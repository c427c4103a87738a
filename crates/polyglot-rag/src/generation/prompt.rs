//! Prompt templates for answer generation

use serde::{Deserialize, Serialize};

use crate::retrieval::Context;
use crate::types::LanguageTag;

/// Fixed system instruction establishing tone and scope
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that answers questions accurately and concisely. \
If context from documents is provided, use it to answer the question. \
If the context does not contain the answer, say so briefly and answer from general knowledge only when you are confident.";

/// Chat role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Ordered messages sent to the completion capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub messages: Vec<ChatMessage>,
}

/// Prompt builder for grounded questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the chat prompt: system instruction, context (when present),
    /// answer-language instruction, then the question
    pub fn build(question: &str, context: &Context, language: &LanguageTag) -> ChatPrompt {
        let mut messages = vec![ChatMessage::system(SYSTEM_INSTRUCTION)];

        if !context.is_empty() {
            messages.push(ChatMessage::system(format!(
                "Context from uploaded documents:\n{}",
                context.as_str()
            )));
        }

        messages.push(ChatMessage::system(Self::language_instruction(language)));
        messages.push(ChatMessage::user(question));

        ChatPrompt { messages }
    }

    /// Explicit instruction naming the answer language
    pub fn language_instruction(language: &LanguageTag) -> String {
        format!(
            "Respond only in {} (language code: {}), regardless of the language of the context.",
            language.display_name(),
            language
        )
    }
}
