//! Groq chat-completion client (OpenAI-compatible API)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::completion::CompletionProvider;
use super::prompt::{ChatMessage, ChatPrompt};
use crate::config::LlmConfig;
use crate::error::{CompletionFailure, Result};

/// Groq API client
///
/// A single attempt per call; retry policy belongs to the caller.
pub struct GroqClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqClient {
    /// Create a new Groq client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/openai/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Classify a non-success HTTP response
fn classify_status(status: StatusCode, body: &str) -> CompletionFailure {
    let lower = body.to_lowercase();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionFailure::Authentication(format!("HTTP {}", status))
        }
        StatusCode::TOO_MANY_REQUESTS => CompletionFailure::RateLimited(format!("HTTP {}", status)),
        _ if lower.contains("api key") || lower.contains("api_key") => {
            CompletionFailure::Authentication(format!("HTTP {} - {}", status, body))
        }
        _ if lower.contains("rate limit") || lower.contains("rate_limit") => {
            CompletionFailure::RateLimited(format!("HTTP {} - {}", status, body))
        }
        _ => CompletionFailure::Other(format!("HTTP {} - {}", status, body)),
    }
}

/// Classify a transport-level failure
fn classify_transport(err: &reqwest::Error) -> CompletionFailure {
    if err.is_timeout() {
        CompletionFailure::Timeout
    } else {
        CompletionFailure::Network(err.to_string())
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(CompletionFailure::MissingCredential.into()),
        };

        let request = ChatRequest {
            model: &self.config.model,
            messages: &prompt.messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            stream: false,
        };

        tracing::info!("Generating answer with model: {}", self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body).into());
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionFailure::Other(format!("Failed to parse completion: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| CompletionFailure::Other("No response generated".to_string()).into())
    }

    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
