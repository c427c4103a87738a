//! Google Translate (`translate_a/single`, gtx client) detection and translation

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::LanguageService;
use crate::config::TranslationConfig;
use crate::error::{Error, Result};
use crate::types::LanguageTag;

/// Translation client for the public gtx endpoint
pub struct GoogleTranslateClient {
    client: Client,
    base_url: String,
}

/// Parsed gtx response
#[derive(Debug, PartialEq)]
struct GtxResponse {
    text: String,
    source_language: Option<String>,
}

impl GoogleTranslateClient {
    /// Create a new client
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call(&self, text: &str, target: &str) -> Result<GtxResponse> {
        let url = format!("{}/translate_a/single", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::translation(format!(
                "translate endpoint returned HTTP {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_gtx(&body)
    }
}

/// The gtx payload is positional: `[[[translated, original, ...], ...], null, "src", ...]`
fn parse_gtx(body: &Value) -> Result<GtxResponse> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::translation("unexpected translate response shape"))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let source_language = body.get(2).and_then(Value::as_str).map(str::to_string);

    Ok(GtxResponse {
        text,
        source_language,
    })
}

#[async_trait]
impl LanguageService for GoogleTranslateClient {
    async fn detect(&self, text: &str) -> Result<LanguageTag> {
        let response = self
            .call(text, "en")
            .await
            .map_err(|e| Error::detection(e.to_string()))?;

        let detected = response
            .source_language
            .ok_or_else(|| Error::detection("no source language in response"))?;

        LanguageTag::parse(&detected).map_err(|e| Error::detection(e.to_string()))
    }

    async fn translate(&self, text: &str, target: &LanguageTag) -> Result<String> {
        let response = self
            .call(text, target.as_str())
            .await
            .map_err(|e| match e {
                e @ Error::Translation(_) => e,
                other => Error::translation(other.to_string()),
            })?;

        if response.text.trim().is_empty() {
            return Err(Error::translation("empty translation"));
        }
        Ok(response.text)
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_segments_and_source() {
        let body = json!([
            [["Where was ", "ક્યાં ", null, null, 10], ["he born?", "જન્મ્યા?", null, null, 10]],
            null,
            "gu",
            null
        ]);

        let parsed = parse_gtx(&body).unwrap();
        assert_eq!(parsed.text, "Where was he born?");
        assert_eq!(parsed.source_language.as_deref(), Some("gu"));
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(parse_gtx(&json!({"error": "nope"})).is_err());
    }
}
