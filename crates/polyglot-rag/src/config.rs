//! Configuration for the Q&A service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "POLYGLOT_RAG_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Completion provider (Groq) configuration
    pub llm: LlmConfig,
    /// Translation service configuration
    pub translation: TranslationConfig,
    /// Language defaults
    pub language: LanguageConfig,
    /// Context assembly configuration
    pub context: ContextConfig,
    /// Ingestion configuration
    pub ingestion: IngestionConfig,
}

impl RagConfig {
    /// Load configuration: optional TOML file, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML config file; missing sections take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("GROQ_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("GROQ_MODEL") {
            self.llm.model = model;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.server.port = port;
        }
        if let Some(size) = parse_var(&lookup, "MAX_UPLOAD_SIZE")? {
            self.server.max_upload_size = size;
        }
        if let Some(budget) = parse_var(&lookup, "CONTEXT_BUDGET")? {
            self.context.budget_chars = budget;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "REQUEST_TIMEOUT_SECS")? {
            self.llm.timeout_secs = secs;
            self.translation.timeout_secs = secs;
            self.ingestion.extraction_timeout_secs = secs;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.ingestion.upload_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("TRANSLATE_BASE_URL") {
            self.translation.base_url = url;
        }
        if let Some(lang) = lookup("FALLBACK_LANGUAGE") {
            self.language.fallback = lang;
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {}='{}': {}", key, raw, e))),
        None => Ok(None),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            max_upload_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Completion provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// API key; `None` means the completion capability is not configured
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Nucleus sampling
    pub top_p: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Whether a credential is present
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com".to_string(),
            api_key: None,
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 1.0,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Base URL of the translate endpoint host
    pub base_url: String,
    /// Request timeout in seconds (applies to detection too)
    pub timeout_secs: u64,
}

impl TranslationConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Language defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Language used when auto-detection fails
    pub fallback: String,
    /// Language the model answers in when not told otherwise
    pub model_default: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            fallback: "en".to_string(),
            model_default: "en".to_string(),
        }
    }
}

/// Context assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Maximum context length in characters
    pub budget_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { budget_chars: 3000 }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Directory uploaded files are written to
    pub upload_dir: PathBuf,
    /// Timeout for text extraction in seconds
    pub extraction_timeout_secs: u64,
    /// The single accepted MIME type
    pub accepted_mime: String,
}

impl IngestionConfig {
    /// Extraction timeout
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            extraction_timeout_secs: 60,
            accepted_mime: "application/pdf".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_have_no_credential() {
        let config = RagConfig::default();
        assert!(!config.llm.is_configured());
        assert_eq!(config.context.budget_chars, 3000);
        assert_eq!(config.server.max_upload_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RagConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("GROQ_API_KEY", "gsk_test"),
                ("PORT", "8088"),
                ("CONTEXT_BUDGET", "500"),
                ("REQUEST_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();

        assert!(config.llm.is_configured());
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.context.budget_chars, 500);
        assert_eq!(config.translation.timeout_secs, 5);
        assert_eq!(config.ingestion.extraction_timeout_secs, 5);
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let mut config = RagConfig::default();
        config
            .apply_overrides(lookup_from(&[("GROQ_API_KEY", "  ")]))
            .unwrap();
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn test_bad_numeric_override_is_config_error() {
        let mut config = RagConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_partial_toml() {
        let config: RagConfig = toml::from_str("[context]\nbudget_chars = 42\n").unwrap();
        assert_eq!(config.context.budget_chars, 42);
        assert_eq!(config.language.fallback, "en");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut llm = LlmConfig::default();
        llm.api_key = Some("gsk_secret".to_string());
        let printed = format!("{:?}", llm);
        assert!(!printed.contains("gsk_secret"));
        assert!(printed.contains("<redacted>"));
    }
}
