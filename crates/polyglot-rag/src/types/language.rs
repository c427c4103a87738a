//! Language tags and the supported-language table

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Languages offered to clients, as `(code, display name)`
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("gu", "ગુજરાતી (Gujarati)"),
    ("hi", "हिन्दी (Hindi)"),
    ("es", "Español (Spanish)"),
    ("fr", "Français (French)"),
    ("de", "Deutsch (German)"),
    ("zh", "中文 (Chinese)"),
    ("ja", "日本語 (Japanese)"),
    ("ar", "العربية (Arabic)"),
    ("pt", "Português (Portuguese)"),
];

/// A bare ISO 639 language code, lowercase
///
/// Region-qualified input (`en-IN`, `zh_CN`) is reduced to its primary
/// subtag when parsed, so every tag inside the service has one shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parse and normalize a language tag
    pub fn parse(raw: &str) -> Result<Self> {
        let primary = raw
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let valid = (2..=3).contains(&primary.len())
            && primary.chars().all(|c| c.is_ascii_lowercase());
        if !valid {
            return Err(Error::validation(format!("Invalid language tag: '{}'", raw)));
        }

        Ok(Self(primary))
    }

    /// English
    pub fn english() -> Self {
        Self("en".to_string())
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name, falling back to the code itself
    pub fn display_name(&self) -> &str {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

/// How the question's language should be determined
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageHint {
    /// Detect from the question text
    #[default]
    Auto,
    /// Use this language verbatim
    Explicit(LanguageTag),
}

impl LanguageHint {
    /// Parse a client-supplied hint; absent, empty, and `"auto"` all mean auto
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Auto),
            Some(s) if s.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            Some(s) => LanguageTag::parse(s).map(Self::Explicit),
        }
    }
}
