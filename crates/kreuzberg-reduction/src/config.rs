//! Reduction configuration.
//!
//! [`ReductionConfig`] is normally assembled by an outer configuration layer and handed to the
//! reduction engine fully formed. The loaders here exist for that layer's convenience: they parse
//! TOML or JSON and validate the result, but never discover or write configuration files.

use crate::stopwords::{MAX_CUSTOM_LANGUAGES, MAX_CUSTOM_WORDS_PER_LANGUAGE};
use crate::{ReductionError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

static LANGUAGE_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("Language code regex pattern is valid and should compile"));

/// Returns `true` when `code` consists solely of ASCII letters, digits and hyphens.
pub(crate) fn is_valid_language_code(code: &str) -> bool {
    LANGUAGE_CODE_REGEX.is_match(code)
}

/// How aggressively text is reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMode {
    /// Return the input unchanged.
    #[default]
    Off,
    /// Formatting cleanup only: comments, punctuation runs, whitespace.
    Light,
    /// Light cleanup followed by stopword filtering.
    Moderate,
}

impl ReductionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReductionMode::Off => "off",
            ReductionMode::Light => "light",
            ReductionMode::Moderate => "moderate",
        }
    }
}

impl fmt::Display for ReductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReductionMode {
    type Err = ReductionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(ReductionMode::Off),
            "light" => Ok(ReductionMode::Light),
            "moderate" => Ok(ReductionMode::Moderate),
            other => Err(ReductionError::validation(format!(
                "Invalid reduction mode '{}': expected one of off, light, moderate",
                other
            ))),
        }
    }
}

/// Token reduction configuration.
///
/// # Example
///
/// ```rust
/// use kreuzberg_reduction::{ReductionConfig, ReductionMode};
///
/// let config = ReductionConfig::new(ReductionMode::Moderate)
///     .with_preserve_markdown(true)
///     .with_language_hint("de");
///
/// assert_eq!(config.mode, ReductionMode::Moderate);
/// assert_eq!(config.language_hint.as_deref(), Some("de"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Reduction mode: "off", "light" or "moderate"
    #[serde(default)]
    pub mode: ReductionMode,

    /// Pass headings, lists, tables and fenced code through untouched
    #[serde(default)]
    pub preserve_markdown: bool,

    /// Stopword language used when the caller does not pass one explicitly
    #[serde(default)]
    pub language_hint: Option<String>,

    /// Extra stopwords per language, merged with the store's set at reduction time
    #[serde(default)]
    pub custom_stopwords: HashMap<String, HashSet<String>>,
}

impl ReductionConfig {
    pub fn new(mode: ReductionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_preserve_markdown(mut self, preserve_markdown: bool) -> Self {
        self.preserve_markdown = preserve_markdown;
        self
    }

    pub fn with_language_hint(mut self, language: impl Into<String>) -> Self {
        self.language_hint = Some(language.into());
        self
    }

    pub fn with_custom_stopwords<I, S>(mut self, language: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_stopwords
            .entry(language.into())
            .or_default()
            .extend(words.into_iter().map(Into::into));
        self
    }

    /// Check the invariants an externally loaded configuration must satisfy.
    ///
    /// # Errors
    ///
    /// Returns `ReductionError::Validation` when the language hint or a custom stopword
    /// language is malformed, or when custom stopwords exceed the overlay limits.
    pub fn validate(&self) -> Result<()> {
        if let Some(hint) = &self.language_hint
            && !is_valid_language_code(hint)
        {
            return Err(ReductionError::validation(format!(
                "Invalid language code format: {}",
                hint
            )));
        }

        if self.custom_stopwords.len() > MAX_CUSTOM_LANGUAGES {
            return Err(ReductionError::validation(format!(
                "Too many custom stopword languages: {} (max {})",
                self.custom_stopwords.len(),
                MAX_CUSTOM_LANGUAGES
            )));
        }

        for (language, words) in &self.custom_stopwords {
            if !is_valid_language_code(language) {
                return Err(ReductionError::validation(format!(
                    "Invalid language code format: {}",
                    language
                )));
            }
            if words.len() > MAX_CUSTOM_WORDS_PER_LANGUAGE {
                return Err(ReductionError::validation(format!(
                    "Too many custom stopwords for language '{}': {} (max {})",
                    language,
                    words.len(),
                    MAX_CUSTOM_WORDS_PER_LANGUAGE
                )));
            }
        }

        Ok(())
    }

    /// Parse and validate a configuration from TOML source.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from JSON source.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ReductionError::Io` if the file cannot be read, and
    /// `ReductionError::Serialization` if it is not valid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load configuration, choosing the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ReductionError::validation(format!(
                "Unsupported config file format: {}. Supported formats: .toml, .json",
                path.display()
            ))),
        }
    }
}
