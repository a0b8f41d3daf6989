//! Error types for token reduction.
//!
//! Every precondition violation in the reduction engine (oversized text, malformed
//! language codes, custom stopword limits) is reported as [`ReductionError::Validation`].
//! The remaining variants are only produced while loading configuration files.
//!
//! Stopword resource problems never surface as errors: a missing or corrupted
//! `<lang>_stopwords.json` degrades to an empty set and is logged.
//!
//! # Example
//!
//! ```rust
//! use kreuzberg_reduction::{ReductionError, Result};
//!
//! fn require_language(code: &str) -> Result<&str> {
//!     if code.trim().is_empty() {
//!         return Err(ReductionError::validation("Language cannot be empty or whitespace-only"));
//!     }
//!     Ok(code)
//! }
//!
//! assert!(require_language("en").is_ok());
//! assert!(require_language("  ").is_err());
//! ```
use thiserror::Error;

/// Result type alias using `ReductionError`.
pub type Result<T> = std::result::Result<T, ReductionError>;

/// Main error type for all reduction operations.
///
/// # Variants
///
/// - `Validation` - Caller-correctable input errors (the only kind raised by the core)
/// - `Io` - File system errors while reading configuration files
/// - `Serialization` - Malformed TOML/JSON configuration content
#[derive(Debug, Error)]
pub enum ReductionError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<serde_json::Error> for ReductionError {
    fn from(err: serde_json::Error) -> Self {
        ReductionError::serialization_with_source(err.to_string(), err)
    }
}

impl From<toml::de::Error> for ReductionError {
    fn from(err: toml::de::Error) -> Self {
        ReductionError::serialization_with_source(err.to_string(), err)
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        paste::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl ReductionError {
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);

    /// Whether this error is a caller-correctable validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ReductionError::Validation { .. })
    }
}
