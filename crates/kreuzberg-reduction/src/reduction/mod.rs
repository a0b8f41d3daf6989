//! The token reduction pipeline.
//!
//! [`reduce_tokens`] validates its inputs, normalises to NFC and dispatches on
//! [`ReductionMode`]:
//!
//! - `Off` returns the input byte-for-byte
//! - `Light` removes HTML comments, collapses punctuation runs and whitespace
//! - `Moderate` applies `Light`, then drops stopwords for the resolved language
//!
//! With `preserve_markdown` set, headings, list items, table rows and fenced code pass through
//! untouched. Inputs over [`STREAMING_THRESHOLD`] characters are processed in chunks.

mod filters;
mod markdown;
mod stats;
mod streaming;

pub use stats::{ReductionStats, get_reduction_stats};
pub use streaming::{BOUNDARY_SEARCH_WINDOW, STREAMING_CHUNK_SIZE, STREAMING_THRESHOLD};

use crate::config::{ReductionConfig, ReductionMode, is_valid_language_code};
use crate::stopwords::StopwordsManager;
use crate::{ReductionError, Result};
use ahash::AHashSet;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use std::borrow::Cow;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Largest input accepted, in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000_000;

/// Stopword language used when neither the caller nor the config names one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Lowercase stopword set for one request, resolved on first use and shared by a whole batch.
type StopwordLookup = OnceCell<Option<AHashSet<String>>>;

/// Reduces the token count of `text` according to `config`.
///
/// `language` overrides `config.language_hint` for stopword selection; when neither is set, or
/// the chosen language has no stopwords, English is used.
///
/// # Errors
///
/// Returns `ReductionError::Validation` if `language` is blank or not made of ASCII letters,
/// digits and hyphens, or if `text` exceeds [`MAX_TEXT_LENGTH`] characters.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_reduction::{reduce_tokens, ReductionConfig, ReductionMode, StopwordsManager};
///
/// let manager = StopwordsManager::new();
/// let config = ReductionConfig::new(ReductionMode::Light);
///
/// let reduced = reduce_tokens("Wait!!! What??? No way... Really,,,", &config, None, &manager)?;
/// assert_eq!(reduced, "Wait! What? No way. Really,");
/// # Ok::<(), kreuzberg_reduction::ReductionError>(())
/// ```
pub fn reduce_tokens(
    text: &str,
    config: &ReductionConfig,
    language: Option<&str>,
    stopwords: &StopwordsManager,
) -> Result<String> {
    reduce_with_lookup(text, config, language, stopwords, &StopwordLookup::new())
}

fn reduce_with_lookup(
    text: &str,
    config: &ReductionConfig,
    language: Option<&str>,
    stopwords: &StopwordsManager,
    lookup: &StopwordLookup,
) -> Result<String> {
    validate_inputs(text, language)?;

    if matches!(config.mode, ReductionMode::Off) {
        return Ok(text.to_string());
    }

    let normalized: Cow<'_, str> = if text.is_ascii() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.nfc().collect())
    };

    if normalized.trim().is_empty() {
        return Ok(String::new());
    }

    let use_streaming = streaming::exceeds_char_limit(&normalized, STREAMING_THRESHOLD);

    let reduced = match config.mode {
        ReductionMode::Off => normalized.into_owned(),
        ReductionMode::Light => apply_light_reduction(&normalized, config.preserve_markdown, use_streaming),
        ReductionMode::Moderate => {
            apply_moderate_reduction(&normalized, config, language, stopwords, lookup, use_streaming)
        }
    };

    Ok(reduced)
}

/// Reduces several texts in parallel with one configuration.
///
/// Results are returned in input order. The first invalid input fails the whole batch. The
/// stopword set is resolved once and shared by every text.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_reduction::{batch_reduce_tokens, ReductionConfig, ReductionMode, StopwordsManager};
///
/// let manager = StopwordsManager::new();
/// let config = ReductionConfig::new(ReductionMode::Light);
/// let texts = ["Hello   world!!!", "How   are you???"];
///
/// let reduced = batch_reduce_tokens(&texts, &config, None, &manager)?;
/// assert_eq!(reduced, vec!["Hello world!", "How are you?"]);
/// # Ok::<(), kreuzberg_reduction::ReductionError>(())
/// ```
pub fn batch_reduce_tokens(
    texts: &[&str],
    config: &ReductionConfig,
    language: Option<&str>,
    stopwords: &StopwordsManager,
) -> Result<Vec<String>> {
    let lookup = StopwordLookup::new();

    if texts.len() < 2 {
        return texts
            .iter()
            .map(|text| reduce_with_lookup(text, config, language, stopwords, &lookup))
            .collect();
    }

    texts
        .par_iter()
        .map(|text| reduce_with_lookup(text, config, language, stopwords, &lookup))
        .collect()
}

/// A reducer bound to one configuration and a shared stopword store.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_reduction::{ReductionConfig, ReductionMode, StopwordsManager, TokenReducer};
/// use std::sync::Arc;
///
/// let manager = Arc::new(StopwordsManager::new());
/// let reducer = TokenReducer::new(ReductionConfig::new(ReductionMode::Moderate), Arc::clone(&manager));
///
/// let reduced = reducer.reduce("The quick brown fox jumps over the lazy dog.", Some("en"))?;
/// assert!(reduced.contains("quick"));
/// # Ok::<(), kreuzberg_reduction::ReductionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TokenReducer {
    config: Arc<ReductionConfig>,
    stopwords: Arc<StopwordsManager>,
}

impl TokenReducer {
    pub fn new(config: ReductionConfig, stopwords: Arc<StopwordsManager>) -> Self {
        Self {
            config: Arc::new(config),
            stopwords,
        }
    }

    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    pub fn stopwords(&self) -> &StopwordsManager {
        &self.stopwords
    }

    pub fn reduce(&self, text: &str, language: Option<&str>) -> Result<String> {
        reduce_tokens(text, &self.config, language, &self.stopwords)
    }

    pub fn batch_reduce(&self, texts: &[&str], language: Option<&str>) -> Result<Vec<String>> {
        batch_reduce_tokens(texts, &self.config, language, &self.stopwords)
    }
}

fn validate_inputs(text: &str, language: Option<&str>) -> Result<()> {
    if let Some(language) = language
        && language.trim().is_empty()
    {
        return Err(ReductionError::validation(
            "Language cannot be empty or whitespace-only",
        ));
    }

    if streaming::exceeds_char_limit(text, MAX_TEXT_LENGTH) {
        return Err(ReductionError::validation(format!(
            "Text too large: {} characters (max {})",
            text.chars().count(),
            MAX_TEXT_LENGTH
        )));
    }

    if let Some(language) = language
        && !is_valid_language_code(language)
    {
        return Err(ReductionError::validation(format!(
            "Invalid language code format: {}",
            language
        )));
    }

    Ok(())
}

fn apply_light_reduction(text: &str, preserve_markdown: bool, use_streaming: bool) -> String {
    let light = if preserve_markdown {
        markdown::apply_light_reduction_markdown_aware
    } else {
        filters::apply_light_reduction_plain
    };

    if use_streaming {
        streaming::process_streaming(text, light)
    } else {
        light(text)
    }
}

fn apply_moderate_reduction(
    text: &str,
    config: &ReductionConfig,
    language: Option<&str>,
    manager: &StopwordsManager,
    lookup: &StopwordLookup,
    use_streaming: bool,
) -> String {
    let light = apply_light_reduction(text, config.preserve_markdown, use_streaming);

    let Some(stopwords) = lookup.get_or_init(|| resolve_stopwords(config, language, manager)) else {
        return light;
    };

    let filter = |chunk: &str| {
        if config.preserve_markdown {
            markdown::apply_stopword_reduction_markdown_aware(chunk, stopwords)
        } else {
            filters::remove_stopwords(chunk, stopwords)
        }
    };

    if use_streaming {
        streaming::process_streaming(&light, filter)
    } else {
        filter(&light)
    }
}

/// Pick the stopword language and build its lowercase lookup set.
///
/// Returns `None` when neither the requested language nor English has stopwords.
fn resolve_stopwords(
    config: &ReductionConfig,
    language: Option<&str>,
    manager: &StopwordsManager,
) -> Option<AHashSet<String>> {
    let available = |code: &str| {
        manager.has_language(code)
            || config
                .custom_stopwords
                .get(code)
                .is_some_and(|words| !words.is_empty())
    };

    let requested = language
        .or(config.language_hint.as_deref())
        .unwrap_or(DEFAULT_LANGUAGE);

    let resolved = if available(requested) {
        requested
    } else if available(DEFAULT_LANGUAGE) {
        tracing::debug!(
            "No stopwords for language '{}', falling back to '{}'",
            requested,
            DEFAULT_LANGUAGE
        );
        DEFAULT_LANGUAGE
    } else {
        tracing::debug!(
            "No stopwords for '{}' or '{}', skipping stopword removal",
            requested,
            DEFAULT_LANGUAGE
        );
        return None;
    };

    let mut words: AHashSet<String> = manager
        .get_stopwords(resolved)
        .iter()
        .map(|word| word.to_lowercase())
        .collect();

    if let Some(custom) = config.custom_stopwords.get(resolved) {
        words.extend(custom.iter().map(|word| word.to_lowercase()));
    }

    Some(words)
}
