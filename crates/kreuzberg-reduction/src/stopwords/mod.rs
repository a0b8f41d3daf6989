//! Stopwords management for token reduction.
//!
//! A [`StopwordsManager`] resolves a language code to the set of words moderate reduction may
//! drop. Each set is the union of a *default* list, read lazily from
//! `stopwords/<code>_stopwords.json`, and a *custom overlay* registered on that manager
//! instance.
//!
//! Create one manager at startup and share it (typically behind an [`Arc`]); all methods take
//! `&self` and are safe to call from many threads at once.
//!
//! # Limits
//!
//! - At most [`MAX_CUSTOM_LANGUAGES`] overlay languages per manager
//! - At most [`MAX_CUSTOM_WORDS_PER_LANGUAGE`] overlay words per language
//! - At most [`DEFAULT_CACHE_CAPACITY`] default sets held in memory (least recently used is
//!   evicted and reloaded on demand)
//!
//! # Usage
//!
//! ```rust
//! use kreuzberg_reduction::stopwords::StopwordsManager;
//!
//! let manager = StopwordsManager::new();
//! assert!(manager.get_stopwords("en").contains("the"));
//!
//! manager.add_custom_stopwords("en", ["lorem", "ipsum"])?;
//! assert!(manager.get_stopwords("en").contains("lorem"));
//!
//! // Unknown or hostile codes degrade to an empty set
//! assert!(manager.get_stopwords("../../etc/passwd").is_empty());
//! # Ok::<(), kreuzberg_reduction::ReductionError>(())
//! ```

mod cache;
mod loader;

use crate::config::is_valid_language_code;
use crate::{ReductionError, Result};
use ahash::{AHashMap, AHashSet};
use cache::LoadingLruCache;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum number of languages with custom stopwords per manager.
pub const MAX_CUSTOM_LANGUAGES: usize = 100;

/// Maximum number of custom stopwords for a single language.
pub const MAX_CUSTOM_WORDS_PER_LANGUAGE: usize = 10_000;

/// Number of default stopword sets kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// An immutable, shareable stopword set.
pub type StopwordSet = Arc<AHashSet<String>>;

static EMPTY_SET: Lazy<StopwordSet> = Lazy::new(|| Arc::new(AHashSet::new()));

/// Lazily loading, thread-safe stopword store.
pub struct StopwordsManager {
    resource_dir: PathBuf,
    defaults: LoadingLruCache<StopwordSet>,
    available: OnceCell<BTreeSet<String>>,
    custom: RwLock<AHashMap<String, AHashSet<String>>>,
}

impl Default for StopwordsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopwordsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordsManager")
            .field("resource_dir", &self.resource_dir)
            .field("cached_languages", &self.defaults.len())
            .field("custom_languages", &self.custom.read().len())
            .finish()
    }
}

impl StopwordsManager {
    /// Create a manager backed by the shipped stopword resources and no custom overlay.
    pub fn new() -> Self {
        Self::with_resource_dir(loader::resource_dir())
    }

    pub(crate) fn with_resource_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            resource_dir: dir.as_ref().to_path_buf(),
            defaults: LoadingLruCache::new(DEFAULT_CACHE_CAPACITY),
            available: OnceCell::new(),
            custom: RwLock::new(AHashMap::new()),
        }
    }

    /// Create a manager with an initial custom overlay.
    ///
    /// # Errors
    ///
    /// Returns `ReductionError::Validation` if the overlay names more than
    /// [`MAX_CUSTOM_LANGUAGES`] languages, a language code is malformed, or a language carries
    /// more than [`MAX_CUSTOM_WORDS_PER_LANGUAGE`] words.
    pub fn with_custom_stopwords<I, L, W, S>(custom: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, W)>,
        L: Into<String>,
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut overlay: AHashMap<String, AHashSet<String>> = AHashMap::new();
        for (language, words) in custom {
            overlay
                .entry(language.into())
                .or_default()
                .extend(words.into_iter().map(Into::into));
        }

        if overlay.len() > MAX_CUSTOM_LANGUAGES {
            return Err(ReductionError::validation(format!(
                "Too many custom stopword languages: {} (max {})",
                overlay.len(),
                MAX_CUSTOM_LANGUAGES
            )));
        }

        for (language, words) in &overlay {
            validate_overlay_language(language)?;
            if words.len() > MAX_CUSTOM_WORDS_PER_LANGUAGE {
                return Err(ReductionError::validation(format!(
                    "Too many custom stopwords for language '{}': {} (max {})",
                    language,
                    words.len(),
                    MAX_CUSTOM_WORDS_PER_LANGUAGE
                )));
            }
        }

        let manager = Self::new();
        *manager.custom.write() = overlay;
        Ok(manager)
    }

    /// Get the stopwords for `language`: the default set merged with any custom overlay.
    ///
    /// Never fails. Missing, corrupted or rejected resources contribute an empty default set.
    pub fn get_stopwords(&self, language: &str) -> StopwordSet {
        let defaults = self.default_stopwords(language);

        let custom = self.custom.read();
        match custom.get(language) {
            Some(extra) if !extra.is_empty() => {
                let mut merged = AHashSet::with_capacity(defaults.len() + extra.len());
                merged.extend(defaults.iter().cloned());
                merged.extend(extra.iter().cloned());
                Arc::new(merged)
            }
            _ => defaults,
        }
    }

    fn default_stopwords(&self, language: &str) -> StopwordSet {
        if !loader::is_safe_language_code(language) {
            tracing::warn!("Refusing to load stopwords for language code {:?}", language);
            return Arc::clone(&EMPTY_SET);
        }

        self.defaults.get_or_load(language, || {
            let words = loader::load_language_stopwords(&self.resource_dir, language);
            tracing::debug!("Loaded {} default stopwords for '{}'", words.len(), language);
            Arc::new(words)
        })
    }

    fn available_languages(&self) -> &BTreeSet<String> {
        self.available
            .get_or_init(|| loader::available_languages(&self.resource_dir))
    }

    /// Whether a default resource or a custom overlay exists for `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.available_languages().contains(language) || self.custom.read().contains_key(language)
    }

    /// Sorted union of shipped languages and custom overlay languages.
    pub fn supported_languages(&self) -> Vec<String> {
        let mut languages = self.available_languages().clone();
        languages.extend(self.custom.read().keys().cloned());
        languages.into_iter().collect()
    }

    /// Merge `words` into the custom overlay for `language`.
    ///
    /// The merge is all-or-nothing: if any limit would be exceeded the overlay is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ReductionError::Validation` if the language code is malformed, if registering a
    /// new language would exceed [`MAX_CUSTOM_LANGUAGES`], or if the merged set would exceed
    /// [`MAX_CUSTOM_WORDS_PER_LANGUAGE`].
    pub fn add_custom_stopwords<I, S>(&self, language: &str, words: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_overlay_language(language)?;
        let words: AHashSet<String> = words.into_iter().map(Into::into).collect();

        let mut custom = self.custom.write();

        let existing = custom.get(language);
        if existing.is_none() && custom.len() >= MAX_CUSTOM_LANGUAGES {
            return Err(ReductionError::validation(format!(
                "Cannot add more custom stopword languages: already have {} (max {})",
                custom.len(),
                MAX_CUSTOM_LANGUAGES
            )));
        }

        let new_total = match existing {
            Some(current) => current.len() + words.iter().filter(|w| !current.contains(*w)).count(),
            None => words.len(),
        };
        if new_total > MAX_CUSTOM_WORDS_PER_LANGUAGE {
            return Err(ReductionError::validation(format!(
                "Too many custom stopwords for language '{}': would have {} (max {})",
                language, new_total, MAX_CUSTOM_WORDS_PER_LANGUAGE
            )));
        }

        custom.entry(language.to_string()).or_default().extend(words);
        Ok(())
    }

    /// Number of default sets currently held in the cache.
    pub fn cached_languages(&self) -> usize {
        self.defaults.len()
    }
}

fn validate_overlay_language(language: &str) -> Result<()> {
    if language.trim().is_empty() {
        return Err(ReductionError::validation(
            "Language cannot be empty or whitespace-only",
        ));
    }
    if !is_valid_language_code(language) {
        return Err(ReductionError::validation(format!(
            "Invalid language code format: {}",
            language
        )));
    }
    Ok(())
}
