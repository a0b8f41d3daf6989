//! Kreuzberg Reduction - Token Reduction for Extracted Text
//!
//! Shrinks text before it is handed to a language model. Formatting noise is removed and,
//! optionally, language-specific stopwords are dropped, while the meaning and markdown structure
//! are kept.
//!
//! # Quick Start
//!
//! ```rust
//! use kreuzberg_reduction::{get_reduction_stats, reduce_tokens, ReductionConfig, ReductionMode, StopwordsManager};
//!
//! # fn main() -> kreuzberg_reduction::Result<()> {
//! let stopwords = StopwordsManager::new();
//! let config = ReductionConfig::new(ReductionMode::Moderate);
//!
//! let original = "The quick brown fox jumps over the lazy dog.";
//! let reduced = reduce_tokens(original, &config, Some("en"), &stopwords)?;
//!
//! let stats = get_reduction_stats(original, &reduced);
//! assert!(stats.token_reduction_ratio > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Config** (`config`): Reduction modes and options, loadable from TOML or JSON
//! - **Reduction** (`reduction`): The light and moderate pipelines, markdown handling, chunked
//!   processing of oversized inputs and statistics
//! - **Stopwords** (`stopwords`): Per-language stopword store with a bounded lazy cache and
//!   runtime custom overlays
//!
//! # Features
//!
//! - Three modes: `off`, `light` (formatting only) and `moderate` (formatting plus stopwords)
//! - Markdown-aware processing that leaves headings, lists, tables and code fences intact
//! - 23 bundled stopword languages with English fallback
//! - Thread-safe stopword store, parallel batch reduction

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod reduction;
pub mod stopwords;

pub use config::{ReductionConfig, ReductionMode};
pub use error::{ReductionError, Result};
pub use reduction::{
    DEFAULT_LANGUAGE, MAX_TEXT_LENGTH, ReductionStats, TokenReducer, batch_reduce_tokens, get_reduction_stats,
    reduce_tokens,
};
pub use stopwords::{StopwordSet, StopwordsManager};
