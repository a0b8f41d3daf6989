use serde::{Deserialize, Serialize};

/// Statistics comparing an original text with its reduced form.
///
/// Ratios are `(original - reduced) / original`. They are `0.0` when the original is empty and
/// negative when the "reduced" text is actually longer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReductionStats {
    pub character_reduction_ratio: f64,
    pub token_reduction_ratio: f64,
    pub original_characters: usize,
    pub reduced_characters: usize,
    pub original_tokens: usize,
    pub reduced_tokens: usize,
}

/// Calculates character and token statistics for a reduction.
///
/// Characters are Unicode scalar values; tokens are whitespace-delimited.
///
/// # Examples
///
/// ```rust
/// use kreuzberg_reduction::get_reduction_stats;
///
/// let stats = get_reduction_stats("one two three four", "one four");
/// assert_eq!(stats.original_tokens, 4);
/// assert_eq!(stats.reduced_tokens, 2);
/// assert_eq!(stats.token_reduction_ratio, 0.5);
/// ```
pub fn get_reduction_stats(original: &str, reduced: &str) -> ReductionStats {
    let original_characters = original.chars().count();
    let reduced_characters = reduced.chars().count();
    let original_tokens = original.split_whitespace().count();
    let reduced_tokens = reduced.split_whitespace().count();

    ReductionStats {
        character_reduction_ratio: reduction_ratio(original_characters, reduced_characters),
        token_reduction_ratio: reduction_ratio(original_tokens, reduced_tokens),
        original_characters,
        reduced_characters,
        original_tokens,
        reduced_tokens,
    }
}

fn reduction_ratio(original: usize, reduced: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - reduced as f64) / original as f64
}
