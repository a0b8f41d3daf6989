use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static HTML_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML comment regex pattern is valid and should compile"));

// Alternation order matters: runs of one character win over mixed runs starting at the same place.
static PUNCTUATION_CLEANUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<repeat>!{2,}|\?{2,}|\.{2,})|(?P<comma>,{2,})|[!?]+\.+[!?]*|[?!]{3,}")
        .expect("Punctuation cleanup regex pattern is valid and should compile")
});

static WHITESPACE_CLEANUP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}|[ \t]+").expect("Whitespace cleanup regex pattern is valid and should compile"));

/// Trailing punctuation that survives the removal of the token it was attached to.
const REATTACHABLE_PUNCTUATION: &str = ".,;:!?";

/// Collapse `!!!`, `???`, `...` and `,,,` to one character and mixed `?!` runs to `?`.
pub(crate) fn clean_punctuation(text: &str) -> Cow<'_, str> {
    PUNCTUATION_CLEANUP_REGEX.replace_all(text, |caps: &Captures| {
        if let Some(repeat) = caps.name("repeat") {
            repeat.as_str()[..1].to_string()
        } else if caps.name("comma").is_some() {
            ",".to_string()
        } else {
            "?".to_string()
        }
    })
}

/// Collapse 3+ newlines to a blank line and horizontal whitespace runs to one space.
pub(crate) fn normalize_whitespace(text: &str) -> Cow<'_, str> {
    WHITESPACE_CLEANUP_REGEX.replace_all(text, |caps: &Captures| {
        if caps[0].starts_with('\n') { "\n\n" } else { " " }
    })
}

/// Formatting-only reduction of plain text.
pub(crate) fn apply_light_reduction_plain(text: &str) -> String {
    let without_comments = HTML_COMMENT_REGEX.replace_all(text, "");
    let punctuated = clean_punctuation(&without_comments);
    let normalized = normalize_whitespace(&punctuated);
    normalized.trim().to_string()
}

/// Drop stopword tokens from whitespace-delimited text.
///
/// `stopwords` must already be lowercase. Single letters, acronyms and tokens containing digits
/// are always kept. When a dropped token ends in sentence punctuation the previous surviving
/// token inherits it, so `"over the hill, then"` keeps its comma.
pub(crate) fn remove_stopwords(text: &str, stopwords: &AHashSet<String>) -> String {
    let mut kept: Vec<String> = Vec::new();

    for word in text.split_whitespace() {
        let (_, core, suffix) = split_word_boundaries(word);

        if core.is_empty() {
            kept.push(word.to_string());
            continue;
        }

        let clean = clean_core(core);
        if clean.is_empty() || should_keep(core, &clean, stopwords) {
            kept.push(word.to_string());
            continue;
        }

        if !suffix.is_empty()
            && REATTACHABLE_PUNCTUATION.contains(suffix)
            && let Some(last) = kept.last_mut()
            && !last.ends_with(suffix)
        {
            last.push_str(suffix);
        }
    }

    kept.join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split a token into leading non-word characters, the core, and trailing non-word characters.
pub(crate) fn split_word_boundaries(word: &str) -> (&str, &str, &str) {
    let Some(start) = word.find(is_word_char) else {
        return (word, "", "");
    };
    let end = word
        .char_indices()
        .rev()
        .find(|(_, c)| is_word_char(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(start);

    (&word[..start], &word[start..end], &word[end..])
}

fn clean_core(core: &str) -> String {
    if core.chars().all(char::is_alphabetic) {
        core.to_lowercase()
    } else {
        core.chars().filter(|c| is_word_char(*c)).collect::<String>().to_lowercase()
    }
}

fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

fn should_keep(core: &str, clean: &str, stopwords: &AHashSet<String>) -> bool {
    !stopwords.contains(clean)
        || clean.chars().count() <= 1
        || (core.chars().count() > 1 && is_upper(core))
        || core.chars().any(char::is_numeric)
}
