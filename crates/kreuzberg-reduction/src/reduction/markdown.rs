//! Markdown-aware variants of the light and stopword passes.
//!
//! Lines are classified with a cheap heuristic rather than a markdown parser: headings start
//! with `#`, table rows carry at least two pipes with an edge or ` | ` cue, list items start
//! with a bullet or `N. `. Such lines, fence marker lines, and everything between fences pass
//! through verbatim; only the remaining prose lines are transformed.

use super::filters::{apply_light_reduction_plain, remove_stopwords};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

const CODE_FENCE: &str = "```";

/// Blank lines allowed in a row outside code fences.
const MAX_CONSECUTIVE_BLANK_LINES: usize = 1;

static BULLET_LIST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*+]\s").expect("Bullet list regex pattern is valid and should compile"));
static NUMBERED_LIST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s").expect("Numbered list regex pattern is valid and should compile"));

pub(crate) fn is_code_fence(line: &str) -> bool {
    line.trim().starts_with(CODE_FENCE)
}

fn is_table_row(line: &str) -> bool {
    if line.matches('|').count() < 2 {
        return false;
    }
    let stripped = line.trim();
    stripped.starts_with('|') || stripped.ends_with('|') || line.contains(" | ")
}

/// Whether `line` is markdown structure that must be reproduced unchanged.
pub(crate) fn is_structural_line(line: &str, in_code_block: bool) -> bool {
    in_code_block
        || line.trim().starts_with('#')
        || is_table_row(line)
        || BULLET_LIST_REGEX.is_match(line)
        || NUMBERED_LIST_REGEX.is_match(line)
}

fn transform_prose_lines<F>(text: &str, transform: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut in_code_block = false;

    let lines: Vec<Cow<'_, str>> = text
        .split('\n')
        .map(|line| {
            if is_code_fence(line) {
                in_code_block = !in_code_block;
                return Cow::Borrowed(line);
            }
            if is_structural_line(line, in_code_block) || line.trim().is_empty() {
                return Cow::Borrowed(line);
            }
            Cow::Owned(transform(line))
        })
        .collect();

    lines.join("\n")
}

/// Keep at most one blank line in a row outside fences; fence interiors are untouched.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    let mut in_code_block = false;
    let mut consecutive_empty = 0;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if is_code_fence(line) {
            in_code_block = !in_code_block;
            consecutive_empty = 0;
            lines.push(line);
        } else if in_code_block {
            consecutive_empty = 0;
            lines.push(line);
        } else if line.trim().is_empty() {
            consecutive_empty += 1;
            if consecutive_empty <= MAX_CONSECUTIVE_BLANK_LINES {
                lines.push(line);
            }
        } else {
            consecutive_empty = 0;
            lines.push(line);
        }
    }

    lines.join("\n").trim().to_string()
}

pub(crate) fn apply_light_reduction_markdown_aware(text: &str) -> String {
    let processed = transform_prose_lines(text, apply_light_reduction_plain);
    collapse_blank_lines(&processed)
}

pub(crate) fn apply_stopword_reduction_markdown_aware(text: &str, stopwords: &AHashSet<String>) -> String {
    let processed = transform_prose_lines(text, |line| remove_stopwords(line, stopwords));
    collapse_blank_lines(&processed)
}
