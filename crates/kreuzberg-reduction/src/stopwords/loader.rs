//! Path-safe loading of stopword resource files.
//!
//! Each language lives in `<code>_stopwords.json` inside the crate's `stopwords/` directory and
//! contains a JSON array of lowercase strings. Language codes reach this module from callers, so
//! every code is screened before it is turned into a path, and the resolved file must sit
//! directly inside the resource directory after symlinks are followed.

use crate::config::is_valid_language_code;
use ahash::AHashSet;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub(crate) const STOPWORDS_FILE_SUFFIX: &str = "_stopwords.json";

/// The fixed resource directory shipped with the crate.
///
/// Resolved at compile time, so the directory must exist at this path on the host running the binary.
pub(crate) fn resource_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/stopwords"))
}

/// Screens a caller-supplied language code before it is used to build a path.
pub(crate) fn is_safe_language_code(language: &str) -> bool {
    !language.is_empty()
        && !language.contains('/')
        && !language.contains('\\')
        && !language.contains("..")
        && is_valid_language_code(language)
}

/// Load the default stopword set for `language` from `dir`.
///
/// Never fails: rejected codes, missing files, unreadable files and malformed JSON all yield an
/// empty set.
pub(crate) fn load_language_stopwords(dir: &Path, language: &str) -> AHashSet<String> {
    if !is_safe_language_code(language) {
        tracing::warn!("Rejected stopword language code {:?}", language);
        return AHashSet::new();
    }

    let file_path = dir.join(format!("{}{}", language, STOPWORDS_FILE_SUFFIX));

    let canonical_dir = match dir.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!("Stopword directory {} unavailable: {}", dir.display(), e);
            return AHashSet::new();
        }
    };

    // Fails for missing files as well as broken symlinks
    let canonical_file = match file_path.canonicalize() {
        Ok(path) => path,
        Err(_) => {
            tracing::debug!("No stopword resource for language '{}'", language);
            return AHashSet::new();
        }
    };

    if canonical_file.parent() != Some(canonical_dir.as_path()) {
        tracing::warn!(
            "Stopword resource for '{}' resolves outside {}: {}",
            language,
            canonical_dir.display(),
            canonical_file.display()
        );
        return AHashSet::new();
    }

    let bytes = match fs::read(&canonical_file) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read stopwords for '{}': {}", language, e);
            return AHashSet::new();
        }
    };

    match serde_json::from_slice::<Vec<String>>(&bytes) {
        Ok(words) => words.into_iter().collect(),
        Err(e) => {
            tracing::warn!("Corrupted stopword resource for '{}': {}", language, e);
            AHashSet::new()
        }
    }
}

/// Scan `dir` for `<code>_stopwords.json` files and return their language codes.
pub(crate) fn available_languages(dir: &Path) -> BTreeSet<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot scan stopword directory {}: {}", dir.display(), e);
            return BTreeSet::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name();
            let code = name.to_str()?.strip_suffix(STOPWORDS_FILE_SUFFIX)?.to_string();
            is_safe_language_code(&code).then_some(code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_resource(dir: &Path, language: &str, content: &str) {
        fs::write(dir.join(format!("{}{}", language, STOPWORDS_FILE_SUFFIX)), content).unwrap();
    }

    #[test]
    fn test_safe_language_codes() {
        assert!(is_safe_language_code("en"));
        assert!(is_safe_language_code("pt-BR"));
        assert!(!is_safe_language_code(""));
        assert!(!is_safe_language_code(".."));
        assert!(!is_safe_language_code("../en"));
        assert!(!is_safe_language_code("en/../../etc"));
        assert!(!is_safe_language_code("..\\windows"));
        assert!(!is_safe_language_code("en.json"));
    }

    #[test]
    fn test_load_valid_resource() {
        let dir = tempdir().unwrap();
        write_resource(dir.path(), "xx", r#"["alpha", "beta", "alpha"]"#);

        let words = load_language_stopwords(dir.path(), "xx");
        assert_eq!(words.len(), 2);
        assert!(words.contains("alpha"));
    }

    #[test]
    fn test_missing_resource_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_language_stopwords(dir.path(), "zz").is_empty());
    }

    #[test]
    fn test_corrupted_resource_is_empty() {
        let dir = tempdir().unwrap();
        write_resource(dir.path(), "bad", "{not a list");
        write_resource(dir.path(), "num", "[1, 2, 3]");

        assert!(load_language_stopwords(dir.path(), "bad").is_empty());
        assert!(load_language_stopwords(dir.path(), "num").is_empty());
    }

    #[test]
    fn test_traversal_codes_are_rejected() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_resource(dir.path(), "outside", r#"["secret"]"#);

        assert!(load_language_stopwords(&nested, "../outside").is_empty());
        assert!(load_language_stopwords(&nested, "..").is_empty());
        assert!(load_language_stopwords(&nested, "a\\b").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_directory_is_rejected() {
        let outside = tempdir().unwrap();
        let resources = tempdir().unwrap();
        write_resource(outside.path(), "target", r#"["secret"]"#);

        std::os::unix::fs::symlink(
            outside.path().join(format!("target{}", STOPWORDS_FILE_SUFFIX)),
            resources.path().join(format!("evil{}", STOPWORDS_FILE_SUFFIX)),
        )
        .unwrap();

        assert!(load_language_stopwords(resources.path(), "evil").is_empty());
    }

    #[test]
    fn test_available_languages_scans_directory() {
        let dir = tempdir().unwrap();
        write_resource(dir.path(), "en", "[]");
        write_resource(dir.path(), "de", "[]");
        fs::write(dir.path().join("README.md"), "not a resource").unwrap();
        fs::write(dir.path().join("bad code_stopwords.json"), "[]").unwrap();

        let languages: Vec<String> = available_languages(dir.path()).into_iter().collect();
        assert_eq!(languages, vec!["de".to_string(), "en".to_string()]);
    }

    #[test]
    fn test_available_languages_missing_directory() {
        let dir = tempdir().unwrap();
        assert!(available_languages(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_shipped_resource_directory_has_english() {
        assert!(available_languages(resource_dir()).contains("en"));
        assert!(load_language_stopwords(resource_dir(), "en").contains("the"));
    }
}
