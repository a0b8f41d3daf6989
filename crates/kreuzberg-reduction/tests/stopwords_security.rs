//! Stopword store hardening tests.
//!
//! Language codes flow from callers into file paths, so the store must:
//! - Refuse traversal and separator characters
//! - Degrade to empty sets instead of failing
//! - Reject malformed codes at the reduction boundary
//! - Enforce custom overlay limits atomically

use kreuzberg_reduction::stopwords::{MAX_CUSTOM_LANGUAGES, MAX_CUSTOM_WORDS_PER_LANGUAGE};
use kreuzberg_reduction::{ReductionConfig, ReductionMode, StopwordsManager, reduce_tokens};

const HOSTILE_CODES: &[&str] = &[
    "../en",
    "..",
    "../../etc/passwd",
    "en/../de",
    "/etc/passwd",
    "en\\..\\de",
    "C:\\Windows",
    "en\0",
    "en_US",
    "en us",
    "",
];

#[test]
fn test_hostile_codes_yield_empty_sets() {
    let manager = StopwordsManager::new();

    for code in HOSTILE_CODES {
        assert!(manager.get_stopwords(code).is_empty(), "{code:?} should be rejected");
        assert!(!manager.has_language(code), "{code:?} should not be available");
    }
    assert_eq!(manager.cached_languages(), 0);
}

#[test]
fn test_hostile_codes_are_rejected_by_reduce() {
    let manager = StopwordsManager::new();
    let config = ReductionConfig::new(ReductionMode::Moderate);

    for code in HOSTILE_CODES {
        assert!(
            reduce_tokens("the text", &config, Some(code), &manager).is_err(),
            "{code:?} should fail validation"
        );
    }
}

#[test]
fn test_unknown_language_is_empty_not_an_error() {
    let manager = StopwordsManager::new();
    assert!(manager.get_stopwords("zz").is_empty());
    assert!(!manager.has_language("zz"));
}

#[test]
fn test_shipped_languages_are_listed() {
    let manager = StopwordsManager::new();
    let languages = manager.supported_languages();

    for code in ["en", "de", "es", "fr", "ru"] {
        assert!(languages.iter().any(|l| l == code), "missing {code}");
    }
    let mut sorted = languages.clone();
    sorted.sort();
    assert_eq!(languages, sorted);
}

#[test]
fn test_overlay_rejects_malformed_codes() {
    let manager = StopwordsManager::new();
    assert!(manager.add_custom_stopwords("../en", ["word"]).is_err());
    assert!(manager.add_custom_stopwords("   ", ["word"]).is_err());
    assert!(manager.add_custom_stopwords("en us", ["word"]).is_err());
    assert!(!manager.has_language("../en"));
}

#[test]
fn test_overlay_language_limit() {
    let manager = StopwordsManager::new();
    for index in 0..MAX_CUSTOM_LANGUAGES {
        manager
            .add_custom_stopwords(&format!("x{index}"), ["word"])
            .unwrap();
    }

    let err = manager.add_custom_stopwords("overflow", ["word"]).unwrap_err();
    assert!(err.to_string().contains("Cannot add more custom stopword languages"));
    assert!(!manager.has_language("overflow"));

    manager.add_custom_stopwords("x0", ["another"]).unwrap();
}

#[test]
fn test_overlay_word_limit_is_atomic() {
    let manager = StopwordsManager::new();
    let initial: Vec<String> = (0..MAX_CUSTOM_WORDS_PER_LANGUAGE - 1).map(|i| format!("w{i}")).collect();
    manager.add_custom_stopwords("en", initial).unwrap();

    let err = manager
        .add_custom_stopwords("en", ["fresh1", "fresh2"])
        .unwrap_err();
    assert!(err.to_string().contains("Too many custom stopwords"));

    let words = manager.get_stopwords("en");
    assert!(!words.contains("fresh1"));
    assert!(!words.contains("fresh2"));

    manager.add_custom_stopwords("en", ["w0", "fresh1"]).unwrap();
    assert!(manager.get_stopwords("en").contains("fresh1"));
}

#[test]
fn test_with_custom_stopwords_validates_eagerly() {
    let too_many: Vec<(String, Vec<&str>)> = (0..=MAX_CUSTOM_LANGUAGES)
        .map(|i| (format!("l{i}"), vec!["word"]))
        .collect();
    assert!(StopwordsManager::with_custom_stopwords(too_many).is_err());

    assert!(StopwordsManager::with_custom_stopwords([("bad/code", ["word"])]).is_err());

    let manager = StopwordsManager::with_custom_stopwords([("en", ["lorem"])]).unwrap();
    assert!(manager.get_stopwords("en").contains("lorem"));
    assert!(manager.get_stopwords("en").contains("the"));
}
