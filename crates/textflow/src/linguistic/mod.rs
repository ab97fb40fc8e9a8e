//! Pluggable tokenization/stopword/lemmatization strategy.
//!
//! The regex backend is always compiled and is the guaranteed baseline.
//! The English backend is only compiled with the "nlp" feature; when it is
//! missing, [`select_backend`] falls back to the regex backend.

#[cfg(feature = "nlp")]
pub mod english;

use std::sync::{Arc, LazyLock};

use regex::Regex;

#[cfg(feature = "nlp")]
pub use english::EnglishBackend;

static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

pub trait LinguisticBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Whether stopword and lemma information is meaningful. Steps skip
    /// their token-level options on backends that return `false`.
    fn is_enhanced(&self) -> bool;

    fn tokenize(&self, text: &str) -> Vec<String>;
    fn is_stopword(&self, token: &str) -> bool;
    fn is_punctuation(&self, token: &str) -> bool;
    fn lemmatize(&self, token: &str) -> String;
}

/// Whitespace tokenizer with no stopword or lemma knowledge.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexBackend;

impl RegexBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LinguisticBackend for RegexBackend {
    fn name(&self) -> &str {
        "regex"
    }

    fn is_enhanced(&self) -> bool {
        false
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        RE_TOKEN
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn is_stopword(&self, _token: &str) -> bool {
        false
    }

    fn is_punctuation(&self, token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_ascii_punctuation())
    }

    fn lemmatize(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Picks the backend for a registry. Falls back to [`RegexBackend`] when the
/// enhanced backend is not compiled in.
pub fn select_backend(prefer_enhanced: bool) -> Arc<dyn LinguisticBackend> {
    if prefer_enhanced {
        if let Some(backend) = enhanced_backend() {
            tracing::debug!("Using linguistic backend '{}'", backend.name());
            return backend;
        }
        tracing::info!("Enhanced linguistic backend unavailable, falling back to regex");
    }
    Arc::new(RegexBackend::new())
}

#[cfg(feature = "nlp")]
fn enhanced_backend() -> Option<Arc<dyn LinguisticBackend>> {
    Some(Arc::new(EnglishBackend::new()))
}

#[cfg(not(feature = "nlp"))]
fn enhanced_backend() -> Option<Arc<dyn LinguisticBackend>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_tokenize_matches_whitespace_split() {
        let backend = RegexBackend::new();
        let text = "  hello,\tworld \n this  is ";
        let expected: Vec<String> = text.split_whitespace().map(String::from).collect();
        assert_eq!(backend.tokenize(text), expected);
        assert!(backend.tokenize("   ").is_empty());
    }

    #[test]
    fn test_regex_backend_has_no_lexicon() {
        let backend = RegexBackend::new();
        assert!(!backend.is_enhanced());
        assert!(!backend.is_stopword("the"));
        assert_eq!(backend.lemmatize("running"), "running");
    }

    #[test]
    fn test_regex_punctuation() {
        let backend = RegexBackend::new();
        assert!(backend.is_punctuation("..."));
        assert!(backend.is_punctuation("!?"));
        assert!(!backend.is_punctuation("a."));
        assert!(!backend.is_punctuation(""));
    }

    #[test]
    fn test_select_backend_without_preference() {
        assert_eq!(select_backend(false).name(), "regex");
    }

    #[cfg(not(feature = "nlp"))]
    #[test]
    fn test_select_backend_falls_back_to_regex() {
        let backend = select_backend(true);
        assert_eq!(backend.name(), "regex");
        assert!(!backend.is_enhanced());
    }

    #[cfg(feature = "nlp")]
    #[test]
    fn test_select_backend_prefers_english() {
        let backend = select_backend(true);
        assert_eq!(backend.name(), "english");
        assert!(backend.is_enhanced());
    }
}
