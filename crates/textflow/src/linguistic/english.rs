//! Rule-based English backend (enabled with the "nlp" feature).

use std::collections::HashSet;
use std::sync::LazyLock;

use super::{LinguisticBackend, RegexBackend};

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Words whose trailing "s"/"ed"/"ing" is not an inflection.
const KEEP_AS_IS: &[&str] = &[
    "is", "was", "has", "this", "his", "bus", "gas", "yes", "news", "series", "species", "thing",
    "nothing", "something", "anything", "everything", "bring", "during", "morning", "evening",
    "need", "seed", "feed", "speed", "bed", "red", "bled", "shed",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishBackend {
    tokenizer: RegexBackend,
}

impl EnglishBackend {
    pub fn new() -> Self {
        Self {
            tokenizer: RegexBackend::new(),
        }
    }
}

impl LinguisticBackend for EnglishBackend {
    fn name(&self) -> &str {
        "english"
    }

    fn is_enhanced(&self) -> bool {
        true
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    fn is_stopword(&self, token: &str) -> bool {
        let lower = token
            .trim_matches(|c: char| c.is_ascii_punctuation())
            .to_lowercase();
        STOPWORD_SET.contains(lower.as_str())
    }

    fn is_punctuation(&self, token: &str) -> bool {
        self.tokenizer.is_punctuation(token)
    }

    fn lemmatize(&self, token: &str) -> String {
        let lower = token.to_ascii_lowercase();
        if KEEP_AS_IS.contains(&lower.as_str()) {
            return token.to_string();
        }

        if lower.len() > 4 && lower.ends_with("ies") {
            return format!("{}y", &token[..token.len() - 3]);
        }
        if lower.ends_with("sses") {
            return token[..token.len() - 2].to_string();
        }
        if lower.len() > 5 && lower.ends_with("ing") && has_vowel(&lower[..lower.len() - 3]) {
            return undouble(&token[..token.len() - 3]);
        }
        if lower.len() > 4 && lower.ends_with("ed") && has_vowel(&lower[..lower.len() - 2]) {
            return undouble(&token[..token.len() - 2]);
        }
        if lower.len() > 3
            && lower.ends_with('s')
            && !lower.ends_with("ss")
            && !lower.ends_with("us")
        {
            return token[..token.len() - 1].to_string();
        }

        token.to_string()
    }
}

fn has_vowel(stem: &str) -> bool {
    stem.chars().any(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
}

/// "runn" -> "run", "stopp" -> "stop"; "fall" and "miss" keep their pair.
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    if let [.., a, b] = bytes {
        let last = b.to_ascii_lowercase();
        if a.eq_ignore_ascii_case(b)
            && last.is_ascii_alphabetic()
            && !matches!(last, b'a' | b'e' | b'i' | b'o' | b'u' | b'l' | b's' | b'z')
        {
            return stem[..stem.len() - 1].to_string();
        }
    }
    stem.to_string()
}
