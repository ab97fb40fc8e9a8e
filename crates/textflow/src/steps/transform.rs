use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::config::schema::StepParams;
use crate::error::PipelineError;
use crate::linguistic::LinguisticBackend;
use crate::steps::{Step, StepResult};

pub const NAME: &str = "transform";

static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static RE_SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").unwrap());

pub fn default_params() -> StepParams {
    StepParams::new()
        .with("to_lowercase", true)
        .with("remove_punctuation", true)
        .with("remove_numbers", false)
        .with("remove_special_chars", false)
}

/// Case folding and character filtering, applied in the order
/// lowercase -> punctuation -> digits -> special characters.
#[derive(Clone)]
pub struct TransformStep {
    pub to_lowercase: bool,
    pub remove_punctuation: bool,
    pub remove_numbers: bool,
    pub remove_special_chars: bool,
    /// Only honoured by enhanced backends.
    pub remove_stopwords: bool,
    /// Only honoured by enhanced backends.
    pub lemmatize: bool,
    backend: Arc<dyn LinguisticBackend>,
}

impl TransformStep {
    pub fn from_params(
        params: &StepParams,
        backend: Arc<dyn LinguisticBackend>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            to_lowercase: params.require_bool(NAME, "to_lowercase")?,
            remove_punctuation: params.require_bool(NAME, "remove_punctuation")?,
            remove_numbers: params.require_bool(NAME, "remove_numbers")?,
            remove_special_chars: params.require_bool(NAME, "remove_special_chars")?,
            remove_stopwords: params.optional_bool(NAME, "remove_stopwords")?,
            lemmatize: params.optional_bool(NAME, "lemmatize")?,
            backend,
        })
    }

    pub fn transform(&self, text: &str) -> String {
        let mut result = if self.to_lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        if self.remove_punctuation {
            result.retain(|c| !c.is_ascii_punctuation());
        }

        if self.remove_numbers {
            result = RE_DIGITS.replace_all(&result, "").into_owned();
        }

        if self.remove_special_chars {
            result = RE_SPECIAL.replace_all(&result, "").into_owned();
        }

        if (self.remove_stopwords || self.lemmatize) && self.backend.is_enhanced() {
            result = self.apply_token_rules(&result);
        }

        result
    }

    fn apply_token_rules(&self, text: &str) -> String {
        self.backend
            .tokenize(text)
            .into_iter()
            .filter(|token| !(self.remove_stopwords && self.backend.is_stopword(token)))
            .map(|token| {
                if self.lemmatize && !self.backend.is_punctuation(&token) {
                    self.backend.lemmatize(&token)
                } else {
                    token
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for TransformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformStep")
            .field("to_lowercase", &self.to_lowercase)
            .field("remove_punctuation", &self.remove_punctuation)
            .field("remove_numbers", &self.remove_numbers)
            .field("remove_special_chars", &self.remove_special_chars)
            .field("remove_stopwords", &self.remove_stopwords)
            .field("lemmatize", &self.lemmatize)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Step for TransformStep {
    fn process(&self, text: &str) -> StepResult<String> {
        Ok(self.transform(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linguistic::RegexBackend;

    fn step_with(params: StepParams) -> TransformStep {
        TransformStep::from_params(&params, Arc::new(RegexBackend::new())).unwrap()
    }

    fn all_flags(lower: bool, punct: bool, numbers: bool, special: bool) -> StepParams {
        StepParams::new()
            .with("to_lowercase", lower)
            .with("remove_punctuation", punct)
            .with("remove_numbers", numbers)
            .with("remove_special_chars", special)
    }

    #[test]
    fn test_defaults_lowercase_and_strip_punctuation() {
        let step = step_with(default_params());
        assert_eq!(
            step.transform("Hello, World! This is a TEST."),
            "hello world this is a test"
        );
    }

    #[test]
    fn test_remove_numbers() {
        let step = step_with(all_flags(false, false, true, false));
        assert_eq!(step.transform("Room 101, floor 3"), "Room , floor ");
    }

    #[test]
    fn test_remove_special_chars_keeps_whitespace() {
        let step = step_with(all_flags(false, false, false, true));
        assert_eq!(step.transform("café & crème\t2€"), "caf  crme\t2");
    }

    #[test]
    fn test_punctuation_is_ascii_only() {
        let step = step_with(all_flags(false, true, false, false));
        assert_eq!(step.transform("«Hi!» — ok?"), "«Hi» — ok");
    }

    #[test]
    fn test_all_disabled_is_identity() {
        let step = step_with(all_flags(false, false, false, false));
        assert_eq!(step.transform("Keep 42, As-Is!"), "Keep 42, As-Is!");
    }

    #[test]
    fn test_token_options_are_noop_on_regex_backend() {
        let params = default_params()
            .with("remove_stopwords", true)
            .with("lemmatize", true);
        let step = step_with(params);
        assert_eq!(step.transform("The  cats,  running"), "the  cats  running");
    }

    #[test]
    fn test_non_boolean_flag_rejected() {
        let params = default_params().with("remove_numbers", "yes");
        let result = TransformStep::from_params(&params, Arc::new(RegexBackend::new()));
        assert!(matches!(result, Err(PipelineError::InvalidParameter { .. })));
    }

    #[cfg(feature = "nlp")]
    #[test]
    fn test_token_options_with_english_backend() {
        use crate::linguistic::EnglishBackend;

        let params = default_params()
            .with("remove_stopwords", true)
            .with("lemmatize", true);
        let step = TransformStep::from_params(&params, Arc::new(EnglishBackend::new())).unwrap();
        assert_eq!(step.transform("The cats are running"), "cat run");
    }
}
