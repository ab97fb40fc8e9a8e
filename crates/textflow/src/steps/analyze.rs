//! Read-only text statistics and a Flesch Reading Ease estimate.
//!
//! The analyze step never changes its input: `process` is the identity and
//! the numbers are exposed through the [`Analyzer`] capability.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::schema::StepParams;
use crate::error::PipelineError;
use crate::steps::{AnalysisMap, Analyzer, Step, StepResult};

pub const NAME: &str = "analyze";

static RE_SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

pub fn default_params() -> StepParams {
    StepParams::new()
        .with("count_words", true)
        .with("count_characters", true)
        .with("count_sentences", true)
        .with("count_paragraphs", true)
        .with("average_word_length", true)
        .with("reading_level", true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeStep {
    pub count_words: bool,
    pub count_characters: bool,
    pub count_sentences: bool,
    pub count_paragraphs: bool,
    pub average_word_length: bool,
    pub reading_level: bool,
}

/// Typed form of the analysis map. Disabled or undefined figures are
/// left out of the serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_count_no_spaces: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_word_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_level: Option<ReadingLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingLevel {
    pub flesch_score: f64,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Very Easy")]
    VeryEasy,
    #[serde(rename = "Easy")]
    Easy,
    #[serde(rename = "Fairly Easy")]
    FairlyEasy,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Fairly Difficult")]
    FairlyDifficult,
    #[serde(rename = "Difficult")]
    Difficult,
    #[serde(rename = "Very Difficult")]
    VeryDifficult,
}

impl Difficulty {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::VeryEasy
        } else if score >= 80.0 {
            Self::Easy
        } else if score >= 70.0 {
            Self::FairlyEasy
        } else if score >= 60.0 {
            Self::Standard
        } else if score >= 50.0 {
            Self::FairlyDifficult
        } else if score >= 30.0 {
            Self::Difficult
        } else {
            Self::VeryDifficult
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryEasy => "Very Easy",
            Self::Easy => "Easy",
            Self::FairlyEasy => "Fairly Easy",
            Self::Standard => "Standard",
            Self::FairlyDifficult => "Fairly Difficult",
            Self::Difficult => "Difficult",
            Self::VeryDifficult => "Very Difficult",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl AnalyzeStep {
    pub fn from_params(params: &StepParams) -> Result<Self, PipelineError> {
        Ok(Self {
            count_words: params.require_bool(NAME, "count_words")?,
            count_characters: params.require_bool(NAME, "count_characters")?,
            count_sentences: params.require_bool(NAME, "count_sentences")?,
            count_paragraphs: params.require_bool(NAME, "count_paragraphs")?,
            average_word_length: params.require_bool(NAME, "average_word_length")?,
            reading_level: params.require_bool(NAME, "reading_level")?,
        })
    }

    pub fn compute(&self, text: &str) -> TextAnalysis {
        let mut analysis = TextAnalysis::default();
        let words: Vec<&str> = text.split_whitespace().collect();
        let sentences = sentences(text);

        if self.count_characters {
            analysis.character_count = Some(text.chars().count());
            analysis.character_count_no_spaces = Some(text.chars().filter(|c| *c != ' ').count());
        }

        if self.count_words {
            analysis.word_count = Some(words.len());

            if self.average_word_length && !words.is_empty() {
                let total_length: usize = words.iter().map(|w| w.chars().count()).sum();
                analysis.average_word_length =
                    Some(round2(total_length as f64 / words.len() as f64));
            }
        }

        if self.count_sentences {
            analysis.sentence_count = Some(sentences.len());
        }

        if self.count_paragraphs {
            analysis.paragraph_count = Some(
                text.split("\n\n")
                    .filter(|p| !p.trim().is_empty())
                    .count(),
            );
        }

        if self.reading_level && self.count_words && self.count_sentences {
            analysis.reading_level = reading_level(&words, sentences.len());
        }

        analysis
    }
}

impl Step for AnalyzeStep {
    fn process(&self, text: &str) -> StepResult<String> {
        Ok(text.to_string())
    }

    fn as_analyzer(&self) -> Option<&dyn Analyzer> {
        Some(self)
    }
}

impl Analyzer for AnalyzeStep {
    fn analyze(&self, text: &str) -> StepResult<AnalysisMap> {
        match serde_json::to_value(self.compute(text))? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(format!("analysis serialized to non-object value: {}", other).into()),
        }
    }
}

/// Non-blank fragments between runs of `.`, `!` and `?`.
fn sentences(text: &str) -> Vec<&str> {
    RE_SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Flesch Reading Ease; `None` when there are no words or no sentences.
fn reading_level(words: &[&str], sentence_count: usize) -> Option<ReadingLevel> {
    if words.is_empty() || sentence_count == 0 {
        return None;
    }

    let word_count = words.len() as f64;
    let avg_sentence_length = word_count / sentence_count as f64;
    let total_syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let avg_syllables = total_syllables as f64 / word_count;

    let score = round2(206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables);

    Some(ReadingLevel {
        flesch_score: score,
        difficulty: Difficulty::from_score(score),
    })
}

/// Counts vowel groups, drops a trailing silent "e", never returns 0.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0;
    let mut prev_was_vowel = false;

    for c in word.chars() {
        let is_vowel = VOWELS.contains(&c);
        if is_vowel && !prev_was_vowel {
            count += 1;
        }
        prev_was_vowel = is_vowel;
    }

    if word.ends_with('e') && count > 1 {
        count -= 1;
    }

    count.max(1)
}

/// Rounds the exact binary value to two decimals. Scaling by 100 first can
/// land on a spurious .5 and round the wrong way.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
