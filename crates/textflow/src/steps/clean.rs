use std::sync::LazyLock;

use regex::Regex;

use crate::config::schema::StepParams;
use crate::error::PipelineError;
use crate::steps::{Step, StepResult};

pub const NAME: &str = "clean";

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_HORIZONTAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r]+").unwrap());
static RE_LINE_EDGES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());
static RE_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

pub fn default_params() -> StepParams {
    StepParams::new()
        .with("remove_extra_spaces", true)
        .with("preserve_newlines", false)
        .with("trim_edges", true)
}

/// Whitespace normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanStep {
    pub remove_extra_spaces: bool,
    pub preserve_newlines: bool,
    pub trim_edges: bool,
}

impl CleanStep {
    pub fn from_params(params: &StepParams) -> Result<Self, PipelineError> {
        Ok(Self {
            remove_extra_spaces: params.require_bool(NAME, "remove_extra_spaces")?,
            preserve_newlines: params.require_bool(NAME, "preserve_newlines")?,
            trim_edges: params.require_bool(NAME, "trim_edges")?,
        })
    }

    pub fn clean(&self, text: &str) -> String {
        let mut result = if self.trim_edges {
            text.trim().to_string()
        } else {
            text.to_string()
        };

        if self.remove_extra_spaces {
            result = if self.preserve_newlines {
                collapse_keeping_lines(&result)
            } else {
                RE_WHITESPACE.replace_all(&result, " ").into_owned()
            };
        }

        result
    }
}

/// Collapses horizontal whitespace, drops spaces hugging line breaks and
/// squeezes every run of blank lines down to a single blank line.
fn collapse_keeping_lines(text: &str) -> String {
    let collapsed = RE_HORIZONTAL.replace_all(text, " ");
    let lines = RE_LINE_EDGES.replace_all(&collapsed, "\n");
    RE_BLANK_LINES.replace_all(&lines, "\n\n").into_owned()
}

impl Step for CleanStep {
    fn process(&self, text: &str) -> StepResult<String> {
        Ok(self.clean(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(remove_extra_spaces: bool, preserve_newlines: bool, trim_edges: bool) -> CleanStep {
        CleanStep {
            remove_extra_spaces,
            preserve_newlines,
            trim_edges,
        }
    }

    #[test]
    fn test_defaults_collapse_everything() {
        let clean = CleanStep::from_params(&default_params()).unwrap();
        assert_eq!(
            clean.clean("  Hello, World!  \n  This is a TEST.  "),
            "Hello, World! This is a TEST."
        );
    }

    #[test]
    fn test_preserve_newlines() {
        let clean = step(true, true, true);
        assert_eq!(clean.clean("  Multiple\n\n  Lines  "), "Multiple\n\nLines");
        assert_eq!(clean.clean("a \t b\n\n\n\nc"), "a b\n\nc");
        assert_eq!(clean.clean("one\n  \n \t \ntwo"), "one\n\ntwo");
        assert_eq!(clean.clean("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_preserve_newlines_handles_crlf() {
        let clean = step(true, true, true);
        assert_eq!(clean.clean("a\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_trim_only() {
        let clean = step(false, false, true);
        assert_eq!(clean.clean("  a   b  "), "a   b");
    }

    #[test]
    fn test_collapse_without_trim() {
        let clean = step(true, false, false);
        assert_eq!(clean.clean("  a   b  "), " a b ");
    }

    #[test]
    fn test_everything_disabled_is_identity() {
        let clean = step(false, true, false);
        let text = "  keep \n\n\n as is ";
        assert_eq!(clean.clean(text), text);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(step(true, false, true).clean(""), "");
        assert_eq!(step(true, true, true).clean(""), "");
    }

    #[test]
    fn test_missing_parameter() {
        let params = StepParams::new()
            .with("remove_extra_spaces", true)
            .with("trim_edges", true);

        let err = CleanStep::from_params(&params).unwrap_err();
        assert!(err.to_string().contains("preserve_newlines"));
    }
}
