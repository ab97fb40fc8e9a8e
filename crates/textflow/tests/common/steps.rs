//! Custom steps used to drive the engine's error-handling paths.

#![allow(dead_code)]

use textflow::{AnalysisMap, Analyzer, PipelineError, Step, StepParams, StepRegistry, StepResult};

/// Appends a fixed suffix to its input.
pub struct AppendStep {
    suffix: String,
}

impl AppendStep {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
        }
    }
}

impl Step for AppendStep {
    fn process(&self, text: &str) -> StepResult<String> {
        Ok(format!("{}{}", text, self.suffix))
    }
}

/// Always fails during `process`.
pub struct FailingStep;

impl Step for FailingStep {
    fn process(&self, _text: &str) -> StepResult<String> {
        Err("simulated failure".into())
    }
}

/// Passes text through unchanged but fails while producing its analysis.
pub struct FailingAnalyzer;

impl Step for FailingAnalyzer {
    fn process(&self, text: &str) -> StepResult<String> {
        Ok(format!("{} (unused)", text))
    }

    fn as_analyzer(&self) -> Option<&dyn Analyzer> {
        Some(self)
    }
}

impl Analyzer for FailingAnalyzer {
    fn analyze(&self, _text: &str) -> StepResult<AnalysisMap> {
        Err("analysis unavailable".into())
    }
}

/// Built-in registry plus `exclaim` (appends "!"), `fail` (always fails)
/// `bad_analysis` (fails in its analyzer) and `strict` (requires a boolean
/// `enabled` parameter).
pub fn test_registry() -> StepRegistry {
    let mut registry = StepRegistry::new();

    registry.register("exclaim", |_| Ok(Box::new(AppendStep::new("!")) as Box<dyn Step>));
    registry.register("fail", |_| Ok(Box::new(FailingStep) as Box<dyn Step>));
    registry.register("bad_analysis", |_| {
        Ok(Box::new(FailingAnalyzer) as Box<dyn Step>)
    });
    registry.register_with_defaults(
        "strict",
        StepParams::new().with("enabled", true),
        |params: &StepParams| -> Result<Box<dyn Step>, PipelineError> {
            params.require_bool("strict", "enabled")?;
            Ok(Box::new(AppendStep::new("")))
        },
    );

    registry
}
