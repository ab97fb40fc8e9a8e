//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use textflow::{ErrorHandling, PipelineConfig, StepParams};

/// Builder for creating `PipelineConfig` instances.
pub struct ConfigBuilder {
    config: PipelineConfig,
}

impl ConfigBuilder {
    /// Create a builder with no steps and the continue policy.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::from_steps(Vec::<String>::new()),
        }
    }

    /// Append a step to the sequence.
    pub fn step(mut self, name: &str) -> Self {
        self.config.steps.push(name.to_string());
        self
    }

    /// Use the stop policy.
    pub fn stop_on_error(mut self) -> Self {
        self.config.error_handling = ErrorHandling::Stop;
        self
    }

    /// Override a single parameter of a step.
    pub fn param(mut self, step: &str, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.config
            .step_params
            .entry(step.to_string())
            .or_insert_with(StepParams::new)
            .insert(key, value);
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
