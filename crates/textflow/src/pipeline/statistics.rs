use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::schema::StepParams;
use crate::steps::AnalysisMap;

use super::result::StepMetadata;

/// Per-run accumulator of step outcomes. The engine builds a fresh one for
/// every processed text.
#[derive(Debug, Clone, Default)]
pub struct StatisticsCollector {
    steps_applied: Vec<String>,
    steps_skipped: Vec<String>,
    errors: Vec<String>,
    step_metadata: Vec<StepMetadata>,
    analysis_results: AnalysisMap,
}

/// Read-only projection of a collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub steps_applied: Vec<String>,
    pub steps_skipped: Vec<String>,
    pub errors: Vec<String>,
    pub total_execution_time: Duration,
    pub step_count: usize,
    pub success_rate: f64,
    pub analysis_results: AnalysisMap,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, step_name: &str, execution_time: Duration, params: StepParams) {
        self.steps_applied.push(step_name.to_string());
        self.step_metadata.push(StepMetadata {
            step_name: step_name.to_string(),
            execution_time,
            success: true,
            error_message: None,
            parameters: params,
        });
    }

    pub fn record_failure(
        &mut self,
        step_name: &str,
        execution_time: Duration,
        message: &str,
        params: StepParams,
    ) {
        self.steps_skipped.push(step_name.to_string());
        self.errors.push(format!("{}: {}", step_name, message));
        self.step_metadata.push(StepMetadata {
            step_name: step_name.to_string(),
            execution_time,
            success: false,
            error_message: Some(message.to_string()),
            parameters: params,
        });
    }

    /// Merges into the cumulative analysis; later keys overwrite earlier ones.
    pub fn record_analysis(&mut self, analysis: AnalysisMap) {
        for (key, value) in analysis {
            self.analysis_results.insert(key, value);
        }
    }

    pub fn reset(&mut self) {
        self.steps_applied.clear();
        self.steps_skipped.clear();
        self.errors.clear();
        self.step_metadata.clear();
        self.analysis_results.clear();
    }

    pub fn steps_applied(&self) -> &[String] {
        &self.steps_applied
    }

    pub fn steps_skipped(&self) -> &[String] {
        &self.steps_skipped
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn step_metadata(&self) -> &[StepMetadata] {
        &self.step_metadata
    }

    pub fn analysis(&self) -> &AnalysisMap {
        &self.analysis_results
    }

    pub fn summary(&self) -> StatisticsSummary {
        let attempted = self.step_metadata.len();

        StatisticsSummary {
            steps_applied: self.steps_applied.clone(),
            steps_skipped: self.steps_skipped.clone(),
            errors: self.errors.clone(),
            total_execution_time: self.step_metadata.iter().map(|m| m.execution_time).sum(),
            step_count: attempted,
            success_rate: self.steps_applied.len() as f64 / attempted.max(1) as f64,
            analysis_results: self.analysis_results.clone(),
        }
    }
}
