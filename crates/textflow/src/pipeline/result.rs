use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::schema::StepParams;
use crate::steps::AnalysisMap;

/// Outcome of one `process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub processed_text: String,
    pub tokenized_text: Vec<String>,
    pub steps_applied: Vec<String>,
    pub steps_skipped: Vec<String>,
    pub processing_time: Duration,
    /// Empty unless an analyzer step succeeded.
    pub analysis: AnalysisMap,
    pub errors: Vec<String>,
    pub step_metadata: Vec<StepMetadata>,
    pub timestamp: DateTime<Utc>,
}

impl ProcessingResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn processing_secs(&self) -> f64 {
        self.processing_time.as_secs_f64()
    }
}

/// One attempted step execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMetadata {
    pub step_name: String,
    pub execution_time: Duration,
    pub success: bool,
    pub error_message: Option<String>,
    pub parameters: StepParams,
}
