use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_steps")]
    pub steps: Vec<String>,
    #[serde(default)]
    pub error_handling: ErrorHandling,
    #[serde(default = "default_logging_level")]
    pub logging_level: String,
    #[serde(default)]
    pub step_params: BTreeMap<String, StepParams>,
}

fn default_steps() -> Vec<String> {
    vec![
        "clean".to_string(),
        "transform".to_string(),
        "analyze".to_string(),
    ]
}

fn default_logging_level() -> String {
    "INFO".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            error_handling: ErrorHandling::default(),
            logging_level: default_logging_level(),
            step_params: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Config with the given step sequence and every other field defaulted.
    pub fn from_steps<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_error_handling(mut self, error_handling: ErrorHandling) -> Self {
        self.error_handling = error_handling;
        self
    }

    pub fn with_step_params(mut self, step: impl Into<String>, params: StepParams) -> Self {
        self.step_params.insert(step.into(), params);
        self
    }

    /// User overrides for a step, if any were configured.
    pub fn overrides_for(&self, step: &str) -> Option<&StepParams> {
        self.step_params.get(step)
    }
}

impl From<Vec<String>> for PipelineConfig {
    fn from(steps: Vec<String>) -> Self {
        Self::from_steps(steps)
    }
}

impl From<Vec<&str>> for PipelineConfig {
    fn from(steps: Vec<&str>) -> Self {
        Self::from_steps(steps)
    }
}

impl From<&[&str]> for PipelineConfig {
    fn from(steps: &[&str]) -> Self {
        Self::from_steps(steps.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorHandling {
    /// Record the failure, keep the previous text and run the next step.
    #[default]
    Continue,
    /// Abort the run on the first failing step.
    Stop,
}

impl ErrorHandling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for ErrorHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "stop" => Ok(Self::Stop),
            other => Err(format!(
                "invalid error handling '{}', expected 'continue' or 'stop'",
                other
            )),
        }
    }
}

/// Named parameter values for one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepParams(BTreeMap<String, Value>);

impl StepParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns a copy of `self` with every key of `overrides` written over it.
    pub fn merged(&self, overrides: Option<&StepParams>) -> StepParams {
        let mut merged = self.clone();
        if let Some(overrides) = overrides {
            for (key, value) in &overrides.0 {
                merged.0.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Reads a required boolean parameter. Absent keys and non-boolean
    /// values are both rejected; nothing is coerced.
    pub fn require_bool(&self, step: &str, key: &str) -> Result<bool, PipelineError> {
        match self.0.get(key) {
            Some(Value::Bool(value)) => Ok(*value),
            Some(other) => Err(PipelineError::invalid_parameter(
                step,
                format!("Parameter '{}' must be a boolean, got {}", key, other),
            )),
            None => Err(PipelineError::invalid_parameter(
                step,
                format!("Missing required parameter: {}", key),
            )),
        }
    }

    /// Reads an optional boolean parameter, `false` when absent.
    pub fn optional_bool(&self, step: &str, key: &str) -> Result<bool, PipelineError> {
        if self.0.contains_key(key) {
            self.require_bool(step, key)
        } else {
            Ok(false)
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StepParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
