use std::path::PathBuf;
use thiserror::Error;

/// Boxed cause carried by step failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid parameter for step '{step}': {message}")]
    InvalidParameter { step: String, message: String },

    #[error("Step '{step}' failed: {message}")]
    StepExecution {
        step: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Unknown step '{name}'. Available steps: {}", .available.join(", "))]
    UnknownStep { name: String, available: Vec<String> },
}

impl PipelineError {
    pub fn invalid_parameter(step: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            step: step.to_string(),
            message: message.into(),
        }
    }

    /// Wraps a failure raised inside a step's processing logic.
    pub fn step_execution(step: &str, source: BoxError) -> Self {
        Self::StepExecution {
            step: step.to_string(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Name of the step this error is attributed to, if any.
    pub fn step_name(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { step, .. } | Self::StepExecution { step, .. } => Some(step),
            Self::UnknownStep { name, .. } => Some(name),
            Self::Configuration(ConfigError::UnknownStep { step, .. }) => Some(step),
            Self::Configuration(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Unknown step '{step}' in configuration. Available steps: {}", .available.join(", "))]
    UnknownStep { step: String, available: Vec<String> },

    #[error("Invalid logging level '{0}'")]
    InvalidLogLevel(String),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_execution_keeps_cause() {
        let cause: BoxError = "boom".into();
        let err = PipelineError::step_execution("transform", cause);

        assert_eq!(err.to_string(), "Step 'transform' failed: boom");
        assert_eq!(err.step_name(), Some("transform"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unknown_step_lists_available() {
        let err = ConfigError::UnknownStep {
            step: "invalid_step".to_string(),
            available: vec!["clean".to_string(), "analyze".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Unknown step 'invalid_step' in configuration. Available steps: clean, analyze"
        );
        assert_eq!(
            PipelineError::from(err).step_name(),
            Some("invalid_step")
        );
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = PipelineError::invalid_parameter("clean", "Missing required parameter: trim_edges");
        assert_eq!(
            err.to_string(),
            "Invalid parameter for step 'clean': Missing required parameter: trim_edges"
        );
    }
}
