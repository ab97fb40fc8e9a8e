use std::path::Path;

use serde_json::Value;

use crate::config::schema::PipelineConfig;
use crate::error::ConfigError;
use crate::logging;

const SCHEMA_JSON: &str = include_str!("../../schema/pipeline-config-v1.json");

/// Loads a pipeline config file. `.yaml`/`.yml` files are read as YAML,
/// everything else as JSON.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        load_config_from_yaml_str(&content)
    } else {
        load_config_from_str(&content)
    }
}

pub fn load_config_from_str(content: &str) -> Result<PipelineConfig, ConfigError> {
    let json_value: Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<PipelineConfig, ConfigError> {
    let json_value: Value = serde_yaml::from_str(content)?;
    load_config_from_value(json_value)
}

/// Validates an already-parsed config document and converts it.
pub fn load_config_from_value(json_value: Value) -> Result<PipelineConfig, ConfigError> {
    validate_schema(&json_value)?;

    let config: PipelineConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &Value) -> Result<(), ConfigError> {
    let schema: Value = serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
        message: format!("Invalid embedded schema JSON: {}", e),
    })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    for (index, step) in config.steps.iter().enumerate() {
        if step.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("Step at position {} has an empty name", index),
            });
        }
    }

    for name in config.step_params.keys() {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "step_params contains an empty step name".to_string(),
            });
        }
    }

    logging::parse_level(&config.logging_level)?;

    Ok(())
}
