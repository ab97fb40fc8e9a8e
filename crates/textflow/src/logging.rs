//! Tracing subscriber setup for the `textflow` binary and embedding apps.
//!
//! The library itself only emits `tracing` events; nothing is printed until
//! a subscriber is installed through [`init_tracing`].

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Parses a logging level name as used in pipeline config files.
///
/// Accepts tracing names plus the `WARNING` and `CRITICAL` spellings.
pub fn parse_level(name: &str) -> Result<LevelFilter, ConfigError> {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        "OFF" => Ok(LevelFilter::OFF),
        _ => Err(ConfigError::InvalidLogLevel(name.to_string())),
    }
}

/// Installs a global fmt subscriber. `RUST_LOG` directives take precedence
/// over `level`. Calling this twice keeps the first subscriber.
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
    };

    if result.is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level("INFO").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("Warning").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("CRITICAL").unwrap(), LevelFilter::ERROR);
        assert_eq!(parse_level(" off ").unwrap(), LevelFilter::OFF);
    }

    #[test]
    fn test_parse_level_rejects_unknown() {
        match parse_level("verbose") {
            Err(ConfigError::InvalidLogLevel(name)) => assert_eq!(name, "verbose"),
            other => panic!("Expected InvalidLogLevel, got {:?}", other),
        }
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(LevelFilter::OFF, false);
        init_tracing(LevelFilter::OFF, true);
    }
}
