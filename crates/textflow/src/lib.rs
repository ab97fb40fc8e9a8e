pub mod config;
pub mod error;
pub mod linguistic;
pub mod logging;
pub mod pipeline;
pub mod steps;

pub use config::{load_config, ErrorHandling, PipelineConfig, StepParams};
pub use error::{ConfigError, PipelineError, Result};
pub use linguistic::{select_backend, LinguisticBackend, RegexBackend};
pub use pipeline::{Pipeline, ProcessingResult, StatisticsSummary, StepMetadata};
pub use steps::{AnalysisMap, Analyzer, Step, StepRegistry, StepResult};
