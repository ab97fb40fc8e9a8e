pub mod progress;
pub mod result;
pub mod runner;
pub mod statistics;

pub use progress::{NoopProgress, ProgressEvent, ProgressReporter, RecordingProgress};
pub use result::{ProcessingResult, StepMetadata};
pub use runner::Pipeline;
pub use statistics::{StatisticsCollector, StatisticsSummary};
