use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn};

use crate::config::schema::{ErrorHandling, PipelineConfig, StepParams};
use crate::error::{ConfigError, PipelineError, Result};
use crate::steps::{AnalysisMap, Step, StepRegistry};

use super::progress::{NoopProgress, ProgressEvent, ProgressReporter};
use super::result::ProcessingResult;
use super::statistics::{StatisticsCollector, StatisticsSummary};

/// Runs a configured sequence of registry steps over input text.
///
/// `process` takes `&mut self` because the summary of the latest run is
/// stored on the instance; use one `Pipeline` per thread.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    registry: StepRegistry,
    last_run: StatisticsSummary,
}

struct StepOutcome {
    text: String,
    analysis: Option<AnalysisMap>,
    elapsed: Duration,
}

impl Pipeline {
    /// Builds a pipeline over the built-in step registry.
    pub fn new(config: impl Into<PipelineConfig>) -> Result<Self> {
        Self::with_registry(config, StepRegistry::new())
    }

    /// Builds a pipeline over a caller-supplied registry.
    ///
    /// Fails with [`ConfigError::UnknownStep`] for unregistered names and
    /// with [`PipelineError::InvalidParameter`] when a step rejects its
    /// merged parameters.
    pub fn with_registry(config: impl Into<PipelineConfig>, registry: StepRegistry) -> Result<Self> {
        let config = config.into();
        validate_steps(&config, &registry)?;

        debug!(
            steps = ?config.steps,
            error_handling = %config.error_handling,
            backend = registry.backend().name(),
            "Pipeline configured"
        );

        Ok(Self {
            config,
            registry,
            last_run: StatisticsSummary::default(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Registry defaults for `step` overlaid with the configured overrides.
    pub fn effective_params(&self, step: &str) -> StepParams {
        effective_params(&self.config, &self.registry, step)
    }

    pub fn process(&mut self, text: &str) -> Result<ProcessingResult> {
        self.process_with_progress(text, &NoopProgress)
    }

    /// Processes each text independently, in order. Under the stop policy
    /// the first failing text aborts the batch.
    pub fn process_batch<I, S>(&mut self, texts: I) -> Result<Vec<ProcessingResult>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results = Vec::new();
        for (index, text) in texts.into_iter().enumerate() {
            debug!(item = index, "Processing batch item");
            results.push(self.process(text.as_ref())?);
        }
        Ok(results)
    }

    pub fn process_with_progress(
        &mut self,
        text: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ProcessingResult> {
        let (result, statistics) = self.run(text, progress);
        self.last_run = statistics.summary();
        result
    }

    /// Summary of the most recent `process` call, including aborted ones.
    pub fn statistics_summary(&self) -> &StatisticsSummary {
        &self.last_run
    }

    /// Runs the full pipeline for a single text.
    /// Returns the result together with the run's collector, which is
    /// populated up to the failing step when the run aborts.
    pub fn run(
        &self,
        text: &str,
        progress: &dyn ProgressReporter,
    ) -> (Result<ProcessingResult>, StatisticsCollector) {
        let total_steps = self.config.steps.len();
        let _pipeline_span = info_span!("pipeline",
            steps = total_steps,
            error_handling = %self.config.error_handling,
        )
        .entered();

        info!("Starting text processing pipeline with {} steps", total_steps);
        progress.report(ProgressEvent::RunStarted { total_steps });

        let start = Instant::now();
        let mut statistics = StatisticsCollector::new();
        let mut current_text = text.to_string();

        for (index, step_name) in self.config.steps.iter().enumerate() {
            let _step = info_span!("step", name = %step_name, index).entered();
            info!("Executing step: {}", step_name);
            progress.report(ProgressEvent::StepStarted {
                step: step_name.clone(),
                index,
                total_steps,
            });

            let params = self.effective_params(step_name);
            // Construction was validated up front, but a factory may still
            // fail here; that counts as a step failure under the policy.
            let outcome = self
                .registry
                .create(step_name, &params)
                .and_then(|step| execute_step(step_name, step.as_ref(), &current_text));

            match outcome {
                Ok(outcome) => {
                    debug!(
                        "Step {} completed in {:.4}s",
                        step_name,
                        outcome.elapsed.as_secs_f64()
                    );
                    statistics.record_success(step_name, outcome.elapsed, params);
                    if let Some(analysis) = outcome.analysis {
                        statistics.record_analysis(analysis);
                    }
                    current_text = outcome.text;
                    progress.report(ProgressEvent::StepCompleted {
                        step: step_name.clone(),
                        elapsed: outcome.elapsed,
                    });
                }
                Err(e) => {
                    let message = failure_message(&e);
                    // Partial durations are not measured for failed steps.
                    statistics.record_failure(step_name, Duration::ZERO, &message, params);
                    progress.report(ProgressEvent::StepFailed {
                        step: step_name.clone(),
                        error: message.clone(),
                    });

                    match self.config.error_handling {
                        ErrorHandling::Stop => {
                            error!("Step '{}' failed: {}", step_name, message);
                            return (Err(e), statistics);
                        }
                        ErrorHandling::Continue => {
                            warn!("Step '{}' failed, keeping previous text: {}", step_name, message);
                        }
                    }
                }
            }
        }

        let processing_time = start.elapsed();
        let applied = statistics.steps_applied().len();
        let skipped = statistics.steps_skipped().len();

        progress.report(ProgressEvent::RunFinished {
            applied,
            skipped,
            elapsed: processing_time,
        });
        info!(
            "Pipeline completed. Applied {} steps, skipped {} steps",
            applied, skipped
        );

        let result = ProcessingResult {
            tokenized_text: current_text.split_whitespace().map(String::from).collect(),
            processed_text: current_text,
            steps_applied: statistics.steps_applied().to_vec(),
            steps_skipped: statistics.steps_skipped().to_vec(),
            processing_time,
            analysis: statistics.analysis().clone(),
            errors: statistics.errors().to_vec(),
            step_metadata: statistics.step_metadata().to_vec(),
            timestamp: Utc::now(),
        };

        (Ok(result), statistics)
    }
}

fn effective_params(config: &PipelineConfig, registry: &StepRegistry, step: &str) -> StepParams {
    registry
        .defaults(step)
        .cloned()
        .unwrap_or_default()
        .merged(config.overrides_for(step))
}

/// Every configured name must be registered and every step must accept its
/// merged parameters.
fn validate_steps(config: &PipelineConfig, registry: &StepRegistry) -> Result<()> {
    for step in &config.steps {
        if !registry.contains(step) {
            return Err(ConfigError::UnknownStep {
                step: step.clone(),
                available: registry.names(),
            }
            .into());
        }
    }

    for step in &config.steps {
        let params = effective_params(config, registry, step);
        registry.create(step, &params)?;
    }

    Ok(())
}

fn execute_step(name: &str, step: &dyn Step, text: &str) -> Result<StepOutcome> {
    let start = Instant::now();

    let processed = step
        .process(text)
        .map_err(|e| PipelineError::step_execution(name, e))?;

    let analysis = step
        .as_analyzer()
        .map(|analyzer| analyzer.analyze(&processed))
        .transpose()
        .map_err(|e| PipelineError::step_execution(name, e))?;

    Ok(StepOutcome {
        text: processed,
        analysis,
        elapsed: start.elapsed(),
    })
}

fn failure_message(err: &PipelineError) -> String {
    match err {
        PipelineError::StepExecution { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
