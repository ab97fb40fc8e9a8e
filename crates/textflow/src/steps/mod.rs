pub mod analyze;
pub mod clean;
pub mod transform;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::schema::StepParams;
use crate::error::{BoxError, PipelineError};
use crate::linguistic::{LinguisticBackend, RegexBackend};

pub use analyze::AnalyzeStep;
pub use clean::CleanStep;
pub use transform::TransformStep;

/// Key/value statistics produced by analyzer steps.
pub type AnalysisMap = Map<String, Value>;

/// Result type for step logic. Failures are wrapped into
/// [`PipelineError::StepExecution`] by the engine.
pub type StepResult<T> = std::result::Result<T, BoxError>;

/// One text transformation stage. Instances are built from validated
/// parameters, so `process` never sees a missing key.
pub trait Step: Send + Sync {
    fn process(&self, text: &str) -> StepResult<String>;

    /// Capability query for steps that also produce analysis.
    fn as_analyzer(&self) -> Option<&dyn Analyzer> {
        None
    }
}

pub trait Analyzer {
    fn analyze(&self, text: &str) -> StepResult<AnalysisMap>;
}

pub type StepFactory =
    Arc<dyn Fn(&StepParams) -> Result<Box<dyn Step>, PipelineError> + Send + Sync>;

#[derive(Clone)]
struct RegisteredStep {
    name: String,
    defaults: StepParams,
    factory: StepFactory,
}

/// Name -> constructor table. Registration order is preserved; registering
/// an existing name replaces its constructor in place.
#[derive(Clone)]
pub struct StepRegistry {
    steps: Vec<RegisteredStep>,
    backend: Arc<dyn LinguisticBackend>,
}

impl StepRegistry {
    /// Registry with the built-in clean, transform and analyze steps.
    pub fn new() -> Self {
        Self::with_backend(Arc::new(RegexBackend::new()))
    }

    /// Built-in steps wired to the given linguistic backend.
    pub fn with_backend(backend: Arc<dyn LinguisticBackend>) -> Self {
        let mut registry = Self::empty_with_backend(backend.clone());

        registry.register_with_defaults(clean::NAME, clean::default_params(), |params| {
            Ok(Box::new(CleanStep::from_params(params)?) as Box<dyn Step>)
        });

        let transform_backend = backend;
        registry.register_with_defaults(
            transform::NAME,
            transform::default_params(),
            move |params| {
                Ok(Box::new(TransformStep::from_params(params, transform_backend.clone())?)
                    as Box<dyn Step>)
            },
        );

        registry.register_with_defaults(analyze::NAME, analyze::default_params(), |params| {
            Ok(Box::new(AnalyzeStep::from_params(params)?) as Box<dyn Step>)
        });

        registry
    }

    /// Registry with no steps and the regex backend.
    pub fn empty() -> Self {
        Self::empty_with_backend(Arc::new(RegexBackend::new()))
    }

    fn empty_with_backend(backend: Arc<dyn LinguisticBackend>) -> Self {
        Self {
            steps: Vec::new(),
            backend,
        }
    }

    /// Installs (or replaces) a step constructor with no default parameters.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&StepParams) -> Result<Box<dyn Step>, PipelineError> + Send + Sync + 'static,
    {
        self.register_with_defaults(name, StepParams::new(), factory);
    }

    /// Installs (or replaces) a step constructor together with the defaults
    /// the engine merges user overrides into.
    pub fn register_with_defaults<F>(
        &mut self,
        name: impl Into<String>,
        defaults: StepParams,
        factory: F,
    ) where
        F: Fn(&StepParams) -> Result<Box<dyn Step>, PipelineError> + Send + Sync + 'static,
    {
        let entry = RegisteredStep {
            name: name.into(),
            defaults,
            factory: Arc::new(factory),
        };

        match self.steps.iter_mut().find(|s| s.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.steps.push(entry),
        }
    }

    /// All registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn defaults(&self, name: &str) -> Option<&StepParams> {
        self.lookup(name).map(|s| &s.defaults)
    }

    pub fn backend(&self) -> &Arc<dyn LinguisticBackend> {
        &self.backend
    }

    /// Builds a step from `params` as given; no defaults are merged here.
    pub fn create(&self, name: &str, params: &StepParams) -> Result<Box<dyn Step>, PipelineError> {
        let entry = self.lookup(name).ok_or_else(|| PipelineError::UnknownStep {
            name: name.to_string(),
            available: self.names(),
        })?;

        (entry.factory)(params)
    }

    fn lookup(&self, name: &str) -> Option<&RegisteredStep> {
        self.steps.iter().find(|s| s.name == name)
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.names())
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Step for Upper {
        fn process(&self, text: &str) -> StepResult<String> {
            Ok(text.to_uppercase())
        }
    }

    #[test]
    fn test_default_registration_order() {
        let registry = StepRegistry::new();
        assert_eq!(registry.names(), vec!["clean", "transform", "analyze"]);
        assert_eq!(registry.backend().name(), "regex");
    }

    #[test]
    fn test_create_unknown_step() {
        let registry = StepRegistry::new();

        match registry.create("invalid_step", &StepParams::new()) {
            Err(PipelineError::UnknownStep { name, available }) => {
                assert_eq!(name, "invalid_step");
                assert_eq!(available, vec!["clean", "transform", "analyze"]);
            }
            Err(other) => panic!("Expected UnknownStep error, got {}", other),
            Ok(_) => panic!("Expected UnknownStep error"),
        }
    }

    #[test]
    fn test_create_propagates_validation_failure() {
        let registry = StepRegistry::new();

        let result = registry.create("clean", &StepParams::new());
        assert!(matches!(result, Err(PipelineError::InvalidParameter { .. })));
    }

    #[test]
    fn test_create_with_defaults() {
        let registry = StepRegistry::new();
        let defaults = registry.defaults("clean").unwrap().clone();

        let step = registry.create("clean", &defaults).unwrap();
        assert_eq!(step.process("  a   b  ").unwrap(), "a b");
        assert!(step.as_analyzer().is_none());
    }

    #[test]
    fn test_register_custom_step() {
        let mut registry = StepRegistry::new();
        registry.register("upper", |_| Ok(Box::new(Upper) as Box<dyn Step>));

        assert_eq!(registry.names(), vec!["clean", "transform", "analyze", "upper"]);
        assert!(registry.defaults("upper").unwrap().is_empty());

        let step = registry.create("upper", &StepParams::new()).unwrap();
        assert_eq!(step.process("abc").unwrap(), "ABC");
    }

    #[test]
    fn test_register_overwrites_in_place() {
        let mut registry = StepRegistry::new();
        registry.register("clean", |_| Ok(Box::new(Upper) as Box<dyn Step>));

        assert_eq!(registry.names(), vec!["clean", "transform", "analyze"]);
        let step = registry.create("clean", &StepParams::new()).unwrap();
        assert_eq!(step.process("  x ").unwrap(), "  X ");
    }

    #[test]
    fn test_empty_registry() {
        let registry = StepRegistry::empty();
        assert!(registry.names().is_empty());
        assert!(!registry.contains("clean"));
    }
}
