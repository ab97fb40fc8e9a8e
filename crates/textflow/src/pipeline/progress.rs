use std::sync::Mutex;
use std::time::Duration;

/// Events emitted by the pipeline while a text is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    RunStarted {
        total_steps: usize,
    },
    StepStarted {
        step: String,
        index: usize,
        total_steps: usize,
    },
    StepCompleted {
        step: String,
        elapsed: Duration,
    },
    StepFailed {
        step: String,
        error: String,
    },
    RunFinished {
        applied: usize,
        skipped: usize,
        elapsed: Duration,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Reporter that drops every event.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Keeps every event in memory, in emission order.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
