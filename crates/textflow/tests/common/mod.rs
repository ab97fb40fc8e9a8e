//! Shared test utilities for textflow integration tests.
//!
//! This module provides:
//! - Small custom steps (`AppendStep`, `FailingStep`) for exercising the engine
//! - `ConfigBuilder` for assembling pipeline configurations programmatically

pub mod builders;
pub mod steps;

pub use builders::*;
pub use steps::*;
