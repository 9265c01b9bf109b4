//! Configuration and shared type definitions.

pub mod types;

pub use types::{Diagnostic, ExecutionRequest, ExecutionResult, Language, Result, RunnerConfig, RunnerError};
