//! runbox: a single-shot code execution engine for playground backends.
//!
//! Given source text, a language identifier, and optional stdin, runbox
//! shells out to an installed compiler/interpreter and produces a structured
//! result (stdout, stderr, exit status, elapsed time) within a bounded
//! wall-clock budget, cleaning up all transient artifacts on every exit path.
//!
//! # Architecture
//!
//! The crate is organized around one generic probe → wrap → write →
//! compile? → run pipeline:
//!
//! - [`probe`]: toolchain availability probing (`--version` within a short
//!   bound) and python3/python-style fallback resolution
//! - [`scratch`]: run-scoped workspace allocation and best-effort cleanup
//! - [`lang`]: per-language adapters (source wrapping, command templates,
//!   compiled-artifact naming)
//! - [`supervisor`]: single-process spawn, stdin feed, bounded output
//!   collection, wall-clock deadline enforcement, admission gating
//! - [`engine`]: dispatcher mapping a language identifier to its adapter and
//!   folding every failure into a structured [`config::types::ExecutionResult`]
//! - [`config`]: shared type definitions, closed diagnostic taxonomy, and
//!   runner configuration
//!
//! # Guarantees
//!
//! 1. Exactly one of {normal exit, timeout, spawn error} terminates each
//!    process invocation; scratch artifacts are released on all three paths.
//! 2. Nothing propagates past the engine boundary under normal operation;
//!    callers receive a result with `success = false` and a diagnostic.
//! 3. Concurrent executions never share scratch state (uuid run directories).
//!
//! This crate is orchestration, not isolation: it makes no sandboxing,
//! resource-accounting, or multi-tenant claims.

// Configuration & shared types
pub mod config;

// Toolchain availability probing
pub mod probe;

// Run-scoped scratch artifacts
pub mod scratch;

// Language adapters (wrapping + command templates)
pub mod lang;

// Process supervision (spawn, collect, deadline)
pub mod supervisor;

// Dispatch and the compile?+run pipeline
pub mod engine;

// Utilities (bounded output collection)
pub mod utils;

// CLI entrypoint wiring for the runbox binary
pub mod cli;

// Re-export commonly used types for convenience
pub use config::types::*;
pub use engine::Engine;
