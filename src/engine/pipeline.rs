//! The generic compile?+run pipeline.
//!
//! One parameterized sequence replaces per-language control flow:
//! resolve toolchain → allocate scratch → write wrapped source →
//! compile (optional) → run → cleanup. Every phase folds its failure into
//! an [`ExecutionResult`]; the scratch workspace is released on every exit
//! path, including spawn errors and timeouts.

use crate::config::types::{Diagnostic, ExecutionResult, RunnerConfig, RunnerError};
use crate::lang::{LanguageAdapter, Toolchain};
use crate::probe::Prober;
use crate::scratch::Workspace;
use crate::supervisor::{self, CommandSpec, RawOutcome};
use crate::utils::output::OutputLimits;
use std::time::{Duration, Instant};

pub(crate) fn execute(
    adapter: &dyn LanguageAdapter,
    config: &RunnerConfig,
    prober: &Prober,
    source: &str,
    stdin: &str,
) -> ExecutionResult {
    let started = Instant::now();

    // Availability gate precedes all filesystem work: fail fast with
    // remediation hints instead of attempting a doomed compile.
    let mut tools = Vec::new();
    for group in adapter.required_tools() {
        if adapter.gate_on_probe() {
            match prober.resolve(group) {
                Some(tool) => tools.push(tool.to_string()),
                None => {
                    log::info!(
                        "{}: toolchain missing ({})",
                        adapter.language(),
                        group.join("/")
                    );
                    return finish(
                        ExecutionResult::rejected(
                            Diagnostic::ToolchainMissing,
                            adapter.missing_message(),
                        )
                        .with_suggestions(adapter.suggestions()),
                        started,
                    );
                }
            }
        } else {
            tools.push(group.first().copied().unwrap_or_default().to_string());
        }
    }
    let toolchain = Toolchain::new(tools);
    let label = adapter.platform_label(&toolchain);

    let mut workspace = match Workspace::create(&config.scratch_root) {
        Ok(workspace) => workspace,
        Err(e) => return internal_failure(e, &label, started),
    };

    let result = run_stages(
        adapter, config, &mut workspace, &toolchain, &label, source, stdin, started,
    );
    workspace.cleanup();
    result
}

#[allow(clippy::too_many_arguments)]
fn run_stages(
    adapter: &dyn LanguageAdapter,
    config: &RunnerConfig,
    workspace: &mut Workspace,
    toolchain: &Toolchain,
    label: &str,
    source: &str,
    stdin: &str,
    started: Instant,
) -> ExecutionResult {
    let wrapped = adapter.wrap_source(source, stdin);
    let file_name = adapter.file_name(source);
    if let Err(e) = workspace.write_source(&file_name, &wrapped) {
        return internal_failure(e, label, started);
    }
    // Register compiled outputs up front so cleanup covers a run that dies
    // between compile and collection.
    for artifact in adapter.artifacts(workspace, source) {
        workspace.register_artifact(artifact);
    }

    let limits = OutputLimits {
        stdout_limit: config.stdout_limit,
        stderr_limit: config.stderr_limit,
    };

    if let Some(argv) = adapter.compile_command(workspace, toolchain, source) {
        log::debug!("compiling {} in {}", adapter.language(), workspace.run_id());
        let spec = CommandSpec {
            argv,
            cwd: workspace.dir().to_path_buf(),
            stdin: None,
            env: Vec::new(),
            wall_time_limit: remaining_budget(config, started),
            limits,
        };
        let outcome = match supervisor::run(&spec) {
            Ok(outcome) => outcome,
            Err(RunnerError::Spawn(message)) => {
                return finish(
                    ExecutionResult::rejected(Diagnostic::SpawnError, message)
                        .labeled(label),
                    started,
                )
            }
            Err(e) => return internal_failure(e, label, started),
        };
        if outcome.timed_out {
            return finish(timeout_result(outcome, config, label), started);
        }
        if outcome.exit_code != Some(0) {
            // Compilation failure short-circuits the run step entirely;
            // compiler stderr is surfaced verbatim.
            return finish(
                ExecutionResult {
                    success: false,
                    stderr: outcome.stderr,
                    stderr_truncated: outcome.stderr_truncated,
                    exit_code: outcome.exit_code,
                    diagnostic: Some(Diagnostic::CompileError),
                    toolchain: label.to_string(),
                    ..Default::default()
                },
                started,
            );
        }
    }

    let argv = adapter.run_command(workspace, toolchain, source);
    log::debug!("running {} in {}", adapter.language(), workspace.run_id());
    let spec = CommandSpec {
        argv,
        cwd: workspace.dir().to_path_buf(),
        stdin: if stdin.is_empty() {
            None
        } else {
            Some(stdin.to_string())
        },
        env: adapter.env(),
        wall_time_limit: remaining_budget(config, started),
        limits,
    };
    let outcome = match supervisor::run(&spec) {
        Ok(outcome) => outcome,
        Err(RunnerError::Spawn(message)) => {
            return finish(
                ExecutionResult::rejected(Diagnostic::SpawnError, message).labeled(label),
                started,
            )
        }
        Err(e) => return internal_failure(e, label, started),
    };

    if outcome.timed_out {
        return finish(timeout_result(outcome, config, label), started);
    }

    finish(
        ExecutionResult {
            success: outcome.succeeded(),
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            exit_code: outcome.exit_code,
            stdout_truncated: outcome.stdout_truncated,
            stderr_truncated: outcome.stderr_truncated,
            toolchain: label.to_string(),
            ..Default::default()
        },
        started,
    )
}

/// Budget remaining out of the fixed wall-clock allowance; the run phase of
/// a compiled language gets whatever the compile left over.
fn remaining_budget(config: &RunnerConfig, started: Instant) -> Duration {
    config.wall_time_limit.saturating_sub(started.elapsed())
}

/// Timeout keeps the partial output collected so far, flagged by the
/// diagnostic, with a labeled message appended to stderr.
fn timeout_result(outcome: RawOutcome, config: &RunnerConfig, label: &str) -> ExecutionResult {
    let mut stderr = outcome.stderr;
    if !stderr.is_empty() && !stderr.ends_with('\n') {
        stderr.push('\n');
    }
    stderr.push_str(&format!(
        "Execution timeout ({} ms)",
        config.wall_time_limit.as_millis()
    ));
    ExecutionResult {
        success: false,
        stdout: outcome.stdout,
        stderr,
        stdout_truncated: outcome.stdout_truncated,
        stderr_truncated: outcome.stderr_truncated,
        diagnostic: Some(Diagnostic::Timeout),
        toolchain: label.to_string(),
        ..Default::default()
    }
}

fn internal_failure(error: RunnerError, label: &str, started: Instant) -> ExecutionResult {
    log::warn!("pipeline failure: {}", error);
    finish(
        ExecutionResult {
            success: false,
            stderr: error.to_string(),
            toolchain: label.to_string(),
            ..Default::default()
        },
        started,
    )
}

fn finish(mut result: ExecutionResult, started: Instant) -> ExecutionResult {
    result.elapsed_ms = started.elapsed().as_millis() as u64;
    result
}

impl ExecutionResult {
    fn labeled(mut self, label: &str) -> Self {
        self.toolchain = label.to_string();
        self
    }
}
