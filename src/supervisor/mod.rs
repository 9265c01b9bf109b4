//! Process supervision.
//!
//! One supervised invocation spawns exactly one OS process with piped stdio,
//! feeds stdin once and closes it, accumulates stdout/stderr on bounded
//! reader threads, and races the process against a wall-clock deadline.
//! Exactly one of {normal exit, timeout, spawn error} terminates each
//! invocation.

pub mod gate;

use crate::config::types::{Result, RunnerError};
use crate::utils::output::{spawn_collector, CollectedStream, OutputLimits};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One command to supervise: argv, working directory, stdin payload,
/// environment additions, wall budget, and output ceilings.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub stdin: Option<String>,
    pub env: Vec<(String, String)>,
    pub wall_time_limit: Duration,
    pub limits: OutputLimits,
}

/// Normalized outcome of one supervised process.
#[derive(Debug, Clone, Default)]
pub struct RawOutcome {
    /// Exit code when the process exited normally; None when signaled/killed
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// The wall-clock deadline fired and the process was killed
    pub timed_out: bool,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
    pub wall_time: Duration,
}

impl RawOutcome {
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Spawn and supervise one process to a terminal state.
///
/// Spawn failures (binary not found, permission denied) surface as
/// [`RunnerError::Spawn`] with no retry. Timeout kills the process but still
/// returns the output collected so far, flagged via `timed_out`.
pub fn run(spec: &CommandSpec) -> Result<RawOutcome> {
    let Some((program, args)) = spec.argv.split_first() else {
        return Err(RunnerError::Config("empty command".to_string()));
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(&spec.cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
    for (key, value) in &spec.env {
        command.env(key, value);
    }

    let started = Instant::now();
    let mut child = command
        .spawn()
        .map_err(|e| RunnerError::Spawn(format!("{}: {}", program, e)))?;

    // Feed stdin on its own thread and close the handle: batch run, no REPL.
    // A separate writer avoids deadlocking against a child that fills its
    // output pipes before consuming input.
    let stdin_writer = match (spec.stdin.clone(), child.stdin.take()) {
        (Some(data), Some(mut handle)) => Some(std::thread::spawn(move || {
            if let Err(e) = handle.write_all(data.as_bytes()) {
                log::debug!("stdin write ended early: {}", e);
            }
        })),
        _ => None,
    };

    let stdout_handle = child
        .stdout
        .take()
        .map(|out| spawn_collector(out, spec.limits.stdout_limit));
    let stderr_handle = child
        .stderr
        .take()
        .map(|err| spawn_collector(err, spec.limits.stderr_limit));

    let mut timed_out = false;
    let mut exit_code = None;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                exit_code = status.code();
                break;
            }
            Ok(None) => {
                if started.elapsed() > spec.wall_time_limit {
                    timed_out = true;
                    let _ = child.kill();
                    let _ = child.wait();
                    break;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunnerError::Process(format!("wait({}): {}", program, e)));
            }
        }
    }

    if let Some(writer) = stdin_writer {
        let _ = writer.join();
    }
    let stdout = join_collector(stdout_handle);
    let stderr = join_collector(stderr_handle);

    Ok(RawOutcome {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout.data).to_string(),
        stderr: String::from_utf8_lossy(&stderr.data).to_string(),
        timed_out,
        stdout_truncated: stdout.truncated,
        stderr_truncated: stderr.truncated,
        wall_time: started.elapsed(),
    })
}

fn join_collector(
    handle: Option<std::thread::JoinHandle<CollectedStream>>,
) -> CollectedStream {
    match handle {
        Some(handle) => handle.join().unwrap_or_default(),
        None => CollectedStream::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(argv: &[&str]) -> CommandSpec {
        CommandSpec {
            argv: argv.iter().map(|s| s.to_string()).collect(),
            cwd: std::env::temp_dir(),
            stdin: None,
            env: Vec::new(),
            wall_time_limit: Duration::from_secs(5),
            limits: OutputLimits::default(),
        }
    }

    #[test]
    fn empty_command_is_a_config_error() {
        let err = run(&spec(&[])).unwrap_err();
        assert!(matches!(err, RunnerError::Config(_)));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = run(&spec(&["runbox-test-no-such-binary-77aa"])).unwrap_err();
        assert!(matches!(err, RunnerError::Spawn(_)));
    }

    #[test]
    fn captures_stdout_and_exit_code() {
        let outcome = run(&spec(&["sh", "-c", "printf hello"])).unwrap();
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout, "hello");
        assert!(outcome.succeeded());
        assert!(!outcome.timed_out);
    }

    #[test]
    fn captures_stderr_on_nonzero_exit() {
        let outcome = run(&spec(&["sh", "-c", "echo oops >&2; exit 3"])).unwrap();
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.stderr.trim(), "oops");
        assert!(!outcome.succeeded());
    }

    #[test]
    fn feeds_stdin_once_and_closes_it() {
        let mut spec = spec(&["cat"]);
        spec.stdin = Some("hello stdin".to_string());
        let outcome = run(&spec).unwrap();
        // cat only terminates when stdin is closed after the single write.
        assert_eq!(outcome.stdout, "hello stdin");
        assert!(outcome.succeeded());
    }

    #[test]
    fn kills_at_the_wall_deadline_keeping_partial_output() {
        let mut spec = spec(&["sh", "-c", "echo early; sleep 30"]);
        spec.wall_time_limit = Duration::from_millis(300);
        let started = Instant::now();
        let outcome = run(&spec).unwrap();
        assert!(outcome.timed_out);
        assert!(outcome.exit_code.is_none());
        assert_eq!(outcome.stdout.trim(), "early");
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn truncates_pathological_output() {
        let mut spec = spec(&["sh", "-c", "head -c 100000 /dev/zero"]);
        spec.limits = OutputLimits {
            stdout_limit: 1024,
            stderr_limit: 1024,
        };
        let outcome = run(&spec).unwrap();
        assert!(outcome.stdout_truncated);
        assert_eq!(outcome.stdout.len(), 1024);
        assert!(outcome.succeeded());
    }
}
