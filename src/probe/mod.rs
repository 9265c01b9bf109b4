//! Toolchain availability probing.
//!
//! A probe spawns `command --version` with all stdio discarded and reports
//! true only when the process exits 0 within the probe budget. Spawn
//! failures and timeouts resolve to `false`, never to an error: a probe is
//! a capability question, not an operation that can fail.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Lightweight existence/health checker for toolchain binaries.
#[derive(Debug, Clone)]
pub struct Prober {
    timeout: Duration,
}

impl Default for Prober {
    fn default() -> Self {
        Prober {
            timeout: Duration::from_millis(3_000),
        }
    }
}

impl Prober {
    pub fn new(timeout: Duration) -> Self {
        Prober { timeout }
    }

    /// True iff `command --version` exits 0 within the probe budget.
    pub fn probe(&self, command: &str) -> bool {
        let child = Command::new(command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                log::debug!("probe spawn failed for '{}': {}", command, e);
                return false;
            }
        };

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return status.success(),
                Ok(None) => {
                    if started.elapsed() > self.timeout {
                        log::debug!("probe timed out for '{}'", command);
                        let _ = child.kill();
                        let _ = child.wait();
                        return false;
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    log::debug!("probe wait failed for '{}': {}", command, e);
                    let _ = child.kill();
                    let _ = child.wait();
                    return false;
                }
            }
        }
    }

    /// First candidate that answers the probe (python3 → python fallback).
    pub fn resolve<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|c| self.probe(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_probes_false() {
        let prober = Prober::default();
        assert!(!prober.probe("runbox-test-no-such-binary-a6f1"));
    }

    #[test]
    fn resolve_with_no_available_candidate_is_none() {
        let prober = Prober::default();
        let resolved = prober.resolve(&["runbox-missing-one", "runbox-missing-two"]);
        assert_eq!(resolved, None);
    }

    #[test]
    fn probe_timeout_is_configurable() {
        let prober = Prober::new(Duration::from_millis(1));
        // A missing binary still resolves false immediately, without waiting.
        let started = Instant::now();
        assert!(!prober.probe("runbox-test-no-such-binary-b2c3"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
