//! Run-scoped scratch artifacts.
//!
//! Every execution owns one uuid-named directory under the scratch root.
//! The directory is created at execution start and removed on every exit
//! path; removal failures are swallowed but logged, since cleanup is
//! hygiene rather than a correctness barrier.

use crate::config::types::{Result, RunnerError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scratch workspace backing one execution. Never shared or reused.
pub struct Workspace {
    /// Unique run ID (uuid v4, collision-safe under concurrent requests)
    run_id: String,
    /// Run-specific directory under the scratch root
    run_dir: PathBuf,
    /// Source file written for this run
    source_file: Option<PathBuf>,
    /// Compiled binaries/class files registered for cleanup
    artifacts: Vec<PathBuf>,
}

impl Workspace {
    /// Allocate a fresh workspace under `base_dir`, creating the root if absent.
    pub fn create(base_dir: &Path) -> Result<Self> {
        let run_id = Uuid::new_v4().to_string();
        let run_dir = base_dir.join(&run_id);

        fs::create_dir_all(&run_dir).map_err(|e| {
            RunnerError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to create scratch directory {}: {}", run_dir.display(), e),
            ))
        })?;

        Ok(Self {
            run_id,
            run_dir,
            source_file: None,
            artifacts: Vec::new(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.run_dir
    }

    /// Write the wrapped source under the given file name.
    pub fn write_source(&mut self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.run_dir.join(file_name);
        fs::write(&path, contents).map_err(|e| {
            RunnerError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to write source file {}: {}", path.display(), e),
            ))
        })?;
        self.source_file = Some(path.clone());
        Ok(path)
    }

    /// Register a compiled binary/class file for cleanup.
    pub fn register_artifact(&mut self, path: PathBuf) {
        self.artifacts.push(path);
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// Best-effort, idempotent cleanup of everything this run produced.
    pub fn cleanup(&self) {
        for artifact in &self.artifacts {
            if artifact.exists() {
                if let Err(e) = fs::remove_file(artifact) {
                    log::warn!("failed to remove artifact {}: {}", artifact.display(), e);
                }
            }
        }

        if let Some(source) = &self.source_file {
            if source.exists() {
                if let Err(e) = fs::remove_file(source) {
                    log::warn!("failed to remove source file {}: {}", source.display(), e);
                }
            }
        }

        if self.run_dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.run_dir) {
                // Don't fail - this is cleanup
                log::warn!("failed to remove run directory {}: {}", self.run_dir.display(), e);
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.cleanup();
    }
}
