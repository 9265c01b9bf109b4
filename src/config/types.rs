/// Core types and structures for the runbox engine
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Supported languages - STABLE TAXONOMY (closed set)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    #[serde(rename = "javascript")]
    Javascript,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "cpp")]
    Cpp,
    #[serde(rename = "c")]
    C,
}

impl Language {
    /// All supported languages, in capability-report order.
    pub fn all() -> [Language; 5] {
        [
            Language::Javascript,
            Language::Python,
            Language::Java,
            Language::Cpp,
            Language::C,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = RunnerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "node" => Ok(Language::Javascript),
            "python" | "python3" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "cpp" | "c++" | "cxx" | "cc" => Ok(Language::Cpp),
            "c" => Ok(Language::C),
            other => Err(RunnerError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Categorical reason code attached to a failed execution result.
///
/// Runtime failure (process ran, exited non-zero) is deliberately not a
/// variant: it is reported as `success = false` with captured stderr.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Diagnostic {
    /// Language identifier not in the supported set
    #[serde(rename = "unsupported_language")]
    UnsupportedLanguage,
    /// Request rejected before any work (empty or oversized source)
    #[serde(rename = "invalid_request")]
    InvalidRequest,
    /// Availability probe failed before attempting work
    #[serde(rename = "toolchain_missing")]
    ToolchainMissing,
    /// Compiler exited non-zero; stderr surfaced, no run attempted
    #[serde(rename = "compile_error")]
    CompileError,
    /// Wall-clock budget exceeded; process killed
    #[serde(rename = "timeout")]
    Timeout,
    /// OS failed to start the process
    #[serde(rename = "spawn_error")]
    SpawnError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnsupportedLanguage => write!(f, "unsupported_language"),
            Diagnostic::InvalidRequest => write!(f, "invalid_request"),
            Diagnostic::ToolchainMissing => write!(f, "toolchain_missing"),
            Diagnostic::CompileError => write!(f, "compile_error"),
            Diagnostic::Timeout => write!(f, "timeout"),
            Diagnostic::SpawnError => write!(f, "spawn_error"),
        }
    }
}

/// One execution request as received from the outer layer.
///
/// The outer layer is trusted to validate shape; the engine still defends
/// against unknown languages and empty/oversized source before doing work.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// User source code
    pub source: String,
    /// Language identifier (free text; parsed against the supported set)
    pub language: String,
    /// Data fed to the program's stdin, then closed (batch run, no REPL)
    #[serde(default)]
    pub stdin: String,
}

impl ExecutionRequest {
    pub fn new(source: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            language: language.into(),
            stdin: String::new(),
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }
}

/// Execution result returned to the caller. Immutable once produced.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True iff the program ran to completion with exit code 0
    pub success: bool,
    /// Captured standard output (bounded; may be truncated)
    pub stdout: String,
    /// Captured standard error, doubling as the human-readable error text
    pub stderr: String,
    /// Wall-clock time across all phases, including compile, in milliseconds
    pub elapsed_ms: u64,
    /// Toolchain label ("Node.js", "python3", "g++", ...)
    pub toolchain: String,
    /// Exit code of the final process, if it exited normally
    pub exit_code: Option<i32>,
    /// Reason code for failures that never reached a normal exit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
    /// Remediation hints (populated for toolchain_missing and rejections)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Stdout hit the per-stream byte ceiling and was cut off
    #[serde(default)]
    pub stdout_truncated: bool,
    /// Stderr hit the per-stream byte ceiling and was cut off
    #[serde(default)]
    pub stderr_truncated: bool,
}

impl ExecutionResult {
    /// Result for a request rejected before any filesystem or process work.
    pub fn rejected(diagnostic: Diagnostic, message: impl Into<String>) -> Self {
        ExecutionResult {
            success: false,
            stderr: message.into(),
            diagnostic: Some(diagnostic),
            ..Default::default()
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Per-language entry in the capability report.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LanguageStatus {
    pub available: bool,
    /// "server" when the toolchain answers the probe, "none" otherwise
    pub platform: String,
    pub description: String,
    pub note: String,
}

/// Caller-facing capability recommendations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendations {
    pub supported: Vec<Language>,
    pub unsupported: Vec<Language>,
    pub alternatives: String,
}

/// Capability report: language → availability, recomputed on demand and
/// cached behind a TTL by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityReport {
    /// Host platform the probes ran on
    pub platform: String,
    pub languages: BTreeMap<Language, LanguageStatus>,
    pub recommendations: Recommendations,
}

/// Runner configuration with defaults mirroring the deployed constants:
/// 15 s wall budget (compile included), 3 s probes, 50 KB source ceiling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Scratch root; created if absent, never assumed to be empty
    pub scratch_root: PathBuf,
    /// Wall-clock budget per execution, compile phase included
    pub wall_time_limit: Duration,
    /// Budget for a single availability probe
    pub probe_timeout: Duration,
    /// Source length ceiling in bytes
    pub max_source_bytes: usize,
    /// Per-stream stdout byte ceiling
    pub stdout_limit: usize,
    /// Per-stream stderr byte ceiling
    pub stderr_limit: usize,
    /// Concurrent executions admitted at once
    pub max_concurrency: usize,
    /// How long a computed availability report stays fresh
    pub availability_ttl: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            scratch_root: std::env::temp_dir().join("runbox"),
            wall_time_limit: Duration::from_millis(15_000),
            probe_timeout: Duration::from_millis(3_000),
            max_source_bytes: 50_000,
            stdout_limit: 8 * 1024 * 1024,
            stderr_limit: 2 * 1024 * 1024,
            max_concurrency: 8,
            availability_ttl: Duration::from_secs(60),
        }
    }
}

/// Custom error types for runbox
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to spawn process: {0}")]
    Spawn(String),

    #[error("Process error: {0}")]
    Process(String),
}

/// Result type alias for runbox operations
pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_aliases_parse() {
        assert_eq!("js".parse::<Language>().unwrap(), Language::Javascript);
        assert_eq!("Node".parse::<Language>().unwrap(), Language::Javascript);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("python3".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("cxx".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("c".parse::<Language>().unwrap(), Language::C);
        assert_eq!("java".parse::<Language>().unwrap(), Language::Java);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let err = "brainfuck".parse::<Language>().unwrap_err();
        assert!(matches!(err, RunnerError::UnsupportedLanguage(_)));
    }

    #[test]
    fn diagnostic_serializes_snake_case() {
        let json = serde_json::to_string(&Diagnostic::ToolchainMissing).unwrap();
        assert_eq!(json, "\"toolchain_missing\"");
        let json = serde_json::to_string(&Diagnostic::CompileError).unwrap();
        assert_eq!(json, "\"compile_error\"");
    }

    #[test]
    fn language_map_keys_serialize_as_strings() {
        let mut map = BTreeMap::new();
        map.insert(Language::Cpp, 1u32);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{\"cpp\":1}");
    }

    #[test]
    fn default_config_matches_deployed_constants() {
        let config = RunnerConfig::default();
        assert_eq!(config.wall_time_limit, Duration::from_millis(15_000));
        assert_eq!(config.probe_timeout, Duration::from_millis(3_000));
        assert_eq!(config.max_source_bytes, 50_000);
        assert!(config.max_concurrency > 0);
    }

    #[test]
    fn result_serialization_omits_empty_optionals() {
        let result = ExecutionResult {
            success: true,
            stdout: "hi\n".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("diagnostic"));
        assert!(!json.contains("suggestions"));
    }
}
