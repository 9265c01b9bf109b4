//! Language adapters.
//!
//! The pipeline stays language-agnostic. Adapters bundle everything a
//! language needs: source wrapping, the scratch file name, candidate
//! toolchain binaries, and the compile/run command templates. Interpreted
//! languages run as a single process; compiled languages run as two
//! (compile, then run), with compilation failure short-circuiting the run.

pub mod c;
pub mod cpp;
pub mod java;
pub mod javascript;
pub mod python;

use crate::config::types::Language;
use crate::scratch::Workspace;
use std::path::PathBuf;

use crate::lang::c::CAdapter;
use crate::lang::cpp::CppAdapter;
use crate::lang::java::JavaAdapter;
use crate::lang::javascript::JavascriptAdapter;
use crate::lang::python::PythonAdapter;

/// Toolchain binaries resolved by the prober, one per requirement group
/// (e.g. java resolves `[javac, java]`, python resolves `[python3]` or
/// `[python]`).
#[derive(Debug, Clone)]
pub struct Toolchain {
    tools: Vec<String>,
}

impl Toolchain {
    pub fn new(tools: Vec<String>) -> Self {
        Toolchain { tools }
    }

    /// Resolved binary for the first requirement group.
    pub fn primary(&self) -> &str {
        self.tool_or(0, "")
    }

    /// Resolved binary for group `index`, or `fallback` when absent.
    pub fn tool_or<'a>(&'a self, index: usize, fallback: &'a str) -> &'a str {
        self.tools.get(index).map(String::as_str).unwrap_or(fallback)
    }
}

/// Per-language strategy consumed by the generic compile?+run pipeline.
pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> Language;

    /// Human-readable toolchain description ("JavaScript (Node.js)").
    fn description(&self) -> &'static str;

    /// Candidate binaries, grouped: every group must resolve to one
    /// available candidate for the language to be usable.
    fn required_tools(&self) -> &'static [&'static [&'static str]];

    /// Whether availability gates execution before any filesystem work.
    /// JavaScript skips the gate; a missing `node` surfaces as spawn_error.
    fn gate_on_probe(&self) -> bool {
        true
    }

    /// User-facing message when the availability gate fails.
    fn missing_message(&self) -> &'static str;

    /// Remediation hints accompanying a toolchain_missing result.
    fn suggestions(&self) -> Vec<String>;

    /// Toolchain label reported in results ("Node.js", "python3", "g++").
    fn platform_label(&self, toolchain: &Toolchain) -> String;

    /// Scratch file name for the wrapped source.
    fn file_name(&self, source: &str) -> String;

    /// Wrap user source (input shims, UTF-8 headers, default includes,
    /// synthesized wrapper classes). `stdin` is only consulted by adapters
    /// that inject an input-mocking shim.
    fn wrap_source(&self, source: &str, stdin: &str) -> String;

    /// Environment additions for the run process.
    fn env(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Compile command, or None for interpreted languages.
    fn compile_command(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        source: &str,
    ) -> Option<Vec<String>>;

    fn run_command(&self, workspace: &Workspace, toolchain: &Toolchain, source: &str)
        -> Vec<String>;

    /// Compiled outputs to register for cleanup before compilation runs.
    fn artifacts(&self, _workspace: &Workspace, _source: &str) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Look up the adapter for a supported language.
pub fn adapter_for(language: Language) -> &'static dyn LanguageAdapter {
    match language {
        Language::Javascript => &JavascriptAdapter,
        Language::Python => &PythonAdapter,
        Language::Java => &JavaAdapter,
        Language::Cpp => &CppAdapter,
        Language::C => &CAdapter,
    }
}

/// Fixed compiled-binary name, platform-suffixed.
pub fn binary_name() -> &'static str {
    if cfg!(windows) {
        "a.exe"
    } else {
        "a.out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_an_adapter() {
        for language in Language::all() {
            let adapter = adapter_for(language);
            assert_eq!(adapter.language(), language);
            assert!(!adapter.required_tools().is_empty());
            assert!(!adapter.description().is_empty());
        }
    }

    #[test]
    fn only_javascript_skips_the_probe_gate() {
        for language in Language::all() {
            let adapter = adapter_for(language);
            assert_eq!(
                adapter.gate_on_probe(),
                language != Language::Javascript,
                "unexpected gating for {language}"
            );
        }
    }

    #[test]
    fn toolchain_lookup_falls_back() {
        let toolchain = Toolchain::new(vec!["javac".to_string()]);
        assert_eq!(toolchain.primary(), "javac");
        assert_eq!(toolchain.tool_or(1, "java"), "java");
    }
}
