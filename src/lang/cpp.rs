//! C++ adapter.
//!
//! Two-process strategy: `g++ -std=c++17 -O2` produces a fixed-name binary
//! in the scratch directory, which then runs as the second process. Source
//! without any `#include` gets the common headers prepended.

use crate::config::types::Language;
use crate::lang::{binary_name, LanguageAdapter, Toolchain};
use crate::scratch::Workspace;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct CppAdapter;

impl CppAdapter {
    fn binary_path(workspace: &Workspace) -> PathBuf {
        workspace.dir().join(binary_name())
    }
}

impl LanguageAdapter for CppAdapter {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn description(&self) -> &'static str {
        "C++"
    }

    fn required_tools(&self) -> &'static [&'static [&'static str]] {
        &[&["g++"]]
    }

    fn missing_message(&self) -> &'static str {
        "C++ compiler (g++) is not available on this server"
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Use JavaScript or Python instead".to_string(),
            "Try Compiler Explorer (godbolt.org)".to_string(),
            "Use an online C++ compiler like Replit".to_string(),
            "Deploy on Railway or Google Cloud Run for C++ support".to_string(),
        ]
    }

    fn platform_label(&self, toolchain: &Toolchain) -> String {
        toolchain.tool_or(0, "g++").to_string()
    }

    fn file_name(&self, _source: &str) -> String {
        "main.cpp".to_string()
    }

    fn wrap_source(&self, source: &str, _stdin: &str) -> String {
        if source.contains("#include") {
            return source.to_string();
        }
        format!(
            "#include <iostream>\n#include <string>\n#include <vector>\n#include <algorithm>\nusing namespace std;\n\n{source}"
        )
    }

    fn compile_command(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        source: &str,
    ) -> Option<Vec<String>> {
        Some(vec![
            toolchain.tool_or(0, "g++").to_string(),
            "-std=c++17".to_string(),
            "-O2".to_string(),
            workspace
                .dir()
                .join(self.file_name(source))
                .to_string_lossy()
                .to_string(),
            "-o".to_string(),
            Self::binary_path(workspace).to_string_lossy().to_string(),
        ])
    }

    fn run_command(
        &self,
        workspace: &Workspace,
        _toolchain: &Toolchain,
        _source: &str,
    ) -> Vec<String> {
        vec![Self::binary_path(workspace).to_string_lossy().to_string()]
    }

    fn artifacts(&self, workspace: &Workspace, _source: &str) -> Vec<PathBuf> {
        vec![Self::binary_path(workspace)]
    }
}
