//! C adapter.
//!
//! Mirrors the C++ strategy with `gcc -std=c99 -O2` and the stdio/stdlib/
//! string headers prepended when the source carries no `#include`.

use crate::config::types::Language;
use crate::lang::{binary_name, LanguageAdapter, Toolchain};
use crate::scratch::Workspace;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct CAdapter;

impl CAdapter {
    fn binary_path(workspace: &Workspace) -> PathBuf {
        workspace.dir().join(binary_name())
    }
}

impl LanguageAdapter for CAdapter {
    fn language(&self) -> Language {
        Language::C
    }

    fn description(&self) -> &'static str {
        "C"
    }

    fn required_tools(&self) -> &'static [&'static [&'static str]] {
        &[&["gcc"]]
    }

    fn missing_message(&self) -> &'static str {
        "C compiler (gcc) is not available on this server"
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Use JavaScript or Python instead".to_string(),
            "Try an online C compiler like OnlineGDB".to_string(),
            "Use Replit for C programming".to_string(),
            "Deploy on Railway or Google Cloud Run for C support".to_string(),
        ]
    }

    fn platform_label(&self, toolchain: &Toolchain) -> String {
        toolchain.tool_or(0, "gcc").to_string()
    }

    fn file_name(&self, _source: &str) -> String {
        "main.c".to_string()
    }

    fn wrap_source(&self, source: &str, _stdin: &str) -> String {
        if source.contains("#include") {
            return source.to_string();
        }
        format!("#include <stdio.h>\n#include <stdlib.h>\n#include <string.h>\n\n{source}")
    }

    fn compile_command(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        source: &str,
    ) -> Option<Vec<String>> {
        Some(vec![
            toolchain.tool_or(0, "gcc").to_string(),
            "-std=c99".to_string(),
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
