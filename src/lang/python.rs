//! Python adapter.
//!
//! The wrapper forces UTF-8 I/O and indents user code under a guarded
//! `try:` block so runtime exceptions print a labeled message plus traceback
//! and exit non-zero. The interpreter runs unbuffered (`-u`); `python3` is
//! preferred with `python` as fallback.

use crate::config::types::Language;
use crate::lang::{LanguageAdapter, Toolchain};
use crate::scratch::Workspace;

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonAdapter;

impl LanguageAdapter for PythonAdapter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn description(&self) -> &'static str {
        "Python 3"
    }

    fn required_tools(&self) -> &'static [&'static [&'static str]] {
        &[&["python3", "python"]]
    }

    fn missing_message(&self) -> &'static str {
        "Python is not available on this server"
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Use JavaScript instead".to_string(),
            "Try an online Python interpreter".to_string(),
        ]
    }

    fn platform_label(&self, toolchain: &Toolchain) -> String {
        toolchain.tool_or(0, "python3").to_string()
    }

    fn file_name(&self, _source: &str) -> String {
        "main.py".to_string()
    }

    fn wrap_source(&self, source: &str, _stdin: &str) -> String {
        let indented: String = source
            .lines()
            .map(|line| format!("    {line}\n"))
            .collect();
        format!(
            r#"# -*- coding: utf-8 -*-
import sys
import os

if hasattr(sys.stdout, 'reconfigure'):
    sys.stdout.reconfigure(encoding='utf-8')
if hasattr(sys.stderr, 'reconfigure'):
    sys.stderr.reconfigure(encoding='utf-8')

os.environ['PYTHONIOENCODING'] = 'utf-8'

try:
{indented}except Exception as e:
    print(f"Runtime Error: {{e}}")
    import traceback
    traceback.print_exc()
    sys.exit(1)
"#
        )
    }

    fn env(&self) -> Vec<(String, String)> {
        vec![
            ("PYTHONIOENCODING".to_string(), "utf-8".to_string()),
            ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
        ]
    }

    fn compile_command(
        &self,
        _workspace: &Workspace,
        _toolchain: &Toolchain,
        _source: &str,
    ) -> Option<Vec<String>> {
        None
    }

    fn run_command(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        source: &str,
    ) -> Vec<String> {
        vec![
            toolchain.tool_or(0, "python3").to_string(),
            "-u".to_string(),
            workspace
                .dir()
                .join(self.file_name(source))
                .to_string_lossy()
                .to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_indents_user_code_under_try() {
        let wrapped = PythonAdapter.wrap_source("x = 1\nprint(x)", "");
        assert!(wrapped.contains("try:\n    x = 1\n    print(x)\nexcept Exception as e:"));
        assert!(wrapped.contains("Runtime Error:"));
        assert!(wrapped.contains("sys.exit(1)"));
    }

    #[test]
    fn wrapper_forces_utf8_io() {
        let wrapped = PythonAdapter.wrap_source("print('héllo')", "");
        assert!(wrapped.contains("reconfigure(encoding='utf-8')"));
        assert!(wrapped.contains("PYTHONIOENCODING"));
    }

    #[test]
    fn interpreter_runs_unbuffered() {
        let base = tempfile::tempdir().unwrap();
        let ws = Workspace::create(base.path()).unwrap();
        let toolchain = Toolchain::new(vec!["python3".to_string()]);
        let argv = PythonAdapter.run_command(&ws, &toolchain, "print(1)");
        assert_eq!(argv[0], "python3");
        assert_eq!(argv[1], "-u");
        assert!(argv[2].ends_with("main.py"));
    }

    #[test]
    fn fallback_interpreter_is_respected() {
        let toolchain = Toolchain::new(vec!["python".to_string()]);
        assert_eq!(PythonAdapter.platform_label(&toolchain), "python");
    }
}
