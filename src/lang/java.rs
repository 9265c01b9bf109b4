//! Java adapter.
//!
//! The class name drives everything: it is regex-extracted from the source
//! (`public class` first, any `class` second, `Main` as placeholder) and
//! must match the source file name, the compile invocation, and the run
//! invocation. Source with no class declaration is wrapped in a synthesized
//! class whose main catches exceptions and prints them instead of crashing.

use crate::config::types::Language;
use crate::lang::{LanguageAdapter, Toolchain};
use crate::scratch::Workspace;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, Default)]
pub struct JavaAdapter;

const DEFAULT_CLASS: &str = "Main";

fn public_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid regex"))
}

fn any_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class\s+(\w+)").expect("valid regex"))
}

/// Extract the class name the run must target: public class first, any
/// class second, placeholder last.
pub fn extract_class_name(source: &str) -> String {
    if let Some(captures) = public_class_re().captures(source) {
        return captures[1].to_string();
    }
    if let Some(captures) = any_class_re().captures(source) {
        return captures[1].to_string();
    }
    DEFAULT_CLASS.to_string()
}

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn description(&self) -> &'static str {
        "Java"
    }

    fn required_tools(&self) -> &'static [&'static [&'static str]] {
        &[&["javac"], &["java"]]
    }

    fn missing_message(&self) -> &'static str {
        "Java compiler or runtime is not available on this server"
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Use JavaScript or Python instead".to_string(),
            "Try an online Java compiler like Replit".to_string(),
            "Deploy on a platform with Java support (like Railway or Google Cloud Run)"
                .to_string(),
        ]
    }

    fn platform_label(&self, _toolchain: &Toolchain) -> String {
        "Java".to_string()
    }

    fn file_name(&self, source: &str) -> String {
        format!("{}.java", extract_class_name(source))
    }

    fn wrap_source(&self, source: &str, _stdin: &str) -> String {
        if source.contains("class ") {
            return source.to_string();
        }
        let class_name = extract_class_name(source);
        let indented: String = source
            .lines()
            .map(|line| format!("            {line}\n"))
            .collect();
        format!(
            r#"public class {class_name} {{
    public static void main(String[] args) {{
        try {{
{indented}        }} catch (Exception e) {{
            System.err.println("Runtime Error: " + e.getMessage());
            e.printStackTrace();
        }}
    }}
}}
"#
        )
    }

    fn compile_command(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        source: &str,
    ) -> Option<Vec<String>> {
        Some(vec![
            toolchain.tool_or(0, "javac").to_string(),
            workspace
                .dir()
                .join(self.file_name(source))
                .to_string_lossy()
                .to_string(),
        ])
    }

    fn run_command(
        &self,
        workspace: &Workspace,
        toolchain: &Toolchain,
        source: &str,
    ) -> Vec<String> {
        vec![
            toolchain.tool_or(1, "java").to_string(),
            "-cp".to_string(),
            workspace.dir().to_string_lossy().to_string(),
            extract_class_name(source),
        ]
    }

    fn artifacts(&self, workspace: &Workspace, source: &str) -> Vec<PathBuf> {
        vec![workspace
            .dir()
            .join(format!("{}.class", extract_class_name(source)))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_class_name_wins() {
        let source = "class Helper {}\npublic class Foo { public static void main(String[] a) {} }";
        assert_eq!(extract_class_name(source), "Foo");
    }

    #[test]
    fn any_class_name_is_the_fallback() {
        assert_eq!(extract_class_name("class Worker {}"), "Worker");
    }

    #[test]
    fn placeholder_when_no_class_declared() {
        assert_eq!(extract_class_name("System.out.println(42);"), "Main");
    }

    #[test]
    fn classless_source_gets_a_wrapper() {
        let wrapped = JavaAdapter.wrap_source("System.out.println(42);", "");
        assert!(wrapped.starts_with("public class Main {"));
        assert!(wrapped.contains("            System.out.println(42);"));
        assert!(wrapped.contains("Runtime Error: "));
    }

    #[test]
    fn source_with_class_is_untouched() {
        let source = "public class Foo { public static void main(String[] a) {} }";
        assert_eq!(JavaAdapter.wrap_source(source, ""), source);
    }

    #[test]
    fn class_name_is_consistent_across_file_compile_and_run() {
        let base = tempfile::tempdir().unwrap();
        let ws = Workspace::create(base.path()).unwrap();
        let toolchain = Toolchain::new(vec!["javac".to_string(), "java".to_string()]);
        let source = "public class Foo { public static void main(String[] a) {} }";

        assert_eq!(JavaAdapter.file_name(source), "Foo.java");
        let compile = JavaAdapter.compile_command(&ws, &toolchain, source).unwrap();
        assert!(compile[1].ends_with("Foo.java"));
        let run = JavaAdapter.run_command(&ws, &toolchain, source);
        assert_eq!(run.last().unwrap(), "Foo");
        let artifacts = JavaAdapter.artifacts(&ws, source);
        assert!(artifacts[0].ends_with("Foo.class"));
    }
}
