//! JavaScript adapter (Node.js).
//!
//! Blocking-read constructs have no terminal to read from, so the wrapper
//! injects an input-mocking shim: `prompt` and the `readline` module are
//! replaced with closures that hand out lines from the pre-supplied stdin
//! buffer. User code runs under try/catch so runtime errors print a labeled
//! message and exit non-zero instead of dumping a raw stack.

use crate::config::types::Language;
use crate::lang::{LanguageAdapter, Toolchain};
use crate::scratch::Workspace;

#[derive(Debug, Clone, Copy, Default)]
pub struct JavascriptAdapter;

/// Escape arbitrary text into a double-quoted JS string literal.
fn js_string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for ch in text.chars() {
        match ch {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{2028}' || c == '\u{2029}' => {
                literal.push_str(&format!("\\u{{{:x}}}", c as u32));
            }
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

impl LanguageAdapter for JavascriptAdapter {
    fn language(&self) -> Language {
        Language::Javascript
    }

    fn description(&self) -> &'static str {
        "JavaScript (Node.js)"
    }

    fn required_tools(&self) -> &'static [&'static [&'static str]] {
        &[&["node"]]
    }

    fn gate_on_probe(&self) -> bool {
        false
    }

    fn missing_message(&self) -> &'static str {
        "Node.js is not available on this server"
    }

    fn suggestions(&self) -> Vec<String> {
        vec!["Try another language".to_string()]
    }

    fn platform_label(&self, _toolchain: &Toolchain) -> String {
        "Node.js".to_string()
    }

    fn file_name(&self, _source: &str) -> String {
        "main.js".to_string()
    }

    fn wrap_source(&self, source: &str, stdin: &str) -> String {
        let input_literal = js_string_literal(stdin);
        format!(
            r#"const input = {input_literal};
if (input) {{
  const lines = input.trim().split('\n');
  let lineIndex = 0;

  global.prompt = (question) => {{
    if (question) console.log(question);
    return lines[lineIndex++] || '';
  }};

  const originalRequire = require;
  require = function(module) {{
    if (module === 'readline') {{
      return {{
        createInterface: () => ({{
          question: (query, callback) => {{
            console.log(query);
            callback(lines[lineIndex++] || '');
          }},
          close: () => {{}}
        }})
      }};
    }}
    return originalRequire(module);
  }};
}}

try {{
{source}
}} catch (error) {{
  console.error('Runtime Error:', error.message);
  process.exit(1);
}}
"#
        )
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
            toolchain.tool_or(0, "node").to_string(),
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
    fn literal_escapes_quotes_and_newlines() {
        assert_eq!(js_string_literal("a\"b\n"), "\"a\\\"b\\n\"");
        assert_eq!(js_string_literal("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(js_string_literal(""), "\"\"");
    }

    #[test]
    fn literal_escapes_control_characters() {
        assert_eq!(js_string_literal("\u{1}"), "\"\\u{1}\"");
    }

    #[test]
    fn wrapper_injects_input_shim() {
        let wrapped = JavascriptAdapter.wrap_source("console.log(prompt())", "hello\nworld");
        assert!(wrapped.contains("const input = \"hello\\nworld\""));
        assert!(wrapped.contains("global.prompt"));
        assert!(wrapped.contains("module === 'readline'"));
        assert!(wrapped.contains("console.log(prompt())"));
        assert!(wrapped.contains("Runtime Error:"));
    }

    #[test]
    fn wrapper_without_input_still_guards_user_code() {
        let wrapped = JavascriptAdapter.wrap_source("console.log(1)", "");
        assert!(wrapped.contains("const input = \"\""));
        assert!(wrapped.contains("try {"));
        assert!(wrapped.contains("process.exit(1)"));
    }

    #[test]
    fn runs_a_single_node_process() {
        let base = tempfile::tempdir().unwrap();
        let ws = Workspace::create(base.path()).unwrap();
        let toolchain = Toolchain::new(vec!["node".to_string()]);
        assert!(JavascriptAdapter.compile_command(&ws, &toolchain, "").is_none());
        let run = JavascriptAdapter.run_command(&ws, &toolchain, "");
        assert_eq!(run[0], "node");
        assert!(run[1].ends_with("main.js"));
    }
}
