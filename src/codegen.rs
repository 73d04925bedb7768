//! Indentation-aware line emitter shared by every target.

#[derive(Debug, Clone)]
pub struct Codegen {
    out: String,
    indent_unit: String,
    depth: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::with_indent("    ", 0)
    }

    pub fn with_indent(indent_unit: impl Into<String>, base_depth: usize) -> Self {
        Self { out: String::new(), indent_unit: indent_unit.into(), depth: base_depth }
    }

    /// Emit one line at the current depth. Empty lines carry no trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(&self.indent_unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    /// `open` line, body one level deeper, then `close` line.
    pub fn block(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(close)
    }

    /// Final text without the trailing newline.
    pub fn into_string(mut self) -> String {
        if self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote `s` as a double-quoted literal valid in C#, Java and Rust.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
