//! Target languages and their identifier grammar.
//!
//! Identifier checks are deliberately close to each language's lexical rules but not a full
//! Unicode-category implementation: letters, digits and `_` (plus `$` for Java).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// `public override string ToString()`
    #[default]
    Csharp,
    /// `@Override public String toString()`
    Java,
    /// `impl std::fmt::Display`
    Rust,
}

/// Why a string failed the identifier check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentIssue {
    Empty,
    Malformed,
    Reserved,
}

static CSHARP_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(@)?([\p{L}_][\p{L}\p{N}_]*)$").unwrap());
static JAVA_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").unwrap());
static RUST_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(r#)?([\p{L}_][\p{L}\p{N}_]*)$").unwrap());

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const JAVA_KEYWORDS: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

const RUST_KEYWORDS: &[&str] = &[
    "_", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// Keywords that stay reserved even behind `r#`.
const RUST_UNRAWABLE: &[&str] = &["_", "crate", "self", "Self", "super"];

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Csharp => "csharp",
            Target::Java => "java",
            Target::Rust => "rust",
        }
    }

    /// File extension conventionally used for this target's sources.
    pub fn extension(self) -> &'static str {
        match self {
            Target::Csharp => "cs",
            Target::Java => "java",
            Target::Rust => "rs",
        }
    }

    pub fn check_identifier(self, name: &str) -> Result<(), IdentIssue> {
        if name.is_empty() {
            return Err(IdentIssue::Empty);
        }
        match self {
            Target::Csharp => {
                let caps = CSHARP_IDENT.captures(name).ok_or(IdentIssue::Malformed)?;
                let escaped = caps.get(1).is_some();
                if !escaped && CSHARP_KEYWORDS.contains(&name) {
                    return Err(IdentIssue::Reserved);
                }
                Ok(())
            }
            Target::Java => {
                if !JAVA_IDENT.is_match(name) {
                    return Err(IdentIssue::Malformed);
                }
                if JAVA_KEYWORDS.contains(&name) {
                    return Err(IdentIssue::Reserved);
                }
                Ok(())
            }
            Target::Rust => {
                let caps = RUST_IDENT.captures(name).ok_or(IdentIssue::Malformed)?;
                let bare = &caps[2];
                let raw = caps.get(1).is_some();
                if raw && RUST_UNRAWABLE.contains(&bare) {
                    return Err(IdentIssue::Reserved);
                }
                if !raw && RUST_KEYWORDS.contains(&bare) {
                    return Err(IdentIssue::Reserved);
                }
                Ok(())
            }
        }
    }

    /// Identifier with the target's escape prefix removed (`@class` → `class`, `r#type` → `type`).
    pub fn bare_name(self, name: &str) -> &str {
        match self {
            Target::Csharp => name.strip_prefix('@').unwrap_or(name),
            Target::Java => name,
            Target::Rust => name.strip_prefix("r#").unwrap_or(name),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csharp_allows_verbatim_keywords_only_with_at() {
        assert_eq!(Target::Csharp.check_identifier("class"), Err(IdentIssue::Reserved));
        assert_eq!(Target::Csharp.check_identifier("@class"), Ok(()));
        assert_eq!(Target::Csharp.bare_name("@class"), "class");
    }

    #[test]
    fn rust_raw_identifiers() {
        assert_eq!(Target::Rust.check_identifier("type"), Err(IdentIssue::Reserved));
        assert_eq!(Target::Rust.check_identifier("r#type"), Ok(()));
        assert_eq!(Target::Rust.check_identifier("r#self"), Err(IdentIssue::Reserved));
        assert_eq!(Target::Rust.check_identifier("_"), Err(IdentIssue::Reserved));
        assert_eq!(Target::Rust.check_identifier("_tmp"), Ok(()));
    }

    #[test]
    fn malformed_and_empty() {
        for target in [Target::Csharp, Target::Java, Target::Rust] {
            assert_eq!(target.check_identifier(""), Err(IdentIssue::Empty));
            assert_eq!(target.check_identifier("1st"), Err(IdentIssue::Malformed));
            assert_eq!(target.check_identifier("first name"), Err(IdentIssue::Malformed));
            assert_eq!(target.check_identifier("Größe"), Ok(()));
        }
        assert_eq!(Target::Java.check_identifier("$id"), Ok(()));
        assert_eq!(Target::Csharp.check_identifier("$id"), Err(IdentIssue::Malformed));
    }
}
