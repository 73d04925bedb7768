//! Text splicing of generated members, and the scan → generate → splice code-fix.

use tracing::{debug, info, warn};

use crate::error::SpliceError;
use crate::ir::GeneratedMember;
use crate::scan::{scan_classes, ClassInfo};
use crate::stringify::{GenerateOptions, Stringifier};
use crate::target::Target;

/// Byte offset the member is inserted in front of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub offset: usize,
}

impl InsertionPoint {
    pub fn at(offset: usize) -> Self {
        Self { offset }
    }

    /// Just before the class body's closing brace, if the body is terminated.
    pub fn before_close(class: &ClassInfo) -> Option<Self> {
        class.body_close.map(Self::at)
    }
}

/// Insert `member` as whole lines in front of `at`.
///
/// The member is indented one `indent_unit` deeper than the line holding the insertion
/// point. A blank line separates it from a preceding member; none is added right after an
/// opening brace. Inserted lines use the source's newline style (`\r\n` if it has any).
pub fn splice(source: &str, at: InsertionPoint, member: &GeneratedMember, indent_unit: &str) -> Result<String, SpliceError> {
    let offset = at.offset;
    if offset > source.len() {
        return Err(SpliceError::OutOfBounds { offset, len: source.len() });
    }
    if !source.is_char_boundary(offset) {
        return Err(SpliceError::NotCharBoundary { offset });
    }

    let nl = newline_of(source);
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let line_indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
    let own_line = source[line_start..offset].trim().is_empty();

    let member_indent = format!("{line_indent}{indent_unit}");
    let block = reindent(&member.source_text, &member_indent, nl);

    let mut out = String::with_capacity(source.len() + block.len() + 8);
    if own_line {
        let before = &source[..line_start];
        out.push_str(before);
        if needs_gap(before) {
            out.push_str(nl);
        }
        out.push_str(&block);
        out.push_str(nl);
        out.push_str(&source[line_start..]);
    } else {
        let before = source[..offset].trim_end_matches([' ', '\t']);
        out.push_str(before);
        out.push_str(nl);
        if needs_gap(before) {
            out.push_str(nl);
        }
        out.push_str(&block);
        out.push_str(nl);
        out.push_str(line_indent);
        out.push_str(&source[offset..]);
    }
    Ok(out)
}

fn newline_of(source: &str) -> &'static str {
    if source.contains("\r\n") { "\r\n" } else { "\n" }
}

fn reindent(text: &str, indent: &str, nl: &str) -> String {
    text.lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("{indent}{l}") })
        .collect::<Vec<_>>()
        .join(nl)
}

fn needs_gap(before: &str) -> bool {
    !matches!(before.trim_end().chars().last(), None | Some('{'))
}

// ————————————————————————————————————————————————————————————————————————————
// CODE FIX
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct FixOptions {
    pub indent: String,
    /// Only fix the first class lacking `ToString`.
    pub first_only: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self { indent: "    ".to_string(), first_only: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixOutcome {
    pub source: String,
    pub fixed: Vec<String>,
    /// Classes left alone, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        !self.fixed.is_empty()
    }
}

/// Add a `ToString` override to every class that lacks one.
///
/// Edits are applied back-to-front so earlier offsets stay valid.
#[tracing::instrument(skip_all, fields(source_len = source.len(), first_only = options.first_only))]
pub fn fix_source(source: &str, options: &FixOptions) -> Result<FixOutcome, SpliceError> {
    let stringifier = Stringifier::new(GenerateOptions {
        target: Target::Csharp,
        indent: options.indent.clone(),
        base_indent: 0,
    });

    let mut outcome = FixOutcome::default();
    let mut edits: Vec<(InsertionPoint, GeneratedMember, String)> = Vec::new();

    let candidates = scan_classes(source).into_iter().filter(|c| !c.has_to_string);
    for class in candidates {
        let Some(at) = InsertionPoint::before_close(&class) else {
            warn!(class = %class.name, "class body is unterminated; skipping");
            outcome.skipped.push((class.name, "unterminated class body".to_string()));
            continue;
        };
        match stringifier.generate(&class.descriptor()) {
            Ok(member) => edits.push((at, member, class.name)),
            Err(error) => {
                warn!(class = %class.name, %error, "cannot generate ToString; skipping");
                outcome.skipped.push((class.name, error.to_string()));
            }
        }
        if options.first_only && !edits.is_empty() {
            break;
        }
    }

    edits.sort_by(|a, b| b.0.offset.cmp(&a.0.offset));
    let mut text = source.to_string();
    for (at, member, name) in edits {
        text = splice(&text, at, &member, &options.indent)?;
        debug!(class = %name, offset = at.offset, "spliced ToString");
        outcome.fixed.push(name);
    }
    outcome.fixed.reverse();
    info!(fixed = outcome.fixed.len(), skipped = outcome.skipped.len(), "code fix applied");

    outcome.source = text;
    Ok(outcome)
}
