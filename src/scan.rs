//! Lightweight C# class scanner.
//!
//! Works on raw, possibly incomplete source text. Comments and string/char literals are
//! blanked out first (byte offsets preserved), then class headers are matched and their
//! bodies walked by brace depth. Only members at depth 1 of a class body are considered, so
//! a nested class's properties belong to the nested class alone.
//!
//! This is a heuristic reader, not a parser: it recognises
//! - auto/explicit properties: `[attrs] modifiers Type Name { ... }`
//! - expression-bodied properties: `modifiers Type Name => expr;`
//! - an existing `override ... ToString()` in either block or `=>` form.
//!
//! Property types may be a leading tuple (`(int, string) Pair`) but may not contain parentheses
//! elsewhere, so `List<(int, string)>` properties are not picked up.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ir::{FieldDescriptor, TypeDescriptor};

/// One `class` declaration found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    /// Byte offset of the `class` keyword.
    pub keyword_offset: usize,
    /// Byte offset of the body's `{`, if the header has one.
    pub body_open: Option<usize>,
    /// Byte offset of the body's closing `}`; `None` while the body is unterminated.
    pub body_close: Option<usize>,
    pub properties: Vec<FieldDescriptor>,
    pub has_to_string: bool,
}

impl ClassInfo {
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor { type_name: self.name.clone(), fields: self.properties.clone() }
    }
}

static CLASS_HEADER: Lazy<regex::bytes::Regex> =
    Lazy::new(|| regex::bytes::Regex::new(r"\bclass\s+(@?[\p{L}_][\p{L}\p{N}_]*)").unwrap());

static LEADING_ATTRS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:\[[^\]]*\]\s*)*").unwrap());

static TO_STRING_OVERRIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^(=]*\boverride\b[^(=.]*\bToString\s*\(\s*\)").unwrap());

static PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^(?P<mods>(?:(?:public|private|protected|internal|static|virtual|override|abstract|sealed|new|readonly|required|extern|unsafe|partial)\s+)*)(?P<ty>(?:\([^(){};=]*\)|[^\s=(){};])[^=(){};]*?)\s+(?P<name>@?[\p{L}_][\p{L}\p{N}_]*)\s*(?P<arrow>=>.*)?$",
    )
    .unwrap()
});

static NOT_A_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:class|struct|interface|enum|record|delegate|event|operator|implicit|explicit|const|using|namespace)\b")
        .unwrap()
});

/// Every class declaration in source order.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn scan_classes(source: &str) -> Vec<ClassInfo> {
    let masked = mask_trivia(source);
    let mut out = Vec::new();

    for caps in CLASS_HEADER.captures_iter(&masked) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
        if is_constraint_or_escaped(&masked, whole.start()) {
            continue;
        }
        let Ok(name) = std::str::from_utf8(name.as_bytes()) else { continue };

        let body_open = find_body_open(&masked, whole.end());
        let mut info = ClassInfo {
            name: name.to_string(),
            keyword_offset: whole.start(),
            body_open,
            body_close: None,
            properties: Vec::new(),
            has_to_string: false,
        };
        if let Some(open) = body_open {
            walk_body(&masked, open, &mut info);
        }
        debug!(
            class = %info.name,
            properties = info.properties.len(),
            has_to_string = info.has_to_string,
            "scanned class"
        );
        out.push(info);
    }
    out
}

/// Classes that do not override `ToString` yet.
pub fn missing_to_string(source: &str) -> Vec<ClassInfo> {
    scan_classes(source).into_iter().filter(|c| !c.has_to_string).collect()
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Copy of `source` with comments, preprocessor lines and string/char literals replaced by spaces.
/// Masked spans begin and end on ASCII delimiters, so the result stays valid UTF-8.
fn mask_trivia(source: &str) -> Vec<u8> {
    let b = source.as_bytes();
    let mut out = b.to_vec();
    let len = b.len();
    let mut i = 0;

    while i < len {
        let end = match b[i] {
            b'/' if b.get(i + 1) == Some(&b'/') => {
                b[i..].iter().position(|&c| c == b'\n').map_or(len, |p| i + p)
            }
            b'/' if b.get(i + 1) == Some(&b'*') => {
                find_seq(b, i + 2, b"*/").map_or(len, |p| p + 2)
            }
            b'#' if at_line_start(b, i) => {
                b[i..].iter().position(|&c| c == b'\n').map_or(len, |p| i + p)
            }
            b'"' => string_literal_end(b, i),
            b'\'' => char_literal_end(b, i),
            _ => {
                i += 1;
                continue;
            }
        };
        for c in &mut out[i..end] {
            if *c != b'\n' {
                *c = b' ';
            }
        }
        i = end.max(i + 1);
    }
    out
}

fn at_line_start(b: &[u8], i: usize) -> bool {
    b[..i].iter().rev().take_while(|&&c| c != b'\n').all(|&c| c == b' ' || c == b'\t')
}

fn find_seq(b: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    b.get(from..)?.windows(needle.len()).position(|w| w == needle).map(|p| from + p)
}

fn string_literal_end(b: &[u8], start: usize) -> usize {
    let len = b.len();
    let prefix = |back: usize| start.checked_sub(back).map(|p| b[p]);
    let verbatim = prefix(1) == Some(b'@')
        || (prefix(1) == Some(b'$') && prefix(2) == Some(b'@'));

    if verbatim {
        let mut j = start + 1;
        while j < len {
            if b[j] == b'"' {
                if b.get(j + 1) == Some(&b'"') {
                    j += 2;
                    continue;
                }
                return j + 1;
            }
            j += 1;
        }
        return len;
    }

    let run = b[start..].iter().take_while(|&&c| c == b'"').count();
    if run >= 3 {
        // raw string literal: closed by a run of at least as many quotes
        let mut j = start + run;
        while j < len {
            if b[j] == b'"' {
                let close = b[j..].iter().take_while(|&&c| c == b'"').count();
                if close >= run {
                    return j + close;
                }
                j += close;
                continue;
            }
            j += 1;
        }
        return len;
    }

    let mut j = start + 1;
    while j < len {
        match b[j] {
            b'\\' => j += 2,
            b'"' => return j + 1,
            b'\n' => return j,
            _ => j += 1,
        }
    }
    len
}

fn char_literal_end(b: &[u8], start: usize) -> usize {
    let len = b.len();
    let mut j = start + 1;
    while j < len {
        match b[j] {
            b'\\' => j += 2,
            b'\'' => return j + 1,
            b'\n' => return j,
            _ => j += 1,
        }
    }
    len
}

/// `where T : class` or `@class` rather than a declaration.
fn is_constraint_or_escaped(masked: &[u8], keyword_at: usize) -> bool {
    if keyword_at > 0 && masked[keyword_at - 1] == b'@' {
        return true;
    }
    let prev = masked[..keyword_at].iter().rev().find(|c| !c.is_ascii_whitespace());
    matches!(prev, Some(b':') | Some(b','))
}

/// First `{` after the header, unless a `;` ends the declaration first.
fn find_body_open(masked: &[u8], from: usize) -> Option<usize> {
    for (i, &c) in masked.iter().enumerate().skip(from) {
        match c {
            b'{' => return Some(i),
            b';' | b'}' => return None,
            _ => {}
        }
    }
    None
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Brace,
    Semicolon,
}

fn walk_body(masked: &[u8], open: usize, info: &mut ClassInfo) {
    let mut depth = 0usize;
    let mut seg_start = open + 1;

    for i in (open + 1)..masked.len() {
        match masked[i] {
            b'{' => {
                if depth == 0 {
                    classify_member(&masked[seg_start..i], Terminator::Brace, info);
                }
                depth += 1;
            }
            b'}' => {
                if depth == 0 {
                    info.body_close = Some(i);
                    return;
                }
                depth -= 1;
                if depth == 0 {
                    seg_start = i + 1;
                }
            }
            b';' if depth == 0 => {
                classify_member(&masked[seg_start..i], Terminator::Semicolon, info);
                seg_start = i + 1;
            }
            _ => {}
        }
    }
}

fn classify_member(segment: &[u8], terminator: Terminator, info: &mut ClassInfo) {
    let Ok(segment) = std::str::from_utf8(segment) else { return };
    let header = LEADING_ATTRS.replace(segment, "");
    let header = header.trim();
    if header.is_empty() {
        return;
    }

    if TO_STRING_OVERRIDE.is_match(header) {
        info.has_to_string = true;
        return;
    }

    let Some(caps) = PROPERTY.captures(header) else { return };
    let has_arrow = caps.name("arrow").is_some();
    let is_property = match terminator {
        Terminator::Brace => !has_arrow,
        Terminator::Semicolon => has_arrow,
    };
    if !is_property {
        return;
    }
    let mods = caps.name("mods").map_or("", |m| m.as_str());
    let ty = caps.name("ty").map_or("", |m| m.as_str()).trim();
    if ty.is_empty() || NOT_A_TYPE.is_match(ty) || mods.split_whitespace().any(|m| m == "static") {
        return;
    }
    let name = caps.name("name").map_or("", |m| m.as_str());
    info.properties.push(FieldDescriptor::new(name, ty));
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    fn names(info: &ClassInfo) -> Vec<&str> {
        info.properties.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn finds_auto_and_expression_properties_in_order() {
        let src = r#"
namespace Demo
{
    public class Person
    {
        [JsonProperty("n")]
        public string Name { get; set; }
        public int Age { get; private set; } = 18;
        public bool IsAdult => Age >= 18;
        private int _count;
        public Person(string name) { Name = name; }
        public void Greet() { Console.WriteLine("hi {"); }
        public static int Instances { get; set; }
    }
}
"#;
        let classes = scan_classes(src);
        assert_eq!(classes.len(), 1);
        let person = &classes[0];
        assert_eq!(person.name, "Person");
        assert_eq!(names(person), ["Name", "Age", "IsAdult"]);
        assert_eq!(person.properties[0].declared_type, "string");
        assert!(!person.has_to_string);
        assert_eq!(src.as_bytes()[person.body_close.unwrap()], b'}');
    }

    #[test]
    fn detects_existing_override_in_both_forms() {
        let src = r#"
class A { public override string ToString() { return "a"; } }
class B { public override string ToString() => "b"; }
class C { public string ToString(int x) { return ""; } }
"#;
        let flags = scan_classes(src).iter().map(|c| (c.name.clone(), c.has_to_string)).collect::<Vec<_>>();
        assert_eq!(
            flags,
            [("A".to_string(), true), ("B".to_string(), true), ("C".to_string(), false)]
        );
        let missing = missing_to_string(src);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "C");
    }

    #[test]
    fn nested_class_properties_stay_with_nested_class() {
        let src = "class Outer { public int A { get; set; } class Inner { public int B { get; set; } } public int C { get; set; } }";
        let classes = scan_classes(src);
        assert_eq!(classes.len(), 2);
        assert_eq!(names(&classes[0]), ["A", "C"]);
        assert_eq!(names(&classes[1]), ["B"]);
    }

    #[test]
    fn comments_strings_and_constraints_are_ignored() {
        let src = r#"
// class Fake { public int X { get; set; } }
/* class AlsoFake { } */
class Real<T> where T : class, new()
{
    public string S { get; set; } = "class Nope { }";
    public string V { get; set; } = @"say ""}"" ";
    public char Brace { get; } = '}';
}
"#;
        let classes = scan_classes(src);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Real");
        assert_eq!(names(&classes[0]), ["S", "V", "Brace"]);
        assert!(classes[0].body_close.is_some());
    }

    #[test]
    fn unterminated_body_is_tolerated() {
        let src = "public class Broken\n{\n    public int X { get; set; }\n    public int Y { get";
        let classes = scan_classes(src);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].body_close, None);
        assert_eq!(names(&classes[0]), ["X", "Y"]);
    }

    #[test]
    fn descriptor_uses_class_name_and_property_order() {
        let src = "class Point { public int X { get; set; } public int Y { get; set; } }";
        let ty = scan_classes(src)[0].descriptor();
        assert_eq!(ty, TypeDescriptor::new("Point").with_field("X", "int").with_field("Y", "int"));
    }

    #[test]
    fn masking_preserves_offsets() {
        let src = "a /* é */ \"ü\" 'x' b";
        let masked = mask_trivia(src);
        assert_eq!(masked.len(), src.len());
        assert!(std::str::from_utf8(&masked).is_ok());
        assert_eq!(masked[0], b'a');
        assert_eq!(*masked.last().unwrap(), b'b');
    }

    #[test]
    fn calling_to_string_is_not_overriding_it() {
        let src = "class Order { public int Id { get; set; } public override string Label => Id.ToString(); }";
        let order = &scan_classes(src)[0];
        assert!(!order.has_to_string);
        assert_eq!(names(order), ["Id", "Label"]);
        assert_eq!(missing_to_string(src).len(), 1);
    }

    #[test]
    fn preprocessor_lines_do_not_leak_into_headers() {
        let src = "\
class Stats
{
    #region Statics
    public static int Count { get; set; }
    #endregion
#if DEBUG
    public string Trace { get; set; }
#endif
    public int Total { get; set; }
}
";
        let stats = &scan_classes(src)[0];
        assert_eq!(names(stats), ["Trace", "Total"]);
        assert_eq!(stats.properties[0].declared_type, "string");
        assert_eq!(stats.properties[1].declared_type, "int");
    }

    #[test]
    fn hash_inside_code_is_not_a_directive() {
        let masked = mask_trivia("int x = a#b;\n  #pragma warning disable\nint y;");
        let text = std::str::from_utf8(&masked).unwrap();
        assert!(text.starts_with("int x = a#b;\n"));
        assert!(text.ends_with("\nint y;"));
        assert!(!text.contains("pragma"));
    }

    #[test]
    fn leading_tuple_types_are_properties() {
        let src = "class Pairs { public (int, string) Pair { get; set; } public int Sum(int a) { return a; } }";
        let pairs = &scan_classes(src)[0];
        assert_eq!(names(pairs), ["Pair"]);
        assert_eq!(pairs.properties[0].declared_type, "(int, string)");
    }
}
