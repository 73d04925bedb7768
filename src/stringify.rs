//! The stringifier: type description in, `ToString`-style member source out.
//!
//! Every field contributes `"<name>: <value>, "` to the result in declaration order. The
//! separator is appended after *every* entry, the last one included, so a single `Age = 5`
//! field renders as `"Age: 5, "`. Downstream callers compare against that exact string;
//! don't trim it.
//!
//! Values are read through direct member access (`this.X`, `self.X`) emitted at generation
//! time. Nothing is looked up by name at runtime.

use tracing::debug;

use crate::codegen::{string_literal, Codegen};
use crate::error::StringifyError;
use crate::ir::{GeneratedMember, TypeDescriptor};
use crate::target::Target;
use crate::validate::validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub target: Target,
    /// One indentation unit.
    pub indent: String,
    /// Levels applied to every emitted line, for callers splicing into an indented body.
    pub base_indent: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { target: Target::Csharp, indent: "    ".to_string(), base_indent: 0 }
    }
}

impl GenerateOptions {
    pub fn for_target(target: Target) -> Self {
        Self { target, ..Self::default() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stringifier {
    options: GenerateOptions,
}

impl Stringifier {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    #[tracing::instrument(skip_all, fields(type_name = %ty.type_name, field_count = ty.fields.len(), target = %self.options.target))]
    pub fn generate(&self, ty: &TypeDescriptor) -> Result<GeneratedMember, StringifyError> {
        let target = self.options.target;
        validate(ty, target)?;

        let mut cg = Codegen::with_indent(self.options.indent.clone(), self.options.base_indent);
        match target {
            Target::Csharp => emit_csharp(&mut cg, ty),
            Target::Java => emit_java(&mut cg, ty),
            Target::Rust => emit_rust(&mut cg, ty),
        }
        let source_text = cg.into_string();
        debug!(bytes = source_text.len(), "generated member");
        Ok(GeneratedMember { target, source_text })
    }
}

/// Generate a C# `ToString` override with default options.
pub fn generate(ty: &TypeDescriptor) -> Result<GeneratedMember, StringifyError> {
    Stringifier::default().generate(ty)
}

fn emit_csharp(cg: &mut Codegen, ty: &TypeDescriptor) {
    cg.line("public override string ToString()");
    cg.block("{", "}", |cg| {
        cg.line("var result = new System.Text.StringBuilder();");
        for field in &ty.fields {
            cg.line(format!(
                "result.AppendFormat(\"{{0}}: {{1}}, \", nameof({name}), this.{name});",
                name = field.name,
            ));
        }
        cg.line("return result.ToString();");
    });
}

fn emit_java(cg: &mut Codegen, ty: &TypeDescriptor) {
    cg.line("@Override");
    cg.block("public String toString() {", "}", |cg| {
        cg.line("StringBuilder result = new StringBuilder();");
        for field in &ty.fields {
            cg.line(format!(
                "result.append({lit}).append(\": \").append(this.{name}).append(\", \");",
                lit = string_literal(&field.name),
                name = field.name,
            ));
        }
        cg.line("return result.toString();");
    });
}

fn emit_rust(cg: &mut Codegen, ty: &TypeDescriptor) {
    let target = Target::Rust;
    cg.block(format!("impl ::std::fmt::Display for {} {{", ty.type_name), "}", |cg| {
        cg.block(
            "fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {",
            "}",
            |cg| {
                if ty.fields.is_empty() {
                    cg.line("f.write_str(\"\")");
                    return;
                }
                for field in &ty.fields {
                    cg.line(format!(
                        "write!(f, \"{bare}: {{}}, \", self.{name})?;",
                        bare = target.bare_name(&field.name),
                        name = field.name,
                    ));
                }
                cg.line("Ok(())");
            },
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IdentRole, InvalidReason};

    fn point() -> TypeDescriptor {
        TypeDescriptor::new("Point").with_field("X", "int").with_field("Y", "int")
    }

    fn rust() -> Stringifier {
        Stringifier::new(GenerateOptions::for_target(Target::Rust))
    }

    // The Rust goldens under dev-test-runner/fixtures are compiled here and also compared
    // byte-for-byte against the generator, so text and runtime checks cover the same bytes.

    mod point_golden {
        #[allow(non_snake_case)]
        pub struct Point {
            pub X: i32,
            pub Y: i32,
        }
        include!("../dev-test-runner/fixtures/generate/point.rs");
    }

    mod person_golden {
        #[allow(non_snake_case)]
        pub struct Person {
            pub Age: i32,
        }
        include!("../dev-test-runner/fixtures/generate/person.rs");
    }

    mod marker_golden {
        pub struct Marker;
        include!("../dev-test-runner/fixtures/generate/empty.rs");
    }

    fn golden(text: &str) -> &str {
        text.trim_end_matches('\n')
    }

    #[test]
    fn point_end_to_end() {
        let member = rust().generate(&point()).unwrap();
        assert_eq!(member.source_text, golden(include_str!("../dev-test-runner/fixtures/generate/point.rs")));
        assert_eq!(point_golden::Point { X: 1, Y: 2 }.to_string(), "X: 1, Y: 2, ");
    }

    #[test]
    fn single_field_keeps_trailing_separator() {
        let ty = TypeDescriptor::new("Person").with_field("Age", "int");
        let member = rust().generate(&ty).unwrap();
        assert_eq!(member.source_text, golden(include_str!("../dev-test-runner/fixtures/generate/person.rs")));
        assert_eq!(person_golden::Person { Age: 5 }.to_string(), "Age: 5, ");

        let cs = generate(&ty).unwrap();
        assert_eq!(cs.source_text, golden(include_str!("../dev-test-runner/fixtures/generate/person.cs")));
    }

    #[test]
    fn empty_field_list_renders_empty_string() {
        let member = rust().generate(&TypeDescriptor::new("Marker")).unwrap();
        assert_eq!(member.source_text, golden(include_str!("../dev-test-runner/fixtures/generate/empty.rs")));
        assert_eq!(marker_golden::Marker.to_string(), "");

        let cs = generate(&TypeDescriptor::new("Marker")).unwrap();
        assert_eq!(cs.source_text, golden(include_str!("../dev-test-runner/fixtures/generate/empty.cs")));
    }

    #[test]
    fn csharp_override_shape() {
        let member = generate(&point()).unwrap();
        assert_eq!(member.target, Target::Csharp);
        assert_eq!(
            member.source_text,
            "public override string ToString()
{
    var result = new System.Text.StringBuilder();
    result.AppendFormat(\"{0}: {1}, \", nameof(X), this.X);
    result.AppendFormat(\"{0}: {1}, \", nameof(Y), this.Y);
    return result.ToString();
}"
        );
    }

    #[test]
    fn java_override_shape() {
        let ty = TypeDescriptor::new("Account").with_field("owner", "String").with_field("$balance", "long");
        let member = Stringifier::new(GenerateOptions::for_target(Target::Java)).generate(&ty).unwrap();
        let lines = member.source_text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "@Override");
        assert_eq!(lines[1], "public String toString() {");
        assert_eq!(
            lines[3],
            "    result.append(\"owner\").append(\": \").append(this.owner).append(\", \");"
        );
        assert_eq!(
            lines[4],
            "    result.append(\"$balance\").append(\": \").append(this.$balance).append(\", \");"
        );
        assert_eq!(*lines.last().unwrap(), "}");
    }

    #[test]
    fn declaration_order_is_never_sorted() {
        let ty = TypeDescriptor::new("T").with_field("B", "int").with_field("A", "int");
        let text = generate(&ty).unwrap().source_text;
        let b = text.find("nameof(B)").unwrap();
        let a = text.find("nameof(A)").unwrap();
        assert!(b < a);
    }

    #[test]
    fn generation_is_idempotent() {
        for target in [Target::Csharp, Target::Java, Target::Rust] {
            let s = Stringifier::new(GenerateOptions::for_target(target));
            assert_eq!(s.generate(&point()).unwrap(), s.generate(&point()).unwrap());
        }
    }

    #[test]
    fn invalid_name_yields_error_and_no_text() {
        let ty = TypeDescriptor::new("Person").with_field("Age", "int").with_field("", "string");
        let err = generate(&ty).unwrap_err();
        assert_eq!(
            err,
            StringifyError::InvalidTypeDescriptor {
                type_name: "Person".into(),
                reason: InvalidReason::EmptyIdentifier { role: IdentRole::Field },
            }
        );
    }

    #[test]
    fn escaped_names_print_bare() {
        let ty = TypeDescriptor::new("Token").with_field("r#type", "String");
        let text = rust().generate(&ty).unwrap().source_text;
        assert!(text.contains("write!(f, \"type: {}, \", self.r#type)?;"));

        let ty = TypeDescriptor::new("Token").with_field("@class", "string");
        let text = generate(&ty).unwrap().source_text;
        assert!(text.contains("nameof(@class), this.@class"));
    }

    #[test]
    fn base_indent_and_unit_apply_to_every_line() {
        let options = GenerateOptions { target: Target::Csharp, indent: "\t".into(), base_indent: 1 };
        let text = Stringifier::new(options).generate(&point()).unwrap().source_text;
        for line in text.lines() {
            assert!(line.starts_with('\t'), "{line:?}");
        }
        assert!(text.contains("\n\t\tvar result"));
    }
}
