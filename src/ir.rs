// Structural input/output model for the stringifier. Target-agnostic.

use serde::{Deserialize, Serialize};

use crate::target::Target;

/// One named member of the target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    /// Passed through untouched; generation never looks at it.
    #[serde(default)]
    pub declared_type: String,
}

/// A record-like type: a name plus its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub type_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>, // declaration order, emitted verbatim
}

/// Synthesized member text, ready to be spliced by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMember {
    pub target: Target,
    pub source_text: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self { name: name.into(), declared_type: declared_type.into() }
    }
}

impl TypeDescriptor {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), fields: Vec::new() }
    }
    pub fn with_field(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor::new(name, declared_type));
        self
    }
}

impl std::fmt::Display for GeneratedMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source_text)
    }
}
