//! Error taxonomy for generation and splicing.
//!
//! Generation has exactly one failure kind, [`StringifyError::InvalidTypeDescriptor`];
//! the [`InvalidReason`] says which identifier tripped it. Errors are raised before any
//! text is emitted, so a failed call never yields partial output.

use std::fmt;

use thiserror::Error;

/// Which part of the descriptor an identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    TypeName,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("{role} name is empty")]
    EmptyIdentifier { role: IdentRole },
    #[error("{role} name `{name}` is not a valid identifier")]
    MalformedIdentifier { role: IdentRole, name: String },
    #[error("{role} name `{name}` is a reserved word")]
    ReservedWord { role: IdentRole, name: String },
    #[error("field `{name}` is declared more than once")]
    DuplicateField { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StringifyError {
    #[error("invalid type descriptor `{type_name}`: {reason}")]
    InvalidTypeDescriptor { type_name: String, reason: InvalidReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("insertion offset {offset} is past the end of the source ({len} bytes)")]
    OutOfBounds { offset: usize, len: usize },
    #[error("insertion offset {offset} does not fall on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

impl fmt::Display for IdentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentRole::TypeName => f.write_str("type"),
            IdentRole::Field => f.write_str("field"),
        }
    }
}

impl StringifyError {
    pub fn reason(&self) -> &InvalidReason {
        match self {
            StringifyError::InvalidTypeDescriptor { reason, .. } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_identifier() {
        let err = StringifyError::InvalidTypeDescriptor {
            type_name: "Point".into(),
            reason: InvalidReason::ReservedWord { role: IdentRole::Field, name: "class".into() },
        };
        assert_eq!(
            err.to_string(),
            "invalid type descriptor `Point`: field name `class` is a reserved word"
        );
    }
}
