//! Generate "describe as text" members for record-like types.
//!
//! A [`TypeDescriptor`] (type name plus ordered fields) goes in; a [`GeneratedMember`] holding
//! the source of a C# `ToString` override, Java `toString` override or Rust `Display` impl comes
//! out. The [`scan`] and [`splice`] modules read C# classes from source text and put the
//! generated member back, which together make up the `ToString` code fix.
pub mod cli;
pub mod codegen;
pub mod error;
pub mod ir;
pub mod jq_exec;
pub mod path_de;
pub mod scan;
pub mod splice;
pub mod stringify;
pub mod target;
pub mod validate;

pub use error::{InvalidReason, SpliceError, StringifyError};
pub use ir::{FieldDescriptor, GeneratedMember, TypeDescriptor};
pub use splice::{fix_source, splice, FixOptions, FixOutcome, InsertionPoint};
pub use stringify::{generate, GenerateOptions, Stringifier};
pub use target::Target;
