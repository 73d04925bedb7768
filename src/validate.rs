use indexmap::IndexSet;

use crate::error::{IdentRole, InvalidReason, StringifyError};
use crate::ir::TypeDescriptor;
use crate::target::{IdentIssue, Target};

/// Check a descriptor against the target grammar before anything is emitted.
///
/// First failure wins, in this order: type name, then fields in declaration order.
/// Duplicate detection compares names with their escape prefix stripped, so `@Id` and `Id`
/// collide in C#.
pub fn validate(ty: &TypeDescriptor, target: Target) -> Result<(), StringifyError> {
    let fail = |reason| StringifyError::InvalidTypeDescriptor {
        type_name: ty.type_name.clone(),
        reason,
    };

    check(target, IdentRole::TypeName, &ty.type_name).map_err(fail)?;

    let mut seen = IndexSet::<&str>::with_capacity(ty.fields.len());
    for field in &ty.fields {
        check(target, IdentRole::Field, &field.name).map_err(fail)?;
        if !seen.insert(target.bare_name(&field.name)) {
            return Err(fail(InvalidReason::DuplicateField { name: field.name.clone() }));
        }
    }
    Ok(())
}

fn check(target: Target, role: IdentRole, name: &str) -> Result<(), InvalidReason> {
    target.check_identifier(name).map_err(|issue| match issue {
        IdentIssue::Empty => InvalidReason::EmptyIdentifier { role },
        IdentIssue::Malformed => InvalidReason::MalformedIdentifier { role, name: name.to_string() },
        IdentIssue::Reserved => InvalidReason::ReservedWord { role, name: name.to_string() },
    })
}
