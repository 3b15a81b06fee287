//! `--set field=value` parsing for the create and update commands.

use crate::domain::UserFields;

/// One `field=value` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    /// Wire name of the field.
    pub name: String,
    /// Raw value; empty clears nothing and fails required-field validation.
    pub value: String,
}

/// Parse `field=value`. The value may itself contain `=`.
///
/// # Errors
///
/// Returns a message for clap when `=` or the field name is missing.
pub fn parse_assignment(raw: &str) -> Result<FieldAssignment, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok(FieldAssignment {
        name: name.to_owned(),
        value: value.trim().to_owned(),
    })
}

/// Collect assignments into a field set; later assignments win.
pub fn fields_from(assignments: &[FieldAssignment]) -> UserFields {
    let mut fields = UserFields::default();
    for assignment in assignments {
        fields.set(&assignment.name, assignment.value.as_str());
    }
    fields
}
