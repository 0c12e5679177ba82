//! Type checking
//!
//! - Required fields must be present
//! - Present fields must carry exactly the declared type tag
//! - Array element tags must equal the declared element type
//! - In closed mode no undeclared field may appear
//!
//! No coercion: an int is never accepted where a float is declared.

use crate::artifact::{ArtifactView, Value};
use crate::config::SchemaMode;
use crate::schema::{FieldDef, FieldKind, SchemaModel};

use super::errors::{CheckError, CheckResult};

/// Checks field presence and types in declaration order, then undeclared
/// fields in directory order when the schema is closed.
pub fn check_types(model: &SchemaModel, view: &ArtifactView<'_>, mode: SchemaMode) -> CheckResult<()> {
    for field in model.fields() {
        match view.get(&field.name) {
            Some(value) => check_value_type(field, value)?,
            None if field.required => return Err(CheckError::missing_field(&field.name)),
            None => {}
        }
    }

    if model.is_closed(mode) {
        if let Some((name, value)) = view.iter().find(|(name, _)| !model.is_declared(name)) {
            return Err(CheckError::undeclared_field(name, &value.type_name()));
        }
    }

    Ok(())
}

fn check_value_type(field: &FieldDef, value: &Value<'_>) -> CheckResult<()> {
    if value.tag() != field.kind.tag() {
        return Err(CheckError::type_mismatch(
            &field.name,
            field.type_label(),
            value.type_name(),
        ));
    }

    if let (FieldKind::Array, Some(element), Value::Array(array)) =
        (field.kind, field.element_type, value)
    {
        if array.element() != element.tag() {
            return Err(CheckError::type_mismatch(
                &field.name,
                field.type_label(),
                value.type_name(),
            ));
        }
    }

    Ok(())
}
