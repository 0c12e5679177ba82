//! Cross-field dependency validation
//!
//! Rules are evaluated in field order, then rule order within the owning
//! field, against a view that passed type and range checks. Rules only ever
//! look at fields inside the same artifact.

use crate::artifact::{ArtifactView, Value};
use crate::schema::{DependencyRule, FieldDef, SchemaModel};

use super::errors::{CheckError, CheckResult};
use super::{compare_values, literal_matches};

/// Evaluates every dependency rule; the first false one is reported.
pub fn check_dependencies(model: &SchemaModel, view: &ArtifactView<'_>) -> CheckResult<()> {
    for field in model.fields() {
        let owner = view.get(&field.name);
        for rule in &field.depends {
            check_rule(field, owner, rule, view)?;
        }
    }
    Ok(())
}

fn check_rule(
    field: &FieldDef,
    owner: Option<&Value<'_>>,
    rule: &DependencyRule,
    view: &ArtifactView<'_>,
) -> CheckResult<()> {
    let fail = |expected: String, actual: String| -> CheckResult<()> {
        Err(CheckError::dependency_failed(&field.name, rule.name(), expected, actual))
    };

    match rule {
        DependencyRule::RequiredIf { field: other, equals } => {
            let triggered = view
                .get(other)
                .is_some_and(|value| literal_matches(equals, value));
            if triggered && owner.is_none() {
                return fail(
                    format!("present when '{}' == {}", other, equals),
                    "missing".into(),
                );
            }
        }
        DependencyRule::Requires { fields } => {
            if owner.is_some() {
                if let Some(absent) = fields.iter().find(|name| !view.contains(name)) {
                    return fail(format!("'{}' present", absent), format!("'{}' missing", absent));
                }
            }
        }
        DependencyRule::Excludes { fields } => {
            if owner.is_some() {
                if let Some(present) = fields.iter().find(|name| view.contains(name)) {
                    return fail(format!("'{}' absent", present), format!("'{}' present", present));
                }
            }
        }
        DependencyRule::Compare { op, field: other } => {
            if let (Some(left), Some(right)) = (owner, view.get(other)) {
                let holds = compare_values(left, right).is_some_and(|ordering| op.holds(ordering));
                if !holds {
                    return fail(
                        format!("{} {} '{}' ({})", field.name, op.symbol(), other, right.describe()),
                        left.describe(),
                    );
                }
            }
        }
        DependencyRule::CountOf { field: other } => {
            if let (Some(sized), Some(count)) = (owner, view.get(other)) {
                let length = sized.length().and_then(|len| i64::try_from(len).ok());
                let declared = count.as_i64();
                if length.is_none() || length != declared {
                    return fail(
                        format!("length equal to '{}' ({})", other, count.describe()),
                        length.map_or_else(|| sized.describe(), |len| format!("length {}", len)),
                    );
                }
            }
        }
    }

    Ok(())
}
