//! Range validation
//!
//! Runs on a view that already passed type checking. Within a field the
//! order is range, length, enum, pattern.

use std::cmp::Ordering;

use crate::artifact::{ArtifactView, Value};
use crate::schema::{FieldDef, LengthBounds, Number, RangeBounds, SchemaModel};

use super::errors::{CheckError, CheckResult};
use super::literal_matches;

/// Checks every present declared field against its constraints.
pub fn check_ranges(model: &SchemaModel, view: &ArtifactView<'_>) -> CheckResult<()> {
    for (position, field) in model.fields().iter().enumerate() {
        let Some(value) = view.get(&field.name) else {
            continue;
        };

        if let Some(range) = &field.range {
            check_numeric(field, range, value)?;
        }

        if let Some(length) = &field.length {
            check_length(field, length, value)?;
        }

        if let Some(allowed) = &field.allowed {
            if !allowed.iter().any(|literal| literal_matches(literal, value)) {
                let listed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
                return Err(CheckError::range_violation(
                    &field.name,
                    format!("one of [{}]", listed.join(", ")),
                    value.describe(),
                ));
            }
        }

        if let (Some(pattern), Some(text)) = (model.pattern(position), value.as_str()) {
            if !pattern.is_match(text) {
                return Err(CheckError::range_violation(
                    &field.name,
                    format!("match for /{}/", pattern.as_str()),
                    value.describe(),
                ));
            }
        }
    }

    Ok(())
}

fn check_numeric(field: &FieldDef, range: &RangeBounds, value: &Value<'_>) -> CheckResult<()> {
    let number = match value {
        Value::Int(v) => Number::Int(*v),
        Value::Float(v) => Number::Float(*v),
        _ => return Ok(()),
    };

    let below = range
        .min
        .is_some_and(|min| number.compare(min) == Some(Ordering::Less));
    let above = range
        .max
        .is_some_and(|max| number.compare(max) == Some(Ordering::Greater));

    if below || above {
        return Err(CheckError::range_violation(
            &field.name,
            format!("value in {}", range),
            number.to_string(),
        ));
    }
    Ok(())
}

fn check_length(field: &FieldDef, bounds: &LengthBounds, value: &Value<'_>) -> CheckResult<()> {
    let Some(len) = value.length() else {
        return Ok(());
    };
    let len = len as u64;

    let short = bounds.min.is_some_and(|min| len < min);
    let long = bounds.max.is_some_and(|max| len > max);

    if short || long {
        return Err(CheckError::range_violation(
            &field.name,
            bounds.to_string(),
            format!("length {}", len),
        ));
    }
    Ok(())
}
