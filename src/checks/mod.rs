//! Semantic checks over a verified artifact
//!
//! Three stages, each a pure function of a compiled schema and an artifact
//! view, run in this order by the engine:
//!
//! 1. types: presence of required fields, exact type tags, closed mode
//! 2. ranges: numeric bounds, length bounds, enumerations, patterns
//! 3. dependencies: cross-field rules
//!
//! Each stage reports only the first violation it finds, visiting fields in
//! schema declaration order.

mod dependencies;
mod errors;
mod ranges;
mod types;

use std::cmp::Ordering;

pub use dependencies::check_dependencies;
pub use errors::{CheckError, CheckKind, CheckResult};
pub use ranges::check_ranges;
pub use types::check_types;

use crate::artifact::Value;
use crate::schema::Literal;

/// Whether `value` equals `literal`. Ints and floats compare numerically.
pub(crate) fn literal_matches(literal: &Literal, value: &Value<'_>) -> bool {
    match (literal, value) {
        (Literal::Bool(a), Value::Bool(b)) => a == b,
        (Literal::Int(a), Value::Int(b)) => a == b,
        (Literal::Int(a), Value::Float(b)) => (*a as f64) == *b,
        (Literal::Float(a), Value::Float(b)) => a == b,
        (Literal::Float(a), Value::Int(b)) => *a == (*b as f64),
        (Literal::String(a), Value::Str(b)) => a == b,
        _ => false,
    }
}

/// Orders two values of compatible kinds; `None` for anything else.
pub(crate) fn compare_values(left: &Value<'_>, right: &Value<'_>) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
