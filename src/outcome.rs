//! Validation outcomes
//!
//! Every validation attempt ends in exactly one of six closed codes.
//! When several conditions could apply, priority is:
//!
//! CorruptedStruct > SchemaNotFound > TypeMismatch > RangeViolation > DependencyFail > Success
//!
//! Outcomes are never accumulated. The first failing stage decides.

use std::fmt;

use serde::{Serialize, Serializer};

/// Severity attached to every rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Artifact rejected, caller continues
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// The closed set of validation outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Artifact accepted
    Success,
    /// Raw buffer failed binary-level integrity checks
    CorruptedStruct,
    /// Schema identifier could not be resolved into a valid schema
    SchemaNotFound,
    /// Declared field missing or of the wrong type
    TypeMismatch,
    /// Well-typed value outside its declared bounds
    RangeViolation,
    /// Cross-field predicate evaluated false
    DependencyFail,
}

impl Outcome {
    /// All outcomes in priority order (highest first).
    pub const PRIORITY_ORDER: [Outcome; 6] = [
        Outcome::CorruptedStruct,
        Outcome::SchemaNotFound,
        Outcome::TypeMismatch,
        Outcome::RangeViolation,
        Outcome::DependencyFail,
        Outcome::Success,
    ];

    /// Returns the stable string code.
    pub fn code(&self) -> &'static str {
        match self {
            Outcome::Success => "PDS_OK",
            Outcome::CorruptedStruct => "PDS_CORRUPTED_STRUCT",
            Outcome::SchemaNotFound => "PDS_SCHEMA_NOT_FOUND",
            Outcome::TypeMismatch => "PDS_TYPE_MISMATCH",
            Outcome::RangeViolation => "PDS_RANGE_VIOLATION",
            Outcome::DependencyFail => "PDS_DEPENDENCY_FAIL",
        }
    }

    /// Returns the priority rank; lower ranks win.
    pub fn priority(&self) -> u8 {
        match self {
            Outcome::CorruptedStruct => 0,
            Outcome::SchemaNotFound => 1,
            Outcome::TypeMismatch => 2,
            Outcome::RangeViolation => 3,
            Outcome::DependencyFail => 4,
            Outcome::Success => 5,
        }
    }

    /// Process exit code used by the command line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::CorruptedStruct => 10,
            Outcome::SchemaNotFound => 11,
            Outcome::TypeMismatch => 12,
            Outcome::RangeViolation => 13,
            Outcome::DependencyFail => 14,
        }
    }

    /// Returns true only for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Returns the severity of a non-success outcome.
    pub fn severity(&self) -> Option<Severity> {
        if self.is_success() {
            None
        } else {
            Some(Severity::Reject)
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Single failure detail: where, what was expected, what was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field name or structural location (e.g. "header.total_len")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>, actual_type: &str) -> Self {
        Self::new(
            field,
            "no undeclared fields",
            format!("undeclared {} field", actual_type),
        )
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}
