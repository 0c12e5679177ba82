//! Semantic check error types
//!
//! One error type for the three semantic stages; the kind decides the
//! outcome.

use std::fmt;

use crate::outcome::{Outcome, Severity, ValidationDetails};

/// Which semantic stage rejected the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Type,
    Range,
    Dependency,
}

impl CheckKind {
    pub fn outcome(&self) -> Outcome {
        match self {
            CheckKind::Type => Outcome::TypeMismatch,
            CheckKind::Range => Outcome::RangeViolation,
            CheckKind::Dependency => Outcome::DependencyFail,
        }
    }
}

/// First semantic violation found in an artifact
#[derive(Debug, Clone)]
pub struct CheckError {
    kind: CheckKind,
    message: String,
    details: ValidationDetails,
}

impl CheckError {
    fn new(kind: CheckKind, message: String, details: ValidationDetails) -> Self {
        Self {
            kind,
            message,
            details,
        }
    }

    /// Required field absent
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            CheckKind::Type,
            format!("Missing required field '{}'", field),
            ValidationDetails::missing_field(field),
        )
    }

    /// Field present in a closed-mode artifact but not in the schema
    pub fn undeclared_field(field: &str, actual_type: &str) -> Self {
        Self::new(
            CheckKind::Type,
            format!("Undeclared field '{}'", field),
            ValidationDetails::extra_field(field, actual_type),
        )
    }

    pub fn type_mismatch(
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::type_mismatch(field, expected, actual);
        Self::new(CheckKind::Type, format!("Type mismatch: {}", details), details)
    }

    pub fn range_violation(
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::new(field, expected, actual);
        Self::new(CheckKind::Range, format!("Out of range: {}", details), details)
    }

    /// `rule` owned by `field` evaluated false
    pub fn dependency_failed(
        field: &str,
        rule: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::new(field, expected, actual);
        Self::new(
            CheckKind::Dependency,
            format!("Dependency '{}' failed: {}", rule, details),
            details,
        )
    }

    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    pub fn outcome(&self) -> Outcome {
        self.kind.outcome()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", Severity::Reject, self.outcome().code(), self.message)
    }
}

impl std::error::Error for CheckError {}

pub type CheckResult<T> = Result<T, CheckError>;
