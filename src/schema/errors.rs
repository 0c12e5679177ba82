//! Schema resolution error types
//!
//! Error codes (all REJECT, all reported as `PDS_SCHEMA_NOT_FOUND`):
//! - PDS_SCHEMA_INVALID_ID
//! - PDS_SCHEMA_UNKNOWN
//! - PDS_SCHEMA_UNREADABLE
//! - PDS_SCHEMA_TOO_LARGE
//! - PDS_SCHEMA_MALFORMED
//! - PDS_SCHEMA_INVALID
//!
//! A schema that cannot be read or parsed is indistinguishable from a missing
//! one at the outcome level; the codes only sharpen diagnostics.

use std::fmt;

use crate::outcome::{Outcome, Severity};

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Identifier empty, too long, or containing control characters
    InvalidIdentifier,
    /// Source has no schema for the identifier
    UnknownSchema,
    /// Source failed while reading the schema
    Unreadable,
    /// Schema document exceeds the configured maximum
    TooLarge,
    /// Schema document is not valid JSON for the schema format
    Malformed,
    /// Parsed schema is not structurally valid
    InvalidStructure,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidIdentifier => "PDS_SCHEMA_INVALID_ID",
            SchemaErrorCode::UnknownSchema => "PDS_SCHEMA_UNKNOWN",
            SchemaErrorCode::Unreadable => "PDS_SCHEMA_UNREADABLE",
            SchemaErrorCode::TooLarge => "PDS_SCHEMA_TOO_LARGE",
            SchemaErrorCode::Malformed => "PDS_SCHEMA_MALFORMED",
            SchemaErrorCode::InvalidStructure => "PDS_SCHEMA_INVALID",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema_id: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, schema_id: Option<String>, message: String) -> Self {
        Self {
            code,
            message,
            schema_id,
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidIdentifier,
            None,
            format!("Invalid schema identifier: {}", reason.into()),
        )
    }

    /// Create an unknown schema error
    pub fn unknown_schema(schema_id: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self::new(
            SchemaErrorCode::UnknownSchema,
            Some(id.clone()),
            format!("Schema '{}' not found", id),
        )
    }

    /// Create an unreadable schema error
    pub fn unreadable(schema_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self::new(
            SchemaErrorCode::Unreadable,
            Some(id.clone()),
            format!("Schema '{}' unreadable: {}", id, reason.into()),
        )
    }

    /// Create a schema too large error
    pub fn too_large(schema_id: impl Into<String>, len: usize, max: usize) -> Self {
        let id = schema_id.into();
        Self::new(
            SchemaErrorCode::TooLarge,
            Some(id.clone()),
            format!("Schema '{}' is {} bytes, maximum is {}", id, len, max),
        )
    }

    /// Create an error for a schema document that does not parse
    pub fn malformed(schema_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self::new(
            SchemaErrorCode::Malformed,
            Some(id.clone()),
            format!("Malformed schema '{}': {}", id, reason.into()),
        )
    }

    /// Create an error for a parsed schema that breaks a structural rule
    pub fn invalid_structure(schema_id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self::new(
            SchemaErrorCode::InvalidStructure,
            Some(id.clone()),
            format!("Invalid schema '{}': {}", id, reason.into()),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Always `Outcome::SchemaNotFound`
    pub fn outcome(&self) -> Outcome {
        Outcome::SchemaNotFound
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema ID if applicable
    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", Severity::Reject, self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_maps_to_schema_not_found() {
        let errors = [
            SchemaError::invalid_identifier("empty"),
            SchemaError::unknown_schema("x"),
            SchemaError::unreadable("x", "permission denied"),
            SchemaError::too_large("x", 10, 5),
            SchemaError::malformed("x", "eof"),
            SchemaError::invalid_structure("x", "no fields"),
        ];
        for err in &errors {
            assert_eq!(err.outcome(), Outcome::SchemaNotFound);
        }
    }

    #[test]
    fn test_display_carries_code_and_id() {
        let err = SchemaError::unknown_schema("sensor-reading");
        let display = err.to_string();
        assert!(display.contains("PDS_SCHEMA_UNKNOWN"));
        assert!(display.contains("sensor-reading"));
        assert_eq!(err.schema_id(), Some("sensor-reading"));
    }
}
