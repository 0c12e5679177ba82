//! Structural integrity error types
//!
//! Every integrity error maps to `Outcome::CorruptedStruct`. The finer codes
//! exist for diagnostics only.

use std::fmt;

use crate::outcome::{Outcome, Severity, ValidationDetails};

/// Structural integrity error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityErrorCode {
    /// Zero-length buffer
    EmptyBuffer,
    /// Buffer larger than the configured maximum
    Oversized,
    /// Buffer shorter than a length it declares
    Truncated,
    /// Bad magic, version or flags
    BadHeader,
    /// Declared section lengths disagree with each other or with the buffer
    LengthMismatch,
    /// CRC32 trailer does not match
    ChecksumMismatch,
    /// Directory declares more entries than allowed
    TooManyFields,
    /// Directory entry malformed or pointing outside the data region
    BadEntry,
    /// Two entries reference overlapping bytes
    Overlap,
    /// Data region bytes not referenced by any entry
    Slack,
    /// Field name appears twice
    DuplicateField,
    /// Value bytes malformed for their type tag
    MalformedValue,
}

impl IntegrityErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IntegrityErrorCode::EmptyBuffer => "PDS_STRUCT_EMPTY",
            IntegrityErrorCode::Oversized => "PDS_STRUCT_OVERSIZED",
            IntegrityErrorCode::Truncated => "PDS_STRUCT_TRUNCATED",
            IntegrityErrorCode::BadHeader => "PDS_STRUCT_BAD_HEADER",
            IntegrityErrorCode::LengthMismatch => "PDS_STRUCT_LENGTH_MISMATCH",
            IntegrityErrorCode::ChecksumMismatch => "PDS_STRUCT_CHECKSUM_MISMATCH",
            IntegrityErrorCode::TooManyFields => "PDS_STRUCT_TOO_MANY_FIELDS",
            IntegrityErrorCode::BadEntry => "PDS_STRUCT_BAD_ENTRY",
            IntegrityErrorCode::Overlap => "PDS_STRUCT_OVERLAP",
            IntegrityErrorCode::Slack => "PDS_STRUCT_SLACK",
            IntegrityErrorCode::DuplicateField => "PDS_STRUCT_DUPLICATE_FIELD",
            IntegrityErrorCode::MalformedValue => "PDS_STRUCT_MALFORMED_VALUE",
        }
    }
}

impl fmt::Display for IntegrityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structural integrity failure with location details
#[derive(Debug, Clone)]
pub struct IntegrityError {
    code: IntegrityErrorCode,
    message: String,
    details: ValidationDetails,
}

impl IntegrityError {
    pub fn new(
        code: IntegrityErrorCode,
        location: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::new(location, expected, actual);
        Self {
            code,
            message: format!("Corrupted artifact: {}", details),
            details,
        }
    }

    pub fn empty_buffer() -> Self {
        Self::new(IntegrityErrorCode::EmptyBuffer, "buffer", "non-empty buffer", "0 bytes")
    }

    pub fn oversized(len: usize, max: usize) -> Self {
        Self::new(
            IntegrityErrorCode::Oversized,
            "buffer",
            format!("at most {} bytes", max),
            format!("{} bytes", len),
        )
    }

    pub fn truncated(location: impl Into<String>, declared: usize, available: usize) -> Self {
        Self::new(
            IntegrityErrorCode::Truncated,
            location,
            format!("{} bytes", declared),
            format!("{} bytes available", available),
        )
    }

    pub fn bad_header(location: &str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(IntegrityErrorCode::BadHeader, location, expected, actual)
    }

    pub fn length_mismatch(location: &str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(IntegrityErrorCode::LengthMismatch, location, expected, actual)
    }

    pub fn checksum_mismatch(computed: u32, stored: u32) -> Self {
        Self::new(
            IntegrityErrorCode::ChecksumMismatch,
            "trailer.checksum",
            format!("{:08x}", computed),
            format!("{:08x}", stored),
        )
    }

    pub fn too_many_fields(count: usize, max: usize) -> Self {
        Self::new(
            IntegrityErrorCode::TooManyFields,
            "header.entry_count",
            format!("at most {} entries", max),
            count.to_string(),
        )
    }

    pub fn bad_entry(index: usize, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(
            IntegrityErrorCode::BadEntry,
            format!("directory[{}]", index),
            expected,
            actual,
        )
    }

    pub fn overlap(first: usize, second: usize) -> Self {
        Self::new(
            IntegrityErrorCode::Overlap,
            format!("directory[{}]", second),
            "disjoint byte ranges",
            format!("range overlaps directory[{}]", first),
        )
    }

    pub fn slack(referenced: usize, data_len: usize) -> Self {
        Self::new(
            IntegrityErrorCode::Slack,
            "data",
            format!("{} referenced bytes", data_len),
            format!("{} referenced bytes", referenced),
        )
    }

    pub fn duplicate_field(name: &str) -> Self {
        Self::new(
            IntegrityErrorCode::DuplicateField,
            name,
            "unique field name",
            "duplicate entry",
        )
    }

    pub fn malformed_value(field: &str, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(IntegrityErrorCode::MalformedValue, field, expected, actual)
    }

    /// Returns the error code
    pub fn code(&self) -> IntegrityErrorCode {
        self.code
    }

    /// Always `Outcome::CorruptedStruct`
    pub fn outcome(&self) -> Outcome {
        Outcome::CorruptedStruct
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the failure location details
    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", Severity::Reject, self.code.code(), self.message)
    }
}

impl std::error::Error for IntegrityError {}

/// Result type for integrity checks
pub type IntegrityResult<T> = Result<T, IntegrityError>;
