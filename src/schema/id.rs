//! Validated-length schema identifiers

use std::fmt;

use super::errors::{SchemaError, SchemaResult};

/// Schema identifier (an already resolved path or name) whose length was
/// checked against the configured maximum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(String);

impl SchemaId {
    /// Validates `raw` against `max_len` bytes.
    pub fn parse(raw: &str, max_len: usize) -> SchemaResult<Self> {
        if raw.is_empty() {
            return Err(SchemaError::invalid_identifier("empty identifier"));
        }
        if raw.len() > max_len {
            return Err(SchemaError::invalid_identifier(format!(
                "{} bytes exceeds maximum of {}",
                raw.len(),
                max_len
            )));
        }
        if raw.chars().any(char::is_control) {
            return Err(SchemaError::invalid_identifier("control characters"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SchemaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    #[test]
    fn test_accepts_within_bound() {
        let id = SchemaId::parse("sensor-reading.v1", 32).unwrap();
        assert_eq!(id.as_str(), "sensor-reading.v1");
    }

    #[test]
    fn test_length_bound_is_inclusive() {
        assert!(SchemaId::parse("abcd", 4).is_ok());
        let err = SchemaId::parse("abcde", 4).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_rejects_empty_and_control() {
        assert!(SchemaId::parse("", 8).is_err());
        assert!(SchemaId::parse("ab\0c", 8).is_err());
        assert!(SchemaId::parse("ab\nc", 8).is_err());
    }
}
