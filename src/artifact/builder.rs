//! PDSA artifact encoder
//!
//! Produces well-formed artifacts: names and values are laid out back to back
//! in the data region, in insertion order, so the integrity checker sees a
//! fully covered, non-overlapping region.

use super::checksum::compute_checksum;
use super::errors::{IntegrityError, IntegrityErrorCode, IntegrityResult};
use super::format::{
    DirectoryEntry, Header, TypeTag, CHECKSUM_LEN, ENTRY_LEN, FLAG_CHECKSUM, FORMAT_VERSION,
    HEADER_LEN,
};

/// Owned value to encode.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    /// Element tag plus scalar items of that tag
    Array(TypeTag, Vec<FieldValue>),
}

impl FieldValue {
    pub fn tag(&self) -> TypeTag {
        match self {
            FieldValue::Int(_) => TypeTag::Int,
            FieldValue::Float(_) => TypeTag::Float,
            FieldValue::Bool(_) => TypeTag::Bool,
            FieldValue::String(_) => TypeTag::String,
            FieldValue::Bytes(_) => TypeTag::Bytes,
            FieldValue::Array(..) => TypeTag::Array,
        }
    }

    /// Appends the value payload (no length prefix) to `out`.
    fn encode(&self, name: &str, out: &mut Vec<u8>) -> IntegrityResult<()> {
        match self {
            FieldValue::Int(v) => out.extend_from_slice(&v.to_le_bytes()),
            FieldValue::Float(v) => {
                if !v.is_finite() {
                    return Err(IntegrityError::malformed_value(name, "finite float", v.to_string()));
                }
                out.extend_from_slice(&v.to_le_bytes());
            }
            FieldValue::Bool(v) => out.push(u8::from(*v)),
            FieldValue::String(s) => out.extend_from_slice(s.as_bytes()),
            FieldValue::Bytes(b) => out.extend_from_slice(b),
            FieldValue::Array(element, items) => {
                if !element.is_scalar() {
                    return Err(IntegrityError::malformed_value(name, "scalar element type", "array"));
                }
                out.push(element.as_u8());
                for item in items {
                    if item.tag() != *element {
                        return Err(IntegrityError::malformed_value(
                            name,
                            format!("{} items", element),
                            item.tag().name(),
                        ));
                    }
                    let mut payload = Vec::new();
                    item.encode(name, &mut payload)?;
                    out.extend_from_slice(&to_u32(payload.len(), name)?.to_le_bytes());
                    out.extend_from_slice(&payload);
                }
            }
        }
        Ok(())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        FieldValue::Bytes(v)
    }
}

/// Incremental artifact encoder.
#[derive(Debug, Clone, Default)]
pub struct ArtifactBuilder {
    fields: Vec<(String, FieldValue)>,
    checksum: bool,
}

impl ArtifactBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a CRC32 trailer on build.
    pub fn with_checksum(mut self) -> Self {
        self.checksum = true;
        self
    }

    /// Adds a field. Duplicate names are encoded as given.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn int(self, name: impl Into<String>, value: i64) -> Self {
        self.field(name, FieldValue::Int(value))
    }

    pub fn float(self, name: impl Into<String>, value: f64) -> Self {
        self.field(name, FieldValue::Float(value))
    }

    pub fn bool(self, name: impl Into<String>, value: bool) -> Self {
        self.field(name, FieldValue::Bool(value))
    }

    pub fn string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, FieldValue::String(value.into()))
    }

    pub fn bytes(self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.field(name, FieldValue::Bytes(value.into()))
    }

    pub fn array(self, name: impl Into<String>, element: TypeTag, items: Vec<FieldValue>) -> Self {
        self.field(name, FieldValue::Array(element, items))
    }

    /// Number of fields added so far.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encodes the artifact.
    pub fn build(&self) -> IntegrityResult<Vec<u8>> {
        let entry_count = u16::try_from(self.fields.len())
            .map_err(|_| IntegrityError::too_many_fields(self.fields.len(), usize::from(u16::MAX)))?;

        let mut data = Vec::new();
        let mut directory = Vec::with_capacity(self.fields.len() * ENTRY_LEN);

        for (name, value) in &self.fields {
            let name_offset = to_u32(data.len(), name)?;
            let name_len = u16::try_from(name.len()).map_err(|_| {
                IntegrityError::new(
                    IntegrityErrorCode::BadEntry,
                    name.as_str(),
                    "name shorter than 65536 bytes",
                    format!("{} bytes", name.len()),
                )
            })?;
            data.extend_from_slice(name.as_bytes());

            let value_start = data.len();
            value.encode(name, &mut data)?;

            DirectoryEntry {
                name_offset,
                name_len,
                type_tag: value.tag().as_u8(),
                reserved: 0,
                value_offset: to_u32(value_start, name)?,
                value_len: to_u32(data.len() - value_start, name)?,
            }
            .write(&mut directory);
        }

        let trailer = if self.checksum { CHECKSUM_LEN } else { 0 };
        let total = HEADER_LEN + directory.len() + data.len() + trailer;

        let header = Header {
            version: FORMAT_VERSION,
            flags: if self.checksum { FLAG_CHECKSUM } else { 0 },
            entry_count,
            total_len: to_u32(total, "artifact")?,
            data_len: to_u32(data.len(), "data")?,
        };

        let mut out = Vec::with_capacity(total);
        header.write(&mut out);
        out.extend_from_slice(&directory);
        out.extend_from_slice(&data);

        if self.checksum {
            let crc = compute_checksum(&out);
            out.extend_from_slice(&crc.to_le_bytes());
        }

        Ok(out)
    }
}

fn to_u32(len: usize, location: &str) -> IntegrityResult<u32> {
    u32::try_from(len).map_err(|_| {
        IntegrityError::new(
            IntegrityErrorCode::Oversized,
            location,
            format!("at most {} bytes", u32::MAX),
            format!("{} bytes", len),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::format::{le_u16, le_u32};

    #[test]
    fn test_empty_artifact_layout() {
        let bytes = ArtifactBuilder::new().build().unwrap();
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(le_u16(&bytes, 6), Some(0));
        assert_eq!(le_u32(&bytes, 8), Some(HEADER_LEN as u32));
    }

    #[test]
    fn test_lengths_are_consistent() {
        let bytes = ArtifactBuilder::new()
            .int("count", 7)
            .string("label", "abc")
            .with_checksum()
            .build()
            .unwrap();

        let total = le_u32(&bytes, 8).unwrap() as usize;
        let data_len = le_u32(&bytes, 12).unwrap() as usize;
        assert_eq!(total, bytes.len());
        // names "count" + "label", int 8 bytes, string 3 bytes
        assert_eq!(data_len, 5 + 5 + 8 + 3);
        assert_eq!(total, HEADER_LEN + 2 * ENTRY_LEN + data_len + CHECKSUM_LEN);
    }

    #[test]
    fn test_rejects_non_finite_float() {
        let result = ArtifactBuilder::new().float("x", f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_mixed_array() {
        let result = ArtifactBuilder::new()
            .array("xs", TypeTag::Int, vec![FieldValue::Int(1), FieldValue::Bool(true)])
            .build();
        assert_eq!(result.unwrap_err().code(), IntegrityErrorCode::MalformedValue);
    }

    #[test]
    fn test_rejects_nested_array() {
        let result = ArtifactBuilder::new()
            .array("xs", TypeTag::Array, vec![])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_deterministic_encoding() {
        let builder = ArtifactBuilder::new().int("a", 1).bool("b", true);
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }
}
