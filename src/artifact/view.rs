//! Decoded, read-only projection of a verified artifact buffer
//!
//! An `ArtifactView` can only be built by the integrity checker, so holding one
//! proves the buffer passed every structural check. Values borrow from the
//! raw buffer; nothing is copied except scalars.

use std::collections::HashMap;

use super::format::TypeTag;

/// Typed value decoded from the data region.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(&'a str),
    Bytes(&'a [u8]),
    Array(ArrayValue<'a>),
}

/// Homogeneous array of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue<'a> {
    element: TypeTag,
    items: Vec<Value<'a>>,
}

impl<'a> ArrayValue<'a> {
    pub(crate) fn new(element: TypeTag, items: Vec<Value<'a>>) -> Self {
        Self { element, items }
    }

    /// Declared element tag (meaningful even when empty).
    pub fn element(&self) -> TypeTag {
        self.element
    }

    pub fn items(&self) -> &[Value<'a>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> Value<'a> {
    /// Runtime type tag.
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::String,
            Value::Bytes(_) => TypeTag::Bytes,
            Value::Array(_) => TypeTag::Array,
        }
    }

    /// Type name for error messages, including the element type of arrays.
    pub fn type_name(&self) -> String {
        match self {
            Value::Array(array) => format!("array<{}>", array.element()),
            other => other.tag().name().to_string(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Length for sized values: Unicode scalar count for strings, byte count
    /// for bytes, item count for arrays.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::Array(a) => Some(a.len()),
            _ => None,
        }
    }

    /// Short rendering for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Str(s) => format!("{:?}", s),
            Value::Bytes(b) => format!("{} bytes", b.len()),
            Value::Array(a) => format!("{} items", a.len()),
        }
    }
}

/// Field name → typed value lookup over one verified buffer.
#[derive(Debug, Clone)]
pub struct ArtifactView<'a> {
    entries: Vec<(&'a str, Value<'a>)>,
    index: HashMap<&'a str, usize>,
    checksummed: bool,
}

impl<'a> ArtifactView<'a> {
    /// Builds a view from entries whose names are already known unique.
    pub(crate) fn from_entries(entries: Vec<(&'a str, Value<'a>)>, checksummed: bool) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (*name, i))
            .collect();
        Self {
            entries,
            index,
            checksummed,
        }
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in directory order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &Value<'a>)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the artifact carried a verified checksum trailer.
    pub fn is_checksummed(&self) -> bool {
        self.checksummed
    }
}
