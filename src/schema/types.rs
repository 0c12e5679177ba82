//! Product Definition Schema types
//!
//! Supported field types:
//! - int: 64-bit signed integer
//! - float: 64-bit floating point, finite
//! - bool: Boolean
//! - string: UTF-8 string
//! - bytes: opaque byte string
//! - array: homogeneous array with a scalar element type
//!
//! Fields are an ordered list. Declaration order is the order in which every
//! check visits them.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::TypeTag;

/// Declared field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Int,
    Float,
    Bool,
    String,
    Bytes,
    Array,
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Array => "array",
        }
    }

    /// Wire tag a value of this kind must carry.
    pub fn tag(&self) -> TypeTag {
        match self {
            FieldKind::Int => TypeTag::Int,
            FieldKind::Float => TypeTag::Float,
            FieldKind::Bool => TypeTag::Bool,
            FieldKind::String => TypeTag::String,
            FieldKind::Bytes => TypeTag::Bytes,
            FieldKind::Array => TypeTag::Array,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Int | FieldKind::Float)
    }

    /// Kinds with a length (strings, bytes, arrays).
    pub fn is_sized(&self) -> bool {
        matches!(self, FieldKind::String | FieldKind::Bytes | FieldKind::Array)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Numeric bound; integers stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Exact for int/int, IEEE comparison otherwise.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Literal used by enumerations and conditional rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Whether a value of `kind` could ever equal this literal.
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Literal::Bool(_), FieldKind::Bool)
                | (Literal::Int(_), FieldKind::Int)
                | (Literal::Int(_), FieldKind::Float)
                | (Literal::Float(_), FieldKind::Float)
                | (Literal::String(_), FieldKind::String)
        )
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::String(v) => write!(f, "{:?}", v),
        }
    }
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
}

impl fmt::Display for RangeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.min.map_or("-inf".to_string(), |n| n.to_string());
        let max = self.max.map_or("+inf".to_string(), |n| n.to_string());
        write!(f, "[{}, {}]", min, max)
    }
}

/// Inclusive length bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LengthBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl fmt::Display for LengthBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self.max.map_or("unbounded".to_string(), |n| n.to_string());
        write!(f, "length [{}, {}]", self.min.unwrap_or(0), max)
    }
}

/// Comparison operator for `compare` rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl CompareOp {
    /// Whether `ordering` (owner compared to other) satisfies the operator.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Ge => ">=",
            CompareOp::Gt => ">",
        }
    }
}

/// Cross-field predicate attached to the field that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum DependencyRule {
    /// Owner must be present when `field` is present and equals `equals`
    RequiredIf { field: String, equals: Literal },
    /// When owner is present every listed field must be present
    Requires { fields: Vec<String> },
    /// When owner is present no listed field may be present
    Excludes { fields: Vec<String> },
    /// When both are present, `owner op field` must hold
    Compare { op: CompareOp, field: String },
    /// When both are present, owner length equals the int value of `field`
    CountOf { field: String },
}

impl DependencyRule {
    /// Rule name as written in schema documents.
    pub fn name(&self) -> &'static str {
        match self {
            DependencyRule::RequiredIf { .. } => "required_if",
            DependencyRule::Requires { .. } => "requires",
            DependencyRule::Excludes { .. } => "excludes",
            DependencyRule::Compare { .. } => "compare",
            DependencyRule::CountOf { .. } => "count_of",
        }
    }

    /// Every field name the rule refers to besides its owner.
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            DependencyRule::RequiredIf { field, .. }
            | DependencyRule::Compare { field, .. }
            | DependencyRule::CountOf { field } => vec![field.as_str()],
            DependencyRule::Requires { fields } | DependencyRule::Excludes { fields } => {
                fields.iter().map(String::as_str).collect()
            }
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    /// Field name, unique within the schema
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Element type, arrays only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<FieldKind>,
    /// Whether field must be present
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthBounds>,
    /// Allowed values
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Literal>>,
    /// Regular expression a string value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Cross-field rules owned by this field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<DependencyRule>,
}

impl FieldDef {
    fn with_kind(name: impl Into<String>, kind: FieldKind, required: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            element_type: None,
            required,
            range: None,
            length: None,
            allowed: None,
            pattern: None,
            depends: Vec::new(),
        }
    }

    /// Create a required field
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::with_kind(name, kind, true)
    }

    /// Create an optional field
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::with_kind(name, kind, false)
    }

    /// Create an array field
    pub fn array(name: impl Into<String>, element: FieldKind, required: bool) -> Self {
        let mut def = Self::with_kind(name, FieldKind::Array, required);
        def.element_type = Some(element);
        def
    }

    pub fn with_range(mut self, min: Option<Number>, max: Option<Number>) -> Self {
        self.range = Some(RangeBounds { min, max });
        self
    }

    pub fn with_length(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.length = Some(LengthBounds { min, max });
        self
    }

    pub fn with_enum(mut self, allowed: Vec<Literal>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_rule(mut self, rule: DependencyRule) -> Self {
        self.depends.push(rule);
        self
    }

    /// Human-readable declared type, e.g. `array<string>`.
    pub fn type_label(&self) -> String {
        match (self.kind, self.element_type) {
            (FieldKind::Array, Some(element)) => format!("array<{}>", element),
            (kind, _) => kind.type_name().to_string(),
        }
    }

    /// Type and constraint rules local to this field.
    fn validate_local(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("field name must not be empty".into());
        }

        match (self.kind, self.element_type) {
            (FieldKind::Array, None) => {
                return Err(format!("array field '{}' needs an element_type", self.name));
            }
            (FieldKind::Array, Some(FieldKind::Array)) => {
                return Err(format!("array field '{}' cannot nest arrays", self.name));
            }
            (FieldKind::Array, Some(_)) => {}
            (_, Some(_)) => {
                return Err(format!("element_type is only valid on arrays ('{}')", self.name));
            }
            (_, None) => {}
        }

        if let Some(range) = &self.range {
            if !self.kind.is_numeric() {
                return Err(format!("range on non-numeric field '{}'", self.name));
            }
            for bound in [range.min, range.max].into_iter().flatten() {
                if let Number::Float(v) = bound {
                    if !v.is_finite() {
                        return Err(format!("non-finite range bound on '{}'", self.name));
                    }
                }
            }
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min.compare(max) == Some(Ordering::Greater) {
                    return Err(format!("range min > max on '{}'", self.name));
                }
            }
        }

        if let Some(length) = &self.length {
            if !self.kind.is_sized() {
                return Err(format!("length on unsized field '{}'", self.name));
            }
            if let (Some(min), Some(max)) = (length.min, length.max) {
                if min > max {
                    return Err(format!("length min > max on '{}'", self.name));
                }
            }
        }

        if let Some(allowed) = &self.allowed {
            if !matches!(self.kind, FieldKind::Int | FieldKind::String) {
                return Err(format!("enum on field '{}' of type {}", self.name, self.kind));
            }
            if allowed.is_empty() {
                return Err(format!("empty enum on '{}'", self.name));
            }
            let exact = allowed.iter().all(|lit| {
                matches!(
                    (lit, self.kind),
                    (Literal::Int(_), FieldKind::Int) | (Literal::String(_), FieldKind::String)
                )
            });
            if !exact {
                return Err(format!("enum literal type differs from '{}'", self.name));
            }
        }

        if self.pattern.is_some() && self.kind != FieldKind::String {
            return Err(format!("pattern on non-string field '{}'", self.name));
        }

        Ok(())
    }
}

/// Complete schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Schema name
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Overrides the configured schema mode when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    /// Field definitions, in check order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: Vec<FieldDef>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            closed: None,
            fields,
        }
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = Some(closed);
        self
    }

    /// Looks up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the schema structure itself (not an artifact)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.schema_id.is_empty() {
            return Err("schema_id must not be empty".into());
        }
        if self.schema_version.is_empty() {
            return Err("schema_version must not be empty".into());
        }
        if self.fields.is_empty() {
            return Err("schema must declare at least one field".into());
        }

        let mut names = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            field.validate_local()?;
            if !names.insert(field.name.as_str()) {
                return Err(format!("duplicate field '{}'", field.name));
            }
        }

        for field in &self.fields {
            for rule in &field.depends {
                self.validate_rule(field, rule)?;
            }
        }

        Ok(())
    }

    fn validate_rule(&self, owner: &FieldDef, rule: &DependencyRule) -> Result<(), String> {
        let referenced = rule.referenced_fields();
        if referenced.is_empty() {
            return Err(format!("{} rule on '{}' lists no fields", rule.name(), owner.name));
        }

        for name in &referenced {
            if *name == owner.name {
                return Err(format!("{} rule on '{}' refers to itself", rule.name(), owner.name));
            }
            if self.field(name).is_none() {
                return Err(format!(
                    "{} rule on '{}' refers to undeclared field '{}'",
                    rule.name(),
                    owner.name,
                    name
                ));
            }
        }

        match rule {
            DependencyRule::RequiredIf { field, equals } => {
                let other = self.field(field).map(|f| f.kind);
                if !other.is_some_and(|kind| equals.fits(kind)) {
                    return Err(format!(
                        "required_if on '{}' compares '{}' with incompatible literal {}",
                        owner.name, field, equals
                    ));
                }
            }
            DependencyRule::Compare { field, .. } => {
                let other = self.field(field).map(|f| f.kind);
                let comparable = match other {
                    Some(kind) if kind.is_numeric() => owner.kind.is_numeric(),
                    Some(FieldKind::String) => owner.kind == FieldKind::String,
                    _ => false,
                };
                if !comparable {
                    return Err(format!(
                        "compare on '{}' against '{}' needs two numbers or two strings",
                        owner.name, field
                    ));
                }
            }
            DependencyRule::CountOf { field } => {
                if !owner.kind.is_sized() {
                    return Err(format!("count_of on unsized field '{}'", owner.name));
                }
                if self.field(field).map(|f| f.kind) != Some(FieldKind::Int) {
                    return Err(format!("count_of on '{}' needs int field '{}'", owner.name, field));
                }
            }
            DependencyRule::Requires { .. } | DependencyRule::Excludes { .. } => {}
        }

        Ok(())
    }
}
