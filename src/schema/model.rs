//! Compiled, immutable schema model
//!
//! A `SchemaModel` is a `Schema` that passed structural validation, with its
//! string patterns compiled and a name index built. Models are shared between
//! attempts through `Arc` and never mutated.

use std::collections::HashMap;

use regex::Regex;

use crate::config::SchemaMode;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, Schema};

#[derive(Debug)]
pub struct SchemaModel {
    schema: Schema,
    index: HashMap<String, usize>,
    /// Compiled pattern per field position, `None` when the field has none
    patterns: Vec<Option<Regex>>,
}

impl SchemaModel {
    /// Validates and compiles a parsed schema document.
    pub fn compile(schema: Schema) -> SchemaResult<Self> {
        schema
            .validate_structure()
            .map_err(|reason| SchemaError::invalid_structure(schema.schema_id.clone(), reason))?;

        let mut patterns = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let compiled = match &field.pattern {
                Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                    SchemaError::invalid_structure(
                        schema.schema_id.clone(),
                        format!("pattern on '{}' does not compile: {}", field.name, e),
                    )
                })?),
                None => None,
            };
            patterns.push(compiled);
        }

        let index = schema
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        Ok(Self {
            schema,
            index,
            patterns,
        })
    }

    pub fn schema_id(&self) -> &str {
        &self.schema.schema_id
    }

    pub fn version(&self) -> &str {
        &self.schema.schema_version
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.schema.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|&i| &self.schema.fields[i])
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Compiled pattern of the field at `position` in declaration order.
    pub fn pattern(&self, position: usize) -> Option<&Regex> {
        self.patterns.get(position).and_then(Option::as_ref)
    }

    /// The schema's own `closed` flag wins over the configured mode.
    pub fn is_closed(&self, mode: SchemaMode) -> bool {
        self.schema
            .closed
            .unwrap_or(mode == SchemaMode::Closed)
    }
}
