//! Schema resolution
//!
//! identifier → source bytes → JSON document → compiled model. Every failure
//! along the way is a `SchemaError`, which the engine reports as
//! `SchemaNotFound`.

use std::sync::Arc;

use crate::config::GateConfig;

use super::cache::SchemaCache;
use super::errors::{SchemaError, SchemaResult};
use super::id::SchemaId;
use super::model::SchemaModel;
use super::source::{SchemaSource, SourceError};
use super::types::Schema;

pub struct SchemaResolver {
    source: Arc<dyn SchemaSource>,
    cache: Option<Arc<SchemaCache>>,
    max_schema_bytes: usize,
    max_schema_id_len: usize,
}

impl SchemaResolver {
    pub fn new(source: Arc<dyn SchemaSource>, config: &GateConfig) -> Self {
        Self {
            source,
            cache: None,
            max_schema_bytes: config.max_schema_bytes,
            max_schema_id_len: config.max_schema_id_len,
        }
    }

    /// Shares `cache` between this resolver and any other holder of the handle.
    pub fn with_cache(mut self, cache: Arc<SchemaCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<SchemaCache>> {
        self.cache.as_ref()
    }

    /// Resolves `raw_id` to a compiled model.
    pub fn resolve(&self, raw_id: &str) -> SchemaResult<Arc<SchemaModel>> {
        let id = SchemaId::parse(raw_id, self.max_schema_id_len)?;
        match &self.cache {
            Some(cache) => cache.get_or_load(id.as_str(), || self.load(&id)),
            None => self.load(&id).map(Arc::new),
        }
    }

    fn load(&self, id: &SchemaId) -> SchemaResult<SchemaModel> {
        let bytes = self
            .source
            .fetch(id, self.max_schema_bytes)
            .map_err(|e| match e {
                SourceError::NotFound(_) => SchemaError::unknown_schema(id.as_str()),
                SourceError::Unreadable { source, .. } => {
                    SchemaError::unreadable(id.as_str(), source.to_string())
                }
                SourceError::TooLarge { size, limit, .. } => {
                    SchemaError::too_large(id.as_str(), size, limit)
                }
            })?;

        if bytes.len() > self.max_schema_bytes {
            return Err(SchemaError::too_large(
                id.as_str(),
                bytes.len(),
                self.max_schema_bytes,
            ));
        }

        let schema: Schema = serde_json::from_slice(&bytes)
            .map_err(|e| SchemaError::malformed(id.as_str(), e.to_string()))?;

        SchemaModel::compile(schema)
    }
}
