//! Schema sources
//!
//! A source turns an already resolved identifier into raw schema bytes. It
//! knows nothing about the schema format.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

use super::id::SchemaId;

/// Failure to fetch a schema document
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no schema named '{0}'")]
    NotFound(String),

    #[error("failed to read schema '{id}': {source}")]
    Unreadable {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("schema '{id}' is at least {size} bytes, maximum is {limit}")]
    TooLarge { id: String, size: usize, limit: usize },
}

/// Where schema documents come from.
pub trait SchemaSource: Send + Sync {
    /// Returns the document for `id`.
    ///
    /// Sources backed by storage must not read more than `max_bytes + 1`
    /// bytes; anything longer than `max_bytes` is rejected by the caller.
    fn fetch(&self, id: &SchemaId, max_bytes: usize) -> Result<Vec<u8>, SourceError>;
}

/// Maps `<id>` to `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for `id`, or `None` when the identifier would leave the root.
    fn path_for(&self, id: &SchemaId) -> Option<PathBuf> {
        let raw = id.as_str();
        if raw.contains(['/', '\\', '\0']) || raw.contains("..") {
            return None;
        }
        Some(self.root.join(format!("{}.json", raw)))
    }
}

impl SchemaSource for DirectorySource {
    fn fetch(&self, id: &SchemaId, max_bytes: usize) -> Result<Vec<u8>, SourceError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(id.to_string()));
            }
            Err(e) => {
                return Err(SourceError::Unreadable {
                    id: id.to_string(),
                    source: e,
                });
            }
        };

        let unreadable = |e: io::Error| SourceError::Unreadable {
            id: id.to_string(),
            source: e,
        };
        let too_large = |size: usize| SourceError::TooLarge {
            id: id.to_string(),
            size,
            limit: max_bytes,
        };

        let declared = file.metadata().map_err(unreadable)?.len();
        if declared > u64::try_from(max_bytes).unwrap_or(u64::MAX) {
            return Err(too_large(usize::try_from(declared).unwrap_or(usize::MAX)));
        }

        // The file may grow between stat and read.
        let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
        let mut bytes = Vec::new();
        file.take(limit)
            .read_to_end(&mut bytes)
            .map_err(unreadable)?;
        if bytes.len() > max_bytes {
            return Err(too_large(bytes.len()));
        }
        Ok(bytes)
    }
}

/// In-memory identifier → document map.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a document.
    pub fn insert(&self, id: impl Into<String>, document: impl Into<Vec<u8>>) {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents.insert(id.into(), document.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(self, id: impl Into<String>, document: impl Into<Vec<u8>>) -> Self {
        self.insert(id, document);
        self
    }
}

impl SchemaSource for MemorySource {
    /// Documents are already in memory; the size bound is left to the caller.
    fn fetch(&self, id: &SchemaId, _max_bytes: usize) -> Result<Vec<u8>, SourceError> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}
