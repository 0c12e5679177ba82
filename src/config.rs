//! Gate configuration
//!
//! Loaded from a JSON file. Every option has a default, so an empty object
//! (`{}`) is a valid configuration.
//!
//! ```json
//! {
//!   "max_artifact_bytes": 16777216,
//!   "max_schema_bytes": 1048576,
//!   "max_schema_id_len": 512,
//!   "max_fields": 4096,
//!   "schema_mode": "closed"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling for `max_schema_id_len`.
pub const SCHEMA_ID_LEN_CEILING: usize = 4096;

/// How undeclared artifact fields are treated when a schema does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// Undeclared fields are a type mismatch
    #[default]
    Closed,
    /// Undeclared fields are ignored by every stage
    Open,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Recognized gate options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Largest artifact buffer accepted before any parsing (default 16 MiB)
    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: usize,

    /// Largest schema document accepted (default 1 MiB)
    #[serde(default = "default_max_schema_bytes")]
    pub max_schema_bytes: usize,

    /// Longest schema identifier accepted (default 512)
    #[serde(default = "default_max_schema_id_len")]
    pub max_schema_id_len: usize,

    /// Largest directory entry count accepted (default 4096)
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,

    /// Treatment of undeclared fields (default closed)
    #[serde(default)]
    pub schema_mode: SchemaMode,
}

fn default_max_artifact_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_max_schema_bytes() -> usize {
    1024 * 1024
}
fn default_max_schema_id_len() -> usize {
    512
}
fn default_max_fields() -> usize {
    4096
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_artifact_bytes: default_max_artifact_bytes(),
            max_schema_bytes: default_max_schema_bytes(),
            max_schema_id_len: default_max_schema_id_len(),
            max_fields: default_max_fields(),
            schema_mode: SchemaMode::default(),
        }
    }
}

impl GateConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate configuration from JSON text.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: GateConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Same configuration in open-schema mode.
    pub fn open(mut self) -> Self {
        self.schema_mode = SchemaMode::Open;
        self
    }

    /// Checks every bound is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_artifact_bytes == 0 {
            return Err(ConfigError::Invalid("max_artifact_bytes must be > 0".into()));
        }
        if self.max_schema_bytes == 0 {
            return Err(ConfigError::Invalid("max_schema_bytes must be > 0".into()));
        }
        if self.max_schema_id_len == 0 || self.max_schema_id_len > SCHEMA_ID_LEN_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_schema_id_len must be within 1..={}",
                SCHEMA_ID_LEN_CEILING
            )));
        }
        if self.max_fields == 0 || self.max_fields > usize::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "max_fields must be within 1..={}",
                u16::MAX
            )));
        }
        Ok(())
    }
}
