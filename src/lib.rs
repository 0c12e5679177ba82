//! pdsgate - schema gatekeeper for staged artifacts
//!
//! Validates binary artifacts against Product Definition Schemas before they
//! cross a trust boundary. Each attempt yields exactly one [`Outcome`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use pdsgate::{DirectorySource, GateConfig, Outcome, ValidationEngine};
//!
//! let engine = ValidationEngine::new(&GateConfig::default(), Arc::new(DirectorySource::new("schemas")));
//! assert_eq!(engine.validate("sensor-reading", &bytes), Outcome::Success);
//! ```

pub mod artifact;
pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod observability;
pub mod outcome;
pub mod schema;

pub use artifact::{ArtifactBuilder, ArtifactView, FieldValue, IntegrityChecker, IntegrityError};
pub use config::{ConfigError, GateConfig, SchemaMode};
pub use engine::{Stage, StageObserver, ValidationEngine, Verdict};
pub use outcome::{Outcome, ValidationDetails};
pub use schema::{
    DirectorySource, MemorySource, SchemaCache, SchemaError, SchemaModel, SchemaResolver,
    SchemaSource,
};
