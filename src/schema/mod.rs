//! Schema subsystem for pdsgate
//!
//! Product Definition Schemas declare the fields, types, constraints and
//! cross-field rules an artifact class must satisfy. Schemas are loaded from a
//! `SchemaSource`, validated structurally, compiled into an immutable
//! `SchemaModel` and optionally shared through a `SchemaCache`.
//!
//! # Design Principles
//!
//! - A schema that cannot be used is a schema that does not exist
//! - No defaults, no coercion
//! - Compiled models are immutable and shared
//! - Caching is an explicit handle, never global

mod cache;
mod errors;
mod id;
mod model;
mod resolver;
mod source;
mod types;

pub use cache::SchemaCache;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use id::SchemaId;
pub use model::SchemaModel;
pub use resolver::SchemaResolver;
pub use source::{DirectorySource, MemorySource, SchemaSource, SourceError};
pub use types::{
    CompareOp, DependencyRule, FieldDef, FieldKind, LengthBounds, Literal, Number, RangeBounds,
    Schema,
};
