//! Artifact subsystem for pdsgate
//!
//! Staged artifacts arrive as PDSA containers: a fixed header, a directory of
//! typed entries, a data region and an optional CRC32 trailer. Nothing reads a
//! field until the whole container has passed the integrity checker.
//!
//! # Design Principles
//!
//! - Integrity before interpretation
//! - Any ambiguity is corruption
//! - Views borrow the raw buffer, never copy it
//! - Bounds-checked reads only, no panics on hostile input

mod builder;
mod checksum;
mod errors;
mod format;
mod integrity;
mod view;

pub use builder::{ArtifactBuilder, FieldValue};
pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{IntegrityError, IntegrityErrorCode, IntegrityResult};
pub use format::{
    TypeTag, CHECKSUM_LEN, ENTRY_LEN, FLAG_CHECKSUM, FORMAT_VERSION, HEADER_LEN, MAGIC,
};
pub use integrity::IntegrityChecker;
pub use view::{ArrayValue, ArtifactView, Value};
