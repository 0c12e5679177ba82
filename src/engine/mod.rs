//! Validation engine for pdsgate
//!
//! Sequences the structural integrity check, schema resolution and the three
//! semantic checks, and maps the first failure to an `Outcome`.
//!
//! # Design Principles
//!
//! - Fail fast: one failure, one outcome
//! - No partial acceptance, no repair
//! - No side effects besides the schema fetch
//! - The engine never logs; callers do

mod context;
mod observer;
mod orchestrator;

pub use context::{Failure, State, ValidationContext, Verdict};
pub use observer::{NoopObserver, Stage, StageObserver, StageRecorder};
pub use orchestrator::ValidationEngine;
