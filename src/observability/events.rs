//! Observable events
//!
//! Events are explicit and typed. Only the command-line front end emits them.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Schema resolved for an attempt
    SchemaResolved,
    /// Validation attempt started
    ValidationStart,
    /// Artifact accepted
    ValidationAccepted,
    /// Artifact rejected
    ValidationRejected,
    /// Artifact encoded by `pack`
    PackComplete,
    /// Command failed before producing a result
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaResolved => "SCHEMA_RESOLVED",
            Event::ValidationStart => "VALIDATION_START",
            Event::ValidationAccepted => "VALIDATION_ACCEPTED",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::PackComplete => "PACK_COMPLETE",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::ValidationRejected => Severity::Warn,
            Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
