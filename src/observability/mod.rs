//! Observability for pdsgate callers
//!
//! Structured JSON logging of typed events. The validation engine itself
//! never logs; the command-line front end reports through this module.
//!
//! # Usage
//!
//! ```ignore
//! use pdsgate::observability::{log_event, Event};
//!
//! log_event(Event::ValidationAccepted, &[("schema", "sensor-reading")]);
//! ```

use std::io::{self, Write};

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    write_event(event, fields, &mut io::stderr());
}

fn write_event<W: Write>(event: Event, fields: &[(&str, &str)], writer: &mut W) {
    Logger::log_to_writer(event.severity(), event.as_str(), fields, writer);
}
