//! CLI module for pdsgate
//!
//! Provides command-line interface for:
//! - validate: Check one artifact file against a schema directory
//! - pack: Encode a flat JSON object as an artifact
//!
//! The CLI is the only part of the crate that logs.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{builder_from_json, pack, run, run_command, validate, ValidationReport};
pub use errors::{CliError, CliResult, CLI_ERROR_EXIT_CODE};
pub use io::{read_bounded, write_json_line, write_result};
