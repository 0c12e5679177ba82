//! CLI-specific error types
//!
//! A CLI error means the command could not produce a verdict at all. It is
//! distinct from a rejected artifact and always exits with code 2.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::IntegrityError;
use crate::config::ConfigError;

/// Exit code for any CLI error.
pub const CLI_ERROR_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot encode artifact: {0}")]
    Encode(#[from] IntegrityError),

    #[error("failed to write result: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Stable string code for logs
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "PDS_CLI_CONFIG",
            CliError::Read { .. } => "PDS_CLI_READ",
            CliError::Write { .. } => "PDS_CLI_WRITE",
            CliError::InvalidInput(_) => "PDS_CLI_INVALID_INPUT",
            CliError::Json(_) => "PDS_CLI_JSON",
            CliError::Encode(_) => "PDS_CLI_ENCODE",
            CliError::Output(_) => "PDS_CLI_OUTPUT",
        }
    }

    pub fn exit_code(&self) -> i32 {
        CLI_ERROR_EXIT_CODE
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_is_two() {
        let err = CliError::InvalidInput("nested object".into());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.code(), "PDS_CLI_INVALID_INPUT");
        assert_eq!(err.to_string(), "invalid input: nested object");
    }

    #[test]
    fn test_read_error_names_path() {
        let err = CliError::read("a.pdsa", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.to_string().contains("a.pdsa"));
    }
}
