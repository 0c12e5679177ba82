//! CLI argument definitions using clap
//!
//! Commands:
//! - pdsgate validate --schema-dir <dir> --schema <id> --artifact <file> [--config <file>]
//! - pdsgate pack --input <doc.json> --output <file> [--checksum]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pdsgate - schema gatekeeper for staged artifacts
#[derive(Parser, Debug)]
#[command(name = "pdsgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate an artifact against a schema and exit with its outcome code
    Validate {
        /// Directory holding `<id>.json` schema documents
        #[arg(long)]
        schema_dir: PathBuf,

        /// Schema identifier
        #[arg(long)]
        schema: String,

        /// Artifact file to validate
        #[arg(long)]
        artifact: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Encode a flat JSON object into an artifact
    Pack {
        /// JSON document with one key per field
        #[arg(long)]
        input: PathBuf,

        /// Artifact file to write
        #[arg(long)]
        output: PathBuf,

        /// Append a CRC32 trailer
        #[arg(long)]
        checksum: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
