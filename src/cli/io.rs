//! File and stdout handling for the CLI

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Reads at most `max + 1` bytes so an oversized file is still rejected by
/// the engine without being loaded whole.
pub fn read_bounded(path: &Path, max: usize) -> CliResult<Vec<u8>> {
    let file = File::open(path).map_err(|e| CliError::read(path, e))?;
    let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);

    let mut bytes = Vec::new();
    file.take(limit)
        .read_to_end(&mut bytes)
        .map_err(|e| CliError::read(path, e))?;
    Ok(bytes)
}

/// Writes `value` as one JSON line to `writer`.
pub fn write_json_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `value` as one JSON line to stdout.
pub fn write_result<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_line(&mut lock, value)
}
