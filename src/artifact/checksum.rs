//! CRC32 trailer for PDSA artifacts
//!
//! CRC32 (IEEE polynomial) over every byte preceding the trailer.

use crc32fast::Hasher;

/// Computes the CRC32 of `data`.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that `data` hashes to `expected`.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}
