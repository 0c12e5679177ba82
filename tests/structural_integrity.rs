//! Structural Integrity Tests
//!
//! Every corruption class is rejected as PDS_CORRUPTED_STRUCT before any
//! later stage is entered:
//! - Length bounds and header fields
//! - Declared lengths vs. actual buffer
//! - Checksum trailer
//! - Directory entries, overlap, slack, duplicates
//! - Malformed value payloads

use std::sync::Arc;

use pdsgate::artifact::{ArtifactBuilder, FieldValue, IntegrityErrorCode, TypeTag, ENTRY_LEN, HEADER_LEN};
use pdsgate::engine::{Stage, StageRecorder};
use pdsgate::{GateConfig, IntegrityChecker, MemorySource, Outcome, ValidationEngine};

// =============================================================================
// Helper Functions
// =============================================================================

const SCHEMA: &str = r#"{
    "schema_id": "reading", "schema_version": "1", "closed": false,
    "fields": [ { "name": "count", "type": "int" } ]
}"#;

fn engine_with(config: GateConfig) -> (ValidationEngine, Arc<StageRecorder>) {
    let recorder = Arc::new(StageRecorder::new());
    let source = MemorySource::new().with("reading", SCHEMA);
    let engine = ValidationEngine::new(&config, Arc::new(source)).with_observer(recorder.clone());
    (engine, recorder)
}

/// Asserts `raw` is rejected as corrupt and nothing after the structure
/// stage ran.
fn assert_corrupt(raw: &[u8]) {
    assert_corrupt_with(GateConfig::default(), raw);
}

fn assert_corrupt_with(config: GateConfig, raw: &[u8]) {
    let (engine, recorder) = engine_with(config);
    assert_eq!(engine.validate("reading", raw), Outcome::CorruptedStruct);
    assert_eq!(recorder.stages(), vec![Stage::Structure]);
}

fn code_of(raw: &[u8]) -> IntegrityErrorCode {
    IntegrityChecker::from_config(&GateConfig::default())
        .check(raw)
        .unwrap_err()
        .code()
}

/// Single int field "count": data region is "count" followed by 8 value bytes.
fn single_int() -> Vec<u8> {
    ArtifactBuilder::new().int("count", 7).build().unwrap()
}

fn two_ints() -> Vec<u8> {
    ArtifactBuilder::new().int("a", 1).int("b", 2).build().unwrap()
}

fn entry_at(index: usize) -> usize {
    HEADER_LEN + index * ENTRY_LEN
}

fn data_start(entries: usize) -> usize {
    HEADER_LEN + entries * ENTRY_LEN
}

fn put_u32(raw: &mut [u8], at: usize, value: u32) {
    raw[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

// =============================================================================
// Baseline
// =============================================================================

#[test]
fn test_well_formed_artifact_passes_structure() {
    let (engine, recorder) = engine_with(GateConfig::default());
    assert_eq!(engine.validate("reading", &single_int()), Outcome::Success);
    assert!(recorder.entered(Stage::Dependencies));
}

// =============================================================================
// Length Bounds and Header
// =============================================================================

#[test]
fn test_empty_buffer() {
    assert_corrupt(&[]);
    assert_eq!(code_of(&[]), IntegrityErrorCode::EmptyBuffer);
}

#[test]
fn test_oversized_buffer() {
    let raw = single_int();
    let config = GateConfig {
        max_artifact_bytes: raw.len() - 1,
        ..GateConfig::default()
    };
    assert_corrupt_with(config, &raw);
}

#[test]
fn test_shorter_than_header() {
    let raw = single_int();
    assert_corrupt(&raw[..10]);
    assert_eq!(code_of(&raw[..10]), IntegrityErrorCode::Truncated);
}

#[test]
fn test_bad_magic() {
    let mut raw = single_int();
    raw[0] = b'X';
    assert_corrupt(&raw);
    assert_eq!(code_of(&raw), IntegrityErrorCode::BadHeader);
}

#[test]
fn test_unsupported_version() {
    let mut raw = single_int();
    raw[4] = 2;
    assert_corrupt(&raw);
}

#[test]
fn test_unknown_flag_bits() {
    let mut raw = single_int();
    raw[5] = 0x02;
    assert_corrupt(&raw);
}

// =============================================================================
// Declared Lengths
// =============================================================================

#[test]
fn test_truncated_buffer() {
    let raw = single_int();
    let truncated = &raw[..raw.len() - 1];
    assert_corrupt(truncated);
    assert_eq!(code_of(truncated), IntegrityErrorCode::Truncated);
}

#[test]
fn test_trailing_bytes() {
    let mut raw = single_int();
    raw.push(0);
    assert_corrupt(&raw);
    assert_eq!(code_of(&raw), IntegrityErrorCode::LengthMismatch);
}

#[test]
fn test_data_len_disagrees_with_total() {
    let mut raw = single_int();
    let data_len = u32::from_le_bytes([raw[12], raw[13], raw[14], raw[15]]);
    put_u32(&mut raw, 12, data_len + 1);
    assert_corrupt(&raw);

    put_u32(&mut raw, 12, data_len - 1);
    assert_corrupt(&raw);
}

#[test]
fn test_length_arithmetic_overflow() {
    let mut raw = single_int();
    put_u32(&mut raw, 12, u32::MAX);
    assert_corrupt(&raw);
}

#[test]
fn test_too_many_fields() {
    let raw = two_ints();
    let config = GateConfig {
        max_fields: 1,
        ..GateConfig::default()
    };
    assert_corrupt_with(config, &raw);
}

// =============================================================================
// Checksum
// =============================================================================

#[test]
fn test_checksum_mismatch() {
    let mut raw = ArtifactBuilder::new()
        .with_checksum()
        .int("count", 7)
        .build()
        .unwrap();
    let (engine, _) = engine_with(GateConfig::default());
    assert_eq!(engine.validate("reading", &raw), Outcome::Success);

    let last_value_byte = raw.len() - 5;
    raw[last_value_byte] ^= 0xFF;
    assert_corrupt(&raw);
    assert_eq!(code_of(&raw), IntegrityErrorCode::ChecksumMismatch);
}

#[test]
fn test_corrupted_trailer() {
    let mut raw = ArtifactBuilder::new()
        .with_checksum()
        .int("count", 7)
        .build()
        .unwrap();
    let last = raw.len() - 1;
    raw[last] ^= 0x01;
    assert_corrupt(&raw);
}

// =============================================================================
// Directory Entries
// =============================================================================

#[test]
fn test_reserved_byte_nonzero() {
    let mut raw = single_int();
    raw[entry_at(0) + 7] = 1;
    assert_corrupt(&raw);
    assert_eq!(code_of(&raw), IntegrityErrorCode::BadEntry);
}

#[test]
fn test_unknown_type_tag() {
    let mut raw = single_int();
    raw[entry_at(0) + 6] = 0x09;
    assert_corrupt(&raw);
}

#[test]
fn test_empty_name() {
    let mut raw = single_int();
    raw[entry_at(0) + 4] = 0;
    raw[entry_at(0) + 5] = 0;
    assert_corrupt(&raw);
}

#[test]
fn test_value_outside_data_region() {
    let mut raw = single_int();
    put_u32(&mut raw, entry_at(0) + 8, 0xFFFF);
    assert_corrupt(&raw);

    let mut raw = single_int();
    put_u32(&mut raw, entry_at(0) + 12, u32::MAX);
    assert_corrupt(&raw);
}

#[test]
fn test_name_not_utf8() {
    let mut raw = single_int();
    raw[data_start(1)] = 0xFF;
    assert_corrupt(&raw);
}

#[test]
fn test_aliased_value_offsets() {
    let mut raw = two_ints();
    let first_value = u32::from_le_bytes(raw[entry_at(0) + 8..entry_at(0) + 12].try_into().unwrap());
    put_u32(&mut raw, entry_at(1) + 8, first_value);
    assert_corrupt(&raw);
}

#[test]
fn test_name_overlapping_value() {
    let mut raw = single_int();
    // Point the value at the name bytes.
    put_u32(&mut raw, entry_at(0) + 8, 0);
    assert_corrupt(&raw);
}

#[test]
fn test_duplicate_field_names() {
    let raw = ArtifactBuilder::new().int("count", 1).int("count", 2).build().unwrap();
    assert_corrupt(&raw);
    assert_eq!(code_of(&raw), IntegrityErrorCode::DuplicateField);
}

// =============================================================================
// Value Payloads
// =============================================================================

#[test]
fn test_bool_not_zero_or_one() {
    let mut raw = ArtifactBuilder::new().bool("ok", true).build().unwrap();
    let value_at = data_start(1) + 2;
    raw[value_at] = 2;
    assert_corrupt(&raw);
    assert_eq!(code_of(&raw), IntegrityErrorCode::MalformedValue);
}

#[test]
fn test_non_finite_float() {
    let mut raw = ArtifactBuilder::new().float("r", 1.0).build().unwrap();
    let value_at = data_start(1) + 1;
    raw[value_at..value_at + 8].copy_from_slice(&f64::NAN.to_le_bytes());
    assert_corrupt(&raw);
}

#[test]
fn test_invalid_utf8_string() {
    let mut raw = ArtifactBuilder::new().string("s", "ab").build().unwrap();
    raw[data_start(1) + 1] = 0xC3;
    raw[data_start(1) + 2] = 0x28;
    assert_corrupt(&raw);
}

#[test]
fn test_int_with_wrong_width() {
    let mut raw = ArtifactBuilder::new().bytes("b", vec![0u8; 4]).build().unwrap();
    raw[entry_at(0) + 6] = TypeTag::Int.as_u8();
    assert_corrupt(&raw);
}

#[test]
fn test_nested_array_tag() {
    let mut raw = ArtifactBuilder::new()
        .array("xs", TypeTag::Int, vec![FieldValue::Int(1)])
        .build()
        .unwrap();
    // Element tag byte follows the two-byte name.
    raw[data_start(1) + 2] = TypeTag::Array.as_u8();
    assert_corrupt(&raw);
}

#[test]
fn test_truncated_array_item() {
    let mut raw = ArtifactBuilder::new()
        .array("xs", TypeTag::Int, vec![FieldValue::Int(1)])
        .build()
        .unwrap();
    // Item length prefix claims more bytes than the value holds.
    put_u32(&mut raw, data_start(1) + 3, 9);
    assert_corrupt(&raw);
}

#[test]
fn test_corruption_wins_over_missing_schema() {
    let (engine, recorder) = engine_with(GateConfig::default());
    assert_eq!(engine.validate("no-such-schema", b"junk"), Outcome::CorruptedStruct);
    assert!(!recorder.entered(Stage::Schema));
}
