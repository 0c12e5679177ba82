//! Engine Outcome Tests
//!
//! End-to-end behavior of `ValidationEngine::validate`:
//! - Well-formed artifact + well-formed schema = PDS_OK
//! - Unresolvable schema = PDS_SCHEMA_NOT_FOUND
//! - Wrong type = PDS_TYPE_MISMATCH, out of bounds = PDS_RANGE_VIOLATION
//! - Cross-field violation = PDS_DEPENDENCY_FAIL
//! - Priority between simultaneous failures
//! - Determinism
//! - Closed vs. open schema mode

use std::sync::Arc;

use pdsgate::artifact::{ArtifactBuilder, FieldValue, TypeTag};
use pdsgate::engine::{Stage, StageRecorder, State};
use pdsgate::{GateConfig, MemorySource, Outcome, ValidationEngine};

// =============================================================================
// Helper Functions
// =============================================================================

const SENSOR_SCHEMA: &str = r#"{
    "schema_id": "sensor-reading",
    "schema_version": "1.0.0",
    "description": "one batch of samples from a sensor",
    "fields": [
        { "name": "count", "type": "int", "required": true,
          "range": { "min": 0, "max": 100 } },
        { "name": "unit", "type": "string", "enum": ["c", "f"] },
        { "name": "label", "type": "string", "length": { "min": 1, "max": 32 },
          "pattern": "^[a-z-]+$" },
        { "name": "samples", "type": "array", "element_type": "float",
          "length": { "max": 16 },
          "depends": [ { "rule": "count_of", "field": "count" } ] },
        { "name": "ratio", "type": "float", "range": { "min": 0, "max": 1 } },
        { "name": "mode", "type": "string" },
        { "name": "threshold", "type": "int",
          "depends": [
            { "rule": "required_if", "field": "mode", "equals": "alarm" },
            { "rule": "compare", "op": "le", "field": "count" }
          ] },
        { "name": "lat", "type": "float",
          "depends": [ { "rule": "requires", "fields": ["lon"] } ] },
        { "name": "lon", "type": "float" },
        { "name": "inline", "type": "bytes",
          "depends": [ { "rule": "excludes", "fields": ["href"] } ] },
        { "name": "href", "type": "string" }
    ]
}"#;

const BROKEN_SCHEMA: &str = r#"{ "schema_id": "broken", "schema_version": "1", "fields": [ "#;

const LOOSE_SCHEMA: &str = r#"{
    "schema_id": "loose", "schema_version": "1", "closed": false,
    "fields": [ { "name": "count", "type": "int", "required": true } ]
}"#;

fn source() -> Arc<MemorySource> {
    Arc::new(
        MemorySource::new()
            .with("sensor-reading", SENSOR_SCHEMA)
            .with("broken", BROKEN_SCHEMA)
            .with("loose", LOOSE_SCHEMA),
    )
}

fn engine() -> ValidationEngine {
    ValidationEngine::new(&GateConfig::default(), source())
}

fn samples(n: usize) -> FieldValue {
    FieldValue::Array(TypeTag::Float, (0..n).map(|i| FieldValue::Float(i as f64)).collect())
}

/// A reading that satisfies every constraint of the sensor schema.
fn valid_reading() -> ArtifactBuilder {
    ArtifactBuilder::new()
        .int("count", 3)
        .string("unit", "c")
        .string("label", "east-wing")
        .field("samples", samples(3))
        .float("ratio", 0.25)
}

fn validate(builder: ArtifactBuilder) -> Outcome {
    engine().validate("sensor-reading", &builder.build().unwrap())
}

// =============================================================================
// Success
// =============================================================================

#[test]
fn test_valid_artifact_accepted() {
    assert_eq!(validate(valid_reading()), Outcome::Success);
}

#[test]
fn test_valid_artifact_with_checksum_accepted() {
    assert_eq!(validate(valid_reading().with_checksum()), Outcome::Success);
}

#[test]
fn test_minimal_artifact_accepted() {
    assert_eq!(validate(ArtifactBuilder::new().int("count", 0)), Outcome::Success);
}

// =============================================================================
// Count Scenario
// =============================================================================

#[test]
fn test_count_scenario() {
    let engine = engine();

    let over = ArtifactBuilder::new().int("count", 150).build().unwrap();
    assert_eq!(engine.validate("sensor-reading", &over), Outcome::RangeViolation);

    let text = ArtifactBuilder::new().string("count", "abc").build().unwrap();
    assert_eq!(engine.validate("sensor-reading", &text), Outcome::TypeMismatch);

    let good = ArtifactBuilder::new().int("count", 50).build().unwrap();
    assert_eq!(
        engine.validate("sensor-reading", &good[..good.len() - 3]),
        Outcome::CorruptedStruct
    );
}

// =============================================================================
// Schema Resolution
// =============================================================================

#[test]
fn test_unknown_schema_for_perfect_artifact() {
    let raw = valid_reading().build().unwrap();
    assert_eq!(engine().validate("no-such-schema", &raw), Outcome::SchemaNotFound);
}

#[test]
fn test_malformed_schema_is_not_found() {
    let raw = valid_reading().build().unwrap();
    assert_eq!(engine().validate("broken", &raw), Outcome::SchemaNotFound);
}

#[test]
fn test_overlong_schema_id_is_not_found() {
    let config = GateConfig {
        max_schema_id_len: 8,
        ..GateConfig::default()
    };
    let engine = ValidationEngine::new(&config, source());
    let raw = valid_reading().build().unwrap();
    assert_eq!(engine.validate("sensor-reading", &raw), Outcome::SchemaNotFound);
}

// =============================================================================
// Type Checking
// =============================================================================

#[test]
fn test_missing_required_field() {
    assert_eq!(
        validate(ArtifactBuilder::new().string("unit", "c")),
        Outcome::TypeMismatch
    );
}

#[test]
fn test_int_not_accepted_for_float() {
    assert_eq!(
        validate(ArtifactBuilder::new().int("count", 1).int("ratio", 1)),
        Outcome::TypeMismatch
    );
}

#[test]
fn test_wrong_array_element_type() {
    let ints = FieldValue::Array(TypeTag::Int, vec![FieldValue::Int(1)]);
    assert_eq!(
        validate(ArtifactBuilder::new().int("count", 1).field("samples", ints)),
        Outcome::TypeMismatch
    );
}

#[test]
fn test_undeclared_field_in_closed_mode() {
    assert_eq!(
        validate(valid_reading().bool("debug", true)),
        Outcome::TypeMismatch
    );
}

// =============================================================================
// Range Checking
// =============================================================================

#[test]
fn test_range_violations() {
    let base = || ArtifactBuilder::new().int("count", 3);
    assert_eq!(validate(base().float("ratio", 1.5)), Outcome::RangeViolation);
    assert_eq!(validate(base().string("unit", "k")), Outcome::RangeViolation);
    assert_eq!(validate(base().string("label", "East Wing")), Outcome::RangeViolation);
    assert_eq!(validate(base().string("label", "")), Outcome::RangeViolation);
    assert_eq!(validate(base().field("samples", samples(17))), Outcome::RangeViolation);
}

#[test]
fn test_range_checked_only_after_types() {
    // count is out of range, ratio is mistyped: type wins.
    let builder = ArtifactBuilder::new().int("count", 500).string("ratio", "high");
    assert_eq!(validate(builder), Outcome::TypeMismatch);
}

// =============================================================================
// Dependency Checking
// =============================================================================

#[test]
fn test_count_of_mismatch() {
    let builder = ArtifactBuilder::new().int("count", 4).field("samples", samples(3));
    assert_eq!(validate(builder), Outcome::DependencyFail);
}

#[test]
fn test_required_if() {
    let base = || ArtifactBuilder::new().int("count", 10).string("mode", "alarm");
    assert_eq!(validate(base()), Outcome::DependencyFail);
    assert_eq!(validate(base().int("threshold", 5)), Outcome::Success);

    let idle = ArtifactBuilder::new().int("count", 10).string("mode", "idle");
    assert_eq!(validate(idle), Outcome::Success);
}

#[test]
fn test_compare() {
    let builder = ArtifactBuilder::new().int("count", 10).int("threshold", 11);
    assert_eq!(validate(builder), Outcome::DependencyFail);
}

#[test]
fn test_requires() {
    let base = || ArtifactBuilder::new().int("count", 1).float("lat", 52.5);
    assert_eq!(validate(base()), Outcome::DependencyFail);
    assert_eq!(validate(base().float("lon", 13.4)), Outcome::Success);
}

#[test]
fn test_excludes() {
    let builder = ArtifactBuilder::new()
        .int("count", 1)
        .bytes("inline", vec![1, 2])
        .string("href", "https://example.invalid/x");
    assert_eq!(validate(builder), Outcome::DependencyFail);
}

#[test]
fn test_range_wins_over_dependency() {
    let builder = ArtifactBuilder::new().int("count", 101).field("samples", samples(2));
    assert_eq!(validate(builder), Outcome::RangeViolation);
}

// =============================================================================
// Verdict Details
// =============================================================================

#[test]
fn test_verdict_carries_single_failure() {
    let recorder = Arc::new(StageRecorder::new());
    let engine = engine().with_observer(recorder.clone());
    let raw = ArtifactBuilder::new().string("count", "abc").build().unwrap();

    let verdict = engine.evaluate("sensor-reading", &raw);
    assert_eq!(verdict.outcome, Outcome::TypeMismatch);
    assert_eq!(verdict.reached, State::SchemaResolved);

    let failure = verdict.failure.unwrap();
    assert_eq!(failure.stage, Stage::Types);
    assert_eq!(failure.code, "PDS_TYPE_MISMATCH");
    let details = failure.details.unwrap();
    assert_eq!(details.field, "count");
    assert_eq!(details.expected, "int");
    assert_eq!(details.actual, "string");

    assert_eq!(recorder.stages(), vec![Stage::Structure, Stage::Schema, Stage::Types]);
}

#[test]
fn test_verdict_serializes_outcome_code() {
    let raw = ArtifactBuilder::new().int("count", 150).build().unwrap();
    let verdict = engine().evaluate("sensor-reading", &raw);
    let json = serde_json::to_value(&verdict).unwrap();
    assert_eq!(json["outcome"], "PDS_RANGE_VIOLATION");
    assert_eq!(json["failure"]["stage"], "ranges");
    assert_eq!(json["reached"], "type_checked");
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_identical_inputs_identical_outcomes() {
    let engine = engine();
    let inputs = [
        valid_reading().build().unwrap(),
        ArtifactBuilder::new().int("count", 150).build().unwrap(),
        b"PDSA".to_vec(),
    ];
    for raw in &inputs {
        let first = engine.evaluate("sensor-reading", raw);
        for _ in 0..50 {
            assert_eq!(engine.evaluate("sensor-reading", raw), first);
        }
    }
}

// =============================================================================
// Schema Mode
// =============================================================================

#[test]
fn test_open_mode_ignores_undeclared_fields() {
    let engine = ValidationEngine::new(&GateConfig::default().open(), source());
    let raw = valid_reading().bool("debug", true).build().unwrap();
    assert_eq!(engine.validate("sensor-reading", &raw), Outcome::Success);
}

#[test]
fn test_schema_closed_flag_overrides_config() {
    // "loose" declares closed: false, so the default closed config is overridden.
    let raw = ArtifactBuilder::new()
        .int("count", 1)
        .string("note", "extra")
        .build()
        .unwrap();
    assert_eq!(engine().validate("loose", &raw), Outcome::Success);
}
