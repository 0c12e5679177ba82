//! CLI command implementations

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::artifact::{ArtifactBuilder, FieldValue};
use crate::config::GateConfig;
use crate::engine::{Failure, State, ValidationEngine};
use crate::observability::{log_event, Event};
use crate::outcome::Outcome;
use crate::schema::DirectorySource;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_bounded, write_result};

/// Result line printed by `validate`
#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    pub attempt_id: Uuid,
    pub schema_id: &'a str,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<&'a Failure>,
}

/// Main CLI entry point. Returns the process exit code.
pub fn run() -> CliResult<i32> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<i32> {
    match cmd {
        Command::Validate {
            schema_dir,
            schema,
            artifact,
            config,
        } => validate(&schema_dir, &schema, &artifact, config.as_deref()),
        Command::Pack {
            input,
            output,
            checksum,
        } => pack(&input, &output, checksum),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<GateConfig> {
    match path {
        Some(path) => {
            let config = GateConfig::load(path)?;
            let path = path.display().to_string();
            log_event(Event::ConfigLoaded, &[("path", path.as_str())]);
            Ok(config)
        }
        None => Ok(GateConfig::default()),
    }
}

/// Validates one artifact file and prints the report.
pub fn validate(
    schema_dir: &Path,
    schema_id: &str,
    artifact: &Path,
    config_path: Option<&Path>,
) -> CliResult<i32> {
    let config = load_config(config_path)?;
    let raw = read_bounded(artifact, config.max_artifact_bytes)?;

    let attempt_id = Uuid::new_v4();
    let attempt = attempt_id.to_string();
    let len = raw.len().to_string();
    log_event(
        Event::ValidationStart,
        &[("attempt_id", attempt.as_str()), ("schema_id", schema_id), ("bytes", len.as_str())],
    );

    let engine = ValidationEngine::new(&config, Arc::new(DirectorySource::new(schema_dir)));
    let verdict = engine.evaluate(schema_id, &raw);

    if verdict.reached != State::Start && verdict.reached != State::StructuralChecked {
        log_event(
            Event::SchemaResolved,
            &[("attempt_id", attempt.as_str()), ("schema_id", schema_id)],
        );
    }

    match &verdict.failure {
        None => log_event(
            Event::ValidationAccepted,
            &[("attempt_id", attempt.as_str()), ("outcome", verdict.outcome.code())],
        ),
        Some(failure) => {
            let field = failure
                .details
                .as_ref()
                .map(|d| d.field.as_str())
                .unwrap_or("");
            log_event(
                Event::ValidationRejected,
                &[
                    ("attempt_id", attempt.as_str()),
                    ("outcome", verdict.outcome.code()),
                    ("stage", failure.stage.as_str()),
                    ("code", failure.code.as_str()),
                    ("field", field),
                    ("message", failure.message.as_str()),
                ],
            );
        }
    }

    write_result(&ValidationReport {
        attempt_id,
        schema_id,
        outcome: verdict.outcome,
        failure: verdict.failure.as_ref(),
    })?;

    Ok(verdict.outcome.exit_code())
}

/// Encodes a flat JSON object into an artifact file.
pub fn pack(input: &Path, output: &Path, checksum: bool) -> CliResult<i32> {
    let text = fs::read_to_string(input).map_err(|e| CliError::read(input, e))?;
    let document: Value = serde_json::from_str(&text)?;
    let object = document
        .as_object()
        .ok_or_else(|| CliError::InvalidInput("top level must be a JSON object".into()))?;

    let builder = builder_from_json(object, checksum)?;
    let bytes = builder.build()?;
    fs::write(output, &bytes).map_err(|e| CliError::write(output, e))?;

    let fields = builder.len().to_string();
    let len = bytes.len().to_string();
    let path = output.display().to_string();
    log_event(
        Event::PackComplete,
        &[("bytes", len.as_str()), ("fields", fields.as_str()), ("output", path.as_str())],
    );
    Ok(0)
}

/// Maps each key of `object` to one artifact field.
pub fn builder_from_json(object: &Map<String, Value>, checksum: bool) -> CliResult<ArtifactBuilder> {
    let mut builder = ArtifactBuilder::new();
    if checksum {
        builder = builder.with_checksum();
    }
    for (name, value) in object {
        builder = builder.field(name.as_str(), field_value(name, value)?);
    }
    Ok(builder)
}

fn field_value(name: &str, value: &Value) -> CliResult<FieldValue> {
    match value {
        Value::Array(items) => {
            let items = items
                .iter()
                .map(|item| scalar_value(name, item))
                .collect::<CliResult<Vec<_>>>()?;
            let element = items.first().map(FieldValue::tag).ok_or_else(|| {
                CliError::InvalidInput(format!("'{}': cannot infer element type of empty array", name))
            })?;
            if items.iter().any(|item| item.tag() != element) {
                return Err(CliError::InvalidInput(format!(
                    "'{}': array items must share one type",
                    name
                )));
            }
            Ok(FieldValue::Array(element, items))
        }
        other => scalar_value(name, other),
    }
}

fn scalar_value(name: &str, value: &Value) -> CliResult<FieldValue> {
    match value {
        Value::Bool(b) => Ok(FieldValue::Bool(*b)),
        Value::String(s) => Ok(FieldValue::String(s.clone())),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(FieldValue::Int(i)),
            (None, Some(f)) => Ok(FieldValue::Float(f)),
            (None, None) => Err(CliError::InvalidInput(format!("'{}': unrepresentable number", name))),
        },
        Value::Null => Err(CliError::InvalidInput(format!("'{}': null is not a value", name))),
        Value::Array(_) | Value::Object(_) => Err(CliError::InvalidInput(format!(
            "'{}': nested {} not supported",
            name,
            if value.is_array() { "array" } else { "object" }
        ))),
    }
}
