//! Validation orchestrator
//!
//! Control flow per attempt:
//!
//! Structure → Schema → Types → Ranges → Dependencies
//!
//! Every stage runs only if the previous one succeeded. The first failure
//! decides the outcome; later stages are never entered.

use std::sync::Arc;

use crate::artifact::{IntegrityChecker, IntegrityError};
use crate::checks::{check_dependencies, check_ranges, check_types, CheckError};
use crate::config::{GateConfig, SchemaMode};
use crate::outcome::Outcome;
use crate::schema::{SchemaCache, SchemaError, SchemaResolver, SchemaSource};

use super::context::{Failure, ValidationContext, Verdict};
use super::observer::{NoopObserver, Stage, StageObserver};

/// Validation engine. `Send + Sync`; one instance serves any number of
/// concurrent attempts.
pub struct ValidationEngine {
    checker: IntegrityChecker,
    resolver: SchemaResolver,
    mode: SchemaMode,
    observer: Arc<dyn StageObserver>,
}

impl ValidationEngine {
    pub fn new(config: &GateConfig, source: Arc<dyn SchemaSource>) -> Self {
        Self {
            checker: IntegrityChecker::from_config(config),
            resolver: SchemaResolver::new(source, config),
            mode: config.schema_mode,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Resolves schemas through `cache`.
    pub fn with_cache(mut self, cache: Arc<SchemaCache>) -> Self {
        self.resolver = self.resolver.with_cache(cache);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn mode(&self) -> SchemaMode {
        self.mode
    }

    /// Validates `raw` against the schema named `schema_id`.
    pub fn validate(&self, schema_id: &str, raw: &[u8]) -> Outcome {
        self.evaluate(schema_id, raw).outcome
    }

    /// Like [`validate`](Self::validate), also returning the failure detail.
    pub fn evaluate(&self, schema_id: &str, raw: &[u8]) -> Verdict {
        let mut ctx = ValidationContext::new(schema_id, raw);
        self.run(&mut ctx);
        ctx.into_verdict()
    }

    fn run(&self, ctx: &mut ValidationContext<'_>) {
        self.observer.on_stage(Stage::Structure);
        let view = match self.checker.check(ctx.raw()) {
            Ok(view) => view,
            Err(e) => return ctx.fail(integrity_failure(e)),
        };
        ctx.advance(Stage::Structure);

        self.observer.on_stage(Stage::Schema);
        let model = match self.resolver.resolve(ctx.schema_id()) {
            Ok(model) => model,
            Err(e) => return ctx.fail(schema_failure(e)),
        };
        ctx.advance(Stage::Schema);

        self.observer.on_stage(Stage::Types);
        if let Err(e) = check_types(&model, &view, self.mode) {
            return ctx.fail(check_failure(Stage::Types, e));
        }
        ctx.advance(Stage::Types);

        self.observer.on_stage(Stage::Ranges);
        if let Err(e) = check_ranges(&model, &view) {
            return ctx.fail(check_failure(Stage::Ranges, e));
        }
        ctx.advance(Stage::Ranges);

        self.observer.on_stage(Stage::Dependencies);
        if let Err(e) = check_dependencies(&model, &view) {
            return ctx.fail(check_failure(Stage::Dependencies, e));
        }
        ctx.advance(Stage::Dependencies);

        ctx.succeed();
    }
}

fn integrity_failure(e: IntegrityError) -> Failure {
    Failure {
        outcome: e.outcome(),
        stage: Stage::Structure,
        code: e.code().code().to_string(),
        message: e.message().to_string(),
        details: Some(e.details().clone()),
    }
}

fn schema_failure(e: SchemaError) -> Failure {
    Failure {
        outcome: e.outcome(),
        stage: Stage::Schema,
        code: e.code().code().to_string(),
        message: e.message().to_string(),
        details: None,
    }
}

fn check_failure(stage: Stage, e: CheckError) -> Failure {
    Failure {
        outcome: e.outcome(),
        stage,
        code: e.outcome().code().to_string(),
        message: e.message().to_string(),
        details: Some(e.details().clone()),
    }
}
