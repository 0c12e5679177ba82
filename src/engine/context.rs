//! Per-attempt validation state
//!
//! State machine:
//!
//! ```text
//! Start → StructuralChecked → SchemaResolved → TypeChecked
//!       → RangeChecked → DependencyChecked → Done
//! ```
//!
//! States only advance on stage success. Any failure moves straight to
//! `Done` carrying that stage's outcome.

use std::fmt;

use serde::Serialize;

use crate::outcome::{Outcome, ValidationDetails};

use super::observer::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Start,
    StructuralChecked,
    SchemaResolved,
    TypeChecked,
    RangeChecked,
    DependencyChecked,
    Done,
}

impl State {
    /// State reached when `stage` succeeds.
    pub fn after(stage: Stage) -> State {
        match stage {
            Stage::Structure => State::StructuralChecked,
            Stage::Schema => State::SchemaResolved,
            Stage::Types => State::TypeChecked,
            Stage::Ranges => State::RangeChecked,
            Stage::Dependencies => State::DependencyChecked,
        }
    }
}

/// The single failure of a rejected attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub outcome: Outcome,
    pub stage: Stage,
    /// Fine-grained diagnostic code (e.g. `PDS_STRUCT_TRUNCATED`)
    pub code: String,
    pub message: String,
    pub details: Option<ValidationDetails>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.outcome, self.stage, self.message)
    }
}

/// Result of one attempt: the outcome plus the failure that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub outcome: Outcome,
    /// Last state passed through before `Done`
    pub reached: State,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// State owned by one `validate` call.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    schema_id: &'a str,
    raw: &'a [u8],
    state: State,
    reached: State,
    outcome: Option<Outcome>,
    failure: Option<Failure>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(schema_id: &'a str, raw: &'a [u8]) -> Self {
        Self {
            schema_id,
            raw,
            state: State::Start,
            reached: State::Start,
            outcome: None,
            failure: None,
        }
    }

    pub fn schema_id(&self) -> &'a str {
        self.schema_id
    }

    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Records success of `stage`. Ignored once done.
    pub fn advance(&mut self, stage: Stage) {
        if self.is_done() {
            return;
        }
        self.state = State::after(stage);
        self.reached = self.state;
    }

    /// Records the failure and ends the attempt. Only the first call counts.
    pub fn fail(&mut self, failure: Failure) {
        if self.is_done() {
            return;
        }
        self.outcome = Some(failure.outcome);
        self.failure = Some(failure);
        self.state = State::Done;
    }

    /// Ends a fully successful attempt.
    pub fn succeed(&mut self) {
        if self.is_done() {
            return;
        }
        self.outcome = Some(Outcome::Success);
        self.state = State::Done;
    }

    pub fn into_verdict(self) -> Verdict {
        Verdict {
            outcome: self.outcome.unwrap_or(Outcome::CorruptedStruct),
            reached: self.reached,
            failure: self.failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(outcome: Outcome, stage: Stage) -> Failure {
        Failure {
            outcome,
            stage,
            code: outcome.code().to_string(),
            message: "x".into(),
            details: None,
        }
    }

    #[test]
    fn test_advances_through_states() {
        let mut ctx = ValidationContext::new("s", b"");
        assert_eq!(ctx.state(), State::Start);
        for stage in Stage::ORDER {
            ctx.advance(stage);
        }
        assert_eq!(ctx.state(), State::DependencyChecked);
        ctx.succeed();

        let verdict = ctx.into_verdict();
        assert_eq!(verdict.outcome, Outcome::Success);
        assert_eq!(verdict.reached, State::DependencyChecked);
        assert!(verdict.failure.is_none());
    }

    #[test]
    fn test_first_failure_is_terminal() {
        let mut ctx = ValidationContext::new("s", b"");
        ctx.advance(Stage::Structure);
        ctx.fail(failure(Outcome::SchemaNotFound, Stage::Schema));
        ctx.fail(failure(Outcome::TypeMismatch, Stage::Types));
        ctx.advance(Stage::Types);
        ctx.succeed();

        assert!(ctx.is_done());
        let verdict = ctx.into_verdict();
        assert_eq!(verdict.outcome, Outcome::SchemaNotFound);
        assert_eq!(verdict.reached, State::StructuralChecked);
    }
}
