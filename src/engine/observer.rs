//! Stage instrumentation

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

/// Validation stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Structure,
    Schema,
    Types,
    Ranges,
    Dependencies,
}

impl Stage {
    pub const ORDER: [Stage; 5] = [
        Stage::Structure,
        Stage::Schema,
        Stage::Types,
        Stage::Ranges,
        Stage::Dependencies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Structure => "structure",
            Stage::Schema => "schema",
            Stage::Types => "types",
            Stage::Ranges => "ranges",
            Stage::Dependencies => "dependencies",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notified on entry to each stage.
pub trait StageObserver: Send + Sync {
    fn on_stage(&self, stage: Stage);
}

/// Observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_stage(&self, _stage: Stage) {}
}

/// Records every stage entered, in order.
#[derive(Debug, Default)]
pub struct StageRecorder {
    stages: Mutex<Vec<Stage>>,
}

impl StageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.stages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn entered(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }

    pub fn clear(&self) {
        self.stages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}

impl StageObserver for StageRecorder {
    fn on_stage(&self, stage: Stage) {
        self.stages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(stage);
    }
}
