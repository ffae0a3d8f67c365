//! Strictly linear run lifecycle.

use std::fmt;

use serde::Serialize;

use crate::error::OrchestratorError;

/// Lifecycle stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Created,
    InputsLoaded,
    Preprocessed,
    PreMissionBuilt,
    PhasesBuilt,
    PostMissionBuilt,
    PhasesLinked,
    DriverConfigured,
    DesignVariablesSet,
    ObjectiveSet,
    SetUp,
    InitialGuessesSet,
    ModelRun,
    OptimizationRun,
    ResultsRetrieved,
}

impl Stage {
    pub const SEQUENCE: [Stage; 15] = [
        Stage::Created,
        Stage::InputsLoaded,
        Stage::Preprocessed,
        Stage::PreMissionBuilt,
        Stage::PhasesBuilt,
        Stage::PostMissionBuilt,
        Stage::PhasesLinked,
        Stage::DriverConfigured,
        Stage::DesignVariablesSet,
        Stage::ObjectiveSet,
        Stage::SetUp,
        Stage::InitialGuessesSet,
        Stage::ModelRun,
        Stage::OptimizationRun,
        Stage::ResultsRetrieved,
    ];

    /// Stages that a run may skip.
    pub fn is_optional(self) -> bool {
        matches!(self, Stage::ModelRun | Stage::OptimizationRun)
    }

    fn position(self) -> usize {
        self as usize
    }

    /// Whether `next` may directly follow `self`, skipping only optional stages.
    pub fn may_precede(self, next: Stage) -> bool {
        let (from, to) = (self.position(), next.position());
        to > from
            && Stage::SEQUENCE[from + 1..to]
                .iter()
                .all(|stage| stage.is_optional())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the current stage and the stages visited so far.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    current: Stage,
    trace: Vec<Stage>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            current: Stage::Created,
            trace: vec![Stage::Created],
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    pub fn trace(&self) -> &[Stage] {
        &self.trace
    }

    /// Fail unless `next` is a legal successor of the current stage.
    pub fn ensure_next(&self, next: Stage) -> Result<(), OrchestratorError> {
        if self.current.may_precede(next) {
            Ok(())
        } else {
            Err(OrchestratorError::OutOfOrder {
                from: self.current,
                to: next,
            })
        }
    }

    /// Record that `next` completed.
    pub fn complete(&mut self, next: Stage) -> Result<(), OrchestratorError> {
        self.ensure_next(next)?;
        self.current = next;
        self.trace.push(next);
        Ok(())
    }

    pub fn into_trace(self) -> Vec<Stage> {
        self.trace
    }
}
