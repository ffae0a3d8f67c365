//! Mission run orchestration against an external optimization engine.

pub mod dry_run;
pub mod engine;
pub mod lifecycle;
pub mod results;
pub mod run;

mod error;

pub use dry_run::DryRunEngine;
pub use engine::{EngineError, OptimizationEngine};
pub use error::OrchestratorError;
pub use lifecycle::{Lifecycle, Stage};
pub use results::{Output, RunResult};
pub use run::{RunReport, SolveOutcome, run_mission, run_scenario};
