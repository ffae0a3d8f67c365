//! Seam to the external mission optimization engine.

use mission_config::{
    DriverSettings, MissionConfig, ObjectiveSettings, RecordingSettings, RunSettings,
};
use mission_core::Unit;
use mission_diagnostics::NamedValue;
use thiserror::Error;

/// Failures reported by an engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected a numerical value; tolerated during optimization.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("output `{0}` has not been computed")]
    MissingOutput(String),
    #[error("{0}")]
    Failed(String),
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Lifecycle calls the orchestrator issues, in the order it issues them.
///
/// Implementations own all model state; the orchestrator only requests
/// transitions and reads values back.
pub trait OptimizationEngine {
    /// Read the aircraft input file and attach the mission definition.
    fn load_inputs(&mut self, run: &RunSettings, mission: &MissionConfig)
    -> Result<(), EngineError>;

    fn check_and_preprocess_inputs(&mut self) -> Result<(), EngineError>;

    fn add_pre_mission_systems(&mut self) -> Result<(), EngineError>;

    fn add_phases(&mut self) -> Result<(), EngineError>;

    fn add_post_mission_systems(&mut self) -> Result<(), EngineError>;

    fn link_phases(&mut self) -> Result<(), EngineError>;

    fn add_driver(&mut self, driver: &DriverSettings) -> Result<(), EngineError>;

    fn add_design_variables(&mut self) -> Result<(), EngineError>;

    fn add_objective(&mut self, objective: &ObjectiveSettings) -> Result<(), EngineError>;

    fn setup(&mut self) -> Result<(), EngineError>;

    fn set_initial_guesses(&mut self) -> Result<(), EngineError>;

    /// Model inputs with their current values.
    fn list_inputs(&self) -> Result<Vec<NamedValue>, EngineError>;

    /// Single forward evaluation without the driver.
    fn run_model(&mut self) -> Result<(), EngineError>;

    /// Model outputs with their current values.
    fn list_outputs(&self) -> Result<Vec<NamedValue>, EngineError>;

    /// Run the driver to convergence or its iteration limit.
    fn run_optimization(&mut self, recording: &RecordingSettings) -> Result<(), EngineError>;

    /// Read a named output expressed in `unit`.
    fn get_val(&self, name: &str, unit: Unit) -> Result<Vec<f64>, EngineError>;
}
