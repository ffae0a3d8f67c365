//! Run-level settings: engine inputs, driver, objective, and recording.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Transcription used by the engine for the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScheme {
    #[default]
    Collocation,
    Shooting,
}

/// Nonlinear programming driver requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Optimizer {
    #[serde(rename = "IPOPT")]
    Ipopt,
    #[serde(rename = "SLSQP")]
    Slsqp,
    #[serde(rename = "SNOPT")]
    Snopt,
}

impl fmt::Display for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Optimizer::Ipopt => "IPOPT",
            Optimizer::Slsqp => "SLSQP",
            Optimizer::Snopt => "SNOPT",
        };
        f.write_str(label)
    }
}

fn default_max_iter() -> u32 {
    50
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverSettings {
    pub optimizer: Optimizer,
    #[serde(default = "default_max_iter")]
    pub max_iter: u32,
}

/// Scalar the driver minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    FuelBurned,
    Mass,
    Fuel,
}

impl fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectiveType::FuelBurned => "fuel_burned",
            ObjectiveType::Mass => "mass",
            ObjectiveType::Fuel => "fuel",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveSettings {
    #[serde(rename = "type")]
    pub objective_type: ObjectiveType,
    /// Scaling reference handed to the driver; negative values maximize.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<f64>,
}

fn default_record_filename() -> PathBuf {
    PathBuf::from("aviary_history.db")
}

/// Where and how the engine persists iteration history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordingSettings {
    #[serde(default = "default_record_filename")]
    pub record_filename: PathBuf,
    #[serde(default)]
    pub restart_filename: Option<PathBuf>,
    #[serde(default)]
    pub make_plots: bool,
    #[serde(default)]
    pub suppress_solver_print: bool,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            record_filename: default_record_filename(),
            restart_filename: None,
            make_plots: false,
            suppress_solver_print: false,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Switches for the two optional lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticSettings {
    /// Scan inputs, run the model once, and scan outputs before optimizing.
    #[serde(default = "enabled")]
    pub check_nan: bool,
    /// Run the optimizer.
    #[serde(default = "enabled")]
    pub optimize: bool,
}

impl Default for DiagnosticSettings {
    fn default() -> Self {
        Self {
            check_nan: true,
            optimize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    /// Aircraft parameter CSV consumed by the engine loader.
    pub aircraft: PathBuf,
    #[serde(default)]
    pub analysis_scheme: AnalysisScheme,
    pub driver: DriverSettings,
    pub objective: ObjectiveSettings,
    #[serde(default)]
    pub recording: RecordingSettings,
    #[serde(default)]
    pub diagnostics: DiagnosticSettings,
}

impl RunSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.aircraft.as_os_str().is_empty() {
            return Err(ValidationError::MissingAircraft);
        }
        if self.driver.max_iter == 0 {
            return Err(ValidationError::ZeroIterations);
        }
        if let Some(reference) = self.objective.reference {
            if !reference.is_finite() || reference == 0.0 {
                return Err(ValidationError::InvalidObjectiveRef(reference));
            }
        }
        Ok(())
    }
}
