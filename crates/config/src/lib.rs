//! Configuration models and loaders for mission phase definitions.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod builder;
pub mod continuity;
pub mod presets;
pub mod run;
pub mod validation;

pub use builder::MissionBuilder;
pub use mission_core::{Unit, UnitError, UnitKind};
pub use run::{
    AnalysisScheme, DiagnosticSettings, DriverSettings, ObjectiveSettings, ObjectiveType,
    Optimizer, RecordingSettings, RunSettings,
};
pub use validation::ValidationError;

/// A scalar value tagged with its unit, written as `[value, unit]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, Unit)", into = "(f64, Unit)")]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn in_unit(&self, unit: Unit) -> Result<f64, UnitError> {
        self.unit.convert(self.value, unit)
    }
}

impl From<(f64, Unit)> for Quantity {
    fn from((value, unit): (f64, Unit)) -> Self {
        Self { value, unit }
    }
}

impl From<Quantity> for (f64, Unit) {
    fn from(q: Quantity) -> Self {
        (q.value, q.unit)
    }
}

/// A `(low, high)` interval tagged with its unit, written as `[[low, high], unit]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "((f64, f64), Unit)", into = "((f64, f64), Unit)")]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
    pub unit: Unit,
}

impl Bounds {
    pub fn new(low: f64, high: f64, unit: Unit) -> Self {
        Self { low, high, unit }
    }

    /// Both ends expressed in `unit`.
    pub fn in_unit(&self, unit: Unit) -> Result<(f64, f64), UnitError> {
        Ok((
            self.unit.convert(self.low, unit)?,
            self.unit.convert(self.high, unit)?,
        ))
    }

    /// Whether `quantity` falls inside the closed interval.
    pub fn contains(&self, quantity: &Quantity) -> Result<bool, UnitError> {
        let value = quantity.in_unit(self.unit)?;
        Ok(self.low <= value && value <= self.high)
    }
}

impl From<((f64, f64), Unit)> for Bounds {
    fn from(((low, high), unit): ((f64, f64), Unit)) -> Self {
        Self { low, high, unit }
    }
}

impl From<Bounds> for ((f64, f64), Unit) {
    fn from(b: Bounds) -> Self {
        ((b.low, b.high), b.unit)
    }
}

/// Initial guess values for one state, written as `[[v0, v1, ...], unit]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Vec<f64>, Unit)", into = "(Vec<f64>, Unit)")]
pub struct InitialGuess {
    pub values: Vec<f64>,
    pub unit: Unit,
}

impl InitialGuess {
    pub fn new(values: impl Into<Vec<f64>>, unit: Unit) -> Self {
        Self {
            values: values.into(),
            unit,
        }
    }
}

impl From<(Vec<f64>, Unit)> for InitialGuess {
    fn from((values, unit): (Vec<f64>, Unit)) -> Self {
        Self { values, unit }
    }
}

impl From<InitialGuess> for (Vec<f64>, Unit) {
    fn from(g: InitialGuess) -> Self {
        (g.values, g.unit)
    }
}

/// Method selection for one engine subsystem (e.g. `core_aerodynamics`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubsystemOptions {
    pub method: String,
}

/// How engine throttle limits are enforced along a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleEnforcement {
    /// Constrained at every collocation node.
    PathConstraint,
    /// Constrained at the segment endpoints only.
    BoundaryConstraint,
    /// Throttle treated as a bounded design value.
    Bounded,
}

impl ThrottleEnforcement {
    pub fn label(self) -> &'static str {
        match self {
            ThrottleEnforcement::PathConstraint => "path_constraint",
            ThrottleEnforcement::BoundaryConstraint => "boundary_constraint",
            ThrottleEnforcement::Bounded => "bounded",
        }
    }
}

fn default_polynomial_control_order() -> u32 {
    1
}

/// Per-phase solver and trajectory options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserOptions {
    #[serde(default)]
    pub optimize_mach: bool,
    #[serde(default)]
    pub optimize_altitude: bool,
    #[serde(default)]
    pub use_polynomial_control: bool,
    #[serde(default = "default_polynomial_control_order")]
    pub polynomial_control_order: u32,
    pub num_segments: u32,
    pub order: u32,
    #[serde(default)]
    pub solve_for_distance: bool,
    pub initial_mach: Quantity,
    pub final_mach: Quantity,
    pub mach_bounds: Bounds,
    pub initial_altitude: Quantity,
    pub final_altitude: Quantity,
    pub altitude_bounds: Bounds,
    pub throttle_enforcement: ThrottleEnforcement,
    #[serde(default)]
    pub fix_initial: bool,
    #[serde(default)]
    pub constrain_final: bool,
    #[serde(default)]
    pub fix_duration: bool,
    pub initial_bounds: Bounds,
    pub duration_bounds: Bounds,
}

/// One flight segment of the mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseConfig {
    pub name: String,
    #[serde(default)]
    pub subsystem_options: BTreeMap<String, SubsystemOptions>,
    pub user_options: UserOptions,
    #[serde(default)]
    pub initial_guesses: BTreeMap<String, InitialGuess>,
}

impl PhaseConfig {
    /// The `time` guess as `(initial, duration)` in minutes, if present.
    pub fn time_guess_minutes(&self) -> Option<(f64, f64)> {
        let guess = self.initial_guesses.get("time")?;
        match guess.values.as_slice() {
            [initial, duration] => Some((
                guess.unit.convert(*initial, Unit::Minutes).ok()?,
                guess.unit.convert(*duration, Unit::Minutes).ok()?,
            )),
            _ => None,
        }
    }
}

/// Systems evaluated before the flight phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreMission {
    #[serde(default)]
    pub include_takeoff: bool,
    #[serde(default)]
    pub optimize_mass: bool,
}

/// Systems evaluated after the flight phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostMission {
    #[serde(default)]
    pub include_landing: bool,
    #[serde(default)]
    pub constrain_range: bool,
    pub target_range: Quantity,
}

/// Validated, ordered mission description. Only constructible through
/// [`MissionBuilder`] or deserialization, both of which validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionDocument", into = "MissionDocument")]
pub struct MissionConfig {
    pub(crate) pre_mission: PreMission,
    pub(crate) phases: Vec<PhaseConfig>,
    pub(crate) post_mission: PostMission,
}

impl MissionConfig {
    pub fn pre_mission(&self) -> &PreMission {
        &self.pre_mission
    }

    pub fn phases(&self) -> &[PhaseConfig] {
        &self.phases
    }

    pub fn post_mission(&self) -> &PostMission {
        &self.post_mission
    }

    pub fn phase(&self, name: &str) -> Option<&PhaseConfig> {
        self.phases.iter().find(|phase| phase.name == name)
    }

    pub fn phase_names(&self) -> impl Iterator<Item = &str> {
        self.phases.iter().map(|phase| phase.name.as_str())
    }
}

/// Unvalidated on-disk shape of a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissionDocument {
    #[serde(default)]
    pub pre_mission: PreMission,
    pub phases: Vec<PhaseConfig>,
    pub post_mission: PostMission,
}

impl TryFrom<MissionDocument> for MissionConfig {
    type Error = ValidationError;

    fn try_from(doc: MissionDocument) -> Result<Self, Self::Error> {
        doc.phases
            .into_iter()
            .fold(MissionBuilder::new().pre_mission(doc.pre_mission), |b, p| {
                b.phase(p)
            })
            .post_mission(doc.post_mission)
            .build()
    }
}

impl From<MissionConfig> for MissionDocument {
    fn from(config: MissionConfig) -> Self {
        Self {
            pre_mission: config.pre_mission,
            phases: config.phases,
            post_mission: config.post_mission,
        }
    }
}

/// A named mission together with the settings used to run it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    name: String,
    description: Option<String>,
    run: RunSettings,
    mission: MissionConfig,
}

impl ScenarioConfig {
    pub fn new(
        name: impl Into<String>,
        run: RunSettings,
        mission: MissionConfig,
    ) -> Result<Self, ValidationError> {
        run.validate()?;
        Ok(Self {
            name: name.into(),
            description: None,
            run,
            mission,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn run(&self) -> &RunSettings {
        &self.run
    }

    pub fn mission(&self) -> &MissionConfig {
        &self.mission
    }
}

/// Unvalidated on-disk shape of a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub run: RunSettings,
    pub mission: MissionDocument,
}

impl TryFrom<ScenarioDocument> for ScenarioConfig {
    type Error = ValidationError;

    fn try_from(doc: ScenarioDocument) -> Result<Self, Self::Error> {
        let mission = MissionConfig::try_from(doc.mission)?;
        let scenario = ScenarioConfig::new(doc.name, doc.run, mission)?;
        Ok(match doc.description {
            Some(description) => scenario.with_description(description),
            None => scenario,
        })
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Load and validate a scenario from a YAML or TOML file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let doc: ScenarioDocument = load_record(path.as_ref())?;
    let scenario = ScenarioConfig::try_from(doc)?;
    debug!(
        path = %path.as_ref().display(),
        scenario = scenario.name(),
        phases = scenario.mission().phases().len(),
        "loaded scenario"
    );
    Ok(scenario)
}

/// Load and validate a bare mission description from a YAML or TOML file.
pub fn load_mission<P: AsRef<Path>>(path: P) -> Result<MissionConfig, ConfigError> {
    let doc: MissionDocument = load_record(path.as_ref())?;
    Ok(MissionConfig::try_from(doc)?)
}

/// Parse and validate a scenario from YAML text.
pub fn scenario_from_yaml(text: &str) -> Result<ScenarioConfig, ConfigError> {
    let doc: ScenarioDocument = serde_yaml::from_str(text)?;
    Ok(ScenarioConfig::try_from(doc)?)
}

/// Parse and validate a mission from YAML text.
pub fn mission_from_yaml(text: &str) -> Result<MissionConfig, ConfigError> {
    let doc: MissionDocument = serde_yaml::from_str(text)?;
    Ok(MissionConfig::try_from(doc)?)
}

fn load_record<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(toml::from_str(&contents)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
