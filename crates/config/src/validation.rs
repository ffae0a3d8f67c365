//! Structural checks applied whenever a mission or scenario is constructed.

use std::collections::BTreeSet;

use mission_core::{Unit, UnitKind};
use thiserror::Error;

use crate::{Bounds, InitialGuess, PhaseConfig, PostMission, Quantity};

/// Names that belong to the non-phase mission blocks.
pub const RESERVED_PHASE_NAMES: [&str; 2] = ["pre_mission", "post_mission"];

/// Reasons a mission or run configuration is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("mission defines no phases")]
    NoPhases,
    #[error("mission is missing its post_mission block")]
    MissingPostMission,
    #[error("phase name must not be empty")]
    EmptyPhaseName,
    #[error("phase `{0}` is defined more than once")]
    DuplicatePhase(String),
    #[error("`{0}` is reserved and cannot name a flight phase")]
    ReservedPhaseName(String),
    #[error("{phase}.{field}: value {value} is not finite")]
    NonFinite {
        phase: String,
        field: String,
        value: f64,
    },
    #[error("{phase}.{field}: lower bound {low} exceeds upper bound {high}")]
    InvertedBounds {
        phase: String,
        field: String,
        low: f64,
        high: f64,
    },
    #[error("{phase}.{field}: expected a {expected} unit, found `{found}`")]
    UnitMismatch {
        phase: String,
        field: String,
        expected: UnitKind,
        found: Unit,
    },
    #[error("{phase}.{field}: Mach {value} outside [0, 1]")]
    MachOutOfRange {
        phase: String,
        field: String,
        value: f64,
    },
    #[error("{phase}.{field}: altitude {value_ft} ft is negative")]
    NegativeAltitude {
        phase: String,
        field: String,
        value_ft: f64,
    },
    #[error("{phase}.duration_bounds: lower bound {low} {unit} must be positive")]
    NonPositiveDuration { phase: String, low: f64, unit: Unit },
    #[error("{phase}.{field}: time {value} {unit} must not be negative")]
    NegativeTime {
        phase: String,
        field: String,
        value: f64,
        unit: Unit,
    },
    #[error("{phase}.{field}: {value} {unit} lies outside bounds [{low}, {high}] {unit}")]
    OutsideBounds {
        phase: String,
        field: String,
        value: f64,
        low: f64,
        high: f64,
        unit: Unit,
    },
    #[error("{phase}.{field} must be at least 1")]
    ZeroCount { phase: String, field: String },
    #[error("{phase}.initial_guesses.{name}: guess has no values")]
    EmptyGuess { phase: String, name: String },
    #[error("{phase}.initial_guesses.time: expected [initial, duration], found {count} values")]
    TimeGuessArity { phase: String, count: usize },
    #[error("post_mission.target_range: {value} {unit} must be a positive length")]
    InvalidTargetRange { value: f64, unit: Unit },
    #[error("run.aircraft: aircraft input path must not be empty")]
    MissingAircraft,
    #[error("run.driver.max_iter must be at least 1")]
    ZeroIterations,
    #[error("run.objective.ref: {0} must be finite and non-zero")]
    InvalidObjectiveRef(f64),
}

pub(crate) fn validate_mission(
    phases: &[PhaseConfig],
    post_mission: &PostMission,
) -> Result<(), ValidationError> {
    if phases.is_empty() {
        return Err(ValidationError::NoPhases);
    }

    let mut seen = BTreeSet::new();
    for phase in phases {
        if !seen.insert(phase.name.as_str()) {
            return Err(ValidationError::DuplicatePhase(phase.name.clone()));
        }
        validate_phase(phase)?;
    }

    validate_post_mission(post_mission)
}

/// Check a single phase in isolation.
pub fn validate_phase(phase: &PhaseConfig) -> Result<(), ValidationError> {
    if phase.name.trim().is_empty() {
        return Err(ValidationError::EmptyPhaseName);
    }
    if RESERVED_PHASE_NAMES.contains(&phase.name.as_str()) {
        return Err(ValidationError::ReservedPhaseName(phase.name.clone()));
    }

    let check = PhaseCheck { phase: &phase.name };
    let opts = &phase.user_options;

    check.count("num_segments", opts.num_segments)?;
    check.count("order", opts.order)?;
    check.count("polynomial_control_order", opts.polynomial_control_order)?;

    check.mach("initial_mach", &opts.initial_mach)?;
    check.mach("final_mach", &opts.final_mach)?;
    check.mach_bounds("mach_bounds", &opts.mach_bounds)?;

    check.altitude("initial_altitude", &opts.initial_altitude)?;
    check.altitude("final_altitude", &opts.final_altitude)?;
    check.altitude_bounds("altitude_bounds", &opts.altitude_bounds)?;

    check.initial_bounds(&opts.initial_bounds)?;
    check.duration_bounds(&opts.duration_bounds)?;

    check.inside("initial_mach", &opts.initial_mach, &opts.mach_bounds)?;
    check.inside("final_mach", &opts.final_mach, &opts.mach_bounds)?;
    check.inside("initial_altitude", &opts.initial_altitude, &opts.altitude_bounds)?;
    check.inside("final_altitude", &opts.final_altitude, &opts.altitude_bounds)?;

    for (name, guess) in &phase.initial_guesses {
        check.guess(name, guess)?;
    }

    Ok(())
}

fn validate_post_mission(post: &PostMission) -> Result<(), ValidationError> {
    let range = post.target_range;
    if range.unit.kind() != UnitKind::Length || !range.value.is_finite() || range.value <= 0.0 {
        return Err(ValidationError::InvalidTargetRange {
            value: range.value,
            unit: range.unit,
        });
    }
    Ok(())
}

struct PhaseCheck<'a> {
    phase: &'a str,
}

impl PhaseCheck<'_> {
    fn count(&self, field: &str, value: u32) -> Result<(), ValidationError> {
        if value == 0 {
            return Err(ValidationError::ZeroCount {
                phase: self.phase.to_string(),
                field: field.to_string(),
            });
        }
        Ok(())
    }

    fn finite(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                phase: self.phase.to_string(),
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn unit(&self, field: &str, unit: Unit, expected: UnitKind) -> Result<(), ValidationError> {
        if unit.kind() != expected {
            return Err(ValidationError::UnitMismatch {
                phase: self.phase.to_string(),
                field: field.to_string(),
                expected,
                found: unit,
            });
        }
        Ok(())
    }

    fn bounds(&self, field: &str, bounds: &Bounds, expected: UnitKind) -> Result<(), ValidationError> {
        self.unit(field, bounds.unit, expected)?;
        self.finite(field, bounds.low)?;
        self.finite(field, bounds.high)?;
        if bounds.low > bounds.high {
            return Err(ValidationError::InvertedBounds {
                phase: self.phase.to_string(),
                field: field.to_string(),
                low: bounds.low,
                high: bounds.high,
            });
        }
        Ok(())
    }

    fn mach_value(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::MachOutOfRange {
                phase: self.phase.to_string(),
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn mach(&self, field: &str, mach: &Quantity) -> Result<(), ValidationError> {
        self.unit(field, mach.unit, UnitKind::Dimensionless)?;
        self.finite(field, mach.value)?;
        self.mach_value(field, mach.value)
    }

    fn mach_bounds(&self, field: &str, bounds: &Bounds) -> Result<(), ValidationError> {
        self.bounds(field, bounds, UnitKind::Dimensionless)?;
        self.mach_value(field, bounds.low)?;
        self.mach_value(field, bounds.high)
    }

    fn altitude_value(&self, field: &str, value: f64, unit: Unit) -> Result<(), ValidationError> {
        let value_ft = unit.convert(value, Unit::Feet).unwrap_or(value);
        if value_ft < 0.0 {
            return Err(ValidationError::NegativeAltitude {
                phase: self.phase.to_string(),
                field: field.to_string(),
                value_ft,
            });
        }
        Ok(())
    }

    fn altitude(&self, field: &str, altitude: &Quantity) -> Result<(), ValidationError> {
        self.unit(field, altitude.unit, UnitKind::Length)?;
        self.finite(field, altitude.value)?;
        self.altitude_value(field, altitude.value, altitude.unit)
    }

    fn altitude_bounds(&self, field: &str, bounds: &Bounds) -> Result<(), ValidationError> {
        self.bounds(field, bounds, UnitKind::Length)?;
        self.altitude_value(field, bounds.low, bounds.unit)?;
        self.altitude_value(field, bounds.high, bounds.unit)
    }

    fn initial_bounds(&self, bounds: &Bounds) -> Result<(), ValidationError> {
        let field = "initial_bounds";
        self.bounds(field, bounds, UnitKind::Time)?;
        if bounds.low < 0.0 {
            return Err(ValidationError::NegativeTime {
                phase: self.phase.to_string(),
                field: field.to_string(),
                value: bounds.low,
                unit: bounds.unit,
            });
        }
        Ok(())
    }

    fn duration_bounds(&self, bounds: &Bounds) -> Result<(), ValidationError> {
        self.bounds("duration_bounds", bounds, UnitKind::Time)?;
        if bounds.low <= 0.0 {
            return Err(ValidationError::NonPositiveDuration {
                phase: self.phase.to_string(),
                low: bounds.low,
                unit: bounds.unit,
            });
        }
        Ok(())
    }

    fn inside(&self, field: &str, value: &Quantity, bounds: &Bounds) -> Result<(), ValidationError> {
        // Units already share a kind at this point.
        if !bounds.contains(value).unwrap_or(false) {
            let converted = value.in_unit(bounds.unit).unwrap_or(value.value);
            return Err(ValidationError::OutsideBounds {
                phase: self.phase.to_string(),
                field: field.to_string(),
                value: converted,
                low: bounds.low,
                high: bounds.high,
                unit: bounds.unit,
            });
        }
        Ok(())
    }

    fn guess(&self, name: &str, guess: &InitialGuess) -> Result<(), ValidationError> {
        let field = format!("initial_guesses.{name}");
        if guess.values.is_empty() {
            return Err(ValidationError::EmptyGuess {
                phase: self.phase.to_string(),
                name: name.to_string(),
            });
        }
        for value in &guess.values {
            self.finite(&field, *value)?;
        }

        if name == "time" {
            self.unit(&field, guess.unit, UnitKind::Time)?;
            if guess.values.len() != 2 {
                return Err(ValidationError::TimeGuessArity {
                    phase: self.phase.to_string(),
                    count: guess.values.len(),
                });
            }
            if guess.values[0] < 0.0 {
                return Err(ValidationError::NegativeTime {
                    phase: self.phase.to_string(),
                    field,
                    value: guess.values[0],
                    unit: guess.unit,
                });
            }
        }
        Ok(())
    }
}
