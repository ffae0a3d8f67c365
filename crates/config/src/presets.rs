//! Reference missions for the Dornier 228 commuter aircraft.
//!
//! Each function builds a fresh, validated value; nothing here is global state.

use std::collections::BTreeMap;

use mission_core::Unit;

use crate::run::{
    AnalysisScheme, DiagnosticSettings, DriverSettings, ObjectiveSettings, ObjectiveType,
    Optimizer, RecordingSettings, RunSettings,
};
use crate::{
    Bounds, InitialGuess, MissionBuilder, MissionConfig, PhaseConfig, PostMission, PreMission,
    Quantity, ScenarioConfig, SubsystemOptions, ThrottleEnforcement, UserOptions,
    ValidationError,
};

fn computed_aerodynamics() -> BTreeMap<String, SubsystemOptions> {
    BTreeMap::from([(
        "core_aerodynamics".to_string(),
        SubsystemOptions {
            method: "computed".to_string(),
        },
    )])
}

fn time_guess(initial_min: f64, duration_min: f64) -> BTreeMap<String, InitialGuess> {
    BTreeMap::from([(
        "time".to_string(),
        InitialGuess::new([initial_min, duration_min], Unit::Minutes),
    )])
}

fn mach(value: f64) -> Quantity {
    Quantity::new(value, Unit::Unitless)
}

fn feet(value: f64) -> Quantity {
    Quantity::new(value, Unit::Feet)
}

/// Climb, cruise, and descent segments sharing the usual option layout.
struct Segment {
    num_segments: u32,
    use_polynomial_control: bool,
    mach: (f64, f64),
    mach_bounds: (f64, f64),
    altitude_ft: (f64, f64),
    altitude_bounds_ft: (f64, f64),
    throttle_enforcement: ThrottleEnforcement,
    fix_initial: bool,
    constrain_final: bool,
    initial_bounds_min: (f64, f64),
    duration_bounds_min: (f64, f64),
    time_guess_min: (f64, f64),
}

impl Segment {
    fn into_phase(self, name: &str) -> PhaseConfig {
        PhaseConfig {
            name: name.to_string(),
            subsystem_options: computed_aerodynamics(),
            user_options: UserOptions {
                optimize_mach: false,
                optimize_altitude: false,
                use_polynomial_control: self.use_polynomial_control,
                polynomial_control_order: 1,
                num_segments: self.num_segments,
                order: 3,
                solve_for_distance: false,
                initial_mach: mach(self.mach.0),
                final_mach: mach(self.mach.1),
                mach_bounds: Bounds::new(self.mach_bounds.0, self.mach_bounds.1, Unit::Unitless),
                initial_altitude: feet(self.altitude_ft.0),
                final_altitude: feet(self.altitude_ft.1),
                altitude_bounds: Bounds::new(
                    self.altitude_bounds_ft.0,
                    self.altitude_bounds_ft.1,
                    Unit::Feet,
                ),
                throttle_enforcement: self.throttle_enforcement,
                fix_initial: self.fix_initial,
                constrain_final: self.constrain_final,
                fix_duration: false,
                initial_bounds: Bounds::new(
                    self.initial_bounds_min.0,
                    self.initial_bounds_min.1,
                    Unit::Minutes,
                ),
                duration_bounds: Bounds::new(
                    self.duration_bounds_min.0,
                    self.duration_bounds_min.1,
                    Unit::Minutes,
                ),
            },
            initial_guesses: time_guess(self.time_guess_min.0, self.time_guess_min.1),
        }
    }
}

/// Validation mission flown at 32,000 ft, segment counts matched to the
/// published climb, cruise, and descent data points.
pub fn dornier228_validation() -> Result<MissionConfig, ValidationError> {
    let climb = Segment {
        num_segments: 9,
        use_polynomial_control: false,
        mach: (0.1, 0.38),
        mach_bounds: (0.08, 0.40),
        altitude_ft: (200.0, 32_000.0),
        altitude_bounds_ft: (0.0, 34_000.0),
        throttle_enforcement: ThrottleEnforcement::PathConstraint,
        fix_initial: true,
        constrain_final: false,
        initial_bounds_min: (0.0, 0.0),
        duration_bounds_min: (8.0, 28.0),
        time_guess_min: (8.6, 17.6),
    };
    let cruise = Segment {
        num_segments: 10,
        use_polynomial_control: false,
        mach: (0.38, 0.38),
        mach_bounds: (0.36, 0.40),
        altitude_ft: (32_000.0, 32_000.0),
        altitude_bounds_ft: (30_000.0, 34_000.0),
        throttle_enforcement: ThrottleEnforcement::BoundaryConstraint,
        fix_initial: false,
        constrain_final: false,
        initial_bounds_min: (8.0, 28.0),
        duration_bounds_min: (36.0, 228.0),
        time_guess_min: (26.7, 127.7),
    };
    let descent = Segment {
        num_segments: 10,
        use_polynomial_control: false,
        mach: (0.38, 0.1),
        mach_bounds: (0.08, 0.40),
        altitude_ft: (32_000.0, 290.24),
        altitude_bounds_ft: (100.0, 34_000.0),
        throttle_enforcement: ThrottleEnforcement::PathConstraint,
        fix_initial: false,
        constrain_final: true,
        initial_bounds_min: (40.0, 230.0),
        duration_bounds_min: (10.5, 28.5),
        time_guess_min: (130.2, 18.7),
    };

    MissionBuilder::new()
        .pre_mission(PreMission {
            include_takeoff: false,
            optimize_mass: false,
        })
        .phase(climb.into_phase("climb_1"))
        .phase(cruise.into_phase("cruise"))
        .phase(descent.into_phase("descent_1"))
        .post_mission(PostMission {
            include_landing: false,
            constrain_range: false,
            target_range: Quantity::new(214.0, Unit::NauticalMiles),
        })
        .build()
}

/// Coupled design-mission problem at 25,000 ft with mass optimization and
/// an enforced 214 nmi range.
pub fn do228_level2() -> Result<MissionConfig, ValidationError> {
    let climb = Segment {
        num_segments: 3,
        use_polynomial_control: true,
        mach: (0.1, 0.38),
        mach_bounds: (0.08, 0.4),
        altitude_ft: (0.0, 25_000.0),
        altitude_bounds_ft: (0.0, 25_500.0),
        throttle_enforcement: ThrottleEnforcement::PathConstraint,
        fix_initial: true,
        constrain_final: false,
        initial_bounds_min: (0.0, 0.0),
        duration_bounds_min: (10.0, 30.0),
        time_guess_min: (0.0, 20.0),
    };
    let cruise = Segment {
        num_segments: 3,
        use_polynomial_control: true,
        mach: (0.38, 0.38),
        mach_bounds: (0.36, 0.4),
        altitude_ft: (25_000.0, 25_000.0),
        altitude_bounds_ft: (24_500.0, 25_500.0),
        throttle_enforcement: ThrottleEnforcement::BoundaryConstraint,
        fix_initial: false,
        constrain_final: false,
        initial_bounds_min: (10.0, 30.0),
        duration_bounds_min: (100.0, 300.0),
        time_guess_min: (20.0, 200.0),
    };
    let descent = Segment {
        num_segments: 3,
        use_polynomial_control: true,
        mach: (0.38, 0.1),
        mach_bounds: (0.08, 0.4),
        altitude_ft: (25_000.0, 1_500.0),
        altitude_bounds_ft: (1_000.0, 25_500.0),
        throttle_enforcement: ThrottleEnforcement::PathConstraint,
        fix_initial: false,
        constrain_final: true,
        initial_bounds_min: (110.0, 330.0),
        duration_bounds_min: (10.0, 30.0),
        time_guess_min: (220.0, 20.0),
    };

    MissionBuilder::new()
        .pre_mission(PreMission {
            include_takeoff: false,
            optimize_mass: true,
        })
        .phase(climb.into_phase("climb_1"))
        .phase(cruise.into_phase("cruise_1"))
        .phase(descent.into_phase("descent_1"))
        .post_mission(PostMission {
            include_landing: false,
            constrain_range: true,
            target_range: Quantity::new(214.0, Unit::NauticalMiles),
        })
        .build()
}

/// [`dornier228_validation`] with its IPOPT fuel-burn run settings.
pub fn dornier228_scenario() -> Result<ScenarioConfig, ValidationError> {
    let run = RunSettings {
        aircraft: "dornier.csv".into(),
        analysis_scheme: AnalysisScheme::Collocation,
        driver: DriverSettings {
            optimizer: Optimizer::Ipopt,
            max_iter: 500,
        },
        objective: ObjectiveSettings {
            objective_type: ObjectiveType::FuelBurned,
            reference: None,
        },
        recording: RecordingSettings {
            record_filename: "aviary_history.db".into(),
            restart_filename: None,
            make_plots: true,
            suppress_solver_print: false,
        },
        diagnostics: DiagnosticSettings::default(),
    };
    Ok(
        ScenarioConfig::new("dornier228_validation", run, dornier228_validation()?)?
            .with_description("Dornier 228 validation mission, minimum fuel burned"),
    )
}

/// [`do228_level2`] with its SLSQP mass-objective run settings.
pub fn do228_level2_scenario() -> Result<ScenarioConfig, ValidationError> {
    let run = RunSettings {
        aircraft: "dornier_aircraft.csv".into(),
        analysis_scheme: AnalysisScheme::Collocation,
        driver: DriverSettings {
            optimizer: Optimizer::Slsqp,
            max_iter: 1000,
        },
        objective: ObjectiveSettings {
            objective_type: ObjectiveType::Mass,
            reference: Some(-1e5),
        },
        recording: RecordingSettings {
            record_filename: "do228_level2.db".into(),
            restart_filename: None,
            make_plots: true,
            suppress_solver_print: true,
        },
        diagnostics: DiagnosticSettings {
            check_nan: false,
            optimize: true,
        },
    };
    Ok(
        ScenarioConfig::new("do228_level2", run, do228_level2()?)?
            .with_description("Dornier 228 coupled design-mission optimization"),
    )
}
