//! Engine that walks the lifecycle without solving anything.
//!
//! It exposes the configured mission values as model inputs so the
//! diagnostics have something real to scan, and reports every headline
//! output as not computed.

use mission_config::{
    DriverSettings, MissionConfig, ObjectiveSettings, RecordingSettings, RunSettings,
};
use mission_core::Unit;
use mission_diagnostics::NamedValue;
use tracing::info;

use crate::engine::{EngineError, OptimizationEngine};

#[derive(Debug, Default)]
pub struct DryRunEngine {
    mission: Option<MissionConfig>,
    run: Option<RunSettings>,
    calls: Vec<&'static str>,
    set_up: bool,
    model_evaluated: bool,
}

impl DryRunEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle methods invoked so far, in call order.
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    fn mission(&self) -> Result<&MissionConfig, EngineError> {
        self.mission
            .as_ref()
            .ok_or_else(|| EngineError::Failed("no inputs loaded".to_string()))
    }

    fn record(&mut self, call: &'static str) -> Result<(), EngineError> {
        self.mission()?;
        self.calls.push(call);
        Ok(())
    }
}

fn bounds_in(bounds: &mission_config::Bounds, unit: Unit) -> Vec<f64> {
    match bounds.in_unit(unit) {
        Ok((low, high)) => vec![low, high],
        Err(_) => vec![f64::NAN, f64::NAN],
    }
}

fn quantity_in(quantity: &mission_config::Quantity, unit: Unit) -> f64 {
    quantity.in_unit(unit).unwrap_or(f64::NAN)
}

impl OptimizationEngine for DryRunEngine {
    fn load_inputs(
        &mut self,
        run: &RunSettings,
        mission: &MissionConfig,
    ) -> Result<(), EngineError> {
        self.mission = Some(mission.clone());
        self.run = Some(run.clone());
        self.calls.push("load_inputs");
        Ok(())
    }

    fn check_and_preprocess_inputs(&mut self) -> Result<(), EngineError> {
        self.record("check_and_preprocess_inputs")
    }

    fn add_pre_mission_systems(&mut self) -> Result<(), EngineError> {
        self.record("add_pre_mission_systems")
    }

    fn add_phases(&mut self) -> Result<(), EngineError> {
        self.record("add_phases")
    }

    fn add_post_mission_systems(&mut self) -> Result<(), EngineError> {
        self.record("add_post_mission_systems")
    }

    fn link_phases(&mut self) -> Result<(), EngineError> {
        self.record("link_phases")
    }

    fn add_driver(&mut self, _driver: &DriverSettings) -> Result<(), EngineError> {
        self.record("add_driver")
    }

    fn add_design_variables(&mut self) -> Result<(), EngineError> {
        self.record("add_design_variables")
    }

    fn add_objective(&mut self, _objective: &ObjectiveSettings) -> Result<(), EngineError> {
        self.record("add_objective")
    }

    fn setup(&mut self) -> Result<(), EngineError> {
        self.record("setup")?;
        self.set_up = true;
        Ok(())
    }

    fn set_initial_guesses(&mut self) -> Result<(), EngineError> {
        self.record("set_initial_guesses")
    }

    fn list_inputs(&self) -> Result<Vec<NamedValue>, EngineError> {
        if !self.set_up {
            return Err(EngineError::Failed("model has not been set up".to_string()));
        }
        let mission = self.mission()?;
        let mut inputs = Vec::new();
        for phase in mission.phases() {
            let opts = &phase.user_options;
            let prefix = format!("traj.{}", phase.name);
            inputs.push(NamedValue::from_vec(
                format!("{prefix}.mach_bounds"),
                bounds_in(&opts.mach_bounds, Unit::Unitless),
            ));
            inputs.push(NamedValue::from_vec(
                format!("{prefix}.mach"),
                vec![
                    quantity_in(&opts.initial_mach, Unit::Unitless),
                    quantity_in(&opts.final_mach, Unit::Unitless),
                ],
            ));
            inputs.push(NamedValue::from_vec(
                format!("{prefix}.altitude_bounds"),
                bounds_in(&opts.altitude_bounds, Unit::Feet),
            ));
            inputs.push(NamedValue::from_vec(
                format!("{prefix}.altitude"),
                vec![
                    quantity_in(&opts.initial_altitude, Unit::Feet),
                    quantity_in(&opts.final_altitude, Unit::Feet),
                ],
            ));
            inputs.push(NamedValue::from_vec(
                format!("{prefix}.duration_bounds"),
                bounds_in(&opts.duration_bounds, Unit::Minutes),
            ));
        }
        inputs.push(NamedValue::scalar(
            "mission:design:range",
            quantity_in(&mission.post_mission().target_range, Unit::NauticalMiles),
        ));
        Ok(inputs)
    }

    fn run_model(&mut self) -> Result<(), EngineError> {
        if !self.set_up {
            return Err(EngineError::Failed("model has not been set up".to_string()));
        }
        self.calls.push("run_model");
        self.model_evaluated = true;
        Ok(())
    }

    fn list_outputs(&self) -> Result<Vec<NamedValue>, EngineError> {
        if !self.model_evaluated {
            return Err(EngineError::Failed("model has not been run".to_string()));
        }
        let mission = self.mission()?;
        Ok(mission
            .phases()
            .iter()
            .filter_map(|phase| {
                let (initial, duration) = phase.time_guess_minutes()?;
                Some(NamedValue::from_vec(
                    format!("traj.{}.timeseries.time", phase.name),
                    vec![initial, initial + duration],
                ))
            })
            .collect())
    }

    fn run_optimization(&mut self, recording: &RecordingSettings) -> Result<(), EngineError> {
        self.record("run_optimization")?;
        let optimizer = self
            .run
            .as_ref()
            .map(|run| run.driver.optimizer.to_string())
            .unwrap_or_default();
        info!(
            %optimizer,
            record = %recording.record_filename.display(),
            "dry run: optimizer not attached, nothing recorded"
        );
        Ok(())
    }

    fn get_val(&self, name: &str, _unit: Unit) -> Result<Vec<f64>, EngineError> {
        Err(EngineError::MissingOutput(name.to_string()))
    }
}
