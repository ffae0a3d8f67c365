use std::cell::RefCell;
use std::collections::BTreeMap;

use approx::assert_relative_eq;
use mission_runner::config::presets::{do228_level2_scenario, dornier228_scenario};
use mission_runner::config::{
    DriverSettings, MissionConfig, ObjectiveSettings, RecordingSettings, RunSettings,
    ScenarioConfig, Unit,
};
use mission_runner::diagnostics::NamedValue;
use mission_runner::orchestrator::results::{DESIGN_FUEL_MASS, FUEL_BURNED, TOTAL_FUEL_MASS};
use mission_runner::orchestrator::{
    DryRunEngine, EngineError, Lifecycle, OptimizationEngine, OrchestratorError, Output, Stage,
    SolveOutcome, run_mission, run_scenario,
};

const SETUP_CALLS: [&str; 11] = [
    "load_inputs",
    "check_and_preprocess_inputs",
    "add_pre_mission_systems",
    "add_phases",
    "add_post_mission_systems",
    "link_phases",
    "add_driver",
    "add_design_variables",
    "add_objective",
    "setup",
    "set_initial_guesses",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Solve {
    Converge,
    RejectValue,
    Crash,
}

/// Engine double that records every call and replays scripted outcomes.
struct ScriptedEngine {
    calls: RefCell<Vec<&'static str>>,
    fail_at: Option<&'static str>,
    solve: Solve,
    nan_output: bool,
    /// Outputs in kilograms, returned only after a converged solve.
    outputs_kg: BTreeMap<&'static str, f64>,
    converged: bool,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_at: None,
            solve: Solve::Converge,
            nan_output: false,
            outputs_kg: BTreeMap::from([
                (DESIGN_FUEL_MASS, 800.0),
                (TOTAL_FUEL_MASS, 820.0),
                (FUEL_BURNED, 612.345_678),
            ]),
            converged: false,
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn call(&self, name: &'static str) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(name);
        if self.fail_at == Some(name) {
            return Err(EngineError::Failed(format!("{name} exploded")));
        }
        Ok(())
    }
}

impl OptimizationEngine for ScriptedEngine {
    fn load_inputs(
        &mut self,
        _run: &RunSettings,
        _mission: &MissionConfig,
    ) -> Result<(), EngineError> {
        self.call("load_inputs")
    }

    fn check_and_preprocess_inputs(&mut self) -> Result<(), EngineError> {
        self.call("check_and_preprocess_inputs")
    }

    fn add_pre_mission_systems(&mut self) -> Result<(), EngineError> {
        self.call("add_pre_mission_systems")
    }

    fn add_phases(&mut self) -> Result<(), EngineError> {
        self.call("add_phases")
    }

    fn add_post_mission_systems(&mut self) -> Result<(), EngineError> {
        self.call("add_post_mission_systems")
    }

    fn link_phases(&mut self) -> Result<(), EngineError> {
        self.call("link_phases")
    }

    fn add_driver(&mut self, _driver: &DriverSettings) -> Result<(), EngineError> {
        self.call("add_driver")
    }

    fn add_design_variables(&mut self) -> Result<(), EngineError> {
        self.call("add_design_variables")
    }

    fn add_objective(&mut self, _objective: &ObjectiveSettings) -> Result<(), EngineError> {
        self.call("add_objective")
    }

    fn setup(&mut self) -> Result<(), EngineError> {
        self.call("setup")
    }

    fn set_initial_guesses(&mut self) -> Result<(), EngineError> {
        self.call("set_initial_guesses")
    }

    fn list_inputs(&self) -> Result<Vec<NamedValue>, EngineError> {
        self.call("list_inputs")?;
        Ok(vec![NamedValue::from_vec("traj.climb_1.mach", vec![0.1, 0.38])])
    }

    fn run_model(&mut self) -> Result<(), EngineError> {
        self.call("run_model")
    }

    fn list_outputs(&self) -> Result<Vec<NamedValue>, EngineError> {
        self.call("list_outputs")?;
        let burned = if self.nan_output { f64::NAN } else { 600.0 };
        Ok(vec![
            NamedValue::scalar("fuel_burned", burned),
            NamedValue::from_vec("altitude", vec![1000.0, 2000.0]),
        ])
    }

    fn run_optimization(&mut self, _recording: &RecordingSettings) -> Result<(), EngineError> {
        self.call("run_optimization")?;
        match self.solve {
            Solve::Converge => {
                self.converged = true;
                Ok(())
            }
            Solve::RejectValue => Err(EngineError::InvalidValue(
                "objective evaluated to NaN".into(),
            )),
            Solve::Crash => Err(EngineError::Failed("driver segfault".into())),
        }
    }

    fn get_val(&self, name: &str, unit: Unit) -> Result<Vec<f64>, EngineError> {
        if !self.converged {
            return Err(EngineError::MissingOutput(name.to_string()));
        }
        let kg = self
            .outputs_kg
            .get(name)
            .ok_or_else(|| EngineError::MissingOutput(name.to_string()))?;
        let value = Unit::Kilograms
            .convert(*kg, unit)
            .map_err(|err| EngineError::Failed(err.to_string()))?;
        Ok(vec![value])
    }
}

fn scenario() -> ScenarioConfig {
    dornier228_scenario().expect("dornier preset")
}

#[test]
fn full_run_calls_engine_in_lifecycle_order() {
    let mut engine = ScriptedEngine::new();
    let mut console = Vec::new();
    let report = run_scenario(&mut engine, &scenario(), &mut console).expect("run");

    let mut expected: Vec<&str> = SETUP_CALLS.to_vec();
    expected.extend(["list_inputs", "run_model", "list_outputs", "run_optimization"]);
    assert_eq!(engine.calls(), expected);

    assert_eq!(report.stages, Stage::SEQUENCE);
    assert!(report.reached(Stage::SetUp));
    assert_eq!(report.solve, SolveOutcome::Completed);
    assert!(report.results.all_available());
    assert!(report.input_findings.is_empty());
    assert!(report.output_findings.is_empty());
}

#[test]
fn converged_run_prints_headline_in_requested_units() {
    let mut engine = ScriptedEngine::new();
    let mut console = Vec::new();
    let report = run_scenario(&mut engine, &scenario(), &mut console).expect("run");

    let kg = *report.results.fuel_burned_kg.value().expect("kg");
    let lb = *report.results.fuel_burned_lb.value().expect("lb");
    assert_relative_eq!(kg, 612.345_678);
    assert_relative_eq!(lb, 612.345_678 / 0.453_592_37, epsilon = 1e-9);

    let text = String::from_utf8(console).expect("utf-8 console");
    assert!(text.contains("The optimization objective \"fuel burned\" is: 612.34568 kg / "));
    assert!(text.contains("Fuel Mass: "));
    assert!(text.contains("Total Fuel Mass: "));
}

#[test]
fn console_shows_nan_check_banners_in_order() {
    let mut engine = ScriptedEngine::new();
    engine.nan_output = true;
    let mut console = Vec::new();
    let report = run_scenario(&mut engine, &scenario(), &mut console).expect("run");

    let text = String::from_utf8(console).expect("utf-8 console");
    let inputs = text.find("Checking inputs for NaN values:").expect("input banner");
    let model = text
        .find("Running model without optimizer to check for NaN propagation.")
        .expect("model banner");
    let outputs = text.find("Checking outputs for NaN values:").expect("output banner");
    let flagged = text
        .find("NaN/Inf detected in output: fuel_burned")
        .expect("flagged output");
    assert!(inputs < model && model < outputs && outputs < flagged);
    assert_eq!(text.matches("NaN/Inf detected").count(), 1);

    assert_eq!(report.output_findings.len(), 1);
    assert_eq!(report.output_findings[0].name, "fuel_burned");
    // NaN findings are diagnostic only; the solve still runs.
    assert_eq!(report.solve, SolveOutcome::Completed);
}

#[test]
fn rejected_value_during_solve_still_reaches_results() {
    let mut engine = ScriptedEngine::new();
    engine.solve = Solve::RejectValue;
    let mut console = Vec::new();
    let report = run_scenario(&mut engine, &scenario(), &mut console).expect("run");

    assert_eq!(
        report.solve,
        SolveOutcome::Failed {
            message: "objective evaluated to NaN".into()
        }
    );
    assert!(report.reached(Stage::OptimizationRun));
    assert!(report.reached(Stage::ResultsRetrieved));
    assert!(!report.results.all_available());
    assert!(matches!(
        &report.results.fuel_burned_kg,
        Output::NotComputed { reason } if reason.contains(FUEL_BURNED)
    ));

    let text = String::from_utf8(console).expect("utf-8 console");
    assert!(text.contains("Error during optimization run: objective evaluated to NaN"));
    assert!(text.contains("Fuel Burned: not computed"));
}

#[test]
fn other_solver_errors_are_fatal() {
    let mut engine = ScriptedEngine::new();
    engine.solve = Solve::Crash;
    let mut console = Vec::new();
    let err = run_scenario(&mut engine, &scenario(), &mut console).unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::Stage {
            stage: Stage::OptimizationRun,
            source: EngineError::Failed(_),
        }
    ));
}

#[test]
fn setup_failure_stops_the_run() {
    let mut engine = ScriptedEngine::new();
    engine.fail_at = Some("link_phases");
    let mut console = Vec::new();
    let err = run_scenario(&mut engine, &scenario(), &mut console).unwrap_err();
    match err {
        OrchestratorError::Stage { stage, source } => {
            assert_eq!(stage, Stage::PhasesLinked);
            assert_eq!(source.to_string(), "link_phases exploded");
        }
        other => panic!("expected stage failure, got {other:?}"),
    }
    assert_eq!(engine.calls().last(), Some(&"link_phases"));
    assert!(!engine.calls().contains(&"add_driver"));
    assert!(console.is_empty());
}

#[test]
fn disabled_stages_are_skipped() {
    let scenario = scenario();
    let mut run = scenario.run().clone();
    run.diagnostics.check_nan = false;
    run.diagnostics.optimize = false;

    let mut engine = ScriptedEngine::new();
    let mut console = Vec::new();
    let report = run_mission(&mut engine, scenario.mission(), &run, &mut console).expect("run");

    assert_eq!(engine.calls(), SETUP_CALLS);
    assert_eq!(report.solve, SolveOutcome::Skipped);
    assert!(!report.reached(Stage::ModelRun));
    assert!(!report.reached(Stage::OptimizationRun));
    assert_eq!(report.stages.last(), Some(&Stage::ResultsRetrieved));
    assert_eq!(report.stages.len(), Stage::SEQUENCE.len() - 2);
}

#[test]
fn level2_scenario_skips_only_the_nan_check() {
    let scenario = do228_level2_scenario().expect("level2 preset");
    let mut engine = ScriptedEngine::new();
    let mut console = Vec::new();
    let report = run_scenario(&mut engine, &scenario, &mut console).expect("run");

    assert!(!report.reached(Stage::ModelRun));
    assert!(report.reached(Stage::OptimizationRun));
    assert!(!engine.calls().contains(&"run_model"));
    let text = String::from_utf8(console).expect("utf-8 console");
    assert!(!text.contains("Checking inputs for NaN values:"));
}

#[test]
fn lifecycle_rejects_out_of_order_transitions() {
    let mut lifecycle = Lifecycle::new();
    assert_eq!(lifecycle.current(), Stage::Created);
    assert!(matches!(
        lifecycle.complete(Stage::SetUp),
        Err(OrchestratorError::OutOfOrder {
            from: Stage::Created,
            to: Stage::SetUp,
        })
    ));
    assert_eq!(lifecycle.trace(), [Stage::Created]);

    for stage in &Stage::SEQUENCE[1..12] {
        lifecycle.complete(*stage).expect("setup stage");
    }
    assert_eq!(lifecycle.current(), Stage::InitialGuessesSet);

    // Both optional stages may be skipped, but nothing may repeat.
    assert!(lifecycle.ensure_next(Stage::ResultsRetrieved).is_ok());
    assert!(lifecycle.ensure_next(Stage::InitialGuessesSet).is_err());
    lifecycle
        .complete(Stage::OptimizationRun)
        .expect("skip model run");
    assert!(lifecycle.complete(Stage::ModelRun).is_err());
    lifecycle
        .complete(Stage::ResultsRetrieved)
        .expect("retrieve results");
    assert!(lifecycle.complete(Stage::ResultsRetrieved).is_err());
}

#[test]
fn only_model_and_optimization_runs_are_optional() {
    let optional: Vec<Stage> = Stage::SEQUENCE
        .into_iter()
        .filter(|stage| stage.is_optional())
        .collect();
    assert_eq!(optional, [Stage::ModelRun, Stage::OptimizationRun]);
    assert!(Stage::ObjectiveSet.may_precede(Stage::SetUp));
    assert!(!Stage::ObjectiveSet.may_precede(Stage::InitialGuessesSet));
}

#[test]
fn dry_run_engine_walks_every_stage() {
    let scenario = scenario();
    let mut engine = DryRunEngine::new();
    let mut console = Vec::new();
    let report = run_scenario(&mut engine, &scenario, &mut console).expect("dry run");

    assert_eq!(report.stages, Stage::SEQUENCE);
    assert_eq!(report.solve, SolveOutcome::Completed);
    assert!(report.input_findings.is_empty());
    assert!(report.output_findings.is_empty());
    assert!(matches!(
        report.results.total_fuel_mass_lbm,
        Output::NotComputed { .. }
    ));
    assert_eq!(engine.calls().first(), Some(&"load_inputs"));
    assert_eq!(engine.calls().last(), Some(&"run_optimization"));

    let text = String::from_utf8(console).expect("utf-8 console");
    assert!(text.contains("Fuel Mass: not computed"));
}

#[test]
fn dry_run_engine_refuses_calls_before_loading() {
    let mut engine = DryRunEngine::new();
    assert!(matches!(engine.add_phases(), Err(EngineError::Failed(_))));
    assert!(engine.list_inputs().is_err());
    assert!(engine.run_model().is_err());
}
