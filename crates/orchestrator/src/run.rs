//! Run orchestrator: drives the engine through the fixed lifecycle.

use std::io::Write;

use mission_config::continuity::{self, ContinuityGap};
use mission_config::{MissionConfig, RunSettings, ScenarioConfig};
use mission_diagnostics::{self as diagnostics, Finding};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::engine::{EngineError, OptimizationEngine};
use crate::error::OrchestratorError;
use crate::lifecycle::{Lifecycle, Stage};
use crate::results::{self, RunResult};

/// What the optimization stage ended with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveOutcome {
    Completed,
    /// The engine rejected a value mid-solve; the run went on to retrieval.
    Failed { message: String },
    Skipped,
}

/// Everything a run produced, in the order it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub stages: Vec<Stage>,
    pub continuity_gaps: Vec<ContinuityGap>,
    pub input_findings: Vec<Finding>,
    pub output_findings: Vec<Finding>,
    pub solve: SolveOutcome,
    pub results: RunResult,
}

impl RunReport {
    pub fn reached(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

fn step(
    lifecycle: &mut Lifecycle,
    stage: Stage,
    action: impl FnOnce() -> Result<(), EngineError>,
) -> Result<(), OrchestratorError> {
    lifecycle.ensure_next(stage)?;
    action().map_err(|source| OrchestratorError::Stage { stage, source })?;
    lifecycle.complete(stage)?;
    debug!(%stage, "lifecycle stage complete");
    Ok(())
}

/// Run `scenario` through `engine`, printing diagnostics to `console`.
pub fn run_scenario<E>(
    engine: &mut E,
    scenario: &ScenarioConfig,
    console: &mut dyn Write,
) -> Result<RunReport, OrchestratorError>
where
    E: OptimizationEngine + ?Sized,
{
    run_mission(engine, scenario.mission(), scenario.run(), console)
}

/// Drive `engine` from `Created` to `ResultsRetrieved`.
///
/// Setup-side engine failures abort the run. A rejected value during the
/// optimization stage is logged and the run proceeds to result retrieval,
/// where each missing output becomes [`results::Output::NotComputed`].
pub fn run_mission<E>(
    engine: &mut E,
    mission: &MissionConfig,
    run: &RunSettings,
    console: &mut dyn Write,
) -> Result<RunReport, OrchestratorError>
where
    E: OptimizationEngine + ?Sized,
{
    let continuity_gaps = continuity::check(mission);
    for gap in &continuity_gaps {
        warn!(%gap, "phase timing windows do not overlap");
    }

    info!(
        phases = mission.phases().len(),
        optimizer = %run.driver.optimizer,
        max_iter = run.driver.max_iter,
        objective = %run.objective.objective_type,
        "starting mission run"
    );

    let mut lifecycle = Lifecycle::new();

    step(&mut lifecycle, Stage::InputsLoaded, || {
        engine.load_inputs(run, mission)
    })?;
    step(&mut lifecycle, Stage::Preprocessed, || {
        engine.check_and_preprocess_inputs()
    })?;
    step(&mut lifecycle, Stage::PreMissionBuilt, || {
        engine.add_pre_mission_systems()
    })?;
    step(&mut lifecycle, Stage::PhasesBuilt, || engine.add_phases())?;
    step(&mut lifecycle, Stage::PostMissionBuilt, || {
        engine.add_post_mission_systems()
    })?;
    step(&mut lifecycle, Stage::PhasesLinked, || engine.link_phases())?;
    step(&mut lifecycle, Stage::DriverConfigured, || {
        engine.add_driver(&run.driver)
    })?;
    step(&mut lifecycle, Stage::DesignVariablesSet, || {
        engine.add_design_variables()
    })?;
    step(&mut lifecycle, Stage::ObjectiveSet, || {
        engine.add_objective(&run.objective)
    })?;
    step(&mut lifecycle, Stage::SetUp, || engine.setup())?;
    step(&mut lifecycle, Stage::InitialGuessesSet, || {
        engine.set_initial_guesses()
    })?;

    let mut input_findings = Vec::new();
    let mut output_findings = Vec::new();
    if run.diagnostics.check_nan {
        lifecycle.ensure_next(Stage::ModelRun)?;
        let stage_error = |source| OrchestratorError::Stage {
            stage: Stage::ModelRun,
            source,
        };

        writeln!(console, "Checking inputs for NaN values:")?;
        let inputs = engine.list_inputs().map_err(stage_error)?;
        input_findings = diagnostics::scan("input", &inputs, console)?;

        writeln!(
            console,
            "Running model without optimizer to check for NaN propagation."
        )?;
        engine.run_model().map_err(stage_error)?;

        writeln!(console, "Checking outputs for NaN values:")?;
        let outputs = engine.list_outputs().map_err(stage_error)?;
        output_findings = diagnostics::scan("output", &outputs, console)?;

        if !input_findings.is_empty() || !output_findings.is_empty() {
            warn!(
                inputs = input_findings.len(),
                outputs = output_findings.len(),
                "non-finite values found before optimization"
            );
        }
        lifecycle.complete(Stage::ModelRun)?;
    }

    let solve = if run.diagnostics.optimize {
        lifecycle.ensure_next(Stage::OptimizationRun)?;
        let outcome = match engine.run_optimization(&run.recording) {
            Ok(()) => SolveOutcome::Completed,
            Err(EngineError::InvalidValue(message)) => {
                warn!(error = message.as_str(), "optimization run failed");
                writeln!(console, "Error during optimization run: {message}")?;
                SolveOutcome::Failed { message }
            }
            Err(source) => {
                return Err(OrchestratorError::Stage {
                    stage: Stage::OptimizationRun,
                    source,
                });
            }
        };
        lifecycle.complete(Stage::OptimizationRun)?;
        outcome
    } else {
        SolveOutcome::Skipped
    };

    lifecycle.ensure_next(Stage::ResultsRetrieved)?;
    let results = results::retrieve(&*engine);
    results::write_headline(&results, console)?;
    lifecycle.complete(Stage::ResultsRetrieved)?;

    info!(solve = ?solve, complete = results.all_available(), "mission run finished");

    Ok(RunReport {
        stages: lifecycle.into_trace(),
        continuity_gaps,
        input_findings,
        output_findings,
        solve,
        results,
    })
}
