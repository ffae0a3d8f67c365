use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use mission_runner::export::summary::{self, Metadata};
use mission_runner::orchestrator::{DryRunEngine, SolveOutcome, run_mission};
use mission_runner::scenario::{self, SCENARIO_DIR};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Mission run orchestrator (validates, walks the engine lifecycle, reports)"
)]
struct Cli {
    /// Scenario name from the catalog, or a path to a scenario file
    #[arg(long, required_unless_present = "list")]
    scenario: Option<String>,

    /// Scenario catalog directory
    #[arg(long, default_value = SCENARIO_DIR)]
    catalog: PathBuf,

    /// List catalog scenarios and exit
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Skip the input/output NaN check and the diagnostic model run
    #[arg(long, default_value_t = false)]
    skip_nan_check: bool,

    /// Skip the optimization stage
    #[arg(long, default_value_t = false)]
    skip_optimization: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.list {
        for name in scenario::list(&cli.catalog)? {
            println!("{name}");
        }
        return Ok(());
    }

    let name = cli
        .scenario
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--scenario is required"))?;
    let scenario = scenario::load(name, &cli.catalog)?;
    let mission = scenario.mission();

    let mut run = scenario.run().clone();
    if cli.skip_nan_check {
        run.diagnostics.check_nan = false;
    }
    if cli.skip_optimization {
        run.diagnostics.optimize = false;
    }

    let stdout = std::io::stdout();
    let mut console = stdout.lock();

    writeln!(console, "=== Mission Run ===")?;
    writeln!(console, "Scenario       : {}", scenario.name())?;
    if let Some(description) = scenario.description() {
        writeln!(console, "Description    : {description}")?;
    }
    writeln!(
        console,
        "Phases         : {}",
        mission.phase_names().collect::<Vec<_>>().join(" -> ")
    )?;
    writeln!(
        console,
        "Driver         : {} (max_iter = {}), objective = {}",
        run.driver.optimizer, run.driver.max_iter, run.objective.objective_type
    )?;

    let mut engine = DryRunEngine::new();
    let report = run_mission(&mut engine, mission, &run, &mut console)?;

    for gap in &report.continuity_gaps {
        writeln!(console, "Continuity gap : {gap}")?;
    }
    let trace: Vec<String> = report.stages.iter().map(ToString::to_string).collect();
    writeln!(console, "Stages         : {}", trace.join(" -> "))?;
    let solve = match &report.solve {
        SolveOutcome::Completed => "completed".to_string(),
        SolveOutcome::Failed { message } => format!("failed ({message})"),
        SolveOutcome::Skipped => "skipped".to_string(),
    };
    writeln!(console, "Optimization   : {solve}")?;
    console.flush()?;

    if let Some(path) = &cli.summary {
        let meta = Metadata {
            scenario: scenario.name(),
            aircraft: &run.aircraft,
            optimizer: run.driver.optimizer.to_string(),
            objective: run.objective.objective_type.to_string(),
            max_iter: run.driver.max_iter,
        };
        summary::write_summary(path, &meta, &report)?;
        tracing::info!(path = %path.display(), "run summary written");
    }

    Ok(())
}
