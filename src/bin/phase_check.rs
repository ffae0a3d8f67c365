use std::path::PathBuf;

use clap::Parser;
use mission_runner::config::continuity;
use mission_runner::export::{phases, writer_for_path};
use mission_runner::scenario::{self, SCENARIO_DIR};
use tracing_subscriber::EnvFilter;

/// Validate a scenario and print its phase table and timing gaps.
#[derive(Parser, Debug)]
#[command(author, version, about = "Mission phase validator and table exporter")]
struct Cli {
    /// Scenario name from the catalog, or a path to a scenario file
    #[arg(long)]
    scenario: String,

    /// Scenario catalog directory
    #[arg(long, default_value = SCENARIO_DIR)]
    catalog: PathBuf,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scenario = scenario::load(&cli.scenario, &cli.catalog)?;
    let mission = scenario.mission();

    let mut writer = writer_for_path(&cli.output)?;
    phases::write_phase_table(writer.as_mut(), mission)?;
    drop(writer);

    let gaps = continuity::check(mission);
    if gaps.is_empty() {
        eprintln!(
            "{}: {} phases valid, adjacent timing windows overlap",
            scenario.name(),
            mission.phases().len()
        );
    } else {
        eprintln!(
            "{}: {} phases valid, {} timing gap(s):",
            scenario.name(),
            mission.phases().len(),
            gaps.len()
        );
        for gap in &gaps {
            eprintln!("  {gap}");
        }
    }

    Ok(())
}
