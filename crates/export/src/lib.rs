//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod phases {
    use std::io::{self, Write};

    use csv::Writer;
    use mission_config::{MissionConfig, PhaseConfig};
    use mission_core::Unit;

    const HEADER: [&str; 14] = [
        "phase",
        "num_segments",
        "order",
        "throttle_enforcement",
        "mach_low",
        "mach_high",
        "altitude_low_ft",
        "altitude_high_ft",
        "initial_low_min",
        "initial_high_min",
        "duration_low_min",
        "duration_high_min",
        "guess_initial_min",
        "guess_duration_min",
    ];

    /// Write the standard phase-table CSV header.
    pub fn write_header<W: Write>(writer: &mut Writer<W>) -> csv::Result<()> {
        writer.write_record(HEADER)
    }

    /// One CSV row per mission phase, bounds normalized to feet and minutes.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub phase: &'a str,
        pub num_segments: u32,
        pub order: u32,
        pub throttle_enforcement: &'a str,
        pub mach: (f64, f64),
        pub altitude_ft: (f64, f64),
        pub initial_min: (f64, f64),
        pub duration_min: (f64, f64),
        pub time_guess_min: Option<(f64, f64)>,
    }

    impl<'a> Record<'a> {
        pub fn from_phase(phase: &'a PhaseConfig) -> Self {
            let opts = &phase.user_options;
            let pair = |b: &mission_config::Bounds, unit| b.in_unit(unit).unwrap_or((b.low, b.high));
            Self {
                phase: &phase.name,
                num_segments: opts.num_segments,
                order: opts.order,
                throttle_enforcement: opts.throttle_enforcement.label(),
                mach: pair(&opts.mach_bounds, Unit::Unitless),
                altitude_ft: pair(&opts.altitude_bounds, Unit::Feet),
                initial_min: pair(&opts.initial_bounds, Unit::Minutes),
                duration_min: pair(&opts.duration_bounds, Unit::Minutes),
                time_guess_min: phase.time_guess_minutes(),
            }
        }

        fn fields(&self) -> [String; 14] {
            let (guess_initial, guess_duration) = match self.time_guess_min {
                Some((initial, duration)) => (format!("{initial:.3}"), format!("{duration:.3}")),
                None => (String::new(), String::new()),
            };
            [
                self.phase.to_string(),
                self.num_segments.to_string(),
                self.order.to_string(),
                self.throttle_enforcement.to_string(),
                format!("{:.4}", self.mach.0),
                format!("{:.4}", self.mach.1),
                format!("{:.1}", self.altitude_ft.0),
                format!("{:.1}", self.altitude_ft.1),
                format!("{:.3}", self.initial_min.0),
                format!("{:.3}", self.initial_min.1),
                format!("{:.3}", self.duration_min.0),
                format!("{:.3}", self.duration_min.1),
                guess_initial,
                guess_duration,
            ]
        }

        /// Serialize the record as one CSV row, matching the standard header ordering.
        /// Phase names are quoted when they contain delimiters.
        pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> csv::Result<()> {
            writer.write_record(self.fields())
        }
    }

    /// Write header and one row per phase, in flight order.
    pub fn write_phase_table(writer: &mut dyn Write, mission: &MissionConfig) -> io::Result<()> {
        let mut table = Writer::from_writer(writer);
        write_header(&mut table)?;
        for phase in mission.phases() {
            Record::from_phase(phase).write_to(&mut table)?;
        }
        table.flush()
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Identifies the scenario a summary belongs to.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub scenario: &'a str,
        pub aircraft: &'a Path,
        pub optimizer: String,
        pub objective: String,
        pub max_iter: u32,
    }

    #[derive(Serialize)]
    struct SummarySidecar<'a, R: Serialize> {
        scenario: &'a str,
        aircraft: String,
        optimizer: &'a str,
        objective: &'a str,
        max_iter: u32,
        generated_utc: String,
        report: &'a R,
    }

    /// Write a pretty JSON summary of `report` next to its metadata.
    pub fn write_summary<R: Serialize>(
        output: &Path,
        meta: &Metadata<'_>,
        report: &R,
    ) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let sidecar = SummarySidecar {
            scenario: meta.scenario,
            aircraft: meta.aircraft.display().to_string(),
            optimizer: &meta.optimizer,
            objective: &meta.objective,
            max_iter: meta.max_iter,
            generated_utc: chrono::Utc::now().to_rfc3339(),
            report,
        };

        to_writer_pretty(File::create(output)?, &sidecar)?;
        Ok(())
    }
}
