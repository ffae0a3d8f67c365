//! Headline quantities read back after a run.

use std::io::{self, Write};

use mission_core::{Unit, format_rounded};
use serde::Serialize;
use tracing::warn;

use crate::engine::OptimizationEngine;

pub const DESIGN_FUEL_MASS: &str = "mission:design:fuel_mass";
pub const TOTAL_FUEL_MASS: &str = "mission:summary:total_fuel_mass";
pub const FUEL_BURNED: &str = "mission:summary:fuel_burned";

/// A queried output that may not exist, e.g. after a failed solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Output<T> {
    Available(T),
    NotComputed { reason: String },
}

impl<T> Output<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Output::Available(value) => Some(value),
            Output::NotComputed { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Output::Available(_))
    }
}

/// Design fuel mass, total fuel mass, and fuel burned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub design_fuel_mass_lbm: Output<f64>,
    pub total_fuel_mass_lbm: Output<f64>,
    pub fuel_burned_kg: Output<f64>,
    pub fuel_burned_lb: Output<f64>,
}

impl RunResult {
    pub fn all_available(&self) -> bool {
        self.design_fuel_mass_lbm.is_available()
            && self.total_fuel_mass_lbm.is_available()
            && self.fuel_burned_kg.is_available()
            && self.fuel_burned_lb.is_available()
    }
}

fn query<E>(engine: &E, name: &str, unit: Unit) -> Output<f64>
where
    E: OptimizationEngine + ?Sized,
{
    let output = match engine.get_val(name, unit) {
        Ok(values) => match values.first() {
            Some(value) => Output::Available(*value),
            None => Output::NotComputed {
                reason: format!("`{name}` returned no values"),
            },
        },
        Err(err) => Output::NotComputed {
            reason: err.to_string(),
        },
    };
    if let Output::NotComputed { reason } = &output {
        warn!(output = name, %unit, reason = reason.as_str(), "headline output unavailable");
    }
    output
}

/// Read every headline quantity; each one degrades independently.
pub fn retrieve<E>(engine: &E) -> RunResult
where
    E: OptimizationEngine + ?Sized,
{
    RunResult {
        design_fuel_mass_lbm: query(engine, DESIGN_FUEL_MASS, Unit::PoundsMass),
        total_fuel_mass_lbm: query(engine, TOTAL_FUEL_MASS, Unit::PoundsMass),
        fuel_burned_kg: query(engine, FUEL_BURNED, Unit::Kilograms),
        fuel_burned_lb: query(engine, FUEL_BURNED, Unit::Pounds),
    }
}

fn describe(output: &Output<f64>, unit: Unit) -> String {
    match output {
        Output::Available(value) => format!("{} {unit}", format_rounded(*value)),
        Output::NotComputed { reason } => format!("not computed ({reason})"),
    }
}

/// Print the headline block to the console sink.
pub fn write_headline(result: &RunResult, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "Fuel Mass: {}",
        describe(&result.design_fuel_mass_lbm, Unit::PoundsMass)
    )?;
    writeln!(
        out,
        "Total Fuel Mass: {}",
        describe(&result.total_fuel_mass_lbm, Unit::PoundsMass)
    )?;
    match (&result.fuel_burned_kg, &result.fuel_burned_lb) {
        (Output::Available(kg), Output::Available(lb)) => writeln!(
            out,
            "The optimization objective \"fuel burned\" is: {} kg / {} lb",
            format_rounded(*kg),
            format_rounded(*lb)
        ),
        (kg, lb) => writeln!(
            out,
            "Fuel Burned: {} / {}",
            describe(kg, Unit::Kilograms),
            describe(lb, Unit::Pounds)
        ),
    }
}
