//! Unit labels used by mission configuration quantities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    KG_PER_LB, M_PER_FT, M_PER_MI, M_PER_NMI, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};

/// Physical dimension of a [`Unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Dimensionless,
    Length,
    Time,
    Mass,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnitKind::Dimensionless => "dimensionless",
            UnitKind::Length => "length",
            UnitKind::Time => "time",
            UnitKind::Mass => "mass",
        };
        f.write_str(label)
    }
}

/// Unit strings accepted in mission configuration tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "unitless")]
    Unitless,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "nmi")]
    NauticalMiles,
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "s")]
    Seconds,
    #[serde(rename = "min")]
    Minutes,
    #[serde(rename = "h")]
    Hours,
    #[serde(rename = "lbm")]
    PoundsMass,
    #[serde(rename = "lb")]
    Pounds,
    #[serde(rename = "kg")]
    Kilograms,
}

#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("cannot convert {from} ({from_kind}) to {to} ({to_kind})")]
    Incompatible {
        from: Unit,
        from_kind: UnitKind,
        to: Unit,
        to_kind: UnitKind,
    },
    #[error("unknown unit `{0}`")]
    Unknown(String),
}

impl Unit {
    pub const ALL: [Unit; 12] = [
        Unit::Unitless,
        Unit::Feet,
        Unit::Meters,
        Unit::Kilometers,
        Unit::NauticalMiles,
        Unit::Miles,
        Unit::Seconds,
        Unit::Minutes,
        Unit::Hours,
        Unit::PoundsMass,
        Unit::Pounds,
        Unit::Kilograms,
    ];

    /// Label as written in configuration files.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Unitless => "unitless",
            Unit::Feet => "ft",
            Unit::Meters => "m",
            Unit::Kilometers => "km",
            Unit::NauticalMiles => "nmi",
            Unit::Miles => "mi",
            Unit::Seconds => "s",
            Unit::Minutes => "min",
            Unit::Hours => "h",
            Unit::PoundsMass => "lbm",
            Unit::Pounds => "lb",
            Unit::Kilograms => "kg",
        }
    }

    pub fn kind(self) -> UnitKind {
        match self {
            Unit::Unitless => UnitKind::Dimensionless,
            Unit::Feet | Unit::Meters | Unit::Kilometers | Unit::NauticalMiles | Unit::Miles => {
                UnitKind::Length
            }
            Unit::Seconds | Unit::Minutes | Unit::Hours => UnitKind::Time,
            Unit::PoundsMass | Unit::Pounds | Unit::Kilograms => UnitKind::Mass,
        }
    }

    /// Scale factor from this unit to the SI base unit of its kind.
    fn si_factor(self) -> f64 {
        match self {
            Unit::Unitless | Unit::Meters | Unit::Seconds | Unit::Kilograms => 1.0,
            Unit::Feet => M_PER_FT,
            Unit::Kilometers => 1_000.0,
            Unit::NauticalMiles => M_PER_NMI,
            Unit::Miles => M_PER_MI,
            Unit::Minutes => SECONDS_PER_MINUTE,
            Unit::Hours => SECONDS_PER_HOUR,
            // "lb" is read as pound-mass, matching how mission outputs are requested.
            Unit::PoundsMass | Unit::Pounds => KG_PER_LB,
        }
    }

    /// Convert `value` expressed in `self` into `target`.
    pub fn convert(self, value: f64, target: Unit) -> Result<f64, UnitError> {
        if self.kind() != target.kind() {
            return Err(UnitError::Incompatible {
                from: self,
                from_kind: self.kind(),
                to: target,
                to_kind: target.kind(),
            });
        }
        if self == target {
            return Ok(value);
        }
        Ok(value * self.si_factor() / target.si_factor())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.label() == s)
            .ok_or_else(|| UnitError::Unknown(s.to_string()))
    }
}
