//! Core units, constants, and shared numeric helpers for the mission runner workspace.

/// Conversion constants expressed against SI base units.
pub mod constants {
    /// Metres per international foot.
    pub const M_PER_FT: f64 = 0.3048;
    /// Metres per nautical mile.
    pub const M_PER_NMI: f64 = 1_852.0;
    /// Metres per statute mile.
    pub const M_PER_MI: f64 = 1_609.344;
    /// Kilograms per avoirdupois pound.
    pub const KG_PER_LB: f64 = 0.453_592_37;
    /// Seconds per minute.
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
}

pub mod units;

pub use units::{Unit, UnitError, UnitKind};

/// Round `x` the way mission reports present headline numbers.
///
/// The number of kept decimals is the digit count of the integer part
/// (sign included) plus two. Non-finite inputs yield `None`.
pub fn round_significant(x: f64) -> Option<f64> {
    if !x.is_finite() {
        return None;
    }
    let integer_digits = (x.trunc() as i64).to_string().len() as i32;
    let scale = 10f64.powi(integer_digits + 2);
    let rounded = (x * scale).round() / scale;
    if rounded.is_finite() {
        Some(rounded)
    } else {
        Some(x)
    }
}

/// Format a value through [`round_significant`], printing `NaN` for non-finite input.
pub fn format_rounded(x: f64) -> String {
    match round_significant(x) {
        Some(v) => v.to_string(),
        None => "NaN".to_string(),
    }
}
