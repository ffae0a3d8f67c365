//! Advisory timing check between adjacent phases.
//!
//! The engine is the final judge of feasibility, so gaps found here are
//! reported, never rejected.

use std::fmt;

use mission_core::Unit;
use serde::Serialize;

use crate::{MissionConfig, PhaseConfig};

/// Adjacent phases whose timing windows cannot meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuityGap {
    pub previous: String,
    pub next: String,
    /// Earliest and latest end of `previous`, in minutes.
    pub reachable_end_min: (f64, f64),
    /// `initial_bounds` of `next`, in minutes.
    pub next_start_min: (f64, f64),
}

impl fmt::Display for ContinuityGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` ends within [{:.1}, {:.1}] min but `{}` starts within [{:.1}, {:.1}] min",
            self.previous,
            self.reachable_end_min.0,
            self.reachable_end_min.1,
            self.next,
            self.next_start_min.0,
            self.next_start_min.1,
        )
    }
}

/// Compare each phase's reachable end window with the next phase's start window.
pub fn check(mission: &MissionConfig) -> Vec<ContinuityGap> {
    mission
        .phases()
        .windows(2)
        .filter_map(|pair| gap_between(&pair[0], &pair[1]))
        .collect()
}

fn gap_between(previous: &PhaseConfig, next: &PhaseConfig) -> Option<ContinuityGap> {
    let (start_low, start_high) = previous.user_options.initial_bounds.in_unit(Unit::Minutes).ok()?;
    let (dur_low, dur_high) = previous
        .user_options
        .duration_bounds
        .in_unit(Unit::Minutes)
        .ok()?;
    let (next_low, next_high) = next.user_options.initial_bounds.in_unit(Unit::Minutes).ok()?;

    let end_low = start_low + dur_low;
    let end_high = start_high + dur_high;
    if end_high < next_low || next_high < end_low {
        Some(ContinuityGap {
            previous: previous.name.clone(),
            next: next.name.clone(),
            reachable_end_min: (end_low, end_high),
            next_start_min: (next_low, next_high),
        })
    } else {
        None
    }
}
