//! Mission configuration, validation, and run orchestration for
//! design-mission optimization studies.
//!
//! The optimization engine itself is external; this crate assembles the
//! mission description, sequences the engine lifecycle, and reports what
//! came back. Keeping the logic in a library lets several binaries share it.

pub use mission_config as config;
pub use mission_core as units;
pub use mission_diagnostics as diagnostics;
pub use mission_export as export;
pub use mission_orchestrator as orchestrator;

pub mod scenario;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
