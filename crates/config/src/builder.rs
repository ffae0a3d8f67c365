//! Builder producing immutable, validated [`MissionConfig`] values.

use crate::validation::{self, ValidationError};
use crate::{MissionConfig, PhaseConfig, PostMission, PreMission};

/// Collects mission blocks in flight order and validates them on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct MissionBuilder {
    pre_mission: PreMission,
    phases: Vec<PhaseConfig>,
    post_mission: Option<PostMission>,
}

impl MissionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pre_mission(mut self, pre_mission: PreMission) -> Self {
        self.pre_mission = pre_mission;
        self
    }

    /// Append a phase; phases fly in the order they are added.
    pub fn phase(mut self, phase: PhaseConfig) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn post_mission(mut self, post_mission: PostMission) -> Self {
        self.post_mission = Some(post_mission);
        self
    }

    pub fn build(self) -> Result<MissionConfig, ValidationError> {
        let post_mission = self
            .post_mission
            .ok_or(ValidationError::MissingPostMission)?;
        validation::validate_mission(&self.phases, &post_mission)?;
        Ok(MissionConfig {
            pre_mission: self.pre_mission,
            phases: self.phases,
            post_mission,
        })
    }
}
