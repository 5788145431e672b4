//! Narrative Stage Machine
//!
//! Stage triggers, the text attached to each stage, and the population
//! mutations a successful capture sets in motion.

pub mod effects;
pub mod stages;

pub use effects::{apply_stage_effect, EffectReport, PendingMutation, SeededEvent};
pub use stages::{
    capture_satisfies, hint_for, prompt_for, ENDING_MESSAGE, ENDING_TITLE, FINAL_MESSAGE,
    TITLE_BLURB, TITLE_HEADING,
};

use serde::{Deserialize, Serialize};

/// What a seed step does when no peep qualifies for the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Skip the seed. The story may stall until the session is reset.
    #[default]
    Strict,
    /// Relax the seed's requirements so every stage stays reachable.
    Recruit,
}

impl std::str::FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(SeedPolicy::Strict),
            "recruit" => Ok(SeedPolicy::Recruit),
            other => Err(format!("unknown seed policy: {}", other)),
        }
    }
}
