//! Simulation Systems
//!
//! One frame of simulation is two passes over the population: violence
//! resolution first, then locomotion.

pub mod locomotion;
pub mod violence;

pub use locomotion::{move_peeps, LocomotionOutcome};
pub use violence::{resolve_violence, Fall, ViolenceOutcome};

use rand::rngs::SmallRng;

use crate::config::BeholdConfig;
use crate::state::SimulationState;

/// Summary of one simulation tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub violence: ViolenceOutcome,
    pub locomotion: LocomotionOutcome,
}

impl TickReport {
    pub fn falls(&self) -> &[Fall] {
        &self.violence.falls
    }
}

/// Runs one simulation tick of `dt_ms` milliseconds.
pub fn tick(
    state: &mut SimulationState,
    config: &BeholdConfig,
    rng: &mut SmallRng,
    dt_ms: u32,
) -> TickReport {
    let violence = resolve_violence(state, config);
    let locomotion = move_peeps(state, config, rng, dt_ms);
    TickReport {
        violence,
        locomotion,
    }
}
