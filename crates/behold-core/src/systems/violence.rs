//! Violence System
//!
//! Resolves attacks between pursuers and their targets and frightens the
//! bystanders who witness them.

use behold_events::Mood;
use serde::{Deserialize, Serialize};

use crate::components::peep::{EventKind, Freeze, PeepId};
use crate::config::BeholdConfig;
use crate::state::SimulationState;

/// One landed attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fall {
    pub attacker: PeepId,
    pub victim: PeepId,
}

/// Everything the violence pass changed this tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolenceOutcome {
    pub falls: Vec<Fall>,
    pub frightened: Vec<PeepId>,
}

/// System: resolve attacks for every pursuer within reach of a live target.
///
/// A victim becomes Fallen and is held in place. The attacker pauses for
/// `attack_pause_ms`; a mass-violence attacker keeps its event but drops the
/// target, every other attacker loses its event. Normal or Angry bystanders
/// near the victim become Scared and freeze.
pub fn resolve_violence(state: &mut SimulationState, config: &BeholdConfig) -> ViolenceOutcome {
    let reach = config.population.peep_size * config.motion.attack_reach_factor;
    let fright_radius = config.capture.window_size * config.motion.fright_radius_factor;
    let mut outcome = ViolenceOutcome::default();

    for index in 0..state.peeps.len() {
        let attacker = &state.peeps[index];
        if attacker.freeze.is_held() {
            continue;
        }
        let Some(event) = attacker.event else {
            continue;
        };
        if !event.kind.is_pursuit() {
            continue;
        }
        let Some(target_id) = event.target else {
            continue;
        };
        let Some(target_index) = state.index_of(target_id) else {
            continue;
        };
        if target_index == index || !state.peeps[target_index].is_live() {
            continue;
        }

        let attacker_id = attacker.id;
        let attacker_position = attacker.position;
        let target_position = state.peeps[target_index].position;
        if attacker_position.distance(target_position) >= reach {
            continue;
        }

        let victim = &mut state.peeps[target_index];
        victim.mood = Mood::Fallen;
        victim.freeze = Freeze::Held;

        let attacker = &mut state.peeps[index];
        attacker.freeze = Freeze::Countdown(config.motion.attack_pause_ms);
        if event.kind == EventKind::MassViolence {
            if let Some(held) = attacker.event.as_mut() {
                held.target = None;
            }
        } else {
            attacker.event = None;
        }

        for bystander in state.peeps.iter_mut() {
            if bystander.id == attacker_id || bystander.id == target_id {
                continue;
            }
            if !matches!(bystander.mood, Mood::Normal | Mood::Angry) {
                continue;
            }
            if bystander.position.distance(target_position) < fright_radius {
                bystander.mood = Mood::Scared;
                bystander.freeze = Freeze::Held;
                outcome.frightened.push(bystander.id);
            }
        }

        tracing::debug!(
            attacker = attacker_id,
            victim = target_id,
            kind = ?event.kind,
            "attack landed"
        );
        outcome.falls.push(Fall {
            attacker: attacker_id,
            victim: target_id,
        });
    }

    outcome
}
