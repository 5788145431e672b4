//! Stage Effects
//!
//! A valid capture does not touch the population immediately. It records a
//! [`PendingMutation`], and once the presentation sequence finishes the
//! mutation is interpreted here: transient state is cleared, the stage's
//! effect is applied, and the next scripted event is seeded.

use behold_events::{Mood, NarrativeStage, Shape};
use serde::{Deserialize, Serialize};

use super::SeedPolicy;
use crate::components::peep::{EventKind, PeepEvent, PeepId};
use crate::config::NarrativeConfig;
use crate::state::SimulationState;

/// Population change deferred until the presentation sequence completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMutation {
    /// Stage that was current when the capture was judged
    pub stage: NarrativeStage,
    /// First captured event holder, if any
    pub event_peep: Option<PeepId>,
    /// Ids of every captured peep
    pub captured: Vec<PeepId>,
}

/// Event attached by a seed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededEvent {
    pub kind: EventKind,
    pub holder: PeepId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PeepId>,
}

/// What applying a mutation changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectReport {
    pub removed_fallen: usize,
    pub angered: Vec<PeepId>,
    pub hatted: Vec<PeepId>,
    pub seeded: Option<SeededEvent>,
    /// A seed step found no qualifying peep and did nothing
    pub seed_skipped: bool,
    /// Captured peeps no longer in the arena once the effect has landed
    pub departed_subjects: Vec<PeepId>,
}

fn removes_fallen(stage: NarrativeStage) -> bool {
    matches!(
        stage,
        NarrativeStage::AwaitViolence
            | NarrativeStage::AwaitSquareAnger
            | NarrativeStage::AwaitMassViolence
    )
}

fn seeds_after(stage: NarrativeStage) -> Option<EventKind> {
    match stage {
        NarrativeStage::Start => Some(EventKind::Cricket),
        NarrativeStage::AwaitCricket => Some(EventKind::HatHate),
        NarrativeStage::AwaitHatHate => Some(EventKind::Violence),
        NarrativeStage::AwaitViolence => Some(EventKind::SquareAnger),
        _ => None,
    }
}

fn make_angry(state: &mut SimulationState, id: PeepId, report: &mut EffectReport) {
    if let Some(peep) = state.get_mut(id) {
        if peep.mood != Mood::Angry {
            peep.mood = Mood::Angry;
            report.angered.push(id);
        }
    }
}

fn grant_hat(state: &mut SimulationState, id: PeepId, report: &mut EffectReport) {
    if let Some(peep) = state.get_mut(id) {
        if !peep.has_hat {
            peep.has_hat = true;
            report.hatted.push(id);
        }
    }
}

/// Turns the captured event holder Angry, then the first
/// `ceil(fraction * n)` of the `n` Normal peeps.
fn spread_anger(
    state: &mut SimulationState,
    event_peep: Option<PeepId>,
    fraction: f64,
    report: &mut EffectReport,
) {
    if let Some(id) = event_peep {
        make_angry(state, id, report);
    }

    let normals = state.ids_where(|p| p.mood == Mood::Normal);
    let count = (normals.len() as f64 * fraction).ceil() as usize;
    for id in normals.into_iter().take(count) {
        make_angry(state, id, report);
    }
}

fn mass_anger(state: &mut SimulationState, report: &mut EffectReport) {
    for peep in state.peeps.iter_mut() {
        if peep.mood != Mood::Angry {
            report.angered.push(peep.id);
        }
        peep.mood = Mood::Angry;
        peep.event = Some(PeepEvent::new(EventKind::MassViolence));
    }
    report.angered.sort_unstable();
}

/// First hatted square, recruiting one under [`SeedPolicy::Recruit`].
fn hatted_square(
    state: &mut SimulationState,
    policy: SeedPolicy,
    report: &mut EffectReport,
) -> Option<PeepId> {
    let found = state.first_where(|p| p.shape == Shape::Square && p.has_hat && p.is_live());
    if found.is_some() || policy == SeedPolicy::Strict {
        return found;
    }

    let recruit = state.first_where(|p| p.shape == Shape::Square && p.is_live())?;
    tracing::debug!(peep = recruit, "recruited a hatted square");
    grant_hat(state, recruit, report);
    Some(recruit)
}

/// First circle matching `preferred`, falling back to any live circle other
/// than `exclude` under [`SeedPolicy::Recruit`].
fn circle(
    state: &SimulationState,
    policy: SeedPolicy,
    exclude: Option<PeepId>,
    preferred: impl Fn(Mood) -> bool,
) -> Option<PeepId> {
    let found = state.first_where(|p| {
        p.shape == Shape::Circle && p.is_live() && preferred(p.mood) && Some(p.id) != exclude
    });
    if found.is_some() || policy == SeedPolicy::Strict {
        return found;
    }
    state.first_where(|p| p.shape == Shape::Circle && p.is_live() && Some(p.id) != exclude)
}

fn attach(state: &mut SimulationState, holder: PeepId, event: PeepEvent, angry: bool) {
    if let Some(peep) = state.get_mut(holder) {
        peep.is_event_target = true;
        peep.event = Some(event);
        if angry {
            peep.mood = Mood::Angry;
        }
    }
    if let Some(target) = event.target.and_then(|id| state.get_mut(id)) {
        target.is_event_target = true;
    }
}

/// Attaches the event that the next stage waits for.
fn seed(
    state: &mut SimulationState,
    kind: EventKind,
    policy: SeedPolicy,
    report: &mut EffectReport,
) {
    let seeded = match kind {
        EventKind::Cricket => {
            let holder = state.first_where(|p| p.mood == Mood::Normal).or_else(|| {
                if policy == SeedPolicy::Recruit {
                    state.first_where(|p| p.is_live())
                } else {
                    None
                }
            });
            holder.map(|holder| {
                attach(state, holder, PeepEvent::new(kind), false);
                SeededEvent {
                    kind,
                    holder,
                    target: None,
                }
            })
        }
        EventKind::HatHate => {
            let follower = circle(state, policy, None, |mood| mood != Mood::Angry);
            match follower {
                Some(follower) => hatted_square(state, policy, report).map(|square| {
                    attach(state, follower, PeepEvent::targeting(kind, square), true);
                    SeededEvent {
                        kind,
                        holder: follower,
                        target: Some(square),
                    }
                }),
                None => None,
            }
        }
        EventKind::Violence => {
            let attacker = circle(state, policy, None, |mood| mood == Mood::Angry);
            match attacker {
                Some(attacker) => hatted_square(state, policy, report).map(|square| {
                    let recruited = policy == SeedPolicy::Recruit;
                    attach(state, attacker, PeepEvent::targeting(kind, square), recruited);
                    SeededEvent {
                        kind,
                        holder: attacker,
                        target: Some(square),
                    }
                }),
                None => None,
            }
        }
        EventKind::SquareAnger => match hatted_square(state, policy, report) {
            Some(square) => circle(state, policy, Some(square), |mood| mood != Mood::Angry).map(
                |victim| {
                    attach(state, square, PeepEvent::targeting(kind, victim), true);
                    SeededEvent {
                        kind,
                        holder: square,
                        target: Some(victim),
                    }
                },
            ),
            None => None,
        },
        EventKind::MassViolence => None,
    };

    match seeded {
        Some(event) => {
            tracing::info!(
                kind = ?event.kind,
                holder = event.holder,
                target = ?event.target,
                "seeded narrative event"
            );
            report.seeded = Some(event);
        }
        None => {
            tracing::warn!(
                kind = ?kind,
                policy = ?policy,
                "no peep qualifies for the next event, seed skipped"
            );
            report.seed_skipped = true;
        }
    }
}

/// Applies the population mutation recorded for a capture judged at
/// `mutation.stage`.
pub fn apply_stage_effect(
    state: &mut SimulationState,
    mutation: &PendingMutation,
    config: &NarrativeConfig,
) -> EffectReport {
    let mut report = EffectReport::default();

    for peep in state.peeps.iter_mut() {
        peep.clear_transient();
    }

    if removes_fallen(mutation.stage) {
        report.removed_fallen = state.remove_fallen();
    }

    match mutation.stage {
        NarrativeStage::AwaitCricket => {
            spread_anger(
                state,
                mutation.event_peep,
                config.anger_spread_fraction,
                &mut report,
            );
            if let Some(square) =
                state.first_where(|p| p.shape == Shape::Square && p.mood == Mood::Normal)
            {
                grant_hat(state, square, &mut report);
            }
        }
        NarrativeStage::AwaitHatHate | NarrativeStage::AwaitViolence => spread_anger(
            state,
            mutation.event_peep,
            config.anger_spread_fraction,
            &mut report,
        ),
        NarrativeStage::AwaitSquareAnger | NarrativeStage::AwaitMassViolence => {
            mass_anger(state, &mut report)
        }
        NarrativeStage::Start | NarrativeStage::End => {}
    }

    if let Some(kind) = seeds_after(mutation.stage) {
        seed(state, kind, config.seed_policy, &mut report);
    }

    report.departed_subjects = mutation
        .captured
        .iter()
        .copied()
        .filter(|id| state.get(*id).is_none())
        .collect();

    tracing::debug!(
        stage = %mutation.stage,
        captured = mutation.captured.len(),
        departed = report.departed_subjects.len(),
        removed = report.removed_fallen,
        angered = report.angered.len(),
        "applied stage effect"
    );

    report
}
