//! Locomotion System
//!
//! Moves every free peep one step: wandering, event-directed pursuit, edge
//! reflection and TV avoidance.

use behold_events::Mood;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::geometry::{Rect, Vec2};
use crate::components::peep::{EventKind, PeepId};
use crate::config::BeholdConfig;
use crate::state::SimulationState;

/// Counters from one locomotion pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocomotionOutcome {
    pub moved: usize,
    pub paused: usize,
    /// Mass-violence peeps that picked a new victim this tick
    pub retargeted: Vec<(PeepId, PeepId)>,
    pub bounced_off_tv: usize,
}

/// What a peep steers by this tick
enum Steering {
    Toward(Vec2),
    Keep,
    Wander,
}

/// Random uniform live peep other than `self_id`.
fn pick_victim(state: &SimulationState, self_id: PeepId, rng: &mut SmallRng) -> Option<PeepId> {
    let candidates = state.ids_where(|p| p.id != self_id && p.is_live());
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

fn speed_for(mood: Mood, config: &BeholdConfig) -> f32 {
    match mood {
        Mood::Angry => config.motion.angry_speed,
        Mood::Scared => config.motion.base_speed * config.motion.scared_multiplier,
        _ => config.motion.base_speed,
    }
}

/// Works out where the peep at `index` should head, retargeting
/// mass-violence peeps as needed.
fn steering_for(
    state: &mut SimulationState,
    index: usize,
    config: &BeholdConfig,
    rng: &mut SmallRng,
    outcome: &mut LocomotionOutcome,
) -> Steering {
    let peep = &state.peeps[index];
    let id = peep.id;
    let Some(event) = peep.event else {
        return Steering::Wander;
    };
    if !event.kind.follows_target() {
        return Steering::Wander;
    }

    let live_target = event
        .target
        .and_then(|target| state.get(target))
        .filter(|target| target.is_live() && target.id != id)
        .map(|target| target.position);

    if event.kind != EventKind::MassViolence {
        return match live_target {
            Some(position) => Steering::Toward(position),
            None => Steering::Wander,
        };
    }

    if let Some(position) = live_target {
        return Steering::Toward(position);
    }

    // Dead or missing victims are dropped so a new one can be chosen.
    let mut chosen = None;
    if rng.gen_bool(config.motion.retarget_chance) {
        chosen = pick_victim(state, id, rng);
    }
    if let Some(held) = state.peeps[index].event.as_mut() {
        held.target = chosen;
    }

    match chosen.and_then(|target| state.get(target)) {
        Some(target) => {
            outcome.retargeted.push((id, target.id));
            Steering::Toward(target.position)
        }
        // An untargeted mass-violence peep keeps its heading.
        None => Steering::Keep,
    }
}

/// System: advance every peep that is free to move by one step.
pub fn move_peeps(
    state: &mut SimulationState,
    config: &BeholdConfig,
    rng: &mut SmallRng,
    dt_ms: u32,
) -> LocomotionOutcome {
    let size = config.population.peep_size;
    let max_x = config.arena.width - size;
    let max_y = config.arena.height - size;
    let tv = config.arena.tv_box();
    let mut outcome = LocomotionOutcome::default();

    for index in 0..state.peeps.len() {
        {
            let peep = &mut state.peeps[index];
            if peep.freeze.is_held() || !peep.is_live() {
                continue;
            }
            if !peep.freeze.tick(dt_ms) {
                outcome.paused += 1;
                continue;
            }
        }

        let steering = steering_for(state, index, config, rng, &mut outcome);
        let peep = &mut state.peeps[index];

        let mut direction = match steering {
            Steering::Toward(point) => point - peep.position,
            Steering::Keep => peep.direction,
            Steering::Wander => {
                if rng.gen_bool(config.motion.wander_turn_chance) {
                    Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5)
                } else {
                    peep.direction
                }
            }
        };

        let speed = speed_for(peep.mood, config);
        let step = direction.normalized() * speed;
        let mut next = peep.position + step;

        if next.x < 0.0 {
            next.x = 0.0;
            direction.x = -direction.x;
        } else if next.x > max_x {
            next.x = max_x;
            direction.x = -direction.x;
        }
        if next.y < 0.0 {
            next.y = 0.0;
            direction.y = -direction.y;
        } else if next.y > max_y {
            next.y = max_y;
            direction.y = -direction.y;
        }

        if Rect::square(next, size).overlaps(&tv) {
            direction = -direction;
            next = peep.position;
            outcome.bounced_off_tv += 1;
        }

        peep.position = next;
        peep.direction = direction;
        outcome.moved += 1;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Freeze, Peep, PeepEvent};
    use behold_events::Shape;
    use rand::SeedableRng;

    fn calm_config() -> BeholdConfig {
        let mut config = BeholdConfig::default();
        config.motion.wander_turn_chance = 0.0;
        config.motion.retarget_chance = 0.0;
        config
    }

    fn at(id: PeepId, x: f32, y: f32, direction: Vec2) -> Peep {
        Peep::new(id, Vec2::new(x, y), Shape::Circle, direction)
    }

    #[test]
    fn test_wanderer_moves_at_base_speed() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = SimulationState::new(vec![at(1, 50.0, 50.0, Vec2::new(3.0, 4.0))]);

        move_peeps(&mut state, &config, &mut rng, 16);

        let peep = state.get(1).unwrap();
        assert!((peep.position.x - 50.6).abs() < 1e-4);
        assert!((peep.position.y - 50.8).abs() < 1e-4);
    }

    #[test]
    fn test_angry_and_scared_speeds() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = SimulationState::new(vec![
            at(1, 50.0, 50.0, Vec2::new(1.0, 0.0)).with_mood(Mood::Angry),
            at(2, 50.0, 500.0, Vec2::new(1.0, 0.0)).with_mood(Mood::Scared),
        ]);

        move_peeps(&mut state, &config, &mut rng, 16);

        assert!((state.get(1).unwrap().position.x - 52.0).abs() < 1e-4);
        assert!((state.get(2).unwrap().position.x - 51.5).abs() < 1e-4);
    }

    #[test]
    fn test_edge_clamps_and_reflects() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = SimulationState::new(vec![at(1, 0.5, 10.0, Vec2::new(-1.0, 0.0))]);

        move_peeps(&mut state, &config, &mut rng, 16);

        let peep = state.get(1).unwrap();
        assert_eq!(peep.position.x, 0.0);
        assert_eq!(peep.direction.x, 1.0);
    }

    #[test]
    fn test_tv_collision_reverses_and_stays_put() {
        let config = calm_config();
        let tv = config.arena.tv_box();
        let mut rng = SmallRng::seed_from_u64(1);
        let start = Vec2::new(tv.x - 48.0 - 0.5, tv.y + 10.0);
        let mut state = SimulationState::new(vec![Peep::new(
            1,
            start,
            Shape::Square,
            Vec2::new(1.0, 0.0),
        )]);

        let outcome = move_peeps(&mut state, &config, &mut rng, 16);

        let peep = state.get(1).unwrap();
        assert_eq!(outcome.bounced_off_tv, 1);
        assert_eq!(peep.position, start);
        assert_eq!(peep.direction, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_held_and_fallen_never_move() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut held = at(1, 50.0, 50.0, Vec2::new(1.0, 0.0)).with_mood(Mood::Scared);
        held.freeze = Freeze::Held;
        let mut fallen = at(2, 50.0, 500.0, Vec2::new(1.0, 0.0)).with_mood(Mood::Fallen);
        fallen.freeze = Freeze::Free;
        let mut state = SimulationState::new(vec![held, fallen]);

        for _ in 0..100 {
            move_peeps(&mut state, &config, &mut rng, 16);
        }

        assert_eq!(state.get(1).unwrap().position, Vec2::new(50.0, 50.0));
        assert_eq!(state.get(2).unwrap().position, Vec2::new(50.0, 500.0));
    }

    #[test]
    fn test_countdown_pauses_then_resumes() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut attacker = at(1, 50.0, 50.0, Vec2::new(1.0, 0.0));
        attacker.freeze = Freeze::Countdown(32);
        let mut state = SimulationState::new(vec![attacker]);

        let first = move_peeps(&mut state, &config, &mut rng, 16);
        let second = move_peeps(&mut state, &config, &mut rng, 16);
        assert_eq!((first.paused, second.paused), (1, 1));
        assert_eq!(state.get(1).unwrap().position.x, 50.0);
        assert!(state.get(1).unwrap().freeze.is_free());

        move_peeps(&mut state, &config, &mut rng, 16);
        assert!((state.get(1).unwrap().position.x - 51.0).abs() < 1e-4);
    }

    #[test]
    fn test_pursuer_steers_at_target() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = SimulationState::new(vec![
            at(1, 100.0, 100.0, Vec2::new(-1.0, 0.0))
                .with_event(PeepEvent::targeting(EventKind::HatHate, 2)),
            at(2, 100.0, 400.0, Vec2::ZERO),
        ]);

        move_peeps(&mut state, &config, &mut rng, 16);

        let follower = state.get(1).unwrap();
        assert!((follower.position.y - 101.0).abs() < 1e-4);
        assert!((follower.position.x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_pursuer_with_fallen_target_wanders() {
        let config = calm_config();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = SimulationState::new(vec![
            at(1, 100.0, 100.0, Vec2::new(1.0, 0.0))
                .with_event(PeepEvent::targeting(EventKind::Violence, 2)),
            at(2, 100.0, 400.0, Vec2::ZERO).with_mood(Mood::Fallen),
        ]);

        move_peeps(&mut state, &config, &mut rng, 16);

        let pursuer = state.get(1).unwrap();
        assert!((pursuer.position.x - 101.0).abs() < 1e-4);
        assert_eq!(pursuer.position.y, 100.0);
    }

    #[test]
    fn test_mass_violence_retargets_live_peep() {
        let mut config = calm_config();
        config.motion.retarget_chance = 1.0;
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = SimulationState::new(vec![
            at(1, 100.0, 100.0, Vec2::new(1.0, 0.0))
                .with_event(PeepEvent::targeting(EventKind::MassViolence, 2)),
            at(2, 100.0, 400.0, Vec2::ZERO).with_mood(Mood::Fallen),
            at(3, 600.0, 100.0, Vec2::ZERO),
        ]);

        let outcome = move_peeps(&mut state, &config, &mut rng, 16);

        assert_eq!(outcome.retargeted, vec![(1, 3)]);
        assert_eq!(state.get(1).unwrap().event.and_then(|e| e.target), Some(3));
    }
}
