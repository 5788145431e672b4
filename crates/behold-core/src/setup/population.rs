//! Population Spawning
//!
//! Places peeps at random spots in the arena, keeping every footprint clear
//! of the TV obstacle.

use behold_events::Shape;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::geometry::{Rect, Vec2};
use crate::components::peep::{Peep, PeepIdAllocator};
use crate::config::{ArenaConfig, PopulationConfig};
use crate::state::SimulationState;

/// Counts of what was spawned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub total_peeps: usize,
    pub circles: usize,
    pub squares: usize,
    pub rejected_positions: usize,
}

/// Random direction with both components in [-1, 1)
fn random_direction(rng: &mut SmallRng) -> Vec2 {
    Vec2::new(
        (rng.gen::<f32>() - 0.5) * 2.0,
        (rng.gen::<f32>() - 0.5) * 2.0,
    )
}

fn random_shape(rng: &mut SmallRng) -> Shape {
    if rng.gen_bool(0.5) {
        Shape::Circle
    } else {
        Shape::Square
    }
}

/// Rejection-samples `population.peep_count` peeps inside the arena.
///
/// Positions whose footprint overlaps the TV box are discarded and redrawn.
/// The arena is far larger than the obstacle, so the loop terminates quickly
/// for any sane configuration.
pub fn create_initial_population(
    arena: &ArenaConfig,
    population: &PopulationConfig,
    ids: &mut PeepIdAllocator,
    rng: &mut SmallRng,
) -> (SimulationState, SpawnSummary) {
    let tv = arena.tv_box();
    let size = population.peep_size;
    let max_x = (arena.width - size).max(0.0);
    let max_y = (arena.height - size).max(0.0);

    let mut peeps = Vec::with_capacity(population.peep_count);
    let mut summary = SpawnSummary::default();

    while peeps.len() < population.peep_count {
        let position = Vec2::new(rng.gen::<f32>() * max_x, rng.gen::<f32>() * max_y);

        if Rect::square(position, size).overlaps(&tv) {
            summary.rejected_positions += 1;
            continue;
        }

        let shape = random_shape(rng);
        match shape {
            Shape::Circle => summary.circles += 1,
            Shape::Square => summary.squares += 1,
        }

        let direction = random_direction(rng);
        peeps.push(Peep::new(ids.allocate(), position, shape, direction));
    }

    summary.total_peeps = peeps.len();
    tracing::debug!(
        peeps = summary.total_peeps,
        circles = summary.circles,
        squares = summary.squares,
        rejected = summary.rejected_positions,
        "spawned initial population"
    );

    (SimulationState::new(peeps), summary)
}
