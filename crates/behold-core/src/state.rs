//! Simulation State
//!
//! The single owned population that the simulator, the capture judge and the
//! stage machine pass between each other.

use behold_events::{Mood, Shape};
use serde::{Deserialize, Serialize};

use crate::components::peep::{Peep, PeepId};

/// The whole population of the arena
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub peeps: Vec<Peep>,
}

impl SimulationState {
    pub fn new(peeps: Vec<Peep>) -> Self {
        Self { peeps }
    }

    pub fn len(&self) -> usize {
        self.peeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peeps.is_empty()
    }

    pub fn get(&self, id: PeepId) -> Option<&Peep> {
        self.peeps.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PeepId) -> Option<&mut Peep> {
        self.peeps.iter_mut().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: PeepId) -> Option<usize> {
        self.peeps.iter().position(|p| p.id == id)
    }

    /// Lowest-id peep matching the predicate.
    pub fn first_where(&self, predicate: impl Fn(&Peep) -> bool) -> Option<PeepId> {
        self.peeps
            .iter()
            .filter(|p| predicate(p))
            .map(|p| p.id)
            .min()
    }

    /// Ids of all peeps matching the predicate, ascending.
    pub fn ids_where(&self, predicate: impl Fn(&Peep) -> bool) -> Vec<PeepId> {
        let mut ids: Vec<PeepId> = self
            .peeps
            .iter()
            .filter(|p| predicate(p))
            .map(|p| p.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Removes every fallen peep. Returns how many were removed.
    pub fn remove_fallen(&mut self) -> usize {
        let before = self.peeps.len();
        self.peeps.retain(|p| p.is_live());
        before - self.peeps.len()
    }

    pub fn count_mood(&self, mood: Mood) -> usize {
        self.peeps.iter().filter(|p| p.mood == mood).count()
    }

    pub fn count_shape(&self, shape: Shape) -> usize {
        self.peeps.iter().filter(|p| p.shape == shape).count()
    }

    /// Serializes the population as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Peep currently attached to an event of the given kind, if any.
    pub fn event_holder(&self, kind: crate::components::EventKind) -> Option<&Peep> {
        self.peeps
            .iter()
            .filter(|p| p.event_kind() == Some(kind))
            .min_by_key(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EventKind, PeepEvent, Vec2};

    fn peep(id: PeepId, shape: Shape) -> Peep {
        Peep::new(id, Vec2::new(id as f32 * 10.0, 0.0), shape, Vec2::ZERO)
    }

    #[test]
    fn test_first_where_breaks_ties_by_id() {
        let state = SimulationState::new(vec![
            peep(7, Shape::Square),
            peep(3, Shape::Square),
            peep(5, Shape::Circle),
        ]);

        assert_eq!(state.first_where(|p| p.shape == Shape::Square), Some(3));
        assert_eq!(state.first_where(|p| p.has_hat), None);
        assert_eq!(state.ids_where(|_| true), vec![3, 5, 7]);
    }

    #[test]
    fn test_remove_fallen() {
        let mut state = SimulationState::new(vec![
            peep(1, Shape::Circle).with_mood(Mood::Fallen),
            peep(2, Shape::Circle),
            peep(3, Shape::Square).with_mood(Mood::Fallen),
        ]);

        assert_eq!(state.remove_fallen(), 2);
        assert_eq!(state.len(), 1);
        assert_eq!(state.count_mood(Mood::Fallen), 0);
    }

    #[test]
    fn test_json_snapshot_roundtrip() {
        let state = SimulationState::new(vec![peep(1, Shape::Circle).with_hat()]);

        let json = state.to_json().unwrap();
        assert!(json.contains(r#""has_hat": true"#));
        let parsed: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_event_holder() {
        let state = SimulationState::new(vec![
            peep(1, Shape::Circle),
            peep(2, Shape::Circle).with_event(PeepEvent::new(EventKind::Cricket)),
        ]);

        assert_eq!(state.event_holder(EventKind::Cricket).map(|p| p.id), Some(2));
        assert!(state.event_holder(EventKind::Violence).is_none());
    }
}
