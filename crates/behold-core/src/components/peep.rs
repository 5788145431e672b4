//! Peep Components
//!
//! A peep is one simulated actor: a small circle- or square-headed figure
//! wandering the arena, optionally attached to a scripted narrative event.

use behold_events::{CapturedPeep, Mood, Shape};
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Vec2};

/// Unique identifier for a peep. Never reused within a session's lifetime.
pub type PeepId = u64;

/// Hands out peep identifiers in increasing order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeepIdAllocator {
    next: PeepId,
}

impl PeepIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> PeepId {
        let id = self.next.max(1);
        self.next = id + 1;
        id
    }
}

/// Scripted events a peep can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Annoyed by a chirping cricket
    Cricket,
    /// Follows a hatted square around, yelling
    HatHate,
    /// Circle attacking the hatted square
    Violence,
    /// Hatted square retaliating against a circle
    SquareAnger,
    /// Everyone attacks someone
    MassViolence,
}

impl EventKind {
    /// Events whose holder lands an attack when it reaches its target.
    pub fn is_pursuit(self) -> bool {
        matches!(
            self,
            EventKind::Violence | EventKind::SquareAnger | EventKind::MassViolence
        )
    }

    /// Events whose holder steers toward its target.
    pub fn follows_target(self) -> bool {
        self.is_pursuit() || matches!(self, EventKind::HatHate)
    }

    /// Holders of these events are drawn with an open, shouting mouth.
    pub fn is_yelling(self) -> bool {
        matches!(self, EventKind::HatHate | EventKind::SquareAnger)
    }
}

/// An event attached to a peep, with an optional pursuit target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeepEvent {
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PeepId>,
}

impl PeepEvent {
    pub fn new(kind: EventKind) -> Self {
        Self { kind, target: None }
    }

    pub fn targeting(kind: EventKind, target: PeepId) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }
}

/// Movement suppression state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Freeze {
    #[default]
    Free,
    /// Frozen until the next stage mutation (fallen or frightened)
    Held,
    /// Post-attack pause, remaining milliseconds
    Countdown(u32),
}

impl Freeze {
    pub fn is_free(self) -> bool {
        matches!(self, Freeze::Free)
    }

    pub fn is_held(self) -> bool {
        matches!(self, Freeze::Held)
    }

    /// Advances a countdown by `dt_ms`. Returns true if the peep may move
    /// this tick.
    pub fn tick(&mut self, dt_ms: u32) -> bool {
        match *self {
            Freeze::Free => true,
            Freeze::Held => false,
            Freeze::Countdown(remaining) => {
                let left = remaining.saturating_sub(dt_ms);
                *self = if left == 0 {
                    Freeze::Free
                } else {
                    Freeze::Countdown(left)
                };
                false
            }
        }
    }
}

/// One simulated actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peep {
    pub id: PeepId,
    /// Top-left corner of the peep's square footprint
    pub position: Vec2,
    pub shape: Shape,
    pub mood: Mood,
    pub has_hat: bool,
    pub direction: Vec2,
    pub is_event_target: bool,
    pub event: Option<PeepEvent>,
    pub freeze: Freeze,
}

impl Peep {
    /// Creates a calm, hatless peep with no event attached.
    pub fn new(id: PeepId, position: Vec2, shape: Shape, direction: Vec2) -> Self {
        Self {
            id,
            position,
            shape,
            mood: Mood::Normal,
            has_hat: false,
            direction,
            is_event_target: false,
            event: None,
            freeze: Freeze::Free,
        }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_hat(mut self) -> Self {
        self.has_hat = true;
        self
    }

    pub fn with_event(mut self, event: PeepEvent) -> Self {
        self.is_event_target = true;
        self.event = Some(event);
        self
    }

    pub fn footprint(&self, size: f32) -> Rect {
        Rect::square(self.position, size)
    }

    pub fn center(&self, size: f32) -> Vec2 {
        self.position + Vec2::new(size / 2.0, size / 2.0)
    }

    pub fn event_kind(&self) -> Option<EventKind> {
        self.event.map(|e| e.kind)
    }

    /// Fallen peeps are out of play until removed.
    pub fn is_live(&self) -> bool {
        !self.mood.is_fallen()
    }

    /// Clears every transient narrative field ahead of a stage mutation.
    pub fn clear_transient(&mut self) {
        self.is_event_target = false;
        self.event = None;
        self.freeze = Freeze::Free;
        if self.mood == Mood::Scared {
            self.mood = Mood::Normal;
        }
    }

    /// Visual attributes recorded in a news post.
    pub fn descriptor(&self) -> CapturedPeep {
        CapturedPeep::new(self.shape, self.mood, self.has_hat)
    }
}
