//! Peep Descriptors
//!
//! Shape and mood variants, and the immutable per-peep record stored in a
//! news post at capture time.

use serde::{Deserialize, Serialize};

/// Visual identity of a peep, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Square,
}

/// Behavioural type of a peep.
///
/// `Normal` is the rest state, `Angry` and `Scared` are transient moods,
/// `Fallen` is terminal until the peep is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Normal,
    Angry,
    Scared,
    Fallen,
}

impl Mood {
    pub fn is_fallen(self) -> bool {
        matches!(self, Mood::Fallen)
    }
}

/// Snapshot of one captured peep's visual attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapturedPeep {
    pub shape: Shape,
    pub mood: Mood,
    #[serde(default)]
    pub has_hat: bool,
}

impl CapturedPeep {
    pub fn new(shape: Shape, mood: Mood, has_hat: bool) -> Self {
        Self {
            shape,
            mood,
            has_hat,
        }
    }
}
