//! Stage and Phase Types
//!
//! The narrative stage sequence and the two orthogonal phase machines
//! (outer session phase, capture presentation phase).
//!
//! # Example
//!
//! ```
//! use behold_events::NarrativeStage;
//!
//! let stage = NarrativeStage::Start;
//! assert_eq!(stage.next(), NarrativeStage::AwaitCricket);
//! assert_eq!(stage.to_string(), "start");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step of the fixed narrative sequence.
///
/// Transitions are strictly forward; `End` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeStage {
    Start,
    AwaitCricket,
    AwaitHatHate,
    AwaitViolence,
    AwaitSquareAnger,
    AwaitMassViolence,
    End,
}

impl NarrativeStage {
    /// Returns the stage that follows this one. `End` stays `End`.
    pub fn next(self) -> Self {
        match self {
            NarrativeStage::Start => NarrativeStage::AwaitCricket,
            NarrativeStage::AwaitCricket => NarrativeStage::AwaitHatHate,
            NarrativeStage::AwaitHatHate => NarrativeStage::AwaitViolence,
            NarrativeStage::AwaitViolence => NarrativeStage::AwaitSquareAnger,
            NarrativeStage::AwaitSquareAnger => NarrativeStage::AwaitMassViolence,
            NarrativeStage::AwaitMassViolence => NarrativeStage::End,
            NarrativeStage::End => NarrativeStage::End,
        }
    }

    /// Returns true for the terminal stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, NarrativeStage::End)
    }

    /// Tag used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativeStage::Start => "start",
            NarrativeStage::AwaitCricket => "await_cricket",
            NarrativeStage::AwaitHatHate => "await_hat_hate",
            NarrativeStage::AwaitViolence => "await_violence",
            NarrativeStage::AwaitSquareAnger => "await_square_anger",
            NarrativeStage::AwaitMassViolence => "await_mass_violence",
            NarrativeStage::End => "end",
        }
    }

    /// Returns all stages in narrative order.
    pub fn all() -> &'static [NarrativeStage] {
        &[
            NarrativeStage::Start,
            NarrativeStage::AwaitCricket,
            NarrativeStage::AwaitHatHate,
            NarrativeStage::AwaitViolence,
            NarrativeStage::AwaitSquareAnger,
            NarrativeStage::AwaitMassViolence,
            NarrativeStage::End,
        ]
    }
}

impl Default for NarrativeStage {
    fn default() -> Self {
        NarrativeStage::Start
    }
}

impl fmt::Display for NarrativeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NarrativeStage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NarrativeStage::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s.to_lowercase())
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}

/// Error returned when a stage tag cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStageError(pub String);

impl fmt::Display for ParseStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown narrative stage: {}", self.0)
    }
}

impl std::error::Error for ParseStageError {}

/// Outer session phase, orthogonal to the narrative stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Title,
    Playing,
    Ending,
    FinalMessage,
}

/// Capture feedback animation state. Simulation is paused unless `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PresentationPhase {
    #[default]
    Idle,
    Shutter,
    ZoomIn,
    ShowingNews,
    ZoomOut,
}

impl PresentationPhase {
    /// The phase entered when this one's timer runs out.
    pub fn next(self) -> Self {
        match self {
            PresentationPhase::Idle => PresentationPhase::Idle,
            PresentationPhase::Shutter => PresentationPhase::ZoomIn,
            PresentationPhase::ZoomIn => PresentationPhase::ShowingNews,
            PresentationPhase::ShowingNews => PresentationPhase::ZoomOut,
            PresentationPhase::ZoomOut => PresentationPhase::Idle,
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(self, PresentationPhase::Idle)
    }

    /// True while the arena is zoomed onto the TV.
    pub fn is_zoomed(self) -> bool {
        matches!(self, PresentationPhase::ZoomIn | PresentationPhase::ShowingNews)
    }
}
