//! Presentation Sequencer
//!
//! Drives the shutter, zoom-in, news and zoom-out timeline after a valid
//! capture and holds the capture's population mutation until the timeline
//! returns to idle.

use behold_events::PresentationPhase;
use serde::{Deserialize, Serialize};

use crate::config::PresentationConfig;
use crate::narrative::PendingMutation;

/// What the arena TV is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "post_id")]
pub enum TvDisplay {
    /// Nothing captured yet this session
    #[default]
    Blank,
    /// Zoomed in before the capture's headline has resolved
    Capturing,
    Post(String),
}

/// A sequence is already running; only one capture may be pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("presentation sequence busy in phase {0:?}")]
pub struct SequencerBusy(pub PresentationPhase);

/// Result of advancing the sequencer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencerStep {
    /// Phases entered during this advance, in order
    pub entered: Vec<PresentationPhase>,
    /// Mutation released on returning to idle, exactly once per sequence
    pub completed: Option<PendingMutation>,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    phase: PresentationPhase,
    elapsed_ms: u32,
    pending: Option<PendingMutation>,
    timings: PresentationConfig,
}

impl Sequencer {
    pub fn new(timings: PresentationConfig) -> Self {
        Self {
            phase: PresentationPhase::Idle,
            elapsed_ms: 0,
            pending: None,
            timings,
        }
    }

    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase.is_idle()
    }

    pub fn pending(&self) -> Option<&PendingMutation> {
        self.pending.as_ref()
    }

    fn duration_of(&self, phase: PresentationPhase) -> u32 {
        match phase {
            PresentationPhase::Idle => 0,
            PresentationPhase::Shutter => self.timings.shutter_ms,
            PresentationPhase::ZoomIn => self.timings.zoom_in_ms,
            PresentationPhase::ShowingNews => self.timings.showing_news_ms,
            PresentationPhase::ZoomOut => self.timings.zoom_out_ms,
        }
    }

    /// Starts a sequence for `mutation`. Refused unless idle.
    pub fn begin(&mut self, mutation: PendingMutation) -> Result<(), SequencerBusy> {
        if !self.is_idle() {
            return Err(SequencerBusy(self.phase));
        }
        self.phase = PresentationPhase::Shutter;
        self.elapsed_ms = 0;
        self.pending = Some(mutation);
        Ok(())
    }

    /// Advances the timeline by `dt_ms`. Time left over after a phase ends
    /// counts toward the next one.
    pub fn advance(&mut self, dt_ms: u32) -> SequencerStep {
        let mut step = SequencerStep::default();
        if self.is_idle() {
            return step;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        while !self.is_idle() {
            let duration = self.duration_of(self.phase);
            if self.elapsed_ms < duration {
                break;
            }
            self.elapsed_ms -= duration;
            self.phase = self.phase.next();
            step.entered.push(self.phase);
            tracing::debug!(phase = ?self.phase, "presentation phase");
        }

        if self.is_idle() {
            self.elapsed_ms = 0;
            step.completed = self.pending.take();
        }
        step
    }

    /// Drops any running sequence and its mutation.
    pub fn reset(&mut self) {
        self.phase = PresentationPhase::Idle;
        self.elapsed_ms = 0;
        self.pending = None;
    }
}
