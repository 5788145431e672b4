//! Capture Judge
//!
//! Frames the capture window around the pointer and freezes what it saw into
//! a [`Snapshot`]. Whether the snapshot satisfies the current stage is up to
//! the narrative module.

use behold_events::{CaptureImage, CapturedPeep};

use super::render::{render_snapshot, PeepVisual};
use crate::components::geometry::{Rect, Vec2};
use crate::components::peep::{Peep, PeepId};
use crate::config::BeholdConfig;
use crate::state::SimulationState;

/// Square capture window centred on the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureWindow {
    pub rect: Rect,
}

impl CaptureWindow {
    pub fn centered_on(pointer: Vec2, size: f32) -> Self {
        Self {
            rect: Rect::centered(pointer, size),
        }
    }

    /// A peep is captured iff its centre lies strictly inside the window.
    pub fn captures(&self, peep: &Peep, peep_size: f32) -> bool {
        self.rect.contains_strict(peep.center(peep_size))
    }
}

/// Everything a capture saw, frozen at judgment time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub window: CaptureWindow,
    /// Captured peeps as they were, ordered by id
    pub subjects: Vec<Peep>,
    pub descriptors: Vec<CapturedPeep>,
    pub visuals: Vec<PeepVisual>,
    pub image: CaptureImage,
    /// First captured peep carrying a scripted event
    pub event_peep: Option<PeepId>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn contains(&self, id: PeepId) -> bool {
        self.subjects.iter().any(|p| p.id == id)
    }

    pub fn any(&self, predicate: impl Fn(&Peep) -> bool) -> bool {
        self.subjects.iter().any(predicate)
    }
}

/// Captures the peeps under a window centred on `pointer`.
pub fn frame_capture(state: &SimulationState, pointer: Vec2, config: &BeholdConfig) -> Snapshot {
    let peep_size = config.population.peep_size;
    let window_size = config.capture.window_size;
    let window = CaptureWindow::centered_on(pointer, window_size);

    let mut subjects: Vec<Peep> = state
        .peeps
        .iter()
        .filter(|p| window.captures(p, peep_size))
        .cloned()
        .collect();
    subjects.sort_by_key(|p| p.id);

    let origin = window.rect.origin();
    let descriptors = subjects.iter().map(Peep::descriptor).collect();
    let visuals: Vec<PeepVisual> = subjects.iter().map(|p| PeepVisual::of(p, origin)).collect();
    let document = render_snapshot(window_size, peep_size, &visuals);
    let side = window_size.round().max(0.0) as u32;

    let event_peep = subjects
        .iter()
        .find(|p| p.is_event_target && p.event.is_some())
        .map(|p| p.id);

    tracing::debug!(
        x = pointer.x,
        y = pointer.y,
        captured = subjects.len(),
        event_peep = ?event_peep,
        "framed capture"
    );

    Snapshot {
        window,
        subjects,
        descriptors,
        visuals,
        image: CaptureImage::svg(side, side, document),
        event_peep,
    }
}
