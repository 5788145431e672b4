//! Autopilot Photographer
//!
//! Plays the game headlessly: waits for the camera to settle, points at
//! whatever the current stage wants framed and takes the shot.

use behold_core::capture::CaptureWindow;
use behold_core::{CaptureOutcome, EventKind, Session, Vec2};
use behold_events::{GamePhase, Mood, NarrativeStage};

/// Grid step used when looking for an empty patch of arena
const SCAN_STEP: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Photographer {
    settle_ms: u32,
    idle_for: u32,
    shots: u64,
}

impl Photographer {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            idle_for: 0,
            shots: 0,
        }
    }

    /// Captures attempted so far.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Acts on the session for one frame. Returns the outcome when a capture
    /// was attempted.
    pub fn step(&mut self, session: &mut Session, dt_ms: u32) -> Option<CaptureOutcome> {
        match session.phase() {
            GamePhase::Title | GamePhase::Ending => {
                session.acknowledge();
                self.idle_for = 0;
                return None;
            }
            GamePhase::FinalMessage => return None,
            GamePhase::Playing => {}
        }

        if !session.presentation().is_idle() {
            self.idle_for = 0;
            return None;
        }

        self.idle_for = self.idle_for.saturating_add(dt_ms);
        if self.idle_for < self.settle_ms {
            return None;
        }

        let pointer = aim(session)?;
        self.shots += 1;
        let outcome = session.capture_at(pointer);
        if outcome.is_accepted() {
            tracing::debug!(x = pointer.x, y = pointer.y, "autopilot capture accepted");
            self.idle_for = 0;
        }
        Some(outcome)
    }
}

/// Where to point the camera for the current stage, if anything worth
/// photographing is in the arena right now.
pub fn aim(session: &Session) -> Option<Vec2> {
    let state = session.state();
    let size = session.config().population.peep_size;
    let centre_of = |id| state.get(id).map(|p| p.center(size));

    match session.stage() {
        NarrativeStage::Start => empty_spot(session),
        NarrativeStage::AwaitCricket => state
            .event_holder(EventKind::Cricket)
            .map(|p| p.center(size)),
        NarrativeStage::AwaitHatHate => state
            .event_holder(EventKind::HatHate)
            .map(|p| p.center(size)),
        NarrativeStage::AwaitViolence | NarrativeStage::AwaitSquareAnger => {
            state.first_where(|p| p.mood == Mood::Fallen).and_then(centre_of)
        }
        NarrativeStage::AwaitMassViolence => {
            state.first_where(|p| p.mood == Mood::Angry).and_then(centre_of)
        }
        NarrativeStage::End => None,
    }
}

/// First window position, scanning row by row, that frames nobody.
fn empty_spot(session: &Session) -> Option<Vec2> {
    let config = session.config();
    let window_size = config.capture.window_size;
    let half = window_size / 2.0;
    let peeps = &session.state().peeps;

    let mut y = half;
    while y <= config.arena.height - half {
        let mut x = half;
        while x <= config.arena.width - half {
            let pointer = Vec2::new(x, y);
            let window = CaptureWindow::centered_on(pointer, window_size);
            if !peeps
                .iter()
                .any(|p| window.captures(p, config.population.peep_size))
            {
                return Some(pointer);
            }
            x += SCAN_STEP;
        }
        y += SCAN_STEP;
    }
    None
}
