//! Behold Simulation Core
//!
//! Peeps wandering an arena, a camera that judges what it frames, and the
//! narrative stage machine that turns accepted captures into ever more
//! hostile crowds.

use rand::rngs::SmallRng;

pub mod capture;
pub mod components;
pub mod config;
pub mod narrative;
pub mod presentation;
pub mod session;
pub mod setup;
pub mod state;
pub mod systems;

pub use components::*;
pub use config::{default_config_toml, BeholdConfig, ConfigError};
pub use narrative::{PendingMutation, SeedPolicy};
pub use presentation::{Sequencer, SequencerBusy, TvDisplay};
pub use session::{
    CaptureOutcome, CaptureReceipt, FrameReport, IgnoreReason, Notice, ResolveOutcome, Session,
    SessionSummary,
};
pub use setup::create_initial_population;
pub use state::SimulationState;

/// Seeded random number generator owned by a session
#[derive(Debug, Clone)]
pub struct SimRng(pub SmallRng);
