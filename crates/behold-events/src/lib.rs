//! Shared data types for the Behold narrative simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is the contract between the simulation core, the newsroom (headline
//! generation) and whatever host drives a session.

pub mod headline;
pub mod peep;
pub mod post;
pub mod stage;

pub use headline::{HeadlineRequest, HeadlineResult};
pub use peep::{CapturedPeep, Mood, Shape};
pub use post::{generate_post_id, CaptureImage, NewsPost};
pub use stage::{GamePhase, NarrativeStage, ParseStageError, PresentationPhase};
