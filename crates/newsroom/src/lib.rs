//! Newsroom: headline generation for Behold captures.
//!
//! A [`HeadlineDesk`] asks a [`HeadlineGenerator`] for a headline once per
//! accepted capture. Whatever goes wrong, the desk answers with the stage's
//! canned fallback and a readable error, so gameplay never waits on or fails
//! because of the backend.

pub mod backend;
pub mod config;
pub mod desk;
pub mod error;
pub mod fallback;

pub use backend::{create_backend, GeminiBackend, HeadlineGenerator, LlmBackend, OpenAiBackend};
pub use config::{BackendKind, NewsroomConfig, NewsroomConfigError};
pub use desk::{sanitize_headline, HeadlineDesk};
pub use error::NewsroomError;
pub use fallback::fallback_headline;
