//! Behold Runner
//!
//! Headless host for a Behold session: an autopilot photographer, a tokio
//! play loop that resolves headlines concurrently, and JSON output of the
//! resulting news feed.

pub mod autopilot;
pub mod output;
pub mod runner;
pub mod settings;

pub use autopilot::{aim, Photographer};
pub use output::{FeedError, FeedWriter};
pub use runner::{play, RunOptions, RunReport};
pub use settings::{HostSettings, SettingsError, HOST_SEED_POLICY};
