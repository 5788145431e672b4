//! Headline Exchange Types
//!
//! A session emits a [`HeadlineRequest`] for every valid capture. The host
//! resolves it through the newsroom and hands back a [`HeadlineResult`]
//! tagged with the same session and capture identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stage::NarrativeStage;

/// Outstanding request for a capture's headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineRequest {
    /// Session generation that issued the request
    pub session_id: Uuid,
    /// Capture sequence number within that session
    pub capture_id: u64,
    /// Stage that was current when the capture was judged
    pub stage: NarrativeStage,
    pub prompt: String,
}

/// Outcome of a headline request. Always carries a usable headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineResult {
    pub headline: String,
    /// Human-readable failure notice when the headline is a fallback
    pub error: Option<String>,
}

impl HeadlineResult {
    pub fn generated(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            error: None,
        }
    }

    pub fn fallback(headline: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
