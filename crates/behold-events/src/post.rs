//! News Post Types
//!
//! A post is created by a valid capture once its headline resolves, and is
//! never modified afterwards. The feed keeps the newest post first.

use serde::{Deserialize, Serialize};

use crate::peep::CapturedPeep;
use crate::stage::NarrativeStage;

/// Generates a post ID with the given capture sequence number.
pub fn generate_post_id(sequence: u64) -> String {
    format!("post_{:06}", sequence)
}

/// Rendered capture window, kept opaque by everything except the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureImage {
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub data: String,
}

impl CaptureImage {
    /// Wraps an SVG document.
    pub fn svg(width: u32, height: u32, document: String) -> Self {
        Self {
            mime_type: "image/svg+xml".to_string(),
            width,
            height,
            data: document,
        }
    }
}

/// One entry of the news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: String,
    pub headline: String,
    /// Stage that was current when the capture was judged
    pub stage: NarrativeStage,
    pub captured_image: CaptureImage,
    pub captured_peeps: Vec<CapturedPeep>,
}

impl NewsPost {
    /// Parses a post from a JSON Lines row.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serializes the post as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
