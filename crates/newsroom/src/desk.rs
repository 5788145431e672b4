//! Headline Desk
//!
//! Wraps a generator with a deadline, cleans up its text and substitutes the
//! stage fallback on any failure.

use std::time::Duration;

use behold_events::{HeadlineResult, NarrativeStage};

use crate::backend::HeadlineGenerator;
use crate::error::NewsroomError;
use crate::fallback::fallback_headline;

/// Strips quote and emphasis characters and surrounding whitespace.
pub fn sanitize_headline(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '"' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}

pub struct HeadlineDesk<G> {
    generator: G,
    timeout: Duration,
}

impl<G: HeadlineGenerator> HeadlineDesk<G> {
    pub fn new(generator: G, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    async fn attempt(&self, prompt: &str) -> Result<String, NewsroomError> {
        let raw = tokio::time::timeout(self.timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| NewsroomError::Timeout(self.timeout))??;

        let headline = sanitize_headline(&raw);
        if headline.is_empty() {
            return Err(NewsroomError::Empty);
        }
        Ok(headline)
    }

    /// Requests one headline. Never fails: on any error the stage fallback
    /// is returned along with a message for the player.
    pub async fn request_headline(&self, prompt: &str, stage: NarrativeStage) -> HeadlineResult {
        match self.attempt(prompt).await {
            Ok(headline) => {
                tracing::debug!(stage = %stage, %headline, "headline generated");
                HeadlineResult::generated(headline)
            }
            Err(error) => {
                tracing::warn!(
                    stage = %stage,
                    %error,
                    "headline generation failed, using fallback"
                );
                HeadlineResult::fallback(fallback_headline(stage), error.user_message())
            }
        }
    }
}
