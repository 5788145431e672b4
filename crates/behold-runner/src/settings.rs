//! Host settings.
//!
//! One TOML file carries the game sections and the `[newsroom]` table. The
//! seed policy is resolved in this order: the command line, then the file's
//! `[narrative] seed_policy`, then [`HOST_SEED_POLICY`].

use std::path::Path;

use behold_core::{BeholdConfig, ConfigError, SeedPolicy};
use newsroom::{NewsroomConfig, NewsroomConfigError};

/// Seed policy used when neither the command line nor the file names one
pub const HOST_SEED_POLICY: SeedPolicy = SeedPolicy::Recruit;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("game config: {0}")]
    Game(#[from] ConfigError),
    #[error("newsroom config: {0}")]
    Newsroom(#[from] NewsroomConfigError),
}

#[derive(Debug, Clone)]
pub struct HostSettings {
    pub game: BeholdConfig,
    pub newsroom: NewsroomConfig,
}

impl HostSettings {
    /// Loads settings from an optional file and applies command line overrides.
    pub fn load(
        path: Option<&Path>,
        seed_policy: Option<SeedPolicy>,
    ) -> Result<Self, SettingsError> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_str(&content, seed_policy)
            }
            None => Ok(Self::defaults(seed_policy)),
        }
    }

    pub fn from_str(content: &str, seed_policy: Option<SeedPolicy>) -> Result<Self, SettingsError> {
        let mut game = BeholdConfig::from_str(content)?;
        let newsroom = NewsroomConfig::from_str(content)?;

        let table: toml::Table = toml::from_str(content).map_err(ConfigError::from)?;
        let file_sets_policy = table
            .get("narrative")
            .and_then(|narrative| narrative.get("seed_policy"))
            .is_some();

        game.narrative.seed_policy = match seed_policy {
            Some(policy) => policy,
            None if file_sets_policy => game.narrative.seed_policy,
            None => HOST_SEED_POLICY,
        };
        Ok(Self { game, newsroom })
    }

    pub fn defaults(seed_policy: Option<SeedPolicy>) -> Self {
        let mut game = BeholdConfig::default();
        game.narrative.seed_policy = seed_policy.unwrap_or(HOST_SEED_POLICY);
        Self {
            game,
            newsroom: NewsroomConfig::default(),
        }
    }
}
