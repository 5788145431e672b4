//! Configuration loading for a Behold session.
//!
//! All tuning parameters live in a TOML file; every section is optional and
//! falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::geometry::Rect;
use crate::narrative::SeedPolicy;

/// Complete session configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeholdConfig {
    /// Arena and obstacle dimensions
    #[serde(default)]
    pub arena: ArenaConfig,
    /// Initial population
    #[serde(default)]
    pub population: PopulationConfig,
    /// Per-tick steering and violence parameters
    #[serde(default)]
    pub motion: MotionConfig,
    /// Capture window settings
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Presentation sequence timings
    #[serde(default)]
    pub presentation: PresentationConfig,
    /// Stage effects and session timers
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl BeholdConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// Unknown top-level tables are ignored so one file can also carry the
    /// host's and the newsroom's sections.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("motion.wander_turn_chance", self.motion.wander_turn_chance)?;
        check_probability("motion.retarget_chance", self.motion.retarget_chance)?;
        check_probability("narrative.anger_spread_fraction", self.narrative.anger_spread_fraction)?;

        let size = self.population.peep_size;
        if !(size > 0.0 && size < self.arena.width && size < self.arena.height) {
            return Err(ConfigError::Invalid(format!(
                "population.peep_size must be positive and smaller than the {}x{} arena, got {}",
                self.arena.width, self.arena.height, size
            )));
        }
        Ok(())
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Arena configuration. The TV obstacle is centred in the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub tv_width: f32,
    pub tv_stand_height: f32,
    pub tv_antenna_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 820.0,
            height: 615.0,
            tv_width: 240.0,
            tv_stand_height: 48.0,
            tv_antenna_height: 16.0,
        }
    }
}

impl ArenaConfig {
    /// Height of the whole TV: 16:9 screen, stand and antenna.
    pub fn tv_height(&self) -> f32 {
        self.tv_width * 9.0 / 16.0 + self.tv_stand_height + self.tv_antenna_height
    }

    /// Collision box of the TV obstacle.
    pub fn tv_box(&self) -> Rect {
        let height = self.tv_height();
        Rect::new(
            (self.width - self.tv_width) / 2.0,
            (self.height - height) / 2.0,
            self.tv_width,
            height,
        )
    }
}

/// Initial population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of peeps spawned at session start
    pub peep_count: usize,
    /// Side length of a peep's square footprint
    pub peep_size: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            peep_count: 18,
            peep_size: 48.0,
        }
    }
}

/// Movement and violence tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Distance covered per tick by a calm peep
    pub base_speed: f32,
    /// Distance covered per tick by an angry peep
    pub angry_speed: f32,
    /// Speed multiplier applied to scared peeps
    pub scared_multiplier: f32,
    /// Per-tick chance that a wandering peep picks a new direction
    pub wander_turn_chance: f64,
    /// Per-tick chance that an untargeted mass-violence peep picks a victim
    pub retarget_chance: f64,
    /// Attack lands below this multiple of the peep footprint
    pub attack_reach_factor: f32,
    /// Bystanders within this multiple of the capture window get scared
    pub fright_radius_factor: f32,
    /// Pause after landing an attack, in milliseconds
    pub attack_pause_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: 1.0,
            angry_speed: 2.0,
            scared_multiplier: 1.5,
            wander_turn_chance: 0.01,
            retarget_chance: 0.02,
            attack_reach_factor: 0.75,
            fright_radius_factor: 1.5,
            attack_pause_ms: 1000,
        }
    }
}

/// Capture window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Side length of the square capture window
    pub window_size: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { window_size: 200.0 }
    }
}

/// Presentation sequence timings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub shutter_ms: u32,
    pub zoom_in_ms: u32,
    pub showing_news_ms: u32,
    pub zoom_out_ms: u32,
    /// Lifetime of a headline-service notice
    pub notice_ms: u32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            shutter_ms: 150,
            zoom_in_ms: 1000,
            showing_news_ms: 2500,
            zoom_out_ms: 1000,
            notice_ms: 5000,
        }
    }
}

/// Stage effect and session timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Fraction of Normal peeps turned Angry by an anger effect (rounded up)
    pub anger_spread_fraction: f64,
    /// Delay between the final capture and the ending screen
    pub ending_delay_ms: u32,
    /// How long the final message stays before the session restarts
    pub final_message_ms: u32,
    /// What to do when a seed step finds no qualifying peep
    pub seed_policy: SeedPolicy,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            anger_spread_fraction: 0.2,
            ending_delay_ms: 4000,
            final_message_ms: 4000,
            seed_policy: SeedPolicy::Strict,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error serializing TOML config
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// A value outside the range the simulation accepts
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn check_probability(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be within [0, 1], got {}", key, value)))
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Behold Configuration

[arena]
width = 820.0
height = 615.0
tv_width = 240.0
tv_stand_height = 48.0
tv_antenna_height = 16.0

[population]
peep_count = 18
peep_size = 48.0

[motion]
base_speed = 1.0
angry_speed = 2.0
scared_multiplier = 1.5
wander_turn_chance = 0.01
retarget_chance = 0.02
attack_reach_factor = 0.75
fright_radius_factor = 1.5
attack_pause_ms = 1000

[capture]
window_size = 200.0

[presentation]
shutter_ms = 150
zoom_in_ms = 1000
showing_news_ms = 2500
zoom_out_ms = 1000
notice_ms = 5000

[narrative]
anger_spread_fraction = 0.2
ending_delay_ms = 4000
final_message_ms = 4000
seed_policy = "strict"
"#
    .to_string()
}
