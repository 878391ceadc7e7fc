//! Tuning knobs for agents and timers, loadable from TOML.
//! Defaults reproduce the shipped game balance.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted timer. Keeps deadline arithmetic on the simulation clock from overflowing.
const MAX_TIMER: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: `{field}` {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Pursuer speed in world units per second.
    pub pursuer_speed: f32,
    /// Pursuer speed while frightened.
    pub frightened_speed: f32,
    pub player_speed: f32,
    /// Delay before the first Chase/Scatter toggle.
    pub warmup_secs: f32,
    /// Period of the Chase/Scatter alternation.
    pub chase_timer_secs: f32,
    pub frightened_secs: f32,
    /// Geometric distance inside which `Shy` pursuers break off and scatter.
    pub shy_range: f32,
    /// Built-in contact check radius. Zero leaves contact detection to the caller.
    pub contact_radius: f32,
    /// Pursuers hold still after each (re)spawn until the player starts moving.
    pub wait_for_first_move: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pursuer_speed: 25.0,
            frightened_speed: 15.0,
            player_speed: 20.0,
            warmup_secs: 5.0,
            chase_timer_secs: 10.0,
            frightened_secs: 15.0,
            shy_range: 200.0,
            contact_radius: 0.0,
            wait_for_first_move: true,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("pursuer_speed", self.pursuer_speed)?;
        positive("frightened_speed", self.frightened_speed)?;
        positive("player_speed", self.player_speed)?;
        timer("chase_timer_secs", self.chase_timer_secs, false)?;
        timer("frightened_secs", self.frightened_secs, false)?;
        timer("warmup_secs", self.warmup_secs, true)?;
        non_negative("shy_range", self.shy_range)?;
        non_negative("contact_radius", self.contact_radius)?;
        Ok(())
    }

    pub fn warmup(&self) -> Duration {
        seconds(self.warmup_secs)
    }

    pub fn chase_timer(&self) -> Duration {
        seconds(self.chase_timer_secs)
    }

    pub fn frightened_duration(&self) -> Duration {
        seconds(self.frightened_secs)
    }
}

/// Saturating conversion; `validate` has already rejected anything out of range.
fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).map_or(Duration::ZERO, |duration| duration.min(MAX_TIMER))
}

/// Checks the value as the clock will see it, after rounding to a `Duration`.
fn timer(field: &'static str, value: f32, zero_allowed: bool) -> Result<(), ConfigError> {
    let Ok(duration) = Duration::try_from_secs_f32(value) else {
        return Err(ConfigError::Invalid { field, reason: "must be a finite, non-negative duration" });
    };
    if duration.is_zero() && !zero_allowed {
        return Err(ConfigError::Invalid { field, reason: "rounds to a zero duration" });
    }
    if duration > MAX_TIMER {
        return Err(ConfigError::Invalid { field, reason: "must not exceed one day" });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid { field, reason: "must be a finite value above zero" });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid { field, reason: "must be a finite value of zero or more" });
    }
    Ok(())
}
