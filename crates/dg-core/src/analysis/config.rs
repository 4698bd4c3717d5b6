//! Analysis session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SeedGenerationMode;

/// A precondition that keeps an analysis session from starting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no generation driver is configured")]
    MissingDriver,

    #[error("iteration count must be greater than zero")]
    ZeroIterations,

    #[error("maximum failed attempts must be greater than zero")]
    ZeroMaxFailedAttempts,

    #[error("maximum analysis time must be a positive number of seconds, got {0}")]
    InvalidMaxAnalysisTime(f64),
}

/// Settings for one analysis session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Generation attempts to run
    pub iterations: u32,
    /// Main path restarts a single attempt may use before it fails
    pub max_failed_attempts: u32,
    /// Wall-clock budget in seconds; `None` means unbounded
    pub max_analysis_time: Option<f64>,
    pub seed_generation_mode: SeedGenerationMode,
    pub seed: u64,
    /// Tear down the last generated dungeon when the session ends
    pub clear_dungeon_on_completion: bool,
    /// Let the driver reuse tile instances between iterations
    pub allow_tile_pooling: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_failed_attempts: 20,
            max_analysis_time: None,
            seed_generation_mode: SeedGenerationMode::Random,
            seed: 0,
            clear_dungeon_on_completion: true,
            allow_tile_pooling: false,
        }
    }
}

impl AnalysisConfig {
    /// Every violated precondition, in declaration order
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if self.iterations == 0 {
            errors.push(ConfigError::ZeroIterations);
        }
        if self.max_failed_attempts == 0 {
            errors.push(ConfigError::ZeroMaxFailedAttempts);
        }
        if let Some(secs) = self.max_analysis_time
            && !(secs.is_finite() && secs > 0.0)
        {
            errors.push(ConfigError::InvalidMaxAnalysisTime(secs));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// The time budget as a duration, if one is set and valid
    pub fn max_analysis_duration(&self) -> Option<Duration> {
        self.max_analysis_time
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}
