//! dg-analyze: settings plumbing for the `dungen-analyze` binary
//!
//! Settings come from three layers. Command-line flags win over the
//! settings file, which wins over built-in defaults.

use std::path::Path;

use anyhow::{Context, Result};

use dg_core::{AnalysisConfig, AnalyzeFile, SeedGenerationMode};

/// Analysis settings given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub iterations: Option<u32>,
    pub max_failed_attempts: Option<u32>,
    pub max_analysis_time: Option<f64>,
    pub seed: Option<u64>,
    pub seed_mode: Option<SeedGenerationMode>,
    pub pooling: Option<bool>,
    pub clear_dungeon: Option<bool>,
}

impl Overrides {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(max) = self.max_failed_attempts {
            config.max_failed_attempts = max;
        }
        if let Some(secs) = self.max_analysis_time {
            config.max_analysis_time = Some(secs);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(mode) = self.seed_mode {
            config.seed_generation_mode = mode;
        }
        if let Some(pooling) = self.pooling {
            config.allow_tile_pooling = pooling;
        }
        if let Some(clear) = self.clear_dungeon {
            config.clear_dungeon_on_completion = clear;
        }
    }
}

/// Read the settings file if one was given, then layer `overrides` on top
pub fn load_settings(path: Option<&Path>, overrides: &Overrides) -> Result<AnalyzeFile> {
    let mut settings = match path {
        Some(path) => AnalyzeFile::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => AnalyzeFile::default(),
    };
    overrides.apply(&mut settings.analysis);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = AnalysisConfig {
            iterations: 12,
            allow_tile_pooling: true,
            ..Default::default()
        };
        let before = config.clone();
        Overrides::default().apply(&mut config);
        assert_eq!(config, before);
    }

    #[test]
    fn test_flags_win_over_file() {
        let mut config = AnalysisConfig {
            iterations: 12,
            seed: 3,
            ..Default::default()
        };
        let overrides = Overrides {
            iterations: Some(40),
            max_analysis_time: Some(2.5),
            seed_mode: Some(SeedGenerationMode::Fixed),
            pooling: Some(true),
            clear_dungeon: Some(false),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.iterations, 40);
        assert_eq!(config.seed, 3);
        assert_eq!(config.max_analysis_time, Some(2.5));
        assert_eq!(config.seed_generation_mode, SeedGenerationMode::Fixed);
        assert!(config.allow_tile_pooling);
        assert!(!config.clear_dungeon_on_completion);
    }

    #[test]
    fn test_flags_can_switch_file_settings_off() {
        let mut config = AnalysisConfig {
            allow_tile_pooling: true,
            clear_dungeon_on_completion: false,
            ..Default::default()
        };
        let overrides = Overrides {
            pooling: Some(false),
            clear_dungeon: Some(true),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert!(!config.allow_tile_pooling);
        assert!(config.clear_dungeon_on_completion);
    }

    #[test]
    fn test_no_file_means_defaults() {
        let settings = load_settings(None, &Overrides::default()).unwrap();
        assert_eq!(settings, AnalyzeFile::default());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_settings(Some(Path::new("/nonexistent/analyze.toml")), &Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/analyze.toml"));
    }
}
