//! Analysis settings file
//!
//! A TOML file with an `[analysis]` table for [`AnalysisConfig`] and a
//! `[flow]` table for [`DungeonFlow`]. Missing tables and keys keep their
//! defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalysisConfig;
use crate::layout::DungeonFlow;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeFile {
    pub analysis: AnalysisConfig,
    pub flow: DungeonFlow,
}

impl AnalyzeFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }
}
