//! Generation status and phases

use core::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Timed phases of a single generation attempt, in execution order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
pub enum GenerationPhase {
    #[strum(to_string = "Pre-Processing")]
    PreProcessing,
    #[strum(to_string = "Main Path Generation")]
    MainPath,
    #[strum(to_string = "Branch Path Generation")]
    Branching,
    #[strum(to_string = "Post-Processing")]
    PostProcessing,
}

/// Status reported by a driver while an attempt runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenerationStatus {
    #[default]
    NotStarted,
    InProgress(GenerationPhase),
    Complete,
    Failed,
}

impl GenerationStatus {
    /// Complete and Failed never change further
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Complete | GenerationStatus::Failed)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStatus::NotStarted => f.write_str("Not Started"),
            GenerationStatus::InProgress(phase) => write!(f, "{}", phase),
            GenerationStatus::Complete => f.write_str("Complete"),
            GenerationStatus::Failed => f.write_str("Failed"),
        }
    }
}
