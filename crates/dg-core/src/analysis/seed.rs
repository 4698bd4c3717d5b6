//! Seed generation policies for repeated runs

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::rng::GenRng;

/// How each iteration's seed is chosen
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SeedGenerationMode {
    /// Draw from a random stream seeded with the configured seed
    #[default]
    Random,
    /// Configured seed plus the iteration index
    Incremental,
    /// The configured seed every time
    Fixed,
}

/// Produces the seed for each iteration of one analysis session
#[derive(Debug, Clone)]
pub struct SeedSequence {
    mode: SeedGenerationMode,
    base: u64,
    stream: GenRng,
    index: u64,
}

impl SeedSequence {
    pub fn new(mode: SeedGenerationMode, seed: u64) -> Self {
        Self {
            mode,
            base: seed,
            stream: GenRng::new(seed),
            index: 0,
        }
    }

    pub fn mode(&self) -> SeedGenerationMode {
        self.mode
    }

    /// Seed for the next iteration
    pub fn next_seed(&mut self) -> u64 {
        let seed = match self.mode {
            SeedGenerationMode::Random => self.stream.next_seed(),
            SeedGenerationMode::Incremental => self.base.wrapping_add(self.index),
            SeedGenerationMode::Fixed => self.base,
        };
        self.index += 1;
        seed
    }
}
