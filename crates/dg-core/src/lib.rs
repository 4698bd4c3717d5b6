//! dg-core: Tile pooling and generation analysis for DunGen
//!
//! Three pieces make up the crate:
//! - [`pool`]: a bucketed object pool for reusable tile instances
//! - [`analysis`]: a tick-driven analyzer that runs a generator many times
//!   and summarizes per-phase timings, room counts and retries
//! - [`layout`]: a reference room-graph generator to analyze
//!
//! Generators plug into the analyzer through [`generation::GenerationDriver`].

pub mod analysis;
pub mod config;
pub mod generation;
pub mod layout;
pub mod pool;
mod rng;

pub use analysis::{
    AnalysisConfig, AnalysisMetric, AnalyzerState, GenerationAnalysis, NumberSetData,
    RuntimeAnalyzer, SeedGenerationMode, StopHandle,
};
pub use config::{AnalyzeFile, LoadError};
pub use generation::{GenerationDriver, GenerationPhase, GenerationStats, GenerationStatus};
pub use layout::{DungeonFlow, LayoutGenerator};
pub use pool::{BucketedPool, PoolObject};
pub use rng::GenRng;
