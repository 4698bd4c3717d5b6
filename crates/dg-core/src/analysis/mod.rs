//! Generation analysis
//!
//! Runs a generator many times and summarizes how it behaved:
//! - `stats`: min/max/mean/standard deviation over a sample set
//! - `generation_analysis`: the per-session record and its report
//! - `runtime`: the tick-driven analyzer state machine
//! - `seed`: how each iteration's seed is chosen
//! - `config`: session settings and their validation

mod config;
mod generation_analysis;
mod runtime;
mod seed;
mod stats;

pub use config::{AnalysisConfig, ConfigError};
pub use generation_analysis::{AnalysisMetric, GenerationAnalysis};
pub use runtime::{AnalyzerState, CompletionCallback, RuntimeAnalyzer, StopHandle};
pub use seed::{SeedGenerationMode, SeedSequence};
pub use stats::{NumberSetData, NumberSummary};
