//! Generation driver contract
//!
//! The analyzer only sees a generator through [`GenerationDriver`]: it sets
//! a seed and an attempt budget, triggers a run, listens for status changes
//! and reads back the [`GenerationStats`] of the finished attempt.

mod driver;
mod stats;
mod status;

pub use driver::GenerationDriver;
pub use stats::GenerationStats;
pub use status::{GenerationPhase, GenerationStatus};
