//! The trait a dungeon generator implements to be analyzed

use super::{GenerationStats, GenerationStatus};

/// A generator the analyzer can drive one attempt at a time.
///
/// Status changes are delivered through the `on_status` callback passed to
/// each call, never through a stored subscription. A synchronous driver
/// reports its terminal status before `generate` returns; a driver that
/// needs several ticks keeps reporting from `poll`.
pub trait GenerationDriver {
    fn set_seed(&mut self, seed: u64);

    /// Main path restarts allowed before an attempt counts as failed
    fn set_max_attempts(&mut self, max_attempts: u32);

    /// Let the driver reuse tile instances between attempts
    fn set_tile_pooling(&mut self, _enabled: bool) {}

    /// Begin one attempt with the current seed
    fn generate(&mut self, on_status: &mut dyn FnMut(GenerationStatus));

    /// Advance an attempt that has not reached a terminal status yet
    fn poll(&mut self, _on_status: &mut dyn FnMut(GenerationStatus)) {}

    /// Results of the latest attempt. Only meaningful after `Complete`.
    fn stats(&self) -> &GenerationStats;

    /// Tear down whatever the latest attempt produced
    fn clear(&mut self) {}
}
