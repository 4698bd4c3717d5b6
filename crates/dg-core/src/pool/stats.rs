//! Usage counters for the bucketed pool

use serde::Serialize;

/// Snapshot of pool activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Takes served from a free list
    pub reused: u64,
    /// Takes that fell back to the factory
    pub created: u64,
    /// Instances built while pre-warming a bucket
    pub prewarmed: u64,
    /// Successful returns
    pub returned: u64,
    /// Returns refused (untracked or already free)
    pub rejected_returns: u64,
    /// Inserts refused (already tracked)
    pub rejected_inserts: u64,
}

impl PoolStats {
    /// Fraction of takes that were served by reuse (0.0 when nothing was taken)
    pub fn hit_rate(&self) -> f64 {
        let total = self.reused + self.created;
        if total == 0 {
            0.0
        } else {
            self.reused as f64 / total as f64
        }
    }
}
