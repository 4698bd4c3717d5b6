//! Per-attempt generation results

use std::time::Duration;

use serde::Serialize;

use super::GenerationPhase;

/// What a driver measured during its latest attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub pre_process_time: Duration,
    pub main_path_generation_time: Duration,
    pub branch_path_generation_time: Duration,
    pub post_process_time: Duration,
    /// Wall time of the whole attempt, retries included
    pub total_time: Duration,
    pub main_path_room_count: u32,
    pub branch_path_room_count: u32,
    /// Deepest branch grown off the main path
    pub max_branch_depth: u32,
    /// Times the main path was thrown away and restarted
    pub total_retries: u32,
}

impl GenerationStats {
    pub fn total_room_count(&self) -> u32 {
        self.main_path_room_count + self.branch_path_room_count
    }

    pub fn phase_time(&self, phase: GenerationPhase) -> Duration {
        match phase {
            GenerationPhase::PreProcessing => self.pre_process_time,
            GenerationPhase::MainPath => self.main_path_generation_time,
            GenerationPhase::Branching => self.branch_path_generation_time,
            GenerationPhase::PostProcessing => self.post_process_time,
        }
    }

    /// Add `elapsed` to the running time of `phase`
    pub fn add_phase_time(&mut self, phase: GenerationPhase, elapsed: Duration) {
        let slot = match phase {
            GenerationPhase::PreProcessing => &mut self.pre_process_time,
            GenerationPhase::MainPath => &mut self.main_path_generation_time,
            GenerationPhase::Branching => &mut self.branch_path_generation_time,
            GenerationPhase::PostProcessing => &mut self.post_process_time,
        };
        *slot += elapsed;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_time_accumulates() {
        let mut stats = GenerationStats::default();
        stats.add_phase_time(GenerationPhase::MainPath, Duration::from_millis(3));
        stats.add_phase_time(GenerationPhase::MainPath, Duration::from_millis(4));
        assert_eq!(stats.phase_time(GenerationPhase::MainPath), Duration::from_millis(7));
        assert_eq!(stats.phase_time(GenerationPhase::Branching), Duration::ZERO);
    }

    #[test]
    fn test_total_room_count() {
        let stats = GenerationStats {
            main_path_room_count: 5,
            branch_path_room_count: 3,
            ..Default::default()
        };
        assert_eq!(stats.total_room_count(), 8);
    }
}
