//! Aggregate results of an analysis session
//!
//! Samples are appended once per completed iteration and turned into
//! [`NumberSetData`] snapshots by [`GenerationAnalysis::analyze`].

use core::fmt;
use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::NumberSetData;
use crate::generation::{GenerationPhase, GenerationStats};

/// A named quantity sampled once per successful iteration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize,
)]
pub enum AnalysisMetric {
    #[strum(to_string = "Pre-Processing Time")]
    PreProcessTime,
    #[strum(to_string = "Main Path Generation Time")]
    MainPathGenerationTime,
    #[strum(to_string = "Branch Path Generation Time")]
    BranchPathGenerationTime,
    #[strum(to_string = "Post-Processing Time")]
    PostProcessTime,
    #[strum(to_string = "Total Time")]
    TotalTime,
    #[strum(to_string = "Main Path Room Count")]
    MainPathRoomCount,
    #[strum(to_string = "Branch Path Room Count")]
    BranchPathRoomCount,
    #[strum(to_string = "Total Room Count")]
    TotalRoomCount,
    #[strum(to_string = "Max Branch Depth")]
    MaxBranchDepth,
    #[strum(to_string = "Retries")]
    Retries,
}

impl AnalysisMetric {
    /// The timing metric that tracks `phase`
    pub fn for_phase(phase: GenerationPhase) -> Self {
        match phase {
            GenerationPhase::PreProcessing => AnalysisMetric::PreProcessTime,
            GenerationPhase::MainPath => AnalysisMetric::MainPathGenerationTime,
            GenerationPhase::Branching => AnalysisMetric::BranchPathGenerationTime,
            GenerationPhase::PostProcessing => AnalysisMetric::PostProcessTime,
        }
    }

    /// Timings are sampled in milliseconds
    pub fn is_timing(&self) -> bool {
        matches!(
            self,
            AnalysisMetric::PreProcessTime
                | AnalysisMetric::MainPathGenerationTime
                | AnalysisMetric::BranchPathGenerationTime
                | AnalysisMetric::PostProcessTime
                | AnalysisMetric::TotalTime
        )
    }

    fn sample(&self, stats: &GenerationStats) -> f64 {
        fn millis(d: Duration) -> f64 {
            d.as_nanos() as f64 / 1_000_000.0
        }

        match self {
            AnalysisMetric::PreProcessTime => millis(stats.pre_process_time),
            AnalysisMetric::MainPathGenerationTime => millis(stats.main_path_generation_time),
            AnalysisMetric::BranchPathGenerationTime => millis(stats.branch_path_generation_time),
            AnalysisMetric::PostProcessTime => millis(stats.post_process_time),
            AnalysisMetric::TotalTime => millis(stats.total_time),
            AnalysisMetric::MainPathRoomCount => stats.main_path_room_count as f64,
            AnalysisMetric::BranchPathRoomCount => stats.branch_path_room_count as f64,
            AnalysisMetric::TotalRoomCount => stats.total_room_count() as f64,
            AnalysisMetric::MaxBranchDepth => stats.max_branch_depth as f64,
            AnalysisMetric::Retries => stats.total_retries as f64,
        }
    }
}

/// Record of one analysis session
#[derive(Debug, Clone, Default)]
pub struct GenerationAnalysis {
    target_iterations: u32,
    iteration_count: u32,
    success_count: u32,
    total_retries: u64,
    finished_early: bool,
    analysis_time: Duration,
    samples: BTreeMap<AnalysisMetric, Vec<f64>>,
    statistics: BTreeMap<AnalysisMetric, NumberSetData>,
}

/// Serialized form of [`GenerationAnalysis`], derived values included
#[derive(Serialize)]
struct Report<'a> {
    target_iterations: u32,
    iteration_count: u32,
    success_count: u32,
    failure_count: u32,
    success_percentage: f64,
    total_retries: u64,
    finished_early: bool,
    analysis_time_secs: f64,
    statistics: &'a BTreeMap<AnalysisMetric, NumberSetData>,
}

impl GenerationAnalysis {
    pub fn new(target_iterations: u32) -> Self {
        Self {
            target_iterations,
            ..Default::default()
        }
    }

    /// Count a completed iteration and keep its samples
    pub fn record_success(&mut self, stats: &GenerationStats) {
        self.iteration_count += 1;
        self.success_count += 1;
        self.total_retries += u64::from(stats.total_retries);
        for metric in AnalysisMetric::iter() {
            self.samples
                .entry(metric)
                .or_default()
                .push(metric.sample(stats));
        }
    }

    /// Count a failed iteration; failures contribute no samples
    pub fn record_failure(&mut self) {
        self.iteration_count += 1;
    }

    pub fn mark_finished_early(&mut self) {
        self.finished_early = true;
    }

    /// Freeze the samples into statistics
    pub fn analyze(&mut self, analysis_time: Duration) {
        self.analysis_time = analysis_time;
        self.statistics = AnalysisMetric::iter()
            .map(|metric| {
                let samples = self.samples.get(&metric).map(Vec::as_slice).unwrap_or(&[]);
                (metric, NumberSetData::new(samples.iter().copied()))
            })
            .collect();
    }

    pub fn target_iterations(&self) -> u32 {
        self.target_iterations
    }

    /// Iterations that reached a terminal status
    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn failure_count(&self) -> u32 {
        self.iteration_count - self.success_count
    }

    /// Retries summed over completed iterations
    pub fn total_retries(&self) -> u64 {
        self.total_retries
    }

    /// Ran out of time (or was stopped) before reaching the target
    pub fn finished_early(&self) -> bool {
        self.finished_early
    }

    pub fn analysis_time(&self) -> Duration {
        self.analysis_time
    }

    /// Successes as a percentage of the target iteration count
    pub fn success_percentage(&self) -> f64 {
        if self.target_iterations == 0 {
            return 0.0;
        }
        self.success_count as f64 / self.target_iterations as f64 * 100.0
    }

    /// Raw samples collected so far for `metric`
    pub fn samples(&self, metric: AnalysisMetric) -> &[f64] {
        self.samples.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Statistics for `metric`; empty until [`analyze`](Self::analyze) runs
    pub fn statistic(&self, metric: AnalysisMetric) -> &NumberSetData {
        self.statistics.get(&metric).unwrap_or(&NumberSetData::EMPTY)
    }

    pub fn phase_statistic(&self, phase: GenerationPhase) -> &NumberSetData {
        self.statistic(AnalysisMetric::for_phase(phase))
    }
}

impl Serialize for GenerationAnalysis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Report {
            target_iterations: self.target_iterations,
            iteration_count: self.iteration_count,
            success_count: self.success_count,
            failure_count: self.failure_count(),
            success_percentage: self.success_percentage(),
            total_retries: self.total_retries,
            finished_early: self.finished_early,
            analysis_time_secs: self.analysis_time.as_secs_f64(),
            statistics: &self.statistics,
        }
        .serialize(serializer)
    }
}

impl fmt::Display for GenerationAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Generation Analysis =====")?;
        write!(
            f,
            "Iterations: {} / {}",
            self.iteration_count, self.target_iterations
        )?;
        if self.finished_early {
            write!(f, " (finished early)")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Successful: {} ({}%)",
            self.success_count,
            self.success_percentage().round() as i64
        )?;
        writeln!(f, "Total Retries: {}", self.total_retries)?;
        writeln!(
            f,
            "Analysis Time: {:.2}s",
            self.analysis_time.as_secs_f64()
        )?;
        writeln!(f)?;

        for metric in AnalysisMetric::iter() {
            let label = if metric.is_timing() {
                format!("{} (ms)", metric)
            } else {
                metric.to_string()
            };
            writeln!(f, "{:<34}{}", label, self.statistic(metric))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(rooms: u32, retries: u32, main_path_ms: u64) -> GenerationStats {
        GenerationStats {
            main_path_generation_time: Duration::from_millis(main_path_ms),
            total_time: Duration::from_millis(main_path_ms + 1),
            main_path_room_count: rooms,
            branch_path_room_count: 2,
            max_branch_depth: 1,
            total_retries: retries,
            ..Default::default()
        }
    }

    #[test]
    fn test_success_and_failure_accounting() {
        let mut analysis = GenerationAnalysis::new(4);
        analysis.record_success(&completed(5, 1, 10));
        analysis.record_failure();
        analysis.record_success(&completed(7, 2, 20));
        analysis.analyze(Duration::from_millis(50));

        assert_eq!(analysis.iteration_count(), 3);
        assert_eq!(analysis.success_count(), 2);
        assert_eq!(analysis.failure_count(), 1);
        assert_eq!(analysis.total_retries(), 3);
        assert_eq!(analysis.success_percentage(), 50.0);
        assert!(!analysis.finished_early());

        let main = analysis.statistic(AnalysisMetric::MainPathRoomCount);
        assert_eq!(main.count(), 2);
        assert_eq!(main.mean(), Some(6.0));
        assert_eq!(analysis.statistic(AnalysisMetric::TotalRoomCount).max(), Some(9.0));

        let timing = analysis.phase_statistic(GenerationPhase::MainPath);
        assert_eq!(timing.min(), Some(10.0));
        assert_eq!(timing.max(), Some(20.0));
    }

    #[test]
    fn test_statistics_empty_before_analyze() {
        let mut analysis = GenerationAnalysis::new(1);
        analysis.record_success(&completed(5, 0, 1));
        assert_eq!(analysis.samples(AnalysisMetric::MainPathRoomCount), &[5.0]);
        assert!(analysis.statistic(AnalysisMetric::MainPathRoomCount).is_empty());
    }

    #[test]
    fn test_all_failures_report_no_data() {
        let mut analysis = GenerationAnalysis::new(2);
        analysis.record_failure();
        analysis.record_failure();
        analysis.analyze(Duration::ZERO);
        for metric in AnalysisMetric::iter() {
            assert!(analysis.statistic(metric).is_empty());
        }
        let report = analysis.to_string();
        assert!(report.contains("Successful: 0 (0%)"));
        assert!(report.contains("[ No data available ]"));
    }

    #[test]
    fn test_report_mentions_early_finish() {
        let mut analysis = GenerationAnalysis::new(10);
        analysis.record_success(&completed(3, 0, 2));
        analysis.mark_finished_early();
        analysis.analyze(Duration::from_secs(1));
        let report = analysis.to_string();
        assert!(report.contains("Iterations: 1 / 10 (finished early)"));
        assert!(report.contains("Successful: 1 (10%)"));
        assert!(report.contains("Main Path Room Count"));
        assert!(report.contains("Total Time (ms)"));
    }

    #[test]
    fn test_json_report_carries_derived_values() {
        let mut analysis = GenerationAnalysis::new(4);
        analysis.record_success(&completed(5, 1, 10));
        analysis.record_failure();
        analysis.record_success(&completed(7, 1, 20));
        analysis.analyze(Duration::from_millis(1500));

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["target_iterations"], 4);
        assert_eq!(json["iteration_count"], 3);
        assert_eq!(json["success_count"], 2);
        assert_eq!(json["failure_count"], 1);
        assert_eq!(json["success_percentage"], 50.0);
        assert_eq!(json["total_retries"], 2);
        assert_eq!(json["finished_early"], false);
        assert_eq!(json["analysis_time_secs"], 1.5);

        let statistics = json["statistics"].as_object().unwrap();
        assert_eq!(statistics.len(), AnalysisMetric::iter().count());
        assert_eq!(statistics["MainPathRoomCount"]["count"], 2);
        assert_eq!(statistics["MainPathRoomCount"]["summary"]["mean"], 6.0);
        assert!(json.get("samples").is_none());
    }

    #[test]
    fn test_json_report_without_data() {
        let mut analysis = GenerationAnalysis::new(1);
        analysis.record_failure();
        analysis.analyze(Duration::ZERO);

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["success_percentage"], 0.0);
        assert!(json["statistics"]["TotalTime"]["summary"].is_null());
    }

    #[test]
    fn test_percentage_rounds_for_display() {
        let mut analysis = GenerationAnalysis::new(3);
        analysis.record_success(&completed(3, 0, 2));
        analysis.record_success(&completed(3, 0, 2));
        analysis.record_failure();
        analysis.analyze(Duration::ZERO);
        assert!(analysis.to_string().contains("Successful: 2 (67%)"));
    }
}
