//! Analyzing the reference layout generator end to end

use dg_core::analysis::AnalysisMetric;
use dg_core::generation::GenerationPhase;
use dg_core::layout::{CountRange, TileTemplate};
use dg_core::{AnalysisConfig, DungeonFlow, LayoutGenerator, RuntimeAnalyzer, SeedGenerationMode};

fn session(pooling: bool) -> AnalysisConfig {
    AnalysisConfig {
        iterations: 25,
        seed_generation_mode: SeedGenerationMode::Incremental,
        seed: 1,
        allow_tile_pooling: pooling,
        ..Default::default()
    }
}

#[test]
fn test_default_flow_analysis() {
    let flow = DungeonFlow::default();
    let generator = LayoutGenerator::new(flow.clone()).unwrap();
    let mut analyzer = RuntimeAnalyzer::new(session(false)).with_driver(generator);
    assert!(analyzer.run_analysis());
    let results = analyzer.run_to_completion().unwrap();

    assert_eq!(results.iteration_count(), 25);
    assert!(results.success_count() > 0);

    let main = results.statistic(AnalysisMetric::MainPathRoomCount);
    assert_eq!(main.count(), results.success_count() as usize);
    assert!(main.min().unwrap() >= f64::from(flow.main_path_length.min));
    assert!(main.max().unwrap() <= f64::from(flow.main_path_length.max));

    let depth = results.statistic(AnalysisMetric::MaxBranchDepth);
    assert!(depth.max().unwrap() <= f64::from(flow.branch_depth.max));

    for phase in [
        GenerationPhase::PreProcessing,
        GenerationPhase::MainPath,
        GenerationPhase::Branching,
        GenerationPhase::PostProcessing,
    ] {
        let timing = results.phase_statistic(phase);
        assert_eq!(timing.count(), main.count());
        assert!(timing.min().unwrap() >= 0.0);
    }
}

#[test]
fn test_pooling_does_not_change_layouts() {
    let run = |pooling: bool| {
        let generator = LayoutGenerator::new(DungeonFlow::default()).unwrap();
        let mut analyzer = RuntimeAnalyzer::new(session(pooling)).with_driver(generator);
        assert!(analyzer.run_analysis());
        analyzer.run_to_completion().cloned().unwrap()
    };
    let plain = run(false);
    let pooled = run(true);

    assert_eq!(plain.success_count(), pooled.success_count());
    assert_eq!(plain.total_retries(), pooled.total_retries());
    for metric in [
        AnalysisMetric::MainPathRoomCount,
        AnalysisMetric::BranchPathRoomCount,
        AnalysisMetric::MaxBranchDepth,
    ] {
        assert_eq!(plain.samples(metric), pooled.samples(metric));
    }
}

#[test]
fn test_impossible_flow_fails_every_iteration() {
    let flow = DungeonFlow {
        width: 8,
        height: 8,
        main_path_length: CountRange::new(2, 2),
        branch_count: CountRange::new(0, 0),
        templates: vec![TileTemplate::new("block", 6, 6)],
        ..Default::default()
    };
    let generator = LayoutGenerator::new(flow).unwrap();
    let mut analyzer = RuntimeAnalyzer::new(AnalysisConfig {
        iterations: 5,
        max_failed_attempts: 3,
        ..Default::default()
    })
    .with_driver(generator);
    assert!(analyzer.run_analysis());
    let results = analyzer.run_to_completion().unwrap();

    assert_eq!(results.iteration_count(), 5);
    assert_eq!(results.success_count(), 0);
    assert_eq!(results.total_retries(), 0);
    assert!(results.statistic(AnalysisMetric::Retries).is_empty());
}
