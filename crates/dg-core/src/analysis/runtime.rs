//! Runtime analyzer: repeated generation runs driven by scheduling ticks
//!
//! One session walks Idle -> Running -> Finalizing -> Idle. Each call to
//! [`RuntimeAnalyzer::tick`] does at most one unit of work: start the next
//! iteration, poll an iteration still in flight, or finalize. Iterations are
//! strictly sequential, so sample order is completion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, error, info, trace, warn};

use super::{AnalysisConfig, ConfigError, GenerationAnalysis, SeedSequence};
use crate::generation::{GenerationDriver, GenerationStatus};

/// Where the analyzer is in its session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerState {
    #[default]
    Idle,
    Running,
    Finalizing,
}

/// Cooperative stop flag, checked once per tick.
///
/// Stopping finalizes the session the same way an exhausted time budget
/// does.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Session-complete notification
pub type CompletionCallback = Box<dyn FnMut(&GenerationAnalysis)>;

/// Drives a [`GenerationDriver`] through repeated attempts and aggregates
/// the outcome.
pub struct RuntimeAnalyzer {
    config: AnalysisConfig,
    driver: Option<Box<dyn GenerationDriver>>,
    state: AnalyzerState,
    seeds: SeedSequence,
    analysis: GenerationAnalysis,
    results: Option<GenerationAnalysis>,
    remaining_iterations: u32,
    in_flight: bool,
    current_seed: Option<u64>,
    started_at: Option<Instant>,
    stop: StopHandle,
    on_complete: Vec<CompletionCallback>,
}

impl RuntimeAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let seeds = SeedSequence::new(config.seed_generation_mode, config.seed);
        Self {
            config,
            driver: None,
            state: AnalyzerState::Idle,
            seeds,
            analysis: GenerationAnalysis::default(),
            results: None,
            remaining_iterations: 0,
            in_flight: false,
            current_seed: None,
            started_at: None,
            stop: StopHandle::default(),
            on_complete: Vec::new(),
        }
    }

    /// Builder form of [`set_driver`](Self::set_driver)
    pub fn with_driver(mut self, driver: impl GenerationDriver + 'static) -> Self {
        self.set_driver(Box::new(driver));
        self
    }

    /// The generator to analyze. Ignored while a session is running.
    pub fn set_driver(&mut self, driver: Box<dyn GenerationDriver>) {
        if self.state != AnalyzerState::Idle {
            warn!("Cannot replace the generation driver while an analysis is running");
            return;
        }
        self.driver = Some(driver);
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Settings take effect at the next [`run_analysis`](Self::run_analysis)
    pub fn config_mut(&mut self) -> &mut AnalysisConfig {
        &mut self.config
    }

    /// Register a callback invoked with the final report of every session
    pub fn on_analysis_complete(&mut self, callback: impl FnMut(&GenerationAnalysis) + 'static) {
        self.on_complete.push(Box::new(callback));
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != AnalyzerState::Idle
    }

    pub fn remaining_iterations(&self) -> u32 {
        self.remaining_iterations
    }

    /// Seed handed to the driver for the latest iteration
    pub fn current_seed(&self) -> Option<u64> {
        self.current_seed
    }

    /// In-progress record of the running session
    pub fn progress(&self) -> &GenerationAnalysis {
        &self.analysis
    }

    /// Report of the most recently finished session
    pub fn results(&self) -> Option<&GenerationAnalysis> {
        self.results.as_ref()
    }

    /// Start a session.
    ///
    /// Every violated precondition is logged as an error and the analyzer
    /// stays idle; the driver is not touched in that case.
    pub fn run_analysis(&mut self) -> bool {
        if self.state != AnalyzerState::Idle {
            warn!("An analysis is already running");
            return false;
        }

        let mut problems = self.config.validate().err().unwrap_or_default();
        if self.driver.is_none() {
            problems.insert(0, ConfigError::MissingDriver);
        }
        if !problems.is_empty() {
            for problem in &problems {
                error!("Cannot start generation analysis: {}", problem);
            }
            return false;
        }

        let Some(driver) = self.driver.as_mut() else {
            return false;
        };
        driver.set_max_attempts(self.config.max_failed_attempts);
        driver.set_tile_pooling(self.config.allow_tile_pooling);

        self.seeds = SeedSequence::new(self.config.seed_generation_mode, self.config.seed);
        self.analysis = GenerationAnalysis::new(self.config.iterations);
        self.results = None;
        self.remaining_iterations = self.config.iterations;
        self.in_flight = false;
        self.current_seed = None;
        self.stop.reset();
        self.started_at = Some(Instant::now());
        self.state = AnalyzerState::Running;

        info!(
            "Starting generation analysis: {} iterations, {} seeds from {}",
            self.config.iterations, self.config.seed_generation_mode, self.config.seed
        );
        true
    }

    /// Run one scheduling tick and return the resulting state
    pub fn tick(&mut self) -> AnalyzerState {
        match self.state {
            AnalyzerState::Idle => return AnalyzerState::Idle,
            AnalyzerState::Finalizing => {
                self.finalize();
                return self.state;
            }
            AnalyzerState::Running => {}
        }

        self.check_time_budget();
        if self.remaining_iterations == 0 {
            self.state = AnalyzerState::Finalizing;
            self.finalize();
            return self.state;
        }

        let mut statuses = Vec::new();
        {
            let Some(driver) = self.driver.as_mut() else {
                error!("Generation driver disappeared mid-analysis; finalizing");
                self.remaining_iterations = 0;
                self.state = AnalyzerState::Finalizing;
                self.finalize();
                return self.state;
            };
            let mut on_status = |status: GenerationStatus| statuses.push(status);

            if self.in_flight {
                driver.poll(&mut on_status);
            } else {
                let seed = self.seeds.next_seed();
                self.current_seed = Some(seed);
                self.in_flight = true;
                driver.set_seed(seed);
                driver.generate(&mut on_status);
            }
        }

        for status in statuses {
            self.on_generation_status_changed(status);
        }

        if self.state == AnalyzerState::Finalizing {
            self.finalize();
        }
        self.state
    }

    /// Tick until the current session returns to idle.
    ///
    /// A driver that never reports a terminal status keeps this looping
    /// unless a time budget is configured or a stop is requested.
    pub fn run_to_completion(&mut self) -> Option<&GenerationAnalysis> {
        while self.tick() != AnalyzerState::Idle {}
        self.results()
    }

    fn on_generation_status_changed(&mut self, status: GenerationStatus) {
        if !status.is_terminal() {
            trace!("Generation status: {}", status);
            return;
        }
        if !self.in_flight {
            warn!("Ignoring {} status with no iteration in flight", status);
            return;
        }
        self.in_flight = false;

        match status {
            GenerationStatus::Complete => {
                if let Some(driver) = self.driver.as_ref() {
                    self.analysis.record_success(driver.stats());
                }
            }
            _ => self.analysis.record_failure(),
        }

        self.remaining_iterations = self.remaining_iterations.saturating_sub(1);
        debug!(
            "Iteration {}/{} (seed {:?}): {}",
            self.analysis.iteration_count(),
            self.analysis.target_iterations(),
            self.current_seed,
            status
        );

        if self.remaining_iterations == 0 {
            self.state = AnalyzerState::Finalizing;
        }
    }

    fn check_time_budget(&mut self) {
        if self.remaining_iterations == 0 {
            return;
        }

        let timed_out = match (self.config.max_analysis_duration(), self.started_at) {
            (Some(budget), Some(started)) => started.elapsed() >= budget,
            _ => false,
        };
        let stopped = self.stop.is_stop_requested();
        if !(timed_out || stopped) {
            return;
        }

        // An attempt cut off mid-run was started, so it counts as a failure.
        if self.in_flight {
            self.in_flight = false;
            self.analysis.record_failure();
            debug!(
                "Abandoning in-flight iteration (seed {:?})",
                self.current_seed
            );
        }

        if timed_out {
            info!(
                "Analysis time budget exceeded after {} of {} iterations",
                self.analysis.iteration_count(),
                self.analysis.target_iterations()
            );
        } else {
            info!(
                "Analysis stopped after {} of {} iterations",
                self.analysis.iteration_count(),
                self.analysis.target_iterations()
            );
        }
        self.remaining_iterations = 0;
        self.analysis.mark_finished_early();
    }

    fn finalize(&mut self) {
        let elapsed = self
            .started_at
            .take()
            .map(|started| started.elapsed())
            .unwrap_or_default();
        self.analysis.analyze(elapsed);

        if self.config.clear_dungeon_on_completion
            && let Some(driver) = self.driver.as_mut()
        {
            driver.clear();
        }

        let results = std::mem::take(&mut self.analysis);
        info!(
            "Generation analysis finished: {} of {} iterations succeeded ({:.0}%) in {:.2}s",
            results.success_count(),
            results.target_iterations(),
            results.success_percentage(),
            results.analysis_time().as_secs_f64()
        );
        for callback in &mut self.on_complete {
            callback(&results);
        }

        self.results = Some(results);
        self.in_flight = false;
        self.state = AnalyzerState::Idle;
    }
}
