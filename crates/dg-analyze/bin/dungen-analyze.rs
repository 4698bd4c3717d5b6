//! DunGen generation analysis
//!
//! Runs the reference layout generator many times and prints timing and
//! room count statistics.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use dg_analyze::{Overrides, load_settings};
use dg_core::{LayoutGenerator, RuntimeAnalyzer, SeedGenerationMode};

/// Measure how the DunGen layout generator behaves over many seeds
#[derive(Parser, Debug)]
#[command(name = "dungen-analyze")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with [analysis] and [flow] tables
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of generation attempts
    #[arg(short = 'n', long = "iterations")]
    iterations: Option<u32>,

    /// Main path restarts allowed per attempt
    #[arg(long = "max-failed-attempts")]
    max_failed_attempts: Option<u32>,

    /// Stop after this many seconds
    #[arg(long = "max-time")]
    max_time: Option<f64>,

    /// Starting seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// How iteration seeds are chosen (random, incremental, fixed)
    #[arg(long = "seed-mode")]
    seed_mode: Option<SeedGenerationMode>,

    /// Reuse tile instances between attempts
    #[arg(long = "pooling", overrides_with = "no_pooling")]
    pooling: bool,

    /// Build fresh tile instances for every attempt
    #[arg(long = "no-pooling", overrides_with = "pooling")]
    no_pooling: bool,

    /// Keep the last layout instead of clearing it at the end
    #[arg(long = "keep-dungeon", overrides_with = "clear_dungeon")]
    keep_dungeon: bool,

    /// Clear the last layout at the end
    #[arg(long = "clear-dungeon", overrides_with = "keep_dungeon")]
    clear_dungeon: bool,

    /// Print the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            iterations: self.iterations,
            max_failed_attempts: self.max_failed_attempts,
            max_analysis_time: self.max_time,
            seed: self.seed,
            seed_mode: self.seed_mode,
            pooling: flag_pair(self.pooling, self.no_pooling),
            clear_dungeon: flag_pair(self.clear_dungeon, self.keep_dungeon),
        }
    }
}

/// `Some(true)` for the positive flag, `Some(false)` for its negation,
/// `None` when neither was given
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> Result<bool> {
    let settings = load_settings(args.config.as_deref(), &args.overrides())?;
    let generator = LayoutGenerator::new(settings.flow)?;

    let mut analyzer = RuntimeAnalyzer::new(settings.analysis).with_driver(generator);
    if !analyzer.run_analysis() {
        return Ok(false);
    }

    let Some(results) = analyzer.run_to_completion() else {
        return Ok(false);
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print!("{}", results);
    }
    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            info!("Analysis did not run");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
