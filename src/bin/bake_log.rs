//! Headless Replay Baker
//!
//! Loads a newline-delimited JSON replay log, runs the reconstruction worker
//! to completion, and prints a per-run bake summary. Useful for smoke-testing
//! logs before handing them to an interactive viewer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rescue_replay::core::config::ReplaySettings;
use rescue_replay::replay::worker::{IconAtlas, LoadRequest, ReplayWorker, WorkerEvent};

/// Headless Replay Baker - bake a replay log into per-cycle historians
#[derive(Parser, Debug)]
#[command(name = "bake_log")]
#[command(about = "Reconstruct a replay log and report baked geometry per cycle")]
struct Args {
    /// Path to the .jlog replay file
    log: PathBuf,

    /// Half-extent of icon and human quads in simulation units
    #[arg(long)]
    icon_radius: Option<f32>,

    /// Skip border outlines around roads and buildings
    #[arg(long)]
    no_border_lines: bool,

    /// Print every submission count instead of the final summary only
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut settings = ReplaySettings::default();
    if let Some(radius) = args.icon_radius {
        settings.icon_radius = radius;
    }
    settings.draw_border_lines = !args.no_border_lines;
    if let Err(problem) = settings.validate() {
        eprintln!("Invalid settings: {problem}");
        return ExitCode::FAILURE;
    }

    let log = match std::fs::read_to_string(&args.log) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("Cannot read {}: {error}", args.log.display());
            return ExitCode::FAILURE;
        }
    };

    let worker = ReplayWorker::spawn(
        LoadRequest {
            log,
            atlas: IconAtlas::sequential(),
        },
        settings,
    );

    let mut cycles = 0usize;
    let mut submissions = 0usize;
    let mut failed = false;
    for event in worker.events().iter() {
        match event {
            WorkerEvent::Info(info) => {
                tracing::info!(
                    team = info.team_name.as_deref().unwrap_or("?"),
                    map = info.map_name.as_deref().unwrap_or("?"),
                    last_cycle = info.last_cycle.unwrap_or(0),
                    "replay metadata"
                );
            }
            WorkerEvent::Progress { text, percent } => match percent {
                Some(percent) => tracing::info!("{text} ({percent:.0}%)"),
                None => tracing::info!("{text}"),
            },
            WorkerEvent::MapBounds(bounds) => {
                tracing::info!(
                    min_x = bounds.min_x,
                    min_y = bounds.min_y,
                    max_x = bounds.max_x,
                    max_y = bounds.max_y,
                    "map bounds"
                );
            }
            WorkerEvent::CycleData { cycle, historian } => {
                cycles += 1;
                submissions += historian.len();
                if args.verbose {
                    println!("cycle {cycle}: {} submissions", historian.len());
                }
            }
            WorkerEvent::Failed { message } => {
                eprintln!("Replay failed: {message}");
                failed = true;
            }
        }
    }
    worker.join();

    if failed {
        return ExitCode::FAILURE;
    }
    println!("Baked {cycles} cycles, {submissions} total submissions.");
    ExitCode::SUCCESS
}
