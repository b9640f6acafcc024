//! Polyterative main entry point.
//!
//! Runs the generator simulation headless: every tick composes a frame into
//! a recording [`FrameBuffer`](polyterative::resources::framebuffer::FrameBuffer)
//! that can be dumped as JSON for a rendering backend to replay.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (or the file given with `--config`), apply CLI overrides
//! 2. Build the [`Simulation`] and seed the permanent backdrop
//! 3. Tick at the configured frame rate, or as fast as possible with `--headless`
//! 4. Tear down, optionally writing the last frame to disk
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --ticks 600 --seed 7 --dump-frame frame.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{debug, error, info, warn};

use polyterative::error::SimError;
use polyterative::resources::clock::frame_interval;
use polyterative::resources::simconfig::SimConfig;
use polyterative::simulation::Simulation;

/// Polyterative generator simulation
#[derive(Parser)]
#[command(version, about = "Spawns, animates and retires short-lived generators on a grid.")]
struct Cli {
    /// INI configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the tick rate from the configuration.
    #[arg(long)]
    fps: Option<u32>,

    /// Stop after this many ticks. Runs until interrupted otherwise.
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for every random choice, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Do not wait for the frame timer between ticks.
    #[arg(long)]
    headless: bool,

    /// Write the last composed frame as JSON to this path.
    #[arg(long, value_name = "PATH")]
    dump_frame: Option<PathBuf>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

fn load_config(cli: &Cli) -> Result<SimConfig, SimError> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = SimConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => {
            let mut config = SimConfig::new();
            if let Err(e) = config.load_from_file() {
                warn!("{}; using defaults", e);
            }
            config
        }
    };
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), SimError> {
    let config = load_config(&cli)?;

    if cli.write_config {
        return config.save_to_file();
    }

    let interval = frame_interval(config.fps)?;
    let mut sim = Simulation::new(config, cli.seed)?;

    let mut next_frame = Instant::now();
    let mut stats_since = Instant::now();
    let mut ticks_since = 0u64;
    let mut primitives_since = 0usize;

    while cli.ticks.is_none_or(|limit| sim.now() < limit) {
        let Some(report) = sim.tick() else { break };
        ticks_since += 1;
        primitives_since += report.primitives;

        if stats_since.elapsed() >= Duration::from_secs(1) {
            debug!(
                "tick={} live={} ticks/s={} primitives/tick={}",
                report.tick,
                report.live,
                ticks_since,
                primitives_since / ticks_since.max(1) as usize
            );
            stats_since = Instant::now();
            ticks_since = 0;
            primitives_since = 0;
        }

        if !cli.headless {
            next_frame += interval;
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            } else {
                next_frame = now;
            }
        }
    }

    if let Some(path) = &cli.dump_frame {
        let json = sim.frame().to_json().map_err(|e| SimError::FrameDump {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| SimError::FrameDump {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        info!("Frame {} written to {}", sim.frame().tick, path.display());
    }

    sim.teardown();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
