//! warden-sim - run guard levels headlessly.
//!
//! - `warden-sim run --level <path>` - play a level until the target is caught or escapes
//! - `warden-sim validate --level <path>` - check a level file without running it

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use warden_sim::{LevelConfig, Outcome, SimOptions, Simulation};

#[derive(Parser)]
#[command(name = "warden-sim")]
#[command(about = "Headless guard AI simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a level
    Run {
        /// Level file (YAML)
        #[arg(long)]
        level: PathBuf,

        /// Maximum number of ticks to run
        #[arg(long, default_value_t = 3000)]
        ticks: u64,

        /// Seconds per tick
        #[arg(long, default_value_t = 0.02)]
        dt: f32,

        /// Seed for every guard's random stream
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Pause the game at this tick
        #[arg(long)]
        pause_at: Option<u64>,

        /// Resume the game at this tick
        #[arg(long, requires = "pause_at")]
        resume_at: Option<u64>,

        /// Print every trace event after the run
        #[arg(long)]
        trace: bool,
    },

    /// Validate a level file
    Validate {
        #[arg(long)]
        level: PathBuf,
    },
}

struct RunArgs {
    ticks: u64,
    pause_at: Option<u64>,
    resume_at: Option<u64>,
    trace: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run {
            level,
            ticks,
            dt,
            seed,
            pause_at,
            resume_at,
            trace,
        } => {
            let options = SimOptions {
                dt_seconds: dt,
                seed,
                trace,
            };
            let args = RunArgs {
                ticks,
                pause_at,
                resume_at,
                trace,
            };
            run_level(&level, &options, &args)
        }
        Commands::Validate { level } => validate_level(&level),
    }
}

fn run_level(path: &Path, options: &SimOptions, args: &RunArgs) -> Result<()> {
    let level = LevelConfig::load(path)?;
    tracing::info!(level = level.display_name(), guards = level.guards.len(), "Starting level");

    let mut sim = Simulation::from_level(&level, options)?;
    sim.pause_signal_mut()
        .subscribe(|edge| tracing::info!(?edge, "Pause state changed"));
    sim.world_mut()
        .quarry
        .on_caught(|caught| tracing::info!(quarry = caught.target, "Level lost"));

    for _ in 0..args.ticks {
        let tick = sim.tick();
        if args.pause_at == Some(tick) {
            sim.set_paused(true);
        }
        if args.resume_at == Some(tick) {
            sim.set_paused(false);
        }
        if sim.step().is_finished() {
            break;
        }
    }

    println!("Level: {}", level.display_name());
    match sim.outcome() {
        Outcome::Running => println!("Outcome: still running after {} ticks", sim.tick()),
        Outcome::Caught { tick } => println!("Outcome: target caught at tick {tick}"),
        Outcome::Escaped { tick } => println!("Outcome: target escaped at tick {tick}"),
    }
    println!("Level time: {:.2}s", sim.level_time());
    println!();
    println!("Guards:");
    for (name, state) in sim.guard_states() {
        println!("  - {name}: {state}");
    }

    if args.trace {
        println!();
        println!("Trace:");
        for event in sim.trace_events() {
            println!(
                "  [{:>6}] agent={} {} a={} b={}",
                event.tick, event.agent, event.tag, event.a, event.b
            );
        }
    }

    Ok(())
}

fn validate_level(path: &Path) -> Result<()> {
    let level = LevelConfig::load(path)?;
    Simulation::from_level(&level, &SimOptions::default())?;
    println!(
        "{}: ok ({} guards, {} patrol points)",
        level.display_name(),
        level.guards.len(),
        level.patrol_points.len()
    );
    Ok(())
}
