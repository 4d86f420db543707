use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ghostrun_core::cli::{render_training_report, replay_race};
use ghostrun_core::storage::{load_ghost, load_route};
use ghostrun_core::{load_config, RaceEvent, TrainingAnalyzer};

#[derive(Parser)]
#[command(name = "ghostrun", about = "Training statistics and ghost races from recorded GPS routes")]
struct Cli {
    /// Tracker config (JSON). Defaults are used when the file is missing.
    #[arg(long, global = true, default_value = "ghostrun.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Statistics and kilometre splits of a route
    Stats {
        route: PathBuf,
        /// User weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Kilometre splits only
    Splits { route: PathBuf },
    /// Replay a route against a ghost
    Race { route: PathBuf, ghost: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("reading config {}", cli.config.display()))?;

    match cli.command {
        Command::Stats { route, weight, json } => {
            let fixes = load_route(&route).with_context(|| format!("reading route {}", route.display()))?;
            let analyzer = TrainingAnalyzer::new(config);
            let stats = analyzer.analyze(&fixes, weight);
            let splits = analyzer.splits(&fixes);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_training_report(&stats, &splits));
            }
        }
        Command::Splits { route } => {
            let fixes = load_route(&route).with_context(|| format!("reading route {}", route.display()))?;
            let splits = TrainingAnalyzer::new(config).splits(&fixes);
            if splits.is_empty() {
                println!("no full kilometre recorded");
            }
            for s in &splits {
                println!("km {:>3}: {}", s.counter, s.time);
            }
        }
        Command::Race { route, ghost } => {
            let fixes = load_route(&route).with_context(|| format!("reading route {}", route.display()))?;
            let ghost = load_ghost(&ghost).with_context(|| format!("reading ghost {}", ghost.display()))?;
            let summary = replay_race(&fixes, ghost, &config);
            for (at, event) in &summary.events {
                match event {
                    RaceEvent::Announcement(a) => println!("[{at:>6.0}s] {a}"),
                    RaceEvent::Finished(reason) => println!("[{at:>6.0}s] finished ({reason:?})"),
                }
            }
            println!(
                "live {:.0}m, ghost {:.0}m after {:.0}s",
                summary.state.live_distance_m, summary.state.ghost_distance_m, summary.state.elapsed_secs
            );
            match summary.outcome {
                Some(o) if o.beat_ghost => println!("You beat the ghost ({:.0}s < {:.0}s)", o.elapsed_secs, o.ghost_duration_secs),
                Some(o) => println!("The ghost wins ({:.0}s >= {:.0}s)", o.elapsed_secs, o.ghost_duration_secs),
                None => println!("No valid ghost to race against"),
            }
        }
    }
    Ok(())
}
