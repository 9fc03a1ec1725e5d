//! # Classify the current week
//! sector-structure classify --ratios out/ratios_wide.csv --week 2026-W14
//!
//! # Shape-check a ratios file without classifying
//! sector-structure validate --ratios out/ratios_wide.csv
//!
//! # Recompute the change count between two stored weeks
//! sector-structure diff --current 2026-W14 --previous 2026-W13

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use sector_structure::config::Settings;
use sector_structure::data::RatioCsvLoader;
use sector_structure::engine::ClassificationEngine;
use sector_structure::snapshot::{count_changes, SnapshotStore};

#[derive(Parser)]
#[command(name = "sector-structure")]
#[command(about = "Weekly relative-strength structure classification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Optional TOML settings file (window, epsilon, universe)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one week from a wide ratios CSV
    Classify {
        /// Path to the provider's wide ratios CSV
        #[arg(long)]
        ratios: PathBuf,

        /// Week identifier, e.g. 2026-W14
        #[arg(long)]
        week: String,

        /// Snapshot directory for week-over-week history
        #[arg(long, default_value = "snapshots")]
        snapshots: PathBuf,

        /// Classify and print without writing the snapshot
        #[arg(long)]
        dry_run: bool,
    },

    /// Shape-check a ratios CSV against the universe and window
    Validate {
        /// Path to the provider's wide ratios CSV
        #[arg(long)]
        ratios: PathBuf,
    },

    /// Recompute the change count between two stored weeks
    Diff {
        /// Later week identifier
        #[arg(long)]
        current: String,

        /// Earlier week identifier
        #[arg(long)]
        previous: String,

        /// Snapshot directory
        #[arg(long, default_value = "snapshots")]
        snapshots: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sector_structure=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Classify {
            ratios,
            week,
            snapshots,
            dry_run,
        } => cmd_classify(settings, &ratios, &week, &snapshots, dry_run),
        Commands::Validate { ratios } => cmd_validate(settings, &ratios),
        Commands::Diff {
            current,
            previous,
            snapshots,
        } => cmd_diff(&current, &previous, &snapshots),
    }
}

fn cmd_classify(
    settings: Settings,
    ratios: &PathBuf,
    week: &str,
    snapshots: &PathBuf,
    dry_run: bool,
) -> Result<()> {
    let engine = ClassificationEngine::new(settings.engine, settings.universe)?;
    let loader = RatioCsvLoader::new(engine.config().window_size);
    let set = loader
        .load(ratios, engine.universe())
        .with_context(|| format!("loading ratios from {}", ratios.display()))?;

    let store = SnapshotStore::new(snapshots);
    let prior = store.latest_before(week)?;
    match &prior {
        Some(p) => info!(week = %p.week, "found prior snapshot"),
        None => info!("no prior snapshot, change count will be n/a"),
    }

    let result = engine.classify(week, &set, prior.as_ref())?;

    println!("Week: {}", result.summary.week);
    println!("Sessions used: {}", result.summary.sessions);
    println!();
    println!("{}", result.summary.table());
    println!();
    println!("{}", result.aggregate.summary());

    if dry_run {
        info!("dry run, snapshot not written");
    } else {
        let path = store.save(&result.summary)?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}

fn cmd_validate(settings: Settings, ratios: &PathBuf) -> Result<()> {
    settings.engine.validate()?;
    settings.universe.validate()?;

    let window = settings.engine.window_size;
    let loader = RatioCsvLoader::new(window);
    let set = loader
        .load(ratios, &settings.universe)
        .with_context(|| format!("loading ratios from {}", ratios.display()))?;

    let mut problems = 0;
    for ticker in &settings.universe.tickers {
        match set.get(ticker) {
            None => {
                problems += 1;
                println!("{ticker:<6} missing");
            }
            Some(series) => match series.validate(window) {
                Ok(()) => println!("{ticker:<6} ok ({} sessions)", series.len()),
                Err(e) => {
                    problems += 1;
                    println!("{ticker:<6} {e}");
                }
            },
        }
    }

    if problems > 0 {
        bail!("{problems} of {} tickers failed validation", settings.universe.len());
    }
    println!("\nAll {} tickers valid for a {window}-session window.", settings.universe.len());
    Ok(())
}

fn cmd_diff(current: &str, previous: &str, snapshots: &PathBuf) -> Result<()> {
    let store = SnapshotStore::new(snapshots);

    let current_summary = store
        .load(current)?
        .with_context(|| format!("no snapshot stored for week {current}"))?;
    let previous_summary = store
        .load(previous)?
        .with_context(|| format!("no snapshot stored for week {previous}"))?;

    let changed = count_changes(&current_summary, &previous_summary)?;
    println!("{changed} of {} instruments changed classification between {previous} and {current}",
        current_summary.rows.len());
    Ok(())
}
