use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use rusted_platformer::game::characters::RenderSnapshot;
use rusted_platformer::game::LevelConfig;

/// Log a progress line every this many ticks
const REPORT_INTERVAL: u64 = 60;

/// Headless platformer runner
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Level file (TOML); the default arena is used when omitted
    level: Option<PathBuf>,

    /// Number of ticks to simulate, overriding the level's own count
    #[clap(long)]
    ticks: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    info!("Starting Rusted Platformer...");

    let level = match &args.level {
        Some(path) => LevelConfig::load(path)
            .with_context(|| format!("Failed to load level {}", path.display()))?,
        None => {
            info!("No level given, using the default arena");
            LevelConfig::default()
        }
    };
    let ticks = args.ticks.unwrap_or(level.world.ticks);

    let mut session = level.build().context("Failed to build level")?;

    let colliders = session.colliders();
    let static_count = colliders.iter().filter(|c| c.is_static()).count();
    info!(
        "Simulating {} ticks with {} static and {} dynamic colliders",
        ticks,
        static_count,
        colliders.len() - static_count
    );

    while session.current_tick() < ticks {
        session.tick();

        if session.current_tick() % REPORT_INTERVAL == 0 {
            report(session.current_tick(), &session.snapshots());
        }
    }

    info!("Finished after {} ticks", session.current_tick());
    report(session.current_tick(), &session.snapshots());

    Ok(())
}

fn report(tick: u64, snapshots: &[RenderSnapshot]) {
    for snapshot in snapshots {
        info!(
            "[tick {:>5}] #{} at ({:.1}, {:.1}) {} facing {:?}",
            tick,
            snapshot.id,
            snapshot.position.x,
            snapshot.position.y,
            snapshot.animation_name(),
            snapshot.facing
        );
    }
}
