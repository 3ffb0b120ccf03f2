//! Headless battle runner.
//!
//! Loads content, seeds the roll source and lets the turn orchestrator play
//! every side until a faction wins or the turn limit is hit.
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tactics_content::{ConfigLoader, ContentFactory};
use tactics_core::{CombatEvent, Faction, SeededRolls, WorldQuery};
use tactics_runtime::{PlayerAction, SessionAdapters, Side, TurnOrchestrator};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::CliConfig;

/// Simulation ticks per second.
const TICK_RATE: u32 = 30;

/// No pointer in a headless run.
struct NoPointer;

impl WorldQuery for NoPointer {
    fn raycast_to_tile(&self, _point: tactics_core::ScreenPoint) -> Option<tactics_core::TileId> {
        None
    }
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(&config.session_id)?;

    run(&config)
}

fn run(config: &CliConfig) -> Result<()> {
    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir.clone()),
        None => ContentFactory::bundled(),
    };
    let combat = match &config.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => factory.load_config()?,
    };
    let battle = factory
        .load_battle(&config.scenario, combat, Box::new(SeededRolls::new(config.seed)))
        .with_context(|| format!("failed to set up scenario '{}'", config.scenario))?;

    let session = PlayerAction::new(
        battle,
        Faction::Allied,
        SessionAdapters::headless(Box::new(NoPointer)),
    );
    let mut orchestrator = TurnOrchestrator::new(
        session,
        vec![Side::player(Faction::Allied), Side::computer(Faction::Hostile)],
    )?
    .with_autoplay(true);
    orchestrator.start()?;

    let frame = Duration::from_secs(1) / TICK_RATE;
    let mut shots = 0usize;
    let mut deaths = 0usize;
    while orchestrator.outcome().is_none() && orchestrator.round() <= config.max_turns {
        orchestrator.tick(frame)?;
        for event in orchestrator.drain_log() {
            match event {
                CombatEvent::ShotResolved { .. } => shots += 1,
                CombatEvent::UnitDied { unit } => {
                    deaths += 1;
                    tracing::info!("{} died", unit);
                }
                _ => {}
            }
        }
    }

    let battle = orchestrator.session().battle();
    match orchestrator.outcome() {
        Some(outcome) => tracing::info!(
            "{:?} after {} rounds ({} shots, {} deaths, {:.1}s simulated)",
            outcome,
            orchestrator.round(),
            shots,
            deaths,
            battle.clock().now().as_secs_f32()
        ),
        None => tracing::warn!(
            "no outcome after {} rounds ({} shots, {} deaths)",
            config.max_turns,
            shots,
            deaths
        ),
    }
    for unit in battle.units() {
        tracing::info!(
            "{} [{}] hp {}/{}{}",
            unit.name(),
            unit.faction(),
            unit.stats.health.current,
            unit.stats.health.maximum,
            if unit.is_dead() { " (dead)" } else { "" }
        );
    }
    Ok(())
}

/// Setup logging to both stderr and a session log file.
fn setup_logging(
    session_id: &Option<String>,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let session_id = match session_id {
        Some(id) => id.clone(),
        None => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("system clock is before the epoch")?
                .as_secs();
            format!("session_{}", timestamp)
        }
    };

    let session_log_dir = log_directory().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("failed to create {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "battle.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/battle.log", session_log_dir.display());

    Ok(guard)
}

/// Platform cache directory for logs, `/tmp` when none is known.
fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "tactics")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/tactics"))
        .join("logs")
}
