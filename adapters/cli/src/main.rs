#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane Defence session.

mod run_config;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{CellCoord, Event, LevelGrid, TileGrid, Vec2};
use lane_defence_session::{self as session, GameSession};
use lane_defence_system_safehouse as safehouse;
use lane_defence_world::{self as world, query};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::run_config::RunConfig;

/// Runs a Lane Defence level without a window and reports the outcome as JSON.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", version)]
struct Args {
    /// Text level to load.
    #[arg(long)]
    level: PathBuf,
    /// TOML run configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long)]
    frames: Option<u64>,
    /// Seconds of simulated time per frame.
    #[arg(long = "dt")]
    dt_seconds: Option<f32>,
    /// Seed for the wave director's generator.
    #[arg(long)]
    seed: Option<u32>,
    /// Edge length of a level tile in world units.
    #[arg(long)]
    tile_length: Option<f32>,
    /// Extra turret tile as `column,row`; may be repeated.
    #[arg(long = "turret", value_parser = parse_cell)]
    turrets: Vec<CellCoord>,
    /// Leaves waves waiting instead of starting them automatically.
    #[arg(long)]
    manual_waves: bool,
}

/// Outcome of a headless run.
#[derive(Debug, Serialize)]
struct RunSummary {
    frames_simulated: u64,
    level: u32,
    wave: u32,
    waves_per_level: u32,
    all_waves_complete: bool,
    waves_cleared: u32,
    turrets_placed: u32,
    enemies_killed: u32,
    enemies_escaped: u32,
    enemies_on_lane: usize,
    invaders_in_safehouse: usize,
    invaders_defeated: u32,
    safehouse_health: u32,
    game_over: bool,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let summary = run(&args, &config)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode run summary")?
    );
    Ok(())
}

fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(dt_seconds) = args.dt_seconds {
        config.dt_seconds = dt_seconds;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(tile_length) = args.tile_length {
        config.tile_length = tile_length;
    }
    if args.manual_waves {
        config.auto_start_waves = false;
    }
    config.turrets.extend(
        args.turrets
            .iter()
            .map(|cell| [cell.column(), cell.row()]),
    );

    config.validate().context("invalid run settings")?;
    Ok(config)
}

fn run(args: &Args, config: &RunConfig) -> Result<RunSummary> {
    let text = fs::read_to_string(&args.level)
        .with_context(|| format!("failed to read level at {}", args.level.display()))?;
    let grid = LevelGrid::parse(&text, config.tile_length)
        .with_context(|| format!("failed to parse level at {}", args.level.display()))?;
    let player_start = match grid.start_position() {
        Some(corner) => corner + Vec2::splat(config.tile_length * 0.5),
        None => grid.world_center_of(CellCoord::new(0, 0)),
    };
    tracing::info!(
        columns = grid.columns(),
        rows = grid.rows(),
        seed = config.seed,
        "level loaded"
    );

    let mut game = GameSession::new(
        grid,
        player_start,
        session::Config::new(
            world::Config::new(config.seed),
            safehouse::Config::default(),
        ),
    );
    for cell in config.turret_cells() {
        let _ = game.place_turret(cell);
    }
    log_events(game.drain_events());

    let dt = Duration::from_secs_f32(config.dt_seconds);
    for _ in 0..config.frames {
        if config.auto_start_waves && game.combat().is_awaiting_player_start() {
            let _ = game.start_next_wave();
        }
        game.frame(dt);
        log_events(game.drain_events());
        if game.is_game_over() {
            break;
        }
    }

    let stats = game.stats();
    let combat = game.combat();
    Ok(RunSummary {
        frames_simulated: stats.frames,
        level: combat.current_level(),
        wave: combat.current_wave(),
        waves_per_level: combat.waves_per_level(),
        all_waves_complete: combat.is_all_complete(),
        waves_cleared: stats.waves_cleared,
        turrets_placed: stats.turrets_placed,
        enemies_killed: stats.enemies_killed,
        enemies_escaped: stats.enemies_escaped,
        enemies_on_lane: query::live_enemy_count(combat),
        invaders_in_safehouse: game.safehouse().invaders().len(),
        invaders_defeated: game.safehouse().invaders_defeated(),
        safehouse_health: game.safehouse().player().health(),
        game_over: game.is_game_over(),
    })
}

fn log_events(events: Vec<Event>) {
    for event in events {
        match event {
            Event::WaveStarted { level, wave } => tracing::info!(level, wave, "wave started"),
            Event::WaveCleared { level, wave } => tracing::info!(level, wave, "wave cleared"),
            Event::AllWavesComplete => tracing::info!("all waves complete"),
            Event::TurretPlaced { turret, cell } => tracing::info!(
                turret = turret.get(),
                column = cell.column(),
                row = cell.row(),
                "turret placed"
            ),
            Event::TurretPlacementRejected { cell, reason } => tracing::warn!(
                column = cell.column(),
                row = cell.row(),
                ?reason,
                "turret placement rejected"
            ),
            other => tracing::trace!(event = ?other, "combat event"),
        }
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{value}`"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(CellCoord::new(column, row))
}
