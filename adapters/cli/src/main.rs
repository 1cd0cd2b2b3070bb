#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Nova Defence match.

mod autopilot;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};
use nova_defence_core::{Event, GameConfig, HeroKind};
use nova_defence_engine::{default_config, parse_config, Simulation};
use nova_defence_world::query;

use crate::autopilot::Autopilot;

/// Runs a scripted Nova Defence match without a renderer.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML match configuration; the built-in match is used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 6000)]
    ticks: u32,
    /// Seconds advanced per tick.
    #[arg(long, default_value_t = 0.1)]
    dt: f32,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the starting hero.
    #[arg(long, value_enum)]
    hero: Option<HeroArg>,
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeroArg {
    Fighter,
    Mage,
    Tank,
    Assassin,
    Healer,
}

impl From<HeroArg> for HeroKind {
    fn from(value: HeroArg) -> Self {
        match value {
            HeroArg::Fighter => HeroKind::Fighter,
            HeroArg::Mage => HeroKind::Mage,
            HeroArg::Tank => HeroKind::Tank,
            HeroArg::Assassin => HeroKind::Assassin,
            HeroArg::Healer => HeroKind::Healer,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    kills: u32,
    escapes: u32,
    casts: u32,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemyDied { .. } => self.kills += 1,
            Event::EnemyReachedEnd { .. } => self.escapes += 1,
            Event::AbilityCast { .. } => self.casts += 1,
            Event::WaveStarted { wave, enemies } => {
                info!("wave {wave} started with {enemies} enemies");
            }
            Event::PhaseChanged { from, to } => info!("phase {from:?} -> {to:?}"),
            _ => {}
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_config(&source).with_context(|| format!("invalid match in {}", path.display()))?
        }
        None => default_config().context("built-in match is invalid")?,
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(hero) = args.hero {
        config.starting_hero = hero.into();
    }
    Ok(config)
}

/// Entry point for the Nova Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let mut simulation = Simulation::new(config).context("failed to build the match")?;
    let mut autopilot = Autopilot::default();
    let mut tally = Tally::default();

    for _ in 0..args.ticks {
        for command in autopilot.orders(simulation.world()) {
            if let Err(error) = simulation.submit(command) {
                debug!("autopilot order refused: {error}");
            }
        }
        for event in simulation.tick(args.dt) {
            tally.record(event);
        }
        if simulation.world().phase().is_over() {
            break;
        }
    }

    let hud = query::hud(simulation.world());
    println!(
        "{:?} after {:.1}s: wave {}/{}, lives {}/{}, currency {}, score {}",
        hud.phase,
        simulation.world().clock(),
        hud.wave,
        hud.total_waves,
        hud.lives,
        hud.max_lives,
        hud.currency,
        hud.score,
    );
    println!(
        "{} kills, {} escapes, {} abilities cast, {} towers standing",
        tally.kills,
        tally.escapes,
        tally.casts,
        simulation.world().tower_ids().len(),
    );
    Ok(())
}
