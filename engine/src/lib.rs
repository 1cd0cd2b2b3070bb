#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestrator for Nova Defence.
//!
//! [`Simulation`] owns the [`World`] and one instance of every system. Player
//! intent goes through [`Simulation::submit`]; time advances through
//! [`Simulation::tick`], which runs the systems in a fixed order and then
//! checks for victory:
//!
//! 1. wave director
//! 2. enemy movement
//! 3. enemy health
//! 4. tower targeting
//! 5. tower combat
//! 6. projectiles
//! 7. hero movement
//! 8. hero abilities
//! 9. hero combat
//! 10. win check
//!
//! Damage dealt during a tick is resolved into kills by the health pass of
//! the following tick.

use log::{info, warn};
use nova_defence_core::{Command, ConfigError, Event, GameConfig, GamePhase};
use nova_defence_system_enemy_health::EnemyHealth;
use nova_defence_system_hero_abilities::HeroAbilities;
use nova_defence_system_hero_combat::HeroCombat;
use nova_defence_system_hero_movement::HeroMovement;
use nova_defence_system_movement::EnemyMovement;
use nova_defence_system_projectiles::Projectiles;
use nova_defence_system_spawning::WaveDirector;
use nova_defence_system_tower_combat::TowerCombat;
use nova_defence_system_tower_targeting::TowerTargeting;
use nova_defence_world::{apply, CommandError, World};
use thiserror::Error;

/// Match configuration embedded in the engine.
pub const DEFAULT_CONFIG: &str = include_str!("../assets/default.toml");

/// Failures raised while building a simulation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration document is not valid TOML for a match.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration tables are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Parses a match configuration from TOML.
pub fn parse_config(source: &str) -> Result<GameConfig, EngineError> {
    let config: GameConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
}

/// The built-in match configuration.
pub fn default_config() -> Result<GameConfig, EngineError> {
    parse_config(DEFAULT_CONFIG)
}

#[derive(Debug, Default)]
struct Systems {
    waves: WaveDirector,
    movement: EnemyMovement,
    health: EnemyHealth,
    targeting: TowerTargeting,
    tower_combat: TowerCombat,
    projectiles: Projectiles,
    hero_movement: HeroMovement,
    abilities: HeroAbilities,
    hero_combat: HeroCombat,
}

impl Systems {
    fn armed(world: &mut World) -> Self {
        let mut systems = Self::default();
        systems.waves.initialize(world);
        systems
    }
}

/// Deterministic headless simulation of a single match.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    systems: Systems,
    queued: Vec<Command>,
    pending_events: Vec<Event>,
    events: Vec<Event>,
}

impl Simulation {
    /// Builds a simulation waiting in the menu.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        let mut world = World::new(config)?;
        let systems = Systems::armed(&mut world);
        Ok(Self {
            world,
            systems,
            queued: Vec::new(),
            pending_events: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Builds a simulation from a TOML configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        Self::new(parse_config(source)?)
    }

    /// Builds a simulation from the built-in configuration.
    pub fn with_default_config() -> Result<Self, EngineError> {
        Self::new(default_config()?)
    }

    /// Read-only view of the match state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Wave director driving the schedule.
    #[must_use]
    pub fn wave_director(&self) -> &WaveDirector {
        &self.systems.waves
    }

    /// Applies a player command.
    ///
    /// Commands that change the world do so immediately. Ability activations
    /// and manual wave starts are validated now and acted on by the next
    /// tick. Events produced here are reported by the next [`Simulation::tick`].
    pub fn submit(&mut self, command: Command) -> Result<(), CommandError> {
        if let Err(error) = apply(&mut self.world, command.clone(), &mut self.pending_events) {
            warn!("command {command:?} rejected: {error}");
            return Err(error);
        }

        match command {
            Command::ActivateAbility { .. } | Command::StartNextWave => self.queued.push(command),
            Command::ResetGame => {
                self.systems = Systems::armed(&mut self.world);
                self.queued.clear();
            }
            _ => {}
        }
        Ok(())
    }

    /// Advances the match by `dt` seconds, clamped to the configured maximum.
    ///
    /// Returns every event emitted since the previous tick. Nothing advances
    /// unless the match is being played.
    pub fn tick(&mut self, dt: f32) -> &[Event] {
        self.events.clear();
        self.events.append(&mut self.pending_events);

        if self.world.phase() != GamePhase::Playing {
            return &self.events;
        }

        let dt = dt.clamp(0.0, self.world.config().max_tick_delta);
        self.world.advance_clock(dt);

        let commands = std::mem::take(&mut self.queued);
        let world = &mut self.world;
        let events = &mut self.events;
        let systems = &mut self.systems;

        systems.waves.handle(&commands, world, dt, events);
        systems.movement.handle(world, dt, events);
        systems.health.handle(world, events);
        systems.targeting.handle(world);
        systems.tower_combat.handle(world, events);
        systems.projectiles.handle(world, dt, events);
        systems.hero_movement.handle(world, dt);
        systems.abilities.handle(&commands, world, dt, events);
        systems.hero_combat.handle(world, events);
        check_victory(world, events);

        &self.events
    }
}

fn check_victory(world: &mut World, out_events: &mut Vec<Event>) {
    if world.phase() != GamePhase::Playing {
        return;
    }
    let status = world.wave_status();
    let cleared = status.current_wave >= status.total_waves
        && !status.wave_in_progress
        && world.enemy_count() == 0
        && status.enemies_remaining == 0;
    if cleared {
        info!("all {} waves cleared", status.total_waves);
        world.set_phase(GamePhase::Won, out_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_configuration_is_complete() {
        let config = default_config().expect("default configuration parses");
        assert_eq!(config.waves.len(), 5);
        assert_eq!(config.heroes.len(), 5);
        assert_eq!(config.map.tower_spots.len(), 6);
        assert!(config.wave_schedule.auto_advance);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            Simulation::from_toml_str("starting_hero = 3"),
            Err(EngineError::Parse(_))
        ));
    }

    #[test]
    fn inconsistent_tables_are_rejected() {
        let trimmed = DEFAULT_CONFIG.replace("kind = \"diggory\"", "kind = \"zipzap\"");
        assert!(matches!(
            Simulation::from_toml_str(&trimmed),
            Err(EngineError::Config(ConfigError::DuplicateEntry { .. }))
        ));
    }
}
