#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state store for Nova Defence.
//!
//! The [`World`] owns every entity collection, the economy, the wave
//! counters and the UI selection. Systems receive it by mutable reference
//! once per tick and mutate it in a fixed order; collaborators read it
//! through the accessors and the [`query`] helpers. Player intent enters
//! through [`apply`].

pub mod factories;
pub mod path;
#[cfg(any(test, feature = "test_support"))]
pub mod testing;
pub mod towers;

pub use path::{PathAdvance, PathModel};

use std::collections::BTreeMap;

use log::{debug, info, warn};
use nova_defence_core::{
    Command, ConfigError, Enemy, EnemyId, EnemyKind, Event, GameConfig, GamePhase, Hero, HeroId,
    HeroKind, PlacementError, Projectile, ProjectileId, SaleError, SplitBehavior, SpotId, Tower,
    TowerId, TowerKind, TowerSpot, TowerTier, UpgradeError, Vec3,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

const RNG_STREAM_SIMULATION: &str = "simulation";

/// Reasons an inbound command is refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    /// The tower could not be placed.
    #[error("tower placement rejected: {0}")]
    Placement(#[from] PlacementError),
    /// The tower could not be upgraded.
    #[error("tower upgrade rejected: {0}")]
    Upgrade(#[from] UpgradeError),
    /// The tower could not be sold.
    #[error("tower sale rejected: {0}")]
    Sale(#[from] SaleError),
    /// The command is not valid in the current phase.
    #[error("command not allowed while the game is {0:?}")]
    InvalidPhase(GamePhase),
    /// The hero cannot move while its fortress stance is active.
    #[error("hero is rooted in place")]
    HeroRooted,
    /// The configuration lacks an entry the command needs.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Player resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    /// Spendable currency.
    pub currency: u32,
    /// Remaining lives.
    pub lives: u32,
    /// Lives at match start.
    pub max_lives: u32,
    /// Accumulated score.
    pub score: u64,
}

/// Wave counters shared between the wave director and the win check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveStatus {
    /// Number of waves fully cleared.
    pub current_wave: u32,
    /// Number of configured waves.
    pub total_waves: u32,
    /// Whether a wave is spawning or waiting to be cleared.
    pub wave_in_progress: bool,
    /// Queue-derived countdown of enemies still to be removed this wave.
    pub enemies_remaining: u32,
}

/// Pure UI selection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Archetype chosen for placement.
    pub tower_kind: Option<TowerKind>,
    /// Tower under inspection.
    pub tower: Option<TowerId>,
    /// Spot under the cursor.
    pub hovered_spot: Option<SpotId>,
}

#[derive(Debug, Default)]
struct IdAllocator {
    next_enemy: u32,
    next_tower: u32,
    next_projectile: u32,
    next_hero: u32,
}

impl IdAllocator {
    fn enemy(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        id
    }

    fn tower(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        id
    }

    fn projectile(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile);
        self.next_projectile = self.next_projectile.wrapping_add(1);
        id
    }

    fn hero(&mut self) -> HeroId {
        let id = HeroId::new(self.next_hero);
        self.next_hero = self.next_hero.wrapping_add(1);
        id
    }
}

/// Represents the authoritative Nova Defence match state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    path: PathModel,
    phase: GamePhase,
    clock: f32,
    economy: Economy,
    waves: WaveStatus,
    enemies: BTreeMap<EnemyId, Enemy>,
    towers: BTreeMap<TowerId, Tower>,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    hero: Hero,
    spots: Vec<TowerSpot>,
    selection: Selection,
    ids: IdAllocator,
    rng: ChaCha8Rng,
}

impl World {
    /// Validates the configuration and builds a match waiting in the menu.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ids = IdAllocator::default();
        let hero = factories::create_hero(
            config.hero(config.starting_hero)?,
            ids.hero(),
            config.map.hero_start,
        );
        let spots = config
            .map
            .tower_spots
            .iter()
            .map(|spot| TowerSpot {
                id: spot.id,
                position: spot.position,
                occupied: false,
            })
            .collect();
        let economy = Economy {
            currency: config.economy.starting_currency,
            lives: config.economy.starting_lives,
            max_lives: config.economy.starting_lives,
            score: 0,
        };
        let rng = ChaCha8Rng::seed_from_u64(derive_labeled_seed(
            config.seed,
            RNG_STREAM_SIMULATION,
        ));

        Ok(Self {
            path: PathModel::new(config.map.path.clone()),
            phase: GamePhase::Menu,
            clock: 0.0,
            economy,
            waves: WaveStatus::default(),
            enemies: BTreeMap::new(),
            towers: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            hero,
            spots,
            selection: Selection::default(),
            ids,
            rng,
            config,
        })
    }

    /// Restores the initial match state and resumes play.
    pub fn reset(&mut self, out_events: &mut Vec<Event>) -> Result<(), ConfigError> {
        let previous = self.phase;
        let mut fresh = World::new(self.config.clone())?;
        fresh.phase = GamePhase::Playing;
        *self = fresh;
        if previous != GamePhase::Playing {
            out_events.push(Event::PhaseChanged {
                from: previous,
                to: GamePhase::Playing,
            });
        }
        info!("match reset");
        Ok(())
    }

    /// Configuration the match was built from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Route enemies follow.
    #[must_use]
    pub fn path(&self) -> &PathModel {
        &self.path
    }

    /// Replaces the enemy route.
    pub fn set_path(&mut self, points: Vec<Vec3>) {
        self.path.set_path(points);
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Transitions the session phase, announcing the change.
    pub fn set_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        if self.phase == phase {
            return;
        }
        info!("phase {:?} -> {:?}", self.phase, phase);
        out_events.push(Event::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    /// Seconds of simulated play since the match started.
    #[must_use]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Advances the simulation clock.
    pub fn advance_clock(&mut self, dt: f32) {
        self.clock += dt.max(0.0);
    }

    /// Player resources.
    #[must_use]
    pub fn economy(&self) -> Economy {
        self.economy
    }

    /// Adds currency.
    pub fn add_currency(&mut self, amount: u32) {
        self.economy.currency = self.economy.currency.saturating_add(amount);
    }

    /// Deducts currency if the player can afford it.
    #[must_use]
    pub fn spend_currency(&mut self, amount: u32) -> bool {
        if self.economy.currency < amount {
            return false;
        }
        self.economy.currency -= amount;
        true
    }

    /// Adds score.
    pub fn add_score(&mut self, amount: u64) {
        self.economy.score = self.economy.score.saturating_add(amount);
    }

    /// Removes lives, losing the match once they run out during play.
    pub fn lose_lives(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        self.economy.lives = self.economy.lives.saturating_sub(amount);
        out_events.push(Event::LivesLost {
            amount,
            remaining: self.economy.lives,
        });
        if self.economy.lives == 0 && self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::Lost, out_events);
        }
    }

    /// Wave counters.
    #[must_use]
    pub fn wave_status(&self) -> WaveStatus {
        self.waves
    }

    /// Records the number of configured waves and rewinds the counters.
    pub fn set_total_waves(&mut self, total: u32) {
        self.waves = WaveStatus {
            total_waves: total,
            ..WaveStatus::default()
        };
    }

    /// Marks a wave as started with `enemies` queued spawns.
    pub fn begin_wave(&mut self, enemies: u32) {
        self.waves.wave_in_progress = true;
        self.waves.enemies_remaining = enemies;
    }

    /// Marks the running wave as cleared.
    pub fn complete_wave(&mut self) {
        self.waves.wave_in_progress = false;
        self.waves.enemies_remaining = 0;
        self.waves.current_wave = self.waves.current_wave.saturating_add(1);
    }

    /// Counts one enemy removal against the running wave.
    pub fn decrement_enemies_remaining(&mut self) {
        self.waves.enemies_remaining = self.waves.enemies_remaining.saturating_sub(1);
    }

    /// Live enemies in id order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> + '_ {
        self.enemies.values()
    }

    /// Identifiers of the live enemies in id order.
    #[must_use]
    pub fn enemy_ids(&self) -> Vec<EnemyId> {
        self.enemies.keys().copied().collect()
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Looks up an enemy.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Looks up an enemy mutably.
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Live enemies in id order, mutably.
    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> + '_ {
        self.enemies.values_mut()
    }

    /// Builds an enemy of `kind` at `position` and adds it to the field.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec3) -> Result<EnemyId, ConfigError> {
        let config = self.config.enemy(kind)?;
        let id = self.ids.enemy();
        let enemy = factories::create_enemy(config, id, position, self.clock);
        debug!("spawned {kind:?} enemy {}", id.get());
        let _ = self.enemies.insert(id, enemy);
        Ok(id)
    }

    /// Adds the split offspring of a dying enemy to the field.
    pub fn spawn_split_offspring(&mut self, parent: &Enemy, split: &SplitBehavior) -> Vec<EnemyId> {
        (0..split.count)
            .map(|index| {
                let id = self.ids.enemy();
                let child =
                    factories::create_split_offspring(parent, split, id, index, self.clock);
                let _ = self.enemies.insert(id, child);
                id
            })
            .collect()
    }

    /// Removes an enemy from the field.
    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        self.enemies.remove(&id)
    }

    /// Towers in id order.
    pub fn towers(&self) -> impl Iterator<Item = &Tower> + '_ {
        self.towers.values()
    }

    /// Identifiers of every tower in id order.
    #[must_use]
    pub fn tower_ids(&self) -> Vec<TowerId> {
        self.towers.keys().copied().collect()
    }

    /// Looks up a tower.
    #[must_use]
    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.get(&id)
    }

    /// Looks up a tower mutably.
    pub fn tower_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.towers.get_mut(&id)
    }

    /// Projectiles in flight in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.projectiles.values()
    }

    /// Identifiers of every projectile in flight.
    #[must_use]
    pub fn projectile_ids(&self) -> Vec<ProjectileId> {
        self.projectiles.keys().copied().collect()
    }

    /// Looks up a projectile.
    #[must_use]
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    /// Looks up a projectile mutably.
    pub fn projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    /// Launches a projectile from `tower` toward `aim`.
    pub fn fire_projectile(
        &mut self,
        tower: TowerId,
        target: EnemyId,
        start: Vec3,
        aim: Vec3,
    ) -> Option<ProjectileId> {
        let source = self.towers.get(&tower)?;
        let id = self.ids.projectile();
        let projectile = factories::create_projectile(id, source, target, start, aim);
        let _ = self.projectiles.insert(id, projectile);
        Some(id)
    }

    /// Removes a projectile.
    pub fn remove_projectile(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    /// The hero.
    #[must_use]
    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    /// The hero, mutably.
    pub fn hero_mut(&mut self) -> &mut Hero {
        &mut self.hero
    }

    /// Tower spots declared by the map.
    #[must_use]
    pub fn spots(&self) -> &[TowerSpot] {
        &self.spots
    }

    /// UI selection state.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Seeded random stream shared by every system.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

/// Applies an inbound command, emitting the resulting events.
///
/// Refused commands leave the world untouched and return the reason; tower
/// refusals are also broadcast so feedback layers can react. Ability and
/// wave-start commands are only validated here; the hero ability system and
/// the wave director act on them during the next tick.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    match command {
        Command::StartGame => transition(world, GamePhase::Menu, GamePhase::Playing, out_events),
        Command::Pause => transition(world, GamePhase::Playing, GamePhase::Paused, out_events),
        Command::Resume => transition(world, GamePhase::Paused, GamePhase::Playing, out_events),
        Command::ResetGame => Ok(world.reset(out_events)?),
        Command::PlaceTower { kind, spot } => {
            let result = place_tower(world, kind, spot, out_events);
            if let Err(CommandError::Placement(reason)) = &result {
                warn!("rejected {kind:?} on spot {}: {reason}", spot.get());
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    spot,
                    reason: *reason,
                });
            }
            result
        }
        Command::UpgradeTower { tower, tier } => {
            let result = upgrade_tower(world, tower, tier, out_events);
            if let Err(CommandError::Upgrade(reason)) = &result {
                warn!("rejected upgrade of tower {}: {reason}", tower.get());
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    tier,
                    reason: *reason,
                });
            }
            result
        }
        Command::SellTower { tower } => {
            let result = sell_tower(world, tower, out_events);
            if let Err(CommandError::Sale(reason)) = &result {
                warn!("rejected sale of tower {}: {reason}", tower.get());
                out_events.push(Event::TowerSaleRejected {
                    tower,
                    reason: *reason,
                });
            }
            result
        }
        Command::SelectTowerKind { kind } => {
            world.selection.tower_kind = kind;
            Ok(())
        }
        Command::SelectTower { tower } => {
            world.selection.tower = tower;
            Ok(())
        }
        Command::HoverSpot { spot } => {
            world.selection.hovered_spot = spot;
            Ok(())
        }
        Command::MoveHero { x, z } => {
            if world.hero.is_rooted() {
                return Err(CommandError::HeroRooted);
            }
            world.hero.target_position = Some(Vec3::new(x, 0.0, z));
            world.hero.is_moving = true;
            Ok(())
        }
        Command::SwitchHero { kind } => switch_hero(world, kind, out_events),
        Command::ActivateAbility { .. } | Command::StartNextWave => {
            if world.phase != GamePhase::Playing {
                return Err(CommandError::InvalidPhase(world.phase));
            }
            Ok(())
        }
    }
}

fn transition(
    world: &mut World,
    from: GamePhase,
    to: GamePhase,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if world.phase != from {
        return Err(CommandError::InvalidPhase(world.phase));
    }
    world.set_phase(to, out_events);
    Ok(())
}

fn place_tower(
    world: &mut World,
    kind: TowerKind,
    spot_id: SpotId,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if world.phase.is_over() {
        return Err(PlacementError::MatchOver.into());
    }
    let spot_index = world
        .spots
        .iter()
        .position(|spot| spot.id == spot_id)
        .ok_or(PlacementError::UnknownSpot)?;
    let spot = world.spots[spot_index];
    if spot.occupied {
        return Err(PlacementError::SpotOccupied.into());
    }

    let config = world.config.tower(kind)?;
    if world.economy.currency < config.cost {
        return Err(PlacementError::InsufficientFunds {
            required: config.cost,
            available: world.economy.currency,
        }
        .into());
    }

    let id = world.ids.tower();
    let tower = factories::create_tower(config, id, &spot);
    let cost = config.cost;
    world.economy.currency -= cost;
    world.spots[spot_index].occupied = true;
    let _ = world.towers.insert(id, tower);

    info!("placed {kind:?} tower {} on spot {}", id.get(), spot_id.get());
    out_events.push(Event::TowerPlaced {
        tower: id,
        kind,
        spot: spot_id,
        cost,
    });
    Ok(())
}

fn upgrade_tower(
    world: &mut World,
    tower_id: TowerId,
    tier: TowerTier,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if world.phase.is_over() {
        return Err(UpgradeError::MatchOver.into());
    }
    let tower = world
        .towers
        .get_mut(&tower_id)
        .ok_or(UpgradeError::UnknownTower)?;
    let illegal = UpgradeError::IllegalTier {
        from: tower.tier,
        to: tier,
    };
    if !tower.tier.can_upgrade_to(tier) {
        return Err(illegal.into());
    }

    let upgrade = world
        .config
        .tower(tower.kind)?
        .upgrades
        .get(tier)
        .ok_or(illegal)?;
    if world.economy.currency < upgrade.cost {
        return Err(UpgradeError::InsufficientFunds {
            required: upgrade.cost,
            available: world.economy.currency,
        }
        .into());
    }

    towers::apply_upgrade(tower, tier, upgrade)?;
    world.economy.currency -= upgrade.cost;

    info!("upgraded tower {} to tier {}", tower_id.get(), tier.label());
    out_events.push(Event::TowerUpgraded {
        tower: tower_id,
        tier,
        cost: upgrade.cost,
    });
    Ok(())
}

fn sell_tower(
    world: &mut World,
    tower_id: TowerId,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if world.phase.is_over() {
        return Err(SaleError::MatchOver.into());
    }
    let tower = world
        .towers
        .remove(&tower_id)
        .ok_or(SaleError::UnknownTower)?;
    let refund = towers::sell_value(tower.total_invested);

    if let Some(spot) = world.spots.iter_mut().find(|spot| spot.id == tower.spot) {
        spot.occupied = false;
    }
    if world.selection.tower == Some(tower_id) {
        world.selection.tower = None;
    }
    world.add_currency(refund);

    info!("sold tower {} for {refund}", tower_id.get());
    out_events.push(Event::TowerSold {
        tower: tower_id,
        spot: tower.spot,
        refund,
    });
    Ok(())
}

fn switch_hero(
    world: &mut World,
    kind: HeroKind,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    if world.hero.kind == kind {
        return Ok(());
    }
    let config = world.config.hero(kind)?;
    let mut hero = factories::create_hero(config, world.ids.hero(), world.hero.position);
    hero.rotation = world.hero.rotation;
    info!("switched hero to {}", hero.name);
    out_events.push(Event::HeroSwitched { hero: hero.id, kind });
    world.hero = hero;
    Ok(())
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use nova_defence_core::{GamePhase, TowerId, TowerKind, TowerTier};

    use super::{towers, World};

    /// Summary a heads-up display renders every frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Hud {
        /// Spendable currency.
        pub currency: u32,
        /// Remaining lives.
        pub lives: u32,
        /// Lives at match start.
        pub max_lives: u32,
        /// Accumulated score.
        pub score: u64,
        /// Number of waves cleared.
        pub wave: u32,
        /// Number of configured waves.
        pub total_waves: u32,
        /// Whether a wave is running.
        pub wave_in_progress: bool,
        /// Session phase.
        pub phase: GamePhase,
    }

    /// Upgrade the UI can offer for a tower.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct UpgradeOption {
        /// Tier the upgrade reaches.
        pub tier: TowerTier,
        /// Display name after the upgrade.
        pub name: String,
        /// Upgrade cost.
        pub cost: u32,
        /// Whether the player can pay for it now.
        pub affordable: bool,
    }

    /// Builds the heads-up display summary.
    #[must_use]
    pub fn hud(world: &World) -> Hud {
        let economy = world.economy();
        let waves = world.wave_status();
        Hud {
            currency: economy.currency,
            lives: economy.lives,
            max_lives: economy.max_lives,
            score: economy.score,
            wave: waves.current_wave,
            total_waves: waves.total_waves,
            wave_in_progress: waves.wave_in_progress,
            phase: world.phase(),
        }
    }

    /// Display name of a tower at its current tier.
    #[must_use]
    pub fn tower_display_name(world: &World, tower: TowerId) -> Option<String> {
        let tower = world.tower(tower)?;
        let config = world.config().tower(tower.kind).ok()?;
        Some(towers::display_name(config, tower.tier).to_owned())
    }

    /// Upgrades reachable from a tower's current tier.
    #[must_use]
    pub fn available_upgrades(world: &World, tower: TowerId) -> Vec<UpgradeOption> {
        let Some(tower) = world.tower(tower) else {
            return Vec::new();
        };
        let Ok(config) = world.config().tower(tower.kind) else {
            return Vec::new();
        };
        let currency = world.economy().currency;
        towers::available_upgrades(config, tower)
            .into_iter()
            .map(|(tier, upgrade)| UpgradeOption {
                tier,
                name: upgrade.name.clone(),
                cost: upgrade.cost,
                affordable: currency >= upgrade.cost,
            })
            .collect()
    }

    /// Refund the player would receive for selling a tower.
    #[must_use]
    pub fn sell_value(world: &World, tower: TowerId) -> Option<u32> {
        world
            .tower(tower)
            .map(|tower| towers::sell_value(tower.total_invested))
    }

    /// Reports whether the player can buy a tower of `kind`.
    #[must_use]
    pub fn can_afford_tower(world: &World, kind: TowerKind) -> bool {
        world
            .config()
            .tower(kind)
            .map_or(false, |config| world.economy().currency >= config.cost)
    }
}
