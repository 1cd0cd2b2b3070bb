//! Immutable configuration tables consumed by the simulation.
//!
//! The core performs no I/O: adapters parse these records (the engine reads
//! them from TOML) and hand a [`GameConfig`] to the world, which validates it
//! once at construction. A lookup miss after validation indicates a broken
//! build rather than a game condition and surfaces as [`ConfigError`].

use std::collections::BTreeSet;

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    AbilityParams, AbilitySlot, Behaviors, EnemyKind, HeroKind, SpecialEffect, SpotId, TowerKind,
    TowerTier,
};

const DEFAULT_MAX_TICK_DELTA: f32 = 0.1;
const DEFAULT_FIRST_WAVE_DELAY: f32 = 2.0;

/// Errors raised when configuration tables are inconsistent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An enemy kind has no stat entry.
    #[error("no enemy configuration for {0:?}")]
    MissingEnemy(EnemyKind),
    /// A tower kind has no stat entry.
    #[error("no tower configuration for {0:?}")]
    MissingTower(TowerKind),
    /// A hero kind has no stat entry.
    #[error("no hero configuration for {0:?}")]
    MissingHero(HeroKind),
    /// A table declares the same kind twice.
    #[error("{table} table declares {kind} more than once")]
    DuplicateEntry {
        /// Table containing the duplicate.
        table: &'static str,
        /// Debug rendering of the duplicated kind.
        kind: String,
    },
    /// Two tower spots share an identifier.
    #[error("tower spot {0} is declared more than once")]
    DuplicateSpot(u32),
}

/// Complete configuration of a match.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Seed for every random stream in the match.
    #[serde(default)]
    pub seed: u64,
    /// Largest delta a single tick may advance.
    #[serde(default = "default_max_tick_delta")]
    pub max_tick_delta: f32,
    /// Kit the hero starts with.
    pub starting_hero: HeroKind,
    /// Economy tuning.
    #[serde(default)]
    pub economy: EconomyConfig,
    /// Automatic wave start behavior.
    #[serde(default)]
    pub wave_schedule: WaveScheduleConfig,
    /// Ordered wave definitions.
    #[serde(default)]
    pub waves: Vec<WaveConfig>,
    /// Map layout.
    pub map: MapConfig,
    /// Enemy stat table.
    pub enemies: Vec<EnemyConfig>,
    /// Tower stat and upgrade table.
    pub towers: Vec<TowerConfig>,
    /// Hero stat and ability table.
    pub heroes: Vec<HeroConfig>,
}

impl GameConfig {
    /// Checks that every kind has exactly one entry and spot ids are unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unique("enemy", self.enemies.iter().map(|entry| entry.kind))?;
        ensure_unique("tower", self.towers.iter().map(|entry| entry.kind))?;
        ensure_unique("hero", self.heroes.iter().map(|entry| entry.kind))?;

        for kind in EnemyKind::ALL {
            let _ = self.enemy(kind)?;
        }
        for kind in TowerKind::ALL {
            let _ = self.tower(kind)?;
        }
        for kind in HeroKind::ALL {
            let _ = self.hero(kind)?;
        }

        let mut spots = BTreeSet::new();
        for spot in &self.map.tower_spots {
            if !spots.insert(spot.id) {
                return Err(ConfigError::DuplicateSpot(spot.id.get()));
            }
        }

        Ok(())
    }

    /// Stat entry for an enemy kind.
    pub fn enemy(&self, kind: EnemyKind) -> Result<&EnemyConfig, ConfigError> {
        self.enemies
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or(ConfigError::MissingEnemy(kind))
    }

    /// Stat entry for a tower kind.
    pub fn tower(&self, kind: TowerKind) -> Result<&TowerConfig, ConfigError> {
        self.towers
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or(ConfigError::MissingTower(kind))
    }

    /// Stat entry for a hero kind.
    pub fn hero(&self, kind: HeroKind) -> Result<&HeroConfig, ConfigError> {
        self.heroes
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or(ConfigError::MissingHero(kind))
    }
}

fn ensure_unique<K>(table: &'static str, kinds: impl Iterator<Item = K>) -> Result<(), ConfigError>
where
    K: Ord + std::fmt::Debug,
{
    let mut seen = BTreeSet::new();
    for kind in kinds {
        let rendered = format!("{kind:?}");
        if !seen.insert(kind) {
            return Err(ConfigError::DuplicateEntry {
                table,
                kind: rendered,
            });
        }
    }
    Ok(())
}

fn default_max_tick_delta() -> f32 {
    DEFAULT_MAX_TICK_DELTA
}

/// Starting resources and wave rewards.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Currency at match start.
    pub starting_currency: u32,
    /// Lives at match start, also the maximum.
    pub starting_lives: u32,
    /// Flat bonus for clearing any wave.
    pub wave_bonus_base: u32,
    /// Additional bonus per wave number.
    pub wave_bonus_per_wave: u32,
}

impl EconomyConfig {
    /// Completion bonus for the one-based wave number.
    #[must_use]
    pub fn wave_bonus(&self, wave: u32) -> u32 {
        self.wave_bonus_base
            .saturating_add(self.wave_bonus_per_wave.saturating_mul(wave))
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_currency: 200,
            starting_lives: 20,
            wave_bonus_base: 25,
            wave_bonus_per_wave: 10,
        }
    }
}

/// Automatic wave start gate.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveScheduleConfig {
    /// Seconds after play begins before the first wave starts on its own.
    pub first_wave_delay: Option<f32>,
    /// Whether later waves start on their own after `delay_between_waves`.
    pub auto_advance: bool,
}

impl Default for WaveScheduleConfig {
    fn default() -> Self {
        Self {
            first_wave_delay: Some(DEFAULT_FIRST_WAVE_DELAY),
            auto_advance: true,
        }
    }
}

/// One wave of the schedule.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WaveConfig {
    /// Identifier used in logs.
    pub id: u32,
    /// Groups spawned in order.
    pub enemies: Vec<SpawnGroup>,
    /// Pause before the following wave starts automatically.
    #[serde(default)]
    pub delay_between_waves: f32,
}

/// A run of identical enemies inside a wave.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct SpawnGroup {
    /// Archetype spawned.
    pub kind: EnemyKind,
    /// Number of enemies in the group.
    pub count: u32,
    /// Seconds between members of the group.
    #[serde(default)]
    pub spawn_delay: f32,
}

/// Static map layout.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MapConfig {
    /// Waypoints enemies walk through.
    pub path: Vec<Vec3>,
    /// Where enemies appear.
    pub spawn_point: Vec3,
    /// Where the hero starts.
    pub hero_start: Vec3,
    /// Locations that can host towers.
    #[serde(default)]
    pub tower_spots: Vec<TowerSpotConfig>,
}

/// Declared tower location.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TowerSpotConfig {
    /// Identifier of the spot.
    pub id: SpotId,
    /// Position a tower built here occupies.
    pub position: Vec3,
}

/// Enemy stat entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EnemyConfig {
    /// Archetype described by the entry.
    pub kind: EnemyKind,
    /// Display name.
    pub name: String,
    /// Starting health.
    pub max_health: f32,
    /// Travel speed.
    pub speed: f32,
    /// Lives removed on escape.
    pub damage: u32,
    /// Currency granted on death.
    pub reward: u32,
    /// Capability components.
    #[serde(default)]
    pub behaviors: Behaviors,
}

/// Tower stat entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TowerConfig {
    /// Archetype described by the entry.
    pub kind: TowerKind,
    /// Tier-1 display name.
    pub name: String,
    /// Purchase cost.
    pub cost: u32,
    /// Projectile damage.
    pub damage: f32,
    /// Targeting range.
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Projectile speed.
    pub projectile_speed: f32,
    /// Splash radius of splash towers.
    #[serde(default)]
    pub splash_radius: Option<f32>,
    /// Upgrade steps.
    pub upgrades: TowerUpgrades,
}

/// Upgrade step for each reachable tier.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TowerUpgrades {
    /// Step to tier 2.
    pub tier2: UpgradeConfig,
    /// Step to tier 3.
    pub tier3: UpgradeConfig,
    /// Step to tier 4A.
    pub tier4a: UpgradeConfig,
    /// Step to tier 4B.
    pub tier4b: UpgradeConfig,
}

impl TowerUpgrades {
    /// Upgrade step that reaches `tier`; tier 1 is bought, not upgraded to.
    #[must_use]
    pub fn get(&self, tier: TowerTier) -> Option<&UpgradeConfig> {
        match tier {
            TowerTier::One => None,
            TowerTier::Two => Some(&self.tier2),
            TowerTier::Three => Some(&self.tier3),
            TowerTier::FourA => Some(&self.tier4a),
            TowerTier::FourB => Some(&self.tier4b),
        }
    }
}

/// A single upgrade step.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UpgradeConfig {
    /// Display name of the upgraded tower.
    pub name: String,
    /// Upgrade cost.
    pub cost: u32,
    /// Multipliers applied to the current stats.
    #[serde(flatten)]
    pub modifiers: StatModifiers,
    /// Tag unlocked by the step.
    #[serde(default)]
    pub special_effect: Option<SpecialEffect>,
}

/// Multiplicative stat changes; absent entries leave the stat untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatModifiers {
    /// Damage multiplier.
    pub damage: Option<f32>,
    /// Range multiplier.
    pub range: Option<f32>,
    /// Fire-rate multiplier.
    pub fire_rate: Option<f32>,
    /// Splash-radius multiplier, ignored by towers without splash.
    pub splash_radius: Option<f32>,
}

/// Hero stat entry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HeroConfig {
    /// Kit described by the entry.
    pub kind: HeroKind,
    /// Display name.
    pub name: String,
    /// Maximum health.
    pub max_health: f32,
    /// Walking speed.
    pub speed: f32,
    /// Basic attack damage.
    pub damage: f32,
    /// Basic attack range.
    pub attack_range: f32,
    /// Basic attacks per second.
    pub attack_speed: f32,
    /// Ability definitions.
    pub abilities: HeroAbilityConfigs,
}

/// Ability definitions keyed by slot.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HeroAbilityConfigs {
    /// Ability for [`AbilitySlot::First`].
    pub first: AbilityConfig,
    /// Ability for [`AbilitySlot::Second`].
    pub second: AbilityConfig,
    /// Ability for [`AbilitySlot::Ultimate`].
    pub ultimate: AbilityConfig,
}

impl HeroAbilityConfigs {
    /// Definition stored in the provided slot.
    #[must_use]
    pub fn get(&self, slot: AbilitySlot) -> &AbilityConfig {
        match slot {
            AbilitySlot::First => &self.first,
            AbilitySlot::Second => &self.second,
            AbilitySlot::Ultimate => &self.ultimate,
        }
    }
}

/// Ability definition.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AbilityConfig {
    /// Display name.
    pub name: String,
    /// Seconds between casts.
    pub cooldown: f32,
    /// Kit-specific tuning values.
    #[serde(flatten)]
    pub params: AbilityParams,
}
