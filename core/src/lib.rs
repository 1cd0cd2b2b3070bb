#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Nova Defence simulation.
//!
//! This crate defines the vocabulary every other crate speaks: stable entity
//! identifiers, the entity records stored by the world, the immutable
//! configuration tables, and the message surface. Adapters submit [`Command`]
//! values describing desired mutations, the world and the systems execute
//! them, and the simulation broadcasts [`Event`] values so audio, visual and
//! UI collaborators can react without the core depending on them.

pub mod config;
pub mod geometry;

mod enemy;
mod hero;
mod tower;

pub use config::{
    AbilityConfig, ConfigError, EconomyConfig, EnemyConfig, GameConfig, HeroAbilityConfigs,
    HeroConfig, MapConfig, SpawnGroup, StatModifiers, TowerConfig, TowerSpotConfig,
    TowerUpgrades, UpgradeConfig, WaveConfig, WaveScheduleConfig,
};
pub use enemy::{
    ArmorBehavior, BehaviorState, Behaviors, BurrowBehavior, DodgeBehavior, Enemy, SlowEffect,
    SplitBehavior, TeleportBehavior, TrailBehavior,
};
pub use glam::Vec3;
pub use hero::{Ability, AbilityParams, AbilitySet, FortressBuff, Hero, PendingCrit};
pub use tower::{Projectile, Tower, TowerSpot};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to each enemy.
    EnemyId
);
entity_id!(
    /// Unique identifier assigned to each tower.
    TowerId
);
entity_id!(
    /// Unique identifier assigned to each projectile in flight.
    ProjectileId
);
entity_id!(
    /// Unique identifier assigned to each hero record.
    HeroId
);
entity_id!(
    /// Identifier of a map location that can host one tower.
    SpotId
);

/// Enumerates the enemy archetypes available to wave schedules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Basic melee walker that bursts into smaller copies on death.
    Blobbert,
    /// Crab that sidesteps a fixed share of incoming hits.
    SirScuttles,
    /// Heavily armored brute that shrugs off knockback.
    Chonkzilla,
    /// Flying enemy that leaves a trail behind it.
    Floofernaut,
    /// Glitching enemy that periodically teleports forward along the path.
    Zipzap,
    /// Digger that burrows underground and resurfaces further down the path.
    Diggory,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Blobbert,
        EnemyKind::SirScuttles,
        EnemyKind::Chonkzilla,
        EnemyKind::Floofernaut,
        EnemyKind::Zipzap,
        EnemyKind::Diggory,
    ];
}

/// Enumerates the tower archetypes that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Fast single-target energy tower.
    PlasmaSpire,
    /// Slow, heavy single-target tower.
    RailCannon,
    /// Splash-damage artillery tower.
    NovaLauncher,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [TowerKind; 3] = [
        TowerKind::PlasmaSpire,
        TowerKind::RailCannon,
        TowerKind::NovaLauncher,
    ];
}

/// Position of a tower in the branching upgrade graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerTier {
    /// Freshly purchased tower.
    #[serde(rename = "1")]
    One,
    /// First linear upgrade.
    #[serde(rename = "2")]
    Two,
    /// Second linear upgrade, the branching point.
    #[serde(rename = "3")]
    Three,
    /// First terminal specialisation.
    #[serde(rename = "4A")]
    FourA,
    /// Second terminal specialisation.
    #[serde(rename = "4B")]
    FourB,
}

impl TowerTier {
    /// Tiers reachable from this tier with a single upgrade.
    #[must_use]
    pub const fn next_tiers(self) -> &'static [TowerTier] {
        match self {
            TowerTier::One => &[TowerTier::Two],
            TowerTier::Two => &[TowerTier::Three],
            TowerTier::Three => &[TowerTier::FourA, TowerTier::FourB],
            TowerTier::FourA | TowerTier::FourB => &[],
        }
    }

    /// Reports whether `target` is one legal upgrade step away.
    #[must_use]
    pub fn can_upgrade_to(self, target: TowerTier) -> bool {
        self.next_tiers().contains(&target)
    }

    /// Reports whether no further upgrade exists.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, TowerTier::FourA | TowerTier::FourB)
    }

    /// Short label shown next to a tower name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TowerTier::One => "1",
            TowerTier::Two => "2",
            TowerTier::Three => "3",
            TowerTier::FourA => "4A",
            TowerTier::FourB => "4B",
        }
    }
}

/// Descriptive tag unlocked by a tier-4 specialisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEffect {
    /// Sustained rapid-fire overcharge.
    Overcharge,
    /// Shots ignore armor.
    ArmorPiercing,
    /// Shots arc between nearby enemies.
    ChainArc,
    /// Single-target shots splash on hit.
    SplashOnHit,
    /// Detonations leave a damaging core.
    AoeCore,
    /// Shells break into bomblets.
    ClusterBomb,
}

/// Enumerates the five hero kits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroKind {
    /// Balanced damage dealer with an orbital strike.
    Fighter,
    /// Crowd-control caster with slows and a singularity.
    Mage,
    /// Close-range bruiser with knockback and a fortress stance.
    Tank,
    /// Burst assassin with crits, blinks and executes.
    Assassin,
    /// Sustain kit with heals and an economy ultimate.
    Healer,
}

impl HeroKind {
    /// Every hero kind in declaration order.
    pub const ALL: [HeroKind; 5] = [
        HeroKind::Fighter,
        HeroKind::Mage,
        HeroKind::Tank,
        HeroKind::Assassin,
        HeroKind::Healer,
    ];
}

/// Identifies one of the three ability slots every hero carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilitySlot {
    /// First ability, bound to `Q`.
    First,
    /// Second ability, bound to `W`.
    Second,
    /// Ultimate ability, bound to `R`.
    Ultimate,
}

impl AbilitySlot {
    /// Every slot in activation-key order.
    pub const ALL: [AbilitySlot; 3] = [
        AbilitySlot::First,
        AbilitySlot::Second,
        AbilitySlot::Ultimate,
    ];

    /// Keyboard key conventionally bound to the slot.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            AbilitySlot::First => 'Q',
            AbilitySlot::Second => 'W',
            AbilitySlot::Ultimate => 'R',
        }
    }

    /// Resolves a key press to a slot.
    #[must_use]
    pub fn from_key(key: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.key() == key.to_ascii_uppercase())
    }

    /// Reports whether the slot holds the ultimate ability.
    #[must_use]
    pub const fn is_ultimate(self) -> bool {
        matches!(self, AbilitySlot::Ultimate)
    }
}

/// Finite state machine describing the match session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the player to start the match.
    Menu,
    /// Simulation advances every tick.
    Playing,
    /// Simulation is frozen until resumed.
    Paused,
    /// Every wave was cleared.
    Won,
    /// Lives reached zero.
    Lost,
}

impl GamePhase {
    /// Reports whether the match has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Commands that express every mutation collaborators may request.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the menu and begins the match.
    StartGame,
    /// Freezes the simulation.
    Pause,
    /// Unfreezes a paused simulation.
    Resume,
    /// Restores the initial match state.
    ResetGame,
    /// Purchases a tower on a free spot.
    PlaceTower {
        /// Archetype to construct.
        kind: TowerKind,
        /// Spot that will host the tower.
        spot: SpotId,
    },
    /// Upgrades a tower to the next tier along a legal edge.
    UpgradeTower {
        /// Tower being upgraded.
        tower: TowerId,
        /// Tier the tower should advance to.
        tier: TowerTier,
    },
    /// Sells a tower and frees its spot.
    SellTower {
        /// Tower being sold.
        tower: TowerId,
    },
    /// Chooses the tower archetype the placement cursor will build.
    SelectTowerKind {
        /// Selected archetype, or `None` to clear.
        kind: Option<TowerKind>,
    },
    /// Selects an existing tower for inspection.
    SelectTower {
        /// Selected tower, or `None` to clear.
        tower: Option<TowerId>,
    },
    /// Records the spot under the cursor.
    HoverSpot {
        /// Hovered spot, or `None` when no spot is hovered.
        spot: Option<SpotId>,
    },
    /// Sends the hero toward a ground position.
    MoveHero {
        /// Destination x coordinate.
        x: f32,
        /// Destination z coordinate.
        z: f32,
    },
    /// Requests activation of one hero ability.
    ActivateAbility {
        /// Slot whose ability should fire.
        slot: AbilitySlot,
    },
    /// Replaces the hero with a fresh record of another kit.
    SwitchHero {
        /// Kit to switch to.
        kind: HeroKind,
    },
    /// Opens the next wave ahead of the automatic timer.
    StartNextWave,
}

/// Events broadcast by the simulation so collaborators can react.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The session phase changed.
    PhaseChanged {
        /// Phase before the transition.
        from: GamePhase,
        /// Phase after the transition.
        to: GamePhase,
    },
    /// A wave began spawning.
    WaveStarted {
        /// One-based number of the wave.
        wave: u32,
        /// Number of enemies queued for the wave.
        enemies: u32,
    },
    /// Every enemy of a wave has been removed.
    WaveCompleted {
        /// One-based number of the wave.
        wave: u32,
        /// Currency awarded for clearing the wave.
        bonus: u32,
    },
    /// The final configured wave has been cleared.
    AllWavesCompleted,
    /// An enemy entered the field.
    EnemySpawned {
        /// Identifier of the new enemy.
        enemy: EnemyId,
        /// Archetype of the new enemy.
        kind: EnemyKind,
        /// Location where the enemy appeared.
        position: Vec3,
    },
    /// Damage was applied to an enemy.
    EnemyDamaged {
        /// Enemy that received the damage.
        enemy: EnemyId,
        /// Damage that was applied after mitigation.
        amount: f32,
        /// Position of the enemy when hit.
        position: Vec3,
    },
    /// An enemy sidestepped a hit.
    EnemyDodged {
        /// Enemy that dodged.
        enemy: EnemyId,
        /// Position of the enemy when it dodged.
        position: Vec3,
    },
    /// An enemy was killed and removed.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Position of the enemy at death.
        position: Vec3,
        /// Currency granted for the kill.
        reward: u32,
    },
    /// A dying enemy split into smaller copies.
    EnemySplit {
        /// Enemy that split.
        parent: EnemyId,
        /// Identifiers of the offspring.
        offspring: Vec<EnemyId>,
    },
    /// An enemy walked off the end of the path.
    EnemyReachedEnd {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Lives removed by the escape.
        damage: u32,
    },
    /// An enemy teleported forward along the path.
    EnemyTeleported {
        /// Enemy that teleported.
        enemy: EnemyId,
        /// Segment the enemy left.
        from_segment: usize,
        /// Segment the enemy arrived in.
        to_segment: usize,
    },
    /// An enemy dug underground.
    EnemyBurrowed {
        /// Enemy that burrowed.
        enemy: EnemyId,
        /// Position where it went under.
        position: Vec3,
    },
    /// A burrowed enemy resurfaced.
    EnemySurfaced {
        /// Enemy that surfaced.
        enemy: EnemyId,
        /// Position where it came up.
        position: Vec3,
    },
    /// A trailing enemy reached its trail interval.
    TrailMarked {
        /// Enemy leaving the trail.
        enemy: EnemyId,
        /// Position of the trail mark.
        position: Vec3,
    },
    /// The player lost lives.
    LivesLost {
        /// Lives removed.
        amount: u32,
        /// Lives left afterwards.
        remaining: u32,
    },
    /// A tower was purchased.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Archetype of the tower.
        kind: TowerKind,
        /// Spot now hosting the tower.
        spot: SpotId,
        /// Currency spent.
        cost: u32,
    },
    /// A tower advanced one tier.
    TowerUpgraded {
        /// Upgraded tower.
        tower: TowerId,
        /// Tier reached.
        tier: TowerTier,
        /// Currency spent.
        cost: u32,
    },
    /// A tower was sold.
    TowerSold {
        /// Sold tower.
        tower: TowerId,
        /// Spot that became free.
        spot: SpotId,
        /// Currency refunded.
        refund: u32,
    },
    /// A placement request was refused.
    TowerPlacementRejected {
        /// Requested archetype.
        kind: TowerKind,
        /// Requested spot.
        spot: SpotId,
        /// Reason for the refusal.
        reason: PlacementError,
    },
    /// An upgrade request was refused.
    TowerUpgradeRejected {
        /// Tower the request targeted.
        tower: TowerId,
        /// Requested tier.
        tier: TowerTier,
        /// Reason for the refusal.
        reason: UpgradeError,
    },
    /// A sale request was refused.
    TowerSaleRejected {
        /// Tower the request targeted.
        tower: TowerId,
        /// Reason for the refusal.
        reason: SaleError,
    },
    /// A tower launched a projectile.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Archetype of the tower.
        kind: TowerKind,
        /// Projectile that was launched.
        projectile: ProjectileId,
        /// Muzzle position.
        position: Vec3,
        /// Enemy the shot was aimed at.
        target: EnemyId,
    },
    /// A projectile reached its aim point.
    ProjectileImpact {
        /// Projectile that hit.
        projectile: ProjectileId,
        /// Impact position.
        position: Vec3,
        /// Whether the impact was a splash detonation.
        splash: bool,
    },
    /// The hero landed a basic attack.
    HeroAttacked {
        /// Attacking hero.
        hero: HeroId,
        /// Enemy that was struck.
        target: EnemyId,
        /// Damage applied after mitigation.
        damage: f32,
        /// Whether a pending crit was consumed.
        critical: bool,
    },
    /// The hero cast an ability.
    AbilityCast {
        /// Casting hero.
        hero: HeroId,
        /// Kit of the caster.
        kind: HeroKind,
        /// Slot that was activated.
        slot: AbilitySlot,
        /// Hero position after the cast resolved.
        position: Vec3,
        /// Whether the cast was an ultimate, which warrants a stronger effect.
        ultimate: bool,
    },
    /// The hero record was replaced by another kit.
    HeroSwitched {
        /// Identifier of the new hero record.
        hero: HeroId,
        /// Kit of the new hero.
        kind: HeroKind,
    },
}

/// Reasons a tower placement can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The spot does not exist on the map.
    #[error("tower spot does not exist")]
    UnknownSpot,
    /// The spot already hosts a tower.
    #[error("tower spot is already occupied")]
    SpotOccupied,
    /// The player cannot pay for the tower.
    #[error("insufficient currency: need {required}, have {available}")]
    InsufficientFunds {
        /// Cost of the tower.
        required: u32,
        /// Currency the player holds.
        available: u32,
    },
    /// The match is over.
    #[error("the match has ended")]
    MatchOver,
}

/// Reasons a tower upgrade can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the requested identifier exists.
    #[error("tower does not exist")]
    UnknownTower,
    /// The requested tier is not one legal step from the current tier.
    #[error("cannot upgrade from tier {} to tier {}", .from.label(), .to.label())]
    IllegalTier {
        /// Current tier of the tower.
        from: TowerTier,
        /// Requested tier.
        to: TowerTier,
    },
    /// The player cannot pay for the upgrade.
    #[error("insufficient currency: need {required}, have {available}")]
    InsufficientFunds {
        /// Cost of the upgrade.
        required: u32,
        /// Currency the player holds.
        available: u32,
    },
    /// The match is over.
    #[error("the match has ended")]
    MatchOver,
}

/// Reasons a tower sale can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SaleError {
    /// No tower with the requested identifier exists.
    #[error("tower does not exist")]
    UnknownTower,
    /// The match is over.
    #[error("the match has ended")]
    MatchOver,
}
