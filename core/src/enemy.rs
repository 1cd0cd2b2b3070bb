use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{EnemyId, EnemyKind};

/// Live enemy record stored by the world.
///
/// `path_index` and `path_progress` are the canonical location; `position`
/// is derived from them every movement tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier allocated by the world.
    pub id: EnemyId,
    /// Archetype the enemy was built from.
    pub kind: EnemyKind,
    /// World position derived from the path encoding.
    pub position: Vec3,
    /// Facing angle around the y axis.
    pub rotation: f32,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Lives removed when the enemy escapes.
    pub damage: u32,
    /// Currency granted on death.
    pub reward: u32,
    /// Index of the path segment the enemy is walking.
    pub path_index: usize,
    /// Fraction of the current segment already walked.
    pub path_progress: f32,
    /// Set when the enemy has been killed this tick.
    pub is_dead: bool,
    /// Set when the enemy has walked off the end of the path.
    pub reached_end: bool,
    /// Static capability components.
    pub behaviors: Behaviors,
    /// Mutable per-enemy behavior counters.
    pub state: BehaviorState,
}

impl Enemy {
    /// Combined `path_index + path_progress`, the furthest-threat metric.
    #[must_use]
    pub fn total_progress(&self) -> f32 {
        self.path_index as f32 + self.path_progress
    }

    /// Fraction of maximum health remaining.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }

    /// Reports whether the enemy is currently underground.
    #[must_use]
    pub const fn is_burrowed(&self) -> bool {
        self.state.burrowed
    }
}

/// Orthogonal capability components an enemy archetype may carry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behaviors {
    /// Splits into smaller copies on death.
    pub split: Option<SplitBehavior>,
    /// Sidesteps a fixed share of hits.
    pub dodge: Option<DodgeBehavior>,
    /// Reduces incoming damage by a flat percentage.
    pub armor: Option<ArmorBehavior>,
    /// Cannot be knocked back.
    pub knockback_immune: bool,
    /// Leaves a trail at a fixed interval.
    pub trail: Option<TrailBehavior>,
    /// Periodically jumps forward along the path.
    pub teleport: Option<TeleportBehavior>,
    /// Periodically digs underground.
    pub burrow: Option<BurrowBehavior>,
}

/// Split-on-death parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitBehavior {
    /// Number of offspring spawned.
    pub count: u32,
    /// Offspring max health as a fraction of the parent's max health.
    pub health_percent: f32,
}

/// Deterministic dodge parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DodgeBehavior {
    /// Share of hits dodged; every `round(1 / chance)`-th hit misses.
    pub chance: f32,
}

impl DodgeBehavior {
    /// Number of hits per dodge, or `None` when the enemy never dodges.
    #[must_use]
    pub fn period(&self) -> Option<u32> {
        if self.chance <= 0.0 {
            return None;
        }
        Some((1.0 / self.chance).round().max(1.0) as u32)
    }
}

/// Flat damage mitigation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmorBehavior {
    /// Fraction of incoming damage absorbed.
    pub percent: f32,
}

/// Trail cadence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrailBehavior {
    /// Seconds between trail marks.
    pub interval: f32,
}

/// Teleport cadence and reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeleportBehavior {
    /// Seconds between teleports.
    pub interval: f32,
    /// Path segments skipped per teleport.
    pub segments: usize,
}

/// Burrow cadence, duration and reach.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BurrowBehavior {
    /// Seconds spent on the surface between burrows.
    pub interval: f32,
    /// Seconds spent underground.
    pub duration: f32,
    /// Path segments skipped when resurfacing.
    pub segments: usize,
}

/// Runtime counters driven by the movement, health and ability systems.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BehaviorState {
    /// Hits received by a dodging enemy.
    pub projectiles_received: u32,
    /// Lateral displacement layered over the path position.
    pub dodge_offset: Vec3,
    /// Seconds until the dodge offset clears.
    pub dodge_offset_remaining: f32,
    /// Simulation time of the last teleport.
    pub last_teleport: f32,
    /// Simulation time the enemy last went under or came up.
    pub last_burrow: f32,
    /// Set while the enemy is underground.
    pub burrowed: bool,
    /// Simulation time at which the current burrow ends.
    pub burrow_ends_at: f32,
    /// Simulation time of the last trail mark.
    pub last_trail: f32,
    /// Free-running animation phase.
    pub animation_phase: f32,
    /// Marks offspring produced by a split.
    pub is_mini: bool,
    /// Active slow, if any.
    pub slow: Option<SlowEffect>,
}

/// Temporary speed reduction with the speed to restore afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowEffect {
    /// Speed the enemy had before the slow landed.
    pub original_speed: f32,
    /// Seconds until the slow expires.
    pub remaining: f32,
}
