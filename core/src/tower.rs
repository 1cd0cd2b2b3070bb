use glam::Vec3;

use crate::{EnemyId, ProjectileId, SpecialEffect, SpotId, TowerId, TowerKind, TowerTier};

/// Live tower record stored by the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    /// Identifier allocated by the world.
    pub id: TowerId,
    /// Archetype the tower was built from.
    pub kind: TowerKind,
    /// Spot hosting the tower.
    pub spot: SpotId,
    /// Base position of the tower.
    pub position: Vec3,
    /// Facing angle around the y axis.
    pub rotation: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Ground-plane targeting range.
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Projectile travel speed.
    pub projectile_speed: f32,
    /// Splash radius, present only on splash towers.
    pub splash_radius: Option<f32>,
    /// Simulation time of the last shot, `None` before the first one.
    pub last_fire_time: Option<f32>,
    /// Enemy currently held as target.
    pub target: Option<EnemyId>,
    /// Current upgrade tier.
    pub tier: TowerTier,
    /// Tag unlocked by a tier-4 specialisation.
    pub special_effect: Option<SpecialEffect>,
    /// Cumulative purchase and upgrade cost.
    pub total_invested: u32,
}

impl Tower {
    /// Seconds between shots, or `None` when the tower cannot fire.
    #[must_use]
    pub fn fire_interval(&self) -> Option<f32> {
        if self.fire_rate <= 0.0 {
            return None;
        }
        Some(1.0 / self.fire_rate)
    }
}

/// Projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier allocated by the world.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub source: TowerId,
    /// Enemy the projectile is homing on.
    pub target: EnemyId,
    /// Current position.
    pub position: Vec3,
    /// Launch position.
    pub start_position: Vec3,
    /// Last known aim point.
    pub target_position: Vec3,
    /// Fraction of the flight completed.
    pub progress: f32,
    /// Distance flown so far.
    pub distance_traveled: f32,
    /// Damage applied on impact.
    pub damage: f32,
    /// Travel speed.
    pub speed: f32,
    /// Splash radius for area detonations.
    pub splash_radius: Option<f32>,
}

/// Map location that can host one tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSpot {
    /// Identifier of the spot.
    pub id: SpotId,
    /// Position a tower built here occupies.
    pub position: Vec3,
    /// Whether a tower currently stands on the spot.
    pub occupied: bool,
}
