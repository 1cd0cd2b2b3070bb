use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{AbilitySlot, EnemyId, HeroId, HeroKind};

/// The single player-controlled hero.
#[derive(Clone, Debug, PartialEq)]
pub struct Hero {
    /// Identifier allocated by the world; changes when the hero is switched.
    pub id: HeroId,
    /// Kit the hero plays.
    pub kind: HeroKind,
    /// Display name.
    pub name: String,
    /// Ground position.
    pub position: Vec3,
    /// Facing angle around the y axis.
    pub rotation: f32,
    /// Current health, clamped at zero.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Basic attack damage.
    pub damage: f32,
    /// Ground-plane basic attack range.
    pub attack_range: f32,
    /// Basic attacks per second.
    pub attack_speed: f32,
    /// Simulation time of the last basic attack.
    pub last_attack_time: Option<f32>,
    /// Enemy struck by the most recent basic attack.
    pub target: Option<EnemyId>,
    /// Destination of the current move order.
    pub target_position: Option<Vec3>,
    /// Whether the hero is walking toward `target_position`.
    pub is_moving: bool,
    /// The three ability slots.
    pub abilities: AbilitySet,
    /// Active fortress stance.
    pub fortress: Option<FortressBuff>,
    /// Crit waiting to be consumed by the next basic attack.
    pub pending_crit: Option<PendingCrit>,
}

impl Hero {
    /// Reports whether a crit is primed.
    #[must_use]
    pub fn has_pending_crit(&self) -> bool {
        self.pending_crit.is_some()
    }

    /// Consumes the primed crit and returns its damage multiplier.
    pub fn consume_crit(&mut self) -> Option<f32> {
        self.pending_crit.take().map(|crit| crit.multiplier)
    }

    /// Reports whether the fortress stance roots the hero in place.
    #[must_use]
    pub fn is_rooted(&self) -> bool {
        self.fortress.is_some()
    }
}

/// Fixed triple of abilities keyed by slot.
#[derive(Clone, Debug, PartialEq)]
pub struct AbilitySet {
    /// Ability bound to [`AbilitySlot::First`].
    pub first: Ability,
    /// Ability bound to [`AbilitySlot::Second`].
    pub second: Ability,
    /// Ability bound to [`AbilitySlot::Ultimate`].
    pub ultimate: Ability,
}

impl AbilitySet {
    /// Ability stored in the provided slot.
    #[must_use]
    pub fn get(&self, slot: AbilitySlot) -> &Ability {
        match slot {
            AbilitySlot::First => &self.first,
            AbilitySlot::Second => &self.second,
            AbilitySlot::Ultimate => &self.ultimate,
        }
    }

    /// Mutable ability stored in the provided slot.
    pub fn get_mut(&mut self, slot: AbilitySlot) -> &mut Ability {
        match slot {
            AbilitySlot::First => &mut self.first,
            AbilitySlot::Second => &mut self.second,
            AbilitySlot::Ultimate => &mut self.ultimate,
        }
    }

    /// Iterates over every ability mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ability> {
        [&mut self.first, &mut self.second, &mut self.ultimate].into_iter()
    }
}

/// Cooldown-gated hero ability.
#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    /// Display name.
    pub name: String,
    /// Seconds between casts.
    pub cooldown: f32,
    /// Seconds until the ability can be cast again.
    pub current_cooldown: f32,
    /// Kit-specific tuning values.
    pub params: AbilityParams,
}

impl Ability {
    /// Reports whether the ability is off cooldown.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.current_cooldown <= 0.0
    }

    /// Seconds since the last cast, saturating at the full cooldown.
    #[must_use]
    pub fn elapsed_since_cast(&self) -> f32 {
        self.cooldown - self.current_cooldown
    }
}

/// Optional tuning values an ability effect may read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityParams {
    /// Damage dealt.
    pub damage: Option<f32>,
    /// Area radius.
    pub radius: Option<f32>,
    /// Effect duration in seconds.
    pub duration: Option<f32>,
    /// Fraction of speed removed by a slow.
    pub slow_percent: Option<f32>,
    /// Knockback strength.
    pub knockback_force: Option<f32>,
    /// Crit damage multiplier.
    pub crit_multiplier: Option<f32>,
    /// Health fraction at or below which an execute kills.
    pub execute_threshold: Option<f32>,
    /// Healing applied per second.
    pub heal_per_second: Option<f32>,
    /// Search range for targeted effects.
    pub range: Option<f32>,
    /// Fraction of the distance enemies are pulled.
    pub pull_strength: Option<f32>,
    /// Seconds before a delayed effect resolves.
    pub delay: Option<f32>,
    /// Currency granted by economy effects.
    pub currency_bonus: Option<f32>,
    /// Full opening angle of a frontal cone, in degrees.
    pub cone_degrees: Option<f32>,
    /// Flat healing applied instantly.
    pub heal: Option<f32>,
}

/// Stats saved while the tank's fortress stance is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FortressBuff {
    /// Damage to restore when the stance ends.
    pub saved_damage: f32,
    /// Speed to restore when the stance ends.
    pub saved_speed: f32,
    /// Seconds the stance lasts.
    pub duration: f32,
}

/// Crit primed by the assassin's mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingCrit {
    /// Damage multiplier applied when consumed.
    pub multiplier: f32,
    /// Seconds until the mark fades unused.
    pub remaining: f32,
}
