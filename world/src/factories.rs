//! Builders that turn configuration entries into live entity records.

use std::f32::consts::TAU;

use nova_defence_core::{
    geometry::grounded, Ability, AbilitySet, AbilitySlot, BehaviorState, Enemy, EnemyConfig,
    EnemyId, Hero, HeroConfig, HeroId, Projectile, ProjectileId, SplitBehavior, Tower,
    TowerConfig, TowerId, TowerSpot, TowerTier, Vec3,
};

/// Distance split offspring are pushed away from the parent's death point.
pub const SPLIT_OFFSET_RADIUS: f32 = 0.5;

/// Builds a fresh enemy at `position`, stamping its behavior timers with `now`.
#[must_use]
pub fn create_enemy(config: &EnemyConfig, id: EnemyId, position: Vec3, now: f32) -> Enemy {
    Enemy {
        id,
        kind: config.kind,
        position,
        rotation: 0.0,
        health: config.max_health,
        max_health: config.max_health,
        speed: config.speed,
        damage: config.damage,
        reward: config.reward,
        path_index: 0,
        path_progress: 0.0,
        is_dead: false,
        reached_end: false,
        behaviors: config.behaviors.clone(),
        state: BehaviorState {
            last_teleport: now,
            last_burrow: now,
            last_trail: now,
            ..BehaviorState::default()
        },
    }
}

/// Builds the `index`-th of `split.count` offspring of a dying enemy.
///
/// Offspring inherit the parent's path position, take a share of the
/// parent's maximum health and never split again.
#[must_use]
pub fn create_split_offspring(
    parent: &Enemy,
    split: &SplitBehavior,
    id: EnemyId,
    index: u32,
    now: f32,
) -> Enemy {
    let angle = TAU * index as f32 / split.count.max(1) as f32;
    let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * SPLIT_OFFSET_RADIUS;
    let max_health = (parent.max_health * split.health_percent).ceil();
    let reward = (parent.reward as f32 * split.health_percent).ceil() as u32;
    let speed = parent
        .state
        .slow
        .map_or(parent.speed, |slow| slow.original_speed);

    let mut behaviors = parent.behaviors.clone();
    behaviors.split = None;

    Enemy {
        id,
        kind: parent.kind,
        position: parent.position + offset,
        rotation: parent.rotation,
        health: max_health,
        max_health,
        speed,
        damage: parent.damage,
        reward,
        path_index: parent.path_index,
        path_progress: parent.path_progress,
        is_dead: false,
        reached_end: false,
        behaviors,
        state: BehaviorState {
            last_teleport: now,
            last_burrow: now,
            last_trail: now,
            is_mini: true,
            ..BehaviorState::default()
        },
    }
}

/// Builds a tier-1 tower on `spot`.
#[must_use]
pub fn create_tower(config: &TowerConfig, id: TowerId, spot: &TowerSpot) -> Tower {
    Tower {
        id,
        kind: config.kind,
        spot: spot.id,
        position: spot.position,
        rotation: 0.0,
        damage: config.damage,
        range: config.range,
        fire_rate: config.fire_rate,
        projectile_speed: config.projectile_speed,
        splash_radius: config.splash_radius,
        last_fire_time: None,
        target: None,
        tier: TowerTier::One,
        special_effect: None,
        total_invested: config.cost,
    }
}

/// Builds a hero standing at `position` with every ability ready.
#[must_use]
pub fn create_hero(config: &HeroConfig, id: HeroId, position: Vec3) -> Hero {
    let ability = |slot: AbilitySlot| {
        let entry = config.abilities.get(slot);
        Ability {
            name: entry.name.clone(),
            cooldown: entry.cooldown,
            current_cooldown: 0.0,
            params: entry.params,
        }
    };

    Hero {
        id,
        kind: config.kind,
        name: config.name.clone(),
        position: grounded(position),
        rotation: 0.0,
        health: config.max_health,
        max_health: config.max_health,
        speed: config.speed,
        damage: config.damage,
        attack_range: config.attack_range,
        attack_speed: config.attack_speed,
        last_attack_time: None,
        target: None,
        target_position: None,
        is_moving: false,
        abilities: AbilitySet {
            first: ability(AbilitySlot::First),
            second: ability(AbilitySlot::Second),
            ultimate: ability(AbilitySlot::Ultimate),
        },
        fortress: None,
        pending_crit: None,
    }
}

/// Builds a projectile leaving `start` toward the target's current position.
#[must_use]
pub fn create_projectile(
    id: ProjectileId,
    tower: &Tower,
    target: EnemyId,
    start: Vec3,
    aim: Vec3,
) -> Projectile {
    Projectile {
        id,
        source: tower.id,
        target,
        position: start,
        start_position: start,
        target_position: aim,
        progress: 0.0,
        distance_traveled: 0.0,
        damage: tower.damage,
        speed: tower.projectile_speed,
        splash_radius: tower.splash_radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_defence_core::{Behaviors, EnemyKind, SlowEffect};

    #[test]
    fn offspring_use_base_max_health_and_never_split() {
        let split = SplitBehavior {
            count: 2,
            health_percent: 0.4,
        };
        let mut parent = create_enemy(&blob_config(split), EnemyId::new(1), Vec3::ZERO, 0.0);
        parent.health = 0.0;
        parent.path_index = 2;
        parent.path_progress = 0.3;

        let child = create_split_offspring(&parent, &split, EnemyId::new(2), 0, 5.0);

        assert_eq!(child.max_health, 41.0);
        assert_eq!(child.health, 41.0);
        assert!(child.behaviors.split.is_none());
        assert!(child.state.is_mini);
        assert_eq!((child.path_index, child.path_progress), (2, 0.3));
        assert!((child.position - parent.position).length() > 0.4);
        assert_eq!(child.state.last_teleport, 5.0);
    }

    #[test]
    fn offspring_do_not_inherit_a_slow() {
        let split = SplitBehavior {
            count: 3,
            health_percent: 0.5,
        };
        let mut parent = create_enemy(&blob_config(split), EnemyId::new(1), Vec3::ZERO, 0.0);
        parent.state.slow = Some(SlowEffect {
            original_speed: 2.0,
            remaining: 1.0,
        });
        parent.speed = 1.0;

        let child = create_split_offspring(&parent, &split, EnemyId::new(2), 1, 0.0);
        assert_eq!(child.speed, 2.0);
        assert!(child.state.slow.is_none());
    }

    fn blob_config(split: SplitBehavior) -> EnemyConfig {
        EnemyConfig {
            kind: EnemyKind::Blobbert,
            name: "Blobbert".to_owned(),
            max_health: 101.0,
            speed: 2.0,
            damage: 1,
            reward: 10,
            behaviors: Behaviors {
                split: Some(split),
                ..Behaviors::default()
            },
        }
    }
}
