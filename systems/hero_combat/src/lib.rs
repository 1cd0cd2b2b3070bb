#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hero basic attack system.
//!
//! The hero only swings while standing still. Each swing strikes the nearest
//! targetable enemy inside the attack range and consumes a primed crit if
//! one is waiting.

use log::debug;
use nova_defence_core::{
    geometry::{angle_to_target, distance_2d},
    EnemyId, Event, Vec3,
};
use nova_defence_system_enemy_health::{damage_enemy, is_targetable};
use nova_defence_world::World;

/// Hero combat system.
#[derive(Debug, Default)]
pub struct HeroCombat;

impl HeroCombat {
    /// Creates the hero combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolves at most one basic attack.
    pub fn handle(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        let now = world.clock();
        let hero = world.hero();
        if hero.is_moving {
            return;
        }

        let origin = hero.position;
        let range = hero.attack_range;
        let Some((target, aim)) = nearest_target(world, origin, range) else {
            world.hero_mut().target = None;
            return;
        };

        let hero = world.hero();
        if hero.attack_speed <= 0.0 {
            return;
        }
        let cooldown = 1.0 / hero.attack_speed;
        if hero
            .last_attack_time
            .is_some_and(|last| now - last < cooldown)
        {
            return;
        }

        let hero = world.hero_mut();
        let crit = hero.consume_crit();
        let damage = hero.damage * crit.unwrap_or(1.0);
        hero.last_attack_time = Some(now);
        hero.rotation = angle_to_target(origin, aim);
        hero.target = Some(target);
        let hero_id = hero.id;

        let dealt = damage_enemy(world, target, damage, false, out_events);
        debug!(
            "hero {} struck enemy {} for {dealt}",
            hero_id.get(),
            target.get()
        );
        out_events.push(Event::HeroAttacked {
            hero: hero_id,
            target,
            damage: dealt,
            critical: crit.is_some(),
        });
    }
}

fn nearest_target(world: &World, origin: Vec3, range: f32) -> Option<(EnemyId, Vec3)> {
    world
        .enemies()
        .filter(|enemy| is_targetable(enemy))
        .map(|enemy| (enemy.id, enemy.position, distance_2d(origin, enemy.position)))
        .filter(|&(_, _, distance)| distance <= range)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(id, position, _)| (id, position))
}
