#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower attack system that launches projectiles from ready towers.

use log::debug;
use nova_defence_core::{geometry::angle_to_target, Event, TowerId, Vec3};
use nova_defence_system_enemy_health::is_targetable;
use nova_defence_world::World;

/// Height above the tower base where projectiles are launched.
pub const MUZZLE_HEIGHT: f32 = 1.0;

/// Tower combat system that fires at the targets chosen this tick.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<TowerId>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every tower whose target is valid and whose cooldown has elapsed.
    pub fn handle(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        let now = world.clock();
        self.scratch.clear();
        self.scratch.extend(world.tower_ids());

        for &id in &self.scratch {
            let Some(tower) = world.tower(id) else {
                continue;
            };
            let Some(target) = tower.target else {
                continue;
            };
            let Some(enemy) = world.enemy(target).filter(|enemy| is_targetable(enemy)) else {
                continue;
            };
            let Some(interval) = tower.fire_interval() else {
                continue;
            };
            if tower
                .last_fire_time
                .is_some_and(|last| now - last < interval)
            {
                continue;
            }

            let (kind, base) = (tower.kind, tower.position);
            let aim = enemy.position;
            let muzzle = base + Vec3::Y * MUZZLE_HEIGHT;
            let Some(projectile) = world.fire_projectile(id, target, muzzle, aim) else {
                continue;
            };
            if let Some(tower) = world.tower_mut(id) {
                tower.last_fire_time = Some(now);
                tower.rotation = angle_to_target(base, aim);
            }

            debug!("tower {} fired at enemy {}", id.get(), target.get());
            out_events.push(Event::TowerFired {
                tower: id,
                kind,
                projectile,
                position: muzzle,
                target,
            });
        }
    }
}
