#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile system: homing flight, impact detection and damage delivery.

use log::debug;
use nova_defence_core::{
    geometry::{distance_2d, distance_3d, lerp_vec3},
    EnemyId, Event, Projectile, ProjectileId, SpecialEffect,
};
use nova_defence_system_enemy_health::damage_enemy;
use nova_defence_world::World;

/// Ground-plane distance at which a projectile connects with its target.
pub const HIT_RADIUS: f32 = 0.5;

/// Moves projectiles and resolves their impacts.
#[derive(Debug, Default)]
pub struct Projectiles {
    scratch: Vec<ProjectileId>,
    splash_targets: Vec<(EnemyId, f32)>,
}

impl Projectiles {
    /// Creates a projectile system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every projectile by `dt` seconds.
    ///
    /// While its target is alive a projectile re-aims at the target's live
    /// position each tick; afterwards it flies on to the last known aim point.
    pub fn handle(&mut self, world: &mut World, dt: f32, out_events: &mut Vec<Event>) {
        self.scratch.clear();
        self.scratch.extend(world.projectile_ids());

        for index in 0..self.scratch.len() {
            let id = self.scratch[index];
            let Some(target) = world.projectile(id).map(|projectile| projectile.target) else {
                continue;
            };
            let live_target = world
                .enemy(target)
                .filter(|enemy| !enemy.is_dead)
                .map(|enemy| enemy.position);

            let Some(projectile) = world.projectile_mut(id) else {
                continue;
            };
            if let Some(position) = live_target {
                projectile.target_position = position;
            }
            projectile.distance_traveled += projectile.speed * dt;
            let total = distance_3d(projectile.start_position, projectile.target_position);
            projectile.progress = if total > 0.0 {
                (projectile.distance_traveled / total).min(1.0)
            } else {
                1.0
            };
            projectile.position = lerp_vec3(
                projectile.start_position,
                projectile.target_position,
                projectile.progress,
            );

            let connected = live_target
                .is_some_and(|position| distance_2d(projectile.position, position) < HIT_RADIUS);
            if !connected && projectile.progress < 1.0 {
                continue;
            }

            if let Some(projectile) = world.remove_projectile(id) {
                self.impact(world, &projectile, live_target.is_some(), out_events);
            }
        }
    }

    fn impact(
        &mut self,
        world: &mut World,
        projectile: &Projectile,
        target_alive: bool,
        out_events: &mut Vec<Event>,
    ) {
        let ignore_armor = world
            .tower(projectile.source)
            .and_then(|tower| tower.special_effect)
            == Some(SpecialEffect::ArmorPiercing);

        match projectile.splash_radius {
            Some(radius) => {
                self.splash_targets.clear();
                self.splash_targets.extend(
                    world
                        .enemies()
                        .filter(|enemy| !enemy.is_dead)
                        .map(|enemy| (enemy.id, distance_2d(projectile.position, enemy.position)))
                        .filter(|&(_, distance)| distance <= radius),
                );
                for &(enemy, distance) in &self.splash_targets {
                    let falloff = if radius > 0.0 {
                        1.0 - distance / radius
                    } else {
                        1.0
                    };
                    let damage = (projectile.damage * falloff).floor();
                    if damage > 0.0 {
                        let _ = damage_enemy(world, enemy, damage, ignore_armor, out_events);
                    }
                }
                out_events.push(Event::ProjectileImpact {
                    projectile: projectile.id,
                    position: projectile.position,
                    splash: true,
                });
            }
            None if target_alive => {
                let _ = damage_enemy(
                    world,
                    projectile.target,
                    projectile.damage,
                    ignore_armor,
                    out_events,
                );
                out_events.push(Event::ProjectileImpact {
                    projectile: projectile.id,
                    position: projectile.position,
                    splash: false,
                });
            }
            None => debug!("projectile {} expired without a target", projectile.id.get()),
        }
    }
}
