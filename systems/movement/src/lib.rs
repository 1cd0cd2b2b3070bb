#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy movement system that walks enemies along the path and drives their
//! teleport, burrow and trail behaviors.

use log::debug;
use nova_defence_core::{Enemy, EnemyId, Event, Vec3};
use nova_defence_world::{PathAdvance, PathModel, World};

/// Progress within the landing segment after a teleport.
pub const TELEPORT_LANDING_PROGRESS: f32 = 0.1;

/// Advances every live enemy once per tick.
#[derive(Debug, Default)]
pub struct EnemyMovement {
    scratch: Vec<EnemyId>,
}

impl EnemyMovement {
    /// Creates a movement system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies behaviors, then path movement, to every enemy.
    ///
    /// Enemies that walk off the end of the path are removed, cost the player
    /// their `damage` in lives and count against the running wave.
    pub fn handle(&mut self, world: &mut World, dt: f32, out_events: &mut Vec<Event>) {
        let now = world.clock();
        let path = world.path().clone();

        self.scratch.clear();
        self.scratch.extend(world.enemy_ids());

        for &id in &self.scratch {
            let Some(enemy) = world.enemy_mut(id) else {
                continue;
            };
            if enemy.is_dead || enemy.reached_end {
                continue;
            }

            apply_behaviors(enemy, &path, now, dt, out_events);
            if enemy.is_burrowed() {
                continue;
            }

            match path.advance(enemy.path_index, enemy.path_progress, enemy.speed * dt) {
                PathAdvance::OnPath { index, progress } => {
                    enemy.path_index = index;
                    enemy.path_progress = progress;
                    enemy.position = path.position_on_segment(index, progress);
                    enemy.rotation = path.segment_heading(index);
                    apply_dodge_offset(enemy, dt);
                }
                PathAdvance::ReachedEnd => {
                    enemy.reached_end = true;
                    let (kind, damage) = (enemy.kind, enemy.damage);
                    let _ = world.remove_enemy(id);
                    world.decrement_enemies_remaining();
                    debug!("enemy {} reached the end", id.get());
                    out_events.push(Event::EnemyReachedEnd {
                        enemy: id,
                        kind,
                        damage,
                    });
                    world.lose_lives(damage, out_events);
                }
            }
        }
    }
}

fn apply_behaviors(
    enemy: &mut Enemy,
    path: &PathModel,
    now: f32,
    dt: f32,
    out_events: &mut Vec<Event>,
) {
    enemy.state.animation_phase += dt;
    let last_segment = path.segment_count().saturating_sub(1);

    if let Some(teleport) = enemy.behaviors.teleport {
        if now - enemy.state.last_teleport >= teleport.interval {
            enemy.state.last_teleport = now;
            let from = enemy.path_index;
            let to = (from + teleport.segments).min(last_segment);
            enemy.path_index = to;
            enemy.path_progress = TELEPORT_LANDING_PROGRESS;
            debug!("enemy {} teleported {from} -> {to}", enemy.id.get());
            out_events.push(Event::EnemyTeleported {
                enemy: enemy.id,
                from_segment: from,
                to_segment: to,
            });
        }
    }

    if let Some(burrow) = enemy.behaviors.burrow {
        if enemy.state.burrowed {
            if now >= enemy.state.burrow_ends_at {
                enemy.state.burrowed = false;
                enemy.state.last_burrow = now;
                enemy.path_index = (enemy.path_index + burrow.segments).min(last_segment);
                enemy.position = path.position_on_segment(enemy.path_index, enemy.path_progress);
                out_events.push(Event::EnemySurfaced {
                    enemy: enemy.id,
                    position: enemy.position,
                });
            }
        } else if now - enemy.state.last_burrow >= burrow.interval {
            enemy.state.burrowed = true;
            enemy.state.last_burrow = now;
            enemy.state.burrow_ends_at = now + burrow.duration;
            debug!("enemy {} burrowed", enemy.id.get());
            out_events.push(Event::EnemyBurrowed {
                enemy: enemy.id,
                position: enemy.position,
            });
        }
    }

    if let Some(trail) = enemy.behaviors.trail {
        if now - enemy.state.last_trail >= trail.interval {
            enemy.state.last_trail = now;
            out_events.push(Event::TrailMarked {
                enemy: enemy.id,
                position: enemy.position,
            });
        }
    }
}

fn apply_dodge_offset(enemy: &mut Enemy, dt: f32) {
    if enemy.state.dodge_offset_remaining <= 0.0 {
        return;
    }
    enemy.position += enemy.state.dodge_offset;
    enemy.state.dodge_offset_remaining -= dt;
    if enemy.state.dodge_offset_remaining <= 0.0 {
        enemy.state.dodge_offset_remaining = 0.0;
        enemy.state.dodge_offset = Vec3::ZERO;
    }
}
