#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Walks the hero toward its move order.

use log::trace;
use nova_defence_core::geometry::{angle_to_target, distance_2d, grounded, normalize};
use nova_defence_world::World;

/// Ground distance under which the hero snaps onto its destination.
pub const ARRIVAL_EPSILON: f32 = 0.1;

/// Hero movement system.
#[derive(Debug, Default)]
pub struct HeroMovement;

impl HeroMovement {
    /// Creates the hero movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Steps the hero toward its destination without overshooting it.
    pub fn handle(&mut self, world: &mut World, dt: f32) {
        let hero = world.hero_mut();
        if !hero.is_moving {
            return;
        }
        let Some(destination) = hero.target_position else {
            hero.is_moving = false;
            return;
        };

        let distance = distance_2d(hero.position, destination);
        if distance < ARRIVAL_EPSILON {
            hero.position = grounded(destination);
            hero.target_position = None;
            hero.is_moving = false;
            trace!("hero {} arrived", hero.id.get());
            return;
        }

        hero.rotation = angle_to_target(hero.position, destination);
        let heading = normalize(grounded(destination - hero.position));
        let step = (hero.speed * dt).min(distance);
        hero.position = grounded(hero.position + heading * step);
    }
}
