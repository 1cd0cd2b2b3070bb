#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy health system: the single damage entry point and kill resolution.
//!
//! Every damage source (tower projectiles, hero attacks, hero abilities)
//! goes through [`damage_enemy`]. Health reaching zero is only resolved by
//! [`EnemyHealth::handle`] on the following pass, so damage and removal are
//! separated by a tick boundary.

use log::debug;
use nova_defence_core::{geometry::facing_vector, Enemy, EnemyId, Event, Vec3};
use nova_defence_world::World;
use rand::Rng;

/// Sideways displacement applied when an enemy dodges.
pub const DODGE_OFFSET_DISTANCE: f32 = 0.8;

/// Seconds a dodge displacement lasts.
pub const DODGE_OFFSET_DURATION: f32 = 0.3;

/// Score granted per unit of kill reward.
pub const SCORE_PER_REWARD: u64 = 10;

/// Reports whether hero abilities may push the enemy along the path.
#[must_use]
pub fn can_knockback(enemy: &Enemy) -> bool {
    !enemy.behaviors.knockback_immune && !enemy.is_burrowed()
}

/// Reports whether towers, projectiles and the hero may select the enemy.
#[must_use]
pub fn is_targetable(enemy: &Enemy) -> bool {
    !enemy.is_burrowed() && !enemy.is_dead && !enemy.reached_end
}

/// Applies `amount` damage to an enemy and returns the damage dealt.
///
/// Missing, dead and burrowed enemies take nothing. Dodging enemies negate
/// every `period`-th hit outright. Armor floors the mitigated damage unless
/// `ignore_armor` is set. Health never drops below zero.
pub fn damage_enemy(
    world: &mut World,
    id: EnemyId,
    amount: f32,
    ignore_armor: bool,
    out_events: &mut Vec<Event>,
) -> f32 {
    let Some(enemy) = world.enemy_mut(id) else {
        return 0.0;
    };
    if enemy.is_dead || enemy.is_burrowed() {
        return 0.0;
    }

    let dodged = match enemy.behaviors.dodge.and_then(|dodge| dodge.period()) {
        Some(period) => {
            enemy.state.projectiles_received += 1;
            enemy.state.projectiles_received % period == 0
        }
        None => false,
    };
    if dodged {
        let side = if world.rng_mut().gen_bool(0.5) { 1.0 } else { -1.0 };
        let Some(enemy) = world.enemy_mut(id) else {
            return 0.0;
        };
        let facing = facing_vector(enemy.rotation);
        let lateral = Vec3::new(facing.z, 0.0, -facing.x);
        enemy.state.dodge_offset = lateral * DODGE_OFFSET_DISTANCE * side;
        enemy.state.dodge_offset_remaining = DODGE_OFFSET_DURATION;
        debug!("enemy {} dodged", id.get());
        out_events.push(Event::EnemyDodged {
            enemy: id,
            position: enemy.position,
        });
        return 0.0;
    }

    let mut actual = amount.max(0.0);
    if !ignore_armor {
        if let Some(armor) = enemy.behaviors.armor {
            actual = (actual * (1.0 - armor.percent)).floor();
        }
    }
    enemy.health = (enemy.health - actual).max(0.0);
    out_events.push(Event::EnemyDamaged {
        enemy: id,
        amount: actual,
        position: enemy.position,
    });
    actual
}

/// Resolves kills once per tick.
#[derive(Debug, Default)]
pub struct EnemyHealth {
    dying: Vec<EnemyId>,
}

impl EnemyHealth {
    /// Creates a health system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills every enemy whose health has reached zero.
    ///
    /// The dying set is captured before any kill is processed, so split
    /// offspring spawned during this pass are never resolved in the same
    /// tick.
    pub fn handle(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        self.dying.clear();
        self.dying.extend(
            world
                .enemies()
                .filter(|enemy| enemy.health <= 0.0 && !enemy.is_dead)
                .map(|enemy| enemy.id),
        );

        for &id in &self.dying {
            let Some(mut enemy) = world.remove_enemy(id) else {
                continue;
            };
            enemy.is_dead = true;

            world.add_currency(enemy.reward);
            world.add_score(u64::from(enemy.reward) * SCORE_PER_REWARD);
            world.decrement_enemies_remaining();
            debug!("enemy {} killed for {}", id.get(), enemy.reward);
            out_events.push(Event::EnemyDied {
                enemy: id,
                kind: enemy.kind,
                position: enemy.position,
                reward: enemy.reward,
            });

            if enemy.state.is_mini {
                continue;
            }
            if let Some(split) = enemy.behaviors.split {
                let offspring = world.spawn_split_offspring(&enemy, &split);
                out_events.push(Event::EnemySplit {
                    parent: id,
                    offspring,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_defence_core::EnemyKind;
    use nova_defence_world::testing;

    #[test]
    fn burrowed_enemies_are_untargetable_and_immovable() {
        let mut world = testing::playing_world();
        let id = testing::place_enemy(&mut world, EnemyKind::Diggory, 0, 0.5);
        let enemy = world.enemy_mut(id).expect("enemy exists");
        assert!(is_targetable(enemy));
        assert!(can_knockback(enemy));

        enemy.state.burrowed = true;
        assert!(!is_targetable(enemy));
        assert!(!can_knockback(enemy));
    }

    #[test]
    fn knockback_immunity_keeps_enemy_targetable() {
        let mut world = testing::playing_world();
        let id = testing::place_enemy(&mut world, EnemyKind::Chonkzilla, 0, 0.5);
        let enemy = world.enemy(id).expect("enemy exists");
        assert!(is_targetable(enemy));
        assert!(!can_knockback(enemy));
    }

    #[test]
    fn escaped_enemies_are_not_targetable() {
        let mut world = testing::playing_world();
        let id = testing::place_enemy(&mut world, EnemyKind::Blobbert, 0, 0.5);
        let enemy = world.enemy_mut(id).expect("enemy exists");
        enemy.reached_end = true;
        assert!(!is_targetable(enemy));
    }
}
