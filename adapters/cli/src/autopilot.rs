//! Scripted player that keeps a headless match busy.

use nova_defence_core::{geometry::distance_2d, AbilitySlot, Command, GamePhase, TowerKind};
use nova_defence_world::{query, World};

const CAST_ORDER: [AbilitySlot; 3] = [
    AbilitySlot::Ultimate,
    AbilitySlot::First,
    AbilitySlot::Second,
];

/// Issues the commands a simple player would: build, upgrade, fight.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    next_kind: usize,
}

impl Autopilot {
    /// Commands to submit before the next tick.
    pub(crate) fn orders(&mut self, world: &World) -> Vec<Command> {
        match world.phase() {
            GamePhase::Menu => return vec![Command::StartGame],
            GamePhase::Playing => {}
            GamePhase::Paused | GamePhase::Won | GamePhase::Lost => return Vec::new(),
        }

        let mut orders = Vec::new();
        if let Some(order) = self.build_or_upgrade(world) {
            orders.push(order);
        }
        orders.extend(hero_orders(world));
        orders
    }

    fn build_or_upgrade(&mut self, world: &World) -> Option<Command> {
        let kind = TowerKind::ALL[self.next_kind % TowerKind::ALL.len()];
        let free_spot = world.spots().iter().find(|spot| !spot.occupied);
        if let Some(spot) = free_spot {
            if !query::can_afford_tower(world, kind) {
                return None;
            }
            self.next_kind += 1;
            return Some(Command::PlaceTower {
                kind,
                spot: spot.id,
            });
        }

        world.tower_ids().into_iter().find_map(|tower| {
            query::available_upgrades(world, tower)
                .into_iter()
                .find(|option| option.affordable)
                .map(|option| Command::UpgradeTower {
                    tower,
                    tier: option.tier,
                })
        })
    }
}

fn hero_orders(world: &World) -> Vec<Command> {
    let hero = world.hero();
    let nearest = world
        .enemies()
        .filter(|enemy| !enemy.is_burrowed())
        .map(|enemy| (distance_2d(hero.position, enemy.position), enemy.position))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    let Some((distance, position)) = nearest else {
        return Vec::new();
    };

    let mut orders = Vec::new();
    if distance > hero.attack_range && !hero.is_moving && !hero.is_rooted() {
        orders.push(Command::MoveHero {
            x: position.x,
            z: position.z,
        });
    }
    if let Some(slot) = CAST_ORDER
        .into_iter()
        .find(|&slot| hero.abilities.get(slot).is_ready())
    {
        orders.push(Command::ActivateAbility { slot });
    }
    orders
}
