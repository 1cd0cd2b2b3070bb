//! Kit table and the world effect behind every ability.

use std::f32::consts::TAU;

use log::debug;
use nova_defence_core::{
    geometry::{angle_to_target, distance_2d, facing_vector, grounded},
    AbilityParams, AbilitySlot, EnemyId, Event, FortressBuff, Hero, HeroKind, PendingCrit,
    SlowEffect, Vec3,
};
use nova_defence_system_enemy_health::{can_knockback, damage_enemy, is_targetable};
use nova_defence_world::{PathAdvance, World};
use rand::Rng;

use crate::{ScheduledEffect, HEAL_TICK_INTERVAL};

/// Distance covered by a blink that finds nothing to strike.
const BLINK_HOP: f32 = 3.0;

/// Effect an ability slot resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityEffect {
    /// Flat damage around the hero.
    PlasmaBurst,
    /// Instant self heal.
    EnergyShield,
    /// Large blast whose damage fades toward the rim.
    OrbitalStrike,
    /// Slows enemies around the hero.
    FrostField,
    /// Pays out for every tower near the hero.
    ProspectorPulse,
    /// Drags enemies toward the hero, then detonates.
    Singularity,
    /// Frontal cone strike with knockback.
    ShieldBash,
    /// Doubles damage and roots the hero.
    Fortress,
    /// Wide barrage whose damage barely fades with distance.
    Bombardment,
    /// Primes a crit for the next basic attack.
    ShadowMark,
    /// Teleports onto an enemy and strikes around the landing point.
    BlinkStrike,
    /// Kills weakened enemies outright.
    DeathMark,
    /// Heals the hero in pulses.
    Renewal,
    /// Short health spike that settles slightly above the starting health.
    Sanctuary,
    /// Big heal, a payout and a damaging pulse.
    Resurrection,
}

/// Effects bound to the first, second and ultimate slot of a kit.
#[must_use]
pub const fn kit(kind: HeroKind) -> [AbilityEffect; 3] {
    use AbilityEffect::*;
    match kind {
        HeroKind::Fighter => [PlasmaBurst, EnergyShield, OrbitalStrike],
        HeroKind::Mage => [FrostField, ProspectorPulse, Singularity],
        HeroKind::Tank => [ShieldBash, Fortress, Bombardment],
        HeroKind::Assassin => [ShadowMark, BlinkStrike, DeathMark],
        HeroKind::Healer => [Renewal, Sanctuary, Resurrection],
    }
}

pub(crate) fn effect_for(kind: HeroKind, slot: AbilitySlot) -> AbilityEffect {
    let [first, second, ultimate] = kit(kind);
    match slot {
        AbilitySlot::First => first,
        AbilitySlot::Second => second,
        AbilitySlot::Ultimate => ultimate,
    }
}

pub(crate) fn slot_of(kind: HeroKind, effect: AbilityEffect) -> Option<AbilitySlot> {
    AbilitySlot::ALL
        .into_iter()
        .find(|&slot| effect_for(kind, slot) == effect)
}

/// Heals without trimming health that already sits above the maximum.
pub(crate) fn heal(hero: &mut Hero, amount: f32) {
    let cap = hero.max_health.max(hero.health);
    hero.health = (hero.health + amount).min(cap);
}

pub(crate) fn detonate_singularity(
    world: &mut World,
    position: Vec3,
    radius: f32,
    damage: f32,
    out_events: &mut Vec<Event>,
) {
    for (enemy, distance) in enemies_within(world, position, radius) {
        let closeness = if radius > 0.0 {
            1.0 - distance / radius
        } else {
            1.0
        };
        let _ = damage_enemy(world, enemy, damage * (1.0 + 0.5 * closeness), false, out_events);
    }
}

impl AbilityEffect {
    pub(crate) fn resolve(
        self,
        params: &AbilityParams,
        world: &mut World,
        scheduled: &mut Vec<ScheduledEffect>,
        out_events: &mut Vec<Event>,
    ) {
        let origin = world.hero().position;
        match self {
            AbilityEffect::PlasmaBurst => {
                let radius = params.radius.unwrap_or(2.0);
                let damage = params.damage.unwrap_or(80.0);
                strike_area(world, origin, radius, out_events, |_| damage);
            }
            AbilityEffect::EnergyShield => {
                heal(world.hero_mut(), params.heal.unwrap_or(50.0));
            }
            AbilityEffect::OrbitalStrike => {
                let radius = params.radius.unwrap_or(4.0);
                let damage = params.damage.unwrap_or(200.0);
                strike_area(world, origin, radius, out_events, |distance| {
                    (damage * (1.0 - distance / (radius * 1.5))).floor()
                });
            }
            AbilityEffect::FrostField => {
                let radius = params.radius.unwrap_or(4.0);
                let slow = params.slow_percent.unwrap_or(0.5);
                let duration = params.duration.unwrap_or(3.0);
                for (id, _) in enemies_within(world, origin, radius) {
                    let Some(enemy) = world.enemy_mut(id) else {
                        continue;
                    };
                    if enemy.state.slow.is_some() {
                        continue;
                    }
                    enemy.state.slow = Some(SlowEffect {
                        original_speed: enemy.speed,
                        remaining: duration,
                    });
                    enemy.speed *= 1.0 - slow;
                }
            }
            AbilityEffect::ProspectorPulse => {
                let radius = params.radius.unwrap_or(8.0);
                let bonus = params.currency_bonus.unwrap_or(5.0).round() as u32;
                let towers = world
                    .towers()
                    .filter(|tower| distance_2d(origin, tower.position) <= radius)
                    .count() as u32;
                let payout = bonus * towers;
                if payout > 0 {
                    world.add_currency(payout);
                    world.add_score(u64::from(payout) * 10);
                }
                debug!("prospector pulse paid {payout} for {towers} towers");
            }
            AbilityEffect::Singularity => {
                let radius = params.radius.unwrap_or(5.0);
                let strength = params.pull_strength.unwrap_or(0.5);
                for (id, _) in enemies_within(world, origin, radius) {
                    let Some(enemy) = world.enemy(id).filter(|enemy| can_knockback(enemy)) else {
                        continue;
                    };
                    let pull = grounded(origin - enemy.position) * strength;
                    let along = facing_vector(world.path().segment_heading(enemy.path_index));
                    displace_along_path(world, id, pull.dot(along));
                }
                scheduled.push(ScheduledEffect::DelayedBlast {
                    position: origin,
                    radius,
                    damage: params.damage.unwrap_or(150.0),
                    remaining: params.delay.unwrap_or(1.0),
                });
            }
            AbilityEffect::ShieldBash => {
                let radius = params.radius.unwrap_or(3.0);
                let damage = params.damage.unwrap_or(60.0);
                let force = params.knockback_force.unwrap_or(4.0);
                let half_cone = params.cone_degrees.unwrap_or(120.0).to_radians() / 2.0;
                let facing = facing_vector(world.hero().rotation);
                for (id, distance) in enemies_within(world, origin, radius) {
                    let Some(enemy) = world.enemy(id) else {
                        continue;
                    };
                    let offset = grounded(enemy.position - origin);
                    if distance > f32::EPSILON
                        && facing.dot(offset / distance) < half_cone.cos() - 1e-6
                    {
                        continue;
                    }
                    let _ = damage_enemy(world, id, damage, false, out_events);
                    if world.enemy(id).is_some_and(can_knockback) {
                        displace_along_path(world, id, -(force / distance.max(1.0)));
                    }
                }
            }
            AbilityEffect::Fortress => {
                let duration = params.duration.unwrap_or(5.0);
                let hero = world.hero_mut();
                if hero.fortress.is_none() {
                    hero.fortress = Some(FortressBuff {
                        saved_damage: hero.damage,
                        saved_speed: hero.speed,
                        duration,
                    });
                    hero.damage *= 2.0;
                    hero.speed = 0.0;
                    hero.target_position = None;
                    hero.is_moving = false;
                }
            }
            AbilityEffect::Bombardment => {
                let radius = params.radius.unwrap_or(8.0);
                let damage = params.damage.unwrap_or(250.0);
                strike_area(world, origin, radius, out_events, |distance| {
                    (damage * (1.0 - 0.25 * distance / radius)).floor()
                });
            }
            AbilityEffect::ShadowMark => {
                world.hero_mut().pending_crit = Some(PendingCrit {
                    multiplier: params.crit_multiplier.unwrap_or(3.0),
                    remaining: params.duration.unwrap_or(4.0),
                });
            }
            AbilityEffect::BlinkStrike => {
                let range = params.range.unwrap_or(8.0);
                let nearest = world
                    .enemies()
                    .filter(|enemy| is_targetable(enemy))
                    .map(|enemy| (enemy.position, distance_2d(origin, enemy.position)))
                    .filter(|&(_, distance)| distance <= range)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(position, _)| grounded(position));
                let (landing, rotation) = match nearest {
                    Some(landing) => (landing, angle_to_target(origin, landing)),
                    None => {
                        let angle = world.rng_mut().gen_range(0.0..TAU);
                        (grounded(origin + facing_vector(angle) * BLINK_HOP), angle)
                    }
                };
                let hero = world.hero_mut();
                hero.position = landing;
                hero.rotation = rotation;
                hero.target_position = None;
                hero.is_moving = false;

                let radius = params.radius.unwrap_or(2.0);
                let damage = params.damage.unwrap_or(70.0);
                strike_area(world, landing, radius, out_events, |_| damage);
            }
            AbilityEffect::DeathMark => {
                let radius = params.radius.unwrap_or(6.0);
                let threshold = params.execute_threshold.unwrap_or(0.3);
                for (id, _) in enemies_within(world, origin, radius) {
                    let Some(enemy) = world.enemy(id) else {
                        continue;
                    };
                    if !is_targetable(enemy) || enemy.health_fraction() > threshold {
                        continue;
                    }
                    let remaining = enemy.health;
                    let _ = damage_enemy(world, id, remaining, true, out_events);
                }
            }
            AbilityEffect::Renewal => {
                let per_second = params.heal_per_second.unwrap_or(20.0);
                let duration = params.duration.unwrap_or(5.0);
                let ticks = (duration / HEAL_TICK_INTERVAL).floor() as u32;
                if ticks > 0 {
                    scheduled.push(ScheduledEffect::HealOverTime {
                        hero: world.hero().id,
                        per_tick: per_second * HEAL_TICK_INTERVAL,
                        until_next: HEAL_TICK_INTERVAL,
                        ticks_left: ticks,
                    });
                }
            }
            AbilityEffect::Sanctuary => {
                let duration = params.duration.unwrap_or(3.0);
                let hero = world.hero_mut();
                let settled_health = hero.max_health.min(hero.health + hero.max_health * 0.1);
                hero.health = hero.max_health * 10.0;
                scheduled.push(ScheduledEffect::Invulnerability {
                    hero: hero.id,
                    remaining: duration,
                    settled_health,
                });
            }
            AbilityEffect::Resurrection => {
                let hero = world.hero_mut();
                let amount = hero.max_health / 2.0;
                heal(hero, amount);

                let bonus = params.currency_bonus.unwrap_or(50.0).round() as u32;
                world.add_currency(bonus);
                world.add_score(u64::from(bonus) * 10);

                let radius = params.radius.unwrap_or(10.0);
                let damage = params.damage.unwrap_or(40.0);
                strike_area(world, origin, radius, out_events, |_| damage);
            }
        }
    }
}

/// Live enemies within `radius` of `center`, with their ground distance.
fn enemies_within(world: &World, center: Vec3, radius: f32) -> Vec<(EnemyId, f32)> {
    world
        .enemies()
        .filter(|enemy| !enemy.is_dead)
        .map(|enemy| (enemy.id, distance_2d(center, enemy.position)))
        .filter(|&(_, distance)| distance <= radius)
        .collect()
}

fn strike_area(
    world: &mut World,
    center: Vec3,
    radius: f32,
    out_events: &mut Vec<Event>,
    damage_at: impl Fn(f32) -> f32,
) {
    for (id, distance) in enemies_within(world, center, radius) {
        let damage = damage_at(distance);
        if damage > 0.0 {
            let _ = damage_enemy(world, id, damage, false, out_events);
        }
    }
}

/// Moves an enemy along its route; positive distances push it forward.
fn displace_along_path(world: &mut World, id: EnemyId, distance: f32) {
    let Some(enemy) = world.enemy(id) else {
        return;
    };
    let path = world.path();
    let (index, progress) = if distance >= 0.0 {
        match path.advance(enemy.path_index, enemy.path_progress, distance) {
            PathAdvance::OnPath { index, progress } => (index, progress),
            PathAdvance::ReachedEnd => (path.segment_count().saturating_sub(1), 1.0),
        }
    } else {
        path.retreat(enemy.path_index, enemy.path_progress, -distance)
    };
    let position = path.position_on_segment(index, progress);
    let rotation = path.segment_heading(index);

    if let Some(enemy) = world.enemy_mut(id) {
        enemy.path_index = index;
        enemy.path_progress = progress;
        enemy.position = position;
        enemy.rotation = rotation;
    }
}
