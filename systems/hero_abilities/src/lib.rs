#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hero ability system.
//!
//! Activation requests arrive as [`Command::ActivateAbility`]. Only the most
//! recent request of a tick is kept and it resolves after every timer has
//! advanced; a request for an ability that is still cooling down is dropped.
//! Effects that outlive the cast (heal-over-time, delayed blasts and
//! invulnerability windows) are tracked by the system itself so the world
//! stays free of kit-specific bookkeeping.

mod kits;

pub use kits::{kit, AbilityEffect};

use log::debug;
use nova_defence_core::{AbilitySlot, Command, Event, HeroId, Vec3};
use nova_defence_world::World;

/// Seconds between two heal-over-time pulses.
pub const HEAL_TICK_INTERVAL: f32 = 0.5;

/// Ability effect that resolves after the cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScheduledEffect {
    /// Periodic healing of the casting hero.
    HealOverTime {
        /// Hero receiving the healing.
        hero: HeroId,
        /// Health restored per pulse.
        per_tick: f32,
        /// Seconds until the next pulse.
        until_next: f32,
        /// Pulses left to apply.
        ticks_left: u32,
    },
    /// Area detonation that follows a singularity.
    DelayedBlast {
        /// Centre of the detonation.
        position: Vec3,
        /// Detonation radius.
        radius: f32,
        /// Damage at the rim; the centre deals half as much again.
        damage: f32,
        /// Seconds until detonation.
        remaining: f32,
    },
    /// Temporary health spike that settles when it expires.
    Invulnerability {
        /// Hero holding the spike.
        hero: HeroId,
        /// Seconds until the spike ends.
        remaining: f32,
        /// Health the hero is left with afterwards.
        settled_health: f32,
    },
}

impl ScheduledEffect {
    fn owner(&self) -> Option<HeroId> {
        match *self {
            ScheduledEffect::HealOverTime { hero, .. }
            | ScheduledEffect::Invulnerability { hero, .. } => Some(hero),
            ScheduledEffect::DelayedBlast { .. } => None,
        }
    }
}

/// Hero ability system.
#[derive(Debug, Default)]
pub struct HeroAbilities {
    pending: Option<AbilitySlot>,
    scheduled: Vec<ScheduledEffect>,
}

impl HeroAbilities {
    /// Creates an ability system with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects still waiting to resolve.
    #[must_use]
    pub fn scheduled(&self) -> &[ScheduledEffect] {
        &self.scheduled
    }

    /// Advances ability timers by `dt` and resolves the pending activation.
    pub fn handle(
        &mut self,
        commands: &[Command],
        world: &mut World,
        dt: f32,
        out_events: &mut Vec<Event>,
    ) {
        for command in commands {
            if let Command::ActivateAbility { slot } = command {
                self.pending = Some(*slot);
            }
        }

        tick_hero_timers(world, dt);
        tick_slows(world, dt);
        self.tick_scheduled(world, dt, out_events);

        if let Some(slot) = self.pending.take() {
            self.cast(world, slot, out_events);
        }
    }

    fn cast(&mut self, world: &mut World, slot: AbilitySlot, out_events: &mut Vec<Event>) {
        let hero = world.hero();
        let ability = hero.abilities.get(slot);
        if !ability.is_ready() {
            debug!(
                "{} is cooling down for {:.2}s",
                ability.name, ability.current_cooldown
            );
            return;
        }
        let kind = hero.kind;
        let params = ability.params;
        let effect = kits::effect_for(kind, slot);

        effect.resolve(&params, world, &mut self.scheduled, out_events);

        let hero = world.hero_mut();
        let ability = hero.abilities.get_mut(slot);
        ability.current_cooldown = ability.cooldown;
        debug!("hero {} cast {}", hero.id.get(), ability.name);
        out_events.push(Event::AbilityCast {
            hero: hero.id,
            kind,
            slot,
            position: hero.position,
            ultimate: slot.is_ultimate(),
        });
    }

    fn tick_scheduled(&mut self, world: &mut World, dt: f32, out_events: &mut Vec<Event>) {
        let current = world.hero().id;
        for effect in std::mem::take(&mut self.scheduled) {
            if effect.owner().is_some_and(|owner| owner != current) {
                continue;
            }
            if let Some(next) = advance(effect, world, dt, out_events) {
                self.scheduled.push(next);
            }
        }
    }
}

fn tick_hero_timers(world: &mut World, dt: f32) {
    let hero = world.hero_mut();
    for ability in hero.abilities.iter_mut() {
        ability.current_cooldown = (ability.current_cooldown - dt).max(0.0);
    }

    if let Some(crit) = hero.pending_crit.as_mut() {
        crit.remaining -= dt;
        if crit.remaining <= 0.0 {
            hero.pending_crit = None;
        }
    }

    if let Some(buff) = hero.fortress {
        let expired = kits::slot_of(hero.kind, AbilityEffect::Fortress)
            .map(|slot| hero.abilities.get(slot))
            .map_or(true, |ability| {
                ability.elapsed_since_cast() >= buff.duration.min(ability.cooldown)
            });
        if expired {
            hero.damage = buff.saved_damage;
            hero.speed = buff.saved_speed;
            hero.fortress = None;
            debug!("hero {} left the fortress stance", hero.id.get());
        }
    }
}

fn tick_slows(world: &mut World, dt: f32) {
    for enemy in world.enemies_mut() {
        let Some(slow) = enemy.state.slow.as_mut() else {
            continue;
        };
        slow.remaining -= dt;
        if slow.remaining <= 0.0 {
            enemy.speed = slow.original_speed;
            enemy.state.slow = None;
        }
    }
}

fn advance(
    effect: ScheduledEffect,
    world: &mut World,
    dt: f32,
    out_events: &mut Vec<Event>,
) -> Option<ScheduledEffect> {
    match effect {
        ScheduledEffect::HealOverTime {
            hero,
            per_tick,
            mut until_next,
            mut ticks_left,
        } => {
            until_next -= dt;
            while until_next <= 0.0 && ticks_left > 0 {
                kits::heal(world.hero_mut(), per_tick);
                ticks_left -= 1;
                until_next += HEAL_TICK_INTERVAL;
            }
            (ticks_left > 0).then_some(ScheduledEffect::HealOverTime {
                hero,
                per_tick,
                until_next,
                ticks_left,
            })
        }
        ScheduledEffect::DelayedBlast {
            position,
            radius,
            damage,
            remaining,
        } => {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                return Some(ScheduledEffect::DelayedBlast {
                    position,
                    radius,
                    damage,
                    remaining,
                });
            }
            kits::detonate_singularity(world, position, radius, damage, out_events);
            None
        }
        ScheduledEffect::Invulnerability {
            hero,
            remaining,
            settled_health,
        } => {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                return Some(ScheduledEffect::Invulnerability {
                    hero,
                    remaining,
                    settled_health,
                });
            }
            world.hero_mut().health = settled_health;
            None
        }
    }
}
