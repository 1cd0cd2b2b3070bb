#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that turns the configured wave schedule into timed spawns.
//!
//! The director is a small state machine. Between waves it waits for a
//! manual start command or an optional countdown. While spawning it drains a
//! flattened queue whose delays are measured from the previous spawn. Once
//! the queue is empty it waits for the field to clear, pays the completion
//! bonus and re-arms for the next wave.

use std::collections::VecDeque;

use log::{error, info};
use nova_defence_core::{Command, EnemyKind, Event};
use nova_defence_world::World;

/// Observable state of the wave director.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WavePhase {
    /// No wave is running.
    BetweenWaves {
        /// Seconds until the next wave starts on its own, if auto start is armed.
        countdown: Option<f32>,
    },
    /// Enemies of the current wave are still queued.
    Spawning,
    /// Every enemy of the current wave has spawned; waiting for the field to clear.
    WaitingForClear,
    /// Every configured wave has been cleared.
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct QueuedSpawn {
    kind: EnemyKind,
    delay: f32,
}

/// Drives wave starts, spawn timing and wave completion.
#[derive(Debug)]
pub struct WaveDirector {
    phase: WavePhase,
    queue: VecDeque<QueuedSpawn>,
    timer: f32,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            phase: WavePhase::BetweenWaves { countdown: None },
            queue: VecDeque::new(),
            timer: 0.0,
        }
    }
}

impl WaveDirector {
    /// Creates an idle director; call [`WaveDirector::initialize`] before use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the wave schedule into the world and arms the first wave.
    pub fn initialize(&mut self, world: &mut World) {
        let total = u32::try_from(world.config().waves.len()).unwrap_or(u32::MAX);
        world.set_total_waves(total);
        self.queue.clear();
        self.timer = 0.0;
        self.phase = if total == 0 {
            WavePhase::Complete
        } else {
            WavePhase::BetweenWaves {
                countdown: world.config().wave_schedule.first_wave_delay,
            }
        };
    }

    /// Current director state.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    /// Number of enemies still queued for the running wave.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Consumes start commands, then advances the director by `dt` seconds.
    pub fn handle(
        &mut self,
        commands: &[Command],
        world: &mut World,
        dt: f32,
        out_events: &mut Vec<Event>,
    ) {
        if commands
            .iter()
            .any(|command| matches!(command, Command::StartNextWave))
        {
            let _ = self.start_next_wave(world, out_events);
        }
        self.update(world, dt, out_events);
    }

    /// Starts the next configured wave.
    ///
    /// Returns `false` without touching anything when a wave is already
    /// running or every wave has been played.
    pub fn start_next_wave(&mut self, world: &mut World, out_events: &mut Vec<Event>) -> bool {
        let status = world.wave_status();
        if status.wave_in_progress || status.current_wave >= status.total_waves {
            return false;
        }
        let Some(wave) = world.config().waves.get(status.current_wave as usize) else {
            return false;
        };

        self.queue = wave
            .enemies
            .iter()
            .flat_map(|group| {
                (0..group.count).map(move |member| QueuedSpawn {
                    kind: group.kind,
                    delay: if member == 0 { 0.0 } else { group.spawn_delay },
                })
            })
            .collect();
        self.timer = 0.0;
        self.phase = WavePhase::Spawning;

        let enemies = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        let number = status.current_wave + 1;
        world.begin_wave(enemies);
        info!("wave {number} started with {enemies} enemies");
        out_events.push(Event::WaveStarted {
            wave: number,
            enemies,
        });
        true
    }

    /// Advances countdowns, spawns due enemies and detects wave clears.
    pub fn update(&mut self, world: &mut World, dt: f32, out_events: &mut Vec<Event>) {
        match self.phase {
            WavePhase::BetweenWaves {
                countdown: Some(remaining),
            } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = WavePhase::BetweenWaves {
                        countdown: Some(remaining),
                    };
                    return;
                }
                self.phase = WavePhase::BetweenWaves { countdown: None };
                if !self.start_next_wave(world, out_events) {
                    return;
                }
                self.spawn_due(world, 0.0, out_events);
            }
            WavePhase::Spawning => self.spawn_due(world, dt, out_events),
            WavePhase::WaitingForClear => self.finish_if_clear(world, out_events),
            WavePhase::BetweenWaves { countdown: None } | WavePhase::Complete => {}
        }
    }

    fn spawn_due(&mut self, world: &mut World, dt: f32, out_events: &mut Vec<Event>) {
        self.timer += dt;
        while let Some(head) = self.queue.front().copied() {
            if self.timer < head.delay {
                break;
            }
            let _ = self.queue.pop_front();
            self.timer = 0.0;
            spawn(world, head.kind, out_events);
        }

        if self.queue.is_empty() {
            self.phase = WavePhase::WaitingForClear;
        }
    }

    fn finish_if_clear(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        if !self.queue.is_empty() || world.enemy_count() > 0 {
            return;
        }

        let number = world.wave_status().current_wave + 1;
        let delay_between_waves = world
            .config()
            .waves
            .get(number as usize - 1)
            .map_or(0.0, |wave| wave.delay_between_waves);
        world.complete_wave();
        let bonus = world.config().economy.wave_bonus(number);
        world.add_currency(bonus);
        info!("wave {number} cleared, bonus {bonus}");
        out_events.push(Event::WaveCompleted {
            wave: number,
            bonus,
        });

        let status = world.wave_status();
        if status.current_wave >= status.total_waves {
            self.phase = WavePhase::Complete;
            info!("all {} waves cleared", status.total_waves);
            out_events.push(Event::AllWavesCompleted);
            return;
        }

        let countdown = world
            .config()
            .wave_schedule
            .auto_advance
            .then_some(delay_between_waves);
        self.phase = WavePhase::BetweenWaves { countdown };
    }
}

fn spawn(world: &mut World, kind: EnemyKind, out_events: &mut Vec<Event>) {
    let position = world.config().map.spawn_point;
    match world.spawn_enemy(kind, position) {
        Ok(enemy) => out_events.push(Event::EnemySpawned {
            enemy,
            kind,
            position,
        }),
        Err(error) => {
            error!("could not spawn {kind:?}: {error}");
            world.decrement_enemies_remaining();
        }
    }
}
