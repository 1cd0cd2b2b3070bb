#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower targeting system that keeps each tower locked on the most advanced
//! enemy in range.

use log::trace;
use nova_defence_core::{geometry::distance_2d, EnemyId, TowerId, Vec3};
use nova_defence_system_enemy_health::is_targetable;
use nova_defence_world::World;

/// Tower targeting system that reuses scratch buffers between ticks.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerId>,
    candidates: Vec<Candidate>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: EnemyId,
    position: Vec3,
    progress: f32,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-validates held targets and acquires new ones.
    ///
    /// A held target is kept while it stays targetable and in range.
    /// Otherwise the tower picks the in-range enemy with the greatest
    /// `path_index + path_progress`; exact ties keep the first enemy found.
    pub fn handle(&mut self, world: &mut World) {
        self.prepare_candidates(world);
        self.tower_workspace.clear();
        self.tower_workspace.extend(world.tower_ids());

        for &id in &self.tower_workspace {
            let Some(tower) = world.tower_mut(id) else {
                continue;
            };
            let (origin, range) = (tower.position, tower.range);

            let held = tower.target.filter(|target| {
                self.candidates.iter().any(|candidate| {
                    candidate.id == *target && distance_2d(origin, candidate.position) <= range
                })
            });
            if held.is_some() {
                continue;
            }

            let mut best: Option<Candidate> = None;
            for candidate in &self.candidates {
                if distance_2d(origin, candidate.position) > range {
                    continue;
                }
                if best.map_or(true, |current| candidate.progress > current.progress) {
                    best = Some(*candidate);
                }
            }

            tower.target = best.map(|candidate| candidate.id);
            if let Some(target) = tower.target {
                trace!("tower {} acquired enemy {}", id.get(), target.get());
            }
        }
    }

    fn prepare_candidates(&mut self, world: &World) {
        self.candidates.clear();
        self.candidates.extend(
            world
                .enemies()
                .filter(|enemy| is_targetable(enemy))
                .map(|enemy| Candidate {
                    id: enemy.id,
                    position: enemy.position,
                    progress: enemy.total_progress(),
                }),
        );
    }
}
