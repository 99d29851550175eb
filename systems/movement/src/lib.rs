#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along the path and flies
//! projectiles toward their targets.

use std::time::Duration;

use elemental_siege_core::{
    step_toward, tick_fraction, Command, EnemyView, Event, MovementModifier, Path,
    ProjectileArrival, ProjectileView, Step,
};

/// Pure system that reacts to elapsed time and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    elapsed: Duration,
}

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the simulated time covered by the current step.
    ///
    /// Must be called before the `advance_*` methods; without elapsed time
    /// nothing moves.
    pub fn observe(&mut self, events: &[Event]) {
        self.elapsed = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.elapsed = self.elapsed.saturating_add(*dt);
            }
        }
    }

    /// Moves every non-stunned enemy toward the waypoint after its path index.
    ///
    /// Enemies without a next waypoint are released through the exit. An enemy
    /// that would reach its waypoint within this step snaps onto it and loses
    /// the remaining movement budget. `modifiers` must be sorted by enemy.
    pub fn advance_enemies(
        &self,
        enemies: &EnemyView,
        modifiers: &[MovementModifier],
        path: &Path,
        out: &mut Vec<Command>,
    ) {
        if self.elapsed.is_zero() {
            return;
        }
        let ticks = tick_fraction(self.elapsed);

        for enemy in enemies.iter() {
            let modifier = modifiers
                .binary_search_by_key(&enemy.id, |modifier| modifier.enemy)
                .ok()
                .map_or(MovementModifier::unaffected(enemy.id), |index| {
                    modifiers[index]
                });
            if modifier.stunned {
                continue;
            }

            let Some(waypoint) = path.waypoint(enemy.path_index + 1) else {
                out.push(Command::ReleaseEnemy { enemy: enemy.id });
                continue;
            };

            let distance = enemy.speed * enemy.slow_factor * modifier.speed_multiplier * ticks;
            let (position, path_index) = match step_toward(enemy.position, waypoint, distance) {
                Step::Arrived(position) => (position, enemy.path_index + 1),
                Step::Advanced(position) => (position, enemy.path_index),
            };
            out.push(Command::MoveEnemy {
                enemy: enemy.id,
                position,
                path_index,
            });
        }
    }

    /// Homes every projectile onto the current position of its target.
    ///
    /// Projectiles whose target is gone are discarded. Projectiles close
    /// enough to arrive this step stay where they are and are reported in
    /// `arrivals` for impact resolution.
    pub fn advance_projectiles(
        &self,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
        arrivals: &mut Vec<ProjectileArrival>,
    ) {
        arrivals.clear();
        if self.elapsed.is_zero() {
            return;
        }
        let ticks = tick_fraction(self.elapsed);

        for projectile in projectiles.iter() {
            let Some(target) = enemies.get(projectile.target) else {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            let distance = projectile.speed * ticks;
            match step_toward(projectile.position, target.position, distance) {
                Step::Arrived(_) => arrivals.push(ProjectileArrival {
                    projectile: projectile.id,
                    target: target.id,
                    position: projectile.position,
                }),
                Step::Advanced(position) => out.push(Command::MoveProjectile {
                    projectile: projectile.id,
                    position,
                }),
            }
        }
    }
}
