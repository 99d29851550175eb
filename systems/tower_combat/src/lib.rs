#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use std::time::Duration;

use elemental_siege_core::{
    Command, TimeScale, TowerCooldownSnapshot, TowerCooldownView, TowerId, TowerTarget,
};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire.
    ///
    /// `now` is the unscaled world clock. A tower is ready once the time since
    /// its last shot reaches its fire interval divided by the time scale.
    /// Towers without a target keep their cooldown untouched.
    pub fn handle(
        &mut self,
        now: Duration,
        time_scale: TimeScale,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        let cooldowns = tower_cooldowns.into_vec();
        if cooldowns.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            if let Some(snapshot) = find_cooldown(&cooldowns, target.tower) {
                if is_ready(snapshot, now, time_scale) {
                    self.scratch.push(Command::FireProjectile {
                        tower: target.tower,
                        target: target.enemy,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn is_ready(snapshot: &TowerCooldownSnapshot, now: Duration, time_scale: TimeScale) -> bool {
    let Some(last_fired) = snapshot.last_fired else {
        return true;
    };
    let effective_cooldown = snapshot.fire_interval / time_scale.factor();
    now.saturating_sub(last_fired) >= effective_cooldown
}

fn find_cooldown(
    cooldowns: &[TowerCooldownSnapshot],
    tower: TowerId,
) -> Option<&TowerCooldownSnapshot> {
    cooldowns
        .binary_search_by_key(&tower, |snapshot| snapshot.tower)
        .ok()
        .map(|index| &cooldowns[index])
}
