#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that composes waves and advances the wave state machine.

use elemental_siege_core::{Command, EnemySpawn, EnemyView, Vec2, WavePhase};
use serde::{Deserialize, Serialize};

/// Parameters that shape wave composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enemies in a hypothetical wave zero.
    pub base_count: u32,
    /// Additional enemies per wave number.
    pub count_per_wave: u32,
    /// Health of an enemy in a hypothetical wave zero.
    pub base_health: f32,
    /// Additional health per wave number.
    pub health_per_wave: f32,
    /// Speed of an enemy in a hypothetical wave zero.
    pub base_speed: f32,
    /// Additional speed per wave number.
    pub speed_per_wave: f32,
    /// Gold granted by a regular enemy.
    pub reward: u32,
    /// Horizontal distance between consecutive spawns.
    pub spacing: f32,
    /// Every wave divisible by this number carries a boss; zero disables bosses.
    pub boss_interval: u32,
    /// Health multiplier applied to the boss.
    pub boss_health_multiplier: f32,
    /// Fixed boss speed.
    pub boss_speed: f32,
    /// Gold granted by the boss.
    pub boss_reward: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_count: 5,
            count_per_wave: 2,
            base_health: 20.0,
            health_per_wave: 10.0,
            base_speed: 0.6,
            speed_per_wave: 0.02,
            reward: 15,
            spacing: 40.0,
            boss_interval: 5,
            boss_health_multiplier: 8.0,
            boss_speed: 0.4,
            boss_reward: 100,
        }
    }
}

/// Pure system that spawns the next wave whenever the live enemy set empties.
#[derive(Debug, Default)]
pub struct WaveDirector {
    config: Config,
}

impl WaveDirector {
    /// Creates a new wave director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reports whether the provided wave carries a boss.
    #[must_use]
    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.config.boss_interval != 0 && wave.is_multiple_of(self.config.boss_interval)
    }

    /// Builds the enemies of a wave, lined up behind `entry` along negative x.
    ///
    /// The last enemy of a boss wave is the boss.
    #[must_use]
    pub fn compose(&self, wave: u32, entry: Vec2) -> Vec<EnemySpawn> {
        let config = &self.config;
        let count = config
            .base_count
            .saturating_add(config.count_per_wave.saturating_mul(wave));
        let health = config.base_health + config.health_per_wave * wave as f32;
        let speed = config.base_speed + config.speed_per_wave * wave as f32;
        let boss_wave = self.is_boss_wave(wave);

        (0..count)
            .map(|index| {
                let position = Vec2::new(entry.x - index as f32 * config.spacing, entry.y);
                if boss_wave && index + 1 == count {
                    EnemySpawn {
                        position,
                        health: health * config.boss_health_multiplier,
                        speed: config.boss_speed,
                        reward: config.boss_reward,
                        boss: true,
                    }
                } else {
                    EnemySpawn {
                        position,
                        health,
                        speed,
                        reward: config.reward,
                        boss: false,
                    }
                }
            })
            .collect()
    }

    /// Emits wave transitions once the live enemy set is empty.
    ///
    /// An active wave is cleared first; the next wave is spawned in the same
    /// step. Nothing happens while the run is not advancing or after game over.
    pub fn handle(
        &mut self,
        phase: WavePhase,
        running: bool,
        enemies: &EnemyView,
        entry: Vec2,
        out: &mut Vec<Command>,
    ) {
        if !running || !enemies.is_empty() {
            return;
        }

        let next_wave = match phase {
            WavePhase::Idle => 1,
            WavePhase::Active { wave } => {
                out.push(Command::ClearWave { wave });
                wave.saturating_add(1)
            }
            WavePhase::Cleared { wave } => wave.saturating_add(1),
            WavePhase::GameOver { .. } => return,
        };

        out.push(Command::SpawnWave {
            wave: next_wave,
            enemies: self.compose(next_wave, entry),
        });
    }
}
