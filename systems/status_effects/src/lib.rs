#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decays enemy status effects and derives their per-tick consequences.

use std::time::Duration;

use elemental_siege_core::{
    tick_fraction, Command, EnemySnapshot, EnemyView, Event, MovementModifier, StatusEffect,
    StatusKind,
};

/// Status effect processor that reuses a scratch buffer between enemies.
#[derive(Debug, Default)]
pub struct StatusEffects {
    survivors: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates a new status effect processor with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::UpdateStatus` for enemies carrying effects and fills
    /// `modifiers` with one entry per live enemy, in identifier order.
    ///
    /// Burn damage and slow magnitudes only count for effects that survive
    /// the decay of this tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        out: &mut Vec<Command>,
        modifiers: &mut Vec<MovementModifier>,
    ) {
        modifiers.clear();

        let dt = elapsed(events);
        if dt.is_zero() {
            return;
        }

        modifiers.reserve(enemies.len());
        for enemy in enemies.iter() {
            if enemy.effects.is_empty() {
                modifiers.push(MovementModifier::unaffected(enemy.id));
                continue;
            }
            let (modifier, burn_damage) = self.process(enemy, dt);
            modifiers.push(modifier);
            out.push(Command::UpdateStatus {
                enemy: enemy.id,
                effects: self.survivors.clone(),
                burn_damage,
            });
        }
    }

    fn process(&mut self, enemy: &EnemySnapshot, dt: Duration) -> (MovementModifier, f32) {
        self.survivors.clear();
        let ticks = tick_fraction(dt);
        let mut modifier = MovementModifier::unaffected(enemy.id);
        let mut burn_damage = 0.0;

        for effect in &enemy.effects {
            let Some(effect) = effect.decayed(dt) else {
                continue;
            };
            match effect.kind() {
                StatusKind::Burn => burn_damage += effect.burn_per_tick() * ticks,
                StatusKind::Slow => {
                    modifier.speed_multiplier = modifier.speed_multiplier.min(effect.slow_factor());
                }
                StatusKind::Stun => modifier.stunned = true,
                StatusKind::Unrecognized => {}
            }
            self.survivors.push(effect);
        }

        (modifier, burn_damage)
    }
}

fn elapsed(events: &[Event]) -> Duration {
    let mut total = Duration::ZERO;
    for event in events {
        if let Event::TimeAdvanced { dt } = event {
            total = total.saturating_add(*dt);
        }
    }
    total
}
