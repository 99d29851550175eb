#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides which enemies an arriving projectile hits.

use elemental_siege_core::{
    Command, ElementTable, EnemyId, EnemyView, ProjectileArrival, ProjectileView, Vec2,
};

/// Impact system that turns projectile arrivals into `Command::ResolveImpact`.
#[derive(Debug, Default)]
pub struct Impact {
    hits: Vec<EnemyId>,
}

impl Impact {
    /// Creates a new impact system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one `Command::ResolveImpact` per arrival.
    ///
    /// Elements with a splash radius hit every live enemy within that radius
    /// of the projectile's arrival position, inclusive. Other elements hit
    /// only the intended target. The world discards the projectile without
    /// effect if the target died before the command is applied.
    pub fn handle(
        &mut self,
        arrivals: &[ProjectileArrival],
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        elements: &ElementTable,
        out: &mut Vec<Command>,
    ) {
        for arrival in arrivals {
            let Some(projectile) = projectiles.get(arrival.projectile) else {
                continue;
            };

            self.hits.clear();
            match elements.stats(projectile.element).splash_radius {
                Some(radius) => self.collect_splash(enemies, arrival.position, radius),
                None => {
                    if enemies.get(arrival.target).is_some() {
                        self.hits.push(arrival.target);
                    }
                }
            }

            out.push(Command::ResolveImpact {
                projectile: arrival.projectile,
                hits: self.hits.clone(),
            });
        }
    }

    fn collect_splash(&mut self, enemies: &EnemyView, center: Vec2, radius: f32) {
        self.hits.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.position.distance(center) <= radius)
                .map(|enemy| enemy.id),
        );
    }
}
