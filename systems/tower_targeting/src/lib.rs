#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use elemental_siege_core::{EnemyId, EnemyView, TowerTarget, TowerView, Vec2};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower picks the nearest enemy strictly inside its range; equal
    /// distances resolve to the smaller enemy identifier. The output buffer is
    /// cleared before populating it with the latest assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter() {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let distance = tower.position.distance(candidate.position);
                if distance >= tower.stats.range {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    enemy: candidate.id,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    distance: best_candidate.distance,
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());
        self.enemy_workspace
            .extend(enemies.iter().map(|snapshot| EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            }));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    enemy: EnemyId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_siege_core::{
        Color, Element, ElementTable, EnemySnapshot, Tier, TowerId, TowerSnapshot,
    };

    fn target_of(targets: &[TowerTarget], tower: TowerId) -> Option<EnemyId> {
        targets
            .iter()
            .find(|target| target.tower == tower)
            .map(|target| target.enemy)
    }

    fn tower_snapshot(id: u32, element: Element, position: Vec2) -> TowerSnapshot {
        let table = ElementTable::default();
        TowerSnapshot {
            id: TowerId::new(id),
            element,
            tier: Tier::BASE,
            position,
            stats: table.tower_stats(element, Tier::BASE),
            color: Color::from_rgb(255, 255, 255),
            last_fired: None,
        }
    }

    fn enemy_snapshot(id: u32, position: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position,
            health: 30.0,
            max_health: 30.0,
            speed: 0.62,
            reward: 15,
            path_index: 0,
            boss: false,
            slow_factor: 1.0,
            effects: Vec::new(),
        }
    }

    #[test]
    fn targets_nearest_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(
            1,
            Element::Fire,
            Vec2::new(100.0, 200.0),
        )]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(2, Vec2::new(100.0, 100.0)),
            enemy_snapshot(3, Vec2::new(150.0, 200.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(3),
                distance: 50.0,
            }]
        );
    }

    #[test]
    fn enemy_exactly_at_range_is_ignored() {
        let mut system = TowerTargeting::new();
        let towers =
            TowerView::from_snapshots(vec![tower_snapshot(1, Element::Fire, Vec2::ZERO)]);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(2, Vec2::new(120.0, 0.0))]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn smaller_enemy_id_is_preferred_when_distances_match() {
        let mut system = TowerTargeting::new();
        let towers =
            TowerView::from_snapshots(vec![tower_snapshot(1, Element::Air, Vec2::ZERO)]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(20, Vec2::new(30.0, 0.0)),
            enemy_snapshot(10, Vec2::new(-30.0, 0.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(target_of(&out, TowerId::new(1)), Some(EnemyId::new(10)));
    }

    #[test]
    fn range_follows_element_stats() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower_snapshot(1, Element::Earth, Vec2::ZERO),
            tower_snapshot(2, Element::Air, Vec2::ZERO),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(5, Vec2::new(0.0, 150.0))]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(target_of(&out, TowerId::new(1)), None);
        assert_eq!(target_of(&out, TowerId::new(2)), Some(EnemyId::new(5)));
    }

    #[test]
    fn empty_collections_clear_previous_targets() {
        let mut system = TowerTargeting::new();
        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            distance: 0.0,
        }];

        system.handle(
            &TowerView::from_snapshots(Vec::new()),
            &EnemyView::from_snapshots(vec![enemy_snapshot(1, Vec2::ZERO)]),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
