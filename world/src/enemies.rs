//! Live enemies and the projectiles homing onto them.

use std::collections::BTreeMap;

use elemental_siege_core::{Color, Element, EnemyId, EnemySpawn, ProjectileId, StatusEffect, Vec2};

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) speed: f32,
    pub(crate) reward: u32,
    pub(crate) path_index: usize,
    pub(crate) boss: bool,
    pub(crate) slow_factor: f32,
    pub(crate) effects: Vec<StatusEffect>,
}

impl EnemyState {
    fn spawn(id: EnemyId, spawn: &EnemySpawn) -> Self {
        Self {
            id,
            position: spawn.position,
            health: spawn.health,
            max_health: spawn.health,
            speed: spawn.speed,
            reward: spawn.reward,
            path_index: 0,
            boss: spawn.boss,
            slow_factor: 1.0,
            effects: Vec::new(),
        }
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Live enemy set keyed by identifier.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    entries: BTreeMap<EnemyId, EnemyState>,
    next_enemy_id: EnemyId,
}

impl EnemyRoster {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn spawn(&mut self, spawn: &EnemySpawn) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, EnemyState::spawn(id, spawn));
        id
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<EnemyState> {
        self.entries.remove(&id)
    }

    pub(crate) fn contains(&self, id: EnemyId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_enemy_id = EnemyId::new(0);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) position: Vec2,
    pub(crate) target: EnemyId,
    pub(crate) damage: f32,
    pub(crate) speed: f32,
    pub(crate) element: Element,
    pub(crate) color: Color,
}

/// Projectiles in flight keyed by identifier.
#[derive(Debug)]
pub(crate) struct ProjectileRoster {
    entries: BTreeMap<ProjectileId, ProjectileState>,
    next_projectile_id: ProjectileId,
}

/// Payload copied from the firing tower into a new projectile.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) position: Vec2,
    pub(crate) target: EnemyId,
    pub(crate) damage: f32,
    pub(crate) speed: f32,
    pub(crate) element: Element,
    pub(crate) color: Color,
}

impl ProjectileRoster {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn launch(&mut self, launch: Launch) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            ProjectileState {
                id,
                position: launch.position,
                target: launch.target,
                damage: launch.damage,
                speed: launch.speed,
                element: launch.element,
                color: launch.color,
            },
        );
        id
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> Option<ProjectileState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.entries.values()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_projectile_id = ProjectileId::new(0);
    }
}
