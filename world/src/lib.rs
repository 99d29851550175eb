#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Elemental Siege.

mod enemies;
mod towers;

use std::time::Duration;

use elemental_siege_core::{
    Command, Corridor, Element, ElementTable, EnemyId, Event, FusionError, Path, PlacementError,
    ProjectileId, TimeScale, TowerId, Vec2, WavePhase, WELCOME_BANNER,
};

use enemies::{EnemyRoster, Launch, ProjectileRoster};
use towers::TowerRegistry;

const DEFAULT_HEARTS: u32 = 10;

/// Static parameters the world is constructed with.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    path: Path,
    corridor: Corridor,
    elements: ElementTable,
    initial_hearts: u32,
}

impl WorldConfig {
    /// Creates a new world configuration.
    #[must_use]
    pub fn new(
        path: Path,
        corridor: Corridor,
        elements: ElementTable,
        initial_hearts: u32,
    ) -> Self {
        Self {
            path,
            corridor,
            elements,
            initial_hearts,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(
            Path::default(),
            Corridor::default(),
            ElementTable::default(),
            DEFAULT_HEARTS,
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    tower: TowerId,
    start: Vec2,
    position: Vec2,
    original: Vec2,
    exceeded_threshold: bool,
}

#[derive(Debug, Default)]
struct Interaction {
    placing: Option<Element>,
    cursor: Option<Vec2>,
    selected: Option<TowerId>,
    drag: Option<Drag>,
}

/// Represents the authoritative Elemental Siege world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    towers: TowerRegistry,
    enemies: EnemyRoster,
    projectiles: ProjectileRoster,
    gold: u32,
    diamonds: u32,
    hearts: u32,
    wave: u32,
    phase: WavePhase,
    started: bool,
    paused: bool,
    time_scale: TimeScale,
    clock: Duration,
    interaction: Interaction,
}

impl World {
    /// Creates a new world resting at the menu with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a new world resting at the menu with the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let hearts = config.initial_hearts;
        Self {
            banner: WELCOME_BANNER,
            config,
            towers: TowerRegistry::new(),
            enemies: EnemyRoster::new(),
            projectiles: ProjectileRoster::new(),
            gold: 0,
            diamonds: 0,
            hearts,
            wave: 0,
            phase: WavePhase::Idle,
            started: false,
            paused: false,
            time_scale: TimeScale::Normal,
            clock: Duration::ZERO,
            interaction: Interaction::default(),
        }
    }

    fn game_over(&self) -> bool {
        matches!(self.phase, WavePhase::GameOver { .. })
    }

    fn accepts_actions(&self) -> bool {
        self.started && !self.game_over()
    }

    fn is_running(&self) -> bool {
        self.accepts_actions() && !self.paused
    }

    fn reset_battlefield(&mut self) {
        self.towers.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.interaction = Interaction::default();
        self.hearts = self.config.initial_hearts;
        self.wave = 0;
        self.phase = WavePhase::Idle;
        self.paused = false;
        self.time_scale = TimeScale::Normal;
    }

    fn place_tower(&mut self, element: Element, position: Vec2) -> Result<TowerId, PlacementError> {
        if !self.accepts_actions() {
            return Err(PlacementError::NotRunning);
        }
        if self
            .config
            .path
            .is_blocked(position, self.config.corridor.half_width())
        {
            return Err(PlacementError::OnPath);
        }
        let cost = self.config.elements.stats(element).cost;
        if self.gold < cost {
            return Err(PlacementError::InsufficientGold {
                cost,
                available: self.gold,
            });
        }
        self.gold -= cost;
        Ok(self.towers.insert(element, position))
    }

    fn validate_fusion(&self, source: TowerId, target: TowerId) -> Result<u32, FusionError> {
        let (Some(dragged), Some(anchor)) = (self.towers.get(source), self.towers.get(target))
        else {
            return Err(FusionError::MissingTower);
        };
        if source == target || dragged.element != anchor.element || dragged.tier != anchor.tier {
            return Err(FusionError::Incompatible);
        }
        let cost = self
            .config
            .elements
            .fusion_cost(anchor.element, anchor.tier)
            .ok_or(FusionError::MaxTier)?;
        if self.gold < cost {
            return Err(FusionError::InsufficientGold {
                cost,
                available: self.gold,
            });
        }
        Ok(cost)
    }

    fn take_drag(&mut self, tower: TowerId) -> Option<Drag> {
        match self.interaction.drag {
            Some(drag) if drag.tower == tower => self.interaction.drag.take(),
            _ => None,
        }
    }

    fn revert_drag(&mut self, drag: Drag, out_events: &mut Vec<Event>) {
        if let Some(tower) = self.towers.get_mut(drag.tower) {
            tower.position = drag.original;
            out_events.push(Event::DragReverted {
                tower: drag.tower,
                position: drag.original,
            });
        }
    }

    fn set_selection(&mut self, tower: Option<TowerId>, out_events: &mut Vec<Event>) {
        if self.interaction.selected != tower {
            self.interaction.selected = tower;
            out_events.push(Event::SelectionChanged { tower });
        }
    }

    fn set_placing(&mut self, element: Option<Element>, out_events: &mut Vec<Event>) {
        if self.interaction.placing != element {
            self.interaction.placing = element;
            out_events.push(Event::PlacementModeChanged { element });
        }
    }

    fn economy_changed(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::EconomyChanged {
            gold: self.gold,
            diamonds: self.diamonds,
        });
    }

    fn kill_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if let Some(state) = self.enemies.remove(enemy) {
            self.gold = self.gold.saturating_add(state.reward);
            out_events.push(Event::EnemyKilled {
                enemy,
                reward: state.reward,
            });
            self.economy_changed(out_events);
        }
    }

    fn resolve_impact(
        &mut self,
        projectile: ProjectileId,
        mut hits: Vec<EnemyId>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(shot) = self.projectiles.remove(projectile) else {
            return;
        };
        if !self.enemies.contains(shot.target) {
            out_events.push(Event::ProjectileDiscarded { projectile });
            return;
        }

        hits.sort_unstable();
        hits.dedup();
        let on_hit = shot.element.on_hit();
        let mut damaged = 0;
        let mut fallen = Vec::new();
        for id in hits {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };
            enemy.health -= shot.damage;
            if let Some(effect) = on_hit {
                effect.apply_to(&mut enemy.effects);
            }
            damaged += 1;
            if enemy.is_dead() {
                fallen.push(id);
            }
        }

        out_events.push(Event::ProjectileImpacted {
            projectile,
            hits: damaged,
        });
        for id in fallen {
            self.kill_enemy(id, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRun { gold, diamonds } => {
            world.reset_battlefield();
            world.gold = gold;
            world.diamonds = diamonds;
            world.started = true;
            out_events.push(Event::RunStarted { gold, diamonds });
            world.economy_changed(out_events);
        }
        Command::AbandonRun => {
            if world.started {
                world.reset_battlefield();
                world.started = false;
                out_events.push(Event::RunAbandoned);
            }
        }
        Command::SetPaused { paused } => {
            if world.paused != paused {
                world.paused = paused;
                out_events.push(Event::PausedChanged { paused });
            }
        }
        Command::SetTimeScale { scale } => {
            if world.time_scale != scale {
                world.time_scale = scale;
                out_events.push(Event::TimeScaleChanged { scale });
            }
        }
        Command::Tick { dt } => {
            if world.is_running() {
                world.clock = world.clock.saturating_add(dt);
                out_events.push(Event::TimeAdvanced {
                    dt: dt.saturating_mul(world.time_scale.factor()),
                });
            }
        }
        Command::SetPlacementMode { element } => world.set_placing(element, out_events),
        Command::TrackCursor { position } => world.interaction.cursor = Some(position),
        Command::UpdateStatus {
            enemy,
            effects,
            burn_damage,
        } => {
            let Some(state) = world.enemies.get_mut(enemy) else {
                return;
            };
            state.effects = effects;
            state.health -= burn_damage;
            if state.is_dead() {
                world.kill_enemy(enemy, out_events);
            }
        }
        Command::MoveEnemy {
            enemy,
            position,
            path_index,
        } => {
            let last_index = world.config.path.len().saturating_sub(1);
            if let Some(state) = world.enemies.get_mut(enemy) {
                state.position = position;
                state.path_index = state.path_index.max(path_index.min(last_index));
            }
        }
        Command::ReleaseEnemy { enemy } => {
            if world.enemies.remove(enemy).is_none() {
                return;
            }
            let previous = world.hearts;
            world.hearts = previous.saturating_sub(1);
            out_events.push(Event::EnemyEscaped {
                enemy,
                hearts: world.hearts,
            });
            if previous <= 1 && !world.game_over() {
                world.phase = WavePhase::GameOver { wave: world.wave };
                out_events.push(Event::GameOver { wave: world.wave });
            }
        }
        Command::FireProjectile { tower, target } => {
            if !world.is_running() || !world.enemies.contains(target) {
                return;
            }
            let now = world.clock;
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };
            state.last_fired = Some(now);
            let stats = world.config.elements.stats(state.element);
            let tower_stats = world.config.elements.tower_stats(state.element, state.tier);
            let projectile = world.projectiles.launch(Launch {
                position: state.position,
                target,
                damage: tower_stats.damage,
                speed: tower_stats.projectile_speed,
                element: state.element,
                color: stats.color,
            });
            out_events.push(Event::ProjectileFired {
                projectile,
                tower,
                target,
            });
        }
        Command::MoveProjectile {
            projectile,
            position,
        } => {
            if let Some(state) = world.projectiles.get_mut(projectile) {
                state.position = position;
            }
        }
        Command::DiscardProjectile { projectile } => {
            if world.projectiles.remove(projectile).is_some() {
                out_events.push(Event::ProjectileDiscarded { projectile });
            }
        }
        Command::ResolveImpact { projectile, hits } => {
            world.resolve_impact(projectile, hits, out_events);
        }
        Command::ClearWave { wave } => {
            if world.phase != (WavePhase::Active { wave }) || !world.enemies.is_empty() {
                return;
            }
            world.phase = WavePhase::Cleared { wave };
            world.diamonds = world.diamonds.saturating_add(wave);
            out_events.push(Event::WaveCleared {
                wave,
                diamonds: wave,
            });
            world.economy_changed(out_events);
        }
        Command::SpawnWave { wave, enemies } => {
            let expected = match world.phase {
                WavePhase::Idle => 1,
                WavePhase::Cleared { wave: cleared } => cleared.saturating_add(1),
                WavePhase::Active { .. } | WavePhase::GameOver { .. } => return,
            };
            if !world.is_running() || wave != expected {
                return;
            }
            world.wave = wave;
            world.phase = WavePhase::Active { wave };
            let boss = enemies.iter().any(|spawn| spawn.boss);
            for spawn in &enemies {
                let _ = world.enemies.spawn(spawn);
            }
            out_events.push(Event::WaveStarted {
                wave,
                enemies: enemies.len(),
                boss,
            });
        }
        Command::PlaceTower { element, position } => match world.place_tower(element, position) {
            Ok(tower) => {
                out_events.push(Event::TowerPlaced {
                    tower,
                    element,
                    position,
                });
                world.economy_changed(out_events);
                world.set_placing(None, out_events);
                world.set_selection(None, out_events);
            }
            Err(reason) => out_events.push(Event::TowerPlacementRejected {
                element,
                position,
                reason,
            }),
        },
        Command::SelectTower { tower } => {
            if tower.is_none_or(|id| world.towers.get(id).is_some()) {
                world.set_selection(tower, out_events);
            }
        }
        Command::BeginDrag { tower, pointer } => {
            if world.interaction.drag.is_some() || !world.accepts_actions() {
                return;
            }
            let Some(state) = world.towers.get(tower) else {
                return;
            };
            world.interaction.drag = Some(Drag {
                tower,
                start: pointer,
                position: pointer,
                original: state.position,
                exceeded_threshold: false,
            });
            out_events.push(Event::DragStarted { tower });
        }
        Command::DragTower { position } => {
            let Some(drag) = world.interaction.drag.as_mut() else {
                return;
            };
            drag.position = position;
            drag.exceeded_threshold = true;
            if let Some(state) = world.towers.get_mut(drag.tower) {
                state.position = position;
            }
        }
        Command::ClickTower { tower } => {
            if world.take_drag(tower).is_none() {
                return;
            }
            let toggled = if world.interaction.selected == Some(tower) {
                None
            } else {
                Some(tower)
            };
            world.set_selection(toggled, out_events);
        }
        Command::FuseTowers { source, target } => {
            let Some(drag) = world.take_drag(source) else {
                return;
            };
            match world.validate_fusion(source, target) {
                Ok(cost) => {
                    let _ = world.towers.remove(source);
                    let Some(anchor) = world.towers.get_mut(target) else {
                        return;
                    };
                    let Some(tier) = anchor.tier.next() else {
                        return;
                    };
                    anchor.tier = tier;
                    let element = anchor.element;
                    world.gold -= cost;
                    out_events.push(Event::TowerFused {
                        consumed: source,
                        tower: target,
                        element,
                        tier,
                        cost,
                    });
                    world.economy_changed(out_events);
                    world.set_selection(Some(target), out_events);
                }
                Err(reason) => {
                    out_events.push(Event::FusionRejected {
                        source,
                        target,
                        reason,
                    });
                    world.revert_drag(drag, out_events);
                }
            }
        }
        Command::MoveTower { tower, position } => {
            let Some(drag) = world.take_drag(tower) else {
                return;
            };
            let blocked = world
                .config
                .path
                .is_blocked(position, world.config.corridor.half_width());
            if blocked {
                world.revert_drag(drag, out_events);
                return;
            }
            if let Some(state) = world.towers.get_mut(tower) {
                state.position = position;
                out_events.push(Event::TowerMoved { tower, position });
            }
        }
        Command::RevertDrag => {
            if let Some(drag) = world.interaction.drag.take() {
                world.revert_drag(drag, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use elemental_siege_core::{
        Corridor, ElementTable, EnemySnapshot, EnemyView, GameStateSnapshot, Path,
        ProjectileSnapshot, ProjectileView, TowerCooldownSnapshot, TowerCooldownView, TowerId,
        TowerSnapshot, TowerView, Vec2, WavePhase,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the path enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.config.path
    }

    /// Provides read-only access to the no-build corridor around the path.
    #[must_use]
    pub fn corridor(world: &World) -> &Corridor {
        &world.config.corridor
    }

    /// Provides read-only access to the element stats table.
    #[must_use]
    pub fn elements(world: &World) -> &ElementTable {
        &world.config.elements
    }

    /// Reports whether a tower centered at `point` would overlap the path corridor.
    #[must_use]
    pub fn is_blocked(world: &World, point: Vec2) -> bool {
        world
            .config
            .path
            .is_blocked(point, world.config.corridor.half_width())
    }

    /// Unscaled world clock accumulated from `Tick` commands.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Reports whether simulation steps currently advance the world.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.is_running()
    }

    /// Current progress of the wave state machine.
    #[must_use]
    pub fn wave_phase(world: &World) -> WavePhase {
        world.phase
    }

    /// Gold required to fuse the provided tower with a twin, `None` at max tier.
    #[must_use]
    pub fn fusion_cost(world: &World, tower: TowerId) -> Option<u32> {
        let state = world.towers.get(tower)?;
        world.config.elements.fusion_cost(state.element, state.tier)
    }

    /// Captures a read-only view of the towers on the battlefield.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let elements = &world.config.elements;
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    element: tower.element,
                    tier: tower.tier,
                    position: tower.position,
                    stats: elements.tower_stats(tower.element, tower.tier),
                    color: elements.stats(tower.element).color,
                    last_fired: tower.last_fired,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    health: enemy.health,
                    max_health: enemy.max_health,
                    speed: enemy.speed,
                    reward: enemy.reward,
                    path_index: enemy.path_index,
                    boss: enemy.boss,
                    slow_factor: enemy.slow_factor,
                    effects: enemy.effects.clone(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    target: projectile.target,
                    damage: projectile.damage,
                    speed: projectile.speed,
                    element: projectile.element,
                    color: projectile.color,
                })
                .collect(),
        )
    }

    /// Captures the cooldown bookkeeping of every tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        let table = &world.config.elements;
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    last_fired: tower.last_fired,
                    fire_interval: table.tower_stats(tower.element, tower.tier).fire_interval,
                })
                .collect(),
        )
    }

    /// Captures the simulation-relevant game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameStateSnapshot {
        let interaction = &world.interaction;
        let drag = interaction.drag;
        GameStateSnapshot {
            gold: world.gold,
            diamonds: world.diamonds,
            hearts: world.hearts,
            wave: world.wave,
            phase: world.phase,
            started: world.started,
            game_over: world.game_over(),
            paused: world.paused,
            time_scale: world.time_scale,
            placing: interaction.placing,
            cursor: interaction.cursor,
            selected_tower: interaction.selected,
            dragging_tower: drag.map(|drag| drag.tower),
            drag_position: drag.map(|drag| drag.position),
            drag_start: drag.map(|drag| drag.start),
            original_position: drag.map(|drag| drag.original),
            drag_exceeded_threshold: drag.is_some_and(|drag| drag.exceeded_threshold),
        }
    }
}
