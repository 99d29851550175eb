#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Elemental Siege engine.
//!
//! This crate defines the message surface that connects the simulation
//! engine, the authoritative world, and pure systems. The engine submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems read immutable views and respond
//! exclusively with new command batches.

mod element;
mod path;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use element::{
    Color, ColorError, Element, ElementStats, ElementTable, OnHit, Tier, TierError, TowerStats,
    MAX_TIER,
};
pub use path::{point_segment_distance, step_toward, Corridor, Path, PathError, Step};

/// Canonical greeting shown when a run begins.
pub const WELCOME_BANNER: &str = "Welcome, Commander. Build your defenses.";

/// Duration of one reference tick; speeds and burn rates are expressed per tick.
pub const REFERENCE_TICK_MS: f32 = 16.0;

const DEFAULT_BURN_MAGNITUDE: f32 = 0.1;
const DEFAULT_SLOW_MAGNITUDE: f32 = 0.5;

/// Converts elapsed simulated time into a fraction of the reference tick.
#[must_use]
pub fn tick_fraction(dt: Duration) -> f32 {
    dt.as_secs_f32() * 1_000.0 / REFERENCE_TICK_MS
}

/// Player-selectable simulation speed multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeScale {
    /// Real-time speed.
    #[default]
    Normal,
    /// Twice real-time speed.
    Double,
    /// Four times real-time speed.
    Quadruple,
}

impl TimeScale {
    /// Integer multiplier applied to frame deltas.
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
            Self::Quadruple => 4,
        }
    }

    /// Next speed in the 1× → 2× → 4× → 1× cycle.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Quadruple,
            Self::Quadruple => Self::Normal,
        }
    }

    /// Parses a multiplier of 1, 2 or 4.
    #[must_use]
    pub const fn from_factor(factor: u32) -> Option<Self> {
        match factor {
            1 => Some(Self::Normal),
            2 => Some(Self::Double),
            4 => Some(Self::Quadruple),
            _ => None,
        }
    }
}

/// Kinds of timed modifiers an enemy can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Damage over time.
    Burn,
    /// Movement penalty.
    Slow,
    /// Movement lockout.
    Stun,
    /// Kind unknown to this build; kept and decayed but otherwise inert.
    #[serde(other)]
    Unrecognized,
}

/// Timed modifier attached to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    kind: StatusKind,
    remaining: Duration,
    magnitude: Option<f32>,
}

impl StatusEffect {
    /// Creates a new status effect.
    #[must_use]
    pub const fn new(kind: StatusKind, remaining: Duration, magnitude: Option<f32>) -> Self {
        Self {
            kind,
            remaining,
            magnitude,
        }
    }

    /// Kind of effect.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    /// Time left before the effect expires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Raw magnitude, if one was supplied.
    #[must_use]
    pub const fn magnitude(&self) -> Option<f32> {
        self.magnitude
    }

    /// Burn damage per reference tick, falling back to 0.1 without a magnitude.
    #[must_use]
    pub fn burn_per_tick(&self) -> f32 {
        self.magnitude.unwrap_or(DEFAULT_BURN_MAGNITUDE)
    }

    /// Slow multiplier, falling back to 0.5 without a magnitude.
    #[must_use]
    pub fn slow_factor(&self) -> f32 {
        self.magnitude.unwrap_or(DEFAULT_SLOW_MAGNITUDE)
    }

    /// Shortens the effect by `dt`, returning `None` once it has expired.
    #[must_use]
    pub fn decayed(self, dt: Duration) -> Option<Self> {
        let remaining = self.remaining.saturating_sub(dt);
        if remaining.is_zero() {
            None
        } else {
            Some(Self { remaining, ..self })
        }
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Blueprint for one enemy produced by wave composition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Starting position, staggered before the entry waypoint.
    pub position: Vec2,
    /// Starting and maximum health.
    pub health: f32,
    /// Base travel per reference tick.
    pub speed: f32,
    /// Gold granted on death.
    pub reward: u32,
    /// Whether this enemy is the wave's boss.
    pub boss: bool,
}

/// Progress of the wave state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave has been spawned in this run yet.
    #[default]
    Idle,
    /// Enemies of the wave are alive.
    Active {
        /// Wave number.
        wave: u32,
    },
    /// Every enemy of the wave is gone and its reward has been paid.
    Cleared {
        /// Wave number.
        wave: u32,
    },
    /// Hearts ran out; terminal until the player redeploys.
    GameOver {
        /// Wave reached when the run ended.
        wave: u32,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// No run is in progress, or the run is paused or over.
    #[error("Placement unavailable right now.")]
    NotRunning,
    /// The point lies within the path corridor.
    #[error("Invalid position: Path blocked!")]
    OnPath,
    /// The player cannot afford the tower.
    #[error("Not enough gold!")]
    InsufficientGold {
        /// Gold the tower costs.
        cost: u32,
        /// Gold the player holds.
        available: u32,
    },
}

/// Reasons a fusion request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum FusionError {
    /// One of the towers no longer exists.
    #[error("Fusion target vanished.")]
    MissingTower,
    /// The towers differ in element or tier, or are the same tower.
    #[error("Towers must share element and tier to fuse.")]
    Incompatible,
    /// The towers are already at the maximum tier.
    #[error("Tower is already at maximum tier.")]
    MaxTier,
    /// The player cannot afford the fusion.
    #[error("Treasury empty! Cannot fuse.")]
    InsufficientGold {
        /// Gold the fusion costs.
        cost: u32,
        /// Gold the player holds.
        available: u32,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the battlefield and begins a run with the provided economy totals.
    StartRun {
        /// Gold carried into the run.
        gold: u32,
        /// Diamonds carried into the run.
        diamonds: u32,
    },
    /// Ends the current run and returns to the menu.
    AbandonRun,
    /// Suspends or resumes the simulation.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Changes the simulation speed multiplier.
    SetTimeScale {
        /// Multiplier to activate.
        scale: TimeScale,
    },
    /// Advances the world clock by one frame of wall-clock time.
    Tick {
        /// Unscaled frame delta.
        dt: Duration,
    },
    /// Arms or disarms placement of the provided element.
    SetPlacementMode {
        /// Element to place on the next pointer-down, if any.
        element: Option<Element>,
    },
    /// Records the latest pointer position in simulation coordinates.
    TrackCursor {
        /// Pointer position.
        position: Vec2,
    },
    /// Replaces an enemy's active effects and applies burn damage for the tick.
    UpdateStatus {
        /// Enemy being updated.
        enemy: EnemyId,
        /// Surviving effects after decay.
        effects: Vec<StatusEffect>,
        /// Burn damage accumulated this tick.
        burn_damage: f32,
    },
    /// Moves an enemy along the path.
    MoveEnemy {
        /// Enemy being moved.
        enemy: EnemyId,
        /// New position.
        position: Vec2,
        /// Index of the last waypoint reached.
        path_index: usize,
    },
    /// Removes an enemy that walked past the exit and charges a heart.
    ReleaseEnemy {
        /// Enemy that escaped.
        enemy: EnemyId,
    },
    /// Launches a projectile from a tower toward an enemy.
    FireProjectile {
        /// Tower firing the shot.
        tower: TowerId,
        /// Enemy the projectile homes onto.
        target: EnemyId,
    },
    /// Moves a projectile toward its target.
    MoveProjectile {
        /// Projectile being moved.
        projectile: ProjectileId,
        /// New position.
        position: Vec2,
    },
    /// Removes a projectile whose target no longer exists.
    DiscardProjectile {
        /// Projectile to remove.
        projectile: ProjectileId,
    },
    /// Applies a projectile's damage and on-hit effect to the listed enemies.
    ResolveImpact {
        /// Projectile that arrived.
        projectile: ProjectileId,
        /// Enemies caught by the impact.
        hits: Vec<EnemyId>,
    },
    /// Marks a wave as cleared and pays its diamond reward.
    ClearWave {
        /// Wave that was cleared.
        wave: u32,
    },
    /// Starts a wave by inserting its enemies.
    SpawnWave {
        /// Wave being started.
        wave: u32,
        /// Enemies composing the wave.
        enemies: Vec<EnemySpawn>,
    },
    /// Requests placement of a tier-1 tower.
    PlaceTower {
        /// Element of the tower.
        element: Element,
        /// Center of the tower.
        position: Vec2,
    },
    /// Sets or clears the selected tower.
    SelectTower {
        /// Tower to select, or `None` to deselect.
        tower: Option<TowerId>,
    },
    /// Starts dragging a tower from the provided pointer position.
    BeginDrag {
        /// Tower picked up.
        tower: TowerId,
        /// Pointer position at pick-up.
        pointer: Vec2,
    },
    /// Moves the dragged tower with the pointer.
    DragTower {
        /// Pointer position.
        position: Vec2,
    },
    /// Ends a drag that never left the click threshold and toggles selection.
    ClickTower {
        /// Tower that was clicked.
        tower: TowerId,
    },
    /// Fuses the dragged tower into another tower of the same element and tier.
    FuseTowers {
        /// Dragged tower, consumed by the fusion.
        source: TowerId,
        /// Tower dropped onto, upgraded in place.
        target: TowerId,
    },
    /// Drops the dragged tower at a new location.
    MoveTower {
        /// Tower being moved.
        tower: TowerId,
        /// Drop position.
        position: Vec2,
    },
    /// Returns the dragged tower to where it was picked up.
    RevertDrag,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new run began.
    RunStarted {
        /// Gold at the start of the run.
        gold: u32,
        /// Diamonds at the start of the run.
        diamonds: u32,
    },
    /// The run was abandoned.
    RunAbandoned,
    /// The pause flag changed.
    PausedChanged {
        /// Whether the simulation is paused.
        paused: bool,
    },
    /// The speed multiplier changed.
    TimeScaleChanged {
        /// Active multiplier.
        scale: TimeScale,
    },
    /// Simulated time advanced.
    TimeAdvanced {
        /// Scaled delta consumed by this step.
        dt: Duration,
    },
    /// Placement mode changed.
    PlacementModeChanged {
        /// Element armed for placement, if any.
        element: Option<Element>,
    },
    /// An enemy died and paid its reward.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Gold granted.
        reward: u32,
    },
    /// An enemy reached the exit.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Hearts left afterwards.
        hearts: u32,
    },
    /// Hearts ran out.
    GameOver {
        /// Wave reached.
        wave: u32,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Projectile created.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted.
        target: EnemyId,
    },
    /// A projectile reached its target and dealt damage.
    ProjectileImpacted {
        /// Projectile that hit.
        projectile: ProjectileId,
        /// Number of enemies damaged.
        hits: usize,
    },
    /// A projectile was removed without effect.
    ProjectileDiscarded {
        /// Projectile removed.
        projectile: ProjectileId,
    },
    /// A wave was cleared.
    WaveCleared {
        /// Wave number.
        wave: u32,
        /// Diamonds granted.
        diamonds: u32,
    },
    /// A wave started.
    WaveStarted {
        /// Wave number.
        wave: u32,
        /// Enemies spawned.
        enemies: usize,
        /// Whether the wave carries a boss.
        boss: bool,
    },
    /// Gold or diamonds changed.
    EconomyChanged {
        /// Current gold.
        gold: u32,
        /// Current diamonds.
        diamonds: u32,
    },
    /// A tower was placed.
    TowerPlaced {
        /// Identifier assigned by the world.
        tower: TowerId,
        /// Element of the tower.
        element: Element,
        /// Center of the tower.
        position: Vec2,
    },
    /// A placement request was rejected.
    TowerPlacementRejected {
        /// Element requested.
        element: Element,
        /// Point requested.
        position: Vec2,
        /// Why the placement failed.
        reason: PlacementError,
    },
    /// The selected tower changed.
    SelectionChanged {
        /// Selected tower, if any.
        tower: Option<TowerId>,
    },
    /// A tower was picked up.
    DragStarted {
        /// Tower being dragged.
        tower: TowerId,
    },
    /// A dragged tower was dropped at a new location.
    TowerMoved {
        /// Tower moved.
        tower: TowerId,
        /// New center.
        position: Vec2,
    },
    /// Two towers were fused.
    TowerFused {
        /// Dragged tower that was consumed.
        consumed: TowerId,
        /// Upgraded tower.
        tower: TowerId,
        /// Element of the upgraded tower.
        element: Element,
        /// Tier after fusion.
        tier: Tier,
        /// Gold spent.
        cost: u32,
    },
    /// A fusion request was rejected.
    FusionRejected {
        /// Dragged tower.
        source: TowerId,
        /// Tower dropped onto.
        target: TowerId,
        /// Why the fusion failed.
        reason: FusionError,
    },
    /// A dragged tower returned to its pre-drag position.
    DragReverted {
        /// Tower restored.
        tower: TowerId,
        /// Restored center.
        position: Vec2,
    },
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Element of the tower.
    pub element: Element,
    /// Current tier.
    pub tier: Tier,
    /// Center of the tower.
    pub position: Vec2,
    /// Stats derived from element and tier.
    pub stats: TowerStats,
    /// Presentation color.
    pub color: Color,
    /// World clock reading of the last shot.
    pub last_fired: Option<Duration>,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a tower by identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of towers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position.
    pub position: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Base travel per reference tick.
    pub speed: f32,
    /// Gold granted on death.
    pub reward: u32,
    /// Index of the last waypoint reached.
    pub path_index: usize,
    /// Whether the enemy is a boss.
    pub boss: bool,
    /// Base speed multiplier independent of status effects.
    pub slow_factor: f32,
    /// Active status effects.
    pub effects: Vec<StatusEffect>,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a live enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the live set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: Vec2,
    /// Enemy the projectile homes onto; a lookup key, not ownership.
    pub target: EnemyId,
    /// Damage payload.
    pub damage: f32,
    /// Travel per reference tick.
    pub speed: f32,
    /// Element deciding on-impact behavior.
    pub element: Element,
    /// Presentation color.
    pub color: Color,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a projectile by identifier.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&ProjectileSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Cooldown bookkeeping for a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// World clock reading of the last shot, `None` if it never fired.
    pub last_fired: Option<Duration>,
    /// Cooldown between shots at 1× time scale.
    pub fire_interval: Duration,
}

/// Read-only view of tower cooldowns sorted by tower identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target assignment produced by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Nearest enemy within range.
    pub enemy: EnemyId,
    /// Distance between tower and enemy.
    pub distance: f32,
}

/// Per-enemy movement adjustment produced by the status effect processor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementModifier {
    /// Enemy the modifier applies to.
    pub enemy: EnemyId,
    /// Most restrictive slow multiplier active this tick.
    pub speed_multiplier: f32,
    /// Whether a stun suppresses movement this tick.
    pub stunned: bool,
}

impl MovementModifier {
    /// Modifier for an enemy without active effects.
    #[must_use]
    pub const fn unaffected(enemy: EnemyId) -> Self {
        Self {
            enemy,
            speed_multiplier: 1.0,
            stunned: false,
        }
    }
}

/// Projectile that reached its target during the movement phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileArrival {
    /// Projectile that arrived.
    pub projectile: ProjectileId,
    /// Enemy the projectile was homing onto.
    pub target: EnemyId,
    /// Projectile position when it was deemed to arrive.
    pub position: Vec2,
}

/// Simulation-relevant game state exposed to presentation each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct GameStateSnapshot {
    /// Gold available for placement and fusion.
    pub gold: u32,
    /// Diamonds earned by clearing waves.
    pub diamonds: u32,
    /// Hearts left before the run ends.
    pub hearts: u32,
    /// Current wave number, zero before the first wave.
    pub wave: u32,
    /// Progress of the wave state machine.
    pub phase: WavePhase,
    /// Whether a run is in progress.
    pub started: bool,
    /// Whether the run ended.
    pub game_over: bool,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Active speed multiplier.
    pub time_scale: TimeScale,
    /// Element armed for placement.
    pub placing: Option<Element>,
    /// Latest pointer position.
    pub cursor: Option<Vec2>,
    /// Selected tower.
    pub selected_tower: Option<TowerId>,
    /// Tower being dragged.
    pub dragging_tower: Option<TowerId>,
    /// Pointer position of the drag.
    pub drag_position: Option<Vec2>,
    /// Pointer position where the drag began.
    pub drag_start: Option<Vec2>,
    /// Tower position before the drag began.
    pub original_position: Option<Vec2>,
    /// Whether the drag ever moved beyond the click threshold.
    pub drag_exceeded_threshold: bool,
}
