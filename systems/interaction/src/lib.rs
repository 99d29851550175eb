#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pointer interaction system that resolves gestures into placement, selection,
//! drag, fusion, move and revert commands.

use elemental_siege_core::{Command, Element, ElementTable, GameStateSnapshot, TowerView, Vec2};
use serde::{Deserialize, Serialize};

/// Distances that classify pointer gestures, in simulation units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A pointer-down strictly closer than this to a tower center picks it up.
    pub pick_radius: f32,
    /// A drop strictly closer than this to another tower center targets it.
    pub drop_radius: f32,
    /// Pointer travel separating a click from a drag.
    pub click_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pick_radius: 25.0,
            drop_radius: 30.0,
            click_threshold: 5.0,
        }
    }
}

/// Pointer input expressed in device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed or touch started.
    Down(Vec2),
    /// Pointer moved.
    Move(Vec2),
    /// Button released or touch ended.
    Up(Vec2),
}

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlacementPreview {
    /// Element armed for placement.
    pub element: Element,
    /// Cursor position the tower would be centered on.
    pub position: Vec2,
    /// Targeting radius of a freshly placed tower.
    pub range: f32,
    /// Indicates whether a pointer-down here would succeed.
    pub placeable: bool,
}

/// Builds the placement preview for the current cursor, if placement is armed.
///
/// The `is_blocked` closure should mirror the semantics of the world's
/// `query::is_blocked` helper.
#[must_use]
pub fn preview<F>(
    state: &GameStateSnapshot,
    elements: &ElementTable,
    mut is_blocked: F,
) -> Option<PlacementPreview>
where
    F: FnMut(Vec2) -> bool,
{
    let element = state.placing?;
    let position = state.cursor?;
    let stats = elements.stats(element);
    Some(PlacementPreview {
        element,
        position,
        range: stats.base_range,
        placeable: !is_blocked(position) && state.gold >= stats.cost,
    })
}

/// Interaction system that translates pointer events into world commands.
#[derive(Clone, Debug)]
pub struct Interaction {
    config: Config,
    display_scale: f32,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Interaction {
    /// Creates a new interaction system at a display scale of one.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            display_scale: 1.0,
        }
    }

    /// Factor between device coordinates and simulation coordinates.
    #[must_use]
    pub const fn display_scale(&self) -> f32 {
        self.display_scale
    }

    /// Updates the display scale, ignoring values that are not finite and positive.
    ///
    /// Returns whether the scale was accepted.
    pub fn set_display_scale(&mut self, scale: f32) -> bool {
        if scale.is_finite() && scale > 0.0 {
            self.display_scale = scale;
            true
        } else {
            false
        }
    }

    /// Converts a device coordinate into simulation space.
    #[must_use]
    pub fn to_simulation(&self, device: Vec2) -> Vec2 {
        device / self.display_scale
    }

    /// Consumes one pointer event and emits the commands it resolves to.
    ///
    /// `state` and `towers` must reflect every command emitted for earlier
    /// pointer events.
    pub fn handle(
        &self,
        event: PointerEvent,
        state: &GameStateSnapshot,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        match event {
            PointerEvent::Down(device) => {
                self.pointer_down(self.to_simulation(device), state, towers, out)
            }
            PointerEvent::Move(device) => self.pointer_move(self.to_simulation(device), state, out),
            PointerEvent::Up(device) => {
                self.pointer_up(self.to_simulation(device), state, towers, out)
            }
        }
    }

    fn pointer_down(
        &self,
        point: Vec2,
        state: &GameStateSnapshot,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        if state.paused || !state.started || state.game_over || state.dragging_tower.is_some() {
            return;
        }

        if let Some(element) = state.placing {
            out.push(Command::PlaceTower {
                element,
                position: point,
            });
            return;
        }

        match towers
            .iter()
            .find(|tower| tower.position.distance(point) < self.config.pick_radius)
        {
            Some(tower) => out.push(Command::BeginDrag {
                tower: tower.id,
                pointer: point,
            }),
            None => {
                if state.selected_tower.is_some() {
                    out.push(Command::SelectTower { tower: None });
                }
            }
        }
    }

    fn pointer_move(&self, point: Vec2, state: &GameStateSnapshot, out: &mut Vec<Command>) {
        out.push(Command::TrackCursor { position: point });

        if state.paused || state.dragging_tower.is_none() {
            return;
        }
        let Some(start) = state.drag_start else {
            return;
        };
        if start.distance(point) > self.config.click_threshold {
            out.push(Command::DragTower { position: point });
        }
    }

    fn pointer_up(
        &self,
        point: Vec2,
        state: &GameStateSnapshot,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        let (Some(tower), Some(start)) = (state.dragging_tower, state.drag_start) else {
            return;
        };

        let dropped = state.drag_exceeded_threshold
            || start.distance(point) >= self.config.click_threshold;
        if !dropped {
            out.push(Command::ClickTower { tower });
            return;
        }

        let drop_target = towers.iter().find(|candidate| {
            candidate.id != tower && candidate.position.distance(point) < self.config.drop_radius
        });
        match drop_target {
            Some(target) => out.push(Command::FuseTowers {
                source: tower,
                target: target.id,
            }),
            None => out.push(Command::MoveTower {
                tower,
                position: point,
            }),
        }
    }
}
