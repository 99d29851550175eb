//! Static enemy path and the geometry shared by movement and placement checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_WAYPOINTS: [Vec2; 8] = [
    Vec2::new(0.0, 100.0),
    Vec2::new(200.0, 100.0),
    Vec2::new(200.0, 300.0),
    Vec2::new(500.0, 300.0),
    Vec2::new(500.0, 150.0),
    Vec2::new(750.0, 150.0),
    Vec2::new(750.0, 500.0),
    Vec2::new(0.0, 500.0),
];

/// Reasons a path definition may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path needs an entry and an exit waypoint.
    #[error("path requires at least two waypoints, found {0}")]
    TooShort(usize),
}

/// Ordered polyline enemies follow from the entry waypoint to the exit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    /// Creates a path from at least two waypoints; the last one is the exit.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooShort(waypoints.len()));
        }
        Ok(Self { waypoints })
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Waypoint at the provided index, if it exists.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// First waypoint, where waves line up before entering.
    #[must_use]
    pub fn entry(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Final waypoint; enemies that reach it cost the player a heart.
    #[must_use]
    pub fn exit(&self) -> Vec2 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.waypoints.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Reports whether the point lies strictly within `half_width` of any segment.
    #[must_use]
    pub fn is_blocked(&self, point: Vec2, half_width: f32) -> bool {
        self.segments()
            .any(|(start, end)| point_segment_distance(point, start, end) < half_width)
    }
}

impl Default for Path {
    fn default() -> Self {
        Self {
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
        }
    }
}

impl TryFrom<Vec<Vec2>> for Path {
    type Error = PathError;

    fn try_from(waypoints: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<Path> for Vec<Vec2> {
    fn from(path: Path) -> Self {
        path.waypoints
    }
}

/// Region around the path where towers cannot be placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corridor {
    /// Drawn width of the path.
    pub visual_width: f32,
    /// Extra clearance so towers never overlap the drawn path.
    pub margin: f32,
}

impl Corridor {
    /// Distance from the path center line inside which placement is blocked.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.visual_width / 2.0 + self.margin
    }
}

impl Default for Corridor {
    fn default() -> Self {
        Self {
            visual_width: 40.0,
            margin: 15.0,
        }
    }
}

/// Distance from `point` to the closest point of segment `start..end`.
#[must_use]
pub fn point_segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_squared = segment.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Outcome of moving a point toward a destination by a fixed distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// The remaining distance was shorter than the step; snapped to the destination.
    Arrived(Vec2),
    /// Moved the full step along the straight line to the destination.
    Advanced(Vec2),
}

/// Moves `from` toward `to` by `distance`. Leftover distance after arriving is dropped.
#[must_use]
pub fn step_toward(from: Vec2, to: Vec2, distance: f32) -> Step {
    let delta = to - from;
    let remaining = delta.length();
    if remaining < distance {
        Step::Arrived(to)
    } else if remaining <= f32::EPSILON {
        Step::Advanced(from)
    } else {
        Step::Advanced(from + delta / remaining * distance)
    }
}
