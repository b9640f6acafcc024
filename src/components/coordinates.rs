//! Plain 2D coordinates in canvas space.
//!
//! Used for grid points, movement endpoints and painter arguments. The
//! helpers here are the only vector maths the simulation needs.

use serde::{Deserialize, Serialize};

/// A point on the canvas, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
}

impl Coordinates {
    pub const fn new(x: f32, y: f32) -> Self {
        Coordinates { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Coordinates) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Coordinates) -> Coordinates {
        lerp(self, other, 0.5)
    }
}

/// Linearly interpolate between two points.
///
/// `t` is not clamped here; callers that need clamping do it themselves
/// (see [`MovementManager`](super::movement::MovementManager)).
pub fn lerp(a: Coordinates, b: Coordinates, t: f32) -> Coordinates {
    Coordinates {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}
