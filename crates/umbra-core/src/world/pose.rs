//! Positions and orientation
//!
//! The world is Y-up; rooms lie on the XZ plane. Headings are yaw angles in
//! radians measured from +Z toward +X.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An observer position with a normalized facing vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    /// Normalized facing vector, or zero if the caller supplied a zero vector.
    pub facing: Vec3,
}

impl Pose {
    /// Build a pose from a position and an arbitrary (possibly unnormalized) facing vector.
    pub fn new(position: Vec3, facing: Vec3) -> Self {
        Self {
            position,
            facing: facing.normalize_or_zero(),
        }
    }

    /// Build a pose facing along a yaw heading.
    pub fn from_heading(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            facing: heading_to_facing(heading),
        }
    }

    /// Yaw of the facing vector in radians (0 = +Z, PI/2 = +X).
    pub fn heading(&self) -> f32 {
        self.facing.x.atan2(self.facing.z)
    }

    /// Rotate the facing by `delta` radians about +Y.
    pub fn turn(&mut self, delta: f32) {
        let heading = self.heading() + delta;
        self.facing = heading_to_facing(heading);
    }

    /// Move along the facing vector projected onto the ground plane.
    pub fn advance(&mut self, distance: f32) {
        let ground = Vec3::new(self.facing.x, 0.0, self.facing.z).normalize_or_zero();
        self.position += ground * distance;
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

/// Unit facing vector on the ground plane for a yaw heading.
pub fn heading_to_facing(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Point at `distance` from `origin` along ground-plane `bearing`.
pub fn offset_on_ground(origin: Vec3, bearing: f32, distance: f32) -> Vec3 {
    origin + heading_to_facing(bearing) * distance
}

/// Convert a caller-supplied coordinate slice into a vector.
///
/// # Panics
///
/// Panics if `coords` does not hold exactly three components. A wrong-length
/// position is an integration bug in the caller, not a runtime condition.
pub fn position_from_slice(coords: &[f32]) -> Vec3 {
    assert!(
        coords.len() == 3,
        "position must have exactly 3 components, got {}",
        coords.len()
    );
    Vec3::new(coords[0], coords[1], coords[2])
}
