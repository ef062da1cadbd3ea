//! Visibility engine
//!
//! Decides whether a target lies inside the observer's forward view cone.
//! Called every tick for every room and monster candidate, so it works on a
//! handful of scalars and never allocates.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::VisionConfig;
use crate::world::Pose;

/// Dot-product threshold of the default ~120° cone (cos 60°).
pub const DEFAULT_CONE_THRESHOLD: f32 = 0.5;

/// Squared distance under which a target counts as co-located with the observer.
const COINCIDENT_EPSILON_SQ: f32 = 1e-10;

/// Distance and cone membership of a target relative to an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    pub distance: f32,
    pub in_view: bool,
}

/// True if `target` is within `max_distance` of `observer` and inside the
/// default forward cone around `facing`.
///
/// `facing` need not be normalized. A target at the observer's exact position
/// is always visible; a zero facing vector sees nothing else.
pub fn is_visible(observer: Vec3, facing: Vec3, target: Vec3, max_distance: f32) -> bool {
    check(observer, facing, target, max_distance, DEFAULT_CONE_THRESHOLD).in_view
}

/// Full visibility check with an explicit cone threshold.
pub fn check(
    observer: Vec3,
    facing: Vec3,
    target: Vec3,
    max_distance: f32,
    cone_threshold: f32,
) -> Visibility {
    let offset = target - observer;
    let dist_sq = offset.length_squared();
    let distance = dist_sq.sqrt();

    if distance > max_distance {
        return Visibility {
            distance,
            in_view: false,
        };
    }
    if dist_sq <= COINCIDENT_EPSILON_SQ {
        return Visibility {
            distance,
            in_view: true,
        };
    }

    let facing = facing.normalize_or_zero();
    let direction = offset / distance;
    Visibility {
        distance,
        in_view: direction.dot(facing) > cone_threshold,
    }
}

/// An observer pose bound to a vision configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCone {
    pub pose: Pose,
    pub max_distance: f32,
    pub threshold: f32,
}

impl ViewCone {
    pub fn new(pose: Pose, config: &VisionConfig) -> Self {
        Self {
            pose,
            max_distance: config.max_view_distance,
            threshold: config.cone_threshold,
        }
    }

    /// Distance and visibility of `target` from this cone's observer.
    pub fn query(&self, target: Vec3) -> Visibility {
        check(
            self.pose.position,
            self.pose.facing,
            target,
            self.max_distance,
            self.threshold,
        )
    }

    pub fn sees(&self, target: Vec3) -> bool {
        self.query(target).in_view
    }
}
