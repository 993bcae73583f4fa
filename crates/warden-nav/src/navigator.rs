use crate::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    pub points: Vec<Vec3>,
}

impl NavPath {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Total polyline length.
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavRaycastHit {
    pub point: Vec3,
    pub distance: f32,
}

pub trait Navigator {
    fn find_path(&self, start: Vec3, goal: Vec3) -> Option<NavPath>;

    /// Nearest navigable point to `point` within `radius`.
    ///
    /// Returns `None` when nothing navigable lies within the radius; callers treat that as
    /// "leave the destination unchanged and try again next tick".
    fn sample_point_near(&self, point: Vec3, radius: f32) -> Option<Vec3>;

    /// Raycast inside the nav representation.
    ///
    /// Returns the first point where the ray from `origin` along `direction` leaves navigable
    /// space within `max_distance`. Backends that don't support raycasts may return `None`.
    fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<NavRaycastHit> {
        None
    }
}
