//! Spatial anchors on model surfaces

use modelbox_math::Vec3;
use serde::{Serialize, Deserialize};

/// A point on a model surface together with the outward surface normal
///
/// Anchors are immutable once created. The normal is stored as given; users
/// that need a unit vector call [`SpatialAnchor::unit_normal`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialAnchor {
    position: Vec3,
    surface_normal: Vec3,
}

impl SpatialAnchor {
    /// Create an anchor
    pub fn new(position: Vec3, surface_normal: Vec3) -> Self {
        Self { position, surface_normal }
    }

    /// World-space anchor point
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Outward surface normal, as given
    pub fn surface_normal(&self) -> Vec3 {
        self.surface_normal
    }

    /// Outward surface normal with unit length
    pub fn unit_normal(&self) -> Vec3 {
        self.surface_normal.normalized()
    }

    /// Point `distance` units away from the surface along the normal
    pub fn offset(&self, distance: f32) -> Vec3 {
        self.position.translated(self.surface_normal, distance)
    }
}
