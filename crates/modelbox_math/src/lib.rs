//! Math types for the modelbox viewer
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector used for positions, normals and scaling
//! - [`Color3`] - RGB color used for emissive marker materials
//!
//! Interpolation helpers ([`lerp`], [`inverse_lerp`]) back the keyframe
//! sampling of animation curves.

mod vec3;
mod color;

pub use vec3::Vec3;
pub use color::Color3;

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `value` between `a` and `b` as a 0..1 fraction
///
/// Returns 0.0 when `a == b`.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}
