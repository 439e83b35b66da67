//! Descriptors and results exchanged with the engine

use bitflags::bitflags;
use modelbox_math::{Color3, Vec3};
use crate::handles::PrimitiveKey;

/// Description of an unlit, emissive material
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDesc {
    /// Emissive color
    pub emissive_color: Color3,
    /// Opacity (1.0 = opaque)
    pub alpha: f32,
    /// Ignore scene lights
    pub disable_lighting: bool,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            emissive_color: Color3::WHITE,
            alpha: 1.0,
            disable_lighting: true,
        }
    }
}

/// A single mutable material property
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialProperty {
    /// Emissive color
    EmissiveColor(Color3),
    /// Opacity
    Alpha(f32),
}

/// Arc-rotate camera orbiting a target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDesc {
    /// Longitudinal rotation in radians
    pub alpha: f32,
    /// Latitudinal rotation in radians
    pub beta: f32,
    /// Distance from the target
    pub radius: f32,
    /// Orbit target
    pub target: Vec3,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            alpha: -std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::PI / 2.5,
            radius: 20.0,
            target: Vec3::ZERO,
        }
    }
}

/// Hemispheric light
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightDesc {
    /// Direction the light comes from
    pub direction: Vec3,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self { direction: Vec3::new(1.0, 1.0, 0.0) }
    }
}

/// Result of a model import
#[derive(Clone, Debug, Default)]
pub struct ImportedModel {
    /// Root node of the imported hierarchy
    pub root: Option<PrimitiveKey>,
    /// All child meshes of the root
    pub meshes: Vec<PrimitiveKey>,
    /// Engine ids of `meshes`, same order
    pub mesh_ids: Vec<String>,
}

impl ImportedModel {
    /// Check whether a primitive belongs to this model's mesh set
    pub fn contains(&self, primitive: PrimitiveKey) -> bool {
        self.meshes.contains(&primitive)
    }
}

/// Progress notification during a model import
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImportProgress {
    /// Bytes loaded so far
    pub loaded: u64,
    /// Total bytes, when known
    pub total: Option<u64>,
}

/// Result of a successful ray pick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    /// The primitive that was hit
    pub primitive: PrimitiveKey,
    /// World-space hit point
    pub point: Vec3,
    /// Outward world-space surface normal at the hit point
    pub normal: Vec3,
    /// Whether the hit primitive is marked pickable
    pub pickable: bool,
}

/// Pointer input forwarded to the engine's action manager
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to screen coordinates
    Move { x: f32, y: f32 },
    /// Primary button click at screen coordinates
    Click { x: f32, y: f32 },
    /// Pointer left the canvas
    Leave,
}

bitflags! {
    /// Pointer triggers a primitive reacts to
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Triggers: u8 {
        /// Primitive was clicked
        const PICK = 1 << 0;
        /// Pointer entered the primitive
        const POINTER_OVER = 1 << 1;
        /// Pointer left the primitive
        const POINTER_OUT = 1 << 2;
    }
}

/// A trigger fired on a primitive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Primitive whose trigger fired
    pub primitive: PrimitiveKey,
    /// Exactly one of the [`Triggers`] flags
    pub trigger: Triggers,
}
