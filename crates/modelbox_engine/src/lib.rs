//! Render engine facade for the modelbox viewer
//!
//! The viewer never talks to a rendering backend directly. Everything it needs
//! (scene creation, model import, spheres, materials, animation groups, ray
//! picking, pointer triggers, immersive XR) goes through [`RenderEngine`].
//!
//! - [`RenderEngine`] - The facade trait
//! - [`HeadlessEngine`] - In-memory scene graph implementing the facade
//! - [`AnimationCurve`] - Keyframed animation of one primitive property
//! - [`EngineError`] - Errors reported by an engine
//!
//! Handles ([`SceneKey`], [`PrimitiveKey`], ...) are generational keys, so a
//! handle to a disposed resource resolves to nothing instead of aliasing a
//! newer one.

mod handles;
mod error;
mod types;
mod animation;
mod engine;
pub mod headless;

pub use handles::{SceneKey, PrimitiveKey, MaterialKey, AnimationGroupKey, CameraKey, LightKey};
pub use error::EngineError;
pub use types::{
    MaterialDesc, MaterialProperty, CameraDesc, LightDesc, ImportedModel, ImportProgress,
    PickHit, PointerEvent, Triggers, TriggerEvent,
};
pub use animation::{AnimationCurve, AnimatedProperty, AnimationValue, Keyframe};
pub use engine::RenderEngine;
pub use headless::{HeadlessEngine, MeshDesc};

// Re-export math types used throughout the facade
pub use modelbox_math::{Vec3, Color3};
