//! The render engine facade

use std::time::Duration;
use modelbox_math::Vec3;
use crate::animation::AnimationCurve;
use crate::error::EngineError;
use crate::handles::{AnimationGroupKey, CameraKey, LightKey, MaterialKey, PrimitiveKey, SceneKey};
use crate::types::{
    CameraDesc, ImportProgress, ImportedModel, LightDesc, MaterialDesc, MaterialProperty,
    PickHit, PointerEvent, TriggerEvent, Triggers,
};

/// Capabilities the viewer needs from a 3D engine
///
/// Everything is single-threaded. The async methods are one-shot operations
/// (model import, XR probing, XR session enter/exit) that the caller awaits
/// in sequence; implementations must not retry internally.
#[allow(async_fn_in_trait)]
pub trait RenderEngine {
    // --- Scene ---

    /// Create an empty scene
    fn create_scene(&mut self) -> SceneKey;

    /// Dispose a scene and everything it owns
    fn dispose_scene(&mut self, scene: SceneKey);

    /// Check whether a scene handle is live
    fn has_scene(&self, scene: SceneKey) -> bool;

    /// Import a model into the scene
    ///
    /// `on_progress` is called zero or more times before completion.
    async fn import_model(
        &mut self,
        scene: SceneKey,
        url: &str,
        on_progress: &mut dyn FnMut(ImportProgress),
    ) -> Result<ImportedModel, EngineError>;

    /// Create an arc-rotate camera and make it the active camera
    fn create_camera(&mut self, scene: SceneKey, desc: &CameraDesc) -> Result<CameraKey, EngineError>;

    /// Enable (`Some(speed)`) or disable (`None`) idle auto-rotation
    fn set_auto_rotation(&mut self, camera: CameraKey, speed: Option<f32>) -> Result<(), EngineError>;

    /// Create a hemispheric light
    fn create_light(&mut self, scene: SceneKey, desc: &LightDesc) -> Result<LightKey, EngineError>;

    // --- Picking and pointer actions ---

    /// Cast a ray through screen coordinates and return the nearest hit
    fn pick(&self, scene: SceneKey, x: f32, y: f32) -> Option<PickHit>;

    /// Feed a pointer event to the action manager
    ///
    /// Returns the triggers that fired on primitives with registered triggers.
    fn pointer_event(&mut self, scene: SceneKey, event: PointerEvent) -> Vec<TriggerEvent>;

    // --- Primitives ---

    /// Create a sphere primitive
    fn create_sphere(&mut self, scene: SceneKey, name: &str, diameter: f32) -> Result<PrimitiveKey, EngineError>;

    /// Parent `child` to `parent` (local transforms become relative)
    fn set_parent(&mut self, child: PrimitiveKey, parent: Option<PrimitiveKey>) -> Result<(), EngineError>;

    /// Set the local position of a primitive
    fn set_position(&mut self, primitive: PrimitiveKey, position: Vec3) -> Result<(), EngineError>;

    /// Show or hide a primitive
    fn set_visible(&mut self, primitive: PrimitiveKey, visible: bool) -> Result<(), EngineError>;

    /// Register pointer triggers on a primitive
    fn register_triggers(&mut self, primitive: PrimitiveKey, triggers: Triggers) -> Result<(), EngineError>;

    /// Dispose a primitive; unknown handles are ignored
    fn dispose_primitive(&mut self, primitive: PrimitiveKey);

    // --- Materials ---

    /// Create a material
    fn create_material(&mut self, scene: SceneKey, name: &str, desc: &MaterialDesc) -> Result<MaterialKey, EngineError>;

    /// Clone a material into an independent instance
    fn clone_material(&mut self, material: MaterialKey, name: &str) -> Result<MaterialKey, EngineError>;

    /// Assign a material to a primitive
    fn assign_material(&mut self, primitive: PrimitiveKey, material: MaterialKey) -> Result<(), EngineError>;

    /// Change one property of a material
    fn set_material_property(&mut self, material: MaterialKey, property: MaterialProperty) -> Result<(), EngineError>;

    /// Dispose a material; unknown handles are ignored
    fn dispose_material(&mut self, material: MaterialKey);

    // --- Animation ---

    /// Create an empty animation group
    fn create_animation_group(&mut self, scene: SceneKey, name: &str) -> Result<AnimationGroupKey, EngineError>;

    /// Add a curve targeting a primitive to the group
    ///
    /// Must not restart the group if it is already playing.
    fn add_targeted_animation(
        &mut self,
        group: AnimationGroupKey,
        curve: &AnimationCurve,
        target: PrimitiveKey,
    ) -> Result<(), EngineError>;

    /// Normalize all animations of the group to the frame window `[from, to]`
    fn normalize_animation_group(&mut self, group: AnimationGroupKey, from: f32, to: f32) -> Result<(), EngineError>;

    /// Start playing the group; a no-op for the timeline if it already plays
    fn play_animation_group(&mut self, group: AnimationGroupKey, looped: bool) -> Result<(), EngineError>;

    /// Advance all playing animation groups of the scene by `dt`
    fn advance_animations(&mut self, scene: SceneKey, dt: Duration) -> Result<(), EngineError>;

    // --- Frame ---

    /// Render one frame of the scene
    fn render(&mut self, scene: SceneKey) -> Result<(), EngineError>;

    /// Resize the render target
    fn resize(&mut self, width: u32, height: u32);

    // --- Immersive XR ---

    /// Probe whether an immersive session of `mode` is supported
    async fn is_xr_supported(&mut self, mode: &str) -> bool;

    /// Enter an immersive session
    async fn enter_xr(&mut self, scene: SceneKey, mode: &str, reference_space: &str) -> Result<(), EngineError>;

    /// Leave the immersive session
    async fn exit_xr(&mut self, scene: SceneKey) -> Result<(), EngineError>;
}
