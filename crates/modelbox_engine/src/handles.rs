//! Generational handles to engine resources

use slotmap::new_key_type;

new_key_type! {
    /// Key to a scene owned by the engine
    pub struct SceneKey;

    /// Key to a renderable primitive (mesh) in a scene
    ///
    /// Uses generational indexing: once a primitive is disposed and its slot
    /// reused, old keys return None instead of pointing at the new primitive.
    pub struct PrimitiveKey;

    /// Key to a material instance
    pub struct MaterialKey;

    /// Key to an animation group
    pub struct AnimationGroupKey;

    /// Key to a camera
    pub struct CameraKey;

    /// Key to a light
    pub struct LightKey;
}
