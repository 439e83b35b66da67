//! Headless engine
//!
//! An in-memory scene graph implementing [`RenderEngine`]. Nothing is drawn:
//! primitives, materials and animation groups are plain records whose state
//! can be inspected, which makes the engine usable for tests, for the demo
//! binary and for hosts without a GPU.
//!
//! Picking uses an orthographic ray: screen coordinates `(x, y)` map to the
//! world-space ray starting at `(x, y, RAY_ORIGIN_Z)` travelling along `-Z`.
//! Only sphere primitives are hit-testable, and model meshes are registered
//! as spheres with [`MeshDesc`].

use std::collections::HashMap;
use std::time::Duration;
use slotmap::SlotMap;
use modelbox_math::{Color3, Vec3};

use crate::animation::{AnimatedProperty, AnimationCurve, AnimationValue};
use crate::engine::RenderEngine;
use crate::error::EngineError;
use crate::handles::{AnimationGroupKey, CameraKey, LightKey, MaterialKey, PrimitiveKey, SceneKey};
use crate::types::{
    CameraDesc, ImportProgress, ImportedModel, LightDesc, MaterialDesc, MaterialProperty,
    PickHit, PointerEvent, TriggerEvent, Triggers,
};

/// Z coordinate pick rays start from
const RAY_ORIGIN_Z: f32 = 1000.0;

/// Simulated download size per imported mesh, in bytes
const MESH_BYTES: u64 = 64 * 1024;

/// Distances closer than this are treated as the same hit
const PICK_EPSILON: f32 = 1e-5;

/// A model mesh registered with the headless engine
#[derive(Clone, Debug, PartialEq)]
pub struct MeshDesc {
    /// Mesh id (unique within the model)
    pub name: String,
    /// Sphere center
    pub center: Vec3,
    /// Sphere radius
    pub radius: f32,
    /// Whether the mesh accepts picks
    pub pickable: bool,
}

impl MeshDesc {
    /// Create a pickable spherical mesh
    pub fn new(name: impl Into<String>, center: Vec3, radius: f32) -> Self {
        Self {
            name: name.into(),
            center,
            radius,
            pickable: true,
        }
    }

    /// Mark the mesh as non-pickable
    pub fn non_pickable(mut self) -> Self {
        self.pickable = false;
        self
    }
}

/// Geometry of a primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveShape {
    /// Transform-only node without geometry
    Node,
    /// Sphere with the given diameter
    Sphere { diameter: f32 },
}

/// Inspectable state of a primitive
#[derive(Clone, Debug)]
pub struct PrimitiveState {
    pub scene: SceneKey,
    pub name: String,
    pub shape: PrimitiveShape,
    /// Local position (relative to the parent)
    pub position: Vec3,
    pub scaling: Vec3,
    pub parent: Option<PrimitiveKey>,
    pub visible: bool,
    pub pickable: bool,
    pub material: Option<MaterialKey>,
    pub triggers: Triggers,
    /// Creation order, used to break pick ties (later wins)
    order: u64,
}

/// Inspectable state of a material
#[derive(Clone, Debug)]
pub struct MaterialState {
    pub scene: SceneKey,
    pub name: String,
    pub emissive_color: Color3,
    pub alpha: f32,
    pub disable_lighting: bool,
}

/// Inspectable state of an animation group
#[derive(Clone, Debug)]
pub struct AnimationGroupState {
    pub scene: SceneKey,
    pub name: String,
    /// Start of the normalized frame window
    pub from: f32,
    /// End of the normalized frame window
    pub to: f32,
    /// Current frame of the group timeline
    pub frame: f32,
    pub playing: bool,
    pub looped: bool,
    frame_rate: f32,
    targeted: Vec<(AnimationCurve, PrimitiveKey)>,
}

impl AnimationGroupState {
    /// Number of targeted animations (curve + target pairs)
    pub fn targeted_count(&self) -> usize {
        self.targeted.len()
    }

    /// Check whether any animation of the group targets `primitive`
    pub fn targets(&self, primitive: PrimitiveKey) -> bool {
        self.targeted.iter().any(|(_, t)| *t == primitive)
    }

    fn step(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        self.frame += dt.as_secs_f32() * self.frame_rate;
        if self.frame > self.to {
            let span = self.to - self.from;
            if self.looped && span > 0.0 {
                self.frame = self.from + (self.frame - self.from) % span;
            } else {
                self.frame = self.to;
                self.playing = false;
            }
        }
    }
}

/// Inspectable state of a camera
#[derive(Clone, Debug)]
pub struct CameraState {
    pub scene: SceneKey,
    pub desc: CameraDesc,
    pub auto_rotation: Option<f32>,
}

/// Inspectable state of a light
#[derive(Clone, Debug)]
pub struct LightState {
    pub scene: SceneKey,
    pub desc: LightDesc,
}

#[derive(Debug, Default)]
struct SceneState {
    frames_rendered: u64,
    hovered: Option<PrimitiveKey>,
}

/// In-memory implementation of [`RenderEngine`]
pub struct HeadlessEngine {
    scenes: SlotMap<SceneKey, SceneState>,
    primitives: SlotMap<PrimitiveKey, PrimitiveState>,
    materials: SlotMap<MaterialKey, MaterialState>,
    groups: SlotMap<AnimationGroupKey, AnimationGroupState>,
    cameras: SlotMap<CameraKey, CameraState>,
    lights: SlotMap<LightKey, LightState>,
    /// Models available for import, by url
    models: HashMap<String, Vec<MeshDesc>>,
    xr_supported: bool,
    in_xr: Option<SceneKey>,
    viewport: (u32, u32),
    next_order: u64,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    /// Create an engine with no registered models and no XR support
    pub fn new() -> Self {
        Self {
            scenes: SlotMap::with_key(),
            primitives: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            groups: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            models: HashMap::new(),
            xr_supported: false,
            in_xr: None,
            viewport: (0, 0),
            next_order: 0,
        }
    }

    /// Register a model that can be imported from `url`
    pub fn with_model(mut self, url: impl Into<String>, meshes: Vec<MeshDesc>) -> Self {
        self.register_model(url, meshes);
        self
    }

    /// Enable or disable immersive XR support
    pub fn with_xr_support(mut self, supported: bool) -> Self {
        self.xr_supported = supported;
        self
    }

    /// Register a model that can be imported from `url`
    pub fn register_model(&mut self, url: impl Into<String>, meshes: Vec<MeshDesc>) {
        self.models.insert(url.into(), meshes);
    }

    /// Change XR support at runtime (e.g. a headset being unplugged)
    pub fn set_xr_supported(&mut self, supported: bool) {
        self.xr_supported = supported;
    }

    // --- Inspection ---

    /// Get a primitive's state
    pub fn primitive(&self, key: PrimitiveKey) -> Option<&PrimitiveState> {
        self.primitives.get(key)
    }

    /// Get a material's state
    pub fn material(&self, key: MaterialKey) -> Option<&MaterialState> {
        self.materials.get(key)
    }

    /// Material currently assigned to a primitive
    pub fn material_of(&self, primitive: PrimitiveKey) -> Option<&MaterialState> {
        self.primitives
            .get(primitive)
            .and_then(|p| p.material)
            .and_then(|m| self.materials.get(m))
    }

    /// Get an animation group's state
    pub fn animation_group(&self, key: AnimationGroupKey) -> Option<&AnimationGroupState> {
        self.groups.get(key)
    }

    /// Get a camera's state
    pub fn camera(&self, key: CameraKey) -> Option<&CameraState> {
        self.cameras.get(key)
    }

    /// Get a light's state
    pub fn light(&self, key: LightKey) -> Option<&LightState> {
        self.lights.get(key)
    }

    /// Number of live primitives across all scenes
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Number of live materials across all scenes
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of frames rendered for a scene
    pub fn frames_rendered(&self, scene: SceneKey) -> u64 {
        self.scenes.get(scene).map(|s| s.frames_rendered).unwrap_or(0)
    }

    /// Scene currently presented in an immersive session
    pub fn xr_scene(&self) -> Option<SceneKey> {
        self.in_xr
    }

    /// Current render target size
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Change pickability of a primitive
    pub fn set_pickable(&mut self, primitive: PrimitiveKey, pickable: bool) -> Result<(), EngineError> {
        let p = self.primitives.get_mut(primitive).ok_or(EngineError::PrimitiveUnavailable)?;
        p.pickable = pickable;
        Ok(())
    }

    // --- Internals ---

    fn insert_primitive(&mut self, scene: SceneKey, name: &str, shape: PrimitiveShape) -> PrimitiveKey {
        let order = self.next_order;
        self.next_order += 1;
        self.primitives.insert(PrimitiveState {
            scene,
            name: name.to_string(),
            shape,
            position: Vec3::ZERO,
            scaling: Vec3::ONE,
            parent: None,
            visible: true,
            pickable: true,
            material: None,
            triggers: Triggers::empty(),
            order,
        })
    }

    /// World-space center and uniform scale of a primitive
    fn world_transform(&self, key: PrimitiveKey) -> Option<(Vec3, f32)> {
        let p = self.primitives.get(key)?;
        let mut center = p.position;
        let mut scale = p.scaling.x;
        let mut parent = p.parent;
        while let Some(parent_key) = parent {
            let pp = self.primitives.get(parent_key)?;
            center = pp.position + center * pp.scaling.x;
            scale *= pp.scaling.x;
            parent = pp.parent;
        }
        Some((center, scale))
    }

    fn is_descendant_of(&self, key: PrimitiveKey, ancestor: PrimitiveKey) -> bool {
        let mut current = self.primitives.get(key).and_then(|p| p.parent);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.primitives.get(k).and_then(|p| p.parent);
        }
        false
    }

    fn hover_triggers() -> Triggers {
        Triggers::POINTER_OVER | Triggers::POINTER_OUT
    }

    fn triggers_of(&self, primitive: PrimitiveKey) -> Triggers {
        self.primitives.get(primitive).map(|p| p.triggers).unwrap_or_default()
    }
}

impl RenderEngine for HeadlessEngine {
    fn create_scene(&mut self) -> SceneKey {
        self.scenes.insert(SceneState::default())
    }

    fn dispose_scene(&mut self, scene: SceneKey) {
        if self.scenes.remove(scene).is_none() {
            return;
        }
        self.primitives.retain(|_, p| p.scene != scene);
        self.materials.retain(|_, m| m.scene != scene);
        self.groups.retain(|_, g| g.scene != scene);
        self.cameras.retain(|_, c| c.scene != scene);
        self.lights.retain(|_, l| l.scene != scene);
        if self.in_xr == Some(scene) {
            self.in_xr = None;
        }
    }

    fn has_scene(&self, scene: SceneKey) -> bool {
        self.scenes.contains_key(scene)
    }

    async fn import_model(
        &mut self,
        scene: SceneKey,
        url: &str,
        on_progress: &mut dyn FnMut(ImportProgress),
    ) -> Result<ImportedModel, EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        let meshes = self
            .models
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::ImportFailed(format!("no model available at '{}'", url)))?;

        let total = meshes.len() as u64 * MESH_BYTES;
        let root = self.insert_primitive(scene, "__root__", PrimitiveShape::Node);
        let mut imported = ImportedModel {
            root: Some(root),
            meshes: Vec::with_capacity(meshes.len()),
            mesh_ids: Vec::with_capacity(meshes.len()),
        };

        for (i, mesh) in meshes.iter().enumerate() {
            let key = self.insert_primitive(
                scene,
                &mesh.name,
                PrimitiveShape::Sphere { diameter: mesh.radius * 2.0 },
            );
            if let Some(p) = self.primitives.get_mut(key) {
                p.position = mesh.center;
                p.parent = Some(root);
                p.pickable = mesh.pickable;
            }
            imported.meshes.push(key);
            imported.mesh_ids.push(mesh.name.clone());
            on_progress(ImportProgress {
                loaded: (i as u64 + 1) * MESH_BYTES,
                total: Some(total),
            });
        }

        log::debug!("Imported '{}' with {} meshes", url, imported.meshes.len());
        Ok(imported)
    }

    fn create_camera(&mut self, scene: SceneKey, desc: &CameraDesc) -> Result<CameraKey, EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        Ok(self.cameras.insert(CameraState {
            scene,
            desc: *desc,
            auto_rotation: None,
        }))
    }

    fn set_auto_rotation(&mut self, camera: CameraKey, speed: Option<f32>) -> Result<(), EngineError> {
        let c = self.cameras.get_mut(camera).ok_or(EngineError::CameraUnavailable)?;
        c.auto_rotation = speed;
        Ok(())
    }

    fn create_light(&mut self, scene: SceneKey, desc: &LightDesc) -> Result<LightKey, EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        Ok(self.lights.insert(LightState { scene, desc: *desc }))
    }

    fn pick(&self, scene: SceneKey, x: f32, y: f32) -> Option<PickHit> {
        let mut best: Option<(f32, u64, PickHit)> = None;

        for (key, p) in self.primitives.iter() {
            if p.scene != scene || !p.visible {
                continue;
            }
            let PrimitiveShape::Sphere { diameter } = p.shape else {
                continue;
            };
            let Some((center, scale)) = self.world_transform(key) else {
                continue;
            };
            let radius = diameter * 0.5 * scale;
            let dx = x - center.x;
            let dy = y - center.y;
            let d2 = dx * dx + dy * dy;
            if d2 > radius * radius {
                continue;
            }
            let z = center.z + (radius * radius - d2).sqrt();
            let distance = RAY_ORIGIN_Z - z;
            let point = Vec3::new(x, y, z);
            let hit = PickHit {
                primitive: key,
                point,
                normal: (point - center).normalized(),
                pickable: p.pickable,
            };

            let better = match &best {
                None => true,
                Some((best_distance, best_order, _)) => {
                    distance < best_distance - PICK_EPSILON
                        || ((distance - best_distance).abs() <= PICK_EPSILON && p.order > *best_order)
                }
            };
            if better {
                best = Some((distance, p.order, hit));
            }
        }

        best.map(|(_, _, hit)| hit)
    }

    fn pointer_event(&mut self, scene: SceneKey, event: PointerEvent) -> Vec<TriggerEvent> {
        let mut fired = Vec::new();
        let Some(previous) = self.scenes.get(scene).map(|s| s.hovered) else {
            return fired;
        };

        let hovered = match event {
            PointerEvent::Move { x, y } => self
                .pick(scene, x, y)
                .map(|hit| hit.primitive)
                .filter(|key| self.triggers_of(*key).intersects(Self::hover_triggers())),
            PointerEvent::Click { x, y } => {
                if let Some(hit) = self.pick(scene, x, y) {
                    if self.triggers_of(hit.primitive).contains(Triggers::PICK) {
                        fired.push(TriggerEvent { primitive: hit.primitive, trigger: Triggers::PICK });
                    }
                }
                return fired;
            }
            PointerEvent::Leave => None,
        };

        if hovered != previous {
            if let Some(old) = previous {
                if self.triggers_of(old).contains(Triggers::POINTER_OUT) {
                    fired.push(TriggerEvent { primitive: old, trigger: Triggers::POINTER_OUT });
                }
            }
            if let Some(new) = hovered {
                if self.triggers_of(new).contains(Triggers::POINTER_OVER) {
                    fired.push(TriggerEvent { primitive: new, trigger: Triggers::POINTER_OVER });
                }
            }
            if let Some(s) = self.scenes.get_mut(scene) {
                s.hovered = hovered;
            }
        }
        fired
    }

    fn create_sphere(&mut self, scene: SceneKey, name: &str, diameter: f32) -> Result<PrimitiveKey, EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        Ok(self.insert_primitive(scene, name, PrimitiveShape::Sphere { diameter }))
    }

    fn set_parent(&mut self, child: PrimitiveKey, parent: Option<PrimitiveKey>) -> Result<(), EngineError> {
        if let Some(parent) = parent {
            if !self.primitives.contains_key(parent) || parent == child || self.is_descendant_of(parent, child) {
                return Err(EngineError::PrimitiveUnavailable);
            }
        }
        let p = self.primitives.get_mut(child).ok_or(EngineError::PrimitiveUnavailable)?;
        p.parent = parent;
        Ok(())
    }

    fn set_position(&mut self, primitive: PrimitiveKey, position: Vec3) -> Result<(), EngineError> {
        let p = self.primitives.get_mut(primitive).ok_or(EngineError::PrimitiveUnavailable)?;
        p.position = position;
        Ok(())
    }

    fn set_visible(&mut self, primitive: PrimitiveKey, visible: bool) -> Result<(), EngineError> {
        let p = self.primitives.get_mut(primitive).ok_or(EngineError::PrimitiveUnavailable)?;
        p.visible = visible;
        Ok(())
    }

    fn register_triggers(&mut self, primitive: PrimitiveKey, triggers: Triggers) -> Result<(), EngineError> {
        let p = self.primitives.get_mut(primitive).ok_or(EngineError::PrimitiveUnavailable)?;
        p.triggers |= triggers;
        Ok(())
    }

    fn dispose_primitive(&mut self, primitive: PrimitiveKey) {
        let mut doomed = vec![primitive];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i];
            doomed.extend(
                self.primitives
                    .iter()
                    .filter(|(_, p)| p.parent == Some(current))
                    .map(|(k, _)| k),
            );
            i += 1;
        }
        for key in doomed {
            if let Some(p) = self.primitives.remove(key) {
                if let Some(s) = self.scenes.get_mut(p.scene) {
                    if s.hovered == Some(key) {
                        s.hovered = None;
                    }
                }
            }
        }
    }

    fn create_material(&mut self, scene: SceneKey, name: &str, desc: &MaterialDesc) -> Result<MaterialKey, EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        Ok(self.materials.insert(MaterialState {
            scene,
            name: name.to_string(),
            emissive_color: desc.emissive_color,
            alpha: desc.alpha,
            disable_lighting: desc.disable_lighting,
        }))
    }

    fn clone_material(&mut self, material: MaterialKey, name: &str) -> Result<MaterialKey, EngineError> {
        let mut copy = self.materials.get(material).cloned().ok_or(EngineError::MaterialUnavailable)?;
        copy.name = name.to_string();
        Ok(self.materials.insert(copy))
    }

    fn assign_material(&mut self, primitive: PrimitiveKey, material: MaterialKey) -> Result<(), EngineError> {
        if !self.materials.contains_key(material) {
            return Err(EngineError::MaterialUnavailable);
        }
        let p = self.primitives.get_mut(primitive).ok_or(EngineError::PrimitiveUnavailable)?;
        p.material = Some(material);
        Ok(())
    }

    fn set_material_property(&mut self, material: MaterialKey, property: MaterialProperty) -> Result<(), EngineError> {
        let m = self.materials.get_mut(material).ok_or(EngineError::MaterialUnavailable)?;
        match property {
            MaterialProperty::EmissiveColor(color) => m.emissive_color = color,
            MaterialProperty::Alpha(alpha) => m.alpha = alpha,
        }
        Ok(())
    }

    fn dispose_material(&mut self, material: MaterialKey) {
        if self.materials.remove(material).is_some() {
            for (_, p) in self.primitives.iter_mut() {
                if p.material == Some(material) {
                    p.material = None;
                }
            }
        }
    }

    fn create_animation_group(&mut self, scene: SceneKey, name: &str) -> Result<AnimationGroupKey, EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        Ok(self.groups.insert(AnimationGroupState {
            scene,
            name: name.to_string(),
            from: 0.0,
            to: 0.0,
            frame: 0.0,
            playing: false,
            looped: false,
            frame_rate: 0.0,
            targeted: Vec::new(),
        }))
    }

    fn add_targeted_animation(
        &mut self,
        group: AnimationGroupKey,
        curve: &AnimationCurve,
        target: PrimitiveKey,
    ) -> Result<(), EngineError> {
        if !self.primitives.contains_key(target) {
            return Err(EngineError::PrimitiveUnavailable);
        }
        let g = self.groups.get_mut(group).ok_or(EngineError::AnimationGroupUnavailable)?;
        if g.targeted.is_empty() && !g.playing {
            g.frame_rate = curve.frame_rate;
            g.to = g.to.max(curve.last_frame());
        }
        g.targeted.push((curve.clone(), target));
        Ok(())
    }

    fn normalize_animation_group(&mut self, group: AnimationGroupKey, from: f32, to: f32) -> Result<(), EngineError> {
        let g = self.groups.get_mut(group).ok_or(EngineError::AnimationGroupUnavailable)?;
        g.from = from;
        g.to = to;
        if g.frame < from || g.frame > to {
            g.frame = from;
        }
        Ok(())
    }

    fn play_animation_group(&mut self, group: AnimationGroupKey, looped: bool) -> Result<(), EngineError> {
        let g = self.groups.get_mut(group).ok_or(EngineError::AnimationGroupUnavailable)?;
        g.looped = looped;
        if !g.playing {
            g.playing = true;
            g.frame = g.from;
        }
        Ok(())
    }

    fn advance_animations(&mut self, scene: SceneKey, dt: Duration) -> Result<(), EngineError> {
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        let keys: Vec<AnimationGroupKey> = self
            .groups
            .iter()
            .filter(|(_, g)| g.scene == scene && g.playing)
            .map(|(k, _)| k)
            .collect();

        for key in keys {
            let primitives = &self.primitives;
            let Some(group) = self.groups.get_mut(key) else {
                continue;
            };
            // Disposed targets drop out of the group on their own
            group.targeted.retain(|(_, target)| primitives.contains_key(*target));
            group.step(dt);

            let frame = group.frame;
            let samples: Vec<(PrimitiveKey, AnimatedProperty, AnimationValue)> = group
                .targeted
                .iter()
                .filter_map(|(curve, target)| curve.sample(frame).map(|v| (*target, curve.property, v)))
                .collect();

            for (target, property, value) in samples {
                let Some(p) = self.primitives.get_mut(target) else {
                    continue;
                };
                match (property, value) {
                    (AnimatedProperty::Scaling, AnimationValue::Vector3(v)) => p.scaling = v,
                    (AnimatedProperty::Scaling, AnimationValue::Float(f)) => p.scaling = Vec3::splat(f),
                    (AnimatedProperty::MaterialAlpha, AnimationValue::Float(alpha)) => {
                        if let Some(m) = p.material.and_then(|m| self.materials.get_mut(m)) {
                            m.alpha = alpha;
                        }
                    }
                    (AnimatedProperty::MaterialAlpha, AnimationValue::Vector3(_)) => {}
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, scene: SceneKey) -> Result<(), EngineError> {
        let s = self.scenes.get_mut(scene).ok_or(EngineError::SceneUnavailable)?;
        s.frames_rendered += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    async fn is_xr_supported(&mut self, mode: &str) -> bool {
        log::debug!("Probing XR support for '{}'", mode);
        self.xr_supported
    }

    async fn enter_xr(&mut self, scene: SceneKey, mode: &str, reference_space: &str) -> Result<(), EngineError> {
        if !self.xr_supported {
            return Err(EngineError::XrUnsupported);
        }
        if !self.has_scene(scene) {
            return Err(EngineError::SceneUnavailable);
        }
        log::debug!("Entering XR session '{}' ({})", mode, reference_space);
        self.in_xr = Some(scene);
        Ok(())
    }

    async fn exit_xr(&mut self, scene: SceneKey) -> Result<(), EngineError> {
        if self.in_xr == Some(scene) {
            self.in_xr = None;
        }
        Ok(())
    }
}
