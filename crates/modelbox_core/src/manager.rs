//! Annotations manager
//!
//! Owns the ordered collection of annotations of one viewer together with
//! the material templates and the shared pulse animation, and enforces the
//! optical state machine:
//!
//! - at most one annotation is `Active` at any time
//! - promoting an annotation to `Active` demotes the previous one
//! - showing all annotations resets every one of them to `Inactive`

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;
use modelbox_engine::{PrimitiveKey, RenderEngine, SceneKey};

use crate::annotation::AnnotationSlot;
use crate::{
    Annotation, AnnotationError, AnnotationEvent, AnnotationEventKind, AnnotationKey,
    AnnotationOptions, AnnotationSet, MarkerConfig, MaterialSet, PulseAnimation, PulseConfig,
    VisualState,
};

/// Source of process-wide unique manager ids; 0 is never issued
static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Ordered collection of annotations
pub struct AnnotationsManager {
    /// Stamped into every key this manager issues
    id: u64,
    scene: SceneKey,
    diameter: f32,
    materials: MaterialSet,
    pulse: PulseAnimation,
    /// Annotation storage
    annotations: SlotMap<AnnotationSlot, Annotation>,
    /// Insertion order
    order: Vec<AnnotationKey>,
    active: Option<AnnotationKey>,
    next_seq: u64,
}

impl AnnotationsManager {
    /// Create a manager with the default pulse timing
    pub fn new<E: RenderEngine>(engine: &mut E, scene: SceneKey, markers: &MarkerConfig) -> Result<Self, AnnotationError> {
        Self::with_pulse(engine, scene, markers, &PulseConfig::default())
    }

    /// Create a manager with explicit pulse timing
    pub fn with_pulse<E: RenderEngine>(
        engine: &mut E,
        scene: SceneKey,
        markers: &MarkerConfig,
        pulse: &PulseConfig,
    ) -> Result<Self, AnnotationError> {
        if !engine.has_scene(scene) {
            return Err(modelbox_engine::EngineError::SceneUnavailable.into());
        }
        let materials = MaterialSet::new(engine, scene, markers)?;
        let pulse = match PulseAnimation::new(engine, scene, pulse, markers.opacity) {
            Ok(pulse) => pulse,
            Err(err) => {
                materials.dispose(engine);
                return Err(err);
            }
        };
        Ok(Self {
            id: NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed),
            scene,
            diameter: markers.diameter,
            materials,
            pulse,
            annotations: SlotMap::with_key(),
            order: Vec::new(),
            active: None,
            next_seq: 0,
        })
    }

    // --- Lifecycle ---

    /// Create, draw and animate a new annotation, appended at the end
    ///
    /// Without a caller id the annotation gets `annotation-<n>`.
    pub fn add_annotation<E: RenderEngine>(
        &mut self,
        engine: &mut E,
        options: AnnotationOptions,
    ) -> Result<AnnotationKey, AnnotationError> {
        let id = match options.id.clone() {
            Some(id) => {
                if self.find_by_id(&id).is_some() {
                    return Err(AnnotationError::DuplicateId(id));
                }
                id
            }
            None => self.next_auto_id(),
        };

        let anchor = options.anchor();
        let content = options.content;
        let manager = self.id;
        let slot = self
            .annotations
            .insert_with_key(|slot| Annotation::new(AnnotationKey::new(manager, slot), id, anchor, content));
        let key = AnnotationKey::new(manager, slot);

        if let Err(err) = self.realize(engine, key) {
            if let Some(mut annotation) = self.annotations.remove(slot) {
                annotation.remove(engine);
            }
            return Err(err);
        }

        self.order.push(key);
        if let Some(annotation) = self.get(key) {
            log::debug!("Added annotation '{}' at index {}", annotation.id(), self.order.len() - 1);
        }
        Ok(key)
    }

    /// Draw, style and animate a freshly inserted annotation
    fn realize<E: RenderEngine>(&mut self, engine: &mut E, key: AnnotationKey) -> Result<(), AnnotationError> {
        let slot = self.slot_of(key).ok_or(AnnotationError::Removed)?;
        let annotation = self.annotations.get_mut(slot).ok_or(AnnotationError::Removed)?;
        annotation.draw(engine, self.scene, self.diameter)?;
        annotation.set_material(engine, self.materials.material(VisualState::Inactive))?;
        annotation.set_state(engine, VisualState::Inactive)?;
        let pulse = annotation.pulse().ok_or(AnnotationError::NotDrawn)?;
        self.pulse.attach(engine, pulse)
    }

    fn next_auto_id(&mut self) -> String {
        loop {
            let id = format!("annotation-{}", self.next_seq);
            self.next_seq += 1;
            if self.find_by_id(&id).is_none() {
                return id;
            }
        }
    }

    /// Remove an annotation and release its render resources
    ///
    /// Later annotations shift down by one. Returns false if the key is not
    /// (or no longer) part of this manager.
    pub fn remove_annotation<E: RenderEngine>(&mut self, engine: &mut E, key: AnnotationKey) -> bool {
        let Some(slot) = self.slot_of(key) else {
            return false;
        };
        let Some(mut annotation) = self.annotations.remove(slot) else {
            return false;
        };
        annotation.remove(engine);
        self.order.retain(|k| *k != key);
        if self.active == Some(key) {
            self.active = None;
        }
        log::debug!("Removed annotation '{}'", annotation.id());
        true
    }

    /// Remove every annotation and dispose the material templates
    pub fn dispose<E: RenderEngine>(&mut self, engine: &mut E) {
        for key in std::mem::take(&mut self.order) {
            if let Some(mut annotation) = self.annotations.remove(key.slot()) {
                annotation.remove(engine);
            }
        }
        self.active = None;
        self.materials.dispose(engine);
    }

    // --- Optical state ---

    /// Change the optical state of an annotation
    ///
    /// Unknown keys are ignored.
    pub fn set_annotation_state<E: RenderEngine>(
        &mut self,
        engine: &mut E,
        state: VisualState,
        key: AnnotationKey,
    ) -> Result<(), AnnotationError> {
        if self.get(key).is_none() {
            return Ok(());
        }
        match state {
            VisualState::Active => {
                if let Some(previous) = self.active.filter(|previous| *previous != key) {
                    self.apply_state(engine, previous, VisualState::Inactive)?;
                    // Nothing is active until the promotion below succeeds
                    self.active = None;
                }
                self.apply_state(engine, key, VisualState::Active)?;
                self.active = Some(key);
            }
            VisualState::Hover => {
                self.apply_state(engine, key, VisualState::Hover)?;
            }
            VisualState::Inactive => {
                self.apply_state(engine, key, VisualState::Inactive)?;
                if self.active == Some(key) {
                    self.active = None;
                }
            }
        }
        log::debug!("Annotation state -> {}", state.name());
        Ok(())
    }

    fn apply_state<E: RenderEngine>(
        &mut self,
        engine: &mut E,
        key: AnnotationKey,
        state: VisualState,
    ) -> Result<(), AnnotationError> {
        let template = self.materials.material(state);
        let Some(annotation) = self.get_mut(key) else {
            return Ok(());
        };
        annotation.set_material(engine, template)?;
        annotation.set_state(engine, state)
    }

    /// Reset every annotation to `Inactive` and show it
    pub fn show_all_annotations<E: RenderEngine>(&mut self, engine: &mut E) -> Result<(), AnnotationError> {
        self.active = None;
        for key in self.order.clone() {
            self.apply_state(engine, key, VisualState::Inactive)?;
            if let Some(annotation) = self.get_mut(key) {
                annotation.show(engine)?;
            }
        }
        Ok(())
    }

    /// Hide every annotation
    pub fn hide_all_annotations<E: RenderEngine>(&mut self, engine: &mut E) -> Result<(), AnnotationError> {
        for key in &self.order {
            if let Some(annotation) = self.annotations.get_mut(key.slot()) {
                annotation.hide(engine)?;
            }
        }
        Ok(())
    }

    // --- Events ---

    /// Emit a pointer event from the annotation owning `key`
    pub fn trigger(&mut self, key: AnnotationKey, kind: AnnotationEventKind) -> Option<AnnotationEvent> {
        self.get_mut(key).and_then(|a| a.trigger(kind))
    }

    // --- Queries ---

    /// Annotations in insertion order
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.order.iter().filter_map(|key| self.annotations.get(key.slot()))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> &[AnnotationKey] {
        &self.order
    }

    /// Resolve a key; keys issued by other managers resolve to nothing
    pub fn get(&self, key: AnnotationKey) -> Option<&Annotation> {
        self.annotations.get(self.slot_of(key)?)
    }

    /// Mutable access, e.g. to subscribe to an annotation's events
    pub fn get_mut(&mut self, key: AnnotationKey) -> Option<&mut Annotation> {
        let slot = self.slot_of(key)?;
        self.annotations.get_mut(slot)
    }

    fn slot_of(&self, key: AnnotationKey) -> Option<AnnotationSlot> {
        (key.manager_id() == self.id).then_some(key.slot())
    }

    /// Process-unique id stamped into this manager's keys
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Position of an annotation in insertion order
    pub fn index_of(&self, key: AnnotationKey) -> Option<usize> {
        self.order.iter().position(|k| *k == key)
    }

    /// Find an annotation by its id
    pub fn find_by_id(&self, id: &str) -> Option<AnnotationKey> {
        self.order
            .iter()
            .copied()
            .find(|key| self.get(*key).is_some_and(|a| a.id() == id))
    }

    /// Find the annotation that owns a primitive (body or pulse)
    pub fn annotation_for_primitive(&self, primitive: PrimitiveKey) -> Option<AnnotationKey> {
        self.order
            .iter()
            .copied()
            .find(|key| self.get(*key).is_some_and(|a| a.owns_primitive(primitive)))
    }

    /// The single active annotation, if any
    pub fn active_annotation(&self) -> Option<AnnotationKey> {
        self.active
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Serializable snapshot of the collection
    pub fn to_options(&self) -> AnnotationSet {
        AnnotationSet::new(self.annotations().map(Annotation::to_options).collect())
    }

    /// Scene the annotations live in
    pub fn scene(&self) -> SceneKey {
        self.scene
    }

    pub fn materials(&self) -> &MaterialSet {
        &self.materials
    }

    pub fn pulse(&self) -> &PulseAnimation {
        &self.pulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelbox_engine::{Color3, HeadlessEngine, Vec3};

    fn setup() -> (HeadlessEngine, AnnotationsManager) {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let manager = AnnotationsManager::new(&mut engine, scene, &MarkerConfig::default()).unwrap();
        (engine, manager)
    }

    fn options(x: f32) -> AnnotationOptions {
        AnnotationOptions::new(Vec3::new(x, 0.0, 0.0), Vec3::Y)
    }

    fn body_color(engine: &HeadlessEngine, manager: &AnnotationsManager, key: AnnotationKey) -> Color3 {
        let drawing = manager.get(key).unwrap().drawing().unwrap();
        engine.material_of(drawing).unwrap().emissive_color
    }

    #[test]
    fn test_new_on_disposed_scene_fails() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        engine.dispose_scene(scene);
        let err = AnnotationsManager::new(&mut engine, scene, &MarkerConfig::default()).err().unwrap();
        assert!(err.is_render_unavailable());
    }

    #[test]
    fn test_add_draws_styles_and_animates() {
        let (mut engine, mut manager) = setup();
        let key = manager.add_annotation(&mut engine, options(1.0)).unwrap();

        let annotation = manager.get(key).unwrap();
        assert_eq!(annotation.id(), "annotation-0");
        assert_eq!(annotation.state(), VisualState::Inactive);
        assert!(annotation.is_pulse_visible());
        assert_eq!(body_color(&engine, &manager, key), Color3::RED);

        let group = engine.animation_group(manager.pulse().group()).unwrap();
        assert!(group.playing);
        assert!(group.targets(annotation.pulse().unwrap()));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (mut engine, mut manager) = setup();
        manager.add_annotation(&mut engine, options(1.0).with_id("valve")).unwrap();
        let primitives = engine.primitive_count();

        let err = manager.add_annotation(&mut engine, options(2.0).with_id("valve")).unwrap_err();
        assert_eq!(err, AnnotationError::DuplicateId("valve".to_string()));
        assert_eq!(manager.len(), 1);
        assert_eq!(engine.primitive_count(), primitives);
    }

    #[test]
    fn test_auto_ids_skip_taken_ids() {
        let (mut engine, mut manager) = setup();
        manager.add_annotation(&mut engine, options(1.0).with_id("annotation-0")).unwrap();
        let key = manager.add_annotation(&mut engine, options(2.0)).unwrap();
        assert_eq!(manager.get(key).unwrap().id(), "annotation-1");
    }

    #[test]
    fn test_add_index_remove() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = manager.add_annotation(&mut engine, options(2.0)).unwrap();
        let c = manager.add_annotation(&mut engine, options(3.0)).unwrap();

        assert_eq!(manager.index_of(b), Some(1));
        assert!(manager.remove_annotation(&mut engine, b));
        assert_eq!(manager.index_of(b), None);
        assert_eq!(manager.index_of(c), Some(1));
        assert_eq!(manager.keys(), &[a, c]);
        assert!(!manager.remove_annotation(&mut engine, b));
    }

    #[test]
    fn test_single_active() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = manager.add_annotation(&mut engine, options(2.0)).unwrap();

        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, b).unwrap();

        assert_eq!(manager.active_annotation(), Some(b));
        assert_eq!(manager.get(a).unwrap().state(), VisualState::Inactive);
        assert!(manager.get(a).unwrap().is_pulse_visible());
        assert_eq!(body_color(&engine, &manager, a), Color3::RED);
        assert_eq!(manager.get(b).unwrap().state(), VisualState::Active);
        assert!(!manager.get(b).unwrap().is_pulse_visible());
        assert_eq!(body_color(&engine, &manager, b), Color3::BLUE);
    }

    #[test]
    fn test_reactivating_active_keeps_it() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();
        assert_eq!(manager.active_annotation(), Some(a));
        assert_eq!(manager.get(a).unwrap().state(), VisualState::Active);
    }

    #[test]
    fn test_hover_leaves_active_alone() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = manager.add_annotation(&mut engine, options(2.0)).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Hover, b).unwrap();

        assert_eq!(manager.active_annotation(), Some(a));
        assert_eq!(body_color(&engine, &manager, b), Color3::GREEN);
        assert!(manager.get(b).unwrap().is_pulse_visible());
    }

    #[test]
    fn test_inactive_clears_active() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Inactive, a).unwrap();
        assert_eq!(manager.active_annotation(), None);
    }

    #[test]
    fn test_removing_active_clears_it() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = manager.add_annotation(&mut engine, options(2.0)).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();

        manager.remove_annotation(&mut engine, a);
        assert_eq!(manager.active_annotation(), None);
        assert_eq!(manager.get(b).unwrap().state(), VisualState::Inactive);
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        manager.remove_annotation(&mut engine, a);
        assert!(manager.set_annotation_state(&mut engine, VisualState::Active, a).is_ok());
        assert_eq!(manager.active_annotation(), None);
    }

    #[test]
    fn test_keys_of_other_managers_are_ignored() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let mut first = AnnotationsManager::new(&mut engine, scene, &MarkerConfig::default()).unwrap();
        let mut second = AnnotationsManager::new(&mut engine, scene, &MarkerConfig::default()).unwrap();
        assert_ne!(first.id(), second.id());

        let a = first.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = second.add_annotation(&mut engine, options(2.0)).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.manager_id(), first.id());

        assert!(second.get(a).is_none());
        assert_eq!(second.index_of(a), None);
        assert!(second.set_annotation_state(&mut engine, VisualState::Active, a).is_ok());
        assert_eq!(second.active_annotation(), None);
        assert!(!second.remove_annotation(&mut engine, a));

        assert_eq!(second.len(), 1);
        assert_eq!(second.index_of(b), Some(0));
        assert_eq!(first.index_of(a), Some(0));
    }

    #[test]
    fn test_failed_promotion_leaves_nothing_active() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = manager.add_annotation(&mut engine, options(2.0)).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();

        let pulse = manager.get(b).unwrap().pulse().unwrap();
        engine.dispose_primitive(pulse);

        assert!(manager.set_annotation_state(&mut engine, VisualState::Active, b).is_err());
        assert_eq!(manager.active_annotation(), None);
        assert_eq!(manager.get(a).unwrap().state(), VisualState::Inactive);
    }

    #[test]
    fn test_show_all_resets_state() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let b = manager.add_annotation(&mut engine, options(2.0)).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Active, a).unwrap();
        manager.set_annotation_state(&mut engine, VisualState::Hover, b).unwrap();

        manager.hide_all_annotations(&mut engine).unwrap();
        manager.hide_all_annotations(&mut engine).unwrap();
        assert!(manager.annotations().all(|x| !x.is_visible()));

        manager.show_all_annotations(&mut engine).unwrap();
        assert_eq!(manager.active_annotation(), None);
        for annotation in manager.annotations() {
            assert!(annotation.is_visible());
            assert!(annotation.is_pulse_visible());
            assert_eq!(annotation.state(), VisualState::Inactive);
        }
        assert_eq!(body_color(&engine, &manager, a), Color3::RED);
        assert_eq!(body_color(&engine, &manager, b), Color3::RED);
    }

    #[test]
    fn test_annotation_for_primitive() {
        let (mut engine, mut manager) = setup();
        let a = manager.add_annotation(&mut engine, options(1.0)).unwrap();
        let pulse = manager.get(a).unwrap().pulse().unwrap();
        let drawing = manager.get(a).unwrap().drawing().unwrap();
        assert_eq!(manager.annotation_for_primitive(pulse), Some(a));
        assert_eq!(manager.annotation_for_primitive(drawing), Some(a));
    }

    #[test]
    fn test_to_options_round_trip() {
        let (mut engine, mut manager) = setup();
        manager
            .add_annotation(&mut engine, options(1.0).with_id("valve").with_content(serde_json::json!("Inlet")))
            .unwrap();
        let set = manager.to_options();
        assert_eq!(set.len(), 1);
        assert_eq!(set.annotations[0].id.as_deref(), Some("valve"));
        assert_eq!(set.annotations[0].content, serde_json::json!("Inlet"));
    }

    #[test]
    fn test_dispose_releases_everything() {
        let (mut engine, mut manager) = setup();
        manager.add_annotation(&mut engine, options(1.0)).unwrap();
        manager.add_annotation(&mut engine, options(2.0)).unwrap();
        manager.dispose(&mut engine);
        assert!(manager.is_empty());
        assert_eq!(engine.primitive_count(), 0);
        assert_eq!(engine.material_count(), 0);
    }
}
