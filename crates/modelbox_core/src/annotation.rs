//! Annotation type
//!
//! An Annotation is a marker anchored to a model surface. Once drawn it owns
//! two engine primitives:
//!
//! - the *drawing*, the marker body sitting on the surface
//! - the *pulse*, a child sphere that the shared pulse animation scales and
//!   fades to attract attention
//!
//! Both primitives get private clones of the style material, so per-marker
//! tweaks never leak into siblings or into the shared templates.

use slotmap::new_key_type;
use modelbox_engine::{
    MaterialKey, MaterialProperty, PrimitiveKey, RenderEngine, SceneKey, Triggers,
};

use crate::{AnnotationError, AnnotationOptions, EventEmitter, ListenerId, SpatialAnchor};

new_key_type! {
    /// Storage slot of an annotation inside its manager
    pub(crate) struct AnnotationSlot;
}

/// Identity of an annotation
///
/// A key pairs the owning manager's id with a generational slot. After an
/// annotation is removed its key resolves to nothing, even if the slot is
/// reused, and a key never resolves in any manager other than its owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnnotationKey {
    manager: u64,
    slot: AnnotationSlot,
}

impl AnnotationKey {
    pub(crate) fn new(manager: u64, slot: AnnotationSlot) -> Self {
        Self { manager, slot }
    }

    /// Id of the manager that issued this key
    pub fn manager_id(self) -> u64 {
        self.manager
    }

    pub(crate) fn slot(self) -> AnnotationSlot {
        self.slot
    }
}

/// Optical state of an annotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Idle marker, pulsing
    #[default]
    Inactive,
    /// Pointer is over the marker, pulsing
    Hover,
    /// Selected marker, steady highlight without pulse
    Active,
}

impl VisualState {
    /// All states
    pub const ALL: [VisualState; 3] = [VisualState::Inactive, VisualState::Hover, VisualState::Active];

    /// Lowercase state name (`inactive`, `hover`, `active`)
    pub fn name(self) -> &'static str {
        match self {
            VisualState::Inactive => "inactive",
            VisualState::Hover => "hover",
            VisualState::Active => "active",
        }
    }

    /// Parse a state name; unknown names map to `Inactive`
    pub fn from_name(name: &str) -> Self {
        match name {
            "active" => VisualState::Active,
            "hover" => VisualState::Hover,
            _ => VisualState::Inactive,
        }
    }

    /// Whether markers in this state show their pulse
    pub fn has_pulse(self) -> bool {
        !matches!(self, VisualState::Active)
    }
}

/// Kind of pointer interaction on an annotation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotationEventKind {
    Picked,
    PointerOver,
    PointerOut,
}

impl AnnotationEventKind {
    /// Map an engine trigger to an event kind
    pub fn from_trigger(trigger: Triggers) -> Option<Self> {
        if trigger == Triggers::PICK {
            Some(AnnotationEventKind::Picked)
        } else if trigger == Triggers::POINTER_OVER {
            Some(AnnotationEventKind::PointerOver)
        } else if trigger == Triggers::POINTER_OUT {
            Some(AnnotationEventKind::PointerOut)
        } else {
            None
        }
    }

    /// Event name as seen by the host (`picked`, `pointerover`, `pointerout`)
    pub fn name(self) -> &'static str {
        match self {
            AnnotationEventKind::Picked => "picked",
            AnnotationEventKind::PointerOver => "pointerover",
            AnnotationEventKind::PointerOut => "pointerout",
        }
    }
}

/// Event emitted by an annotation
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationEvent {
    pub kind: AnnotationEventKind,
    pub annotation: AnnotationKey,
    pub id: String,
}

/// Render resources of a drawn annotation
#[derive(Clone, Copy, Debug)]
struct Marker {
    scene: SceneKey,
    drawing: PrimitiveKey,
    pulse: PrimitiveKey,
    /// Private material clones (drawing, pulse)
    materials: Option<(MaterialKey, MaterialKey)>,
}

#[derive(Clone, Copy, Debug)]
enum RenderState {
    Inert,
    Drawn(Marker),
    Removed,
}

/// A marker on the model
pub struct Annotation {
    key: AnnotationKey,
    id: String,
    anchor: SpatialAnchor,
    content: serde_json::Value,
    state: VisualState,
    visible: bool,
    render: RenderState,
    events: EventEmitter<AnnotationEvent>,
}

impl Annotation {
    /// Create an inert annotation (not drawn yet)
    pub fn new(key: AnnotationKey, id: impl Into<String>, anchor: SpatialAnchor, content: serde_json::Value) -> Self {
        Self {
            key,
            id: id.into(),
            anchor,
            content,
            state: VisualState::Inactive,
            visible: true,
            render: RenderState::Inert,
            events: EventEmitter::new(),
        }
    }

    // --- Accessors ---

    pub fn key(&self) -> AnnotationKey {
        self.key
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn anchor(&self) -> SpatialAnchor {
        self.anchor
    }

    pub fn content(&self) -> &serde_json::Value {
        &self.content
    }

    /// Current optical state
    pub fn state(&self) -> VisualState {
        self.state
    }

    /// Whether the annotation is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the pulse primitive is currently shown
    pub fn is_pulse_visible(&self) -> bool {
        self.visible && self.state.has_pulse() && self.is_drawn()
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self.render, RenderState::Drawn(_))
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.render, RenderState::Removed)
    }

    /// Marker body primitive
    pub fn drawing(&self) -> Option<PrimitiveKey> {
        self.marker().map(|m| m.drawing)
    }

    /// Pulse primitive
    pub fn pulse(&self) -> Option<PrimitiveKey> {
        self.marker().map(|m| m.pulse)
    }

    /// Private material clones of (drawing, pulse)
    pub fn materials(&self) -> Option<(MaterialKey, MaterialKey)> {
        self.marker().and_then(|m| m.materials)
    }

    /// Check whether `primitive` is one of this annotation's primitives
    pub fn owns_primitive(&self, primitive: PrimitiveKey) -> bool {
        self.marker()
            .map(|m| m.drawing == primitive || m.pulse == primitive)
            .unwrap_or(false)
    }

    /// Options that recreate this annotation
    pub fn to_options(&self) -> AnnotationOptions {
        AnnotationOptions::from_anchor(self.anchor)
            .with_id(self.id.clone())
            .with_content(self.content.clone())
    }

    fn marker(&self) -> Option<&Marker> {
        match &self.render {
            RenderState::Drawn(marker) => Some(marker),
            _ => None,
        }
    }

    fn drawn_marker(&self) -> Result<Marker, AnnotationError> {
        match self.render {
            RenderState::Drawn(marker) => Ok(marker),
            RenderState::Inert => Err(AnnotationError::NotDrawn),
            RenderState::Removed => Err(AnnotationError::Removed),
        }
    }

    // --- Events ---

    /// Subscribe to this annotation's events
    pub fn on(&mut self, listener: impl FnMut(&AnnotationEvent) + 'static) -> ListenerId {
        self.events.on(listener)
    }

    /// Unsubscribe a listener
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Emit an event from this annotation
    ///
    /// Removed annotations stay silent.
    pub fn trigger(&mut self, kind: AnnotationEventKind) -> Option<AnnotationEvent> {
        if self.is_removed() {
            return None;
        }
        let event = AnnotationEvent {
            kind,
            annotation: self.key,
            id: self.id.clone(),
        };
        self.events.trigger(&event);
        Some(event)
    }

    // --- Rendering ---

    /// Allocate the marker body and its pulse in `scene`
    ///
    /// The body sits on the anchor, pushed out along the surface normal by
    /// half its diameter so it rests on the surface instead of intersecting
    /// it. The pulse is parented to the body and carries the pointer
    /// triggers.
    pub fn draw<E: RenderEngine>(&mut self, engine: &mut E, scene: SceneKey, diameter: f32) -> Result<(), AnnotationError> {
        match self.render {
            RenderState::Drawn(_) => return Err(AnnotationError::AlreadyDrawn),
            RenderState::Removed => return Err(AnnotationError::Removed),
            RenderState::Inert => {}
        }
        if !engine.has_scene(scene) {
            return Err(modelbox_engine::EngineError::SceneUnavailable.into());
        }

        let drawing = engine.create_sphere(scene, &format!("annotation_{}", self.id), diameter)?;
        let pulse = match Self::build_pulse(engine, scene, drawing, &self.id, diameter) {
            Ok(pulse) => pulse,
            Err(err) => {
                engine.dispose_primitive(drawing);
                return Err(err);
            }
        };
        if let Err(err) = engine.set_position(drawing, self.anchor.offset(diameter / 2.0)) {
            engine.dispose_primitive(drawing);
            return Err(err.into());
        }

        self.render = RenderState::Drawn(Marker {
            scene,
            drawing,
            pulse,
            materials: None,
        });
        self.apply_visibility(engine)?;
        log::debug!("Drew annotation '{}'", self.id);
        Ok(())
    }

    fn build_pulse<E: RenderEngine>(
        engine: &mut E,
        scene: SceneKey,
        drawing: PrimitiveKey,
        id: &str,
        diameter: f32,
    ) -> Result<PrimitiveKey, AnnotationError> {
        let pulse = engine.create_sphere(scene, &format!("pulse_of_annotation_{}", id), diameter)?;
        let wired = engine
            .set_parent(pulse, Some(drawing))
            .and_then(|_| engine.register_triggers(pulse, Triggers::PICK | Triggers::POINTER_OVER | Triggers::POINTER_OUT));
        if let Err(err) = wired {
            // Not reachable through the drawing unless parenting succeeded
            engine.dispose_primitive(pulse);
            return Err(err.into());
        }
        Ok(pulse)
    }

    /// Clone `template` independently onto both primitives
    ///
    /// The clones of a previous call are disposed.
    pub fn set_material<E: RenderEngine>(&mut self, engine: &mut E, template: MaterialKey) -> Result<(), AnnotationError> {
        let marker = self.drawn_marker()?;
        let drawing_material = engine.clone_material(template, &format!("annotation_{}_material", self.id))?;
        let pulse_material = match engine.clone_material(template, &format!("pulse_of_annotation_{}_material", self.id)) {
            Ok(m) => m,
            Err(err) => {
                engine.dispose_material(drawing_material);
                return Err(err.into());
            }
        };
        let assigned = engine
            .assign_material(marker.drawing, drawing_material)
            .and_then(|_| engine.assign_material(marker.pulse, pulse_material));
        if let Err(err) = assigned {
            engine.dispose_material(drawing_material);
            engine.dispose_material(pulse_material);
            return Err(err.into());
        }

        if let Some((old_drawing, old_pulse)) = marker.materials {
            engine.dispose_material(old_drawing);
            engine.dispose_material(old_pulse);
        }
        self.render = RenderState::Drawn(Marker {
            materials: Some((drawing_material, pulse_material)),
            ..marker
        });
        Ok(())
    }

    /// Change one property of both private materials
    pub fn change_material_property<E: RenderEngine>(
        &mut self,
        engine: &mut E,
        property: MaterialProperty,
    ) -> Result<(), AnnotationError> {
        let marker = self.drawn_marker()?;
        let (drawing_material, pulse_material) = marker.materials.ok_or(AnnotationError::NotDrawn)?;
        engine.set_material_property(drawing_material, property)?;
        engine.set_material_property(pulse_material, property)?;
        Ok(())
    }

    /// Show both primitives
    pub fn show<E: RenderEngine>(&mut self, engine: &mut E) -> Result<(), AnnotationError> {
        self.drawn_marker()?;
        self.visible = true;
        self.apply_visibility(engine)
    }

    /// Hide both primitives without disposing them
    pub fn hide<E: RenderEngine>(&mut self, engine: &mut E) -> Result<(), AnnotationError> {
        self.drawn_marker()?;
        self.visible = false;
        self.apply_visibility(engine)
    }

    /// Record a new optical state and update pulse visibility
    ///
    /// Styling is the manager's job; this only tracks the state.
    pub(crate) fn set_state<E: RenderEngine>(&mut self, engine: &mut E, state: VisualState) -> Result<(), AnnotationError> {
        self.drawn_marker()?;
        self.state = state;
        self.apply_visibility(engine)
    }

    fn apply_visibility<E: RenderEngine>(&self, engine: &mut E) -> Result<(), AnnotationError> {
        let marker = self.drawn_marker()?;
        engine.set_visible(marker.drawing, self.visible)?;
        engine.set_visible(marker.pulse, self.visible && self.state.has_pulse())?;
        Ok(())
    }

    /// Scene the annotation is drawn in
    pub fn scene(&self) -> Option<SceneKey> {
        self.marker().map(|m| m.scene)
    }

    /// Dispose both primitives and their private materials
    ///
    /// Safe to call more than once. Afterwards the annotation cannot be
    /// drawn, styled or shown again.
    pub fn remove<E: RenderEngine>(&mut self, engine: &mut E) {
        if let RenderState::Drawn(marker) = self.render {
            engine.dispose_primitive(marker.pulse);
            engine.dispose_primitive(marker.drawing);
            if let Some((drawing_material, pulse_material)) = marker.materials {
                engine.dispose_material(drawing_material);
                engine.dispose_material(pulse_material);
            }
            log::debug!("Removed annotation '{}'", self.id);
        }
        self.render = RenderState::Removed;
        self.visible = false;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use modelbox_engine::{Color3, HeadlessEngine, MaterialDesc, Vec3};

    fn make_annotation() -> Annotation {
        Annotation::new(
            AnnotationKey::default(),
            "a1",
            SpatialAnchor::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)),
            serde_json::json!({ "title": "Valve" }),
        )
    }

    #[test]
    fn test_new_annotation_is_inert() {
        let a = make_annotation();
        assert!(!a.is_drawn());
        assert!(a.drawing().is_none());
        assert_eq!(a.state(), VisualState::Inactive);
        assert_eq!(a.content()["title"], "Valve");
    }

    #[test]
    fn test_draw_positions_body_along_normal() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let mut a = make_annotation();
        a.draw(&mut engine, scene, 0.05).unwrap();

        let body = engine.primitive(a.drawing().unwrap()).unwrap();
        assert!((body.position.x - 1.025).abs() < 1e-6);
        assert_eq!(body.position.y, 0.0);

        let pulse = engine.primitive(a.pulse().unwrap()).unwrap();
        assert_eq!(pulse.parent, a.drawing());
        assert_eq!(pulse.triggers, Triggers::all());
        assert!(pulse.visible);
    }

    #[test]
    fn test_draw_on_invalid_scene_fails() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        engine.dispose_scene(scene);

        let mut a = make_annotation();
        let err = a.draw(&mut engine, scene, 0.05).unwrap_err();
        assert!(err.is_render_unavailable());
        assert!(!a.is_drawn());
        assert_eq!(engine.primitive_count(), 0);
    }

    #[test]
    fn test_draw_twice_fails() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let mut a = make_annotation();
        a.draw(&mut engine, scene, 0.05).unwrap();
        assert_eq!(a.draw(&mut engine, scene, 0.05), Err(AnnotationError::AlreadyDrawn));
    }

    #[test]
    fn test_failed_pulse_wiring_releases_pulse() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let drawing = engine.create_sphere(scene, "gone", 0.05).unwrap();
        engine.dispose_primitive(drawing);

        let result = Annotation::build_pulse(&mut engine, scene, drawing, "a1", 0.05);
        assert!(result.is_err());
        assert_eq!(engine.primitive_count(), 0);
    }

    #[test]
    fn test_set_material_clones_per_primitive() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let template = engine
            .create_material(scene, "template", &MaterialDesc { emissive_color: Color3::RED, alpha: 0.8, disable_lighting: true })
            .unwrap();
        let mut a = make_annotation();
        a.draw(&mut engine, scene, 0.05).unwrap();
        a.set_material(&mut engine, template).unwrap();

        let (drawing_material, pulse_material) = a.materials().unwrap();
        assert_ne!(drawing_material, template);
        assert_ne!(pulse_material, template);
        assert_ne!(drawing_material, pulse_material);

        a.change_material_property(&mut engine, MaterialProperty::EmissiveColor(Color3::GREEN)).unwrap();
        assert_eq!(engine.material(template).unwrap().emissive_color, Color3::RED);
        assert_eq!(engine.material_of(a.drawing().unwrap()).unwrap().emissive_color, Color3::GREEN);
        assert_eq!(engine.material_of(a.pulse().unwrap()).unwrap().emissive_color, Color3::GREEN);
    }

    #[test]
    fn test_set_material_disposes_previous_clones() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let template = engine.create_material(scene, "template", &MaterialDesc::default()).unwrap();
        let mut a = make_annotation();
        a.draw(&mut engine, scene, 0.05).unwrap();

        a.set_material(&mut engine, template).unwrap();
        let first = a.materials().unwrap();
        a.set_material(&mut engine, template).unwrap();

        assert!(engine.material(first.0).is_none());
        assert!(engine.material(first.1).is_none());
        assert_eq!(engine.material_count(), 3);
    }

    #[test]
    fn test_show_hide() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let mut a = make_annotation();
        a.draw(&mut engine, scene, 0.05).unwrap();

        a.hide(&mut engine).unwrap();
        assert!(!engine.primitive(a.drawing().unwrap()).unwrap().visible);
        assert!(!engine.primitive(a.pulse().unwrap()).unwrap().visible);

        a.show(&mut engine).unwrap();
        assert!(engine.primitive(a.drawing().unwrap()).unwrap().visible);
        assert!(engine.primitive(a.pulse().unwrap()).unwrap().visible);
    }

    #[test]
    fn test_remove_releases_everything() {
        let mut engine = HeadlessEngine::new();
        let scene = engine.create_scene();
        let template = engine.create_material(scene, "template", &MaterialDesc::default()).unwrap();
        let mut a = make_annotation();
        a.draw(&mut engine, scene, 0.05).unwrap();
        a.set_material(&mut engine, template).unwrap();

        a.remove(&mut engine);
        a.remove(&mut engine);

        assert!(a.is_removed());
        assert_eq!(engine.primitive_count(), 0);
        assert_eq!(engine.material_count(), 1);
        assert_eq!(a.draw(&mut engine, scene, 0.05), Err(AnnotationError::Removed));
        assert_eq!(a.show(&mut engine), Err(AnnotationError::Removed));
    }

    #[test]
    fn test_trigger_reaches_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut a = make_annotation();
        let s = seen.clone();
        a.on(move |e| s.borrow_mut().push(e.kind));

        a.trigger(AnnotationEventKind::PointerOver);
        a.trigger(AnnotationEventKind::Picked);
        assert_eq!(*seen.borrow(), vec![AnnotationEventKind::PointerOver, AnnotationEventKind::Picked]);
    }

    #[test]
    fn test_event_kind_from_trigger() {
        assert_eq!(AnnotationEventKind::from_trigger(Triggers::PICK), Some(AnnotationEventKind::Picked));
        assert_eq!(AnnotationEventKind::from_trigger(Triggers::POINTER_OUT), Some(AnnotationEventKind::PointerOut));
        assert_eq!(AnnotationEventKind::from_trigger(Triggers::all()), None);
    }

    #[test]
    fn test_visual_state_names() {
        for state in VisualState::ALL {
            assert_eq!(VisualState::from_name(state.name()), state);
        }
        assert_eq!(VisualState::from_name("whatever"), VisualState::Inactive);
        assert!(!VisualState::Active.has_pulse());
        assert!(VisualState::Hover.has_pulse());
    }
}
