//! The viewer facade
//!
//! A [`Viewer`] owns one engine scene with an imported model, a camera, a
//! light and the annotations manager, and drives them from host input:
//!
//! - `attach().await` builds everything in a fixed sequence
//! - `frame(dt)` is one render-loop tick, driven by the host
//! - pointer and key input are routed to annotations and the XR experience
//! - everything observable is reported as a [`ViewerEvent`]

use std::time::Duration;

use modelbox_core::{
    Annotation, AnnotationEventKind, AnnotationKey, AnnotationOptions, AnnotationSet,
    AnnotationsManager, EventEmitter, ListenerId, VisualState,
};
use modelbox_engine::{
    CameraKey, EngineError, ImportProgress, ImportedModel, LightKey, PointerEvent, RenderEngine,
    SceneKey, TriggerEvent, Vec3,
};
use serde::{Serialize, Deserialize};

use crate::config::AppConfig;
use crate::error::ViewerError;
use crate::input::{InputAction, Key, KeyState, PointerInput, PointerMapper};
use crate::loading::LoadingScreen;
use crate::xr::{XrExperience, XrState};

/// Idle rotation speed used when none is given
pub const DEFAULT_AUTO_ROTATION_SPEED: f32 = 0.3;

/// Message of the notice emitted when XR is requested but unavailable
pub const XR_NOT_SUPPORTED: &str = "WebXR is not supported";

/// Host options of a viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerOptions {
    /// Model to import on attach; no model is imported when absent
    pub model_url: Option<String>,
    /// Annotations added on attach, in order
    pub annotations: Vec<AnnotationOptions>,
}

impl ViewerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_url(mut self, url: impl Into<String>) -> Self {
        self.model_url = Some(url.into());
        self
    }

    pub fn with_annotation(mut self, options: AnnotationOptions) -> Self {
        self.annotations.push(options);
        self
    }

    /// Options described by the `viewer` config section
    ///
    /// Loads the annotation file when `annotations_path` is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, ViewerError> {
        let annotations = match &config.viewer.annotations_path {
            Some(path) => AnnotationSet::load(path)?.annotations,
            None => Vec::new(),
        };
        Ok(Self {
            model_url: config.viewer.model_url.clone(),
            annotations,
        })
    }
}

/// Events emitted by a viewer
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// The scene has settled after attach
    Ready,
    /// A pickable model mesh was double clicked
    DblClick { position: Vec3, normal_ref: Vec3 },
    /// An annotation pulse was clicked
    AnnotationPicked(AnnotationKey),
    /// The pointer entered an annotation pulse
    AnnotationPointerOver(AnnotationKey),
    /// The pointer left an annotation pulse
    AnnotationPointerOut(AnnotationKey),
    /// The engine supports the configured immersive session mode
    WebXrSupported,
    /// Model import progress (see [`LoadingScreen::percent`])
    LoadingProgress(f64),
    /// The immersive session changed state
    XrStateChanged(XrState),
    /// Message for the user
    Notice(String),
}

/// Counts host frame time down to the ready event
#[derive(Debug, Clone, Copy)]
struct ReadyTimer {
    remaining: Duration,
}

impl ReadyTimer {
    fn new(delay: Duration) -> Self {
        Self { remaining: delay }
    }

    /// Advance by `dt`; true once the delay has elapsed
    fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }
}

/// Everything that exists only while attached
struct Attached {
    scene: SceneKey,
    model: ImportedModel,
    camera: CameraKey,
    light: LightKey,
    manager: AnnotationsManager,
}

/// Interactive model viewer with annotations
pub struct Viewer<E: RenderEngine> {
    engine: E,
    options: ViewerOptions,
    config: AppConfig,
    loading: LoadingScreen,
    xr: XrExperience,
    pointer: PointerMapper,
    attached: Option<Attached>,
    rendering: bool,
    ready_timer: Option<ReadyTimer>,
    events: EventEmitter<ViewerEvent>,
}

impl<E: RenderEngine> Viewer<E> {
    /// Create a detached viewer
    pub fn new(engine: E, options: ViewerOptions, config: AppConfig) -> Self {
        Self {
            engine,
            options,
            loading: LoadingScreen::new(),
            xr: XrExperience::new(config.xr.clone()),
            pointer: PointerMapper::new(&config.input),
            config,
            attached: None,
            rendering: false,
            ready_timer: None,
            events: EventEmitter::new(),
        }
    }

    // --- Events ---

    /// Subscribe to viewer events
    pub fn on(&mut self, handler: impl FnMut(&ViewerEvent) + 'static) -> ListenerId {
        self.events.on(handler)
    }

    /// Unsubscribe a handler
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    // --- Lifecycle ---

    /// Build the scene: model, camera, light, XR probe and annotations
    ///
    /// On a failed import the scene is disposed again and the viewer stays
    /// detached. Attaching an attached viewer does nothing.
    pub async fn attach(&mut self) -> Result<(), ViewerError> {
        if self.attached.is_some() {
            log::warn!("Viewer is already attached");
            return Ok(());
        }

        let scene = self.engine.create_scene();
        self.engine.resize(self.config.viewer.width, self.config.viewer.height);

        self.loading.display();
        let model = match self.import_model(scene).await {
            Ok(model) => model,
            Err(err) => {
                self.loading.hide();
                self.engine.dispose_scene(scene);
                return Err(err);
            }
        };
        self.loading.hide();

        if let Err(err) = self.build_scene(scene, model).await {
            self.engine.dispose_scene(scene);
            self.attached = None;
            return Err(err);
        }

        for options in self.options.annotations.clone() {
            if let Err(err) = self.add_annotation(options) {
                log::warn!("Skipping configured annotation: {}", err);
            }
        }

        self.rendering = true;
        self.ready_timer = Some(ReadyTimer::new(Duration::from_millis(self.config.viewer.settle_delay_ms)));
        log::info!("Viewer attached");
        Ok(())
    }

    async fn import_model(&mut self, scene: SceneKey) -> Result<ImportedModel, ViewerError> {
        let Some(url) = self.options.model_url.clone() else {
            log::info!("No model configured");
            return Ok(ImportedModel::default());
        };

        let loading = &mut self.loading;
        let events = &mut self.events;
        let mut on_progress = |progress: ImportProgress| {
            let percent = loading.update(progress);
            events.trigger(&ViewerEvent::LoadingProgress(percent));
        };

        match self.engine.import_model(scene, &url, &mut on_progress).await {
            Ok(model) => {
                log::info!("Imported model '{}' with {} meshes", url, model.meshes.len());
                Ok(model)
            }
            Err(source) => {
                log::error!("Failed to import model '{}': {}", url, source);
                Err(ViewerError::ModelImport { url, source })
            }
        }
    }

    async fn build_scene(&mut self, scene: SceneKey, model: ImportedModel) -> Result<(), ViewerError> {
        let camera = self.engine.create_camera(scene, &self.config.camera.to_desc())?;
        if let Some(speed) = self.config.camera.auto_rotation_speed {
            self.engine.set_auto_rotation(camera, Some(speed))?;
        }
        let light = self.engine.create_light(scene, &self.config.light.to_desc())?;

        if self.xr.probe(&mut self.engine).await {
            log::info!("WebXR supported");
            self.events.trigger(&ViewerEvent::WebXrSupported);
        }

        let manager = AnnotationsManager::with_pulse(&mut self.engine, scene, &self.config.markers, &self.config.pulse)?;
        self.attached = Some(Attached {
            scene,
            model,
            camera,
            light,
            manager,
        });
        Ok(())
    }

    /// Tear down the scene and return to the detached state
    pub fn detach(&mut self) {
        if let Some(mut attached) = self.attached.take() {
            attached.manager.dispose(&mut self.engine);
            self.engine.dispose_scene(attached.scene);
            log::info!("Viewer detached");
        }
        self.rendering = false;
        self.ready_timer = None;
    }

    // --- Render loop ---

    /// One render-loop tick of `dt` host time
    ///
    /// Advances the pulse animation, renders and counts down the settle
    /// delay; `Ready` is emitted once. Does nothing while detached or
    /// stopped.
    pub fn frame(&mut self, dt: Duration) -> Result<(), ViewerError> {
        let Some(attached) = &self.attached else {
            return Ok(());
        };
        if !self.rendering {
            return Ok(());
        }

        self.engine.advance_animations(attached.scene, dt)?;
        self.engine.render(attached.scene)?;

        if let Some(timer) = &mut self.ready_timer {
            if timer.tick(dt) {
                self.ready_timer = None;
                log::info!("Viewer ready");
                self.events.trigger(&ViewerEvent::Ready);
            }
        }
        Ok(())
    }

    /// Pause the render loop
    pub fn stop_rendering(&mut self) {
        self.rendering = false;
    }

    /// Resume the render loop (only while attached)
    pub fn resume_rendering(&mut self) {
        self.rendering = self.attached.is_some();
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Resize the render target
    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
    }

    /// Start idle rotation of the camera
    pub fn start_auto_rotation(&mut self, speed: Option<f32>) -> Result<(), ViewerError> {
        let attached = self.attached.as_ref().ok_or_else(ViewerError::not_attached)?;
        self.engine
            .set_auto_rotation(attached.camera, Some(speed.unwrap_or(DEFAULT_AUTO_ROTATION_SPEED)))?;
        Ok(())
    }

    // --- Input ---

    /// Handle a click reported by the host at host time `at`
    ///
    /// Two quick clicks in the same spot also produce a double click.
    pub fn handle_click(&mut self, x: f32, y: f32, at: Duration) {
        for input in self.pointer.map_click(x, y, at) {
            self.handle_pointer(input);
        }
    }

    /// Handle pointer input
    pub fn handle_pointer(&mut self, input: PointerInput) {
        let Some(attached) = &self.attached else {
            log::debug!("Ignoring pointer input while detached");
            return;
        };
        let scene = attached.scene;

        let fired = match input {
            PointerInput::Move { x, y } => self.engine.pointer_event(scene, PointerEvent::Move { x, y }),
            PointerInput::Click { x, y } => self.engine.pointer_event(scene, PointerEvent::Click { x, y }),
            PointerInput::Leave => self.engine.pointer_event(scene, PointerEvent::Leave),
            PointerInput::DoubleClick { x, y } => {
                self.handle_double_click(x, y);
                return;
            }
        };
        self.route_triggers(fired);
    }

    fn handle_double_click(&mut self, x: f32, y: f32) {
        let Some(attached) = &self.attached else {
            return;
        };
        let Some(hit) = self.engine.pick(attached.scene, x, y) else {
            return;
        };
        if !hit.pickable || !attached.model.contains(hit.primitive) {
            log::debug!("Double click did not hit a pickable model mesh");
            return;
        }
        self.events.trigger(&ViewerEvent::DblClick {
            position: hit.point,
            normal_ref: hit.normal,
        });
    }

    fn route_triggers(&mut self, fired: Vec<TriggerEvent>) {
        let Some(attached) = &mut self.attached else {
            return;
        };
        for trigger in fired {
            let Some(key) = attached.manager.annotation_for_primitive(trigger.primitive) else {
                continue;
            };
            let Some(kind) = AnnotationEventKind::from_trigger(trigger.trigger) else {
                continue;
            };
            attached.manager.trigger(key, kind);
            let event = match kind {
                AnnotationEventKind::Picked => ViewerEvent::AnnotationPicked(key),
                AnnotationEventKind::PointerOver => ViewerEvent::AnnotationPointerOver(key),
                AnnotationEventKind::PointerOut => ViewerEvent::AnnotationPointerOut(key),
            };
            self.events.trigger(&event);
        }
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: Key) -> Result<(), ViewerError> {
        match PointerMapper::map_keyboard(key, KeyState::Pressed, self.xr.in_xr()) {
            Some(InputAction::ExitImmersive) => self.exit_webxr_experience().await,
            None => Ok(()),
        }
    }

    // --- Annotations ---

    /// Add an annotation; fails while detached
    pub fn add_annotation(&mut self, options: AnnotationOptions) -> Result<AnnotationKey, ViewerError> {
        let attached = self.attached.as_mut().ok_or_else(ViewerError::not_attached)?;
        Ok(attached.manager.add_annotation(&mut self.engine, options)?)
    }

    /// Remove an annotation; false if it is not part of this viewer
    pub fn remove_annotation(&mut self, key: AnnotationKey) -> bool {
        match self.attached.as_mut() {
            Some(attached) => attached.manager.remove_annotation(&mut self.engine, key),
            None => false,
        }
    }

    /// Annotations in order (none while detached)
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.attached.iter().flat_map(|a| a.manager.annotations())
    }

    pub fn annotation(&self, key: AnnotationKey) -> Option<&Annotation> {
        self.attached.as_ref().and_then(|a| a.manager.get(key))
    }

    /// Mutable access, e.g. to subscribe to an annotation's own events
    pub fn annotation_mut(&mut self, key: AnnotationKey) -> Option<&mut Annotation> {
        self.attached.as_mut().and_then(|a| a.manager.get_mut(key))
    }

    /// Position of an annotation, `None` if it is not part of this viewer
    pub fn index_of_annotation(&self, key: AnnotationKey) -> Option<usize> {
        self.attached.as_ref().and_then(|a| a.manager.index_of(key))
    }

    /// Options of the current annotations, or the configured ones while detached
    pub fn annotation_options(&self) -> AnnotationSet {
        match &self.attached {
            Some(attached) => attached.manager.to_options(),
            None => AnnotationSet::new(self.options.annotations.clone()),
        }
    }

    /// Change the optical state of an annotation
    pub fn set_annotation_state(&mut self, state: VisualState, key: AnnotationKey) -> Result<(), ViewerError> {
        if let Some(attached) = self.attached.as_mut() {
            attached.manager.set_annotation_state(&mut self.engine, state, key)?;
        }
        Ok(())
    }

    /// Reset all annotations to inactive and show them
    pub fn show_all_annotations(&mut self) -> Result<(), ViewerError> {
        if let Some(attached) = self.attached.as_mut() {
            attached.manager.show_all_annotations(&mut self.engine)?;
        }
        Ok(())
    }

    /// Hide all annotations
    pub fn hide_all_annotations(&mut self) -> Result<(), ViewerError> {
        if let Some(attached) = self.attached.as_mut() {
            attached.manager.hide_all_annotations(&mut self.engine)?;
        }
        Ok(())
    }

    pub fn active_annotation(&self) -> Option<AnnotationKey> {
        self.attached.as_ref().and_then(|a| a.manager.active_annotation())
    }

    // --- Immersive XR ---

    /// Enter the immersive session
    ///
    /// Emits a notice and fails with `UnsupportedCapability` when XR is not
    /// available; nothing changes in that case.
    pub async fn start_webxr_experience(&mut self) -> Result<(), ViewerError> {
        let scene = self.attached.as_ref().ok_or_else(ViewerError::not_attached)?.scene;

        let events = &mut self.events;
        let mut on_state = |state: XrState| events.trigger(&ViewerEvent::XrStateChanged(state));
        let result = self.xr.start(&mut self.engine, scene, &mut on_state).await;

        match result {
            Ok(()) => Ok(()),
            Err(EngineError::XrUnsupported) => {
                log::warn!("{}", XR_NOT_SUPPORTED);
                self.events.trigger(&ViewerEvent::Notice(XR_NOT_SUPPORTED.to_string()));
                Err(EngineError::XrUnsupported.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Leave the immersive session and show all annotations again
    ///
    /// Does nothing outside a session.
    pub async fn exit_webxr_experience(&mut self) -> Result<(), ViewerError> {
        let Some(scene) = self.attached.as_ref().map(|a| a.scene) else {
            return Ok(());
        };

        let events = &mut self.events;
        let mut on_state = |state: XrState| events.trigger(&ViewerEvent::XrStateChanged(state));
        let exited = self.xr.exit(&mut self.engine, scene, &mut on_state).await?;

        if exited {
            self.show_all_annotations()?;
        }
        Ok(())
    }

    pub fn xr_state(&self) -> XrState {
        self.xr.state()
    }

    /// Result of the XR probe made during attach
    pub fn is_webxr_supported(&self) -> bool {
        self.xr.is_supported()
    }

    // --- Accessors ---

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn scene(&self) -> Option<SceneKey> {
        self.attached.as_ref().map(|a| a.scene)
    }

    /// The imported model
    pub fn model(&self) -> Option<&ImportedModel> {
        self.attached.as_ref().map(|a| &a.model)
    }

    pub fn camera(&self) -> Option<CameraKey> {
        self.attached.as_ref().map(|a| a.camera)
    }

    pub fn light(&self) -> Option<LightKey> {
        self.attached.as_ref().map(|a| a.light)
    }

    pub fn manager(&self) -> Option<&AnnotationsManager> {
        self.attached.as_ref().map(|a| &a.manager)
    }

    pub fn loading_screen(&self) -> &LoadingScreen {
        &self.loading
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
