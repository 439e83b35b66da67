//! modelbox demo
//!
//! Runs a viewer against the headless engine: imports a small demo model,
//! adds the configured annotations, plays the pulse animation until the
//! viewer is ready and then simulates some pointer input.

use std::time::Duration;

use modelbox::systems::FrameClock;
use modelbox::{
    AnnotationOptions, AppConfig, HeadlessEngine, MeshDesc, Vec3, Viewer, ViewerEvent, ViewerOptions,
    VisualState,
};

/// Model registered with the headless engine when none is configured
const DEMO_MODEL_URL: &str = "models/demo.glb";

fn demo_engine(model_url: &str) -> HeadlessEngine {
    HeadlessEngine::new().with_model(
        model_url,
        vec![
            MeshDesc::new("body", Vec3::ZERO, 2.0),
            MeshDesc::new("handle", Vec3::new(3.0, 0.0, 0.0), 0.5),
            MeshDesc::new("glass", Vec3::new(-3.0, 0.0, 0.0), 0.75).non_pickable(),
        ],
    )
}

fn main() {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // Initialize logging; RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();
    log::info!("Starting modelbox");

    let mut options = ViewerOptions::from_config(&config).unwrap_or_else(|e| {
        log::warn!("Failed to load annotations: {}. Starting without them.", e);
        ViewerOptions::new()
    });
    let model_url = options.model_url.get_or_insert_with(|| DEMO_MODEL_URL.to_string()).clone();
    if options.annotations.is_empty() {
        options = options
            .with_annotation(AnnotationOptions::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Z).with_id("front"))
            .with_annotation(AnnotationOptions::new(Vec3::new(3.0, 0.5, 0.0), Vec3::Y).with_id("handle"));
    }

    let mut viewer = Viewer::new(demo_engine(&model_url), options, config);
    viewer.on(|event| match event {
        ViewerEvent::LoadingProgress(percent) => log::debug!("Loading {}%", percent),
        other => log::info!("Event: {:?}", other),
    });

    if let Err(e) = pollster::block_on(viewer.attach()) {
        log::error!("Failed to attach viewer: {}", e);
        std::process::exit(1);
    }

    // Render until ready
    let mut clock = FrameClock::new();
    let settle = Duration::from_millis(viewer.config().viewer.settle_delay_ms);
    let mut elapsed = Duration::ZERO;
    while elapsed <= settle {
        std::thread::sleep(Duration::from_millis(16));
        let dt = clock.tick();
        elapsed += dt;
        if let Err(e) = viewer.frame(dt) {
            log::error!("Frame failed: {}", e);
            std::process::exit(1);
        }
    }

    // Hover and pick the first annotation, then double click the model
    if let Some(key) = viewer.manager().and_then(|m| m.keys().first().copied()) {
        if let Err(e) = viewer.set_annotation_state(VisualState::Active, key) {
            log::warn!("Failed to activate annotation: {}", e);
        }
    }
    viewer.handle_pointer(modelbox::input::PointerInput::Move { x: 0.0, y: 0.0 });
    viewer.handle_click(0.5, 0.5, Duration::from_millis(1000));
    viewer.handle_click(0.5, 0.5, Duration::from_millis(1150));

    match viewer.annotation_options().to_json() {
        Ok(json) => log::info!("Annotations: {}", json),
        Err(e) => log::warn!("Failed to serialize annotations: {}", e),
    }

    viewer.detach();
}
