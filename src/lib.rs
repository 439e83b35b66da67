//! modelbox - interactive 3D model viewer with annotations
//!
//! The root crate wires the annotation core to a render engine and the host:
//!
//! - [`Viewer`] - Attach pipeline, render loop, input routing, annotation API
//! - [`XrExperience`] - Immersive session state
//! - [`LoadingScreen`] - Model import progress
//! - [`input`] - Pointer and keyboard mapping
//! - [`config`] - Layered application configuration
//! - [`systems`] - Helpers for host render loops

pub mod config;
pub mod input;
pub mod systems;
mod error;
mod loading;
mod viewer;
mod xr;

pub use config::{AppConfig, ConfigError};
pub use error::ViewerError;
pub use loading::LoadingScreen;
pub use viewer::{Viewer, ViewerEvent, ViewerOptions, DEFAULT_AUTO_ROTATION_SPEED, XR_NOT_SUPPORTED};
pub use xr::{XrExperience, XrState};

// Re-export the core types hosts work with
pub use modelbox_core::{
    Annotation, AnnotationEvent, AnnotationEventKind, AnnotationKey, AnnotationOptions,
    AnnotationSet, VisualState,
};
pub use modelbox_engine::{HeadlessEngine, MeshDesc, RenderEngine, Vec3};
