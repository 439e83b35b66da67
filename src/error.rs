//! Viewer error types

use std::fmt;
use modelbox_core::{AnnotationError, AnnotationSetError};
use modelbox_engine::EngineError;

use crate::config::ConfigError;

/// Error type for viewer operations
#[derive(Debug)]
pub enum ViewerError {
    /// The viewer is not attached, or the engine rejected a render call
    RenderUnavailable(String),
    /// A capability (immersive XR) is not available
    UnsupportedCapability(String),
    /// The model could not be imported
    ModelImport { url: String, source: EngineError },
    /// A caller-provided annotation id is already taken
    DuplicateId(String),
    /// Configuration could not be loaded
    Config(ConfigError),
    /// A persisted annotation set could not be read
    AnnotationSet(AnnotationSetError),
}

impl ViewerError {
    /// Error for operations that need an attached viewer
    pub(crate) fn not_attached() -> Self {
        ViewerError::RenderUnavailable("viewer is not attached".to_string())
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::RenderUnavailable(msg) => write!(f, "Render unavailable: {}", msg),
            ViewerError::UnsupportedCapability(what) => write!(f, "{} is not supported", what),
            ViewerError::ModelImport { url, source } => {
                write!(f, "Failed to import model '{}': {}", url, source)
            }
            ViewerError::DuplicateId(id) => write!(f, "Duplicate annotation id: {}", id),
            ViewerError::Config(err) => write!(f, "{}", err),
            ViewerError::AnnotationSet(err) => write!(f, "Annotation set error: {}", err),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::ModelImport { source, .. } => Some(source),
            ViewerError::Config(err) => Some(err),
            ViewerError::AnnotationSet(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AnnotationError> for ViewerError {
    fn from(err: AnnotationError) -> Self {
        match err {
            AnnotationError::DuplicateId(id) => ViewerError::DuplicateId(id),
            other => ViewerError::RenderUnavailable(other.to_string()),
        }
    }
}

impl From<EngineError> for ViewerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::XrUnsupported => ViewerError::UnsupportedCapability("WebXR".to_string()),
            other => ViewerError::RenderUnavailable(other.to_string()),
        }
    }
}

impl From<ConfigError> for ViewerError {
    fn from(err: ConfigError) -> Self {
        ViewerError::Config(err)
    }
}

impl From<AnnotationSetError> for ViewerError {
    fn from(err: AnnotationSetError) -> Self {
        ViewerError::AnnotationSet(err)
    }
}
