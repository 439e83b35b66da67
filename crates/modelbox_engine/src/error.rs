//! Engine error types

use std::fmt;

/// Error reported by a [`RenderEngine`](crate::RenderEngine)
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Scene handle is unknown or the scene was disposed
    SceneUnavailable,
    /// Primitive handle is unknown or the primitive was disposed
    PrimitiveUnavailable,
    /// Material handle is unknown or the material was disposed
    MaterialUnavailable,
    /// Animation group handle is unknown
    AnimationGroupUnavailable,
    /// Camera handle is unknown
    CameraUnavailable,
    /// Model import failed (unreachable url, unreadable file, ...)
    ImportFailed(String),
    /// Immersive XR is not supported by this engine/device
    XrUnsupported,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SceneUnavailable => write!(f, "scene is not available"),
            EngineError::PrimitiveUnavailable => write!(f, "primitive is not available"),
            EngineError::MaterialUnavailable => write!(f, "material is not available"),
            EngineError::AnimationGroupUnavailable => write!(f, "animation group is not available"),
            EngineError::CameraUnavailable => write!(f, "camera is not available"),
            EngineError::ImportFailed(msg) => write!(f, "model import failed: {}", msg),
            EngineError::XrUnsupported => write!(f, "immersive XR is not supported"),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_failed_display() {
        let err = EngineError::ImportFailed("models/missing.glb".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("import failed"));
        assert!(msg.contains("models/missing.glb"));
    }

    #[test]
    fn test_unavailable_display() {
        assert!(EngineError::SceneUnavailable.to_string().contains("scene"));
        assert!(EngineError::XrUnsupported.to_string().contains("XR"));
    }
}
