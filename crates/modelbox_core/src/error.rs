//! Annotation error types

use std::fmt;
use modelbox_engine::EngineError;

/// Error type for annotation operations
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// The engine rejected the operation (scene, primitive or material gone)
    RenderUnavailable(EngineError),
    /// The annotation has no render primitives yet
    NotDrawn,
    /// The annotation is already drawn
    AlreadyDrawn,
    /// The annotation was removed and cannot be drawn or animated again
    Removed,
    /// A caller-provided id is already used by another annotation
    DuplicateId(String),
}

impl AnnotationError {
    /// Whether this error means render resources are missing
    ///
    /// Everything except [`AnnotationError::DuplicateId`] falls in this
    /// category.
    pub fn is_render_unavailable(&self) -> bool {
        !matches!(self, AnnotationError::DuplicateId(_))
    }
}

impl fmt::Display for AnnotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationError::RenderUnavailable(err) => write!(f, "Render unavailable: {}", err),
            AnnotationError::NotDrawn => write!(f, "Render unavailable: annotation is not drawn"),
            AnnotationError::AlreadyDrawn => write!(f, "Annotation is already drawn"),
            AnnotationError::Removed => write!(f, "Render unavailable: annotation was removed"),
            AnnotationError::DuplicateId(id) => write!(f, "Duplicate annotation id: {}", id),
        }
    }
}

impl std::error::Error for AnnotationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnnotationError::RenderUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for AnnotationError {
    fn from(err: EngineError) -> Self {
        AnnotationError::RenderUnavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_engine_error() {
        let err: AnnotationError = EngineError::SceneUnavailable.into();
        assert_eq!(err, AnnotationError::RenderUnavailable(EngineError::SceneUnavailable));
        assert!(err.is_render_unavailable());
    }

    #[test]
    fn test_duplicate_id_display() {
        let err = AnnotationError::DuplicateId("heart".to_string());
        assert!(err.to_string().contains("heart"));
        assert!(!err.is_render_unavailable());
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;
        assert!(AnnotationError::RenderUnavailable(EngineError::PrimitiveUnavailable).source().is_some());
        assert!(AnnotationError::Removed.source().is_none());
    }
}
