//! Persisted annotation options
//!
//! The host stores annotations as
//! `{ "id": .., "position": {x,y,z}, "normalRef": {x,y,z}, "content": .. }`.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use modelbox_math::Vec3;
use serde::{Serialize, Deserialize};

use crate::SpatialAnchor;

/// Options for creating an annotation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationOptions {
    /// Caller-assigned id; sequence-assigned by the manager when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Anchor point on the model surface
    pub position: Vec3,
    /// Outward surface normal at `position`
    #[serde(rename = "normalRef")]
    pub normal_ref: Vec3,
    /// Arbitrary payload shown by the host
    #[serde(default)]
    pub content: serde_json::Value,
}

impl AnnotationOptions {
    /// Options without id or content
    pub fn new(position: Vec3, normal_ref: Vec3) -> Self {
        Self {
            id: None,
            position,
            normal_ref,
            content: serde_json::Value::Null,
        }
    }

    /// Options for an anchor
    pub fn from_anchor(anchor: SpatialAnchor) -> Self {
        Self::new(anchor.position(), anchor.surface_normal())
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the content payload
    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    /// Anchor described by these options
    pub fn anchor(&self) -> SpatialAnchor {
        SpatialAnchor::new(self.position, self.normal_ref)
    }
}

/// An ordered list of annotation options, stored as a JSON array
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    pub annotations: Vec<AnnotationOptions>,
}

impl AnnotationSet {
    /// Create a set from options
    pub fn new(annotations: Vec<AnnotationOptions>) -> Self {
        Self { annotations }
    }

    /// Parse a set from JSON text
    pub fn from_json(text: &str) -> Result<Self, AnnotationSetError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the set to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, AnnotationSetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a set from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnnotationSetError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save the set to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AnnotationSetError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Number of annotations in the set
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// Error loading or saving an annotation set
#[derive(Debug)]
pub enum AnnotationSetError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Invalid JSON or wrong shape
    Parse(serde_json::Error),
}

impl From<io::Error> for AnnotationSetError {
    fn from(e: io::Error) -> Self {
        AnnotationSetError::Io(e)
    }
}

impl From<serde_json::Error> for AnnotationSetError {
    fn from(e: serde_json::Error) -> Self {
        AnnotationSetError::Parse(e)
    }
}

impl fmt::Display for AnnotationSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationSetError::Io(e) => write!(f, "IO error: {}", e),
            AnnotationSetError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for AnnotationSetError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_host_shape() {
        let text = r#"[
            { "id": "a1", "position": {"x": 1, "y": 2, "z": 3},
              "normalRef": {"x": 0, "y": 1, "z": 0}, "content": {"title": "Valve"} }
        ]"#;
        let set = AnnotationSet::from_json(text).unwrap();
        assert_eq!(set.len(), 1);
        let a = &set.annotations[0];
        assert_eq!(a.id.as_deref(), Some("a1"));
        assert_eq!(a.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(a.normal_ref, Vec3::Y);
        assert_eq!(a.content["title"], "Valve");
    }

    #[test]
    fn test_missing_id_and_content_default() {
        let text = r#"[{ "position": {"x": 0, "y": 0, "z": 0}, "normalRef": {"x": 0, "y": 0, "z": 1} }]"#;
        let set = AnnotationSet::from_json(text).unwrap();
        assert!(set.annotations[0].id.is_none());
        assert!(set.annotations[0].content.is_null());
    }

    #[test]
    fn test_serialized_key_is_normal_ref() {
        let set = AnnotationSet::new(vec![
            AnnotationOptions::new(Vec3::ZERO, Vec3::Z).with_id("x").with_content(json!("text")),
        ]);
        let text = set.to_json().unwrap();
        assert!(text.contains("normalRef"));
        assert!(!text.contains("normal_ref"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = AnnotationSet::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AnnotationSetError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AnnotationSet::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, AnnotationSetError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }
}
