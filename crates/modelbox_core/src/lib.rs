//! Annotation core for the modelbox viewer
//!
//! This crate owns everything about annotations that is independent of the
//! host and of the concrete engine:
//!
//! - [`SpatialAnchor`] - Point + surface normal an annotation is attached to
//! - [`Annotation`] - One marker with identity, content, visual state and events
//! - [`MaterialSet`] - Per-state material templates
//! - [`PulseAnimation`] - Shared scale + fade animation of the marker pulses
//! - [`AnnotationsManager`] - Ordered collection with the single-active invariant
//! - [`EventEmitter`] - Listener registry used by annotations and the viewer
//! - [`AnnotationOptions`] / [`AnnotationSet`] - Persisted annotation shape

mod anchor;
mod error;
mod events;
mod options;
mod settings;
mod annotation;
mod material_set;
mod pulse;
mod manager;

pub use anchor::SpatialAnchor;
pub use error::AnnotationError;
pub use events::{EventEmitter, ListenerId};
pub use options::{AnnotationOptions, AnnotationSet, AnnotationSetError};
pub use settings::{MarkerConfig, PulseConfig};
pub use annotation::{Annotation, AnnotationEvent, AnnotationEventKind, AnnotationKey, VisualState};
pub use material_set::{MaterialSet, MaterialStyle};
pub use pulse::PulseAnimation;
pub use manager::AnnotationsManager;
