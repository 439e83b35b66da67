//! Marker and pulse settings
//!
//! Plain serializable values; the application config embeds them as its
//! `markers` and `pulse` sections.

use modelbox_math::Color3;
use serde::{Serialize, Deserialize};

use crate::{MaterialStyle, VisualState};

/// Marker appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Marker sphere diameter in scene units
    pub diameter: f32,
    /// Base opacity of every marker style
    pub opacity: f32,
    /// Emissive color of idle markers [r, g, b]
    pub inactive_color: [f32; 3],
    /// Emissive color of hovered markers [r, g, b]
    pub hover_color: [f32; 3],
    /// Emissive color of the active marker [r, g, b]
    pub active_color: [f32; 3],
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            diameter: 0.05,
            opacity: 0.8,
            inactive_color: [1.0, 0.0, 0.0],
            hover_color: [0.0, 1.0, 0.0],
            active_color: [0.0, 0.0, 1.0],
        }
    }
}

impl MarkerConfig {
    /// Style for a visual state
    pub fn style(&self, state: VisualState) -> MaterialStyle {
        let color = match state {
            VisualState::Inactive => self.inactive_color,
            VisualState::Hover => self.hover_color,
            VisualState::Active => self.active_color,
        };
        MaterialStyle::new(Color3::from(color), self.opacity)
    }
}

/// Pulse animation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Scale reached at the last keyframe
    pub scale_factor: f32,
    /// Frame of the last keyframe
    pub frames: f32,
    /// Frames per second
    pub frame_rate: f32,
    /// End of the frame window the group is normalized to
    pub normalize_to: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            scale_factor: 3.0,
            frames: 10.0,
            frame_rate: 10.0,
            normalize_to: 12.0,
        }
    }
}
