//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`MODELBOX_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use modelbox_core::{MarkerConfig, PulseConfig};
use modelbox_engine::{CameraDesc, LightDesc, Vec3};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Viewer configuration
    #[serde(default)]
    pub viewer: ViewerConfig,
    /// Marker appearance
    #[serde(default)]
    pub markers: MarkerConfig,
    /// Pulse animation timing
    #[serde(default)]
    pub pulse: PulseConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Light configuration
    #[serde(default)]
    pub light: LightConfig,
    /// Immersive XR configuration
    #[serde(default)]
    pub xr: XrConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`MODELBOX_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // User overrides (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // MODELBOX_VIEWER__MODEL_URL=heart.glb -> viewer.model_url = "heart.glb"
        figment = figment.merge(Env::prefixed("MODELBOX_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Model to import on attach
    pub model_url: Option<String>,
    /// JSON file with annotations to add on attach
    pub annotations_path: Option<PathBuf>,
    /// Delay between the first rendered frame and the ready event
    pub settle_delay_ms: u64,
    /// Render target width in pixels
    pub width: u32,
    /// Render target height in pixels
    pub height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_url: None,
            annotations_path: None,
            settle_delay_ms: 500,
            width: 1280,
            height: 720,
        }
    }
}

/// Arc-rotate camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Longitudinal rotation in radians
    pub alpha: f32,
    /// Latitudinal rotation in radians
    pub beta: f32,
    /// Distance from the target
    pub radius: f32,
    /// Orbit target [x, y, z]
    pub target: [f32; 3],
    /// Idle auto-rotation speed; disabled when absent
    pub auto_rotation_speed: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let desc = CameraDesc::default();
        Self {
            alpha: desc.alpha,
            beta: desc.beta,
            radius: desc.radius,
            target: desc.target.to_array(),
            auto_rotation_speed: None,
        }
    }
}

impl CameraConfig {
    /// Engine camera description
    pub fn to_desc(&self) -> CameraDesc {
        CameraDesc {
            alpha: self.alpha,
            beta: self.beta,
            radius: self.radius,
            target: Vec3::from(self.target),
        }
    }
}

/// Hemispheric light configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Direction the light comes from [x, y, z]
    pub direction: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self { direction: LightDesc::default().direction.to_array() }
    }
}

impl LightConfig {
    /// Engine light description
    pub fn to_desc(&self) -> LightDesc {
        LightDesc { direction: Vec3::from(self.direction) }
    }
}

/// Immersive XR configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XrConfig {
    /// Session mode to probe and request
    pub session_mode: String,
    /// Reference space type of the session
    pub reference_space: String,
}

impl Default for XrConfig {
    fn default() -> Self {
        Self {
            session_mode: "immersive-vr".to_string(),
            reference_space: "local-floor".to_string(),
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum time between two clicks of a double click
    pub double_click_ms: u64,
    /// Maximum pointer travel between two clicks of a double click, in pixels
    pub double_click_distance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 300,
            double_click_distance: 4.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.viewer.settle_delay_ms, 500);
        assert_eq!(config.markers.diameter, 0.05);
        assert_eq!(config.xr.session_mode, "immersive-vr");
        assert_eq!(config.input.double_click_ms, 300);
        assert_eq!(config.light.direction, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("settle_delay_ms"));
        assert!(toml.contains("reference_space"));
        assert!(toml.contains("inactive_color"));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[viewer]\nmodel_url = \"heart.glb\"\n").unwrap();
        assert_eq!(config.viewer.model_url.as_deref(), Some("heart.glb"));
        assert_eq!(config.viewer.settle_delay_ms, 500);
        assert_eq!(config.camera.radius, 20.0);
    }

    #[test]
    fn test_camera_desc() {
        let mut camera = CameraConfig::default();
        camera.target = [0.0, 1.0, 0.0];
        let desc = camera.to_desc();
        assert_eq!(desc.target, Vec3::Y);
        assert_eq!(desc.radius, 20.0);
    }
}
