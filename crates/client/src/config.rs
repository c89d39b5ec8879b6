//! Client configuration.

use vitrine_core::StageConfig;

/// Orbit control tuning.
#[derive(Debug, Clone)]
pub struct OrbitSettings {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Velocity retained per 60 Hz frame; 1.0 disables damping.
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 0.5,
            zoom_speed: 0.1,
            pan_speed: 0.002,
            damping: 0.85,
            min_distance: 1.0,
            max_distance: 200.0,
        }
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub model_path: String,
    pub font_path: String,
    /// Text laid out one glyph mesh per character.
    pub label: String,
    pub orbit: OrbitSettings,
    pub stage: StageConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            title: "Vitrine".to_string(),
            width: 1280,
            height: 720,
            model_path: "assets/models/showcase.gltf".to_string(),
            font_path: "assets/fonts/blocky.json".to_string(),
            label: "Alexander".to_string(),
            orbit: OrbitSettings::default(),
            stage: StageConfig::default(),
        }
    }
}
