//! Game tuning and shader sources
//!
//! Everything is optional in JSON; missing fields fall back to the
//! defaults in [`crate::consts`] and the embedded WGSL files.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Embedded vertex shader (uniform block + `position`/`color` inputs)
pub const VERTEX_SHADER_WGSL: &str = include_str!("renderer/vertex.wgsl");
/// Embedded fragment shader (passes the interpolated color through)
pub const FRAGMENT_SHADER_WGSL: &str = include_str!("renderer/fragment.wgsl");

/// How the circle's rim counter is fed to sin/cos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CircleAngles {
    /// Integer counter 1..=360 used directly as radians.
    /// Produces a scattered ring of points rather than a clean outline.
    #[default]
    RawDegrees,
    /// Counter converted to radians - a true circle
    Radians,
}

impl CircleAngles {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircleAngles::RawDegrees => "raw_degrees",
            CircleAngles::Radians => "radians",
        }
    }

    /// Angle fed to sin/cos for the given rim counter
    #[inline]
    pub fn angle(&self, counter: u32) -> f32 {
        match self {
            CircleAngles::RawDegrees => counter as f32,
            CircleAngles::Radians => (counter as f32).to_radians(),
        }
    }
}

/// Per-frame steps and play-field geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub fall_step: f32,
    pub tap_impulse: f32,
    pub circle_radius: f32,
    pub circle_x: f32,
    pub circle_rim_points: u32,
    pub circle_angles: CircleAngles,

    // === Obstacle ===
    pub obstacle_step: f32,
    pub wrap_threshold: f32,
    pub wrap_reset: f32,
    pub gap_min: f32,
    pub gap_max: f32,
    pub gap_band: f32,
    pub column_origin: f32,
    pub column_width: f32,
    pub column_top: f32,
    pub column_bottom: f32,

    // === View ===
    pub model_nudge: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fall_step: FALL_STEP,
            tap_impulse: TAP_IMPULSE,
            circle_radius: CIRCLE_RADIUS,
            circle_x: CIRCLE_X,
            circle_rim_points: CIRCLE_RIM_POINTS,
            circle_angles: CircleAngles::default(),

            obstacle_step: OBSTACLE_STEP,
            wrap_threshold: WRAP_THRESHOLD,
            wrap_reset: WRAP_RESET,
            gap_min: GAP_MIN,
            gap_max: GAP_MAX,
            gap_band: GAP_BAND,
            column_origin: COLUMN_ORIGIN,
            column_width: COLUMN_WIDTH,
            column_top: COLUMN_TOP,
            column_bottom: COLUMN_BOTTOM,

            model_nudge: MODEL_NUDGE,
        }
    }
}

impl Tuning {
    /// Reject values the frame loop cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("circle_x", self.circle_x),
            ("wrap_threshold", self.wrap_threshold),
            ("wrap_reset", self.wrap_reset),
            ("gap_min", self.gap_min),
            ("gap_max", self.gap_max),
            ("column_origin", self.column_origin),
            ("column_top", self.column_top),
            ("column_bottom", self.column_bottom),
            ("model_nudge", self.model_nudge),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }
        let positive = [
            ("fall_step", self.fall_step),
            ("tap_impulse", self.tap_impulse),
            ("obstacle_step", self.obstacle_step),
            ("circle_radius", self.circle_radius),
            ("column_width", self.column_width),
            ("gap_band", self.gap_band),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.gap_min > self.gap_max {
            return Err(ConfigError::Invalid(format!(
                "gap range [{}, {}] is empty",
                self.gap_min, self.gap_max
            )));
        }
        if self.wrap_reset >= self.wrap_threshold {
            return Err(ConfigError::Invalid(format!(
                "wrap_reset {} must be below wrap_threshold {}",
                self.wrap_reset, self.wrap_threshold
            )));
        }
        if !(1..=CIRCLE_RIM_POINTS_MAX).contains(&self.circle_rim_points) {
            return Err(ConfigError::Invalid(format!(
                "circle_rim_points must be in 1..={CIRCLE_RIM_POINTS_MAX}, got {}",
                self.circle_rim_points
            )));
        }
        Ok(())
    }
}

/// WGSL sources for the single program every draw uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: VERTEX_SHADER_WGSL.to_string(),
            fragment: FRAGMENT_SHADER_WGSL.to_string(),
        }
    }
}

/// Top-level configuration handed to `GameFrame::new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub shaders: ShaderSources,
    /// Seed for gap heights; a random seed is drawn when absent
    pub seed: Option<u64>,
    /// Background clear color (RGBA)
    pub clear_color: [f64; 4],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            shaders: ShaderSources::default(),
            seed: None,
            clear_color: [0.02, 0.02, 0.05, 1.0],
        }
    }
}

impl GameConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_circle_config";

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.tuning.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load config from LocalStorage (WASM only), falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Resolve the RNG seed for this run
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
