//! Flappy Circle - tap to keep a falling circle inside a moving column gap
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (fall/tap, obstacle sweep, gap collision)
//! - `renderer`: Shader program, per-frame geometry and the WebGPU backend
//! - `game`: `GameFrame`, the fixed interface the host shell drives
//! - `config`: Data-driven tuning and shader sources

pub mod config;
pub mod error;
pub mod game;
pub mod renderer;
pub mod sim;

pub use config::{CircleAngles, GameConfig, ShaderSources, Tuning};
pub use error::{ConfigError, InitError, RenderError, ShaderError};
pub use game::GameFrame;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fall step applied every frame without a tap
    pub const FALL_STEP: f32 = 0.02;
    /// Rise applied on the frame that consumes a tap
    pub const TAP_IMPULSE: f32 = 0.03;

    /// Horizontal sweep per frame
    pub const OBSTACLE_STEP: f32 = 0.012;
    /// Sweep value at which the column pair wraps
    pub const WRAP_THRESHOLD: f32 = 2.5;
    /// Sweep value right after a wrap
    pub const WRAP_RESET: f32 = 0.01;

    /// Gap height range (uniform)
    pub const GAP_MIN: f32 = 0.0;
    pub const GAP_MAX: f32 = 1.8;
    /// Height of the opening below the upper segment
    pub const GAP_BAND: f32 = 0.5;

    /// Circle defaults - fixed x, moves only vertically
    pub const CIRCLE_RADIUS: f32 = 0.05;
    pub const CIRCLE_X: f32 = -0.5;
    /// Points around the rim (plus one centre point)
    pub const CIRCLE_RIM_POINTS: u32 = 360;
    /// Upper bound accepted from config
    pub const CIRCLE_RIM_POINTS_MAX: u32 = 65_536;

    /// Column left edge at zero sweep
    pub const COLUMN_ORIGIN: f32 = 1.0;
    pub const COLUMN_WIDTH: f32 = 0.5;
    /// Top of the upper segment and bottom of the lower segment
    pub const COLUMN_TOP: f32 = 1.0;
    pub const COLUMN_BOTTOM: f32 = -1.5;

    /// Constant vertical nudge applied by the model matrix
    pub const MODEL_NUDGE: f32 = -0.05;
}
