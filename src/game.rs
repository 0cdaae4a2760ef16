//! The per-frame core the host drives
//!
//! A `GameFrame` owns the backend with its installed program, the frame
//! state and the window size. The host calls `draw_frame` once per display
//! refresh and `notify_tap` on input.

use crate::config::GameConfig;
use crate::error::{InitError, RenderError};
use crate::renderer::{RenderBackend, ShaderProgram, Transforms, scene};
use crate::sim::{FrameOutcome, FrameState, tick};

pub struct GameFrame<B: RenderBackend> {
    backend: B,
    config: GameConfig,
    state: FrameState,
    window_size: (u32, u32),
    frames: u64,
}

impl<B: RenderBackend> GameFrame<B> {
    /// Compile and link the shaders, install them on `backend`, and roll the
    /// first gap height
    pub fn new(backend: B, config: GameConfig) -> Result<Self, InitError> {
        // The gap range must be sane before the first roll
        config.tuning.validate()?;
        let seed = config.resolve_seed();
        let state = FrameState::new(seed, &config.tuning);
        Self::with_state(backend, config, state)
    }

    /// Construct around an existing frame state
    pub fn with_state(
        mut backend: B,
        config: GameConfig,
        state: FrameState,
    ) -> Result<Self, InitError> {
        config.tuning.validate()?;
        let program = ShaderProgram::compile(&config.shaders)?;
        backend.install_program(&program)?;

        log::info!(
            "GameFrame ready: seed {}, gap {:.3}, circle angles {}",
            state.seed,
            state.gap_height,
            config.tuning.circle_angles.as_str()
        );

        Ok(Self {
            backend,
            config,
            state,
            window_size: (0, 0),
            frames: 0,
        })
    }

    /// Track the window size; the next frame's viewport and projection use it
    pub fn resize(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        self.backend.resize(width, height);
        log::debug!("Resized to {}x{}", width, height);
    }

    /// Record a tap. Consumed by the next frame's player advance; several
    /// taps before that frame count once.
    pub fn notify_tap(&mut self) {
        self.state.tap_pending = true;
    }

    /// Run collision, build geometry, and submit one frame
    pub fn draw_frame(&mut self) -> Result<FrameOutcome, RenderError> {
        let tuning = &self.config.tuning;
        let outcome = tick(&mut self.state, tuning);
        let meshes = scene(&outcome, tuning);
        self.frames += 1;

        let transforms = self.transforms();
        self.backend.render(&transforms, &meshes)?;
        Ok(outcome)
    }

    /// Release the program and hand the backend back for reuse
    pub fn destroy(mut self) -> B {
        self.backend.release();
        log::info!("GameFrame destroyed after {} frames", self.frames);
        self.backend
    }

    /// Transforms for the current window size
    pub fn transforms(&self) -> Transforms {
        Transforms::new(
            self.config.tuning.model_nudge,
            self.window_size.0,
            self.window_size.1,
        )
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    #[inline]
    pub fn failed(&self) -> bool {
        self.state.failed()
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
