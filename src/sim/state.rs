//! Frame state and core simulation types
//!
//! Everything the frame loop advances lives in [`FrameState`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::Tuning;

/// Current phase of gameplay. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    Failed,
}

/// Mutable state advanced once per frame
#[derive(Debug, Clone)]
pub struct FrameState {
    /// Vertical displacement of the circle from spawn (positive = lower)
    pub fall_offset: f32,
    /// Horizontal displacement of the column pair
    pub obstacle_shift: f32,
    /// Height of the upper column segment; the gap sits right below it
    pub gap_height: f32,
    pub phase: GamePhase,
    /// Set by the host on press, consumed by the next player advance
    pub tap_pending: bool,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl FrameState {
    /// Fresh state with a gap height drawn from the seeded generator
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut state = Self::with_gap(seed, 0.0);
        state.reroll_gap(tuning);
        state
    }

    /// Fresh state with an explicit starting gap height
    pub fn with_gap(seed: u64, gap_height: f32) -> Self {
        Self {
            fall_offset: 0.0,
            obstacle_shift: 0.0,
            gap_height,
            phase: GamePhase::Playing,
            tap_pending: false,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn failed(&self) -> bool {
        self.phase == GamePhase::Failed
    }

    /// Draw a new gap height uniformly from the tuned range
    pub fn reroll_gap(&mut self, tuning: &Tuning) {
        self.gap_height = self.rng.random_range(tuning.gap_min..=tuning.gap_max);
    }

    /// Enter the terminal phase and park the circle and columns at zero
    pub fn latch_failure(&mut self) {
        self.phase = GamePhase::Failed;
        self.fall_offset = 0.0;
        self.obstacle_shift = 0.0;
    }

    /// Snapshot of the values a frame draws
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose {
            fall_offset: self.fall_offset,
            obstacle_shift: self.obstacle_shift,
            gap_height: self.gap_height,
        }
    }
}

/// Geometry-driving values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub fall_offset: f32,
    pub obstacle_shift: f32,
    pub gap_height: f32,
}

impl Pose {
    /// Circle centre y (the circle falls as the offset grows)
    #[inline]
    pub fn circle_y(&self) -> f32 {
        -self.fall_offset
    }
}
