//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One step per frame, fixed per-frame increments
//! - Seeded RNG only
//! - State is passed in explicitly, never held in globals

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Band, Span, circle_hits_column, column_span, gap_band};
pub use state::{FrameState, GamePhase, Pose};
pub use tick::{FrameOutcome, advance_obstacle, advance_player, tick};
