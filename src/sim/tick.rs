//! One simulation step per rendered frame
//!
//! The collision test runs against the pose this frame draws; the player
//! and obstacle then advance for the next frame.

use super::collision::circle_hits_column;
use super::state::{FrameState, Pose};
use crate::config::Tuning;

/// What a frame should draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Normal frame: draw circle and columns at `pose`
    Playing { pose: Pose, wrapped: bool },
    /// Terminal frame: draw the fail marker only
    Failed { just_failed: bool },
}

impl FrameOutcome {
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, FrameOutcome::Failed { .. })
    }
}

/// Sweep the column pair; returns true when it wrapped and re-rolled the gap
pub fn advance_obstacle(state: &mut FrameState, tuning: &Tuning) -> bool {
    state.obstacle_shift += tuning.obstacle_step;
    if state.obstacle_shift >= tuning.wrap_threshold {
        state.obstacle_shift = tuning.wrap_reset;
        state.reroll_gap(tuning);
        log::debug!("Obstacle wrapped, new gap height {:.3}", state.gap_height);
        return true;
    }
    false
}

/// Apply either the tap impulse or the fall step, never both
pub fn advance_player(state: &mut FrameState, tuning: &Tuning) {
    if state.tap_pending {
        state.fall_offset -= tuning.tap_impulse;
        state.tap_pending = false;
    } else {
        state.fall_offset += tuning.fall_step;
    }
}

/// Advance the frame state by one frame
pub fn tick(state: &mut FrameState, tuning: &Tuning) -> FrameOutcome {
    if state.failed() {
        return FrameOutcome::Failed { just_failed: false };
    }

    let pose = state.pose();
    if circle_hits_column(&pose, tuning) {
        log::info!(
            "Collision: fall {:.3}, shift {:.3}, gap {:.3}",
            pose.fall_offset,
            pose.obstacle_shift,
            pose.gap_height
        );
        state.latch_failure();
        return FrameOutcome::Failed { just_failed: true };
    }

    advance_player(state, tuning);
    let wrapped = advance_obstacle(state, tuning);

    FrameOutcome::Playing { pose, wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_fifty_frames_without_taps() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(12345, 0.9);

        for _ in 0..50 {
            let outcome = tick(&mut state, &tuning);
            assert!(!outcome.is_failed());
        }

        assert!((state.fall_offset - 1.0).abs() < EPS);
        assert!((state.obstacle_shift - 0.6).abs() < EPS);
        assert!(!state.failed());
    }

    #[test]
    fn test_tap_rises_then_falls() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(1, 0.9);
        state.fall_offset = 0.2;

        state.tap_pending = true;
        tick(&mut state, &tuning);
        assert!((state.fall_offset - 0.17).abs() < EPS);
        assert!(!state.tap_pending);

        tick(&mut state, &tuning);
        assert!((state.fall_offset - 0.19).abs() < EPS);
    }

    #[test]
    fn test_wrap_resets_and_rerolls() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(7, 0.9);
        state.obstacle_shift = 2.495;

        let wrapped = advance_obstacle(&mut state, &tuning);
        assert!(wrapped);
        assert_eq!(state.obstacle_shift, tuning.wrap_reset);
        assert!((tuning.gap_min..=tuning.gap_max).contains(&state.gap_height));
    }

    #[test]
    fn test_frame_draws_pre_advance_pose() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(3, 0.9);
        state.fall_offset = 0.1;
        state.obstacle_shift = 0.3;

        match tick(&mut state, &tuning) {
            FrameOutcome::Playing { pose, wrapped } => {
                assert_eq!(pose.fall_offset, 0.1);
                assert_eq!(pose.obstacle_shift, 0.3);
                assert!(!wrapped);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_boundary_fails_when_overlapping() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(5, 0.5);
        state.fall_offset = tuning.circle_radius - (tuning.column_top - 0.5);
        state.obstacle_shift = 1.75;

        let outcome = tick(&mut state, &tuning);
        assert_eq!(outcome, FrameOutcome::Failed { just_failed: true });
        assert!(state.failed());
        assert_eq!(state.fall_offset, 0.0);
        assert_eq!(state.obstacle_shift, 0.0);
    }

    #[test]
    fn test_boundary_safe_when_column_out_of_range() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(5, 0.5);
        state.fall_offset = tuning.circle_radius - (tuning.column_top - 0.5);
        state.obstacle_shift = 0.5;

        let outcome = tick(&mut state, &tuning);
        assert!(!outcome.is_failed());
        assert!(!state.failed());
    }

    #[test]
    fn test_failure_latches_through_taps() {
        let tuning = Tuning::default();
        let mut state = FrameState::with_gap(5, 0.5);
        state.fall_offset = -0.6;
        state.obstacle_shift = 1.75;

        assert_eq!(
            tick(&mut state, &tuning),
            FrameOutcome::Failed { just_failed: true }
        );
        for _ in 0..20 {
            state.tap_pending = true;
            assert_eq!(
                tick(&mut state, &tuning),
                FrameOutcome::Failed { just_failed: false }
            );
            assert!(state.failed());
            assert_eq!(state.fall_offset, 0.0);
            assert_eq!(state.obstacle_shift, 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_sweep_steps_or_wraps(seed in any::<u64>(), frames in 1usize..2000) {
            let tuning = Tuning::default();
            let mut state = FrameState::new(seed, &tuning);
            let mut wraps = 0usize;

            for _ in 0..frames {
                let before_shift = state.obstacle_shift;
                let before_gap = state.gap_height;
                let wrapped = advance_obstacle(&mut state, &tuning);
                if wrapped {
                    wraps += 1;
                    prop_assert_eq!(state.obstacle_shift, tuning.wrap_reset);
                } else {
                    prop_assert!((state.obstacle_shift - before_shift - tuning.obstacle_step).abs() < 1e-5);
                    prop_assert_eq!(state.gap_height, before_gap);
                }
                prop_assert!(state.obstacle_shift < tuning.wrap_threshold);
            }

            let expected = (tuning.obstacle_step * frames as f32
                / (tuning.wrap_threshold - tuning.wrap_reset))
                .floor() as i64;
            prop_assert!((wraps as i64 - expected).abs() <= 1);
        }

        #[test]
        fn prop_fall_or_impulse_exclusive(taps in proptest::collection::vec(any::<bool>(), 1..200)) {
            let tuning = Tuning::default();
            let mut state = FrameState::with_gap(0, 0.9);

            for tap in taps {
                state.tap_pending = tap;
                let before = state.fall_offset;
                advance_player(&mut state, &tuning);
                let delta = state.fall_offset - before;
                if tap {
                    prop_assert!((delta + tuning.tap_impulse).abs() < 1e-5);
                } else {
                    prop_assert!((delta - tuning.fall_step).abs() < 1e-5);
                }
                prop_assert!(!state.tap_pending);
            }
        }
    }
}
