//! Circle vs column-gap collision
//!
//! A narrow interval test, not a general circle/rectangle intersection. It
//! holds because the columns are axis-aligned and the circle never moves
//! horizontally: the circle collides when it overlaps the column's x-extent
//! while its vertical extent leaves the gap band.

use super::state::Pose;
use crate::config::Tuning;

/// Closed vertical interval `[bottom, top]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub bottom: f32,
    pub top: f32,
}

/// Horizontal extent `[left, right]` of the column pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub left: f32,
    pub right: f32,
}

/// Gap between the upper and lower segments for a given gap height
#[inline]
pub fn gap_band(gap_height: f32, tuning: &Tuning) -> Band {
    let top = tuning.column_top - gap_height;
    Band {
        bottom: top - tuning.gap_band,
        top,
    }
}

/// Column x-extent after sweeping by `obstacle_shift`
#[inline]
pub fn column_span(obstacle_shift: f32, tuning: &Tuning) -> Span {
    let left = tuning.column_origin - obstacle_shift;
    Span {
        left,
        right: left + tuning.column_width,
    }
}

/// True when the circle pokes out of the gap (touching an edge counts)
pub fn escapes_gap(circle_y: f32, radius: f32, band: Band) -> bool {
    circle_y + radius >= band.top || circle_y - radius <= band.bottom
}

/// True when the circle's x-extent overlaps the column (touching does not count)
pub fn overlaps_column(circle_x: f32, radius: f32, span: Span) -> bool {
    !(span.right <= circle_x - radius) && !(span.left >= circle_x + radius)
}

/// Full check for one frame's pose
pub fn circle_hits_column(pose: &Pose, tuning: &Tuning) -> bool {
    let radius = tuning.circle_radius;
    overlaps_column(
        tuning.circle_x,
        radius,
        column_span(pose.obstacle_shift, tuning),
    ) && escapes_gap(pose.circle_y(), radius, gap_band(pose.gap_height, tuning))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(fall_offset: f32, obstacle_shift: f32, gap_height: f32) -> Pose {
        Pose {
            fall_offset,
            obstacle_shift,
            gap_height,
        }
    }

    #[test]
    fn test_gap_band_below_upper_segment() {
        let band = gap_band(0.9, &Tuning::default());
        assert!((band.top - 0.1).abs() < 1e-6);
        assert!((band.bottom - -0.4).abs() < 1e-6);
    }

    #[test]
    fn test_column_span_sweeps_left() {
        let tuning = Tuning::default();
        let span = column_span(0.0, &tuning);
        assert_eq!(span, Span { left: 1.0, right: 1.5 });
        let span = column_span(1.75, &tuning);
        assert!((span.left - -0.75).abs() < 1e-6);
        assert!((span.right - -0.25).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_window() {
        let tuning = Tuning::default();
        // Circle spans x in [-0.55, -0.45]
        assert!(!overlaps_column(-0.5, 0.05, column_span(0.5, &tuning)));
        assert!(overlaps_column(-0.5, 0.05, column_span(1.75, &tuning)));
        assert!(!overlaps_column(-0.5, 0.05, column_span(2.3, &tuning)));
    }

    #[test]
    fn test_circle_inside_gap_is_safe() {
        let tuning = Tuning::default();
        // Gap band for 0.9 is [-0.4, 0.1]; circle centred at -0.15
        assert!(!circle_hits_column(&pose(0.15, 1.75, 0.9), &tuning));
    }

    #[test]
    fn test_circle_above_gap_hits() {
        let tuning = Tuning::default();
        assert!(circle_hits_column(&pose(-0.2, 1.75, 0.9), &tuning));
    }

    #[test]
    fn test_circle_below_gap_hits() {
        let tuning = Tuning::default();
        assert!(circle_hits_column(&pose(0.5, 1.75, 0.9), &tuning));
    }

    #[test]
    fn test_escaping_circle_out_of_column_range_is_safe() {
        let tuning = Tuning::default();
        assert!(!circle_hits_column(&pose(-0.2, 0.5, 0.9), &tuning));
    }

    #[test]
    fn test_upper_edge_contact_counts() {
        let tuning = Tuning::default();
        let gap = 0.5;
        let band = gap_band(gap, &tuning);
        // Place the circle's top exactly on the gap top
        let fall = tuning.circle_radius - band.top;
        assert!(escapes_gap(-fall, tuning.circle_radius, band));
        assert!(circle_hits_column(&pose(fall, 1.75, gap), &tuning));
    }

    #[test]
    fn test_lower_edge_contact_counts() {
        let tuning = Tuning::default();
        let gap = 0.5;
        let band = gap_band(gap, &tuning);
        assert_eq!(band.bottom, 0.0);
        // Circle bottom exactly on the gap bottom: centre at y = 0.05
        let fall = -tuning.circle_radius;
        assert_eq!(-fall - tuning.circle_radius, band.bottom);
        assert!(escapes_gap(-fall, tuning.circle_radius, band));
        assert!(circle_hits_column(&pose(fall, 1.75, gap), &tuning));

        // Slightly higher is clear of both edges
        assert!(!circle_hits_column(&pose(fall - 0.01, 1.75, gap), &tuning));
    }
}
