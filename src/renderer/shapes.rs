//! Per-frame geometry for the three drawables
//!
//! Every frame builds fresh position/color arrays; nothing is cached.

use glam::Vec2;

use super::vertex::{Color, Position};
use crate::config::{CircleAngles, Tuning};
use crate::sim::{FrameOutcome, column_span, gap_band};

/// Half extents of the fail marker rectangle
pub const FAIL_MARKER_HALF: Vec2 = Vec2::new(1.0, 2.0);

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const FAIL_MARKER: Color = [0.0, 1.0, 0.0];
    pub const COLUMN: Color = [0.0, 0.0, 1.0];
    pub const CIRCLE: Color = [1.0, 0.0, 0.0];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drawable {
    FailMarker,
    ColumnPair,
    Circle,
}

/// One draw call's worth of geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub drawable: Drawable,
    pub topology: Topology,
    pub positions: Vec<Position>,
    pub colors: Vec<Color>,
}

impl Mesh {
    fn solid(drawable: Drawable, topology: Topology, positions: Vec<Position>, color: Color) -> Self {
        let colors = vec![color; positions.len()];
        Self {
            drawable,
            topology,
            positions,
            colors,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Two triangles covering `[left, right] x [bottom, top]`
fn rect(left: f32, right: f32, bottom: f32, top: f32, out: &mut Vec<Position>) {
    out.extend_from_slice(&[
        [right, top, 0.0],
        [left, top, 0.0],
        [left, bottom, 0.0],
        [left, bottom, 0.0],
        [right, bottom, 0.0],
        [right, top, 0.0],
    ]);
}

/// Flat rectangle shown alone once the game has failed
pub fn fail_marker() -> Mesh {
    let mut positions = Vec::with_capacity(6);
    rect(
        -FAIL_MARKER_HALF.x,
        FAIL_MARKER_HALF.x,
        -FAIL_MARKER_HALF.y,
        FAIL_MARKER_HALF.y,
        &mut positions,
    );
    Mesh::solid(
        Drawable::FailMarker,
        Topology::Triangles,
        positions,
        colors::FAIL_MARKER,
    )
}

/// Upper and lower column segments around the gap (12 vertices)
pub fn column_pair(obstacle_shift: f32, gap_height: f32, tuning: &Tuning) -> Mesh {
    let span = column_span(obstacle_shift, tuning);
    let gap = gap_band(gap_height, tuning);

    let mut positions = Vec::with_capacity(12);
    rect(span.left, span.right, gap.top, tuning.column_top, &mut positions);
    rect(
        span.left,
        span.right,
        tuning.column_bottom,
        gap.bottom,
        &mut positions,
    );
    Mesh::solid(
        Drawable::ColumnPair,
        Topology::Triangles,
        positions,
        colors::COLUMN,
    )
}

/// Centre point plus `rim_points` points drawn as a point cloud
pub fn circle_points(center: Vec2, radius: f32, rim_points: u32, angles: CircleAngles) -> Mesh {
    let mut positions = Vec::with_capacity(rim_points as usize + 1);
    positions.push([center.x, center.y, 0.0]);
    for counter in 1..=rim_points {
        let theta = angles.angle(counter);
        positions.push([
            center.x + theta.sin() * radius,
            center.y + theta.cos() * radius,
            0.0,
        ]);
    }
    Mesh::solid(Drawable::Circle, Topology::Points, positions, colors::CIRCLE)
}

/// Everything a frame draws, in submission order
pub fn scene(outcome: &FrameOutcome, tuning: &Tuning) -> Vec<Mesh> {
    match outcome {
        FrameOutcome::Failed { .. } => vec![fail_marker()],
        FrameOutcome::Playing { pose, .. } => vec![
            circle_points(
                Vec2::new(tuning.circle_x, pose.circle_y()),
                tuning.circle_radius,
                tuning.circle_rim_points,
                tuning.circle_angles,
            ),
            column_pair(pose.obstacle_shift, pose.gap_height, tuning),
        ],
    }
}
