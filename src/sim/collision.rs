//! Collision and line-of-sight tests for axis-aligned geometry
//!
//! Segment tests use strict orientation checks: collinear contact (a sight
//! line running exactly along a pillar edge) reports no intersection.

use glam::Vec2;

use super::rect::Rect;

/// Strict counter-clockwise orientation of `a`, `b`, `c`
#[inline]
fn ccw(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Check whether segment AB crosses segment CD
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Check whether segment p1-p2 crosses any of the rectangle's four edges
///
/// A segment lying entirely inside the rectangle crosses no edge and is not
/// reported.
pub fn segment_intersects_rect(p1: Vec2, p2: Vec2, rect: &Rect) -> bool {
    rect.edges()
        .iter()
        .any(|&(c, d)| segments_intersect(p1, p2, c, d))
}

/// Check whether any obstacle blocks the segment p1-p2
pub fn segment_blocked(p1: Vec2, p2: Vec2, obstacles: &[Rect]) -> bool {
    obstacles
        .iter()
        .any(|obs| segment_intersects_rect(p1, p2, obs))
}

/// Check whether a rectangle overlaps any obstacle
pub fn overlaps_any(rect: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|obs| rect.overlaps(obs))
}

/// Outcome of testing each axis of a move separately
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    /// Displacement that survived the per-axis tests
    pub delta: Vec2,
    /// X displacement was accepted
    pub x_clear: bool,
    /// Y displacement was accepted
    pub y_clear: bool,
}

impl AxisResolution {
    /// Neither axis could move
    pub fn fully_blocked(&self) -> bool {
        !self.x_clear && !self.y_clear
    }
}

/// Test the X and Y displacement of `body` independently against obstacles
///
/// An axis whose displaced box overlaps an obstacle is rejected. Moving
/// diagonally into a wall slides along it. Corners where both single-axis
/// tests pass are not checked for the combined move.
pub fn resolve_axes(body: &Rect, desired: Vec2, obstacles: &[Rect]) -> AxisResolution {
    let x_clear = !overlaps_any(&body.translated(Vec2::new(desired.x, 0.0)), obstacles);
    let y_clear = !overlaps_any(&body.translated(Vec2::new(0.0, desired.y)), obstacles);

    AxisResolution {
        delta: Vec2::new(
            if x_clear { desired.x } else { 0.0 },
            if y_clear { desired.y } else { 0.0 },
        ),
        x_clear,
        y_clear,
    }
}

/// Axis-separated movement resolution: blocked axes are zeroed
pub fn resolve_axis_movement(body: &Rect, desired: Vec2, obstacles: &[Rect]) -> Vec2 {
    resolve_axes(body, desired, obstacles).delta
}
