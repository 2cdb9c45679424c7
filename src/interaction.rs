//! Interaction helpers for picking, dragging and resizing.
//!
//! These helpers hold the positional math of the interaction controller so it
//! can be exercised without a live surface.

use crate::geom::{FigureRect, Point, ScreenPoint};
use crate::transform::CoordinateBridge;

/// Relative size change per scroll step.
pub const RESIZE_STEP: f64 = 0.1;

/// What lies under a display position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A committed auxiliary plot, by record index.
    Surface(usize),
    /// One or more main plot points within the pick radius.
    Points(Vec<usize>),
    /// Inside the main axes, away from every point.
    MainPlot,
    /// Nothing interactive.
    Outside,
}

/// Pick the candidate whose data position is closest to `query`.
///
/// Candidates outside `points` are skipped. Ties keep the earlier candidate.
pub fn nearest_point(points: &[Point], candidates: &[usize], query: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &index in candidates {
        let Some(point) = points.get(index) else {
            continue;
        };
        let dist = point.distance(query);
        if dist.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, best_dist)| dist < best_dist) {
            best = Some((index, dist));
        }
    }
    best.map(|(index, _)| index)
}

/// Indices of all points drawn within `radius` pixels of `cursor`.
pub fn points_within_radius(
    points: &[Point],
    bridge: &CoordinateBridge,
    cursor: ScreenPoint,
    radius: f64,
) -> Vec<usize> {
    let radius_sq = radius * radius;
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| point.is_finite())
        .filter(|(_, point)| {
            let screen = bridge.data_to_display(**point);
            let dx = screen.x - cursor.x;
            let dy = screen.y - cursor.y;
            dx * dx + dy * dy <= radius_sq
        })
        .map(|(index, _)| index)
        .collect()
}

/// Resize `rect` by `1 + 0.1 * step` in both directions, keeping its
/// bottom-left corner.
///
/// The result is not clamped: repeated negative steps can collapse the
/// rectangle to zero or negative size.
pub fn scaled_rect(rect: FigureRect, step: f64) -> FigureRect {
    let factor = 1.0 + RESIZE_STEP * step;
    rect.with_size(rect.width * factor, rect.height * factor)
}

/// Position of a dragged rectangle whose bottom-left corner trails the
/// cursor by `grab_offset` pixels.
pub fn dragged_rect(
    rect: FigureRect,
    cursor: ScreenPoint,
    grab_offset: ScreenPoint,
    bridge: &CoordinateBridge,
) -> FigureRect {
    let (left, bottom) = bridge.display_to_figure(cursor.offset_from(grab_offset));
    rect.with_origin(left, bottom)
}

/// Grab offset used when a freshly picked plot starts following the cursor:
/// the plot keeps the mouse distance it was previewed at.
pub fn new_drag_grab_offset(bridge: &CoordinateBridge, mouse_dist: (f64, f64)) -> ScreenPoint {
    let (dx, dy) = bridge.figure_size_to_display(mouse_dist.0, mouse_dist.1);
    ScreenPoint::new(-dx, -dy)
}

/// Placement of a preview plot next to the cursor.
pub fn preview_rect(
    bridge: &CoordinateBridge,
    cursor: ScreenPoint,
    mouse_dist: (f64, f64),
    size: (f64, f64),
) -> FigureRect {
    let (x, y) = bridge.display_to_figure(cursor);
    FigureRect::new(x + mouse_dist.0, y + mouse_dist.1, size.0, size.1)
}

/// Index of the last rectangle (topmost when drawn in order) containing
/// `cursor`.
pub(crate) fn topmost_containing<I>(
    rects: I,
    bridge: &CoordinateBridge,
    cursor: ScreenPoint,
) -> Option<usize>
where
    I: DoubleEndedIterator<Item = (usize, FigureRect)>,
{
    rects
        .rev()
        .find(|(_, rect)| bridge.figure_rect_to_display(*rect).contains(cursor))
        .map(|(index, _)| index)
}
