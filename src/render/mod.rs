//! Backend-neutral drawing primitives for the mosaic and the geometry helpers
//! that feed them.
//!
//! These types are backend-agnostic and are used by hosts (such as the GPUI
//! backend) to describe how a mosaic should be drawn. All screen coordinates
//! are display space: pixels from the bottom-left corner of the figure.

mod frame;

pub use frame::build_frame;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, ScreenPoint, ScreenRect};

/// Straight RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Color {
    /// Color from its four components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey of the given intensity.
    pub const fn grey(level: f32) -> Self {
        Self::new(level, level, level, 1.0)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
}

/// Stroke for polylines and guide lines, sized in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Color.
    pub color: Color,
    /// Thickness in pixels.
    pub width: f32,
    /// Dash and gap lengths; solid when absent.
    pub dash: Option<[f32; 2]>,
}

impl LineStyle {
    /// Grey dashed stroke used for guide lines.
    pub fn guide() -> Self {
        Self {
            color: Color::grey(0.7),
            width: 1.0,
            dash: Some([6.0, 4.0]),
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            dash: None,
        }
    }
}

/// Glyph drawn at each scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    /// Filled disc.
    Circle,
    /// Filled square.
    Square,
    /// Triangle pointing up.
    Triangle,
    /// Plus sign.
    Cross,
}

/// Scatter marker appearance. `size` is the glyph width in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Fill color.
    pub color: Color,
    /// Glyph width.
    pub size: f32,
    /// Glyph.
    pub shape: MarkerShape,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 4.0,
            shape: MarkerShape::Circle,
        }
    }
}

/// Fill and border of an axes box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Border color.
    pub stroke: Color,
    /// Border width in pixels.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::new(0.0, 0.0, 0.0, 0.0),
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Straight piece of a stroke, in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First endpoint.
    pub start: ScreenPoint,
    /// Second endpoint.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Segment from `start` to `end`.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }

    /// Segment length in pixels.
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// One backend-neutral drawing instruction in display space.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Clip everything that follows to a rectangle.
    ClipRect(ScreenRect),
    /// Pop the innermost clip.
    ClipEnd,
    /// Stroke segments.
    LineSegments {
        /// Pieces, already clipped.
        segments: Vec<LineSegment>,
        /// Stroke.
        style: LineStyle,
    },
    /// Stamp markers.
    Points {
        /// Marker centers.
        points: Vec<ScreenPoint>,
        /// Glyph and color.
        style: MarkerStyle,
    },
    /// Filled, bordered box.
    Rect {
        /// Box in display space.
        rect: ScreenRect,
        /// Fill and border.
        style: RectStyle,
    },
}

/// Ordered drawing instructions for one frame, back to front.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction on top of the previous ones.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Instructions in painting order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }
}

/// Data-to-display mapping used by the geometry builders.
pub(crate) trait DisplayMapping {
    fn to_display(&self, point: Point) -> ScreenPoint;
}

impl DisplayMapping for crate::transform::CoordinateBridge {
    fn to_display(&self, point: Point) -> ScreenPoint {
        self.data_to_display(point)
    }
}

/// Turn a data-space polyline into clipped display segments. A non-finite
/// vertex breaks the line.
pub(crate) fn build_line_segments(
    points: &[Point],
    mapping: &impl DisplayMapping,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    for window in points.windows(2) {
        if !window[0].is_finite() || !window[1].is_finite() {
            continue;
        }
        let start = mapping.to_display(window[0]);
        let end = mapping.to_display(window[1]);
        if let Some((clipped_start, clipped_end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(clipped_start, clipped_end));
        }
    }
}

/// Map finite points to display space, keeping those inside `clip`.
pub(crate) fn build_scatter_points(
    points: &[Point],
    mapping: &impl DisplayMapping,
    clip: ScreenRect,
    out: &mut Vec<ScreenPoint>,
) {
    out.clear();
    for point in points {
        if !point.is_finite() {
            continue;
        }
        let screen = mapping.to_display(*point);
        if clip.contains(screen) {
            out.push(screen);
        }
    }
}

/// Split a segment into dashes of `dash` pixels separated by `gap` pixels.
pub(crate) fn dash_segment(segment: LineSegment, dash: f32, gap: f32, out: &mut Vec<LineSegment>) {
    let length = segment.length();
    let dash = f64::from(dash.max(0.5));
    let period = dash + f64::from(gap.max(0.0));
    if length <= f64::EPSILON || period <= f64::EPSILON {
        return;
    }
    let dx = (segment.end.x - segment.start.x) / length;
    let dy = (segment.end.y - segment.start.y) / length;
    let at = |distance: f64| {
        ScreenPoint::new(
            segment.start.x + dx * distance,
            segment.start.y + dy * distance,
        )
    };
    let mut offset = 0.0;
    while offset < length {
        let end = (offset + dash).min(length);
        out.push(LineSegment::new(at(offset), at(end)));
        offset += period;
    }
}

/// Clip a segment to `rect` (Liang-Barsky). `None` when nothing is left.
fn clip_segment(
    start: ScreenPoint,
    end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, start.x - rect.min.x),
        (dx, rect.max.x - start.x),
        (-dy, start.y - rect.min.y),
        (dy, rect.max.y - start.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    let at = |t: f64| ScreenPoint::new(start.x + dx * t, start.y + dy * t);
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::FigureRect;
    use crate::transform::CoordinateBridge;
    use crate::view::{Range, Viewport};

    fn unit_box() -> ScreenRect {
        ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(100.0, 50.0))
    }

    #[test]
    fn contained_segment_is_untouched() {
        let (a, b) = (ScreenPoint::new(10.0, 40.0), ScreenPoint::new(90.0, 5.0));
        assert_eq!(clip_segment(a, b, unit_box()), Some((a, b)));
    }

    #[test]
    fn guide_leaving_the_box_is_cut_at_both_edges() {
        let (a, b) = clip_segment(
            ScreenPoint::new(-50.0, 25.0),
            ScreenPoint::new(150.0, 25.0),
            unit_box(),
        )
        .expect("crosses the box");
        assert_eq!(a, ScreenPoint::new(0.0, 25.0));
        assert_eq!(b, ScreenPoint::new(100.0, 25.0));
    }

    #[test]
    fn segment_beside_the_box_is_dropped() {
        let above = clip_segment(
            ScreenPoint::new(10.0, 60.0),
            ScreenPoint::new(90.0, 80.0),
            unit_box(),
        );
        assert!(above.is_none());
        let vertical_outside = clip_segment(
            ScreenPoint::new(120.0, 0.0),
            ScreenPoint::new(120.0, 50.0),
            unit_box(),
        );
        assert!(vertical_outside.is_none());
    }

    #[test]
    fn polyline_skips_gaps_at_non_finite_points() {
        let viewport = Viewport::new(Range::new(0.0, 4.0), Range::new(0.0, 4.0));
        let bridge =
            CoordinateBridge::new((400.0, 400.0), FigureRect::new(0.0, 0.0, 1.0, 1.0), viewport)
                .expect("valid bridge");
        let polyline = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(f64::NAN, 2.0),
            Point::new(3.0, 3.0),
            Point::new(4.0, 2.0),
        ];
        let mut out = vec![LineSegment::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 1.0))];
        build_line_segments(&polyline, &bridge, bridge.axes_display_rect(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].end, ScreenPoint::new(100.0, 100.0));
    }

    #[test]
    fn guide_dashes_end_on_the_segment() {
        let guide = LineSegment::new(ScreenPoint::new(0.0, 10.0), ScreenPoint::new(0.0, 32.0));
        let mut out = Vec::new();
        dash_segment(guide, 4.0, 4.0, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].start, ScreenPoint::new(0.0, 18.0));
        assert_eq!(out[2].end, ScreenPoint::new(0.0, 30.0));
    }
}
