//! Coordinate transforms between data, display and figure space.

use crate::geom::{FigureRect, Point, ScreenPoint, ScreenRect};
use crate::view::{Range, Viewport};

const MIN_SPAN: f64 = 1e-12;
/// Fraction of the data extent added on each side of the main plot.
const AXES_MARGIN: f64 = 0.05;
/// Span used when all points share one coordinate.
const DEGENERATE_SPAN: f64 = 1.0;

/// Converts between the three coordinate spaces of a mosaic.
///
/// Display space is measured in pixels from the bottom-left corner of the
/// figure. The main axes occupy `axes_rect` (figure space) and show
/// `viewport` (data space).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateBridge {
    figure_size: (f64, f64),
    axes_rect: FigureRect,
    viewport: Viewport,
}

impl CoordinateBridge {
    /// Create a bridge for a figure of `figure_size` pixels.
    ///
    /// Returns `None` when the figure or the axes have no area, or when the
    /// viewport is not finite.
    pub fn new(figure_size: (f64, f64), axes_rect: FigureRect, viewport: Viewport) -> Option<Self> {
        if !(figure_size.0 > 0.0 && figure_size.1 > 0.0) {
            return None;
        }
        if !axes_rect.is_finite() || axes_rect.width <= 0.0 || axes_rect.height <= 0.0 {
            return None;
        }
        if !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        Some(Self {
            figure_size,
            axes_rect,
            viewport: viewport.with_min_span(MIN_SPAN),
        })
    }

    /// Create a bridge whose viewport frames `points` with a 5% margin.
    pub fn for_points(
        figure_size: (f64, f64),
        axes_rect: FigureRect,
        points: &[Point],
    ) -> Option<Self> {
        Self::new(figure_size, axes_rect, main_viewport(points))
    }

    /// Figure size in pixels.
    pub fn figure_size(&self) -> (f64, f64) {
        self.figure_size
    }

    /// Main axes rectangle in figure space.
    pub fn axes_rect(&self) -> FigureRect {
        self.axes_rect
    }

    /// Data limits of the main axes.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Re-target the bridge to a resized figure. Ignores sizes without area.
    pub fn set_figure_size(&mut self, width: f64, height: f64) -> bool {
        if !(width > 0.0 && height > 0.0) {
            return false;
        }
        self.figure_size = (width, height);
        true
    }

    /// Main axes rectangle in display space.
    pub fn axes_display_rect(&self) -> ScreenRect {
        self.figure_rect_to_display(self.axes_rect)
    }

    /// Map a data point into display space.
    pub fn data_to_display(&self, point: Point) -> ScreenPoint {
        let screen = self.axes_display_rect();
        let x_norm = (point.x - self.viewport.x.min) / self.viewport.x.span();
        let y_norm = (point.y - self.viewport.y.min) / self.viewport.y.span();
        ScreenPoint::new(
            screen.min.x + x_norm * screen.width(),
            screen.min.y + y_norm * screen.height(),
        )
    }

    /// Map a display point into data space.
    pub fn display_to_data(&self, point: ScreenPoint) -> Point {
        let screen = self.axes_display_rect();
        let x_norm = (point.x - screen.min.x) / screen.width();
        let y_norm = (point.y - screen.min.y) / screen.height();
        Point::new(
            self.viewport.x.min + x_norm * self.viewport.x.span(),
            self.viewport.y.min + y_norm * self.viewport.y.span(),
        )
    }

    /// Map a display point into figure fractions.
    pub fn display_to_figure(&self, point: ScreenPoint) -> (f64, f64) {
        (point.x / self.figure_size.0, point.y / self.figure_size.1)
    }

    /// Map figure fractions into display space.
    pub fn figure_to_display(&self, x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(x * self.figure_size.0, y * self.figure_size.1)
    }

    /// Map a data point into figure fractions.
    pub fn data_to_figure(&self, point: Point) -> (f64, f64) {
        self.display_to_figure(self.data_to_display(point))
    }

    /// Map figure fractions into data space.
    pub fn figure_to_data(&self, x: f64, y: f64) -> Point {
        self.display_to_data(self.figure_to_display(x, y))
    }

    /// Convert a size in figure fractions into pixels.
    pub fn figure_size_to_display(&self, width: f64, height: f64) -> (f64, f64) {
        (width * self.figure_size.0, height * self.figure_size.1)
    }

    /// Convert a size in pixels into figure fractions.
    pub fn display_size_to_figure(&self, width: f64, height: f64) -> (f64, f64) {
        (width / self.figure_size.0, height / self.figure_size.1)
    }

    /// Convert a figure rectangle into display space.
    pub fn figure_rect_to_display(&self, rect: FigureRect) -> ScreenRect {
        let origin = self.figure_to_display(rect.left, rect.bottom);
        let (width, height) = self.figure_size_to_display(rect.width, rect.height);
        ScreenRect::from_origin_size(origin, width, height)
    }

    /// Convert a display rectangle into figure space.
    pub fn display_rect_to_figure(&self, rect: ScreenRect) -> FigureRect {
        let (left, bottom) = self.display_to_figure(rect.min);
        let (width, height) = self.display_size_to_figure(rect.width(), rect.height());
        FigureRect::new(left, bottom, width, height)
    }

    /// Data-space location of the visual center of a figure rectangle.
    pub fn figure_rect_center_in_data(&self, rect: FigureRect) -> Point {
        self.display_to_data(self.figure_rect_to_display(rect).center())
    }
}

/// Main plot limits: the bounding box of `points` with a 5% margin per axis.
pub fn main_viewport(points: &[Point]) -> Viewport {
    let bounds = Viewport::from_points(points)
        .unwrap_or_else(|| Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)));
    let padded = bounds.padded(AXES_MARGIN);
    Viewport::new(widen_degenerate(padded.x), widen_degenerate(padded.y))
}

fn widen_degenerate(range: Range) -> Range {
    if range.span() < MIN_SPAN {
        range.with_min_span(DEGENERATE_SPAN)
    } else {
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge() -> CoordinateBridge {
        let viewport = Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0));
        CoordinateBridge::new(
            (1000.0, 500.0),
            FigureRect::new(0.3, 0.3, 0.4, 0.4),
            viewport,
        )
        .expect("valid bridge")
    }

    #[test]
    fn linear_roundtrip() {
        let bridge = bridge();
        let point = Point::new(5.0, 7.5);
        let screen = bridge.data_to_display(point);
        let roundtrip = bridge.display_to_data(screen);
        assert!((roundtrip.x - point.x).abs() < 1e-9);
        assert!((roundtrip.y - point.y).abs() < 1e-9);
    }

    #[test]
    fn data_origin_maps_to_axes_corner() {
        let bridge = bridge();
        let screen = bridge.data_to_display(Point::new(0.0, 0.0));
        assert!((screen.x - 300.0).abs() < 1e-9);
        assert!((screen.y - 150.0).abs() < 1e-9);
        let (fx, fy) = bridge.data_to_figure(Point::new(10.0, 10.0));
        assert!((fx - 0.7).abs() < 1e-9);
        assert!((fy - 0.7).abs() < 1e-9);
    }

    #[test]
    fn rect_conversion_roundtrip() {
        let bridge = bridge();
        let rect = FigureRect::new(0.05, 0.6, 0.15, 0.2);
        let back = bridge.display_rect_to_figure(bridge.figure_rect_to_display(rect));
        for (a, b) in rect.to_array().iter().zip(back.to_array()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_empty_figure() {
        let viewport = Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0));
        let axes = FigureRect::new(0.3, 0.3, 0.4, 0.4);
        assert!(CoordinateBridge::new((0.0, 100.0), axes, viewport).is_none());
        assert!(CoordinateBridge::new((100.0, 100.0), axes.with_size(0.0, 0.4), viewport).is_none());
    }

    #[test]
    fn main_viewport_pads_and_widens() {
        let viewport = main_viewport(&[Point::new(0.0, 2.0), Point::new(10.0, 2.0)]);
        assert!((viewport.x.min + 0.5).abs() < 1e-9);
        assert!((viewport.x.max - 10.5).abs() < 1e-9);
        assert!((viewport.y.span() - 1.0).abs() < 1e-9);
        assert!((viewport.y.min - 1.5).abs() < 1e-9);
    }
}
