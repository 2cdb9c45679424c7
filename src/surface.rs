//! Drawing surfaces for auxiliary plots.
//!
//! A [`Surface`] is what a renderer draws into: it records backend-agnostic
//! commands in its own data space and knows where it sits on the figure.
//! Hosts turn the recorded commands into pixels.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geom::{FigureRect, Point, ScreenPoint, ScreenRect};
use crate::render::{DisplayMapping, LineStyle, MarkerStyle};
use crate::transform::CoordinateBridge;
use crate::view::{Range, Viewport};

static SURFACE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Padding fraction applied around a surface's content.
const CONTENT_MARGIN: f64 = 0.05;
const MIN_CONTENT_SPAN: f64 = 1e-9;

/// Unique identifier for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        Self(SURFACE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// One drawing instruction recorded on a surface, in surface data space.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    /// Unconnected markers.
    Markers {
        /// Marker positions.
        points: Vec<Point>,
        /// Marker styling.
        style: MarkerStyle,
    },
    /// A connected polyline.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Stroke styling.
        style: LineStyle,
    },
}

impl SurfaceCommand {
    fn points(&self) -> &[Point] {
        match self {
            Self::Markers { points, .. } | Self::Polyline { points, .. } => points,
        }
    }
}

/// A small plot area placed on the figure.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    position: FigureRect,
    commands: Vec<SurfaceCommand>,
    equal_aspect: bool,
}

impl Surface {
    /// Create an empty surface at `position`.
    pub fn new(position: FigureRect) -> Self {
        Self {
            id: SurfaceId::next(),
            position,
            commands: Vec::new(),
            equal_aspect: false,
        }
    }

    /// Surface identifier.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Where the surface currently sits, in figure space.
    pub fn current_position_rect(&self) -> FigureRect {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: FigureRect) {
        self.position = position;
    }

    /// Record a marker scatter from parallel coordinate slices.
    ///
    /// Extra values in the longer slice are ignored.
    pub fn scatter(&mut self, x: &[f64], y: &[f64], style: MarkerStyle) {
        let points = x.iter().zip(y).map(|(x, y)| Point::new(*x, *y)).collect();
        self.commands.push(SurfaceCommand::Markers { points, style });
    }

    /// Record a polyline from parallel coordinate slices.
    pub fn line(&mut self, x: &[f64], y: &[f64], style: LineStyle) {
        let points = x.iter().zip(y).map(|(x, y)| Point::new(*x, *y)).collect();
        self.commands.push(SurfaceCommand::Polyline { points, style });
    }

    /// Request that one data unit spans the same number of pixels on both axes.
    pub fn set_equal_aspect(&mut self, equal: bool) {
        self.equal_aspect = equal;
    }

    /// Whether equal aspect was requested.
    pub fn equal_aspect(&self) -> bool {
        self.equal_aspect
    }

    /// Recorded commands in drawing order.
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Whether nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all content and drawing flags. The position is kept.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.equal_aspect = false;
    }

    /// Data limits of the content with a small margin.
    pub fn data_bounds(&self) -> Option<Viewport> {
        let mut bounds: Option<Viewport> = None;
        for command in &self.commands {
            let Some(next) = Viewport::from_points(command.points()) else {
                continue;
            };
            bounds = Some(match bounds {
                None => next,
                Some(current) => current.union(next),
            });
        }
        bounds.map(|bounds| {
            bounds
                .padded(CONTENT_MARGIN)
                .with_min_span(MIN_CONTENT_SPAN)
        })
    }

    /// Shrink the box to the data aspect ratio when equal aspect is set,
    /// keeping the bottom-left corner where the surface was placed.
    pub(crate) fn apply_aspect(&mut self, bridge: &CoordinateBridge) {
        if !self.equal_aspect {
            return;
        }
        let Some(bounds) = self.data_bounds() else {
            return;
        };
        let (width_px, height_px) =
            bridge.figure_size_to_display(self.position.width, self.position.height);
        if width_px <= 0.0 || height_px <= 0.0 {
            return;
        }
        let data_aspect = bounds.y.span() / bounds.x.span();
        let (width_px, height_px) = if height_px / width_px > data_aspect {
            (width_px, width_px * data_aspect)
        } else {
            (height_px / data_aspect, height_px)
        };
        let (width, height) = bridge.display_size_to_figure(width_px, height_px);
        self.position = self.position.with_size(width, height);
    }

    /// Mapping from content data space into the given display rectangle.
    pub fn content_transform(&self, rect: ScreenRect) -> Option<SurfaceTransform> {
        let bounds = self.data_bounds()?;
        if !rect.is_valid() {
            return None;
        }
        Some(SurfaceTransform { bounds, rect })
    }
}

/// Linear map from a surface's data bounds into its display rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    bounds: Viewport,
    rect: ScreenRect,
}

impl SurfaceTransform {
    /// Data limits shown by the surface.
    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    /// Map a content point into display space.
    pub fn data_to_display(&self, point: Point) -> ScreenPoint {
        let x = map(point.x, self.bounds.x, self.rect.min.x, self.rect.width());
        let y = map(point.y, self.bounds.y, self.rect.min.y, self.rect.height());
        ScreenPoint::new(x, y)
    }
}

impl DisplayMapping for SurfaceTransform {
    fn to_display(&self, point: Point) -> ScreenPoint {
        self.data_to_display(point)
    }
}

fn map(value: f64, range: Range, origin: f64, extent: f64) -> f64 {
    origin + (value - range.min) / range.span() * extent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Range;

    fn bridge() -> CoordinateBridge {
        CoordinateBridge::new(
            (1000.0, 1000.0),
            FigureRect::new(0.3, 0.3, 0.4, 0.4),
            Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)),
        )
        .expect("valid bridge")
    }

    #[test]
    fn ids_are_unique() {
        let a = Surface::new(FigureRect::new(0.0, 0.0, 0.1, 0.1));
        let b = Surface::new(FigureRect::new(0.0, 0.0, 0.1, 0.1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn bounds_cover_all_commands() {
        let mut surface = Surface::new(FigureRect::new(0.0, 0.0, 0.1, 0.1));
        surface.scatter(&[0.0, 1.0], &[0.0, 2.0], MarkerStyle::default());
        surface.line(&[-1.0, 0.5], &[1.0, 1.0], LineStyle::default());
        let bounds = surface.data_bounds().expect("content");
        assert!(bounds.x.min < -1.0 && bounds.x.max > 1.0);
        assert!(bounds.y.min < 0.0 && bounds.y.max > 2.0);
    }

    #[test]
    fn clear_keeps_position() {
        let position = FigureRect::new(0.2, 0.1, 0.15, 0.15);
        let mut surface = Surface::new(position);
        surface.scatter(&[0.0], &[0.0], MarkerStyle::default());
        surface.set_equal_aspect(true);
        surface.clear();
        assert!(surface.is_empty());
        assert!(!surface.equal_aspect());
        assert_eq!(surface.current_position_rect(), position);
    }

    #[test]
    fn equal_aspect_shrinks_from_corner() {
        let mut surface = Surface::new(FigureRect::new(0.1, 0.2, 0.2, 0.2));
        surface.line(&[0.0, 2.0], &[0.0, 1.0], LineStyle::default());
        surface.set_equal_aspect(true);
        surface.apply_aspect(&bridge());
        let rect = surface.current_position_rect();
        assert_eq!((rect.left, rect.bottom), (0.1, 0.2));
        assert!((rect.width - 0.2).abs() < 1e-12);
        let bounds = surface.data_bounds().expect("content");
        let expected = 0.2 * bounds.y.span() / bounds.x.span();
        assert!((rect.height - expected).abs() < 1e-12);
    }

    #[test]
    fn content_transform_maps_bounds_to_rect() {
        let mut surface = Surface::new(FigureRect::new(0.0, 0.0, 0.1, 0.1));
        surface.scatter(&[0.0, 10.0], &[0.0, 10.0], MarkerStyle::default());
        let rect = ScreenRect::from_origin_size(ScreenPoint::new(100.0, 100.0), 50.0, 50.0);
        let transform = surface.content_transform(rect).expect("transform");
        let bounds = transform.bounds();
        let corner = transform.data_to_display(Point::new(bounds.x.min, bounds.y.max));
        assert!((corner.x - 100.0).abs() < 1e-9);
        assert!((corner.y - 150.0).abs() < 1e-9);
    }
}
