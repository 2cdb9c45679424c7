//! Geometric primitives shared by the mosaic core and its hosts.
//!
//! Three coordinate spaces are in play: data space ([`Point`]), display space
//! in pixels ([`ScreenPoint`], [`ScreenRect`]) and figure space as fractions of
//! the canvas ([`FigureRect`]). Display and figure space both grow to the right
//! and upwards from the bottom-left corner of the figure.

use serde::{Deserialize, Serialize};

/// A point in data space.
///
/// Use this when providing explicit X/Y values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in display space (pixels, origin at the bottom-left of the figure).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in pixels.
    pub x: f64,
    /// Y value in pixels, growing upwards.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn offset_from(&self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x - other.x, self.y - other.y)
    }
}

/// A rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Bottom-left corner.
    pub min: ScreenPoint,
    /// Top-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from its bottom-left corner and size.
    pub fn from_origin_size(origin: ScreenPoint, width: f64, height: f64) -> Self {
        Self::new(
            origin,
            ScreenPoint::new(origin.x + width, origin.y + height),
        )
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Geometric center.
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether the point lies inside the rectangle (edges included).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// A rectangle in figure space: `(left, bottom, width, height)` as fractions
/// of the figure extent.
///
/// Serializes as a `[left, bottom, width, height]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct FigureRect {
    /// Left edge.
    pub left: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl FigureRect {
    /// Create a new figure rectangle.
    pub fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Geometric center as `(x, y)` figure fractions.
    pub fn center(&self) -> (f64, f64) {
        (
            self.left + self.width * 0.5,
            self.bottom + self.height * 0.5,
        )
    }

    /// Same rectangle with a different size, keeping the bottom-left corner.
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self::new(self.left, self.bottom, width, height)
    }

    /// Same rectangle moved to a new bottom-left corner.
    pub fn with_origin(&self, left: f64, bottom: f64) -> Self {
        Self::new(left, bottom, self.width, self.height)
    }

    /// Bounds as `[left, bottom, width, height]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.bottom, self.width, self.height]
    }

    /// Build from `[left, bottom, width, height]`.
    pub fn from_array(bounds: [f64; 4]) -> Self {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// Check whether all four components are finite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

impl From<[f64; 4]> for FigureRect {
    fn from(bounds: [f64; 4]) -> Self {
        Self::from_array(bounds)
    }
}

impl From<FigureRect> for [f64; 4] {
    fn from(rect: FigureRect) -> Self {
        rect.to_array()
    }
}
