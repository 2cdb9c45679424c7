//! Axis limits for the main plot and for auxiliary plot content.

use crate::geom::Point;

/// Closed interval on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower limit.
    pub min: f64,
    /// Upper limit.
    pub max: f64,
}

impl Range {
    /// Interval between `a` and `b`, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Width of the interval.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Both limits are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Grow to cover `value`. Non-finite values are ignored.
    pub fn include(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    /// Grow both ends by `frac` of the span, like a plot margin.
    pub fn padded(&self, frac: f64) -> Self {
        let pad = self.span().abs() * frac;
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Widen around the midpoint until the span is at least `min_span`.
    pub fn with_min_span(&self, min_span: f64) -> Self {
        if self.span() >= min_span {
            return *self;
        }
        let mid = (self.min + self.max) * 0.5;
        Self {
            min: mid - min_span * 0.5,
            max: mid + min_span * 0.5,
        }
    }
}

/// Data limits on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal limits.
    pub x: Range,
    /// Vertical limits.
    pub y: Range,
}

impl Viewport {
    /// Combine per-axis limits.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Bounding box of the finite points, or `None` when there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let mut finite = points.iter().filter(|point| point.is_finite());
        let first = finite.next()?;
        let mut bounds = Self::new(Range::new(first.x, first.x), Range::new(first.y, first.y));
        for point in finite {
            bounds.x.include(point.x);
            bounds.y.include(point.y);
        }
        Some(bounds)
    }

    /// Smallest viewport covering both.
    pub fn union(&self, other: Viewport) -> Self {
        Self::new(
            Range::new(self.x.min.min(other.x.min), self.x.max.max(other.x.max)),
            Range::new(self.y.min.min(other.y.min), self.y.max.max(other.y.max)),
        )
    }

    /// Margin of `frac` on every side.
    pub fn padded(&self, frac: f64) -> Self {
        Self::new(self.x.padded(frac), self.y.padded(frac))
    }

    /// Minimum span on both axes.
    pub fn with_min_span(&self, min_span: f64) -> Self {
        Self::new(self.x.with_min_span(min_span), self.y.with_min_span(min_span))
    }
}
