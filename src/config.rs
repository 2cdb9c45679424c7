//! Mosaic configuration.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geom::FigureRect;
use crate::render::{Color, LineStyle, MarkerShape, MarkerStyle};

/// Offset between the cursor and a newly placed auxiliary plot, in figure
/// fractions.
pub const DRAG_AXES_MOUSE_DIST: (f64, f64) = (0.005, 0.005);

/// Drawing options for the main scatter and the guide lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainPlotStyle {
    /// Marker used for the points of the main plot.
    pub marker: MarkerStyle,
    /// One color per point, overriding `marker.color`.
    pub point_colors: Option<Vec<Color>>,
    /// Stroke used for guide lines.
    pub guide_line: LineStyle,
}

impl MainPlotStyle {
    /// Color every point individually, in point order.
    pub fn with_point_colors(mut self, colors: Vec<Color>) -> Self {
        self.point_colors = Some(colors);
        self
    }

    /// Color of point `index`.
    pub fn point_color(&self, index: usize) -> Color {
        self.point_colors
            .as_ref()
            .and_then(|colors| colors.get(index).copied())
            .unwrap_or(self.marker.color)
    }

    /// Per-point colors must cover exactly `points` points.
    pub fn check_point_count(&self, points: usize) -> Result<(), ValidationError> {
        match &self.point_colors {
            Some(colors) if colors.len() != points => Err(ValidationError::PointColorMismatch {
                points,
                colors: colors.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for MainPlotStyle {
    fn default() -> Self {
        Self {
            marker: MarkerStyle {
                color: Color::BLACK,
                size: 6.0,
                shape: MarkerShape::Circle,
            },
            point_colors: None,
            guide_line: LineStyle::guide(),
        }
    }
}

/// Layout and behaviour of a mosaic.
///
/// Sizes in figure space are fractions of the figure; the figure itself is
/// measured in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Figure width and height in pixels.
    pub figure_size: (f64, f64),
    /// Main axes placement in figure space.
    pub main_axes_rect: FigureRect,
    /// Initial width and height of auxiliary plots in figure space.
    pub drag_axes_size: (f64, f64),
    /// Pixel radius within which a point counts as hit.
    pub picker_radius: f64,
    /// Keep auxiliary plot content visible while it is dragged.
    pub show_movement: bool,
    /// Main plot drawing options.
    pub main_plot: MainPlotStyle,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            figure_size: (1200.0, 960.0),
            main_axes_rect: FigureRect::new(0.3, 0.3, 0.4, 0.4),
            drag_axes_size: (0.15, 0.15),
            picker_radius: 5.0,
            show_movement: true,
            main_plot: MainPlotStyle::default(),
        }
    }
}

impl MosaicConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder::default()
    }

    /// Check that every size is finite and positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (width, height) = self.figure_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "figure size must be positive, got {width}x{height}"
            )));
        }
        let axes = self.main_axes_rect;
        if !axes.is_finite() || axes.width <= 0.0 || axes.height <= 0.0 {
            return Err(ValidationError::InvalidConfig(format!(
                "main axes rectangle must have positive size, got {:?}",
                axes.to_array()
            )));
        }
        let (aux_width, aux_height) = self.drag_axes_size;
        if !(aux_width.is_finite() && aux_height.is_finite() && aux_width > 0.0 && aux_height > 0.0)
        {
            return Err(ValidationError::InvalidConfig(format!(
                "auxiliary plot size must be positive, got {aux_width}x{aux_height}"
            )));
        }
        if !(self.picker_radius.is_finite() && self.picker_radius >= 0.0) {
            return Err(ValidationError::InvalidConfig(format!(
                "picker radius must be non-negative, got {}",
                self.picker_radius
            )));
        }
        Ok(())
    }
}

/// Builder for [`MosaicConfig`].
#[derive(Debug, Default)]
pub struct MosaicConfigBuilder {
    config: MosaicConfig,
}

impl MosaicConfigBuilder {
    /// Set the figure size in pixels.
    pub fn figure_size(mut self, width: f64, height: f64) -> Self {
        self.config.figure_size = (width, height);
        self
    }

    /// Set the main axes placement in figure space.
    pub fn main_axes_rect(mut self, rect: FigureRect) -> Self {
        self.config.main_axes_rect = rect;
        self
    }

    /// Set the initial auxiliary plot size in figure space.
    pub fn drag_axes_size(mut self, width: f64, height: f64) -> Self {
        self.config.drag_axes_size = (width, height);
        self
    }

    /// Set the pick radius in pixels.
    pub fn picker_radius(mut self, radius: f64) -> Self {
        self.config.picker_radius = radius;
        self
    }

    /// Show or hide auxiliary plot content while dragging.
    pub fn show_movement(mut self, show: bool) -> Self {
        self.config.show_movement = show;
        self
    }

    /// Set the main plot drawing options.
    pub fn main_plot(mut self, style: MainPlotStyle) -> Self {
        self.config.main_plot = style;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<MosaicConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MosaicConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_rejects_zero_aux_size() {
        let err = MosaicConfig::builder()
            .drag_axes_size(0.0, 0.15)
            .build()
            .expect_err("zero width");
        assert!(matches!(err, ValidationError::InvalidConfig(_)));
    }

    #[test]
    fn builder_overrides() {
        let config = MosaicConfig::builder()
            .figure_size(800.0, 600.0)
            .picker_radius(8.0)
            .show_movement(false)
            .build()
            .expect("valid config");
        assert_eq!(config.figure_size, (800.0, 600.0));
        assert_eq!(config.picker_radius, 8.0);
        assert!(!config.show_movement);
    }

    #[test]
    fn point_colors_fall_back_to_marker_color() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let style = MainPlotStyle::default().with_point_colors(vec![red, Color::WHITE]);
        assert_eq!(style.point_color(0), red);
        assert_eq!(style.point_color(1), Color::WHITE);
        assert_eq!(style.point_color(2), Color::BLACK);
        assert!(style.check_point_count(2).is_ok());
        assert_eq!(
            style.check_point_count(3),
            Err(ValidationError::PointColorMismatch {
                points: 3,
                colors: 2
            })
        );
    }
}
