//! Mosaic state: points, payloads and the auxiliary plots spawned from them.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::MosaicConfig;
use crate::error::ValidationError;
use crate::geom::{FigureRect, Point};
use crate::renderer::SharedRenderer;
use crate::surface::Surface;
use crate::transform::CoordinateBridge;

/// A dashed connector from a point to the center of its auxiliary plot, in
/// main plot data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    /// The source point.
    pub start: Point,
    /// The auxiliary plot's visual center.
    pub end: Point,
}

impl GuideLine {
    /// Create a guide line.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// One spawned auxiliary plot.
#[derive(Debug, Clone)]
pub struct AuxiliaryPlot {
    point_index: usize,
    surface: Surface,
    guide_line: GuideLine,
}

impl AuxiliaryPlot {
    pub(crate) fn new(point_index: usize, surface: Surface, guide_line: GuideLine) -> Self {
        Self {
            point_index,
            surface,
            guide_line,
        }
    }

    /// Index of the point this plot belongs to.
    pub fn point_index(&self) -> usize {
        self.point_index
    }

    /// The drawing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Current placement in figure space.
    pub fn position(&self) -> FigureRect {
        self.surface.current_position_rect()
    }

    /// Guide line to the source point.
    pub fn guide_line(&self) -> GuideLine {
        self.guide_line
    }

    pub(crate) fn set_guide_line(&mut self, line: GuideLine) {
        self.guide_line = line;
    }
}

/// The two ways to obtain a mosaic: from fresh data or from a saved file.
pub enum MosaicSource<P> {
    /// Build from parallel coordinates and per-point payloads.
    Fresh {
        /// X values of the main plot.
        x: Vec<f64>,
        /// Y values of the main plot.
        y: Vec<f64>,
        /// One payload per point.
        payloads: Vec<P>,
        /// Renderer for auxiliary plots; the registry fallback when `None`.
        renderer: Option<SharedRenderer<P>>,
        /// Layout and behaviour.
        config: MosaicConfig,
    },
    /// Load a previously saved mosaic.
    File(PathBuf),
}

impl<P> From<PathBuf> for MosaicSource<P> {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl<P> From<&std::path::Path> for MosaicSource<P> {
    fn from(path: &std::path::Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl<P> From<&str> for MosaicSource<P> {
    fn from(path: &str) -> Self {
        Self::File(PathBuf::from(path))
    }
}

impl<P> From<String> for MosaicSource<P> {
    fn from(path: String) -> Self {
        Self::File(PathBuf::from(path))
    }
}

/// Points, payloads and every committed auxiliary plot.
pub struct MosaicState<P> {
    points: Vec<Point>,
    payloads: Vec<P>,
    config: MosaicConfig,
    renderer: SharedRenderer<P>,
    bridge: CoordinateBridge,
    plots: Vec<AuxiliaryPlot>,
    selected_points: Vec<usize>,
}

impl<P> MosaicState<P> {
    /// Create a mosaic with no auxiliary plots.
    ///
    /// Fails when `x`, `y` and `payloads` differ in length, a coordinate is
    /// NaN or infinite, or the configuration is unusable.
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        payloads: Vec<P>,
        config: MosaicConfig,
        renderer: SharedRenderer<P>,
    ) -> Result<Self, ValidationError> {
        if x.len() != y.len() {
            return Err(ValidationError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() != payloads.len() {
            return Err(ValidationError::PayloadMismatch {
                points: x.len(),
                payloads: payloads.len(),
            });
        }
        config.validate()?;
        let points: Vec<Point> = x.into_iter().zip(y).map(|(x, y)| Point::new(x, y)).collect();
        if let Some(index) = points.iter().position(|point| !point.is_finite()) {
            return Err(ValidationError::NonFiniteCoordinate { index });
        }
        config.main_plot.check_point_count(points.len())?;
        let bridge = bridge_for(&config, &points)?;
        debug!(points = points.len(), "mosaic created");
        Ok(Self {
            points,
            payloads,
            config,
            renderer,
            bridge,
            plots: Vec::new(),
            selected_points: Vec::new(),
        })
    }

    /// Points of the main plot.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Payloads, one per point.
    pub fn payloads(&self) -> &[P] {
        &self.payloads
    }

    /// Payload of a single point.
    pub fn payload(&self, index: usize) -> Option<&P> {
        self.payloads.get(index)
    }

    /// Current configuration.
    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Renderer used for auxiliary plot content.
    pub fn renderer(&self) -> &SharedRenderer<P> {
        &self.renderer
    }

    /// Coordinate conversions for the current layout.
    pub fn bridge(&self) -> &CoordinateBridge {
        &self.bridge
    }

    /// Committed auxiliary plots in creation order.
    pub fn plots(&self) -> &[AuxiliaryPlot] {
        &self.plots
    }

    /// A committed auxiliary plot by record index.
    pub fn plot(&self, index: usize) -> Option<&AuxiliaryPlot> {
        self.plots.get(index)
    }

    /// Every confirmed pick, in order.
    pub fn selected_points(&self) -> &[usize] {
        &self.selected_points
    }

    pub(crate) fn record_selection(&mut self, index: usize) {
        self.selected_points.push(index);
    }

    pub(crate) fn set_selected_points(&mut self, selected: Vec<usize>) {
        self.selected_points = selected;
    }

    /// Create a surface at `position` and let the renderer fill it with the
    /// payload of `point_index`.
    ///
    /// Returns `None` for an unknown point.
    pub fn create_surface(&self, point_index: usize, position: FigureRect) -> Option<Surface> {
        let mut surface = Surface::new(position);
        self.render_into(point_index, &mut surface)?;
        Some(surface)
    }

    /// Clear `surface` and draw the payload of `point_index` again, then
    /// re-anchor the surface if the renderer asked for equal aspect.
    pub(crate) fn render_into(&self, point_index: usize, surface: &mut Surface) -> Option<()> {
        let payload = self.payloads.get(point_index)?;
        let placed = surface.current_position_rect();
        surface.clear();
        surface.set_position(placed);
        self.renderer.render(payload, surface);
        surface.apply_aspect(&self.bridge);
        Some(())
    }

    /// Guide line from `point_index` to the center of `position`.
    pub fn guide_line_for(&self, point_index: usize, position: FigureRect) -> Option<GuideLine> {
        let start = *self.points.get(point_index)?;
        let end = self.bridge.figure_rect_center_in_data(position);
        Some(GuideLine::new(start, end))
    }

    /// Append an auxiliary plot for `point_index` at `position`, drawing its
    /// content with the renderer. Returns the new record index.
    pub fn add_auxiliary_plot(
        &mut self,
        point_index: usize,
        position: FigureRect,
        guide_line: GuideLine,
    ) -> Option<usize> {
        let surface = self.create_surface(point_index, position)?;
        Some(self.push_plot(AuxiliaryPlot::new(point_index, surface, guide_line)))
    }

    pub(crate) fn push_plot(&mut self, plot: AuxiliaryPlot) -> usize {
        self.plots.push(plot);
        let index = self.plots.len() - 1;
        debug!(record = index, point = self.plots[index].point_index, "auxiliary plot added");
        index
    }

    /// Move a committed plot. Content is cleared while moving when
    /// `show_movement` is off; the guide line follows either way.
    pub fn move_auxiliary_plot(&mut self, index: usize, position: FigureRect) -> bool {
        let clear = !self.config.show_movement;
        self.reposition(index, position, clear)
    }

    /// Resize a committed plot.
    pub fn resize_auxiliary_plot(&mut self, index: usize, position: FigureRect) -> bool {
        self.reposition(index, position, false)
    }

    fn reposition(&mut self, index: usize, position: FigureRect, clear: bool) -> bool {
        let Some(plot) = self.plots.get(index) else {
            return false;
        };
        let Some(line) = self.guide_line_for(plot.point_index, position) else {
            return false;
        };
        let Some(plot) = self.plots.get_mut(index) else {
            return false;
        };
        if clear {
            plot.surface.clear();
        }
        plot.surface.set_position(position);
        plot.guide_line = line;
        true
    }

    /// Redraw the content of a committed plot, e.g. after a hidden move.
    pub(crate) fn rerender_plot(&mut self, index: usize) {
        let Some(mut plot) = self.plots.get(index).cloned() else {
            return;
        };
        if self.render_into(plot.point_index, &mut plot.surface).is_some() {
            self.plots[index] = plot;
        }
    }

    /// Point every guide line at the current center of its plot.
    pub fn recompute_all_guide_lines(&mut self) {
        let bridge = &self.bridge;
        let points = &self.points;
        for plot in &mut self.plots {
            let Some(start) = points.get(plot.point_index) else {
                continue;
            };
            let end = bridge.figure_rect_center_in_data(plot.surface.current_position_rect());
            plot.guide_line = GuideLine::new(*start, end);
        }
    }

    /// Replace the configuration and re-derive the coordinate bridge.
    pub fn reconfigure(&mut self, config: MosaicConfig) -> Result<(), ValidationError> {
        config.validate()?;
        config.main_plot.check_point_count(self.points.len())?;
        self.bridge = bridge_for(&config, &self.points)?;
        self.config = config;
        self.recompute_all_guide_lines();
        debug!("mosaic reconfigured");
        Ok(())
    }

    /// Swap the renderer. Existing content is kept until each plot is drawn
    /// again.
    pub fn set_renderer(&mut self, renderer: SharedRenderer<P>) {
        if !Arc::ptr_eq(&self.renderer, &renderer) {
            debug!(renderer = renderer.key(), "renderer replaced");
        }
        self.renderer = renderer;
    }

    /// Follow a resized host canvas.
    pub fn set_figure_size(&mut self, width: f64, height: f64) -> bool {
        if !self.bridge.set_figure_size(width, height) {
            return false;
        }
        self.config.figure_size = (width, height);
        self.recompute_all_guide_lines();
        true
    }
}

impl<P> fmt::Debug for MosaicState<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MosaicState")
            .field("points", &self.points.len())
            .field("renderer", &self.renderer.key())
            .field("plots", &self.plots)
            .field("selected_points", &self.selected_points)
            .field("config", &self.config)
            .finish()
    }
}

fn bridge_for(config: &MosaicConfig, points: &[Point]) -> Result<CoordinateBridge, ValidationError> {
    CoordinateBridge::for_points(config.figure_size, config.main_axes_rect, points).ok_or_else(|| {
        ValidationError::InvalidConfig("figure and main axes must have positive size".to_owned())
    })
}
