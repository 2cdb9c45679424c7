//! Saving and restoring a mosaic.
//!
//! A saved mosaic is a JSON object with fourteen camelCase keys. Every key is
//! required on load. Content surfaces are not stored: they are drawn again by
//! the renderer when the document is replayed.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::{MainPlotStyle, MosaicConfig};
use crate::error::{CorruptStateError, MosaicError};
use crate::geom::{FigureRect, Point};
use crate::mosaic::{GuideLine, MosaicSource, MosaicState};
use crate::renderer::RendererRegistry;

/// On-disk form of a mosaic. `D` is the payload container: a borrowed slice
/// when saving, a `Vec` when loading.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicDocument<D> {
    x: Vec<f64>,
    y: Vec<f64>,
    plots_data: D,
    #[serde(deserialize_with = "required")]
    drag_plotter: Option<String>,
    fig_size: [f64; 2],
    main_axes_rect: [f64; 4],
    drag_axes_size: [f64; 2],
    picker_radius: f64,
    show_movement: bool,
    main_plot_kwargs: MainPlotStyle,
    lines_data: Vec<[[f64; 2]; 2]>,
    selected_points: Vec<usize>,
    ax_bounds: Vec<[f64; 4]>,
    added_axes_point_index: Vec<usize>,
}

// Plain deserialization, so a missing `dragPlotter` is an error instead of
// `None`.
fn required<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer)
}

impl<'a, P> MosaicDocument<&'a [P]> {
    /// Snapshot `state` for saving.
    pub fn capture(state: &'a MosaicState<P>) -> Self {
        let config = state.config();
        let plots = state.plots();
        Self {
            x: state.points().iter().map(|p| p.x).collect(),
            y: state.points().iter().map(|p| p.y).collect(),
            plots_data: state.payloads(),
            drag_plotter: Some(state.renderer().key().to_owned()),
            fig_size: [config.figure_size.0, config.figure_size.1],
            main_axes_rect: config.main_axes_rect.to_array(),
            drag_axes_size: [config.drag_axes_size.0, config.drag_axes_size.1],
            picker_radius: config.picker_radius,
            show_movement: config.show_movement,
            main_plot_kwargs: config.main_plot.clone(),
            lines_data: plots
                .iter()
                .map(|plot| {
                    let line = plot.guide_line();
                    [[line.start.x, line.end.x], [line.start.y, line.end.y]]
                })
                .collect(),
            selected_points: state.selected_points().to_vec(),
            ax_bounds: plots.iter().map(|plot| plot.position().to_array()).collect(),
            added_axes_point_index: plots.iter().map(|plot| plot.point_index()).collect(),
        }
    }
}

impl<P: 'static> MosaicDocument<Vec<P>> {
    fn validate(&self) -> Result<(), CorruptStateError> {
        let points = self.x.len();
        expect_len("y", points, self.y.len())?;
        expect_len("plotsData", points, self.plots_data.len())?;
        let plots = self.added_axes_point_index.len();
        expect_len("axBounds", plots, self.ax_bounds.len())?;
        expect_len("linesData", plots, self.lines_data.len())?;

        expect_indices("addedAxesPointIndex", &self.added_axes_point_index, points)?;
        expect_indices("selectedPoints", &self.selected_points, points)?;

        expect_finite("figSize", self.fig_size.iter())?;
        expect_finite("mainAxesRect", self.main_axes_rect.iter())?;
        expect_finite("dragAxesSize", self.drag_axes_size.iter())?;
        expect_finite("pickerRadius", std::iter::once(&self.picker_radius))?;
        expect_finite("axBounds", self.ax_bounds.iter().flatten())?;
        expect_finite("linesData", self.lines_data.iter().flatten().flatten())?;
        Ok(())
    }

    fn config(&self) -> MosaicConfig {
        MosaicConfig {
            figure_size: (self.fig_size[0], self.fig_size[1]),
            main_axes_rect: FigureRect::from_array(self.main_axes_rect),
            drag_axes_size: (self.drag_axes_size[0], self.drag_axes_size[1]),
            picker_radius: self.picker_radius,
            show_movement: self.show_movement,
            main_plot: self.main_plot_kwargs.clone(),
        }
    }

    /// Rebuild a live mosaic, resolving the stored renderer key through
    /// `registry` and replaying every auxiliary plot in its original order.
    pub fn restore(
        self,
        registry: &RendererRegistry<P>,
    ) -> Result<MosaicState<P>, CorruptStateError> {
        self.validate()?;
        let config = self.config();
        let renderer = registry.resolve(self.drag_plotter.as_deref());
        let mut state = MosaicState::new(self.x, self.y, self.plots_data, config, renderer)
            .map_err(CorruptStateError::Config)?;

        let records = self
            .added_axes_point_index
            .into_iter()
            .zip(self.ax_bounds)
            .zip(self.lines_data);
        for ((point_index, bounds), [[x0, x1], [y0, y1]]) in records {
            let line = GuideLine::new(Point::new(x0, y0), Point::new(x1, y1));
            let len = state.points().len();
            state
                .add_auxiliary_plot(point_index, FigureRect::from_array(bounds), line)
                .ok_or(CorruptStateError::IndexOutOfRange {
                    field: "addedAxesPointIndex",
                    index: point_index,
                    len,
                })?;
        }
        state.set_selected_points(self.selected_points);
        state.recompute_all_guide_lines();
        Ok(state)
    }
}

fn expect_len(field: &'static str, expected: usize, found: usize) -> Result<(), CorruptStateError> {
    if expected == found {
        Ok(())
    } else {
        Err(CorruptStateError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}

fn expect_indices(
    field: &'static str,
    indices: &[usize],
    len: usize,
) -> Result<(), CorruptStateError> {
    match indices.iter().find(|&&index| index >= len) {
        Some(&index) => Err(CorruptStateError::IndexOutOfRange { field, index, len }),
        None => Ok(()),
    }
}

fn expect_finite<'a>(
    field: &'static str,
    mut values: impl Iterator<Item = &'a f64>,
) -> Result<(), CorruptStateError> {
    if values.all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(CorruptStateError::NonFinite { field })
    }
}

impl<P: Serialize> MosaicState<P> {
    /// Encode the mosaic as a JSON document.
    pub fn to_blob(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&MosaicDocument::capture(self))
    }

    /// Write the mosaic to `path`, replacing the file atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MosaicError> {
        let path = path.as_ref();
        let blob = self.to_blob().map_err(MosaicError::Encode)?;
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_err = |source| MosaicError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(&blob).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(path).map_err(|err| io_err(err.error))?;
        info!(path = %path.display(), plots = self.plots().len(), "mosaic saved");
        Ok(())
    }
}

impl<P: DeserializeOwned + 'static> MosaicState<P> {
    /// Decode a JSON document produced by [`MosaicState::to_blob`].
    pub fn from_blob(
        blob: &[u8],
        registry: &RendererRegistry<P>,
    ) -> Result<Self, CorruptStateError> {
        let document: MosaicDocument<Vec<P>> = serde_json::from_slice(blob)?;
        document.restore(registry)
    }

    /// Read a mosaic saved with [`MosaicState::save`].
    pub fn load(path: impl AsRef<Path>, registry: &RendererRegistry<P>) -> Result<Self, MosaicError> {
        let path = path.as_ref();
        let blob = fs::read(path).map_err(|source| MosaicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let state = Self::from_blob(&blob, registry)?;
        info!(path = %path.display(), plots = state.plots().len(), "mosaic loaded");
        Ok(state)
    }

    /// Build a mosaic from fresh data or a saved file.
    pub fn open(
        source: impl Into<MosaicSource<P>>,
        registry: &RendererRegistry<P>,
    ) -> Result<Self, MosaicError> {
        match source.into() {
            MosaicSource::Fresh {
                x,
                y,
                payloads,
                renderer,
                config,
            } => {
                let renderer = renderer.unwrap_or_else(|| registry.fallback());
                debug!(renderer = renderer.key(), "opening fresh mosaic");
                Ok(Self::new(x, y, payloads, config, renderer)?)
            }
            MosaicSource::File(path) => Self::load(path, registry),
        }
    }
}
