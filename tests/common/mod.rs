#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};

use plot_mosaic::{
    AsSeries, AuxiliaryPlotRenderer, InteractionController, MarkerStyle, MosaicConfig,
    MosaicState, ScreenPoint, SharedRenderer, Surface,
};
use serde::{Deserialize, Serialize};

/// Payload that remembers which point it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSeries {
    pub tag: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl AsSeries for TaggedSeries {
    fn series(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }
}

/// Renderer that logs every payload it draws.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<usize>>,
}

impl RecordingRenderer {
    pub const KEY: &'static str = "recording";

    pub fn calls(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuxiliaryPlotRenderer<TaggedSeries> for RecordingRenderer {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn render(&self, payload: &TaggedSeries, surface: &mut Surface) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.tag);
        surface.scatter(&payload.x, &payload.y, MarkerStyle::default());
    }
}

pub fn payloads(count: usize) -> Vec<TaggedSeries> {
    (0..count)
        .map(|tag| TaggedSeries {
            tag,
            x: vec![0.0, 1.0, 2.0],
            y: vec![tag as f64, 1.0, 0.5],
        })
        .collect()
}

pub fn square_config() -> MosaicConfig {
    MosaicConfig::builder()
        .figure_size(1000.0, 1000.0)
        .build()
        .expect("valid config")
}

/// Five well separated points with a recording renderer.
pub fn controller() -> (
    InteractionController<TaggedSeries>,
    Arc<RecordingRenderer>,
) {
    let renderer = Arc::new(RecordingRenderer::default());
    let shared: SharedRenderer<TaggedSeries> = renderer.clone();
    let state = MosaicState::new(
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![0.0, 2.0, 1.0, 4.0, 3.0],
        payloads(5),
        square_config(),
        shared,
    )
    .expect("valid state");
    (InteractionController::new(state), renderer)
}

pub fn screen_of(controller: &InteractionController<TaggedSeries>, index: usize) -> ScreenPoint {
    let state = controller.state();
    state.bridge().data_to_display(state.points()[index])
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Every guide line ends at the center of its plot.
pub fn assert_guides_track(state: &MosaicState<TaggedSeries>) {
    for plot in state.plots() {
        let (cx, cy) = plot.position().center();
        let line = plot.guide_line();
        let (ex, ey) = state.bridge().data_to_figure(line.end);
        assert_close(ex, cx, 1e-6);
        assert_close(ey, cy, 1e-6);
        assert_eq!(line.start, state.points()[plot.point_index()]);
    }
}
