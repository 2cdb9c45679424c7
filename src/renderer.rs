//! Pluggable renderers for auxiliary plot content.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::render::{MarkerShape, MarkerStyle};
use crate::surface::Surface;

/// Draws a point's payload onto an auxiliary plot surface.
///
/// Implementations must not keep the surface beyond the call. They may
/// request equal aspect on the surface; the mosaic then shrinks the surface
/// box to the content's aspect ratio and keeps its bottom-left corner.
pub trait AuxiliaryPlotRenderer<P>: Send + Sync {
    /// Stable name used to find the renderer again when a saved mosaic is
    /// loaded.
    fn key(&self) -> &str;

    /// Draw `payload` onto `surface`.
    fn render(&self, payload: &P, surface: &mut Surface);
}

/// Shared renderer reference.
pub type SharedRenderer<P> = Arc<dyn AuxiliaryPlotRenderer<P>>;

/// Payloads that expose an X/Y series.
pub trait AsSeries {
    /// Parallel X and Y values.
    fn series(&self) -> (&[f64], &[f64]);
}

/// The stock payload: one X/Y series per point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPayload {
    /// X values.
    pub x: Vec<f64>,
    /// Y values.
    pub y: Vec<f64>,
}

impl SeriesPayload {
    /// Create a payload from parallel X and Y values.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }
}

impl AsSeries for SeriesPayload {
    fn series(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }
}

impl AsSeries for (Vec<f64>, Vec<f64>) {
    fn series(&self) -> (&[f64], &[f64]) {
        (&self.0, &self.1)
    }
}

/// Default renderer: the payload's series as small circle markers.
#[derive(Debug, Clone)]
pub struct MarkerRenderer {
    style: MarkerStyle,
}

impl MarkerRenderer {
    /// Key under which the default renderer is saved.
    pub const KEY: &'static str = "markers";

    /// Create the default renderer.
    pub fn new() -> Self {
        Self {
            style: MarkerStyle {
                size: 3.0,
                shape: MarkerShape::Circle,
                ..MarkerStyle::default()
            },
        }
    }

    /// Use a different marker style.
    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for MarkerRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: AsSeries> AuxiliaryPlotRenderer<P> for MarkerRenderer {
    fn key(&self) -> &str {
        Self::KEY
    }

    fn render(&self, payload: &P, surface: &mut Surface) {
        let (x, y) = payload.series();
        surface.scatter(x, y, self.style);
    }
}

/// Adapts a closure into a named renderer.
pub struct FnRenderer<F> {
    key: String,
    draw: F,
}

impl<F> FnRenderer<F> {
    /// Wrap `draw` under the given key.
    pub fn new(key: impl Into<String>, draw: F) -> Self {
        Self {
            key: key.into(),
            draw,
        }
    }
}

impl<F> fmt::Debug for FnRenderer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRenderer").field("key", &self.key).finish()
    }
}

impl<P, F> AuxiliaryPlotRenderer<P> for FnRenderer<F>
where
    F: Fn(&P, &mut Surface) + Send + Sync,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn render(&self, payload: &P, surface: &mut Surface) {
        (self.draw)(payload, surface);
    }
}

/// Renderers known to the process, looked up by key when loading.
///
/// Behaviour cannot travel inside a saved file, so a saved mosaic only
/// records its renderer's key. Loading resolves the key here; an unknown key
/// falls back to the registry's default renderer.
pub struct RendererRegistry<P> {
    renderers: HashMap<String, SharedRenderer<P>>,
    fallback: SharedRenderer<P>,
}

impl<P: 'static> RendererRegistry<P> {
    /// Create a registry whose fallback is `fallback`. The fallback is
    /// registered under its own key.
    pub fn new(fallback: SharedRenderer<P>) -> Self {
        let mut renderers = HashMap::new();
        renderers.insert(fallback.key().to_owned(), Arc::clone(&fallback));
        Self {
            renderers,
            fallback,
        }
    }

    /// Register a renderer under its key, replacing any previous one.
    ///
    /// Returns the shared reference that mosaics should hold so that a
    /// later load resolves to the very same renderer.
    pub fn register(&mut self, renderer: SharedRenderer<P>) -> SharedRenderer<P> {
        self.renderers
            .insert(renderer.key().to_owned(), Arc::clone(&renderer));
        renderer
    }

    /// The renderer used when none is given or a key is unknown.
    pub fn fallback(&self) -> SharedRenderer<P> {
        Arc::clone(&self.fallback)
    }

    /// Look up a renderer by key.
    pub fn get(&self, key: &str) -> Option<SharedRenderer<P>> {
        self.renderers.get(key).cloned()
    }

    /// Resolve a saved renderer key, falling back to the default.
    pub fn resolve(&self, key: Option<&str>) -> SharedRenderer<P> {
        match key {
            None => self.fallback(),
            Some(key) => self.get(key).unwrap_or_else(|| {
                warn!(
                    renderer = key,
                    fallback = self.fallback.key(),
                    "renderer is not registered in this process, using fallback"
                );
                self.fallback()
            }),
        }
    }
}

impl<P: AsSeries + 'static> Default for RendererRegistry<P> {
    fn default() -> Self {
        Self::new(Arc::new(MarkerRenderer::new()))
    }
}

impl<P> fmt::Debug for RendererRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("RendererRegistry")
            .field("renderers", &keys)
            .field("fallback", &self.fallback.key())
            .finish()
    }
}
