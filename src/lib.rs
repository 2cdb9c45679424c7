//! plot_mosaic turns a scatter plot into a mosaic of auxiliary plots.
//!
//! Every point of the main plot carries a payload. Picking a point spawns a
//! small plot of that payload which follows the pointer until it is dropped.
//! Dropped plots stay linked to their point by a dashed guide line and can be
//! moved, resized with the scroll wheel, saved and loaded again.
//!
//! The core is host-agnostic: an [`InteractionController`] consumes pointer
//! events and [`build_frame`] describes what to draw. The `gpui` feature adds
//! a ready-made GPUI view.

#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod geom;
pub mod interaction;
pub mod mosaic;
pub mod persist;
pub mod render;
pub mod renderer;
pub mod surface;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use config::{DRAG_AXES_MOUSE_DIST, MainPlotStyle, MosaicConfig, MosaicConfigBuilder};
pub use controller::{
    InteractionController, InteractionPhase, InteractionSession, PickEvent, PointerEvent, Repaint,
    ScrollEvent,
};
pub use error::{CorruptStateError, MosaicError, ValidationError};
#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiMosaicView, MosaicHandle, MosaicViewConfig};
pub use geom::{FigureRect, Point, ScreenPoint, ScreenRect};
pub use interaction::HitTarget;
pub use mosaic::{AuxiliaryPlot, GuideLine, MosaicSource, MosaicState};
pub use persist::MosaicDocument;
pub use render::{
    Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand, RenderList,
    build_frame,
};
pub use renderer::{
    AsSeries, AuxiliaryPlotRenderer, FnRenderer, MarkerRenderer, RendererRegistry, SeriesPayload,
    SharedRenderer,
};
pub use surface::{Surface, SurfaceCommand, SurfaceId, SurfaceTransform};
pub use transform::{CoordinateBridge, main_viewport};
pub use view::{Range, Viewport};
