//! GPUI integration for plot_mosaic.
//!
//! This module provides a GPUI view that paints a mosaic and forwards mouse
//! input to its [`InteractionController`](crate::controller::InteractionController).

#![allow(clippy::collapsible_if)]

mod config;
mod paint;
mod view;

pub use config::MosaicViewConfig;
pub use view::{GpuiMosaicView, MosaicHandle};
