use crate::render::Color;

/// Configuration for the GPUI mosaic view.
#[derive(Debug, Clone)]
pub struct MosaicViewConfig {
    /// Line height used to turn line-based wheel deltas into pixels.
    pub scroll_line_height_px: f32,
    /// Wheel distance in pixels that counts as one resize step.
    pub scroll_step_px: f32,
    /// Canvas background.
    pub background: Color,
    /// Follow the canvas size instead of the configured figure size.
    pub track_canvas_size: bool,
}

impl Default for MosaicViewConfig {
    fn default() -> Self {
        Self {
            scroll_line_height_px: 16.0,
            scroll_step_px: 16.0,
            background: Color::grey(0.96),
            track_canvas_size: true,
        }
    }
}
