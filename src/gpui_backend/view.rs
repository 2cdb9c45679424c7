use std::sync::{Arc, PoisonError, RwLock};

use gpui::prelude::*;
use gpui::{
    Bounds, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, ScrollWheelEvent,
    Window, canvas, div, px,
};
use tracing::trace;

use crate::controller::{InteractionController, PointerEvent, Repaint, ScrollEvent};
use crate::render::build_frame;

use super::config::MosaicViewConfig;
use super::paint::{Canvas, paint_frame, to_hsla};

/// A GPUI view that paints a mosaic and drives its interaction controller.
///
/// Left presses pick points, grab plots and drop them; the scroll wheel
/// resizes the active plot.
pub struct GpuiMosaicView<P> {
    controller: Arc<RwLock<InteractionController<P>>>,
    canvas: Arc<RwLock<Option<Canvas>>>,
    config: MosaicViewConfig,
}

impl<P> Clone for GpuiMosaicView<P> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            canvas: Arc::clone(&self.canvas),
            config: self.config.clone(),
        }
    }
}

impl<P: Send + Sync + 'static> GpuiMosaicView<P> {
    /// Create a view with the default [`MosaicViewConfig`].
    pub fn new(controller: InteractionController<P>) -> Self {
        Self::with_config(controller, MosaicViewConfig::default())
    }

    /// Create a view with a custom configuration.
    pub fn with_config(controller: InteractionController<P>, config: MosaicViewConfig) -> Self {
        Self {
            controller: Arc::new(RwLock::new(controller)),
            canvas: Arc::new(RwLock::new(None)),
            config,
        }
    }

    /// Get a handle for saving, loading or inspecting the mosaic from
    /// outside the view.
    pub fn mosaic_handle(&self) -> MosaicHandle<P> {
        MosaicHandle {
            controller: Arc::clone(&self.controller),
        }
    }

    fn dispatch(
        &self,
        position: gpui::Point<Pixels>,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut InteractionController<P>, PointerEvent) -> Repaint,
    ) {
        let Some(canvas) = *self.canvas.read().unwrap_or_else(PoisonError::into_inner) else {
            return;
        };
        let event = PointerEvent {
            position: canvas.to_display(position),
        };
        let repaint = {
            let mut controller = self
                .controller
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut controller, event)
        };
        if repaint.is_requested() {
            cx.notify();
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        self.dispatch(ev.position, cx, InteractionController::on_pointer_down);
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        self.dispatch(ev.position, cx, InteractionController::on_release);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        self.dispatch(ev.position, cx, InteractionController::on_pointer_move);
    }

    fn on_hover_change(&mut self, hovered: bool, cx: &mut Context<Self>) {
        if hovered {
            return;
        }
        let repaint = self
            .controller
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .on_pointer_leave();
        if repaint.is_requested() {
            cx.notify();
        }
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let line_height = px(self.config.scroll_line_height_px);
        let delta = f32::from(ev.delta.pixel_delta(line_height).y);
        if delta.abs() < 0.01 {
            return;
        }
        let step = f64::from(delta / self.config.scroll_step_px.max(1.0));
        trace!(step, "scroll");
        self.dispatch(ev.position, cx, |controller, event| {
            controller.on_scroll(ScrollEvent {
                position: event.position,
                step,
            })
        });
    }
}

impl<P: Send + Sync + 'static> Render for GpuiMosaicView<P> {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let controller = Arc::clone(&self.controller);
        let shared_canvas = Arc::clone(&self.canvas);
        let track_size = self.config.track_canvas_size;

        div()
            .id("plot-mosaic")
            .size_full()
            .bg(to_hsla(self.config.background))
            .child(
                canvas(
                    move |bounds: Bounds<Pixels>, _, _| {
                        let surface = Canvas::new(bounds);
                        *shared_canvas.write().unwrap_or_else(PoisonError::into_inner) =
                            Some(surface);
                        let mut controller =
                            controller.write().unwrap_or_else(PoisonError::into_inner);
                        if track_size {
                            let (width, height) = surface.size();
                            let _ = controller.set_figure_size(width, height);
                        }
                        controller.on_redraw();
                        (build_frame(&controller), surface)
                    },
                    move |_, (frame, surface), window, _| {
                        paint_frame(&frame, surface, window);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
            .on_hover(cx.listener(|this, hovered: &bool, _, cx| {
                this.on_hover_change(*hovered, cx);
            }))
    }
}

/// A handle to the controller held inside a [`GpuiMosaicView`].
///
/// The handle clones cheaply and can be moved into async tasks.
pub struct MosaicHandle<P> {
    controller: Arc<RwLock<InteractionController<P>>>,
}

impl<P> Clone for MosaicHandle<P> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<P> MosaicHandle<P> {
    /// Read the controller.
    ///
    /// The controller is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&InteractionController<P>) -> R) -> R {
        let controller = self.controller.read().unwrap_or_else(PoisonError::into_inner);
        f(&controller)
    }

    /// Mutate the controller, e.g. to load a saved mosaic.
    ///
    /// The controller is locked for the duration of the callback. The view
    /// picks up the change on its next repaint.
    pub fn write<R>(&self, f: impl FnOnce(&mut InteractionController<P>) -> R) -> R {
        let mut controller = self
            .controller
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut controller)
    }
}
