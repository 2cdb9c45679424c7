//! The interaction controller: pick, hover, drag, resize and redraw handling.
//!
//! Hosts forward their input events to an [`InteractionController`]. Every
//! handler runs to completion, mutates the owned [`MosaicState`] and
//! [`InteractionSession`], and tells the host whether a repaint is needed.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::{DRAG_AXES_MOUSE_DIST, MosaicConfig};
use crate::error::{MosaicError, ValidationError};
use crate::geom::{FigureRect, ScreenPoint};
use crate::interaction::{
    HitTarget, dragged_rect, nearest_point, new_drag_grab_offset, points_within_radius,
    preview_rect, scaled_rect, topmost_containing,
};
use crate::mosaic::{AuxiliaryPlot, MosaicSource, MosaicState};
use crate::renderer::RendererRegistry;
use crate::surface::{Surface, SurfaceId};

/// Coarse state of the interaction machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    /// Nothing is happening.
    Idle,
    /// A transient preview follows the cursor over a point.
    HoverPreview,
    /// A freshly picked plot follows the cursor.
    DraggingNew,
    /// A committed plot is being repositioned.
    DraggingExisting,
}

/// Whether the host should repaint after an event.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repaint {
    /// Nothing visible changed.
    Skip,
    /// Schedule a repaint.
    Request,
}

impl Repaint {
    /// True when a repaint was requested.
    pub fn is_requested(self) -> bool {
        self == Self::Request
    }
}

/// A confirmed pick on the main plot: the hit point indices and where the
/// pointer was, in display space.
#[derive(Debug, Clone, PartialEq)]
pub struct PickEvent {
    /// Candidate point indices within the pick radius.
    pub indices: Vec<usize>,
    /// Pointer position.
    pub position: ScreenPoint,
}

/// Pointer press, release or move in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position.
    pub position: ScreenPoint,
}

impl PointerEvent {
    /// Pointer event at `(x, y)` pixels from the bottom-left corner.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: ScreenPoint::new(x, y),
        }
    }
}

/// Scroll input: signed step count at a display position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Pointer position.
    pub position: ScreenPoint,
    /// Signed number of scroll steps; positive grows the active plot.
    pub step: f64,
}

#[derive(Debug, Clone)]
struct HoverPreview {
    point_index: usize,
    surface: Surface,
}

#[derive(Debug, Clone)]
enum DragSubject {
    /// Picked from the main plot and not yet committed.
    New(AuxiliaryPlot),
    /// A committed plot, by record index.
    Existing(usize),
}

#[derive(Debug, Clone)]
struct DragState {
    subject: DragSubject,
    grab_offset: ScreenPoint,
    press: ScreenPoint,
    moved: bool,
    content_hidden: bool,
}

/// Transient gesture state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct InteractionSession {
    selected_point: Option<usize>,
    hover: Option<HoverPreview>,
    drag: Option<DragState>,
    current_record: Option<usize>,
}

impl InteractionSession {
    /// The most recently picked or grabbed point.
    pub fn selected_point(&self) -> Option<usize> {
        self.selected_point
    }

    /// Whether a plot is following the pointer.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the dragged plot is a committed one being repositioned.
    pub fn is_existing_plot_being_moved(&self) -> bool {
        matches!(
            self.drag,
            Some(DragState {
                subject: DragSubject::Existing(_),
                ..
            })
        )
    }

    /// Record index of the plot that scroll input resizes, if it is a
    /// committed one.
    pub fn active_record(&self) -> Option<usize> {
        match &self.drag {
            Some(DragState {
                subject: DragSubject::Existing(index),
                ..
            }) => Some(*index),
            Some(_) => None,
            None => self.current_record,
        }
    }

    /// Identifier of the hover preview surface.
    pub fn hover_surface(&self) -> Option<SurfaceId> {
        self.hover.as_ref().map(|hover| hover.surface.id())
    }

    /// Pixel offset between the pointer and the dragged plot's bottom-left
    /// corner.
    pub fn drag_grab_offset(&self) -> Option<ScreenPoint> {
        self.drag.as_ref().map(|drag| drag.grab_offset)
    }
}

/// Owns a mosaic and reacts to host input events.
#[derive(Debug)]
pub struct InteractionController<P> {
    state: MosaicState<P>,
    session: InteractionSession,
}

impl<P> InteractionController<P> {
    /// Wrap a mosaic in an idle controller.
    pub fn new(state: MosaicState<P>) -> Self {
        Self {
            state,
            session: InteractionSession::default(),
        }
    }

    /// The mosaic.
    pub fn state(&self) -> &MosaicState<P> {
        &self.state
    }

    /// Give the mosaic back.
    pub fn into_state(self) -> MosaicState<P> {
        self.state
    }

    /// The current gesture state.
    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    /// Coarse state of the interaction machine.
    pub fn phase(&self) -> InteractionPhase {
        match &self.session.drag {
            Some(DragState {
                subject: DragSubject::New(_),
                ..
            }) => InteractionPhase::DraggingNew,
            Some(_) => InteractionPhase::DraggingExisting,
            None if self.session.hover.is_some() => InteractionPhase::HoverPreview,
            None => InteractionPhase::Idle,
        }
    }

    /// The hover preview surface, if one is shown.
    pub fn preview(&self) -> Option<&Surface> {
        self.session.hover.as_ref().map(|hover| &hover.surface)
    }

    /// The picked plot that follows the pointer but is not committed yet.
    pub fn pending(&self) -> Option<&AuxiliaryPlot> {
        match &self.session.drag {
            Some(DragState {
                subject: DragSubject::New(plot),
                ..
            }) => Some(plot),
            _ => None,
        }
    }

    /// Point indices drawn within the pick radius of `position`.
    pub fn points_under(&self, position: ScreenPoint) -> Vec<usize> {
        points_within_radius(
            self.state.points(),
            self.state.bridge(),
            position,
            self.state.config().picker_radius,
        )
    }

    /// Record index of the topmost committed plot containing `position`.
    pub fn surface_at(&self, position: ScreenPoint) -> Option<usize> {
        topmost_containing(
            self.state
                .plots()
                .iter()
                .enumerate()
                .map(|(index, plot)| (index, plot.position())),
            self.state.bridge(),
            position,
        )
    }

    /// Classify what lies under `position`.
    pub fn hit_test(&self, position: ScreenPoint) -> HitTarget {
        if let Some(index) = self.surface_at(position) {
            return HitTarget::Surface(index);
        }
        let hits = self.points_under(position);
        if !hits.is_empty() {
            return HitTarget::Points(hits);
        }
        if self.state.bridge().axes_display_rect().contains(position) {
            HitTarget::MainPlot
        } else {
            HitTarget::Outside
        }
    }

    /// Route a raw pointer press: drop while dragging, grab a committed plot
    /// under the pointer, or pick the points under it.
    pub fn on_pointer_down(&mut self, event: PointerEvent) -> Repaint {
        if self.session.drag.is_some() {
            return self.on_press(event);
        }
        match self.hit_test(event.position) {
            HitTarget::Points(indices) => self.on_pick(PickEvent {
                indices,
                position: event.position,
            }),
            _ => self.on_press(event),
        }
    }

    /// A press on the main plot landed on points.
    ///
    /// The candidate closest to the pointer in data space wins. The hover
    /// preview of that point becomes the dragged plot; otherwise a fresh one
    /// is drawn next to the pointer.
    pub fn on_pick(&mut self, event: PickEvent) -> Repaint {
        if self.session.drag.is_some() {
            trace!("pick ignored while dragging");
            return Repaint::Skip;
        }
        let bridge = self.state.bridge();
        let query = bridge.display_to_data(event.position);
        let Some(index) = nearest_point(self.state.points(), &event.indices, query) else {
            trace!(candidates = ?event.indices, "pick without valid candidates");
            return Repaint::Skip;
        };

        let surface = match self.session.hover.take() {
            Some(hover) if hover.point_index == index => hover.surface,
            _ => {
                let rect = preview_rect(
                    bridge,
                    event.position,
                    DRAG_AXES_MOUSE_DIST,
                    self.state.config().drag_axes_size,
                );
                let Some(surface) = self.state.create_surface(index, rect) else {
                    return Repaint::Skip;
                };
                surface
            }
        };
        let Some(guide_line) = self
            .state
            .guide_line_for(index, surface.current_position_rect())
        else {
            return Repaint::Skip;
        };
        let grab_offset = new_drag_grab_offset(self.state.bridge(), DRAG_AXES_MOUSE_DIST);

        self.state.record_selection(index);
        self.session.selected_point = Some(index);
        self.session.drag = Some(DragState {
            subject: DragSubject::New(AuxiliaryPlot::new(index, surface, guide_line)),
            grab_offset,
            press: event.position,
            moved: false,
            content_hidden: false,
        });
        debug!(point = index, "picked point, dragging new plot");
        Repaint::Request
    }

    /// A press outside the main plot's points: drops a dragged plot, or
    /// grabs the committed plot under the pointer.
    pub fn on_press(&mut self, event: PointerEvent) -> Repaint {
        if let Some(drag) = self.session.drag.take() {
            return self.drop_drag(drag, event.position);
        }
        let Some(record) = self.surface_at(event.position) else {
            trace!(x = event.position.x, y = event.position.y, "press ignored");
            return Repaint::Skip;
        };
        let Some(plot) = self.state.plot(record) else {
            return Repaint::Skip;
        };
        let origin = self
            .state
            .bridge()
            .figure_rect_to_display(plot.position())
            .min;
        let point_index = plot.point_index();

        let had_preview = self.session.hover.take().is_some();
        self.session.selected_point = Some(point_index);
        self.session.current_record = Some(record);
        self.session.drag = Some(DragState {
            subject: DragSubject::Existing(record),
            grab_offset: event.position.offset_from(origin),
            press: event.position,
            moved: false,
            content_hidden: false,
        });
        debug!(record, point = point_index, "grabbed existing plot");
        if had_preview {
            Repaint::Request
        } else {
            Repaint::Skip
        }
    }

    /// Pointer release: drops the dragged plot if the pointer moved since
    /// the press. A plain click leaves the plot following the pointer until
    /// the next press.
    pub fn on_release(&mut self, event: PointerEvent) -> Repaint {
        match self.session.drag.take() {
            Some(drag) if drag.moved => self.drop_drag(drag, event.position),
            other => {
                self.session.drag = other;
                Repaint::Skip
            }
        }
    }

    /// Pointer motion: moves the dragged plot, or refreshes the hover
    /// preview.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Repaint {
        if self.session.drag.is_some() {
            return self.drag_to(event.position);
        }
        self.update_hover(event.position)
    }

    /// The pointer left the canvas.
    pub fn on_pointer_leave(&mut self) -> Repaint {
        if self.session.hover.take().is_some() {
            Repaint::Request
        } else {
            Repaint::Skip
        }
    }

    /// Scroll input resizes the active plot by 10% per step around its
    /// bottom-left corner.
    pub fn on_scroll(&mut self, event: ScrollEvent) -> Repaint {
        if event.step == 0.0 || !event.step.is_finite() {
            return Repaint::Skip;
        }
        if let Some(DragState {
            subject: DragSubject::New(plot),
            ..
        }) = self.session.drag.as_mut()
        {
            let rect = scaled_rect(plot.position(), event.step);
            let Some(line) = self.state.guide_line_for(plot.point_index(), rect) else {
                return Repaint::Skip;
            };
            plot.surface_mut().set_position(rect);
            plot.set_guide_line(line);
            debug!(step = event.step, "resized pending plot");
            return Repaint::Request;
        }
        let Some(record) = self.session.active_record() else {
            trace!("scroll without an active plot");
            return Repaint::Skip;
        };
        let Some(plot) = self.state.plot(record) else {
            return Repaint::Skip;
        };
        let rect = scaled_rect(plot.position(), event.step);
        if self.state.resize_auxiliary_plot(record, rect) {
            debug!(record, step = event.step, "resized plot");
            Repaint::Request
        } else {
            Repaint::Skip
        }
    }

    /// Redraw tick: glue every guide line to its plot's current center.
    pub fn on_redraw(&mut self) {
        self.state.recompute_all_guide_lines();
        if let Some(DragState {
            subject: DragSubject::New(plot),
            ..
        }) = self.session.drag.as_mut()
        {
            if let Some(line) = self.state.guide_line_for(plot.point_index(), plot.position()) {
                plot.set_guide_line(line);
            }
        }
    }

    /// Replace the configuration.
    pub fn reconfigure(&mut self, config: MosaicConfig) -> Result<(), ValidationError> {
        self.state.reconfigure(config)?;
        self.on_redraw();
        Ok(())
    }

    /// Follow a resized host canvas.
    pub fn set_figure_size(&mut self, width: f64, height: f64) -> Repaint {
        if self.state.set_figure_size(width, height) {
            self.on_redraw();
            Repaint::Request
        } else {
            Repaint::Skip
        }
    }

    fn update_hover(&mut self, position: ScreenPoint) -> Repaint {
        let hits = self.points_under(position);
        if hits.is_empty() {
            return self.on_pointer_leave();
        }
        let bridge = self.state.bridge();
        let query = bridge.display_to_data(position);
        let Some(index) = nearest_point(self.state.points(), &hits, query) else {
            return Repaint::Skip;
        };
        let rect = preview_rect(
            bridge,
            position,
            DRAG_AXES_MOUSE_DIST,
            self.state.config().drag_axes_size,
        );
        let Some(surface) = self.state.create_surface(index, rect) else {
            return Repaint::Skip;
        };
        if self.session.hover.is_none() {
            debug!(point = index, "hover preview shown");
        }
        self.session.hover = Some(HoverPreview {
            point_index: index,
            surface,
        });
        Repaint::Request
    }

    fn drag_to(&mut self, position: ScreenPoint) -> Repaint {
        let show_movement = self.state.config().show_movement;
        let Some(drag) = self.session.drag.as_mut() else {
            return Repaint::Skip;
        };
        if position != drag.press {
            drag.moved = true;
        }
        let bridge = self.state.bridge();
        match &mut drag.subject {
            DragSubject::New(plot) => {
                let rect = dragged_rect(plot.position(), position, drag.grab_offset, bridge);
                let Some(line) = self.state.guide_line_for(plot.point_index(), rect) else {
                    return Repaint::Skip;
                };
                if !show_movement {
                    plot.surface_mut().clear();
                    drag.content_hidden = true;
                }
                plot.surface_mut().set_position(rect);
                plot.set_guide_line(line);
            }
            DragSubject::Existing(record) => {
                let record = *record;
                let Some(current) = self.state.plot(record).map(AuxiliaryPlot::position) else {
                    return Repaint::Skip;
                };
                let rect = dragged_rect(current, position, drag.grab_offset, bridge);
                if !show_movement {
                    drag.content_hidden = true;
                }
                self.state.move_auxiliary_plot(record, rect);
            }
        }
        trace!(x = position.x, y = position.y, "dragged plot moved");
        Repaint::Request
    }

    fn drop_drag(&mut self, drag: DragState, position: ScreenPoint) -> Repaint {
        let bridge = self.state.bridge();
        match drag.subject {
            DragSubject::New(mut plot) => {
                let rect = dragged_rect(plot.position(), position, drag.grab_offset, bridge);
                let Some(line) = self.state.guide_line_for(plot.point_index(), rect) else {
                    return Repaint::Skip;
                };
                plot.surface_mut().set_position(rect);
                plot.set_guide_line(line);
                if drag.content_hidden {
                    let point_index = plot.point_index();
                    self.state.render_into(point_index, plot.surface_mut());
                }
                let record = self.state.push_plot(plot);
                self.session.current_record = Some(record);
                debug!(record, "dropped new plot");
            }
            DragSubject::Existing(record) => {
                let Some(current) = self.state.plot(record).map(AuxiliaryPlot::position) else {
                    return Repaint::Skip;
                };
                let rect = dragged_rect(current, position, drag.grab_offset, bridge);
                self.state.resize_auxiliary_plot(record, rect);
                if drag.content_hidden {
                    self.state.rerender_plot(record);
                }
                self.session.current_record = Some(record);
                debug!(record, "dropped existing plot");
            }
        }
        Repaint::Request
    }

    /// Position of the plot scroll input would resize.
    pub fn active_position(&self) -> Option<FigureRect> {
        if let Some(plot) = self.pending() {
            return Some(plot.position());
        }
        let record = self.session.active_record()?;
        self.state.plot(record).map(AuxiliaryPlot::position)
    }
}

impl<P: Serialize> InteractionController<P> {
    /// Save the mosaic to `path`.
    pub fn save_state(&self, path: impl AsRef<Path>) -> Result<(), MosaicError> {
        self.state.save(path)
    }
}

impl<P: DeserializeOwned + 'static> InteractionController<P> {
    /// Build a controller from fresh data or from a saved file.
    pub fn open(
        source: impl Into<MosaicSource<P>>,
        registry: &RendererRegistry<P>,
    ) -> Result<Self, MosaicError> {
        Ok(Self::new(MosaicState::open(source, registry)?))
    }

    /// Replace the whole mosaic with one loaded from `path`. The gesture
    /// state is reset. On error the current mosaic is kept.
    pub fn load_state(
        &mut self,
        path: impl AsRef<Path>,
        registry: &RendererRegistry<P>,
    ) -> Result<(), MosaicError> {
        self.state = MosaicState::load(path, registry)?;
        self.session = InteractionSession::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geom::Point;
    use crate::renderer::{MarkerRenderer, SeriesPayload};

    fn controller() -> InteractionController<SeriesPayload> {
        let payloads = (0..3)
            .map(|i| SeriesPayload::new(vec![0.0, 1.0], vec![0.0, i as f64]))
            .collect();
        let config = MosaicConfig::builder()
            .figure_size(1000.0, 1000.0)
            .build()
            .expect("valid config");
        let state = MosaicState::new(
            vec![0.0, 5.0, 10.0],
            vec![0.0, 5.0, 10.0],
            payloads,
            config,
            Arc::new(MarkerRenderer::new()),
        )
        .expect("valid state");
        InteractionController::new(state)
    }

    fn screen_of(controller: &InteractionController<SeriesPayload>, index: usize) -> ScreenPoint {
        let point = controller.state().points()[index];
        controller.state().bridge().data_to_display(point)
    }

    #[test]
    fn hover_enter_and_exit() {
        let mut controller = controller();
        let at = screen_of(&controller, 1);
        assert!(controller.on_pointer_move(PointerEvent { position: at }).is_requested());
        assert_eq!(controller.phase(), InteractionPhase::HoverPreview);
        let first = controller.session().hover_surface().expect("preview");

        let near = ScreenPoint::new(at.x + 1.0, at.y);
        let _ = controller.on_pointer_move(PointerEvent { position: near });
        let second = controller.session().hover_surface().expect("preview");
        assert_ne!(first, second);

        let _ = controller.on_pointer_move(PointerEvent::at(5.0, 5.0));
        assert_eq!(controller.phase(), InteractionPhase::Idle);
        assert!(controller.preview().is_none());
    }

    #[test]
    fn pick_promotes_preview() {
        let mut controller = controller();
        let at = screen_of(&controller, 2);
        let _ = controller.on_pointer_move(PointerEvent { position: at });
        let preview = controller.session().hover_surface().expect("preview");
        let _ = controller.on_pointer_down(PointerEvent { position: at });
        assert_eq!(controller.phase(), InteractionPhase::DraggingNew);
        assert_eq!(controller.pending().expect("pending").surface().id(), preview);
        assert_eq!(controller.session().selected_point(), Some(2));
        assert_eq!(controller.state().selected_points(), &[2]);
    }

    #[test]
    fn click_pick_follows_until_next_press() {
        let mut controller = controller();
        let at = screen_of(&controller, 0);
        let _ = controller.on_pointer_down(PointerEvent { position: at });
        let _ = controller.on_release(PointerEvent { position: at });
        assert_eq!(controller.phase(), InteractionPhase::DraggingNew);
        let _ = controller.on_pointer_move(PointerEvent::at(50.0, 800.0));
        assert_eq!(controller.phase(), InteractionPhase::DraggingNew);
        let _ = controller.on_press(PointerEvent::at(60.0, 820.0));
        assert_eq!(controller.phase(), InteractionPhase::Idle);
        assert_eq!(controller.state().plots().len(), 1);
        let rect = controller.state().plots()[0].position();
        assert!((rect.left - 0.065).abs() < 1e-9);
        assert!((rect.bottom - 0.825).abs() < 1e-9);
    }

    #[test]
    fn press_on_empty_canvas_is_noop() {
        let mut controller = controller();
        let repaint = controller.on_pointer_down(PointerEvent::at(5.0, 5.0));
        assert_eq!(repaint, Repaint::Skip);
        assert_eq!(controller.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn scroll_without_active_plot_is_noop() {
        let mut controller = controller();
        let repaint = controller.on_scroll(ScrollEvent {
            position: ScreenPoint::new(10.0, 10.0),
            step: 1.0,
        });
        assert_eq!(repaint, Repaint::Skip);
    }

    #[test]
    fn hidden_movement_restores_content_on_drop() {
        let mut controller = controller();
        let config = MosaicConfig {
            show_movement: false,
            ..controller.state().config().clone()
        };
        controller.reconfigure(config).expect("valid config");
        let at = screen_of(&controller, 1);
        let _ = controller.on_pointer_down(PointerEvent { position: at });
        let _ = controller.on_pointer_move(PointerEvent::at(100.0, 900.0));
        assert!(controller.pending().expect("pending").surface().is_empty());
        let _ = controller.on_release(PointerEvent::at(100.0, 900.0));
        assert!(!controller.state().plots()[0].surface().is_empty());
    }

    #[test]
    fn redraw_keeps_pending_line_glued() {
        let mut controller = controller();
        let at = screen_of(&controller, 1);
        let _ = controller.on_pointer_down(PointerEvent { position: at });
        controller.on_redraw();
        let plot = controller.pending().expect("pending");
        let (cx, cy) = plot.position().center();
        let expected = controller.state().bridge().figure_to_data(cx, cy);
        assert!(plot.guide_line().end.distance(expected) < 1e-9);
        assert_eq!(plot.guide_line().start, Point::new(5.0, 5.0));
    }
}
