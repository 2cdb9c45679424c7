mod common;

use plot_mosaic::interaction::nearest_point;
use plot_mosaic::{
    HitTarget, InteractionPhase, PickEvent, Point, PointerEvent, Repaint, ScreenPoint, ScrollEvent,
};

use common::{assert_close, assert_guides_track, controller, screen_of};

fn press_drag_release(
    controller: &mut plot_mosaic::InteractionController<common::TaggedSeries>,
    from: ScreenPoint,
    to: ScreenPoint,
) {
    let _ = controller.on_pointer_down(PointerEvent { position: from });
    let _ = controller.on_pointer_move(PointerEvent { position: to });
    let _ = controller.on_release(PointerEvent { position: to });
}

#[test]
fn nearest_candidate_wins() {
    let points = [
        Point::new(10.0, 10.0),
        Point::new(1.0, 0.0),
        Point::new(2.0, 0.0),
    ];
    let query = Point::new(0.0, 0.0);
    assert_eq!(nearest_point(&points, &[1, 2], query), Some(1));
    assert_eq!(nearest_point(&points, &[2, 1], query), Some(1));
}

#[test]
fn equal_distances_keep_first_candidate() {
    let points = [Point::new(-1.0, 0.0), Point::new(1.0, 0.0)];
    assert_eq!(nearest_point(&points, &[1, 0], Point::new(0.0, 0.0)), Some(1));
}

#[test]
fn hover_press_move_release_commits_one_plot() {
    let (mut controller, renderer) = controller();
    let at = screen_of(&controller, 3);

    assert!(
        controller
            .on_pointer_move(PointerEvent { position: at })
            .is_requested()
    );
    assert_eq!(controller.phase(), InteractionPhase::HoverPreview);

    let _ = controller.on_pointer_down(PointerEvent { position: at });
    assert_eq!(controller.phase(), InteractionPhase::DraggingNew);
    assert!(controller.preview().is_none());

    let target = ScreenPoint::new(100.0, 100.0);
    let _ = controller.on_pointer_move(PointerEvent { position: target });
    let _ = controller.on_release(PointerEvent { position: target });

    let state = controller.state();
    assert_eq!(controller.phase(), InteractionPhase::Idle);
    assert_eq!(state.plots().len(), 1);
    let plot = &state.plots()[0];
    assert_eq!(plot.point_index(), 3);

    // grab offset is minus 0.005 figure units, i.e. 5 px on a 1000 px figure
    let rect = plot.position();
    assert_close(rect.left, 0.105, 1e-9);
    assert_close(rect.bottom, 0.105, 1e-9);
    assert_close(rect.width, 0.15, 1e-12);
    assert_close(rect.height, 0.15, 1e-12);

    assert_eq!(state.selected_points(), &[3]);
    assert_eq!(renderer.calls(), vec![3]);
    assert_guides_track(state);
}

#[test]
fn moving_existing_plot_does_not_duplicate() {
    let (mut controller, _) = controller();
    let at = screen_of(&controller, 1);
    press_drag_release(&mut controller, at, ScreenPoint::new(100.0, 100.0));
    assert_eq!(controller.state().plots().len(), 1);

    let inside = ScreenPoint::new(150.0, 150.0);
    assert_eq!(controller.hit_test(inside), HitTarget::Surface(0));
    let _ = controller.on_pointer_down(PointerEvent { position: inside });
    assert_eq!(controller.phase(), InteractionPhase::DraggingExisting);
    assert!(controller.session().is_existing_plot_being_moved());

    let to = ScreenPoint::new(200.0, 180.0);
    let _ = controller.on_pointer_move(PointerEvent { position: to });
    let _ = controller.on_release(PointerEvent { position: to });

    let state = controller.state();
    assert_eq!(state.plots().len(), 1);
    let rect = state.plots()[0].position();
    assert_close(rect.left, 0.155, 1e-9);
    assert_close(rect.bottom, 0.135, 1e-9);
    assert_guides_track(state);
}

#[test]
fn scroll_grows_active_plot_from_bottom_left() {
    let (mut controller, _) = controller();
    let at = screen_of(&controller, 2);
    press_drag_release(&mut controller, at, ScreenPoint::new(400.0, 100.0));
    let before = controller.state().plots()[0].position();

    let repaint = controller.on_scroll(ScrollEvent {
        position: ScreenPoint::new(10.0, 10.0),
        step: 1.0,
    });
    assert_eq!(repaint, Repaint::Request);

    let after = controller.state().plots()[0].position();
    assert_close(after.width, 0.165, 1e-12);
    assert_close(after.height, 0.165, 1e-12);
    assert_eq!((after.left, after.bottom), (before.left, before.bottom));
    assert_guides_track(controller.state());
}

#[test]
fn scroll_resizes_plot_while_it_is_placed() {
    let (mut controller, _) = controller();
    let at = screen_of(&controller, 0);
    let _ = controller.on_pointer_down(PointerEvent { position: at });
    let _ = controller.on_scroll(ScrollEvent {
        position: at,
        step: -2.0,
    });
    let pending = controller.pending().expect("plot being placed");
    assert_close(pending.position().width, 0.12, 1e-12);
}

#[test]
fn click_to_pick_then_click_to_place() {
    let (mut controller, _) = controller();
    let at = screen_of(&controller, 4);
    let _ = controller.on_pointer_down(PointerEvent { position: at });
    let _ = controller.on_release(PointerEvent { position: at });
    assert_eq!(controller.phase(), InteractionPhase::DraggingNew);

    let _ = controller.on_pointer_move(PointerEvent::at(800.0, 850.0));
    let _ = controller.on_pointer_down(PointerEvent::at(820.0, 860.0));
    assert_eq!(controller.phase(), InteractionPhase::Idle);

    let rect = controller.state().plots()[0].position();
    assert_close(rect.left, 0.825, 1e-9);
    assert_close(rect.bottom, 0.865, 1e-9);
    // the release of the placing click has nothing left to drop
    assert_eq!(
        controller.on_release(PointerEvent::at(820.0, 860.0)),
        Repaint::Skip
    );
}

#[test]
fn guides_track_after_redraw_and_resize_of_canvas() {
    let (mut controller, _) = controller();
    for (index, to) in [(0, (100.0, 700.0)), (3, (800.0, 100.0))] {
        let at = screen_of(&controller, index);
        press_drag_release(&mut controller, at, ScreenPoint::new(to.0, to.1));
    }
    assert_eq!(controller.state().plots().len(), 2);

    assert!(controller.set_figure_size(1400.0, 700.0).is_requested());
    assert_guides_track(controller.state());
    controller.on_redraw();
    assert_guides_track(controller.state());
}

#[test]
fn gestures_without_target_are_noops() {
    let (mut controller, renderer) = controller();
    assert_eq!(
        controller.on_pointer_down(PointerEvent::at(5.0, 995.0)),
        Repaint::Skip
    );
    assert_eq!(
        controller.on_scroll(ScrollEvent {
            position: ScreenPoint::new(5.0, 995.0),
            step: 1.0,
        }),
        Repaint::Skip
    );
    assert_eq!(
        controller.on_pick(PickEvent {
            indices: vec![42],
            position: ScreenPoint::new(5.0, 995.0),
        }),
        Repaint::Skip
    );
    assert_eq!(controller.phase(), InteractionPhase::Idle);
    assert!(controller.state().plots().is_empty());
    assert!(renderer.calls().is_empty());
}

#[test]
fn pick_while_dragging_is_ignored() {
    let (mut controller, _) = controller();
    let first = screen_of(&controller, 0);
    let _ = controller.on_pointer_down(PointerEvent { position: first });
    let repaint = controller.on_pick(PickEvent {
        indices: vec![1],
        position: screen_of(&controller, 1),
    });
    assert_eq!(repaint, Repaint::Skip);
    assert_eq!(controller.pending().map(|plot| plot.point_index()), Some(0));
}

#[test]
fn hidden_movement_rerenders_existing_plot_on_drop() {
    let (mut controller, renderer) = controller();
    let config = plot_mosaic::MosaicConfig {
        show_movement: false,
        ..controller.state().config().clone()
    };
    controller.reconfigure(config).expect("valid config");

    let at = screen_of(&controller, 2);
    press_drag_release(&mut controller, at, ScreenPoint::new(100.0, 100.0));
    let calls_after_place = renderer.calls().len();

    let _ = controller.on_pointer_down(PointerEvent::at(150.0, 150.0));
    let _ = controller.on_pointer_move(PointerEvent::at(170.0, 150.0));
    assert!(controller.state().plots()[0].surface().is_empty());
    let _ = controller.on_release(PointerEvent::at(170.0, 150.0));

    assert!(!controller.state().plots()[0].surface().is_empty());
    assert_eq!(renderer.calls().len(), calls_after_place + 1);
}

#[test]
fn topmost_plot_is_grabbed() {
    let (mut controller, _) = controller();
    let first = screen_of(&controller, 0);
    press_drag_release(&mut controller, first, ScreenPoint::new(100.0, 100.0));
    let second = screen_of(&controller, 1);
    press_drag_release(&mut controller, second, ScreenPoint::new(150.0, 150.0));

    let overlap = ScreenPoint::new(200.0, 200.0);
    assert_eq!(controller.surface_at(overlap), Some(1));
    let _ = controller.on_pointer_down(PointerEvent { position: overlap });
    assert_eq!(controller.session().active_record(), Some(1));
    assert_eq!(controller.session().selected_point(), Some(1));
    let _ = controller.on_pointer_down(PointerEvent { position: overlap });
    let rect = controller.state().plots()[1].position();
    assert_close(rect.left, 0.155, 1e-9);
    assert_close(rect.bottom, 0.155, 1e-9);
    assert_eq!(controller.phase(), InteractionPhase::Idle);
}

#[test]
fn leaving_the_canvas_removes_the_preview() {
    let (mut controller, _) = controller();
    let at = screen_of(&controller, 2);
    let _ = controller.on_pointer_move(PointerEvent { position: at });
    assert!(controller.preview().is_some());

    assert_eq!(controller.on_pointer_leave(), Repaint::Request);
    assert!(controller.preview().is_none());
    assert_eq!(controller.phase(), InteractionPhase::Idle);
    assert_eq!(controller.on_pointer_leave(), Repaint::Skip);
}

#[test]
fn leaving_the_canvas_keeps_a_drag_alive() {
    let (mut controller, _) = controller();
    let at = screen_of(&controller, 2);
    let _ = controller.on_pointer_down(PointerEvent { position: at });
    let _ = controller.on_pointer_leave();
    assert_eq!(controller.phase(), InteractionPhase::DraggingNew);
    assert!(controller.pending().is_some());
}
