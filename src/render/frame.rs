use crate::config::MainPlotStyle;
use crate::controller::InteractionController;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::mosaic::GuideLine;
use crate::surface::{Surface, SurfaceCommand};
use crate::transform::CoordinateBridge;

use super::{
    Color, LineSegment, LineStyle, MarkerStyle, RectStyle, RenderCommand, RenderList,
    build_line_segments, build_scatter_points, clip_segment, dash_segment,
};

const AXES_STYLE: RectStyle = RectStyle {
    fill: Color::WHITE,
    stroke: Color::BLACK,
    stroke_width: 1.0,
};

const PREVIEW_STYLE: RectStyle = RectStyle {
    fill: Color::WHITE,
    stroke: Color::new(0.4, 0.4, 0.4, 1.0),
    stroke_width: 1.0,
};

/// Describe one frame of the mosaic in display space.
///
/// Draw order, back to front: main axes, guide lines, main points, committed
/// plots in record order, the plot being placed, and the hover preview.
pub fn build_frame<P>(controller: &InteractionController<P>) -> RenderList {
    let state = controller.state();
    let bridge = state.bridge();
    let style = &state.config().main_plot;
    let (fig_w, fig_h) = bridge.figure_size();
    let figure = ScreenRect::from_origin_size(ScreenPoint::new(0.0, 0.0), fig_w, fig_h);
    let axes = bridge.axes_display_rect();

    let mut list = RenderList::new();
    list.push(RenderCommand::Rect {
        rect: axes,
        style: AXES_STYLE,
    });

    let lines = state
        .plots()
        .iter()
        .map(|plot| plot.guide_line())
        .chain(controller.pending().map(|plot| plot.guide_line()));
    let mut segments = Vec::new();
    for line in lines {
        push_guide_line(line, bridge, figure, style.guide_line, &mut segments);
    }
    if !segments.is_empty() {
        list.push(RenderCommand::LineSegments {
            segments,
            style: style.guide_line,
        });
    }

    for (color, points) in scatter_groups(state.points(), style, bridge, axes) {
        list.push(RenderCommand::Points {
            points,
            style: MarkerStyle {
                color,
                ..style.marker
            },
        });
    }

    for plot in state.plots() {
        push_surface(&mut list, plot.surface(), bridge, AXES_STYLE);
    }
    if let Some(plot) = controller.pending() {
        push_surface(&mut list, plot.surface(), bridge, AXES_STYLE);
    }
    if let Some(preview) = controller.preview() {
        push_surface(&mut list, preview, bridge, PREVIEW_STYLE);
    }
    list
}

/// Main points inside the axes, grouped by color in order of first use.
fn scatter_groups(
    points: &[Point],
    style: &MainPlotStyle,
    bridge: &CoordinateBridge,
    axes: ScreenRect,
) -> Vec<(Color, Vec<ScreenPoint>)> {
    if style.point_colors.is_none() {
        let mut out = Vec::new();
        build_scatter_points(points, bridge, axes, &mut out);
        return if out.is_empty() {
            Vec::new()
        } else {
            vec![(style.marker.color, out)]
        };
    }
    let mut groups: Vec<(Color, Vec<ScreenPoint>)> = Vec::new();
    for (index, point) in points.iter().enumerate() {
        if !point.is_finite() {
            continue;
        }
        let screen = bridge.data_to_display(*point);
        if !axes.contains(screen) {
            continue;
        }
        let color = style.point_color(index);
        match groups.iter_mut().find(|(group, _)| *group == color) {
            Some((_, members)) => members.push(screen),
            None => groups.push((color, vec![screen])),
        }
    }
    groups
}

fn push_guide_line(
    line: GuideLine,
    bridge: &CoordinateBridge,
    clip: ScreenRect,
    style: LineStyle,
    out: &mut Vec<LineSegment>,
) {
    if !line.start.is_finite() || !line.end.is_finite() {
        return;
    }
    let start = bridge.data_to_display(line.start);
    let end = bridge.data_to_display(line.end);
    let Some((start, end)) = clip_segment(start, end, clip) else {
        return;
    };
    let segment = LineSegment::new(start, end);
    match style.dash {
        Some([dash, gap]) => dash_segment(segment, dash, gap, out),
        None => out.push(segment),
    }
}

fn push_surface(
    list: &mut RenderList,
    surface: &Surface,
    bridge: &CoordinateBridge,
    style: RectStyle,
) {
    let rect = bridge.figure_rect_to_display(surface.current_position_rect());
    if !rect.is_valid() {
        return;
    }
    list.push(RenderCommand::Rect { rect, style });

    let Some(transform) = surface.content_transform(rect) else {
        return;
    };
    list.push(RenderCommand::ClipRect(rect));
    for command in surface.commands() {
        match command {
            SurfaceCommand::Markers { points, style } => {
                let mut out = Vec::new();
                build_scatter_points(points, &transform, rect, &mut out);
                if !out.is_empty() {
                    list.push(RenderCommand::Points {
                        points: out,
                        style: *style,
                    });
                }
            }
            SurfaceCommand::Polyline { points, style } => {
                let mut out = Vec::new();
                build_line_segments(points, &transform, rect, &mut out);
                if !out.is_empty() {
                    list.push(RenderCommand::LineSegments {
                        segments: out,
                        style: *style,
                    });
                }
            }
        }
    }
    list.push(RenderCommand::ClipEnd);
}
