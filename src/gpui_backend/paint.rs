use gpui::{
    BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, Point, Window, point,
    px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand, RenderList,
};

/// Maps display space (y up, figure origin) onto window pixels (y down).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Canvas {
    bounds: Bounds<Pixels>,
}

impl Canvas {
    pub(crate) fn new(bounds: Bounds<Pixels>) -> Self {
        Self { bounds }
    }

    pub(crate) fn size(&self) -> (f64, f64) {
        (
            f64::from(f32::from(self.bounds.size.width)),
            f64::from(f32::from(self.bounds.size.height)),
        )
    }

    /// Window position to display space.
    pub(crate) fn to_display(&self, position: Point<Pixels>) -> ScreenPoint {
        let x = f32::from(position.x - self.bounds.origin.x);
        let y = f32::from(self.bounds.origin.y + self.bounds.size.height - position.y);
        ScreenPoint::new(f64::from(x), f64::from(y))
    }

    fn to_window(&self, at: ScreenPoint) -> Point<Pixels> {
        let bottom = self.bounds.origin.y + self.bounds.size.height;
        point(
            self.bounds.origin.x + px(at.x as f32),
            bottom - px(at.y as f32),
        )
    }

    fn to_bounds(&self, rect: ScreenRect) -> Bounds<Pixels> {
        Bounds::from_corners(
            self.to_window(ScreenPoint::new(rect.min.x, rect.max.y)),
            self.to_window(ScreenPoint::new(rect.max.x, rect.min.y)),
        )
    }
}

pub(crate) fn paint_frame(list: &RenderList, canvas: Canvas, window: &mut Window) {
    let mut clip_stack: Vec<ContentMask<Pixels>> = vec![ContentMask {
        bounds: canvas.bounds,
    }];
    for command in list.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: canvas.to_bounds(*rect),
                });
            }
            RenderCommand::ClipEnd => {
                if clip_stack.len() > 1 {
                    clip_stack.pop();
                }
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, canvas, segments, *style);
                });
            }
            RenderCommand::Points { points, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_points(window, canvas, points, *style);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rect(window, canvas, *rect, *style);
                });
            }
        }
    }
}

fn paint_lines(window: &mut Window, canvas: Canvas, segments: &[LineSegment], style: LineStyle) {
    if segments.is_empty() {
        return;
    }
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    for segment in segments {
        builder.move_to(canvas.to_window(segment.start));
        builder.line_to(canvas.to_window(segment.end));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_points(window: &mut Window, canvas: Canvas, points: &[ScreenPoint], style: MarkerStyle) {
    if points.is_empty() {
        return;
    }
    let half = style.size.max(2.0) as f64 * 0.5;
    let marker_bounds = |center: ScreenPoint| {
        canvas.to_bounds(ScreenRect::new(
            ScreenPoint::new(center.x - half, center.y - half),
            ScreenPoint::new(center.x + half, center.y + half),
        ))
    };

    match style.shape {
        MarkerShape::Circle | MarkerShape::Square => {
            let radius = if style.shape == MarkerShape::Circle {
                px(half as f32)
            } else {
                px(0.0)
            };
            for center in points {
                window.paint_quad(quad(
                    marker_bounds(*center),
                    Corners::all(radius),
                    to_rgba(style.color),
                    Edges::all(px(0.0)),
                    to_rgba(style.color),
                    BorderStyle::default(),
                ));
            }
        }
        MarkerShape::Triangle => {
            let mut builder = PathBuilder::fill();
            for center in points {
                builder.move_to(canvas.to_window(ScreenPoint::new(center.x, center.y + half)));
                builder.line_to(canvas.to_window(ScreenPoint::new(center.x + half, center.y - half)));
                builder.line_to(canvas.to_window(ScreenPoint::new(center.x - half, center.y - half)));
                builder.close();
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, to_rgba(style.color));
            }
        }
        MarkerShape::Cross => {
            let mut builder = PathBuilder::stroke(px(1.0));
            for center in points {
                builder.move_to(canvas.to_window(ScreenPoint::new(center.x - half, center.y)));
                builder.line_to(canvas.to_window(ScreenPoint::new(center.x + half, center.y)));
                builder.move_to(canvas.to_window(ScreenPoint::new(center.x, center.y - half)));
                builder.line_to(canvas.to_window(ScreenPoint::new(center.x, center.y + half)));
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, to_rgba(style.color));
            }
        }
    }
}

fn paint_rect(window: &mut Window, canvas: Canvas, rect: ScreenRect, style: RectStyle) {
    window.paint_quad(quad(
        canvas.to_bounds(rect),
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
