use std::path::PathBuf;
use std::sync::Arc;

use gpui::prelude::*;
use gpui::{Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use plot_mosaic::{
    Color, FnRenderer, GpuiMosaicView, InteractionController, LineStyle, MosaicConfig,
    MosaicSource, RendererRegistry, SeriesPayload, SharedRenderer, Surface,
};

fn wave_renderer() -> SharedRenderer<SeriesPayload> {
    Arc::new(FnRenderer::new(
        "wave",
        |payload: &SeriesPayload, surface: &mut Surface| {
            surface.line(
                &payload.x,
                &payload.y,
                LineStyle {
                    color: Color::new(0.85, 0.33, 0.1, 1.0),
                    width: 1.5,
                    dash: None,
                },
            );
        },
    ))
}

fn fresh_source(renderer: SharedRenderer<SeriesPayload>) -> MosaicSource<SeriesPayload> {
    let x: Vec<f64> = (0..10).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|x| (x * 0.7).sin() * 4.0 + x * 0.5).collect();
    let payloads = (0..10)
        .map(|i| {
            let xs: Vec<f64> = (0..100).map(|k| f64::from(k) * 0.1).collect();
            let ys = xs
                .iter()
                .map(|t| (t * (1.0 + f64::from(i) * 0.3)).sin())
                .collect();
            SeriesPayload::new(xs, ys)
        })
        .collect();
    MosaicSource::Fresh {
        x,
        y,
        payloads,
        renderer: Some(renderer),
        config: MosaicConfig::default(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut registry = RendererRegistry::<SeriesPayload>::default();
    let renderer = registry.register(wave_renderer());
    let source = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) if path.exists() => MosaicSource::File(path),
        _ => fresh_source(renderer),
    };
    let controller = match InteractionController::open(source, &registry) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("cannot open mosaic: {err}");
            std::process::exit(1);
        }
    };
    let (width, height) = controller.state().config().figure_size;

    Application::new().run(move |cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(width as f32), px(height as f32)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let view = GpuiMosaicView::new(controller);
            cx.new(|_| view)
        })
        .unwrap();
    });
}
