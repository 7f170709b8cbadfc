#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use carpet_chart::ChartError;
use carpet_chart::api::{ChartEngine, ChartEngineConfig};
use carpet_chart::carpet::{Carpet, CarpetAxis, CarpetGrid};
use carpet_chart::core::{Series, Viewport};
use carpet_chart::render::{CairoContextTarget, CairoRenderer};

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).err().expect("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_series_carpet_and_axes() {
    let renderer = CairoRenderer::new(900, 500).expect("renderer");
    let config = ChartEngineConfig::new(Viewport::new(900, 500));
    let mut engine = ChartEngine::new(renderer, config).expect("engine init");
    engine.set_series(
        "parabola",
        Series::from_xy(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]),
    );
    let grid = CarpetGrid::rectilinear(vec![0.0, 1.5, 3.0], vec![0.0, 4.5, 9.0]).expect("grid");
    let carpet = Carpet::new(grid, CarpetAxis::default(), CarpetAxis::default()).expect("carpet");
    engine.add_carpet("carpet", carpet);

    let (paths, circles, texts) = {
        let scene = engine.redraw().expect("redraw");
        (
            scene.frame.paths.len(),
            scene.frame.circles.len(),
            scene.frame.texts.len(),
        )
    };
    let stats = engine.into_renderer().last_stats();
    assert_eq!(stats.paths_drawn, paths);
    assert_eq!(stats.circles_drawn, circles);
    assert_eq!(stats.texts_drawn, texts);
    assert_eq!(circles, 4);
}

#[test]
fn scene_frame_replays_into_external_context() {
    let mut engine = ChartEngine::new(
        carpet_chart::render::NullRenderer::default(),
        ChartEngineConfig::default(),
    )
    .expect("engine init");
    engine.set_series("line", Series::from_xy(vec![0.0, 1.0], vec![0.0, 1.0]));
    let scene = engine.redraw().expect("redraw").clone();

    let surface = ImageSurface::create(Format::ARgb32, 600, 400).expect("surface");
    let context = Context::new(&surface).expect("context");
    let mut target = CairoContextTarget::new(&context);
    scene.frame.replay(&mut target).expect("replay");
}
