use carpet_chart::api::{ChartEngine, ChartEngineConfig};
use carpet_chart::carpet::{Carpet, CarpetAxis, CarpetAxisId, CarpetGrid};
use carpet_chart::core::{Axis, AxisId, Series, TickSet, compute_ticks};
use carpet_chart::render::NullRenderer;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_tick_generation(c: &mut Criterion) {
    let mut axis = Axis::new(AxisId::X, (-1_234.5, 98_765.4), 1920.0).expect("valid axis");

    c.bench_function("tick_generation", |b| {
        b.iter(|| {
            let range = black_box(axis.range());
            let factor = compute_ticks(&mut axis, range);
            let ticks = TickSet::enumerate(range, axis.tick0, axis.dtick, factor, 1000);
            black_box(ticks.labels());
        })
    });
}

fn warped_carpet(n: usize) -> Carpet {
    let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let b: Vec<f64> = (0..n).map(|j| j as f64 * 2.0).collect();
    let x = a
        .iter()
        .map(|&av| b.iter().map(|&bv| av + 0.3 * (bv * 0.2).sin()).collect())
        .collect();
    let y = a
        .iter()
        .map(|&av| b.iter().map(|&bv| bv + 0.3 * (av * 0.5).cos()).collect())
        .collect();
    let grid = CarpetGrid::new(a, b, x, y).expect("valid grid");
    Carpet::new(grid, CarpetAxis::linear(0.0, 0.25), CarpetAxis::default()).expect("valid carpet")
}

fn bench_carpet_gridlines(c: &mut Criterion) {
    let carpet = warped_carpet(32);

    c.bench_function("carpet_array_gridlines_32x32", |b| {
        b.iter(|| {
            black_box(
                carpet
                    .gridlines(black_box(CarpetAxisId::B), 1000)
                    .expect("gridlines"),
            );
        })
    });

    c.bench_function("carpet_linear_gridlines_32x32", |b| {
        b.iter(|| {
            black_box(
                carpet
                    .gridlines(black_box(CarpetAxisId::A), 1000)
                    .expect("gridlines"),
            );
        })
    });
}

fn bench_full_redraw_10k(c: &mut Criterion) {
    let mut engine = ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default())
        .expect("engine init");
    let x: Vec<f64> = (0..10_000).map(|i| i as f64 * 0.01).collect();
    let y: Vec<f64> = x.iter().map(|v| v.sin() * 100.0).collect();
    engine.set_series("wave", Series::from_xy(x, y));
    engine.add_carpet("warped", warped_carpet(16));

    c.bench_function("full_redraw_10k", |b| {
        b.iter(|| {
            engine.set_autotick(AxisId::X, true);
            let scene = engine.redraw().expect("redraw");
            black_box(scene.frame.paths.len());
        })
    });
}

criterion_group!(
    benches,
    bench_tick_generation,
    bench_carpet_gridlines,
    bench_full_redraw_10k
);
criterion_main!(benches);
