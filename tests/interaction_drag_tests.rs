use std::time::Duration;

use approx::assert_relative_eq;
use carpet_chart::api::{ChartEngine, ChartEngineConfig};
use carpet_chart::core::{AxisId, Series, ViewportOffset};
use carpet_chart::interaction::{DoubleClickAction, DragOutcome, DragPhase, DragTarget, ResizeHandle};
use carpet_chart::render::NullRenderer;

const X_BAR_Y: f64 = 380.0;
const Y_BAR_X: f64 = 25.0;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Default 600x400 layout has a 540x330 plot box at (50, 30), so these
/// ranges give `m = 10` on x and `m = -10` on y.
fn engine_with_fixed_ranges() -> ChartEngine<NullRenderer> {
    let mut engine = ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default())
        .expect("engine init");
    engine.set_axis_range(AxisId::X, (0.0, 54.0)).expect("x range");
    engine.set_axis_range(AxisId::Y, (0.0, 33.0)).expect("y range");
    engine
}

#[test]
fn plot_pan_shifts_range_by_pixel_delta_over_slope() {
    let mut engine = engine_with_fixed_ranges();
    assert_relative_eq!(engine.axis(AxisId::X).transform().m, 10.0);

    assert!(engine.pointer_down(300.0, 200.0));
    assert_eq!(engine.drag_phase(), DragPhase::Panning(DragTarget::Plot));
    let update = engine.pointer_move(340.0, 200.0).expect("update");
    assert_eq!(update.offset, ViewportOffset::new(40.0, 0.0));
    engine.redraw().expect("live redraw");
    assert_eq!(engine.axis_range(AxisId::X), (0.0, 54.0));
    assert_eq!(engine.x_range(), (-4.0, 50.0));

    let outcome = engine.pointer_up(350.0, 200.0, ms(100)).expect("pointer up");
    assert_eq!(outcome, DragOutcome::Committed);
    assert_eq!(engine.axis_range(AxisId::X), (-5.0, 49.0));
    assert_eq!(engine.axis_range(AxisId::Y), (0.0, 33.0));
    assert!(engine.viewport_offset().is_zero());
    assert_eq!(engine.drag_phase(), DragPhase::Idle);
}

#[test]
fn vertical_pan_moves_y_up_when_dragging_down() {
    let mut engine = engine_with_fixed_ranges();
    engine.pointer_down(300.0, 100.0);
    engine.pointer_up(300.0, 130.0, ms(0)).expect("pointer up");
    assert_eq!(engine.axis_range(AxisId::Y), (3.0, 36.0));
}

#[test]
fn live_redraws_follow_the_offset() {
    let mut engine = engine_with_fixed_ranges();
    let before = engine.redraw().expect("redraw").x.ticks.values.clone();
    engine.pointer_down(300.0, 200.0);
    engine.pointer_move(400.0, 200.0);
    let during = engine.redraw().expect("redraw");
    assert_eq!(during.offset, ViewportOffset::new(100.0, 0.0));
    assert_eq!(during.x.visible_range, (-10.0, 44.0));
    assert_ne!(during.x.ticks.values, before);
}

#[test]
fn travel_inside_dead_zone_is_a_click() {
    let mut engine = engine_with_fixed_ranges();
    engine.pointer_down(300.0, 200.0);
    let update = engine.pointer_move(303.0, 204.0).expect("update");
    assert!(update.offset.is_zero());
    let outcome = engine.pointer_up(303.0, 204.0, ms(50)).expect("pointer up");
    assert_eq!(outcome, DragOutcome::Click);
    assert_eq!(engine.axis_range(AxisId::X), (0.0, 54.0));
}

#[test]
fn dead_zone_latches_once_left() {
    let mut engine = engine_with_fixed_ranges();
    engine.pointer_down(300.0, 200.0);
    engine.pointer_move(320.0, 200.0);
    let update = engine.pointer_move(302.0, 200.0).expect("update");
    assert_eq!(update.offset, ViewportOffset::new(2.0, 0.0));
}

#[test]
fn axis_bar_pan_is_constrained_to_its_axis() {
    let mut engine = engine_with_fixed_ranges();
    assert!(engine.pointer_down(320.0, X_BAR_Y));
    assert_eq!(
        engine.drag_phase(),
        DragPhase::Panning(DragTarget::Axis(AxisId::X))
    );
    engine.pointer_up(340.0, X_BAR_Y + 15.0, ms(0)).expect("pointer up");
    assert_eq!(engine.axis_range(AxisId::X), (-2.0, 52.0));
    assert_eq!(engine.axis_range(AxisId::Y), (0.0, 33.0));
}

#[test]
fn east_handle_rescales_the_high_end() {
    let mut engine = engine_with_fixed_ranges();
    assert!(engine.pointer_down(580.0, X_BAR_Y));
    assert_eq!(
        engine.drag_phase(),
        DragPhase::Zooming(DragTarget::Handle(ResizeHandle::E))
    );
    let update = engine.pointer_move(310.0, X_BAR_Y).expect("update");
    assert!(update.offset.is_zero());
    assert_eq!(update.y_range, None);
    let (low, high) = update.x_range.expect("x range");
    assert_eq!(low, 0.0);
    assert_relative_eq!(high, 108.0, epsilon = 1e-9);

    engine.pointer_up(310.0, X_BAR_Y, ms(0)).expect("pointer up");
    let (low, high) = engine.axis_range(AxisId::X);
    assert_eq!(low, 0.0);
    assert_relative_eq!(high, 108.0, epsilon = 1e-9);
}

#[test]
fn west_handle_drag_saturates_at_tenfold_span() {
    let mut engine = engine_with_fixed_ranges();
    assert!(engine.pointer_down(55.0, X_BAR_Y));
    engine.pointer_move(55.0 + 2000.0, X_BAR_Y);
    let (low, high) = engine.axis_range(AxisId::X);
    assert_eq!(high, 54.0);
    assert_relative_eq!(low, 54.0 - 540.0, epsilon = 1e-9);
}

#[test]
fn corner_handle_moves_both_axes() {
    let mut engine = engine_with_fixed_ranges();
    // Bottom-right corner cell sits right of the x bar and below the plot.
    assert!(engine.pointer_down(595.0, X_BAR_Y));
    assert_eq!(
        engine.drag_phase(),
        DragPhase::Zooming(DragTarget::Handle(ResizeHandle::SE))
    );
    let update = engine.pointer_move(595.0 - 54.0, X_BAR_Y + 33.0).expect("update");
    assert!(update.x_range.is_some());
    assert!(update.y_range.is_some());
}

#[test]
fn double_click_on_plot_resets_the_view() {
    let mut engine = engine_with_fixed_ranges();
    engine.set_series("line", Series::from_xy(vec![0.0, 10.0], vec![0.0, 100.0]));

    engine.pointer_down(300.0, 200.0);
    engine.pointer_up(300.0, 200.0, ms(1_000)).expect("first up");
    engine.pointer_down(300.0, 200.0);
    let outcome = engine.pointer_up(300.0, 200.0, ms(1_200)).expect("second up");
    assert_eq!(outcome, DragOutcome::DoubleClick(DoubleClickAction::ResetView));
    assert!(engine.axis(AxisId::X).autorange);
    assert!(engine.axis(AxisId::Y).autorange);

    engine.redraw().expect("redraw");
    let (x0, x1) = engine.axis_range(AxisId::X);
    assert_relative_eq!(x0, -0.5, epsilon = 1e-12);
    assert_relative_eq!(x1, 10.5, epsilon = 1e-12);
    let (y0, y1) = engine.axis_range(AxisId::Y);
    assert_relative_eq!(y0, -5.0, epsilon = 1e-12);
    assert_relative_eq!(y1, 105.0, epsilon = 1e-12);
}

#[test]
fn double_click_on_axis_bar_autoranges_that_axis_only() {
    let mut engine = engine_with_fixed_ranges();
    engine.set_series("line", Series::from_xy(vec![0.0, 10.0], vec![0.0, 100.0]));

    engine.pointer_down(Y_BAR_X, 200.0);
    engine.pointer_up(Y_BAR_X, 200.0, ms(0)).expect("first up");
    engine.pointer_down(Y_BAR_X, 200.0);
    let outcome = engine.pointer_up(Y_BAR_X, 200.0, ms(250)).expect("second up");
    let DragOutcome::DoubleClick(DoubleClickAction::Autorange(axes)) = outcome else {
        panic!("expected an axis autorange");
    };
    assert_eq!(axes.as_slice(), &[AxisId::Y]);

    engine.redraw().expect("redraw");
    assert_eq!(engine.axis_range(AxisId::X), (0.0, 54.0));
    let (y0, y1) = engine.axis_range(AxisId::Y);
    assert_relative_eq!(y0, -5.0, epsilon = 1e-12);
    assert_relative_eq!(y1, 105.0, epsilon = 1e-12);
}

#[test]
fn slow_second_click_is_not_a_double_click() {
    let mut engine = engine_with_fixed_ranges();
    engine.pointer_down(300.0, 200.0);
    engine.pointer_up(300.0, 200.0, ms(0)).expect("first up");
    engine.pointer_down(300.0, 200.0);
    let outcome = engine.pointer_up(300.0, 200.0, ms(301)).expect("second up");
    assert_eq!(outcome, DragOutcome::Click);
    assert!(!engine.axis(AxisId::X).autorange);
}

#[test]
fn cancel_restores_baseline_without_commit() {
    let mut engine = engine_with_fixed_ranges();
    engine.pointer_down(580.0, X_BAR_Y);
    engine.pointer_move(400.0, X_BAR_Y);
    assert_ne!(engine.axis_range(AxisId::X), (0.0, 54.0));

    assert!(engine.cancel_drag());
    assert_eq!(engine.axis_range(AxisId::X), (0.0, 54.0));
    assert!(engine.viewport_offset().is_zero());
    assert_eq!(engine.drag_phase(), DragPhase::Idle);
    assert!(!engine.cancel_drag());
    assert_eq!(
        engine.pointer_up(400.0, X_BAR_Y, ms(10)).expect("pointer up"),
        DragOutcome::Ignored
    );
}

#[test]
fn pointer_down_outside_every_region_is_ignored() {
    let mut engine = engine_with_fixed_ranges();
    assert!(!engine.pointer_down(595.0, 410.0));
    assert!(engine.pointer_move(100.0, 100.0).is_none());
}

#[test]
fn dragging_an_autoranged_axis_keeps_the_dragged_range() {
    let mut engine = ChartEngine::new(NullRenderer::default(), ChartEngineConfig::default())
        .expect("engine init");
    engine.set_series("line", Series::from_xy(vec![0.0, 54.0], vec![0.0, 33.0]));
    engine.redraw().expect("redraw");
    let (x0, x1) = engine.axis_range(AxisId::X);

    engine.pointer_down(300.0, 200.0);
    engine.pointer_move(360.0, 200.0);
    engine.redraw().expect("live redraw");
    engine.pointer_up(360.0, 200.0, ms(0)).expect("pointer up");
    engine.redraw().expect("redraw");

    assert!(!engine.axis(AxisId::X).autorange);
    let shift = 60.0 / engine.axis(AxisId::X).transform().m;
    let (after0, after1) = engine.axis_range(AxisId::X);
    assert_relative_eq!(after0, x0 - shift, epsilon = 1e-9);
    assert_relative_eq!(after1, x1 - shift, epsilon = 1e-9);
}
