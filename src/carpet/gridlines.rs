use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::carpet::control_points::ControlSurface;
use crate::carpet::grid::{CarpetAxisId, CarpetGrid};
use crate::carpet::trace::{Carpet, CarpetTickMode};
use crate::core::NiceStep;
use crate::error::{ChartError, ChartResult};

/// Relative slack applied to the tick-count bounds so a tick sitting on the
/// first or last parameter value survives rounding.
const TICK_BOUND_EPSILON: f64 = 5e-15;
/// Largest distance from an integer lattice index still treated as on-lattice.
const LATTICE_TOLERANCE: f64 = 1e-9;

/// One carpet gridline in data space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarpetGridline {
    /// Axis held constant along the line.
    pub axis: CarpetAxisId,
    /// Axis the line is traced along.
    pub constvar: CarpetAxisId,
    pub value: f64,
    /// Lattice index in array mode, tick number `n` in linear mode.
    pub index: i64,
    /// Lattice points, interleaved with two Bezier control points per
    /// segment when `smoothing` is set.
    pub points: Vec<(f64, f64)>,
    /// Derivative along `constvar` at the first and last point.
    pub dxy_0: Option<[f64; 2]>,
    pub dxy_1: Option<[f64; 2]>,
    pub smoothing: bool,
}

impl CarpetGridline {
    /// Groups points into cubic segments `(start, c1, c2, end)` for a smoothed
    /// line. Empty when the line is not smoothed.
    #[must_use]
    pub fn bezier_segments(&self) -> Vec<[(f64, f64); 4]> {
        if !self.smoothing || self.points.len() < 4 {
            return Vec::new();
        }
        self.points
            .windows(4)
            .step_by(3)
            .map(|w| [w[0], w[1], w[2], w[3]])
            .collect()
    }
}

/// Gridlines of constant `axis` value over `carpet`.
pub fn calc_gridlines(
    carpet: &Carpet,
    axis: CarpetAxisId,
    max_gridlines: usize,
) -> ChartResult<Vec<CarpetGridline>> {
    let settings = carpet.axis(axis);
    let lines = match settings.tickmode {
        CarpetTickMode::Array => array_gridlines(carpet, axis, settings.tickvals.as_deref()),
        CarpetTickMode::Linear => {
            let dtick = resolve_dtick(carpet.grid().parameters(axis), settings.dtick);
            linear_gridlines(carpet, axis, settings.tick0, dtick, max_gridlines)?
        }
    };
    trace!(?axis, count = lines.len(), "carpet gridlines");
    Ok(lines)
}

fn resolve_dtick(parameters: &[f64], requested: Option<f64>) -> f64 {
    if let Some(dtick) = requested {
        if dtick.is_finite() && dtick > 0.0 {
            return dtick;
        }
        warn!(dtick, "invalid carpet dtick, using auto step");
    }
    let span = parameters[parameters.len() - 1] - parameters[0];
    NiceStep::for_span(span).map_or(1.0, NiceStep::dtick)
}

/// Copies control rows straight off the lattice for every on-lattice value.
fn array_gridlines(
    carpet: &Carpet,
    axis: CarpetAxisId,
    tickvals: Option<&[f64]>,
) -> Vec<CarpetGridline> {
    let grid = carpet.grid();
    let surface = carpet.surface();
    let mut values: Vec<OrderedFloat<f64>> = tickvals
        .unwrap_or_else(|| grid.parameters(axis))
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .map(OrderedFloat)
        .collect();
    values.sort_unstable();
    values.dedup();

    let n = grid.parameters(axis).len();
    values
        .into_iter()
        .filter_map(|OrderedFloat(value)| {
            let fractional = grid.to_index(axis, value);
            let k = fractional.round();
            if (fractional - k).abs() > LATTICE_TOLERANCE || k < 0.0 || k > (n - 1) as f64 {
                warn!(?axis, value, "array tick value is not on the carpet lattice");
                return None;
            }
            Some(lattice_gridline(surface, axis, value, k as usize))
        })
        .collect()
}

fn lattice_gridline(
    surface: &ControlSurface,
    axis: CarpetAxisId,
    value: f64,
    k: usize,
) -> CarpetGridline {
    let (points, dxy_0, dxy_1, smoothing) = match axis {
        CarpetAxisId::B => {
            let stride = if surface.b_smoothed() { 3 } else { 1 };
            let points = (0..surface.nea())
                .map(|ia| surface.control_point(ia, k * stride))
                .collect();
            let j0 = k.min(surface.nb() - 2);
            let tj = (k - j0) as f64;
            let dxy_0 = surface.dxy_di(0, j0, 0.0, tj);
            let dxy_1 = surface.dxy_di(surface.na() - 2, j0, 1.0, tj);
            (points, dxy_0, dxy_1, surface.a_smoothed())
        }
        CarpetAxisId::A => {
            let stride = if surface.a_smoothed() { 3 } else { 1 };
            let points = (0..surface.neb())
                .map(|jb| surface.control_point(k * stride, jb))
                .collect();
            let i0 = k.min(surface.na() - 2);
            let ti = (k - i0) as f64;
            let dxy_0 = surface.dxy_dj(i0, 0, ti, 0.0);
            let dxy_1 = surface.dxy_dj(i0, surface.nb() - 2, ti, 1.0);
            (points, dxy_0, dxy_1, surface.b_smoothed())
        }
    };

    CarpetGridline {
        axis,
        constvar: axis.cross(),
        value,
        index: k as i64,
        points,
        dxy_0: Some(dxy_0),
        dxy_1: Some(dxy_1),
        smoothing,
    }
}

/// Inclusive range of tick numbers `n` with `tick0 + n * dtick` inside the
/// parameter span, independent of the parameter direction.
#[must_use]
pub fn tick_number_bounds(parameters: &[f64], tick0: f64, dtick: f64) -> (i64, i64) {
    let (n1, n2) = tick_number_span(parameters, tick0, dtick);
    (n1 as i64, n2 as i64)
}

/// Integral-valued bounds of [`tick_number_bounds`], before the integer cast.
fn tick_number_span(parameters: &[f64], tick0: f64, dtick: f64) -> (f64, f64) {
    let first = (parameters[0] - tick0) / dtick;
    let last = (parameters[parameters.len() - 1] - tick0) / dtick;
    let (lo, hi) = if first <= last {
        (first, last)
    } else {
        (last, first)
    };
    let n1 = (lo - lo.abs() * TICK_BOUND_EPSILON).ceil();
    let n2 = (hi + hi.abs() * TICK_BOUND_EPSILON).floor();
    (n1, n2)
}

/// Base cell and local parameter for a fractional lattice index, with the
/// base clamped to `[0, n - 2]`.
#[must_use]
pub fn clamp_cell(fractional: f64, n: usize) -> (usize, f64) {
    let last_cell = (n - 2) as f64;
    let base = fractional.clamp(0.0, last_cell).floor();
    let t = (fractional - base).clamp(0.0, 1.0);
    (base as usize, t)
}

fn linear_gridlines(
    carpet: &Carpet,
    axis: CarpetAxisId,
    tick0: f64,
    dtick: f64,
    max_gridlines: usize,
) -> ChartResult<Vec<CarpetGridline>> {
    let grid = carpet.grid();
    let (lo, hi) = tick_number_span(grid.parameters(axis), tick0, dtick);
    if hi < lo {
        return Ok(Vec::new());
    }
    // Counted in f64 so spans beyond the i64 range are rejected before the cast.
    let count = hi - lo + 1.0;
    if !count.is_finite() || count > max_gridlines as f64 {
        return Err(ChartError::InvalidGrid(format!(
            "carpet axis {axis:?} would need {count} gridlines (max {max_gridlines})"
        )));
    }
    let (n1, n2) = (lo as i64, hi as i64);

    Ok((n1..=n2)
        .map(|n| {
            let value = tick0 + n as f64 * dtick;
            evaluated_gridline(grid, carpet.surface(), axis, value, n)
        })
        .collect())
}

fn evaluated_gridline(
    grid: &CarpetGrid,
    surface: &ControlSurface,
    axis: CarpetAxisId,
    value: f64,
    n: i64,
) -> CarpetGridline {
    let mut points: Vec<(f64, f64)> = Vec::new();
    let (dxy_0, dxy_1, smoothing) = match axis {
        CarpetAxisId::B => {
            let (j0, tj) = clamp_cell(grid.b_to_index(value), surface.nb());
            let smoothed = surface.a_smoothed();
            for i in 0..surface.na() {
                let i0 = i.min(surface.na() - 2);
                let ti = (i - i0) as f64;
                let xy = surface.eval_xy(i0, j0, ti, tj);
                if smoothed && i > 0 {
                    let d0 = surface.dxy_di(i - 1, j0, 0.0, tj);
                    let d1 = surface.dxy_di(i - 1, j0, 1.0, tj);
                    push_controls(&mut points, d0, d1, xy);
                }
                points.push((xy[0], xy[1]));
            }
            let dxy_0 = surface.dxy_di(0, j0, 0.0, tj);
            let dxy_1 = surface.dxy_di(surface.na() - 2, j0, 1.0, tj);
            (dxy_0, dxy_1, smoothed)
        }
        CarpetAxisId::A => {
            let (i0, ti) = clamp_cell(grid.a_to_index(value), surface.na());
            let smoothed = surface.b_smoothed();
            for j in 0..surface.nb() {
                let j0 = j.min(surface.nb() - 2);
                let tj = (j - j0) as f64;
                let xy = surface.eval_xy(i0, j0, ti, tj);
                if smoothed && j > 0 {
                    let d0 = surface.dxy_dj(i0, j - 1, ti, 0.0);
                    let d1 = surface.dxy_dj(i0, j - 1, ti, 1.0);
                    push_controls(&mut points, d0, d1, xy);
                }
                points.push((xy[0], xy[1]));
            }
            let dxy_0 = surface.dxy_dj(i0, 0, ti, 0.0);
            let dxy_1 = surface.dxy_dj(i0, surface.nb() - 2, ti, 1.0);
            (dxy_0, dxy_1, smoothed)
        }
    };

    CarpetGridline {
        axis,
        constvar: axis.cross(),
        value,
        index: n,
        points,
        dxy_0: Some(dxy_0),
        dxy_1: Some(dxy_1),
        smoothing,
    }
}

/// Inserts the two inner control points of the segment ending at `end`.
fn push_controls(points: &mut Vec<(f64, f64)>, d0: [f64; 2], d1: [f64; 2], end: [f64; 2]) {
    let Some(&(px, py)) = points.last() else {
        return;
    };
    points.push((px + d0[0] / 3.0, py + d0[1] / 3.0));
    points.push((end[0] - d1[0] / 3.0, end[1] - d1[1] / 3.0));
}

#[cfg(test)]
mod tests {
    use super::{calc_gridlines, clamp_cell, tick_number_bounds};
    use crate::carpet::grid::{CarpetAxisId, CarpetGrid};
    use crate::carpet::trace::{Carpet, CarpetAxis};
    use crate::error::ChartError;
    use approx::assert_relative_eq;

    fn warped_carpet(a_axis: CarpetAxis, b_axis: CarpetAxis) -> Carpet {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![10.0, 20.0, 30.0];
        let x = a
            .iter()
            .map(|&av| b.iter().map(|&bv| av + bv * 0.1).collect())
            .collect();
        let y = a
            .iter()
            .map(|&av| b.iter().map(|&bv| bv * 0.2 + av * av * 0.3).collect())
            .collect();
        Carpet::new(CarpetGrid::new(a, b, x, y).expect("grid"), a_axis, b_axis).expect("carpet")
    }

    #[test]
    fn array_mode_copies_control_rows() {
        let carpet = warped_carpet(CarpetAxis::default(), CarpetAxis::default());
        let surface = carpet.surface();

        let b_lines = calc_gridlines(&carpet, CarpetAxisId::B, 100).expect("b lines");
        assert_eq!(b_lines.len(), 3);
        let line = &b_lines[1];
        assert_eq!(line.index, 1);
        assert_eq!(line.constvar, CarpetAxisId::A);
        assert!(line.smoothing);
        let expected: Vec<(f64, f64)> = (0..surface.nea())
            .map(|ia| surface.control_point(ia, 3))
            .collect();
        assert_eq!(line.points, expected);

        let a_lines = calc_gridlines(&carpet, CarpetAxisId::A, 100).expect("a lines");
        assert_eq!(a_lines.len(), 4);
        let expected: Vec<(f64, f64)> = (0..surface.neb())
            .map(|jb| surface.control_point(9, jb))
            .collect();
        assert_eq!(a_lines[3].points, expected);
    }

    #[test]
    fn array_mode_lattice_points_match_grid() {
        let carpet = warped_carpet(CarpetAxis::default(), CarpetAxis::default());
        let lines = calc_gridlines(&carpet, CarpetAxisId::B, 100).expect("lines");
        let grid = carpet.grid();
        for (j, line) in lines.iter().enumerate() {
            for i in 0..grid.na() {
                assert_eq!(line.points[3 * i], (grid.x()[i][j], grid.y()[i][j]));
            }
        }
    }

    #[test]
    fn array_mode_skips_off_lattice_values() {
        let carpet = warped_carpet(
            CarpetAxis::default().with_tickvals(vec![2.0, 2.5, 4.0, 4.0, 9.0]),
            CarpetAxis::default(),
        );
        let lines = calc_gridlines(&carpet, CarpetAxisId::A, 100).expect("lines");
        let values: Vec<f64> = lines.iter().map(|line| line.value).collect();
        assert_eq!(values, vec![2.0, 4.0]);
    }

    #[test]
    fn array_mode_tangents_at_last_lattice_row() {
        let carpet = warped_carpet(
            CarpetAxis::default().with_smoothing(0.0),
            CarpetAxis::default().with_smoothing(0.0),
        );
        let lines = calc_gridlines(&carpet, CarpetAxisId::A, 100).expect("lines");
        let last = lines.last().expect("last");
        // x = a + 0.1 b, so dx/dj = 0.1 * 10 over one b cell.
        let dxy_0 = last.dxy_0.expect("dxy_0");
        assert_relative_eq!(dxy_0[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(dxy_0[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_mode_matches_array_mode_on_lattice() {
        let array = warped_carpet(CarpetAxis::default(), CarpetAxis::default());
        let linear = warped_carpet(CarpetAxis::default(), CarpetAxis::linear(0.0, 10.0));
        let from_array = calc_gridlines(&array, CarpetAxisId::B, 100).expect("array");
        let from_linear = calc_gridlines(&linear, CarpetAxisId::B, 100).expect("linear");
        assert_eq!(from_array.len(), from_linear.len());
        for (left, right) in from_array.iter().zip(&from_linear) {
            assert_eq!(left.points.len(), right.points.len());
            for (p, q) in left.points.iter().zip(&right.points) {
                assert_relative_eq!(p.0, q.0, epsilon = 1e-9);
                assert_relative_eq!(p.1, q.1, epsilon = 1e-9);
            }
        }
        assert_eq!(from_linear[0].index, 1);
    }

    #[test]
    fn linear_mode_interpolates_between_lattice_rows() {
        let carpet = warped_carpet(
            CarpetAxis::linear(0.0, 0.5).with_smoothing(0.0),
            CarpetAxis::default().with_smoothing(0.0),
        );
        let lines = calc_gridlines(&carpet, CarpetAxisId::A, 100).expect("lines");
        assert_eq!(lines.len(), 7);
        let mid = lines.iter().find(|line| line.value == 1.5).expect("1.5");
        assert_eq!(mid.points.len(), 3);
        assert!(!mid.smoothing);
        assert_relative_eq!(mid.points[0].0, 1.5 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_mode_inserts_bezier_controls_when_cross_axis_smoothed() {
        let carpet = warped_carpet(CarpetAxis::linear(0.0, 1.0), CarpetAxis::default());
        let lines = calc_gridlines(&carpet, CarpetAxisId::A, 100).expect("lines");
        let line = &lines[0];
        assert!(line.smoothing);
        assert_eq!(line.points.len(), 3 * (3 - 1) + 1);
        assert_eq!(line.bezier_segments().len(), 2);
    }

    #[test]
    fn degenerate_tick_range_yields_single_gridline() {
        let carpet = warped_carpet(CarpetAxis::linear(1.0, 100.0), CarpetAxis::default());
        let lines = calc_gridlines(&carpet, CarpetAxisId::A, 100).expect("lines");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].value, 1.0);
    }

    #[test]
    fn excessive_gridline_count_is_an_error() {
        let carpet = warped_carpet(CarpetAxis::linear(0.0, 1e-6), CarpetAxis::default());
        let err = calc_gridlines(&carpet, CarpetAxisId::A, 1000).expect_err("too many");
        assert!(matches!(err, ChartError::InvalidGrid(_)));
    }

    #[test]
    fn gridline_count_beyond_integer_range_is_an_error() {
        let grid = CarpetGrid::rectilinear(vec![0.0, 1.0e19], vec![0.0, 1.0]).expect("grid");
        let carpet =
            Carpet::new(grid, CarpetAxis::linear(0.0, 1.0), CarpetAxis::default()).expect("carpet");
        let err = calc_gridlines(&carpet, CarpetAxisId::A, 1000).expect_err("too many");
        assert!(matches!(err, ChartError::InvalidGrid(_)));

        let grid = CarpetGrid::rectilinear(vec![1.0e19, 2.0e19], vec![0.0, 1.0]).expect("grid");
        let carpet = Carpet::new(grid, CarpetAxis::linear(-1.0e19, 1.0e-3), CarpetAxis::default())
            .expect("carpet");
        let err = calc_gridlines(&carpet, CarpetAxisId::A, 1000).expect_err("too many");
        assert!(matches!(err, ChartError::InvalidGrid(_)));
    }

    #[test]
    fn tick_bounds_are_direction_agnostic() {
        assert_eq!(tick_number_bounds(&[0.0, 1.0, 2.0], 0.0, 0.5), (0, 4));
        assert_eq!(tick_number_bounds(&[2.0, 1.0, 0.0], 0.0, 0.5), (0, 4));
        assert_eq!(tick_number_bounds(&[0.3, 0.9], 0.0, 0.5), (1, 1));
        assert_eq!(tick_number_bounds(&[-0.9, -0.3], 0.0, 0.5), (-1, -1));
    }

    #[test]
    fn clamp_cell_keeps_base_in_range() {
        assert_eq!(clamp_cell(0.0, 4), (0, 0.0));
        assert_eq!(clamp_cell(1.25, 4), (1, 0.25));
        assert_eq!(clamp_cell(3.0, 4), (2, 1.0));
        assert_eq!(clamp_cell(-0.5, 4), (0, 0.0));
        assert_eq!(clamp_cell(7.0, 4), (2, 1.0));
    }
}
