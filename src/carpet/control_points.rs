use crate::carpet::grid::CarpetGrid;
use crate::error::{ChartError, ChartResult};

/// Largest accepted smoothing factor.
pub const MAX_SMOOTHING: f64 = 1.3;

/// Validates a per-axis smoothing factor. `0` disables smoothing.
pub fn validate_smoothing(smoothing: f64) -> ChartResult<()> {
    if !smoothing.is_finite() || !(0.0..=MAX_SMOOTHING).contains(&smoothing) {
        return Err(ChartError::InvalidGrid(format!(
            "smoothing must be within [0, {MAX_SMOOTHING}], got {smoothing}"
        )));
    }
    Ok(())
}

/// Expands `n` lattice values into `3(n - 1) + 1` cubic Bezier control
/// values. Lattice values stay at every third slot; the two inner control
/// values of each segment follow the finite-difference tangent at each end,
/// scaled by `smoothing`.
#[must_use]
pub fn expand_controls(values: &[f64], smoothing: f64) -> Vec<f64> {
    let n = values.len();
    if n < 2 || smoothing <= 0.0 {
        return values.to_vec();
    }

    let tangent = |i: usize| -> f64 {
        if i == 0 {
            values[1] - values[0]
        } else if i == n - 1 {
            values[n - 1] - values[n - 2]
        } else {
            (values[i + 1] - values[i - 1]) * 0.5
        }
    };

    let mut expanded = Vec::with_capacity(3 * (n - 1) + 1);
    for i in 0..n - 1 {
        expanded.push(values[i]);
        expanded.push(values[i] + smoothing * tangent(i) / 3.0);
        expanded.push(values[i + 1] - smoothing * tangent(i + 1) / 3.0);
    }
    expanded.push(values[n - 1]);
    expanded
}

/// Bezier control net of a carpet, `x[ia][jb]` and `y[ia][jb]`.
///
/// A smoothed axis has `3(n - 1) + 1` control rows along it; an unsmoothed
/// axis keeps its lattice rows as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSurface {
    pub(crate) x: Vec<Vec<f64>>,
    pub(crate) y: Vec<Vec<f64>>,
    na: usize,
    nb: usize,
    a_smoothing: f64,
    b_smoothing: f64,
}

impl ControlSurface {
    pub fn new(grid: &CarpetGrid, a_smoothing: f64, b_smoothing: f64) -> ChartResult<Self> {
        validate_smoothing(a_smoothing)?;
        validate_smoothing(b_smoothing)?;
        Ok(Self {
            x: expand_lattice(grid.x(), a_smoothing, b_smoothing),
            y: expand_lattice(grid.y(), a_smoothing, b_smoothing),
            na: grid.na(),
            nb: grid.nb(),
            a_smoothing,
            b_smoothing,
        })
    }

    #[must_use]
    pub fn na(&self) -> usize {
        self.na
    }

    #[must_use]
    pub fn nb(&self) -> usize {
        self.nb
    }

    /// Number of control rows along `a`.
    #[must_use]
    pub fn nea(&self) -> usize {
        self.x.len()
    }

    /// Number of control columns along `b`.
    #[must_use]
    pub fn neb(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn a_smoothed(&self) -> bool {
        self.a_smoothing > 0.0
    }

    #[must_use]
    pub fn b_smoothed(&self) -> bool {
        self.b_smoothing > 0.0
    }

    #[must_use]
    pub fn a_smoothing(&self) -> f64 {
        self.a_smoothing
    }

    #[must_use]
    pub fn b_smoothing(&self) -> f64 {
        self.b_smoothing
    }

    #[must_use]
    pub fn control_point(&self, ia: usize, jb: usize) -> (f64, f64) {
        (self.x[ia][jb], self.y[ia][jb])
    }

    /// Every control point, row by row.
    pub fn control_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .flat_map(|(xs, ys)| xs.iter().copied().zip(ys.iter().copied()))
    }
}

/// Expands along `a` first, then along `b` over the already expanded rows.
fn expand_lattice(lattice: &[Vec<f64>], a_smoothing: f64, b_smoothing: f64) -> Vec<Vec<f64>> {
    let nb = lattice.first().map_or(0, Vec::len);
    let columns: Vec<Vec<f64>> = (0..nb)
        .map(|j| {
            let column: Vec<f64> = lattice.iter().map(|row| row[j]).collect();
            expand_controls(&column, a_smoothing)
        })
        .collect();
    let nea = columns.first().map_or(0, Vec::len);

    (0..nea)
        .map(|ia| {
            let row: Vec<f64> = columns.iter().map(|column| column[ia]).collect();
            expand_controls(&row, b_smoothing)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ControlSurface, expand_controls, validate_smoothing};
    use crate::carpet::grid::CarpetGrid;
    use approx::assert_relative_eq;

    #[test]
    fn unsmoothed_values_pass_through() {
        assert_eq!(expand_controls(&[0.0, 1.0, 4.0], 0.0), vec![0.0, 1.0, 4.0]);
    }

    #[test]
    fn smoothed_values_keep_lattice_every_third_slot() {
        let values = [0.0, 1.0, 4.0, 9.0];
        let expanded = expand_controls(&values, 1.0);
        assert_eq!(expanded.len(), 10);
        for (i, value) in values.iter().enumerate() {
            assert_eq!(expanded[3 * i], *value);
        }
        // Interior tangent at index 1 is (4 - 0) / 2.
        assert_relative_eq!(expanded[4], 1.0 + 2.0 / 3.0);
        assert_relative_eq!(expanded[2], 1.0 - 2.0 / 3.0);
    }

    #[test]
    fn linear_data_gives_evenly_spaced_controls() {
        let expanded = expand_controls(&[0.0, 3.0, 6.0], 1.0);
        for (i, value) in expanded.iter().enumerate() {
            assert_relative_eq!(*value, i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn surface_dimensions_follow_smoothed_axes() {
        let grid = CarpetGrid::rectilinear(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]).expect("grid");
        let surface = ControlSurface::new(&grid, 1.0, 0.0).expect("surface");
        assert_eq!((surface.nea(), surface.neb()), (7, 2));
        assert!(surface.a_smoothed());
        assert!(!surface.b_smoothed());
        assert_eq!(surface.control_point(6, 1), (2.0, 1.0));

        let surface = ControlSurface::new(&grid, 1.0, 1.0).expect("surface");
        assert_eq!((surface.nea(), surface.neb()), (7, 4));
        assert_eq!(surface.control_points().count(), 28);
    }

    #[test]
    fn smoothing_outside_bounds_is_rejected() {
        assert!(validate_smoothing(-0.1).is_err());
        assert!(validate_smoothing(1.31).is_err());
        assert!(validate_smoothing(f64::NAN).is_err());
        assert!(validate_smoothing(1.3).is_ok());
    }
}
