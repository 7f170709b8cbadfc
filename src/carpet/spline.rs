use smallvec::SmallVec;

use crate::carpet::control_points::ControlSurface;

type Weights = SmallVec<[f64; 4]>;

/// Basis weights over control slots `start..start + weights.len()`.
struct Basis {
    start: usize,
    weights: Weights,
}

fn basis(cell: usize, t: f64, smoothed: bool) -> Basis {
    if smoothed {
        let s = 1.0 - t;
        Basis {
            start: 3 * cell,
            weights: SmallVec::from_buf([s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t]),
        }
    } else {
        let mut weights = Weights::new();
        weights.extend([1.0 - t, t]);
        Basis {
            start: cell,
            weights,
        }
    }
}

fn basis_derivative(cell: usize, t: f64, smoothed: bool) -> Basis {
    if smoothed {
        let s = 1.0 - t;
        Basis {
            start: 3 * cell,
            weights: SmallVec::from_buf([
                -3.0 * s * s,
                3.0 * s * s - 6.0 * s * t,
                6.0 * s * t - 3.0 * t * t,
                3.0 * t * t,
            ]),
        }
    } else {
        let mut weights = Weights::new();
        weights.extend([-1.0, 1.0]);
        Basis {
            start: cell,
            weights,
        }
    }
}

impl ControlSurface {
    fn assert_cell(&self, i0: usize, j0: usize) {
        assert!(
            i0 + 2 <= self.na(),
            "carpet cell index i0={i0} outside [0, {}]",
            self.na().saturating_sub(2)
        );
        assert!(
            j0 + 2 <= self.nb(),
            "carpet cell index j0={j0} outside [0, {}]",
            self.nb().saturating_sub(2)
        );
    }

    fn combine(&self, a: &Basis, b: &Basis) -> [f64; 2] {
        let mut xy = [0.0, 0.0];
        for (di, wa) in a.weights.iter().enumerate() {
            let ia = a.start + di;
            for (dj, wb) in b.weights.iter().enumerate() {
                let jb = b.start + dj;
                let w = wa * wb;
                xy[0] += w * self.x[ia][jb];
                xy[1] += w * self.y[ia][jb];
            }
        }
        xy
    }

    /// Data-space point inside lattice cell `(i0, j0)` at local parameters
    /// `ti`, `tj` in `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `i0 > na - 2` or `j0 > nb - 2`. Callers clamp first.
    #[must_use]
    pub fn eval_xy(&self, i0: usize, j0: usize, ti: f64, tj: f64) -> [f64; 2] {
        self.assert_cell(i0, j0);
        self.combine(
            &basis(i0, ti, self.a_smoothed()),
            &basis(j0, tj, self.b_smoothed()),
        )
    }

    /// Partial derivative along the lattice index `i`.
    ///
    /// # Panics
    ///
    /// Same cell bounds as [`ControlSurface::eval_xy`].
    #[must_use]
    pub fn dxy_di(&self, i0: usize, j0: usize, ti: f64, tj: f64) -> [f64; 2] {
        self.assert_cell(i0, j0);
        self.combine(
            &basis_derivative(i0, ti, self.a_smoothed()),
            &basis(j0, tj, self.b_smoothed()),
        )
    }

    /// Partial derivative along the lattice index `j`.
    ///
    /// # Panics
    ///
    /// Same cell bounds as [`ControlSurface::eval_xy`].
    #[must_use]
    pub fn dxy_dj(&self, i0: usize, j0: usize, ti: f64, tj: f64) -> [f64; 2] {
        self.assert_cell(i0, j0);
        self.combine(
            &basis(i0, ti, self.a_smoothed()),
            &basis_derivative(j0, tj, self.b_smoothed()),
        )
    }
}
