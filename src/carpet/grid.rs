use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Parametric axis of a carpet surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarpetAxisId {
    A,
    B,
}

impl CarpetAxisId {
    #[must_use]
    pub fn cross(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Carpet lattice: parameter values `a` (length `na`) and `b` (length `nb`)
/// with data-space coordinates `x[i][j]`, `y[i][j]` for every `(a[i], b[j])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CarpetGridRepr")]
pub struct CarpetGrid {
    a: Vec<f64>,
    b: Vec<f64>,
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct CarpetGridRepr {
    a: Vec<f64>,
    b: Vec<f64>,
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
}

impl TryFrom<CarpetGridRepr> for CarpetGrid {
    type Error = ChartError;

    fn try_from(repr: CarpetGridRepr) -> ChartResult<Self> {
        Self::new(repr.a, repr.b, repr.x, repr.y)
    }
}

impl CarpetGrid {
    pub fn new(a: Vec<f64>, b: Vec<f64>, x: Vec<Vec<f64>>, y: Vec<Vec<f64>>) -> ChartResult<Self> {
        validate_parameters("a", &a)?;
        validate_parameters("b", &b)?;
        validate_lattice("x", &x, a.len(), b.len())?;
        validate_lattice("y", &y, a.len(), b.len())?;
        Ok(Self { a, b, x, y })
    }

    /// Lattice whose coordinates are the parameters themselves, `x = a`, `y = b`.
    pub fn rectilinear(a: Vec<f64>, b: Vec<f64>) -> ChartResult<Self> {
        let x = a.iter().map(|&av| vec![av; b.len()]).collect();
        let y = a.iter().map(|_| b.clone()).collect();
        Self::new(a, b, x, y)
    }

    #[must_use]
    pub fn na(&self) -> usize {
        self.a.len()
    }

    #[must_use]
    pub fn nb(&self) -> usize {
        self.b.len()
    }

    #[must_use]
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    #[must_use]
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    #[must_use]
    pub fn x(&self) -> &[Vec<f64>] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[Vec<f64>] {
        &self.y
    }

    #[must_use]
    pub fn parameters(&self, axis: CarpetAxisId) -> &[f64] {
        match axis {
            CarpetAxisId::A => &self.a,
            CarpetAxisId::B => &self.b,
        }
    }

    /// Fractional lattice index `i` for parameter value `a`.
    #[must_use]
    pub fn a_to_index(&self, value: f64) -> f64 {
        fractional_index(&self.a, value)
    }

    /// Fractional lattice index `j` for parameter value `b`.
    #[must_use]
    pub fn b_to_index(&self, value: f64) -> f64 {
        fractional_index(&self.b, value)
    }

    #[must_use]
    pub fn to_index(&self, axis: CarpetAxisId, value: f64) -> f64 {
        fractional_index(self.parameters(axis), value)
    }
}

/// Piecewise-linear inverse of a strictly monotonic parameter array.
/// Values outside the array extrapolate from the nearest end segment.
fn fractional_index(values: &[f64], value: f64) -> f64 {
    let last_segment = values.len() - 2;
    let ascending = values[1] > values[0];
    let upper = if ascending {
        values.partition_point(|&v| v <= value)
    } else {
        values.partition_point(|&v| v >= value)
    };
    let k = upper.saturating_sub(1).min(last_segment);
    let (v0, v1) = (values[k], values[k + 1]);
    k as f64 + (value - v0) / (v1 - v0)
}

fn validate_parameters(name: &str, values: &[f64]) -> ChartResult<()> {
    if values.len() < 2 {
        return Err(ChartError::InvalidGrid(format!(
            "`{name}` needs at least 2 values, got {}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ChartError::InvalidGrid(format!(
            "`{name}` values must be finite"
        )));
    }
    let ascending = values.windows(2).all(|pair| pair[1] > pair[0]);
    let descending = values.windows(2).all(|pair| pair[1] < pair[0]);
    if !ascending && !descending {
        return Err(ChartError::InvalidGrid(format!(
            "`{name}` values must be strictly monotonic"
        )));
    }
    Ok(())
}

fn validate_lattice(name: &str, lattice: &[Vec<f64>], na: usize, nb: usize) -> ChartResult<()> {
    if lattice.len() != na || lattice.iter().any(|row| row.len() != nb) {
        return Err(ChartError::InvalidGrid(format!(
            "`{name}` must be a {na}x{nb} lattice"
        )));
    }
    if lattice.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ChartError::InvalidGrid(format!(
            "`{name}` coordinates must be finite"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CarpetGrid, fractional_index};
    use crate::error::ChartError;

    #[test]
    fn fractional_index_interpolates_and_extrapolates() {
        let values = [0.0, 1.0, 3.0];
        assert_eq!(fractional_index(&values, 0.5), 0.5);
        assert_eq!(fractional_index(&values, 2.0), 1.5);
        assert_eq!(fractional_index(&values, 3.0), 2.0);
        assert_eq!(fractional_index(&values, -1.0), -1.0);
        assert_eq!(fractional_index(&values, 5.0), 3.0);
    }

    #[test]
    fn fractional_index_handles_descending_parameters() {
        let values = [10.0, 5.0, 0.0];
        assert_eq!(fractional_index(&values, 10.0), 0.0);
        assert_eq!(fractional_index(&values, 2.5), 1.5);
        assert_eq!(fractional_index(&values, 0.0), 2.0);
    }

    #[test]
    fn grid_rejects_short_or_non_monotonic_parameters() {
        let err = CarpetGrid::rectilinear(vec![1.0], vec![0.0, 1.0]).expect_err("short");
        assert!(matches!(err, ChartError::InvalidGrid(_)));

        let err = CarpetGrid::rectilinear(vec![0.0, 2.0, 1.0], vec![0.0, 1.0])
            .expect_err("non monotonic");
        assert!(format!("{err}").contains("monotonic"));
    }

    #[test]
    fn grid_rejects_mismatched_lattice() {
        let err = CarpetGrid::new(
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![vec![0.0, 0.0]],
            vec![vec![0.0, 1.0], vec![0.0, 1.0]],
        )
        .expect_err("mismatch");
        assert!(format!("{err}").contains("2x2"));
    }

    #[test]
    fn grid_deserializes_through_validation() {
        let json = r#"{"a":[0,1],"b":[0,1],"x":[[0,0],[1,1]],"y":[[0,1],[0,1]]}"#;
        let grid: CarpetGrid = serde_json::from_str(json).expect("grid");
        assert_eq!(grid.na(), 2);

        let bad = r#"{"a":[0],"b":[0,1],"x":[[0,0]],"y":[[0,1]]}"#;
        assert!(serde_json::from_str::<CarpetGrid>(bad).is_err());
    }
}
