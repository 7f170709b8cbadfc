use serde::{Deserialize, Serialize};

use crate::carpet::control_points::ControlSurface;
use crate::carpet::grid::{CarpetAxisId, CarpetGrid};
use crate::carpet::gridlines::{CarpetGridline, calc_gridlines};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// How gridlines are placed along one carpet axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarpetTickMode {
    /// Literal parameter values on the lattice: `tickvals`, or every lattice
    /// value when absent.
    #[default]
    Array,
    /// `tick0 + n * dtick` across the parameter range.
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarpetAxis {
    #[serde(default)]
    pub tickmode: CarpetTickMode,
    #[serde(default)]
    pub tickvals: Option<Vec<f64>>,
    #[serde(default)]
    pub tick0: f64,
    /// Spacing in linear mode; `None` picks a nice step for the parameter span.
    #[serde(default)]
    pub dtick: Option<f64>,
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    #[serde(default)]
    pub gridcolor: Option<Color>,
    #[serde(default = "default_gridwidth")]
    pub gridwidth: f64,
}

impl Default for CarpetAxis {
    fn default() -> Self {
        Self {
            tickmode: CarpetTickMode::default(),
            tickvals: None,
            tick0: 0.0,
            dtick: None,
            smoothing: default_smoothing(),
            gridcolor: None,
            gridwidth: default_gridwidth(),
        }
    }
}

impl CarpetAxis {
    #[must_use]
    pub fn linear(tick0: f64, dtick: f64) -> Self {
        Self {
            tickmode: CarpetTickMode::Linear,
            tick0,
            dtick: Some(dtick),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    fn validate(&self, name: &str) -> ChartResult<()> {
        if !self.tick0.is_finite() {
            return Err(ChartError::InvalidGrid(format!(
                "{name}.tick0 must be finite, got {}",
                self.tick0
            )));
        }
        if self
            .tickvals
            .as_ref()
            .is_some_and(|values| values.iter().any(|value| !value.is_finite()))
        {
            return Err(ChartError::InvalidGrid(format!(
                "{name}.tickvals must be finite"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_tickvals(mut self, tickvals: Vec<f64>) -> Self {
        self.tickmode = CarpetTickMode::Array;
        self.tickvals = Some(tickvals);
        self
    }
}

fn default_smoothing() -> f64 {
    1.0
}

fn default_gridwidth() -> f64 {
    1.0
}

/// A carpet trace: lattice, per-axis tick settings and the derived Bezier
/// control net.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CarpetRepr")]
pub struct Carpet {
    grid: CarpetGrid,
    aaxis: CarpetAxis,
    baxis: CarpetAxis,
    surface: ControlSurface,
}

#[derive(Deserialize)]
struct CarpetRepr {
    #[serde(flatten)]
    grid: CarpetGrid,
    #[serde(default)]
    aaxis: CarpetAxis,
    #[serde(default)]
    baxis: CarpetAxis,
}

impl TryFrom<CarpetRepr> for Carpet {
    type Error = ChartError;

    fn try_from(repr: CarpetRepr) -> ChartResult<Self> {
        Self::new(repr.grid, repr.aaxis, repr.baxis)
    }
}

impl Carpet {
    pub fn new(grid: CarpetGrid, aaxis: CarpetAxis, baxis: CarpetAxis) -> ChartResult<Self> {
        aaxis.validate("aaxis")?;
        baxis.validate("baxis")?;
        let surface = ControlSurface::new(&grid, aaxis.smoothing, baxis.smoothing)?;
        Ok(Self {
            grid,
            aaxis,
            baxis,
            surface,
        })
    }

    #[must_use]
    pub fn grid(&self) -> &CarpetGrid {
        &self.grid
    }

    #[must_use]
    pub fn surface(&self) -> &ControlSurface {
        &self.surface
    }

    #[must_use]
    pub fn axis(&self, axis: CarpetAxisId) -> &CarpetAxis {
        match axis {
            CarpetAxisId::A => &self.aaxis,
            CarpetAxisId::B => &self.baxis,
        }
    }

    /// Gridlines of constant `axis` value.
    pub fn gridlines(
        &self,
        axis: CarpetAxisId,
        max_gridlines: usize,
    ) -> ChartResult<Vec<CarpetGridline>> {
        calc_gridlines(self, axis, max_gridlines)
    }

    /// Data-space extent of the control net; the rendered curves stay
    /// inside its hull.
    pub fn extent_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.surface.control_points()
    }
}

#[cfg(test)]
mod tests {
    use super::{Carpet, CarpetAxis, CarpetTickMode};
    use crate::carpet::grid::{CarpetAxisId, CarpetGrid};
    use crate::error::ChartError;

    #[test]
    fn carpet_deserializes_with_axis_defaults() {
        let json = r#"{
            "a": [1, 2, 3], "b": [0, 10],
            "x": [[0, 1], [1, 2], [2, 3]],
            "y": [[0, 5], [0, 5], [0, 5]],
            "baxis": {"tickmode": "linear", "dtick": 5, "smoothing": 0}
        }"#;
        let carpet: Carpet = serde_json::from_str(json).expect("carpet");
        assert_eq!(carpet.axis(CarpetAxisId::A).tickmode, CarpetTickMode::Array);
        assert_eq!(carpet.axis(CarpetAxisId::A).smoothing, 1.0);
        assert_eq!(carpet.axis(CarpetAxisId::B).dtick, Some(5.0));
        assert_eq!((carpet.surface().nea(), carpet.surface().neb()), (7, 2));
    }

    #[test]
    fn non_finite_tick0_is_rejected_at_construction() {
        let grid = CarpetGrid::rectilinear(vec![0.0, 1.0], vec![0.0, 1.0]).expect("grid");
        let err = Carpet::new(grid, CarpetAxis::linear(f64::NAN, 1.0), CarpetAxis::default())
            .expect_err("nan tick0");
        assert!(matches!(err, ChartError::InvalidGrid(_)));
    }

    #[test]
    fn invalid_smoothing_is_rejected_at_construction() {
        let json = r#"{
            "a": [0, 1], "b": [0, 1],
            "x": [[0, 0], [1, 1]], "y": [[0, 1], [0, 1]],
            "aaxis": {"smoothing": 2.0}
        }"#;
        assert!(serde_json::from_str::<Carpet>(json).is_err());
    }

    #[test]
    fn builder_helpers_set_modes() {
        let axis = CarpetAxis::linear(0.5, 2.0).with_smoothing(0.0);
        assert_eq!(axis.tickmode, CarpetTickMode::Linear);
        assert_eq!(axis.smoothing, 0.0);
        let axis = CarpetAxis::default().with_tickvals(vec![1.0]);
        assert_eq!(axis.tickvals, Some(vec![1.0]));
    }
}
