use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::aggregate::numeric;
use crate::core::axis::Axis;
use crate::core::types::{PixelRect, ViewportOffset};
use crate::render::Color;

/// Palette cycled by series index when a series carries no color.
pub const DEFAULT_SERIES_COLORS: [&str; 4] = ["#00e", "#a00", "#0c0", "#000"];

/// Series length from which projection fans out over rayon.
#[cfg(feature = "parallel-projection")]
const PARALLEL_PROJECTION_MIN_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_line_width")]
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: None,
            width: default_line_width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default)]
    pub color: Option<Color>,
    /// Per-point fill overrides; `None` entries use `color`.
    #[serde(default)]
    pub colors: Option<Vec<Option<Color>>>,
    #[serde(default = "default_marker_radius")]
    pub radius: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: None,
            colors: None,
            radius: default_marker_radius(),
        }
    }
}

fn default_line_width() -> f64 {
    1.0
}

fn default_marker_radius() -> f64 {
    3.0
}

/// One scatter series as supplied by the data provider.
///
/// Each coordinate comes either from an explicit sample array or from a
/// `start + index * step` generator sized by the other coordinate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, deserialize_with = "deserialize_samples")]
    pub x: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub x0: Option<f64>,
    #[serde(default)]
    pub dx: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_samples")]
    pub y: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub y0: Option<f64>,
    #[serde(default)]
    pub dy: Option<f64>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub line: LineStyle,
    #[serde(default)]
    pub marker: MarkerStyle,
}

impl Series {
    #[must_use]
    pub fn from_xy(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x: Some(x.into_iter().map(Some).collect()),
            y: Some(y.into_iter().map(Some).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_samples(x: Vec<Option<f64>>, y: Vec<Option<f64>>) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Series with explicit `y` and `x = x0 + index * dx`.
    #[must_use]
    pub fn from_y(y: Vec<f64>, x0: f64, dx: f64) -> Self {
        Self {
            y: Some(y.into_iter().map(Some).collect()),
            x0: Some(x0),
            dx: Some(dx),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Materializes both coordinate arrays. Returns `None` for a series with
    /// neither `x` nor `y` samples.
    #[must_use]
    pub fn resolve(&self) -> Option<ResolvedSeries<'_>> {
        let (x, y) = match (&self.x, &self.y) {
            (None, None) => return None,
            (Some(x), Some(y)) => (Cow::Borrowed(x.as_slice()), Cow::Borrowed(y.as_slice())),
            (Some(x), None) => (
                Cow::Borrowed(x.as_slice()),
                Cow::Owned(generate(self.y0, self.dy, x.len())),
            ),
            (None, Some(y)) => (
                Cow::Owned(generate(self.x0, self.dx, y.len())),
                Cow::Borrowed(y.as_slice()),
            ),
        };
        let len = x.len().min(y.len());
        Some(ResolvedSeries { x, y, len })
    }

    fn fallback_color(&self, index: usize) -> Color {
        if let Some(color) = self.color {
            return color;
        }
        let hex = DEFAULT_SERIES_COLORS[index % DEFAULT_SERIES_COLORS.len()];
        Color::from_hex(hex).unwrap_or(Color::BLACK)
    }

    #[must_use]
    pub fn line_color(&self, index: usize) -> Color {
        self.line.color.unwrap_or_else(|| self.fallback_color(index))
    }

    #[must_use]
    pub fn marker_color(&self, index: usize, point: usize) -> Color {
        self.marker
            .colors
            .as_ref()
            .and_then(|colors| colors.get(point).copied().flatten())
            .or(self.marker.color)
            .unwrap_or_else(|| self.fallback_color(index))
    }
}

fn generate(start: Option<f64>, step: Option<f64>, len: usize) -> Vec<Option<f64>> {
    let start = start.unwrap_or(0.0);
    let step = step.unwrap_or(1.0);
    (0..len).map(|i| Some(start + i as f64 * step)).collect()
}

/// Accepts numbers and numeric strings; any other JSON value becomes a
/// non-numeric sample.
fn deserialize_samples<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(|values| values.iter().map(sample_from_json).collect()))
}

fn sample_from_json(value: &serde_json::Value) -> Option<f64> {
    let sample = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    numeric(sample)
}

/// Both coordinate arrays of a series, truncated to their common length.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries<'a> {
    pub x: Cow<'a, [Option<f64>]>,
    pub y: Cow<'a, [Option<f64>]>,
    pub len: usize,
}

impl ResolvedSeries<'_> {
    #[must_use]
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        if index >= self.len {
            return None;
        }
        Some((numeric(self.x[index])?, numeric(self.y[index])?))
    }
}

/// Projected series geometry in canvas pixels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesGeometry {
    /// Runs of consecutive numeric points; each run is drawn as one polyline.
    pub runs: Vec<Vec<(f64, f64)>>,
    /// Numeric points with their sample index.
    pub points: Vec<(usize, f64, f64)>,
}

/// Projects a resolved series through both axes.
///
/// A non-numeric sample, or one whose pixel position overflows, breaks only
/// the segments touching it; runs shorter than two points contribute markers
/// but no line.
#[must_use]
pub fn project_series(
    series: &ResolvedSeries<'_>,
    x_axis: &Axis,
    y_axis: &Axis,
    offset: ViewportOffset,
    plot: PixelRect,
) -> SeriesGeometry {
    let project = |index: usize| {
        series
            .point(index)
            .map(|(x, y)| {
                (
                    plot.x + x_axis.to_paper(x, offset.x),
                    plot.y + y_axis.to_paper(y, offset.y),
                )
            })
            .filter(|(px, py)| px.is_finite() && py.is_finite())
    };

    #[cfg(feature = "parallel-projection")]
    let projected: Vec<Option<(f64, f64)>> = if series.len >= PARALLEL_PROJECTION_MIN_LEN {
        use rayon::prelude::*;
        (0..series.len).into_par_iter().map(project).collect()
    } else {
        (0..series.len).map(project).collect()
    };
    #[cfg(not(feature = "parallel-projection"))]
    let projected: Vec<Option<(f64, f64)>> = (0..series.len).map(project).collect();

    let mut geometry = SeriesGeometry::default();
    let mut run: Vec<(f64, f64)> = Vec::new();
    for (index, point) in projected.into_iter().enumerate() {
        match point {
            Some((x, y)) => {
                geometry.points.push((index, x, y));
                run.push((x, y));
            }
            None => flush_run(&mut geometry.runs, &mut run),
        }
    }
    flush_run(&mut geometry.runs, &mut run);
    geometry
}

fn flush_run(runs: &mut Vec<Vec<(f64, f64)>>, run: &mut Vec<(f64, f64)>) {
    if run.len() >= 2 {
        runs.push(std::mem::take(run));
    } else {
        run.clear();
    }
}
