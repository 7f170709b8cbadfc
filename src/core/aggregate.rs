use serde::{Deserialize, Serialize};

/// Fraction of the data span added on each side of an autoranged axis.
pub const AUTORANGE_PADDING: f64 = 0.05;

/// Pairwise fold applied by [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Max,
}

impl Aggregate {
    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Min => left.min(right),
            Self::Max => left.max(right),
        }
    }
}

/// A sample counts as numeric when it is present and finite.
#[must_use]
pub fn numeric(sample: Option<f64>) -> Option<f64> {
    sample.filter(|value| value.is_finite())
}

/// Folds `current` with the first `len` samples of `values`.
///
/// Non-numeric samples are skipped. Returns `None` when neither `current` nor
/// any visited sample was numeric.
#[must_use]
pub fn aggregate(
    op: Aggregate,
    current: Option<f64>,
    values: &[Option<f64>],
    len: usize,
) -> Option<f64> {
    values
        .iter()
        .take(len)
        .filter_map(|sample| numeric(*sample))
        .fold(numeric(current), |acc, value| match acc {
            Some(acc) => Some(op.apply(acc, value)),
            None => Some(value),
        })
}

/// Running numeric min/max of one axis across every series of a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataExtent {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DataExtent {
    pub fn include(&mut self, values: &[Option<f64>], len: usize) {
        self.min = aggregate(Aggregate::Min, self.min, values, len);
        self.max = aggregate(Aggregate::Max, self.max, values, len);
    }

    pub fn include_values(&mut self, values: &[f64]) {
        for value in values.iter().copied().filter(|value| value.is_finite()) {
            self.min = Some(self.min.map_or(value, |min| min.min(value)));
            self.max = Some(self.max.map_or(value, |max| max.max(value)));
        }
    }

    #[must_use]
    pub fn bounds(self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }

    /// Autorange for this extent: the data span padded by 5% on both sides.
    #[must_use]
    pub fn padded_range(self) -> Option<(f64, f64)> {
        let (min, max) = self.bounds()?;
        Some(padded_range(min, max))
    }
}

#[must_use]
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    (
        (1.0 + AUTORANGE_PADDING) * min - AUTORANGE_PADDING * max,
        (1.0 + AUTORANGE_PADDING) * max - AUTORANGE_PADDING * min,
    )
}
