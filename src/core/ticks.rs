use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::axis::Axis;

/// Number of intervals auto ticking aims for across the visible range.
pub const TARGET_TICK_COUNT: f64 = 10.0;
/// Significant digits kept in labels past the leading digit of `dtick`.
const LABEL_EXTRA_DIGITS: i32 = 2;

/// Tick spacing expressed as `mantissa * magnitude`, with `mantissa` one of
/// 2, 5 or 10 and `magnitude` a power of ten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NiceStep {
    pub mantissa: u8,
    pub magnitude: f64,
}

impl NiceStep {
    /// Rounds `span / TARGET_TICK_COUNT` up to the next 2, 5 or 10 multiple of
    /// its power of ten. Returns `None` for empty or non-finite spans.
    #[must_use]
    pub fn for_span(span: f64) -> Option<Self> {
        let span = span.abs();
        if !span.is_finite() || span == 0.0 {
            return None;
        }

        let raw = span / TARGET_TICK_COUNT;
        let magnitude = 10f64.powi(raw.log10().floor() as i32);
        let raw_mantissa = raw / magnitude;
        let mantissa = if raw_mantissa > 5.0 {
            10
        } else if raw_mantissa > 2.0 {
            5
        } else {
            2
        };
        Some(Self {
            mantissa,
            magnitude,
        })
    }

    #[must_use]
    pub fn dtick(self) -> f64 {
        f64::from(self.mantissa) * self.magnitude
    }
}

/// Power-of-ten multiplier used to round labels: two digits past the order
/// of magnitude of `dtick`.
#[must_use]
pub fn label_round_factor(dtick: f64) -> f64 {
    10f64.powi(LABEL_EXTRA_DIGITS - dtick.log10().round() as i32)
}

#[must_use]
pub fn round_label_value(value: f64, factor: f64) -> f64 {
    (value * factor).round() / factor
}

#[must_use]
pub fn format_tick_label(value: f64, factor: f64) -> String {
    let rounded = round_label_value(value, factor);
    if rounded == 0.0 {
        // Collapses `-0` as well.
        return "0".to_owned();
    }
    format!("{rounded}")
}

/// Applies the tick policy of `axis` over `visible_range` and returns the
/// label rounding factor.
///
/// With `autotick` the axis gets `tick0 = 0` and a nice `dtick`. A manual
/// `dtick` that is not finite and positive falls back to the nice step.
pub fn compute_ticks(axis: &mut Axis, visible_range: (f64, f64)) -> f64 {
    let span = visible_range.1 - visible_range.0;
    let manual_valid = axis.dtick.is_finite() && axis.dtick > 0.0;

    if axis.autotick || !manual_valid {
        if !axis.autotick {
            warn!(axis = ?axis.id(), dtick = axis.dtick, "invalid manual dtick, using auto step");
        }
        if let Some(step) = NiceStep::for_span(span) {
            axis.tick0 = 0.0;
            axis.dtick = step.dtick();
        }
    }

    if !axis.tick0.is_finite() {
        axis.tick0 = 0.0;
    }
    label_round_factor(axis.dtick)
}

/// Ticks of one axis for one redraw. Tick marks, labels and gridlines are all
/// derived from `values`, so they always enumerate the same sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSet {
    pub tick0: f64,
    pub dtick: f64,
    pub round_factor: f64,
    pub values: Vec<f64>,
    pub truncated: bool,
}

impl TickSet {
    /// Enumerates `tick0 + k * dtick` from the first value at or above the
    /// lower range bound up to the upper bound, capped at `max_ticks`.
    #[must_use]
    pub fn enumerate(
        range: (f64, f64),
        tick0: f64,
        dtick: f64,
        round_factor: f64,
        max_ticks: usize,
    ) -> Self {
        let (lo, hi) = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };

        let mut values = Vec::new();
        let mut truncated = false;
        if dtick.is_finite() && dtick > 0.0 && lo.is_finite() && hi.is_finite() {
            let first = ((lo - tick0) / dtick).ceil();
            let mut k = 0.0;
            loop {
                let value = tick0 + (first + k) * dtick;
                if value > hi {
                    break;
                }
                if values.len() == max_ticks {
                    truncated = true;
                    break;
                }
                values.push(value);
                k += 1.0;
            }
        }

        if truncated {
            warn!(dtick, max_ticks, "tick enumeration truncated");
        }

        Self {
            tick0,
            dtick,
            round_factor,
            values,
            truncated,
        }
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|value| format_tick_label(*value, self.round_factor))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
