use serde::{Deserialize, Serialize};

use crate::core::types::AxisId;
use crate::error::{ChartError, ChartResult};

/// Smallest absolute span an axis range may collapse to.
pub const MIN_RANGE_SPAN: f64 = 1e-9;
/// Smallest span relative to the range magnitude, so large centers keep a
/// representable width.
pub const MIN_RELATIVE_RANGE_SPAN: f64 = 1e-9;

/// Affine data-to-paper map `pixel = m * value + b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTransform {
    pub m: f64,
    pub b: f64,
}

impl AxisTransform {
    #[must_use]
    pub fn to_paper(self, value: f64) -> f64 {
        self.m * value + self.b
    }

    #[must_use]
    pub fn to_data(self, pixel: f64) -> f64 {
        (pixel - self.b) / self.m
    }
}

/// One rectilinear axis: its range, tick policy and the derived transform.
///
/// The [`AxisTransform`] is held by value and only handed out as a copy. It
/// is rebuilt whenever the range or the pixel extent changes, so a stale
/// transform is never observable.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    id: AxisId,
    range: (f64, f64),
    extent_px: f64,
    transform: AxisTransform,
    pub tick0: f64,
    pub dtick: f64,
    pub autorange: bool,
    pub autotick: bool,
    pub ticklen: f64,
}

impl Axis {
    pub fn new(id: AxisId, range: (f64, f64), extent_px: f64) -> ChartResult<Self> {
        validate_extent(extent_px)?;
        let range = sanitize_range(range)?;
        Ok(Self {
            id,
            range,
            extent_px,
            transform: derive_transform(id, range, extent_px),
            tick0: 0.0,
            dtick: 1.0,
            autorange: true,
            autotick: true,
            ticklen: 5.0,
        })
    }

    #[must_use]
    pub fn id(&self) -> AxisId {
        self.id
    }

    /// Range the transform was derived from. Excludes any live pan offset.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn extent_px(&self) -> f64 {
        self.extent_px
    }

    #[must_use]
    pub fn transform(&self) -> AxisTransform {
        self.transform
    }

    pub fn set_range(&mut self, range: (f64, f64)) -> ChartResult<()> {
        self.range = sanitize_range(range)?;
        self.transform = derive_transform(self.id, self.range, self.extent_px);
        Ok(())
    }

    pub fn set_extent_px(&mut self, extent_px: f64) -> ChartResult<()> {
        validate_extent(extent_px)?;
        self.extent_px = extent_px;
        self.transform = derive_transform(self.id, self.range, self.extent_px);
        Ok(())
    }

    /// Range actually on screen when `offset_px` is applied after the affine map.
    #[must_use]
    pub fn visible_range(&self, offset_px: f64) -> (f64, f64) {
        let shift = offset_px / self.transform.m;
        (self.range.0 - shift, self.range.1 - shift)
    }

    /// Data value to paper pixel, offset included.
    #[must_use]
    pub fn to_paper(&self, value: f64, offset_px: f64) -> f64 {
        self.transform.to_paper(value) + offset_px
    }

    #[must_use]
    pub fn to_data(&self, paper_px: f64, offset_px: f64) -> f64 {
        self.transform.to_data(paper_px - offset_px)
    }
}

fn validate_extent(extent_px: f64) -> ChartResult<()> {
    if !extent_px.is_finite() || extent_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "axis pixel extent must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

/// Rejects non-finite bounds and widens collapsed ranges around their center,
/// keeping the original orientation.
fn sanitize_range((start, end): (f64, f64)) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "axis range must be finite".to_owned(),
        ));
    }

    let center = (start + end) / 2.0;
    let min_span = MIN_RANGE_SPAN.max(center.abs() * MIN_RELATIVE_RANGE_SPAN);
    if (end - start).abs() >= min_span {
        return Ok((start, end));
    }

    let half = min_span / 2.0;
    if end < start {
        Ok((center + half, center - half))
    } else {
        Ok((center - half, center + half))
    }
}

fn derive_transform(id: AxisId, range: (f64, f64), extent_px: f64) -> AxisTransform {
    match id {
        AxisId::X => {
            let m = extent_px / (range.1 - range.0);
            AxisTransform {
                m,
                b: -m * range.0,
            }
        }
        // Pixel rows grow downward, so the top edge maps from `range.1`.
        AxisId::Y => {
            let m = extent_px / (range.0 - range.1);
            AxisTransform {
                m,
                b: -m * range.1,
            }
        }
    }
}
