use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::AxisId;

/// Largest zoom-in fraction one drag can reach.
const MAX_ZOOM_IN: f64 = 0.9;
/// Most negative normalized drag before zoom-out saturates.
const MAX_ZOOM_OUT_DRAG: f64 = -0.3;
/// Zoom-out curve shift; puts the saturated zoom-out factor just under 10.
const ZOOM_OUT_SHIFT: f64 = 3.222;

/// Zoom factor for a drag of `d` plot widths or heights.
///
/// Positive drags zoom in linearly down to `0.1`; negative drags zoom out
/// along a hyperbola that saturates just under `10`. The factor is `1` at rest and
/// non-increasing in `d`. Non-finite input leaves the range unchanged.
#[must_use]
pub fn zoom_factor(d: f64) -> f64 {
    if !d.is_finite() {
        return 1.0;
    }
    if d >= 0.0 {
        1.0 - d.min(MAX_ZOOM_IN)
    } else {
        1.0 - 1.0 / (1.0 / d.max(MAX_ZOOM_OUT_DRAG) + ZOOM_OUT_SHIFT)
    }
}

/// Axis-range drag handle. Edges move one end of one axis range; corners
/// combine one horizontal and one vertical edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NW,
    NE,
    SW,
    SE,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Low,
    High,
}

impl ResizeHandle {
    fn horizontal(self) -> Option<Edge> {
        match self {
            Self::W | Self::NW | Self::SW => Some(Edge::Low),
            Self::E | Self::NE | Self::SE => Some(Edge::High),
            Self::N | Self::S => None,
        }
    }

    fn vertical(self) -> Option<Edge> {
        match self {
            Self::S | Self::SW | Self::SE => Some(Edge::Low),
            Self::N | Self::NW | Self::NE => Some(Edge::High),
            Self::E | Self::W => None,
        }
    }

    /// Axes whose range this handle moves.
    #[must_use]
    pub fn axes(self) -> SmallVec<[AxisId; 2]> {
        let mut axes = SmallVec::new();
        if self.horizontal().is_some() {
            axes.push(AxisId::X);
        }
        if self.vertical().is_some() {
            axes.push(AxisId::Y);
        }
        axes
    }
}

/// Ranges after dragging `handle` by `(dx, dy)` pixels from the ranges held
/// at pointer down. Axes the handle does not touch come back as `None`.
#[must_use]
pub fn resize_ranges(
    handle: ResizeHandle,
    x_range0: (f64, f64),
    y_range0: (f64, f64),
    delta: (f64, f64),
    plot_size: (f64, f64),
) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
    let (dx, dy) = delta;
    let (pw, ph) = plot_size;

    let x = handle.horizontal().map(|edge| match edge {
        Edge::Low => move_low(x_range0, dx / pw),
        Edge::High => move_high(x_range0, -dx / pw),
    });
    // Pixel y grows downward, so dragging the top edge down is a positive `dy`.
    let y = handle.vertical().map(|edge| match edge {
        Edge::Low => move_low(y_range0, -dy / ph),
        Edge::High => move_high(y_range0, dy / ph),
    });
    (x, y)
}

fn move_low(range0: (f64, f64), d: f64) -> (f64, f64) {
    (range0.1 + (range0.0 - range0.1) / zoom_factor(d), range0.1)
}

fn move_high(range0: (f64, f64), d: f64) -> (f64, f64) {
    (range0.0, range0.0 + (range0.1 - range0.0) / zoom_factor(d))
}
