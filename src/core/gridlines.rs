use serde::{Deserialize, Serialize};

use crate::core::axis::Axis;
use crate::core::ticks::{TickSet, format_tick_label};
use crate::core::types::{AxisId, PixelRect, ViewportOffset};

/// Canvas placement shared by every linear axis decoration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisGeometry {
    /// Plot box in canvas pixels.
    pub plot: PixelRect,
    /// Gap between the plot box and the tick baselines.
    pub pad: f64,
    /// Distance gridlines extend past the plot box on each side.
    pub overscan_x: f64,
    pub overscan_y: f64,
}

/// One gridline segment in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSegment {
    pub axis: AxisId,
    pub value: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Tick stub anchored at the axis baseline plus its label anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    pub axis: AxisId,
    pub value: f64,
    pub label: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub label_x: f64,
    pub label_y: f64,
}

/// Full-span gridlines, oversized past the plot box so a pan never uncovers
/// an edge.
#[must_use]
pub fn build_gridlines(
    axis: &Axis,
    ticks: &TickSet,
    offset: ViewportOffset,
    geometry: AxisGeometry,
) -> Vec<GridSegment> {
    let plot = geometry.plot;
    ticks
        .values
        .iter()
        .map(|&value| match axis.id() {
            AxisId::X => {
                let x = plot.x + axis.to_paper(value, offset.x);
                GridSegment {
                    axis: AxisId::X,
                    value,
                    x1: x,
                    y1: plot.y + offset.y - geometry.overscan_y,
                    x2: x,
                    y2: plot.bottom() + offset.y + geometry.overscan_y,
                }
            }
            AxisId::Y => {
                let y = plot.y + axis.to_paper(value, offset.y);
                GridSegment {
                    axis: AxisId::Y,
                    value,
                    x1: plot.x + offset.x - geometry.overscan_x,
                    y1: y,
                    x2: plot.right() + offset.x + geometry.overscan_x,
                    y2: y,
                }
            }
        })
        .collect()
}

/// Short perpendicular tick stubs of `axis.ticklen` pixels outside the plot box.
#[must_use]
pub fn build_tick_marks(
    axis: &Axis,
    ticks: &TickSet,
    offset: ViewportOffset,
    geometry: AxisGeometry,
) -> Vec<TickMark> {
    let plot = geometry.plot;
    let ticklen = axis.ticklen.max(0.0);
    ticks
        .values
        .iter()
        .map(|&value| {
            let label = format_tick_label(value, ticks.round_factor);
            match axis.id() {
                AxisId::X => {
                    let x = plot.x + axis.to_paper(value, offset.x);
                    let baseline = plot.bottom() + geometry.pad;
                    TickMark {
                        axis: AxisId::X,
                        value,
                        label,
                        x1: x,
                        y1: baseline,
                        x2: x,
                        y2: baseline + ticklen,
                        label_x: x,
                        label_y: baseline + ticklen,
                    }
                }
                AxisId::Y => {
                    let y = plot.y + axis.to_paper(value, offset.y);
                    let baseline = plot.x - geometry.pad;
                    TickMark {
                        axis: AxisId::Y,
                        value,
                        label,
                        x1: baseline,
                        y1: y,
                        x2: baseline - ticklen,
                        y2: y,
                        label_x: baseline - ticklen,
                        label_y: y,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{AxisGeometry, build_gridlines, build_tick_marks};
    use crate::core::axis::Axis;
    use crate::core::ticks::TickSet;
    use crate::core::types::{AxisId, PixelRect, ViewportOffset};

    fn geometry() -> AxisGeometry {
        AxisGeometry {
            plot: PixelRect::new(50.0, 30.0, 540.0, 330.0),
            pad: 2.0,
            overscan_x: 600.0,
            overscan_y: 400.0,
        }
    }

    #[test]
    fn x_gridlines_span_beyond_plot_box() {
        let axis = Axis::new(AxisId::X, (0.0, 10.0), 540.0).expect("axis");
        let ticks = TickSet::enumerate((0.0, 10.0), 0.0, 5.0, 10.0, 100);
        let lines = build_gridlines(&axis, &ticks, ViewportOffset::ZERO, geometry());

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].x1, 50.0 + 270.0);
        assert_eq!(lines[1].y1, 30.0 - 400.0);
        assert_eq!(lines[1].y2, 360.0 + 400.0);
    }

    #[test]
    fn y_gridlines_follow_offset() {
        let axis = Axis::new(AxisId::Y, (0.0, 10.0), 330.0).expect("axis");
        let ticks = TickSet::enumerate((0.0, 10.0), 0.0, 10.0, 10.0, 100);
        let offset = ViewportOffset::new(7.0, 11.0);
        let lines = build_gridlines(&axis, &ticks, offset, geometry());

        assert_eq!(lines[0].y1, 30.0 + 330.0 + 11.0);
        assert_eq!(lines[0].x1, 50.0 + 7.0 - 600.0);
    }

    #[test]
    fn tick_marks_share_gridline_positions() {
        let axis = Axis::new(AxisId::X, (0.0, 10.0), 540.0).expect("axis");
        let ticks = TickSet::enumerate((0.0, 10.0), 0.0, 2.0, 100.0, 100);
        let offset = ViewportOffset::ZERO;
        let lines = build_gridlines(&axis, &ticks, offset, geometry());
        let marks = build_tick_marks(&axis, &ticks, offset, geometry());

        assert_eq!(lines.len(), marks.len());
        for (line, mark) in lines.iter().zip(&marks) {
            assert_eq!(line.x1, mark.x1);
            assert_eq!(mark.y2 - mark.y1, axis.ticklen);
        }
        assert_eq!(marks[1].label, "2");
    }
}
