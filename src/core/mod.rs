pub mod aggregate;
pub mod axis;
pub mod gridlines;
pub mod series;
pub mod ticks;
pub mod types;

pub use aggregate::{Aggregate, DataExtent, aggregate, padded_range};
pub use axis::{Axis, AxisTransform};
pub use gridlines::{AxisGeometry, GridSegment, TickMark, build_gridlines, build_tick_marks};
pub use series::{ResolvedSeries, Series, SeriesGeometry, project_series};
pub use ticks::{NiceStep, TickSet, compute_ticks, format_tick_label, label_round_factor};
pub use types::{AxisId, PixelRect, Viewport, ViewportOffset};
