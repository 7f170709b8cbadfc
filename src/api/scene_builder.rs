use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::carpet::{Carpet, CarpetAxisId, CarpetGridline};
use crate::core::{
    Axis, AxisGeometry, AxisId, GridSegment, PixelRect, Series, SeriesGeometry, TickMark, TickSet,
    ViewportOffset, build_gridlines, build_tick_marks, compute_ticks, project_series,
};
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, Color, PathCommand, PathPrimitive, RenderFrame, TextHAlign, TextPrimitive,
    TextVAlign,
};

use super::ChartEngineConfig;

const TICK_LABEL_FONT_PX: f64 = 12.0;
const AXIS_TITLE_FONT_PX: f64 = 14.0;
const CHART_TITLE_FONT_PX: f64 = 16.0;
/// Gap between the x title and the canvas bottom.
const AXIS_TITLE_INSET_PX: f64 = 10.0;
/// Distance of the rotated y title from the canvas left edge.
const Y_TITLE_INSET_PX: f64 = 20.0;
const GRID_LINE_WIDTH: f64 = 1.0;
const CARPET_GRID_COLOR: Color = Color::rgb(0.6, 0.6, 0.6);

/// Everything drawn for one rectilinear axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScene {
    pub axis: AxisId,
    pub visible_range: (f64, f64),
    pub ticks: TickSet,
    pub gridlines: Vec<GridSegment>,
    pub tick_marks: Vec<TickMark>,
}

impl AxisScene {
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.tick_marks
            .iter()
            .map(|mark| mark.label.clone())
            .collect()
    }
}

/// Gridlines of one carpet in data space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarpetScene {
    pub name: String,
    pub a_gridlines: Vec<CarpetGridline>,
    pub b_gridlines: Vec<CarpetGridline>,
}

/// Geometry of one redraw plus the frame replayed to the render target.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotScene {
    pub revision: u64,
    pub plot: PixelRect,
    pub offset: ViewportOffset,
    pub x: AxisScene,
    pub y: AxisScene,
    pub series: Vec<(String, SeriesGeometry)>,
    pub carpets: Vec<CarpetScene>,
    pub frame: RenderFrame,
}

impl PlotScene {
    #[must_use]
    pub fn axis(&self, axis: AxisId) -> &AxisScene {
        match axis {
            AxisId::X => &self.x,
            AxisId::Y => &self.y,
        }
    }
}

pub(super) struct SceneInput<'a> {
    pub(super) config: &'a ChartEngineConfig,
    pub(super) x_axis: &'a mut Axis,
    pub(super) y_axis: &'a mut Axis,
    pub(super) series: &'a IndexMap<String, Series>,
    pub(super) carpets: &'a IndexMap<String, Carpet>,
    pub(super) offset: ViewportOffset,
    pub(super) revision: u64,
}

/// Second redraw pass: ticks, gridlines, series and carpets against the
/// ranges settled by the autorange pass.
pub(super) fn build_scene(input: SceneInput<'_>) -> ChartResult<PlotScene> {
    let SceneInput {
        config,
        x_axis,
        y_axis,
        series,
        carpets,
        offset,
        revision,
    } = input;
    let layout = &config.layout;
    let plot = layout.plot_rect();
    let geometry = AxisGeometry {
        plot,
        pad: layout.margin.pad,
        overscan_x: f64::from(layout.width),
        overscan_y: f64::from(layout.height),
    };

    let x = axis_scene(x_axis, offset, geometry, config.max_ticks_per_axis);
    let y = axis_scene(y_axis, offset, geometry, config.max_ticks_per_axis);

    let mut frame = RenderFrame::new(layout.viewport(), layout.paper_bgcolor)
        .with_path(PathPrimitive::filled_rect(plot, layout.plot_bgcolor));

    for segment in x.gridlines.iter().chain(&y.gridlines) {
        let color = match segment.axis {
            AxisId::X => layout.xaxis.gridcolor,
            AxisId::Y => layout.yaxis.gridcolor,
        };
        frame.paths.push(
            PathPrimitive::segment(
                segment.x1,
                segment.y1,
                segment.x2,
                segment.y2,
                GRID_LINE_WIDTH,
                color,
            )
            .with_clip(plot),
        );
    }

    let mut carpet_scenes = Vec::with_capacity(carpets.len());
    for (name, carpet) in carpets {
        let scene = carpet_scene(name, carpet, config.max_ticks_per_axis)?;
        for (gridlines, axis) in [
            (&scene.a_gridlines, CarpetAxisId::A),
            (&scene.b_gridlines, CarpetAxisId::B),
        ] {
            let style = carpet.axis(axis);
            let color = style.gridcolor.unwrap_or(CARPET_GRID_COLOR);
            for line in gridlines {
                if let Some(path) =
                    carpet_path(line, x_axis, y_axis, offset, plot, style.gridwidth, color)
                {
                    frame.paths.push(path.with_clip(plot));
                }
            }
        }
        carpet_scenes.push(scene);
    }

    let mut series_geometry = Vec::with_capacity(series.len());
    for (index, (name, entry)) in series.iter().enumerate() {
        let Some(resolved) = entry.resolve() else {
            warn!(series = %name, "skipping series without samples");
            continue;
        };
        let projected = project_series(&resolved, x_axis, y_axis, offset, plot);
        if entry.line.width > 0.0 {
            let color = entry.line_color(index);
            for run in &projected.runs {
                frame.paths.push(
                    PathPrimitive::polyline(run, entry.line.width, color).with_clip(plot),
                );
            }
        }
        if entry.marker.radius > 0.0 {
            for &(point, px, py) in &projected.points {
                let mut circle = CirclePrimitive::new(
                    px,
                    py,
                    entry.marker.radius,
                    entry.marker_color(index, point),
                );
                circle.clip = Some(plot);
                frame.circles.push(circle);
            }
        }
        series_geometry.push((name.clone(), projected));
    }

    frame.paths.push(outline(
        PixelRect::new(
            plot.x - layout.margin.pad,
            plot.y - layout.margin.pad,
            plot.width + 2.0 * layout.margin.pad,
            plot.height + 2.0 * layout.margin.pad,
        ),
        Color::BLACK,
    ));

    for mark in &x.tick_marks {
        frame.paths.push(PathPrimitive::segment(
            mark.x1, mark.y1, mark.x2, mark.y2, 1.0, Color::BLACK,
        ));
        frame.texts.push(
            TextPrimitive::new(
                mark.label.clone(),
                mark.label_x,
                mark.label_y,
                TICK_LABEL_FONT_PX,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Top),
        );
    }
    for mark in &y.tick_marks {
        frame.paths.push(PathPrimitive::segment(
            mark.x1, mark.y1, mark.x2, mark.y2, 1.0, Color::BLACK,
        ));
        frame.texts.push(TextPrimitive::new(
            mark.label.clone(),
            mark.label_x,
            mark.label_y,
            TICK_LABEL_FONT_PX,
            Color::BLACK,
            TextHAlign::Right,
        ));
    }

    let width = f64::from(layout.width);
    let height = f64::from(layout.height);
    let x_title = layout.xaxis.display_title();
    if !x_title.is_empty() {
        frame.texts.push(
            TextPrimitive::new(
                x_title,
                (width + layout.margin.l - layout.margin.r) / 2.0,
                height - AXIS_TITLE_INSET_PX,
                AXIS_TITLE_FONT_PX,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_v_align(TextVAlign::Bottom),
        );
    }
    let y_title = layout.yaxis.display_title();
    if !y_title.is_empty() {
        frame.texts.push(
            TextPrimitive::new(
                y_title,
                Y_TITLE_INSET_PX,
                (height + layout.margin.t - layout.margin.b) / 2.0,
                AXIS_TITLE_FONT_PX,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_rotation(-90.0),
        );
    }
    if !layout.title.is_empty() {
        frame.texts.push(TextPrimitive::new(
            layout.title.clone(),
            width / 2.0,
            layout.margin.t / 2.0,
            CHART_TITLE_FONT_PX,
            Color::BLACK,
            TextHAlign::Center,
        ));
    }

    debug!(
        revision,
        paths = frame.paths.len(),
        circles = frame.circles.len(),
        texts = frame.texts.len(),
        "scene built"
    );

    Ok(PlotScene {
        revision,
        plot,
        offset,
        x,
        y,
        series: series_geometry,
        carpets: carpet_scenes,
        frame,
    })
}

fn axis_scene(
    axis: &mut Axis,
    offset: ViewportOffset,
    geometry: AxisGeometry,
    max_ticks: usize,
) -> AxisScene {
    let visible_range = axis.visible_range(offset.along(axis.id()));
    let round_factor = compute_ticks(axis, visible_range);
    let ticks = TickSet::enumerate(visible_range, axis.tick0, axis.dtick, round_factor, max_ticks);
    let gridlines = build_gridlines(axis, &ticks, offset, geometry);
    let tick_marks = build_tick_marks(axis, &ticks, offset, geometry);
    AxisScene {
        axis: axis.id(),
        visible_range,
        ticks,
        gridlines,
        tick_marks,
    }
}

fn carpet_scene(name: &str, carpet: &Carpet, max_gridlines: usize) -> ChartResult<CarpetScene> {
    Ok(CarpetScene {
        name: name.to_owned(),
        a_gridlines: carpet.gridlines(CarpetAxisId::A, max_gridlines)?,
        b_gridlines: carpet.gridlines(CarpetAxisId::B, max_gridlines)?,
    })
}

/// Projects a carpet gridline to canvas pixels. Smoothed lines keep their
/// Bezier control points, which an affine map carries over exactly.
fn carpet_path(
    line: &CarpetGridline,
    x_axis: &Axis,
    y_axis: &Axis,
    offset: ViewportOffset,
    plot: PixelRect,
    width: f64,
    color: Color,
) -> Option<PathPrimitive> {
    let project = |&(x, y): &(f64, f64)| {
        (
            plot.x + x_axis.to_paper(x, offset.x),
            plot.y + y_axis.to_paper(y, offset.y),
        )
    };
    if line.points.len() < 2 || width <= 0.0 {
        return None;
    }
    let points: Vec<(f64, f64)> = line.points.iter().map(project).collect();
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        warn!(value = line.value, "dropping carpet gridline with non-finite coordinates");
        return None;
    }

    if !line.smoothing {
        return Some(PathPrimitive::polyline(&points, width, color));
    }

    let (&(x, y), rest) = points.split_first()?;
    let mut commands = vec![PathCommand::MoveTo { x, y }];
    for segment in rest.chunks_exact(3) {
        let [(x1, y1), (x2, y2), (x, y)] = [segment[0], segment[1], segment[2]];
        commands.push(PathCommand::CubicTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }
    Some(PathPrimitive::stroked(commands, width, color))
}

fn outline(rect: PixelRect, color: Color) -> PathPrimitive {
    let mut path = PathPrimitive::filled_rect(rect, color);
    path.fill = None;
    path.stroke = Some(color);
    path.stroke_width = 1.0;
    path
}
