use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::carpet::Carpet;
use crate::core::{Axis, AxisId, DataExtent, PixelRect, Series, Viewport, ViewportOffset};
use crate::error::ChartResult;
use crate::interaction::{DragLayout, DragStateMachine};
use crate::render::RenderTarget;

use super::ChartEngineConfig;
use super::engine_config::AxisLayout;
use super::scene_builder::{PlotScene, SceneInput, build_scene};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns both axes, the named series and carpets, the viewport
/// offset of a live drag and the render target. Every mutation bumps a
/// revision counter; `redraw` rebuilds the cached scene only when the
/// revision moved.
pub struct ChartEngine<R: RenderTarget> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) x_axis: Axis,
    pub(super) y_axis: Axis,
    pub(super) series: IndexMap<String, Series>,
    pub(super) carpets: IndexMap<String, Carpet>,
    pub(super) offset: ViewportOffset,
    pub(super) drag: DragStateMachine,
    pub(super) revision: u64,
    pub(super) scene: Option<PlotScene>,
}

impl<R: RenderTarget> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        let plot = config.layout.plot_rect();
        let x_axis = axis_from_layout(AxisId::X, &config.layout.xaxis, plot.width)?;
        let y_axis = axis_from_layout(AxisId::Y, &config.layout.yaxis, plot.height)?;
        debug!(
            width = config.layout.width,
            height = config.layout.height,
            "chart engine created"
        );

        Ok(Self {
            renderer,
            drag: DragStateMachine::new(config.drag_behavior),
            config,
            x_axis,
            y_axis,
            series: IndexMap::new(),
            carpets: IndexMap::new(),
            offset: ViewportOffset::ZERO,
            revision: 0,
            scene: None,
        })
    }

    /// Engine with the default config deep-merged with `overrides`.
    pub fn from_json_overrides(renderer: R, overrides: &serde_json::Value) -> ChartResult<Self> {
        let config = ChartEngineConfig::default().with_overrides(overrides)?;
        Self::new(renderer, config)
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    /// Applies layout overrides to the live chart.
    ///
    /// Any drag in progress is cancelled first. Axis range and tick settings
    /// the overrides leave out keep their live values, including ranges set
    /// through [`Self::set_axis_range`] or committed by a drag.
    pub fn update_layout(&mut self, overrides: &serde_json::Value) -> ChartResult<()> {
        self.cancel_drag();
        let mut current = self.config.clone();
        sync_axis_layout(&mut current.layout.xaxis, &self.x_axis);
        sync_axis_layout(&mut current.layout.yaxis, &self.y_axis);

        let config = current.with_overrides(overrides)?;
        config.validate()?;
        let plot = config.layout.plot_rect();
        let x_axis = axis_from_layout(AxisId::X, &config.layout.xaxis, plot.width)?;
        let y_axis = axis_from_layout(AxisId::Y, &config.layout.yaxis, plot.height)?;

        self.drag.set_behavior(config.drag_behavior);
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self.config = config;
        self.offset = ViewportOffset::ZERO;
        self.invalidate();
        Ok(())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.layout.viewport()
    }

    #[must_use]
    pub fn plot_rect(&self) -> PixelRect {
        self.config.layout.plot_rect()
    }

    #[must_use]
    pub fn drag_layout(&self) -> DragLayout {
        DragLayout::new(
            self.plot_rect(),
            self.config.layout.margin.l,
            self.config.layout.margin.b,
        )
    }

    #[must_use]
    pub fn axis(&self, axis: AxisId) -> &Axis {
        match axis {
            AxisId::X => &self.x_axis,
            AxisId::Y => &self.y_axis,
        }
    }

    pub(super) fn axis_mut(&mut self, axis: AxisId) -> &mut Axis {
        match axis {
            AxisId::X => &mut self.x_axis,
            AxisId::Y => &mut self.y_axis,
        }
    }

    /// Committed range of `axis`, excluding a live pan.
    #[must_use]
    pub fn axis_range(&self, axis: AxisId) -> (f64, f64) {
        self.axis(axis).range()
    }

    /// Range currently on screen, live pan included.
    #[must_use]
    pub fn visible_range(&self, axis: AxisId) -> (f64, f64) {
        self.axis(axis).visible_range(self.offset.along(axis))
    }

    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        self.visible_range(AxisId::X)
    }

    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        self.visible_range(AxisId::Y)
    }

    #[must_use]
    pub fn viewport_offset(&self) -> ViewportOffset {
        self.offset
    }

    /// Sets a manual range and turns autorange off for `axis`.
    pub fn set_axis_range(&mut self, axis: AxisId, range: (f64, f64)) -> ChartResult<()> {
        let target = self.axis_mut(axis);
        target.set_range(range)?;
        target.autorange = false;
        debug!(?axis, start = range.0, end = range.1, "set axis range");
        self.invalidate();
        Ok(())
    }

    pub fn set_autorange(&mut self, axis: AxisId, enabled: bool) {
        self.axis_mut(axis).autorange = enabled;
        self.invalidate();
    }

    pub fn set_autotick(&mut self, axis: AxisId, enabled: bool) {
        self.axis_mut(axis).autotick = enabled;
        self.invalidate();
    }

    /// Manual tick spacing; turns autotick off for `axis`.
    pub fn set_dtick(&mut self, axis: AxisId, tick0: f64, dtick: f64) {
        let target = self.axis_mut(axis);
        target.tick0 = tick0;
        target.dtick = dtick;
        target.autotick = false;
        self.invalidate();
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(super) fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        trace!(revision = self.revision, "chart invalidated");
    }

    /// Last built scene, if any.
    #[must_use]
    pub fn scene(&self) -> Option<&PlotScene> {
        self.scene.as_ref()
    }

    /// Tick values of the last redraw.
    #[must_use]
    pub fn axis_ticks(&self, axis: AxisId) -> Option<&[f64]> {
        self.scene
            .as_ref()
            .map(|scene| scene.axis(axis).ticks.values.as_slice())
    }

    /// Tick labels of the last redraw.
    #[must_use]
    pub fn tick_labels(&self, axis: AxisId) -> Vec<String> {
        self.scene
            .as_ref()
            .map(|scene| scene.axis(axis).labels())
            .unwrap_or_default()
    }

    /// Recomputes autoranges, ticks, gridlines and series geometry when
    /// anything changed since the last call, then replays the frame onto the
    /// render target.
    pub fn redraw(&mut self) -> ChartResult<&PlotScene> {
        let stale = self
            .scene
            .as_ref()
            .is_none_or(|scene| scene.revision != self.revision);
        if stale {
            self.autorange_pass()?;
            let scene = build_scene(SceneInput {
                config: &self.config,
                x_axis: &mut self.x_axis,
                y_axis: &mut self.y_axis,
                series: &self.series,
                carpets: &self.carpets,
                offset: self.offset,
                revision: self.revision,
            })?;
            self.scene = Some(scene);
        } else {
            trace!(revision = self.revision, "redraw reuses cached scene");
        }

        let scene = self.scene.as_ref().ok_or_else(|| {
            crate::error::ChartError::InvalidData("scene missing after redraw".to_owned())
        })?;
        scene.frame.replay(&mut self.renderer)?;
        Ok(scene)
    }

    /// First redraw pass: folds the data extent of every series and carpet
    /// into each autoranged axis.
    fn autorange_pass(&mut self) -> ChartResult<()> {
        if !self.x_axis.autorange && !self.y_axis.autorange {
            return Ok(());
        }

        let mut x_extent = DataExtent::default();
        let mut y_extent = DataExtent::default();
        for series in self.series.values() {
            if let Some(resolved) = series.resolve() {
                x_extent.include(&resolved.x, resolved.len);
                y_extent.include(&resolved.y, resolved.len);
            }
        }
        for carpet in self.carpets.values() {
            let (xs, ys): (Vec<f64>, Vec<f64>) = carpet.extent_points().unzip();
            x_extent.include_values(&xs);
            y_extent.include_values(&ys);
        }

        for (axis, extent) in [(AxisId::X, x_extent), (AxisId::Y, y_extent)] {
            let target = self.axis_mut(axis);
            if !target.autorange {
                continue;
            }
            match extent.padded_range() {
                Some(range) => {
                    target.set_range(range)?;
                    debug!(?axis, start = range.0, end = range.1, "autorange");
                }
                None => debug!(?axis, "autorange skipped, no numeric data"),
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

/// Writes the live range and tick state of `axis` back into its layout.
fn sync_axis_layout(layout: &mut AxisLayout, axis: &Axis) {
    layout.range = axis.range();
    layout.tick0 = axis.tick0;
    layout.dtick = axis.dtick;
    layout.autorange = axis.autorange;
    layout.autotick = axis.autotick;
}

fn axis_from_layout(id: AxisId, layout: &AxisLayout, extent_px: f64) -> ChartResult<Axis> {
    let mut axis = Axis::new(id, layout.range, extent_px)?;
    axis.tick0 = layout.tick0;
    axis.dtick = layout.dtick;
    axis.ticklen = layout.ticklen;
    axis.autorange = layout.autorange;
    axis.autotick = layout.autotick;
    Ok(axis)
}
