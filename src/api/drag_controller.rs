use std::time::Duration;

use tracing::{debug, warn};

use crate::core::{AxisId, ViewportOffset};
use crate::error::ChartResult;
use crate::interaction::{DoubleClickAction, DragBaseline, DragOutcome, DragPhase, DragUpdate};
use crate::render::RenderTarget;

use super::ChartEngine;

impl<R: RenderTarget> ChartEngine<R> {
    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Starts a gesture at canvas pixel `(x, y)`. Returns `false` when the
    /// pointer is outside every drag region.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        let Some(target) = self.drag_layout().hit_test(x, y) else {
            return false;
        };
        self.cancel_drag();

        let baseline = DragBaseline {
            x_range: self.x_axis.range(),
            y_range: self.y_axis.range(),
        };
        let plot = self.plot_rect();
        self.drag
            .pointer_down(target, (x, y), baseline, (plot.width, plot.height));
        true
    }

    /// Moves the pointer of the active gesture. Pans only shift the viewport
    /// offset; resize handles replace the ranges they own.
    ///
    /// Once the gesture leaves the dead zone its axes leave autorange, so the
    /// autorange pass of each intermediate redraw cannot undo the drag.
    ///
    /// Like every mutator this only invalidates the cached scene. The host
    /// calls [`ChartEngine::redraw`] after each pointer event to present the
    /// live view.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<DragUpdate> {
        let update = self.drag.pointer_move((x, y))?;
        let moved = !update.offset.is_zero() || update.x_range.is_some() || update.y_range.is_some();
        if moved {
            if let DragPhase::Panning(target) | DragPhase::Zooming(target) = self.drag.phase() {
                for axis in target.axes() {
                    self.axis_mut(axis).autorange = false;
                }
            }
        }
        self.apply_drag_update(update);
        Some(update)
    }

    /// Releases the pointer at `(x, y)` and resolves the gesture: commits the
    /// view, or autoranges on a double click. The next
    /// [`ChartEngine::redraw`] shows the result.
    pub fn pointer_up(&mut self, x: f64, y: f64, at: Duration) -> ChartResult<DragOutcome> {
        if self.drag.is_active() {
            self.pointer_move(x, y);
        }
        let outcome = self.drag.pointer_up(at);
        match &outcome {
            DragOutcome::Ignored => {}
            DragOutcome::Click | DragOutcome::Committed => self.commit_view()?,
            DragOutcome::DoubleClick(DoubleClickAction::Autorange(axes)) => {
                self.offset = ViewportOffset::ZERO;
                for axis in axes {
                    self.axis_mut(*axis).autorange = true;
                }
                self.invalidate();
            }
            DragOutcome::DoubleClick(DoubleClickAction::ResetView) => {
                self.offset = ViewportOffset::ZERO;
                for axis in AxisId::ALL {
                    self.axis_mut(axis).autorange = true;
                }
                self.invalidate();
            }
        }
        Ok(outcome)
    }

    /// Folds the viewport offset into both axis ranges and zeroes it.
    pub fn commit_view(&mut self) -> ChartResult<()> {
        if self.offset.is_zero() {
            return Ok(());
        }
        let x_range = self.visible_range(AxisId::X);
        let y_range = self.visible_range(AxisId::Y);
        self.x_axis.set_range(x_range)?;
        self.y_axis.set_range(y_range)?;
        debug!(
            x_start = x_range.0,
            x_end = x_range.1,
            y_start = y_range.0,
            y_end = y_range.1,
            "view committed"
        );
        self.offset = ViewportOffset::ZERO;
        self.invalidate();
        Ok(())
    }

    /// Abandons the active gesture and restores the ranges held at pointer
    /// down. Returns `false` when no gesture was active.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(baseline) = self.drag.cancel() else {
            return false;
        };
        self.restore_baseline(baseline);
        true
    }

    fn apply_drag_update(&mut self, update: DragUpdate) {
        self.offset = update.offset;
        for (axis, range) in [(AxisId::X, update.x_range), (AxisId::Y, update.y_range)] {
            let Some(range) = range else {
                continue;
            };
            if let Err(err) = self.axis_mut(axis).set_range(range) {
                warn!(?axis, error = %err, "skipping resize range");
            }
        }
        self.invalidate();
    }

    fn restore_baseline(&mut self, baseline: DragBaseline) {
        for (axis, range) in [(AxisId::X, baseline.x_range), (AxisId::Y, baseline.y_range)] {
            if let Err(err) = self.axis_mut(axis).set_range(range) {
                warn!(?axis, error = %err, "cannot restore drag baseline");
            }
        }
        self.offset = ViewportOffset::ZERO;
        self.invalidate();
    }
}
