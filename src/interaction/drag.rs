use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{AxisId, ViewportOffset};
use crate::interaction::hit_test::DragTarget;
use crate::interaction::zoom::resize_ranges;

/// Gesture thresholds. Times are measured on the caller's clock; every event
/// carries its own timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragBehavior {
    /// Pointer travel, in pixels, a press must exceed before it drags.
    #[serde(default = "default_dead_zone_px")]
    pub dead_zone_px: f64,
    /// Longest gap between two releases on the same target that still
    /// counts as a double click.
    #[serde(default = "default_double_click_interval_ms")]
    pub double_click_interval_ms: u64,
}

impl Default for DragBehavior {
    fn default() -> Self {
        Self {
            dead_zone_px: default_dead_zone_px(),
            double_click_interval_ms: default_double_click_interval_ms(),
        }
    }
}

impl DragBehavior {
    #[must_use]
    pub fn double_click_interval(self) -> Duration {
        Duration::from_millis(self.double_click_interval_ms)
    }
}

fn default_dead_zone_px() -> f64 {
    5.0
}

fn default_double_click_interval_ms() -> u64 {
    300
}

/// Axis ranges captured at pointer down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragBaseline {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    target: DragTarget,
    origin: (f64, f64),
    baseline: DragBaseline,
    plot_size: (f64, f64),
    latched: bool,
}

/// Current gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPhase {
    Idle,
    /// Pointer is down; pans move the viewport offset only.
    Panning(DragTarget),
    /// Pointer is down on a resize handle; ranges follow the pointer.
    Zooming(DragTarget),
}

/// Geometry to show for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragUpdate {
    pub offset: ViewportOffset,
    /// Replacement ranges, set only by resize handles.
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

/// What a double click asks the chart to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoubleClickAction {
    /// Restore autorange on these axes.
    Autorange(SmallVec<[AxisId; 2]>),
    /// Autorange every axis and drop the viewport offset.
    ResetView,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DragOutcome {
    /// No drag was active.
    Ignored,
    /// Released without leaving the dead zone.
    Click,
    /// Drag finished; the offset must be folded into the axis ranges.
    Committed,
    DoubleClick(DoubleClickAction),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Release {
    target: DragTarget,
    at: Duration,
}

/// Pointer gesture state machine: `Idle -> {Panning, Zooming} -> Idle`.
///
/// The machine never touches chart state. It reports offsets, replacement
/// ranges and outcomes, and the caller applies them.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStateMachine {
    behavior: DragBehavior,
    active: Option<ActiveDrag>,
    last_release: Option<Release>,
}

impl DragStateMachine {
    #[must_use]
    pub fn new(behavior: DragBehavior) -> Self {
        Self {
            behavior,
            active: None,
            last_release: None,
        }
    }

    #[must_use]
    pub fn behavior(&self) -> DragBehavior {
        self.behavior
    }

    pub fn set_behavior(&mut self, behavior: DragBehavior) {
        self.behavior = behavior;
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        match self.active {
            None => DragPhase::Idle,
            Some(ActiveDrag {
                target: target @ DragTarget::Handle(_),
                ..
            }) => DragPhase::Zooming(target),
            Some(active) => DragPhase::Panning(active.target),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn baseline(&self) -> Option<DragBaseline> {
        self.active.map(|active| active.baseline)
    }

    /// Starts a gesture on `target`. A gesture already in progress is
    /// replaced and its baseline returned so the caller can restore it.
    pub fn pointer_down(
        &mut self,
        target: DragTarget,
        position: (f64, f64),
        baseline: DragBaseline,
        plot_size: (f64, f64),
    ) -> Option<DragBaseline> {
        let replaced = self.baseline();
        debug!(drag_target = ?target, x = position.0, y = position.1, "drag start");
        self.active = Some(ActiveDrag {
            target,
            origin: position,
            baseline,
            plot_size,
            latched: false,
        });
        replaced
    }

    /// Geometry for the pointer at `position`. Travel inside the dead zone
    /// yields a zero delta until the zone has been left once.
    pub fn pointer_move(&mut self, position: (f64, f64)) -> Option<DragUpdate> {
        let dead_zone = self.behavior.dead_zone_px;
        let active = self.active.as_mut()?;
        let raw = (position.0 - active.origin.0, position.1 - active.origin.1);
        let delta = constrain(active.target, raw);

        if !active.latched && (delta.0.abs() > dead_zone || delta.1.abs() > dead_zone) {
            active.latched = true;
        }
        let delta = if active.latched { delta } else { (0.0, 0.0) };
        trace!(drag_target = ?active.target, dx = delta.0, dy = delta.1, "drag move");

        Some(match active.target {
            DragTarget::Handle(handle) => {
                let (x_range, y_range) = resize_ranges(
                    handle,
                    active.baseline.x_range,
                    active.baseline.y_range,
                    delta,
                    active.plot_size,
                );
                DragUpdate {
                    offset: ViewportOffset::ZERO,
                    x_range,
                    y_range,
                }
            }
            DragTarget::Plot | DragTarget::Axis(_) => DragUpdate {
                offset: ViewportOffset::new(delta.0, delta.1),
                x_range: None,
                y_range: None,
            },
        })
    }

    /// Ends the gesture at `at`. A second release on the same target within
    /// the double-click interval wins over committing the drag.
    pub fn pointer_up(&mut self, at: Duration) -> DragOutcome {
        let Some(active) = self.active.take() else {
            return DragOutcome::Ignored;
        };

        let interval = self.behavior.double_click_interval();
        let is_double_click = self.last_release.is_some_and(|last| {
            last.target == active.target
                && at.checked_sub(last.at).is_some_and(|gap| gap < interval)
        });

        let outcome = if is_double_click {
            self.last_release = None;
            DragOutcome::DoubleClick(double_click_action(active.target))
        } else {
            self.last_release = Some(Release {
                target: active.target,
                at,
            });
            if active.latched {
                DragOutcome::Committed
            } else {
                DragOutcome::Click
            }
        };
        debug!(drag_target = ?active.target, ?outcome, "drag end");
        outcome
    }

    /// Abandons the gesture and returns the ranges to restore.
    pub fn cancel(&mut self) -> Option<DragBaseline> {
        let baseline = self.baseline();
        if baseline.is_some() {
            debug!("drag cancelled");
        }
        self.active = None;
        baseline
    }
}

impl Default for DragStateMachine {
    fn default() -> Self {
        Self::new(DragBehavior::default())
    }
}

/// Drops the pointer component an axis pan cannot use.
fn constrain(target: DragTarget, (dx, dy): (f64, f64)) -> (f64, f64) {
    match target {
        DragTarget::Axis(AxisId::X) => (dx, 0.0),
        DragTarget::Axis(AxisId::Y) => (0.0, dy),
        DragTarget::Plot | DragTarget::Handle(_) => (dx, dy),
    }
}

fn double_click_action(target: DragTarget) -> DoubleClickAction {
    match target {
        DragTarget::Plot => DoubleClickAction::ResetView,
        DragTarget::Axis(_) | DragTarget::Handle(_) => DoubleClickAction::Autorange(target.axes()),
    }
}
