use serde::{Deserialize, Serialize};

use crate::core::{PixelRect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::DragBehavior;
use crate::render::Color;

use super::layout_merge::merge_layout;

const DEFAULT_GRID_COLOR: Color = Color::rgb(0.8, 0.8, 0.8);

/// Space between the canvas edge and the plot box, plus the gap `pad`
/// between the plot box and the tick baselines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    #[serde(default = "default_margin_l")]
    pub l: f64,
    #[serde(default = "default_margin_r")]
    pub r: f64,
    #[serde(default = "default_margin_t")]
    pub t: f64,
    #[serde(default = "default_margin_b")]
    pub b: f64,
    #[serde(default = "default_margin_pad")]
    pub pad: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: default_margin_l(),
            r: default_margin_r(),
            t: default_margin_t(),
            b: default_margin_b(),
            pad: default_margin_pad(),
        }
    }
}

/// Layout of one rectilinear axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub range: (f64, f64),
    #[serde(default)]
    pub tick0: f64,
    pub dtick: f64,
    #[serde(default = "default_ticklen")]
    pub ticklen: f64,
    #[serde(default = "default_true")]
    pub autorange: bool,
    #[serde(default = "default_true")]
    pub autotick: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_grid_color")]
    pub gridcolor: Color,
}

impl AxisLayout {
    fn x_default() -> Self {
        Self {
            range: (-5.0, 5.0),
            tick0: 0.0,
            dtick: 2.0,
            ticklen: default_ticklen(),
            autorange: true,
            autotick: true,
            title: "Time".to_owned(),
            unit: "hours".to_owned(),
            gridcolor: DEFAULT_GRID_COLOR,
        }
    }

    fn y_default() -> Self {
        Self {
            range: (-4.0, 4.0),
            tick0: 0.0,
            dtick: 1.0,
            ticklen: default_ticklen(),
            autorange: true,
            autotick: true,
            title: "pH".to_owned(),
            unit: String::new(),
            gridcolor: DEFAULT_GRID_COLOR,
        }
    }

    /// `title (unit)`, or the bare title without a unit.
    #[must_use]
    pub fn display_title(&self) -> String {
        if self.unit.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.unit)
        }
    }
}

/// Chart layout: canvas size, margins, colors and both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default = "default_bgcolor")]
    pub paper_bgcolor: Color,
    #[serde(default = "default_bgcolor")]
    pub plot_bgcolor: Color,
    #[serde(default = "AxisLayout::x_default")]
    pub xaxis: AxisLayout,
    #[serde(default = "AxisLayout::y_default")]
    pub yaxis: AxisLayout,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            paper_bgcolor: default_bgcolor(),
            plot_bgcolor: default_bgcolor(),
            xaxis: AxisLayout::x_default(),
            yaxis: AxisLayout::y_default(),
        }
    }
}

impl ChartLayout {
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Plot box in canvas pixels.
    #[must_use]
    pub fn plot_rect(&self) -> PixelRect {
        PixelRect::new(
            self.margin.l,
            self.margin.t,
            f64::from(self.width) - self.margin.l - self.margin.r,
            f64::from(self.height) - self.margin.t - self.margin.b,
        )
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport().is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        let margins = [
            self.margin.l,
            self.margin.r,
            self.margin.t,
            self.margin.b,
            self.margin.pad,
        ];
        if margins.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(ChartError::InvalidData(
                "margins must be finite and >= 0".to_owned(),
            ));
        }
        let plot = self.plot_rect();
        if plot.width <= 0.0 || plot.height <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "margins leave no plot area ({}x{})",
                plot.width, plot.height
            )));
        }
        Ok(())
    }
}

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist chart setup and apply
/// partial JSON overrides through [`ChartEngineConfig::with_overrides`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    #[serde(default)]
    pub layout: ChartLayout,
    #[serde(default)]
    pub drag_behavior: DragBehavior,
    #[serde(default = "default_max_ticks_per_axis")]
    pub max_ticks_per_axis: usize,
}

impl Default for ChartEngineConfig {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            drag_behavior: DragBehavior::default(),
            max_ticks_per_axis: default_max_ticks_per_axis(),
        }
    }
}

impl ChartEngineConfig {
    /// Default config with a custom canvas size.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let mut config = Self::default();
        config.layout.width = viewport.width;
        config.layout.height = viewport.height;
        config
    }

    #[must_use]
    pub fn with_layout(mut self, layout: ChartLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_drag_behavior(mut self, behavior: DragBehavior) -> Self {
        self.drag_behavior = behavior;
        self
    }

    /// Deep-merges `overrides` onto this config. Keys unknown to the config
    /// are ignored.
    pub fn with_overrides(&self, overrides: &serde_json::Value) -> ChartResult<Self> {
        let defaults = serde_json::to_value(self)?;
        let merged = merge_layout(&defaults, overrides);
        let config: Self = serde_json::from_value(merged)?;
        Ok(config)
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.layout.validate()?;
        let behavior = self.drag_behavior;
        if !behavior.dead_zone_px.is_finite() || behavior.dead_zone_px < 0.0 {
            return Err(ChartError::InvalidData(
                "drag dead zone must be finite and >= 0".to_owned(),
            ));
        }
        if self.max_ticks_per_axis == 0 {
            return Err(ChartError::InvalidData(
                "max_ticks_per_axis must be > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_margin_l() -> f64 {
    50.0
}

fn default_margin_r() -> f64 {
    10.0
}

fn default_margin_t() -> f64 {
    30.0
}

fn default_margin_b() -> f64 {
    40.0
}

fn default_margin_pad() -> f64 {
    2.0
}

fn default_ticklen() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_grid_color() -> Color {
    DEFAULT_GRID_COLOR
}

fn default_title() -> String {
    "Glass Washer".to_owned()
}

fn default_width() -> u32 {
    600
}

fn default_height() -> u32 {
    400
}

fn default_bgcolor() -> Color {
    Color::WHITE
}

fn default_max_ticks_per_axis() -> usize {
    1000
}
