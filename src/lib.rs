//! carpet-chart: interactive 2-D chart core.
//!
//! Maps data values to plot pixels, autoranges axes with nice tick spacing,
//! interprets pointer drags as pan and edge/corner zoom, and evaluates
//! curvilinear carpet gridlines over a smoothed control-point surface.
//! Drawing goes through the [`render::RenderTarget`] seam so everything above
//! it runs without a rendering backend.

pub mod api;
pub mod carpet;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
