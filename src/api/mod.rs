mod data_controller;
mod drag_controller;
mod engine;
mod engine_config;
mod layout_merge;
mod scene_builder;

pub use engine::ChartEngine;
pub use engine_config::{AxisLayout, ChartEngineConfig, ChartLayout, Margin};
pub use layout_merge::merge_layout;
pub use scene_builder::{AxisScene, CarpetScene, PlotScene};
