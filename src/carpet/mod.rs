//! Curvilinear ("carpet") axes: a lattice of data-space points over two
//! parameters `a` and `b`, smoothed into a Bezier control net, and gridlines
//! of constant `a` or `b` traced across it.

pub mod control_points;
pub mod grid;
pub mod gridlines;
pub mod spline;
pub mod trace;

pub use control_points::{ControlSurface, MAX_SMOOTHING, expand_controls};
pub use grid::{CarpetAxisId, CarpetGrid};
pub use gridlines::{CarpetGridline, calc_gridlines, clamp_cell, tick_number_bounds};
pub use trace::{Carpet, CarpetAxis, CarpetTickMode};
