pub mod drag;
pub mod zoom;

pub use drag::{
    DoubleClickAction, DragBaseline, DragBehavior, DragOutcome, DragPhase, DragStateMachine,
    DragUpdate,
};
pub use hit_test::{DragLayout, DragTarget};
pub use zoom::{ResizeHandle, resize_ranges, zoom_factor};
