mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, PathCommand, PathPrimitive, TextHAlign, TextPrimitive, TextVAlign,
};

use crate::core::Viewport;
use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// The engine materializes a deterministic [`RenderFrame`] and replays it
/// through these calls, so drawing code stays isolated from chart domain and
/// interaction logic. Each redraw starts with `clear` and ends with `finish`.
pub trait RenderTarget {
    fn clear(&mut self, viewport: Viewport, background: Color) -> ChartResult<()>;

    fn draw_path(&mut self, path: &PathPrimitive) -> ChartResult<()>;

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()>;

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()>;

    fn finish(&mut self) -> ChartResult<()> {
        Ok(())
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextTarget, CairoRenderStats, CairoRenderer};
