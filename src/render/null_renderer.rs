use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{CirclePrimitive, Color, PathPrimitive, RenderTarget, TextPrimitive};

/// No-op render target used by tests and headless engine usage.
///
/// Frames are still validated before replay, so tests catch invalid geometry
/// without a real backend. Counters hold the totals of the last frame.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_path_count: usize,
    pub last_circle_count: usize,
    pub last_text_count: usize,
    pub last_texts: Vec<String>,
}

impl RenderTarget for NullRenderer {
    fn clear(&mut self, _viewport: Viewport, _background: Color) -> ChartResult<()> {
        self.last_path_count = 0;
        self.last_circle_count = 0;
        self.last_text_count = 0;
        self.last_texts.clear();
        Ok(())
    }

    fn draw_path(&mut self, _path: &PathPrimitive) -> ChartResult<()> {
        self.last_path_count += 1;
        Ok(())
    }

    fn draw_circle(&mut self, _circle: &CirclePrimitive) -> ChartResult<()> {
        self.last_circle_count += 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        self.last_text_count += 1;
        self.last_texts.push(text.text.clone());
        Ok(())
    }

    fn finish(&mut self) -> ChartResult<()> {
        self.frames_rendered += 1;
        Ok(())
    }
}
