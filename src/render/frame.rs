use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, Color, PathPrimitive, RenderTarget, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Replay order is fixed: clear, paths, circles, texts. Builders push paths
/// back to front, so gridlines stay under series lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub background: Color,
    pub paths: Vec<PathPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, background: Color) -> Self {
        Self {
            viewport,
            background,
            paths: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: PathPrimitive) -> Self {
        self.paths.push(path);
        self
    }

    #[must_use]
    pub fn with_circle(mut self, circle: CirclePrimitive) -> Self {
        self.circles.push(circle);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        self.background.validate()?;
        for path in &self.paths {
            path.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    /// Validates the frame, then replays it onto `target`.
    pub fn replay<T: RenderTarget + ?Sized>(&self, target: &mut T) -> ChartResult<()> {
        self.validate()?;
        target.clear(self.viewport, self.background)?;
        for path in &self.paths {
            target.draw_path(path)?;
        }
        for circle in &self.circles {
            target.draw_circle(circle)?;
        }
        for text in &self.texts {
            target.draw_text(text)?;
        }
        target.finish()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.circles.is_empty() && self.texts.is_empty()
    }
}
