use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::PI;

use crate::core::{PixelRect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, PathCommand, PathPrimitive, RenderTarget, TextHAlign, TextPrimitive,
    TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub paths_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo render target drawing into an owned image surface.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    context: Option<Context>,
    stats: CairoRenderStats,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            context: None,
            stats: CairoRenderStats::default(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn context(&self) -> ChartResult<&Context> {
        self.context.as_ref().ok_or_else(|| {
            ChartError::InvalidData("cairo renderer used before `clear`".to_owned())
        })
    }
}

impl RenderTarget for CairoRenderer {
    fn clear(&mut self, _viewport: Viewport, background: Color) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        paint_background(&context, background)?;
        self.context = Some(context);
        self.stats = CairoRenderStats::default();
        Ok(())
    }

    fn draw_path(&mut self, path: &PathPrimitive) -> ChartResult<()> {
        draw_path(self.context()?, path)?;
        self.stats.paths_drawn += 1;
        Ok(())
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()> {
        draw_circle(self.context()?, circle)?;
        self.stats.circles_drawn += 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        draw_text(self.context()?, text)?;
        self.stats.texts_drawn += 1;
        Ok(())
    }

    fn finish(&mut self) -> ChartResult<()> {
        self.context = None;
        self.surface.flush();
        self.last_stats = self.stats;
        Ok(())
    }
}

/// Render target that draws into an external Cairo context, for example a
/// GTK `DrawingArea` draw callback.
pub struct CairoContextTarget<'a> {
    context: &'a Context,
}

impl<'a> CairoContextTarget<'a> {
    #[must_use]
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }
}

impl RenderTarget for CairoContextTarget<'_> {
    fn clear(&mut self, _viewport: Viewport, background: Color) -> ChartResult<()> {
        paint_background(self.context, background)
    }

    fn draw_path(&mut self, path: &PathPrimitive) -> ChartResult<()> {
        draw_path(self.context, path)
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> ChartResult<()> {
        draw_circle(self.context, circle)
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        draw_text(self.context, text)
    }
}

fn paint_background(context: &Context, color: Color) -> ChartResult<()> {
    apply_color(context, color);
    context
        .paint()
        .map_err(|err| map_backend_error("failed to clear surface", err))
}

fn draw_path(context: &Context, path: &PathPrimitive) -> ChartResult<()> {
    with_clip(context, path.clip, |context| {
        context.new_path();
        for command in &path.commands {
            match *command {
                PathCommand::MoveTo { x, y } => context.move_to(x, y),
                PathCommand::LineTo { x, y } => context.line_to(x, y),
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => context.curve_to(x1, y1, x2, y2, x, y),
                PathCommand::Close => context.close_path(),
            }
        }

        if let Some(fill) = path.fill {
            apply_color(context, fill);
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill path", err))?;
        }
        if let Some(stroke) = path.stroke {
            apply_color(context, stroke);
            context.set_line_width(path.stroke_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke path", err))?;
        }
        context.new_path();
        Ok(())
    })
}

fn draw_circle(context: &Context, circle: &CirclePrimitive) -> ChartResult<()> {
    with_clip(context, circle.clip, |context| {
        context.new_path();
        context.arc(circle.x, circle.y, circle.radius, 0.0, 2.0 * PI);
        apply_color(context, circle.fill);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill circle", err))
    })
}

fn draw_text(context: &Context, text: &TextPrimitive) -> ChartResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let font_description = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, text_height) = layout.pixel_size();
    let dx = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -f64::from(text_width) / 2.0,
        TextHAlign::Right => -f64::from(text_width),
    };
    let dy = match text.v_align {
        TextVAlign::Top => 0.0,
        TextVAlign::Middle => -f64::from(text_height) / 2.0,
        TextVAlign::Bottom => -f64::from(text_height),
    };

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    context.translate(text.x, text.y);
    context.rotate(text.rotation_deg.to_radians());
    apply_color(context, text.color);
    context.move_to(dx, dy);
    pangocairo::functions::show_layout(context, &layout);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))
}

fn with_clip<F>(context: &Context, clip: Option<PixelRect>, draw: F) -> ChartResult<()>
where
    F: FnOnce(&Context) -> ChartResult<()>,
{
    let Some(clip) = clip else {
        return draw(context);
    };

    context
        .save()
        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
    context.rectangle(clip.x, clip.y, clip.width, clip.height);
    context.clip();
    let result = draw(context);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore cairo state", err))?;
    result
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
