use std::collections::HashMap;

use crate::{
    foundation::{
        color::Color,
        error::{EngraveError, EngraveResult},
    },
    raster::buffer::RasterBuffer,
    text::metrics::{FontFace, GlyphDraw, GlyphMetrics, TextBox},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Brush carried through Parley layouts. Only coverage is rasterized, so it stays opaque white.
struct CoverageBrush;

/// Shaped single-line text: Parley layout plus the baseline-relative extent.
struct ShapedText {
    layout: parley::Layout<CoverageBrush>,
    width: f32,
    ascent: f32,
    descent: f32,
    baseline: f32,
}

/// [`GlyphMetrics`] backed by Parley shaping and `vello_cpu` glyph rasterization.
///
/// Glyphs are rendered as coverage into a scratch pixmap sized to the rotated text box, then
/// composited onto the raster buffer with the requested color.
pub struct ParleyGlyphs {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<CoverageBrush>,
    families: HashMap<String, String>,
    fonts: HashMap<String, vello_cpu::peniko::FontData>,
}

impl Default for ParleyGlyphs {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParleyGlyphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyGlyphs")
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

impl ParleyGlyphs {
    /// Fresh shaping contexts with no fonts registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &FontFace) -> EngraveResult<String> {
        let key = cache_key(font);
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes().as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            EngraveError::validation(format!("no font families found in '{}'", font.name()))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| EngraveError::validation("registered font family has no name"))?
            .to_string();

        self.families.insert(key, family.clone());
        Ok(family)
    }

    fn font_data(&mut self, font: &FontFace) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry(cache_key(font))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes().as_ref().clone()),
                    0,
                )
            })
            .clone()
    }

    fn shape(&mut self, font: &FontFace, size: f32, text: &str) -> EngraveResult<ShapedText> {
        if !size.is_finite() || size <= 0.0 {
            return Err(EngraveError::validation("font size must be finite and > 0"));
        }
        let family = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::Brush(CoverageBrush));

        let mut layout: parley::Layout<CoverageBrush> = builder.build(text);
        layout.break_all_lines(None);

        let (ascent, descent, baseline) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (m.ascent, m.descent, m.baseline)
            })
            .unwrap_or((0.0, 0.0, 0.0));
        let width = layout.width();

        Ok(ShapedText {
            layout,
            width,
            ascent,
            descent,
            baseline,
        })
    }
}

/// Fonts loaded from disk are cached by path, in-memory ones by name.
fn cache_key(font: &FontFace) -> String {
    match font.path() {
        Some(path) => path.display().to_string(),
        None => font.name().to_string(),
    }
}

impl GlyphMetrics for ParleyGlyphs {
    fn text_box(&mut self, font: &FontFace, size: f32, text: &str) -> EngraveResult<TextBox> {
        let shaped = self.shape(font, size, text)?;
        Ok(TextBox::from_extent(
            shaped.width,
            shaped.ascent,
            shaped.descent,
        ))
    }

    #[tracing::instrument(skip(self, buf, font), fields(font = font.name()))]
    fn draw_text(
        &mut self,
        buf: &mut RasterBuffer,
        font: &FontFace,
        draw: &GlyphDraw,
        text: &str,
    ) -> EngraveResult<TextBox> {
        let shaped = self.shape(font, draw.size, text)?;
        let drawn = TextBox::from_extent(shaped.width, shaped.ascent, shaped.descent)
            .rotated(draw.angle_deg)
            .translated(draw.x, draw.y);

        // Scratch area: the rotated box plus a little antialiasing slack, clipped to the buffer.
        let (x0, y0, x1, y1) = drawn.bounds();
        let left = (x0.floor() - 2.0).max(0.0);
        let top = (y0.floor() - 2.0).max(0.0);
        let right = (x1.ceil() + 2.0).min(buf.width() as f32);
        let bottom = (y1.ceil() + 2.0).min(buf.height() as f32);
        if right <= left || bottom <= top {
            return Ok(drawn);
        }
        let too_large = || EngraveError::invalid_dimension("text area exceeds 65535 pixels");
        let pw = u16::try_from((right - left) as u32).map_err(|_| too_large())?;
        let ph = u16::try_from((bottom - top) as u32).map_err(|_| too_large())?;

        let font_data = self.font_data(font);
        let mut ctx = vello_cpu::RenderContext::new(pw, ph);
        // Positioned glyphs sit on the first line's baseline; move it onto the draw origin.
        let transform = vello_cpu::kurbo::Affine::translate((
            f64::from(draw.x - left),
            f64::from(draw.y - top),
        )) * vello_cpu::kurbo::Affine::rotate(-f64::from(draw.angle_deg.to_radians()))
            * vello_cpu::kurbo::Affine::translate((0.0, -f64::from(shaped.baseline)));
        ctx.set_transform(transform);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(pw, ph);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let (ox, oy) = (left as u32, top as u32);
        let row_len = usize::from(pw) * 4;
        for (py, row) in pixmap.data_as_u8_slice().chunks_exact(row_len).enumerate() {
            for (px, rgba) in row.chunks_exact(4).enumerate() {
                let coverage = rgba[3];
                if coverage == 0 {
                    continue;
                }
                let (x, y) = (ox + px as u32, oy + py as u32);
                if let Some(dst) = buf.get(x, y) {
                    buf.set(x, y, Color::over(dst, draw.color, coverage));
                }
            }
        }

        Ok(drawn)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley_glyphs.rs"]
mod tests;
