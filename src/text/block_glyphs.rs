use std::collections::HashMap;

use crate::{
    foundation::{color::Color, error::EngraveResult},
    raster::buffer::RasterBuffer,
    text::metrics::{FontFace, GlyphDraw, GlyphMetrics, TextBox},
};

#[derive(Clone, Debug)]
/// Deterministic font-free metrics: every character is a solid block `advance · size` wide,
/// `0.8 · size` tall above the baseline and `0.2 · size` below it.
///
/// Useful headless and in tests, where layout results must not depend on installed fonts.
pub struct BlockGlyphs {
    advance: f32,
    overrides: HashMap<char, f32>,
}

impl BlockGlyphs {
    const ASCENT: f32 = 0.8;
    const DESCENT: f32 = 0.2;

    /// Blocks `advance · size` wide.
    pub fn new(advance: f32) -> Self {
        Self {
            advance,
            overrides: HashMap::new(),
        }
    }

    /// Give `ch` its own advance ratio.
    pub fn with_advance(mut self, ch: char, advance: f32) -> Self {
        self.overrides.insert(ch, advance);
        self
    }

    fn char_width(&self, ch: char, size: f32) -> f32 {
        self.overrides.get(&ch).copied().unwrap_or(self.advance) * size
    }
}

impl Default for BlockGlyphs {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl GlyphMetrics for BlockGlyphs {
    fn text_box(&mut self, _font: &FontFace, size: f32, text: &str) -> EngraveResult<TextBox> {
        let width = text.chars().map(|ch| self.char_width(ch, size)).sum();
        Ok(TextBox::from_extent(
            width,
            Self::ASCENT * size,
            Self::DESCENT * size,
        ))
    }

    fn draw_text(
        &mut self,
        buf: &mut RasterBuffer,
        font: &FontFace,
        draw: &GlyphDraw,
        text: &str,
    ) -> EngraveResult<TextBox> {
        let drawn = self
            .text_box(font, draw.size, text)?
            .rotated(draw.angle_deg)
            .translated(draw.x, draw.y);

        let (x0, y0, x1, y1) = drawn.bounds();
        let (w, h) = (buf.width() as f32, buf.height() as f32);
        let xs = x0.round().max(0.0) as u32..x1.round().clamp(0.0, w) as u32;
        let ys = y0.round().max(0.0) as u32..y1.round().clamp(0.0, h) as u32;
        for y in ys {
            for x in xs.clone() {
                if let Some(dst) = buf.get(x, y) {
                    buf.set(x, y, Color::over(dst, draw.color, 255));
                }
            }
        }
        Ok(drawn)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/block_glyphs.rs"]
mod tests;
