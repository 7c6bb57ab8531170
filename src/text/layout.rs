use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{EngraveError, EngraveResult},
    raster::buffer::RasterBuffer,
    text::metrics::{FontFace, GlyphDraw, GlyphMetrics, TextBox},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal alignment of a text row relative to its anchor x.
pub enum Align {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Circle a text run follows.
pub struct ArcSpec {
    /// Center x.
    pub cx: f32,
    /// Center y.
    pub cy: f32,
    /// Signed radius: positive runs along the outside of the top of the circle, negative
    /// hangs the text under the bottom.
    pub radius: f32,
    /// Degrees to rotate the run away from the top meridian, clockwise.
    pub start_deg: f32,
    /// Point size.
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
/// Where one glyph of an arc run is drawn.
pub struct GlyphPlacement {
    /// The glyph's text (one character).
    pub text: String,
    /// Baseline origin x.
    pub x: f32,
    /// Baseline origin y.
    pub y: f32,
    /// Angle of the origin on the circle, measured from the top meridian.
    pub angle_deg: f32,
    /// Rotation handed to the renderer: the middle of the glyph's slot.
    pub rotation_deg: f32,
    /// Angular width the glyph occupies.
    pub slot_deg: f32,
}

/// Angle subtended by an arc of length `width` on a circle of `radius` (sign preserved).
pub fn arc_degrees(width: f32, radius: f32) -> f32 {
    (width / (std::f32::consts::TAU * radius)) * 360.0
}

/// Sum of the per-character box widths of `text`, scaled by `kerning`.
///
/// Characters are measured one at a time so shaping of the whole run (ligatures, pair
/// kerning) cannot change the result.
pub fn arc_width(
    metrics: &mut dyn GlyphMetrics,
    font: &FontFace,
    size: f32,
    text: &str,
    kerning: f32,
) -> EngraveResult<f32> {
    let mut width = 0.0;
    let mut tmp = [0u8; 4];
    for ch in text.chars() {
        width += metrics.text_box(font, size, ch.encode_utf8(&mut tmp))?.width();
    }
    Ok(width * kerning)
}

/// Place every character of `text` along the arc described by `spec`.
pub fn layout_arc(
    metrics: &mut dyn GlyphMetrics,
    font: &FontFace,
    spec: &ArcSpec,
    kerning: f32,
    text: &str,
) -> EngraveResult<Vec<GlyphPlacement>> {
    if !spec.radius.is_finite() || spec.radius == 0.0 {
        return Err(EngraveError::out_of_range(format!(
            "arc radius must be finite and non-zero, got {}",
            spec.radius
        )));
    }
    let hanging = spec.radius < 0.0;
    let sign = if hanging { -1.0 } else { 1.0 };
    let r = spec.radius.abs();
    let reach = spec.radius - if hanging { spec.size } else { 0.0 };

    let total = arc_width(metrics, font, spec.size, text, kerning)?;
    let min_width = arc_width(metrics, font, spec.size, "-", kerning)?;
    let mut theta = arc_degrees(total, r) / 2.0 - spec.start_deg;

    let mut out = Vec::with_capacity(text.len());
    let mut tmp = [0u8; 4];
    for ch in text.chars() {
        let glyph = ch.encode_utf8(&mut tmp);
        let width = arc_width(metrics, font, spec.size, glyph, kerning)?.max(min_width);
        let slot = arc_degrees(width, r);

        let angle = sign * theta;
        let rad = angle.to_radians();
        out.push(GlyphPlacement {
            text: glyph.to_string(),
            x: spec.cx - rad.sin() * reach,
            y: spec.cy - rad.cos() * reach,
            angle_deg: angle,
            rotation_deg: sign * (theta - slot / 2.0),
            slot_deg: slot,
        });

        theta -= slot;
    }
    Ok(out)
}

/// Start x of a kerned run of `len` characters anchored at `x`.
pub fn kerned_start_x(x: f32, len: usize, kerning: f32, align: Align) -> f32 {
    let spread = len.saturating_sub(1) as f32 * kerning;
    match align {
        Align::Left => x,
        Align::Center => x - spread / 2.0,
        Align::Right => x - spread,
    }
}

/// Draw `text` one character at a time, each starting `kerning` pixels after the previous
/// glyph's drawn box. Returns the drawn boxes.
pub fn draw_kerned(
    metrics: &mut dyn GlyphMetrics,
    buf: &mut RasterBuffer,
    font: &FontFace,
    base: &GlyphDraw,
    kerning: f32,
    align: Align,
    text: &str,
) -> EngraveResult<Vec<TextBox>> {
    let mut draw = GlyphDraw {
        x: kerned_start_x(base.x, text.chars().count(), kerning, align),
        ..*base
    };
    let mut boxes = Vec::new();
    let mut tmp = [0u8; 4];
    for ch in text.chars() {
        let drawn = metrics.draw_text(buf, font, &draw, ch.encode_utf8(&mut tmp))?;
        draw.x = drawn.lower_right().0 + kerning;
        boxes.push(drawn);
    }
    Ok(boxes)
}

/// Start x of a whole run of measured `width` anchored at `x`.
pub fn aligned_start_x(x: f32, width: f32, align: Align) -> f32 {
    match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
