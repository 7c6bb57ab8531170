use crate::{
    foundation::error::EngraveResult,
    text::metrics::{FontFace, GlyphMetrics},
};

/// Smallest size [`fit_to_height`] shrinks the font to.
pub const MIN_HEIGHT_FIT_SIZE: f32 = 7.0;

/// Sample line with long ascenders and descenders used by [`fit_text_height`].
pub const PANGRAM: &str = "The quick brown fox jumps over the lazy dog";

/// Largest size `<= font_size` (in whole steps) at which every line's box is at most
/// `max_width` wide. Never goes below 1.
pub fn fit_to_width<S: AsRef<str>>(
    metrics: &mut dyn GlyphMetrics,
    font: &FontFace,
    lines: &[S],
    max_width: f32,
    font_size: f32,
) -> EngraveResult<f32> {
    let mut size = font_size;
    for line in lines {
        while size > 1.0 && metrics.text_box(font, size, line.as_ref())?.width() > max_width {
            size -= 1.0;
        }
    }
    tracing::debug!(from = font_size, to = size, max_width, "fit to width");
    Ok(size)
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of [`fit_to_height`].
pub struct FitHeight {
    /// Final font size.
    pub font_size: f32,
    /// Final line spacing.
    pub linespacing: f32,
    /// Block height at the final settings.
    pub height: f32,
    /// Whether `height <= max_height`; the search can stop at the size floor without fitting.
    pub fits: bool,
}

/// Shrink a block of `num_lines` lines into `max_height`, trading line spacing first while it
/// is generous, then font size, down to [`MIN_HEIGHT_FIT_SIZE`].
pub fn fit_to_height(
    num_lines: u32,
    max_height: f32,
    current_height: f32,
    font_size: f32,
    linespacing: f32,
) -> FitHeight {
    let lines = num_lines as f32;
    let (mut size, mut spacing, mut height) = (font_size, linespacing, current_height);

    while height > max_height && size > MIN_HEIGHT_FIT_SIZE {
        if spacing > size + (size * 0.5).ceil() && spacing - size > 4.0 {
            spacing -= 1.0;
        } else {
            size -= 1.0;
        }
        height = spacing * lines - (spacing - size);
    }

    let fit = FitHeight {
        font_size: size,
        linespacing: spacing,
        height,
        fits: height <= max_height,
    };
    tracing::debug!(?fit, max_height, "fit to height");
    fit
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of [`fit_text_height`].
pub struct TextFit {
    /// Largest tested size whose sample box fits.
    pub font_size: f32,
    /// Distance from the baseline to the bottom of the sample box.
    pub baseline_offset: f32,
}

/// Font size whose [`PANGRAM`] box is at most `height` tall, searching down from just below
/// `height`. Stops at size 1.
pub fn fit_text_height(
    metrics: &mut dyn GlyphMetrics,
    font: &FontFace,
    height: f32,
) -> EngraveResult<TextFit> {
    let mut size = height.floor();
    loop {
        size -= 1.0;
        let b = metrics.text_box(font, size.max(1.0), PANGRAM)?;
        if b.height() <= height || size <= 1.0 {
            return Ok(TextFit {
                font_size: size.max(1.0),
                baseline_offset: b.0[1],
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
