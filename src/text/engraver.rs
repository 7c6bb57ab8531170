use std::{
    borrow::Cow,
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        color::Color,
        error::{EngraveError, EngraveResult},
    },
    raster::buffer::RasterBuffer,
    text::{
        fit::{self, FitHeight, TextFit},
        layout::{self, Align, ArcSpec, GlyphPlacement},
        metrics::{FontFace, GlyphDraw, GlyphMetrics, TextBox},
    },
};

/// Default kerning: arc glyph widths are scaled by it, kerned runs add it in pixels.
pub const DEFAULT_KERNING: f32 = 1.02;
/// Default line spacing in pixels.
pub const DEFAULT_LINESPACING: f32 = 24.0;
/// Default font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 15.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// How an engraving row is laid out.
pub enum RowStyle {
    /// Along a circle, see [`layout::layout_arc`].
    #[default]
    Arc,
    /// Straight, anchored at the row center with the row alignment.
    Line,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
/// Geometry and style of one engraving row.
pub struct RowSpec {
    /// Layout style.
    #[serde(default)]
    pub style: RowStyle,
    /// Alignment for [`RowStyle::Line`] rows.
    #[serde(default)]
    pub align: Align,
    /// Arc center x, or line anchor x.
    pub cx: f32,
    /// Arc center y, or line baseline y.
    pub cy: f32,
    /// Signed arc radius; unused by line rows.
    #[serde(default)]
    pub radius: f32,
    /// Arc start angle, or line rotation, in degrees.
    #[serde(default)]
    pub angle: f32,
    /// Point size before the engraver's size adjustment.
    pub size: f32,
}

/// Stateful text drawer: font selection, text settings and engraving rows over a
/// [`GlyphMetrics`] service.
///
/// Every drawing or measuring call needs a font; without one it logs a warning and returns
/// [`EngraveError::Configuration`] without touching the buffer.
pub struct TextEngraver {
    metrics: Box<dyn GlyphMetrics>,
    font: Option<FontFace>,
    available_fonts: BTreeMap<String, PathBuf>,
    kerning: f32,
    use_kerning: bool,
    linespacing: f32,
    font_size: f32,
    font_size_adj: f32,
    font_color: Color,
    uppercase_only: bool,
    rows: Vec<RowSpec>,
    text: Vec<String>,
}

impl std::fmt::Debug for TextEngraver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngraver")
            .field("font", &self.font)
            .field("kerning", &self.kerning)
            .field("font_size", &self.font_size)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl TextEngraver {
    /// Engraver with default settings and no font.
    pub fn new(metrics: Box<dyn GlyphMetrics>) -> Self {
        Self {
            metrics,
            font: None,
            available_fonts: BTreeMap::new(),
            kerning: DEFAULT_KERNING,
            use_kerning: false,
            linespacing: DEFAULT_LINESPACING,
            font_size: DEFAULT_FONT_SIZE,
            font_size_adj: 0.0,
            font_color: Color::BLACK,
            uppercase_only: false,
            rows: Vec::new(),
            text: Vec::new(),
        }
    }

    /// Register named fonts. Numeric names and missing files are skipped; existing names are
    /// only replaced when `override_existing` is set. Returns how many entries were stored.
    pub fn add_available_fonts<I, K, P>(&mut self, fonts: I, override_existing: bool) -> usize
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for (name, path) in fonts {
            let (name, path) = (name.into(), path.into());
            if name.parse::<f64>().is_ok() || !path.is_file() {
                tracing::debug!(name = %name, path = %path.display(), "skipping font entry");
                continue;
            }
            if override_existing || !self.available_fonts.contains_key(&name) {
                self.available_fonts.insert(name, path);
                added += 1;
            }
        }
        added
    }

    /// Registered fonts by name.
    pub fn available_fonts(&self) -> &BTreeMap<String, PathBuf> {
        &self.available_fonts
    }

    /// Select a font by registered name, falling back to treating `font` as a file path.
    /// On failure the current font is kept.
    pub fn set_font(&mut self, font: &str) -> EngraveResult<()> {
        let path = match self.available_fonts.get(font) {
            Some(path) => path.clone(),
            None if Path::new(font).is_file() => PathBuf::from(font),
            None => {
                return Err(EngraveError::configuration(format!(
                    "font '{font}' is neither a registered name nor an existing file"
                )));
            }
        };
        self.font = Some(FontFace::load(&path)?);
        Ok(())
    }

    /// Use an already loaded font.
    pub fn set_font_face(&mut self, font: FontFace) {
        self.font = Some(font);
    }

    /// Current font.
    pub fn font(&self) -> Option<&FontFace> {
        self.font.as_ref()
    }

    /// Set the default text color, returning the previous one.
    pub fn set_font_color(&mut self, color: Color) -> Color {
        std::mem::replace(&mut self.font_color, color)
    }

    /// Default text color.
    pub fn font_color(&self) -> Color {
        self.font_color
    }

    /// Set the kerning value.
    pub fn set_kerning(&mut self, kerning: f32) {
        self.kerning = kerning;
    }

    /// Current kerning value.
    pub fn kerning(&self) -> f32 {
        self.kerning
    }

    /// Draw line rows glyph by glyph with kerning.
    pub fn use_kerning(&mut self, enabled: bool) {
        self.use_kerning = enabled;
    }

    /// Upper-case all text before measuring or drawing.
    pub fn uppercase_only(&mut self, enabled: bool) {
        self.uppercase_only = enabled;
    }

    /// Points added to every row size.
    pub fn adjust_font_size(&mut self, adjustment: f32) {
        self.font_size_adj = adjustment;
    }

    /// Current size adjustment.
    pub fn font_size_adjustment(&self) -> f32 {
        self.font_size_adj
    }

    /// Working font size used by the fit searches.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Set the working font size.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Working line spacing.
    pub fn linespacing(&self) -> f32 {
        self.linespacing
    }

    /// Set the working line spacing.
    pub fn set_linespacing(&mut self, linespacing: f32) {
        self.linespacing = linespacing;
    }

    /// Append an engraving row.
    pub fn add_row_info(&mut self, row: RowSpec) {
        self.rows.push(row);
    }

    /// Engraving rows in drawing order.
    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    /// Replace the engraving text; line `i` goes on row `i`.
    pub fn set_engraving_text<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text = lines.into_iter().map(Into::into).collect();
    }

    /// Current engraving text.
    pub fn engraving_text(&self) -> &[String] {
        &self.text
    }

    fn require_font(&self) -> EngraveResult<FontFace> {
        match &self.font {
            Some(font) => Ok(font.clone()),
            None => {
                tracing::warn!("text operation skipped: no font set");
                Err(EngraveError::configuration("no font set"))
            }
        }
    }

    fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.uppercase_only {
            Cow::Owned(text.to_uppercase())
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Upright box of `text` at `size`.
    pub fn text_box(&mut self, text: &str, size: f32) -> EngraveResult<TextBox> {
        let font = self.require_font()?;
        let text = self.fold(text).into_owned();
        self.metrics.text_box(&font, size, &text)
    }

    /// Draw straight text, returning its drawn box.
    pub fn add_text(
        &mut self,
        buf: &mut RasterBuffer,
        text: &str,
        draw: &GlyphDraw,
    ) -> EngraveResult<TextBox> {
        let font = self.require_font()?;
        let text = self.fold(text).into_owned();
        self.metrics.draw_text(buf, &font, draw, &text)
    }

    /// Draw text along an arc in `color`, returning where each glyph went.
    pub fn add_text_arc(
        &mut self,
        buf: &mut RasterBuffer,
        text: &str,
        arc: &ArcSpec,
        color: Color,
    ) -> EngraveResult<Vec<GlyphPlacement>> {
        let font = self.require_font()?;
        let text = self.fold(text).into_owned();
        let placed = layout::layout_arc(self.metrics.as_mut(), &font, arc, self.kerning, &text)?;
        for p in &placed {
            let draw = GlyphDraw {
                x: p.x,
                y: p.y,
                angle_deg: p.rotation_deg,
                size: arc.size,
                color,
            };
            self.metrics.draw_text(buf, &font, &draw, &p.text)?;
        }
        Ok(placed)
    }

    /// Draw a kerned straight run, returning each glyph's box.
    pub fn add_text_kerned(
        &mut self,
        buf: &mut RasterBuffer,
        text: &str,
        draw: &GlyphDraw,
        align: Align,
    ) -> EngraveResult<Vec<TextBox>> {
        let font = self.require_font()?;
        let text = self.fold(text).into_owned();
        layout::draw_kerned(
            self.metrics.as_mut(),
            buf,
            &font,
            draw,
            self.kerning,
            align,
            &text,
        )
    }

    /// Shrink the working font size until every line is at most `max_width` wide.
    pub fn fit_to_width<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        max_width: f32,
    ) -> EngraveResult<f32> {
        let font = self.require_font()?;
        let lines: Vec<String> = lines
            .iter()
            .map(|l| self.fold(l.as_ref()).into_owned())
            .collect();
        self.font_size = fit::fit_to_width(
            self.metrics.as_mut(),
            &font,
            &lines,
            max_width,
            self.font_size,
        )?;
        Ok(self.font_size)
    }

    /// Shrink the working line spacing and font size until `num_lines` lines fit
    /// `max_height`. Check [`FitHeight::fits`]: the search may stop at the size floor.
    pub fn fit_to_height(
        &mut self,
        num_lines: u32,
        max_height: f32,
        current_height: f32,
    ) -> FitHeight {
        let fit = fit::fit_to_height(
            num_lines,
            max_height,
            current_height,
            self.font_size,
            self.linespacing,
        );
        self.font_size = fit.font_size;
        self.linespacing = fit.linespacing;
        fit
    }

    /// Font size whose sample line fits `height`.
    pub fn fit_text_height(&mut self, height: f32) -> EngraveResult<TextFit> {
        let font = self.require_font()?;
        fit::fit_text_height(self.metrics.as_mut(), &font, height)
    }

    fn engrave_row(
        &mut self,
        buf: &mut RasterBuffer,
        row: &RowSpec,
        text: &str,
        size: f32,
    ) -> EngraveResult<()> {
        let color = self.font_color;
        match row.style {
            RowStyle::Arc => {
                let arc = ArcSpec {
                    cx: row.cx,
                    cy: row.cy,
                    radius: row.radius,
                    start_deg: row.angle,
                    size,
                };
                self.add_text_arc(buf, text, &arc, color)?;
            }
            RowStyle::Line => {
                let mut draw = GlyphDraw {
                    x: row.cx,
                    y: row.cy,
                    angle_deg: row.angle,
                    size,
                    color,
                };
                if self.use_kerning {
                    self.add_text_kerned(buf, text, &draw, row.align)?;
                } else {
                    let width = self.text_box(text, size)?.width();
                    draw.x = layout::aligned_start_x(row.cx, width, row.align);
                    self.add_text(buf, text, &draw)?;
                }
            }
        }
        Ok(())
    }

    /// Draw every row that has text. Returns how many rows were drawn.
    ///
    /// Rows are independent: one that fails to lay out or draw is logged and skipped. Only a
    /// missing font fails the whole call, before anything is drawn.
    pub fn engrave(&mut self, buf: &mut RasterBuffer) -> EngraveResult<usize> {
        self.require_font()?;
        let rows = self.rows.clone();
        let lines = self.text.clone();
        let mut drawn = 0;

        for (i, (row, text)) in rows.iter().zip(&lines).enumerate() {
            if text.is_empty() {
                continue;
            }
            let size = row.size + self.font_size_adj;
            if size.is_nan() || size <= 0.0 {
                tracing::warn!(row = i, size, "skipping row with non-positive size");
                continue;
            }
            match self.engrave_row(buf, row, text, size) {
                Ok(()) => drawn += 1,
                Err(e) => {
                    tracing::warn!(row = i, error = %e, "skipping row that failed to draw");
                }
            }
        }

        tracing::debug!(drawn, rows = rows.len(), "engraving done");
        Ok(drawn)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engraver.rs"]
mod tests;
