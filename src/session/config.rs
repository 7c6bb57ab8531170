use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        color::Color,
        error::{EngraveError, EngraveResult},
    },
    text::{
        engraver::{
            DEFAULT_FONT_SIZE, DEFAULT_KERNING, DEFAULT_LINESPACING, RowSpec, RowStyle,
            TextEngraver,
        },
        metrics::GlyphMetrics,
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Text settings and engraving rows, usually loaded from JSON.
pub struct EngraveConfig {
    /// Font name (from `available_fonts`) or font file path.
    pub font: Option<String>,
    /// Named font files.
    pub available_fonts: BTreeMap<String, PathBuf>,
    /// Kerning value.
    pub kerning: f32,
    /// Draw line rows glyph by glyph.
    pub use_kerning: bool,
    /// Line spacing in pixels.
    pub linespacing: f32,
    /// Working font size.
    pub font_size: f32,
    /// Points added to every row size.
    pub font_size_adj: f32,
    /// Packed `0xAARRGGBB` text color (7-bit alpha, 0 opaque).
    pub font_color: Color,
    /// Upper-case all text.
    pub uppercase_only: bool,
    /// Engraving rows.
    pub rows: Vec<RowSpec>,
    /// Engraving text, one entry per row.
    pub text: Vec<String>,
}

impl Default for EngraveConfig {
    fn default() -> Self {
        Self {
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
}

impl EngraveConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> EngraveResult<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| EngraveError::serde(format!("config JSON parse failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> EngraveResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Reject values no text operation could use.
    pub fn validate(&self) -> EngraveResult<()> {
        if !self.kerning.is_finite() {
            return Err(EngraveError::validation("kerning must be finite"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(EngraveError::validation("font_size must be finite and > 0"));
        }
        if !self.linespacing.is_finite() || self.linespacing < 0.0 {
            return Err(EngraveError::validation("linespacing must be finite and >= 0"));
        }
        for (i, row) in self.rows.iter().enumerate() {
            let values = [row.cx, row.cy, row.radius, row.angle, row.size];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(EngraveError::validation(format!(
                    "row {i} has a non-finite value"
                )));
            }
            if row.style == RowStyle::Arc && row.radius == 0.0 {
                return Err(EngraveError::validation(format!(
                    "row {i} is an arc row and needs a non-zero radius"
                )));
            }
        }
        Ok(())
    }

    /// Build an engraver with these settings over `metrics`.
    pub fn build_engraver(&self, metrics: Box<dyn GlyphMetrics>) -> EngraveResult<TextEngraver> {
        self.validate()?;
        let mut engraver = TextEngraver::new(metrics);
        engraver.add_available_fonts(self.available_fonts.clone(), true);
        if let Some(font) = &self.font {
            engraver.set_font(font)?;
        }
        engraver.set_kerning(self.kerning);
        engraver.use_kerning(self.use_kerning);
        engraver.set_linespacing(self.linespacing);
        engraver.set_font_size(self.font_size);
        engraver.adjust_font_size(self.font_size_adj);
        engraver.set_font_color(self.font_color);
        engraver.uppercase_only(self.uppercase_only);
        for row in &self.rows {
            engraver.add_row_info(*row);
        }
        engraver.set_engraving_text(self.text.iter().cloned());
        Ok(engraver)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
