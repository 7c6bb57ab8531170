use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::{color::Color, error::EngraveResult},
    raster::buffer::RasterBuffer,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Text bounding box as four corners in image coordinates (y down), relative to the baseline
/// origin unless translated: `[llx, lly, lrx, lry, urx, ury, ulx, uly]`.
pub struct TextBox(pub [f32; 8]);

impl TextBox {
    /// Upright box for text `width` wide reaching `ascent` above and `descent` below the
    /// baseline.
    pub fn from_extent(width: f32, ascent: f32, descent: f32) -> Self {
        Self([0.0, descent, width, descent, width, -ascent, 0.0, -ascent])
    }

    /// Horizontal extent of the bottom edge, `|lrx − llx|`.
    pub fn width(&self) -> f32 {
        (self.0[2] - self.0[0]).abs()
    }

    /// `|uly − lly|`.
    pub fn height(&self) -> f32 {
        (self.0[7] - self.0[1]).abs()
    }

    /// Lower-right corner.
    pub fn lower_right(&self) -> (f32, f32) {
        (self.0[2], self.0[3])
    }

    /// Box shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        let mut c = self.0;
        for p in c.chunks_exact_mut(2) {
            p[0] += dx;
            p[1] += dy;
        }
        Self(c)
    }

    /// Box rotated about the origin by `angle_deg`, counter-clockwise as seen on screen.
    pub fn rotated(&self, angle_deg: f32) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        let mut out = self.0;
        for p in out.chunks_exact_mut(2) {
            let (x, y) = (p[0], p[1]);
            p[0] = x * c + y * s;
            p[1] = -x * s + y * c;
        }
        Self(out)
    }

    /// `(min_x, min_y, max_x, max_y)` over the four corners.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let mut b = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for p in self.0.chunks_exact(2) {
            b.0 = b.0.min(p[0]);
            b.1 = b.1.min(p[1]);
            b.2 = b.2.max(p[0]);
            b.3 = b.3.max(p[1]);
        }
        b
    }
}

#[derive(Clone)]
/// Loaded font file.
pub struct FontFace {
    name: String,
    path: Option<PathBuf>,
    bytes: Arc<Vec<u8>>,
}

impl FontFace {
    /// Read a font file from disk.
    pub fn load(path: impl AsRef<Path>) -> EngraveResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            bytes: Arc::new(bytes),
        })
    }

    /// Wrap font bytes already in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            path: None,
            bytes: Arc::new(bytes),
        }
    }

    /// Display name (file stem for loaded fonts).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source path, if loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Raw font data.
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where and how to draw one text run.
pub struct GlyphDraw {
    /// Baseline origin x.
    pub x: f32,
    /// Baseline origin y.
    pub y: f32,
    /// Counter-clockwise rotation about the origin, in degrees.
    pub angle_deg: f32,
    /// Point size.
    pub size: f32,
    /// Fill color; its alpha scales the glyph coverage.
    pub color: Color,
}

/// Glyph measurement and rasterization service consumed by the layout engine.
pub trait GlyphMetrics {
    /// Upright bounding box of `text` at `size`, relative to its baseline origin.
    fn text_box(&mut self, font: &FontFace, size: f32, text: &str) -> EngraveResult<TextBox>;

    /// Draw `text` onto `buf` and return the box it covers in buffer coordinates.
    fn draw_text(
        &mut self,
        buf: &mut RasterBuffer,
        font: &FontFace,
        draw: &GlyphDraw,
        text: &str,
    ) -> EngraveResult<TextBox>;
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
