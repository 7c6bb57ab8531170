use crate::{
    filters::{
        capability::FilterCapability, engine::FilterEngine, kernel::Kernel3, point::ColorDelta,
    },
    foundation::{
        color::Color,
        error::{EngraveError, EngraveResult},
    },
    raster::buffer::RasterBuffer,
    text::{
        engraver::TextEngraver,
        layout::{Align, ArcSpec, GlyphPlacement},
        metrics::{GlyphDraw, TextBox},
    },
};

/// One processing session: the current buffer, the filter engine chosen for this session's
/// capabilities, and optionally a text engraver.
///
/// Filters mutate the current buffer in place. Operations that build a new buffer (masks,
/// [`Session::replace`]) swap it in and release the old one, so the session never exposes a
/// half-built image.
#[derive(Debug)]
pub struct Session {
    engine: FilterEngine,
    current: Option<RasterBuffer>,
    engraver: Option<TextEngraver>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FilterCapability::probe())
    }
}

impl Session {
    /// Empty session with a filter engine for `capability`.
    pub fn new(capability: FilterCapability) -> Self {
        Self {
            engine: FilterEngine::new(capability),
            current: None,
            engraver: None,
        }
    }

    /// Session starting from an existing buffer.
    pub fn with_buffer(capability: FilterCapability, buffer: RasterBuffer) -> Self {
        let mut session = Self::new(capability);
        session.current = Some(buffer);
        session
    }

    /// Filter engine used by this session.
    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// Replace the current buffer with a new `width × height` one filled with `background`.
    pub fn create(&mut self, width: u32, height: u32, background: Color) -> EngraveResult<()> {
        self.replace(RasterBuffer::new(width, height, background)?);
        Ok(())
    }

    /// Make a decoded image the current buffer.
    pub fn import_image(&mut self, img: &image::DynamicImage) -> EngraveResult<()> {
        self.replace(RasterBuffer::from_dynamic(img)?);
        Ok(())
    }

    /// Export the current buffer for an encoder.
    pub fn export_image(&self) -> EngraveResult<image::RgbaImage> {
        Ok(self.buffer()?.to_rgba_image())
    }

    /// Current buffer.
    pub fn buffer(&self) -> EngraveResult<&RasterBuffer> {
        self.current
            .as_ref()
            .ok_or_else(|| EngraveError::configuration("session has no current buffer"))
    }

    /// Swap in `buffer`, returning the previous one.
    pub fn replace(&mut self, buffer: RasterBuffer) -> Option<RasterBuffer> {
        self.current.replace(buffer)
    }

    /// Take the current buffer out of the session.
    pub fn take(&mut self) -> Option<RasterBuffer> {
        self.current.take()
    }

    /// Attach the text engraver used by the text operations.
    pub fn attach_engraver(&mut self, engraver: TextEngraver) -> Option<TextEngraver> {
        self.engraver.replace(engraver)
    }

    /// Attached text engraver.
    pub fn engraver(&self) -> Option<&TextEngraver> {
        self.engraver.as_ref()
    }

    /// Attached text engraver, mutably (for settings).
    pub fn engraver_mut(&mut self) -> Option<&mut TextEngraver> {
        self.engraver.as_mut()
    }

    fn with_filter(
        &mut self,
        f: impl FnOnce(&FilterEngine, &mut RasterBuffer) -> EngraveResult<()>,
    ) -> EngraveResult<()> {
        let buf = self
            .current
            .as_mut()
            .ok_or_else(|| EngraveError::configuration("session has no current buffer"))?;
        f(&self.engine, buf)
    }

    fn with_text<T>(
        &mut self,
        f: impl FnOnce(&mut TextEngraver, &mut RasterBuffer) -> EngraveResult<T>,
    ) -> EngraveResult<T> {
        let Some(engraver) = self.engraver.as_mut() else {
            tracing::warn!("text operation skipped: no text engraver attached");
            return Err(EngraveError::configuration("no text engraver attached"));
        };
        let buf = self
            .current
            .as_mut()
            .ok_or_else(|| EngraveError::configuration("session has no current buffer"))?;
        f(engraver, buf)
    }

    /// See [`FilterEngine::grayscale`].
    #[tracing::instrument(skip(self))]
    pub fn grayscale(&mut self) -> EngraveResult<()> {
        self.with_filter(|e, b| e.grayscale(b))
    }

    /// See [`FilterEngine::sepia`].
    #[tracing::instrument(skip(self))]
    pub fn sepia(&mut self) -> EngraveResult<()> {
        self.with_filter(|e, b| e.sepia(b))
    }

    /// See [`FilterEngine::colorize`].
    #[tracing::instrument(skip(self))]
    pub fn colorize(&mut self, delta: ColorDelta) -> EngraveResult<()> {
        self.with_filter(|e, b| e.colorize(b, delta))
    }

    /// See [`FilterEngine::grade`].
    #[tracing::instrument(skip(self))]
    pub fn grade(&mut self, color: Color) -> EngraveResult<()> {
        self.with_filter(|e, b| e.grade(b, color))
    }

    /// See [`FilterEngine::tint`].
    #[tracing::instrument(skip(self))]
    pub fn tint(&mut self, color: Color) -> EngraveResult<()> {
        self.with_filter(|e, b| e.tint(b, color))
    }

    /// See [`FilterEngine::tone`].
    #[tracing::instrument(skip(self))]
    pub fn tone(&mut self, color: Color) -> EngraveResult<()> {
        self.with_filter(|e, b| e.tone(b, color))
    }

    /// See [`FilterEngine::invert`].
    #[tracing::instrument(skip(self))]
    pub fn invert(&mut self) -> EngraveResult<()> {
        self.with_filter(|e, b| e.invert(b))
    }

    /// See [`FilterEngine::contrast`].
    #[tracing::instrument(skip(self))]
    pub fn contrast(&mut self, level: f32) -> EngraveResult<()> {
        self.with_filter(|e, b| e.contrast(b, level))
    }

    /// See [`FilterEngine::edge_detect`].
    #[tracing::instrument(skip(self))]
    pub fn edge_detect(&mut self) -> EngraveResult<()> {
        self.with_filter(|e, b| e.edge_detect(b))
    }

    /// See [`FilterEngine::mean_removal`].
    #[tracing::instrument(skip(self))]
    pub fn mean_removal(&mut self) -> EngraveResult<()> {
        self.with_filter(|e, b| e.mean_removal(b))
    }

    /// See [`FilterEngine::convolve`].
    #[tracing::instrument(skip(self))]
    pub fn convolve(&mut self, kernel: &Kernel3) -> EngraveResult<()> {
        self.with_filter(|e, b| e.convolve(b, kernel))
    }

    /// See [`FilterEngine::pixelate`].
    #[tracing::instrument(skip(self))]
    pub fn pixelate(&mut self, block: i32, advanced: bool) -> EngraveResult<()> {
        self.with_filter(|e, b| e.pixelate(b, block, advanced))
    }

    /// See [`FilterEngine::overlay`].
    #[tracing::instrument(skip(self, top))]
    pub fn overlay(&mut self, top: &RasterBuffer, x: i64, y: i64) -> EngraveResult<()> {
        self.with_filter(|e, b| e.overlay(b, top, x, y))
    }

    /// See [`FilterEngine::double_overlay`].
    #[tracing::instrument(skip(self, top))]
    pub fn double_overlay(&mut self, top: &RasterBuffer, x: i64, y: i64) -> EngraveResult<()> {
        self.with_filter(|e, b| e.double_overlay(b, top, x, y))
    }

    /// See [`FilterEngine::unsharp_mask`].
    #[tracing::instrument(skip(self))]
    pub fn unsharp_mask(&mut self, amount: f32, radius: f32, threshold: f32) -> EngraveResult<()> {
        self.with_filter(|e, b| e.unsharp_mask(b, amount, radius, threshold))
    }

    /// Replace the current buffer with a copy whose alpha follows `mask`'s alpha channel.
    #[tracing::instrument(skip(self, mask))]
    pub fn apply_alpha(&mut self, mask: RasterBuffer) -> EngraveResult<()> {
        let next = self.engine.apply_alpha(self.buffer()?, mask)?;
        self.replace(next);
        Ok(())
    }

    /// Replace the current buffer with a copy whose alpha follows `mask`'s luma.
    #[tracing::instrument(skip(self, mask))]
    pub fn apply_mask(&mut self, mask: RasterBuffer) -> EngraveResult<()> {
        let next = self.engine.apply_mask(self.buffer()?, mask)?;
        self.replace(next);
        Ok(())
    }

    /// See [`TextEngraver::add_text`].
    #[tracing::instrument(skip(self))]
    pub fn add_text(&mut self, text: &str, draw: &GlyphDraw) -> EngraveResult<TextBox> {
        self.with_text(|t, b| t.add_text(b, text, draw))
    }

    /// See [`TextEngraver::add_text_arc`].
    #[tracing::instrument(skip(self))]
    pub fn add_text_arc(
        &mut self,
        text: &str,
        arc: &ArcSpec,
        color: Color,
    ) -> EngraveResult<Vec<GlyphPlacement>> {
        self.with_text(|t, b| t.add_text_arc(b, text, arc, color))
    }

    /// See [`TextEngraver::add_text_kerned`].
    #[tracing::instrument(skip(self))]
    pub fn add_text_kerned(
        &mut self,
        text: &str,
        draw: &GlyphDraw,
        align: Align,
    ) -> EngraveResult<Vec<TextBox>> {
        self.with_text(|t, b| t.add_text_kerned(b, text, draw, align))
    }

    /// Draw the attached engraver's rows onto the current buffer.
    #[tracing::instrument(skip(self))]
    pub fn engrave(&mut self) -> EngraveResult<usize> {
        self.with_text(|t, b| t.engrave(b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engrave_session.rs"]
mod tests;
