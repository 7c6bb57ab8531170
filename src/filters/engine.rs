use crate::{
    filters::{
        blend::{self, MultiplyMode},
        capability::FilterCapability,
        kernel::{Convolver, Kernel3, NativeConvolver, ReferenceConvolver},
        point::{ColorDelta, NativePoint, PointFilters, ReferencePoint},
        tone,
        unsharp::UnsharpMask,
    },
    foundation::{
        color::Color,
        error::{EngraveError, EngraveResult},
    },
    raster::buffer::RasterBuffer,
};

/// Filter library bound to one [`FilterCapability`].
///
/// The accelerated or reference implementation of each filter family is selected once in
/// [`FilterEngine::new`]; individual filters never look at the capability again. Every filter
/// validates its inputs before touching a pixel, so a failed call leaves the buffer as it was.
#[derive(Debug)]
pub struct FilterEngine {
    capability: FilterCapability,
    point: Box<dyn PointFilters>,
    convolver: Box<dyn Convolver>,
}

impl FilterEngine {
    /// Engine for the given capability set.
    pub fn new(capability: FilterCapability) -> Self {
        let point: Box<dyn PointFilters> = if capability.single_pass {
            Box::new(NativePoint)
        } else {
            Box::new(ReferencePoint)
        };
        let convolver: Box<dyn Convolver> = if capability.convolution {
            Box::new(NativeConvolver)
        } else {
            Box::new(ReferenceConvolver)
        };
        tracing::debug!(
            point = point.name(),
            convolution = convolver.name(),
            "filter engine ready"
        );
        Self {
            capability,
            point,
            convolver,
        }
    }

    /// Engine that only uses the portable reference paths.
    pub fn reference() -> Self {
        Self::new(FilterCapability::NONE)
    }

    /// Capability set this engine was built with.
    pub fn capability(&self) -> FilterCapability {
        self.capability
    }

    /// Replace each pixel with its luma.
    pub fn grayscale(&self, buf: &mut RasterBuffer) -> EngraveResult<()> {
        buf.validate()?;
        self.point.grayscale(buf);
        Ok(())
    }

    /// Grayscale followed by the sepia offsets `(+36, −10, −42)`.
    pub fn sepia(&self, buf: &mut RasterBuffer) -> EngraveResult<()> {
        buf.validate()?;
        self.point.sepia(buf);
        Ok(())
    }

    /// Add per-channel offsets, saturating.
    pub fn colorize(&self, buf: &mut RasterBuffer, delta: ColorDelta) -> EngraveResult<()> {
        buf.validate()?;
        self.point.colorize(buf, delta);
        Ok(())
    }

    /// Multiplicative tint toward `color`.
    pub fn grade(&self, buf: &mut RasterBuffer, color: Color) -> EngraveResult<()> {
        buf.validate()?;
        tone::grade(buf, color);
        Ok(())
    }

    /// Replace whites with `color`.
    pub fn tint(&self, buf: &mut RasterBuffer, color: Color) -> EngraveResult<()> {
        buf.validate()?;
        tone::tint(buf, color);
        Ok(())
    }

    /// Replace blacks with `color`.
    pub fn tone(&self, buf: &mut RasterBuffer, color: Color) -> EngraveResult<()> {
        buf.validate()?;
        tone::tone(buf, color);
        Ok(())
    }

    /// `255 − c` on every color channel.
    pub fn invert(&self, buf: &mut RasterBuffer) -> EngraveResult<()> {
        buf.validate()?;
        self.point.invert(buf);
        Ok(())
    }

    /// Contrast adjustment, `level` clamped to `-100..=100` (negative is more contrast).
    pub fn contrast(&self, buf: &mut RasterBuffer, level: f32) -> EngraveResult<()> {
        buf.validate()?;
        self.point.contrast(buf, level);
        Ok(())
    }

    /// Laplacian edge detection.
    pub fn edge_detect(&self, buf: &mut RasterBuffer) -> EngraveResult<()> {
        buf.validate()?;
        self.convolver.edge_detect(buf);
        Ok(())
    }

    /// Mean removal sharpen.
    pub fn mean_removal(&self, buf: &mut RasterBuffer) -> EngraveResult<()> {
        self.convolve(buf, &Kernel3::MEAN_REMOVAL)
    }

    /// Apply an arbitrary 3×3 kernel.
    pub fn convolve(&self, buf: &mut RasterBuffer, kernel: &Kernel3) -> EngraveResult<()> {
        buf.validate()?;
        self.convolver.convolve(buf, kernel);
        Ok(())
    }

    /// Fill `block × block` tiles with one color: the tile's top-left pixel, or with
    /// `advanced` the rounded average of the whole tile.
    pub fn pixelate(
        &self,
        buf: &mut RasterBuffer,
        block: i32,
        advanced: bool,
    ) -> EngraveResult<()> {
        buf.validate()?;
        let block = u32::try_from(block)
            .ok()
            .filter(|b| *b > 0)
            .ok_or_else(|| {
                EngraveError::out_of_range(format!("pixelate block size must be > 0, got {block}"))
            })?;
        if block == 1 {
            return Ok(());
        }
        self.point.pixelate(buf, block, advanced);
        Ok(())
    }

    /// Multiply-blend `top` onto `base` at `(x, y)`.
    pub fn overlay(
        &self,
        base: &mut RasterBuffer,
        top: &RasterBuffer,
        x: i64,
        y: i64,
    ) -> EngraveResult<()> {
        base.validate()?;
        top.validate()?;
        blend::overlay(base, top, x, y, MultiplyMode::Single);
        Ok(())
    }

    /// Like [`FilterEngine::overlay`] with the top factor squared.
    pub fn double_overlay(
        &self,
        base: &mut RasterBuffer,
        top: &RasterBuffer,
        x: i64,
        y: i64,
    ) -> EngraveResult<()> {
        base.validate()?;
        top.validate()?;
        blend::overlay(base, top, x, y, MultiplyMode::Double);
        Ok(())
    }

    /// Unsharp mask with raw parameters, see [`UnsharpMask::new`] for the calibration.
    pub fn unsharp_mask(
        &self,
        buf: &mut RasterBuffer,
        amount: f32,
        radius: f32,
        threshold: f32,
    ) -> EngraveResult<()> {
        buf.validate()?;
        let mask = UnsharpMask::new(amount, radius, threshold);
        if mask.is_noop() {
            return Ok(());
        }
        let mut blurred = buf.clone();
        self.convolver.gaussian_blur(&mut blurred, mask.radius());
        mask.sharpen(buf, &blurred);
        Ok(())
    }

    /// Build a copy of `target` whose alpha is at least the (resized) mask's alpha.
    pub fn apply_alpha(
        &self,
        target: &RasterBuffer,
        mask: RasterBuffer,
    ) -> EngraveResult<RasterBuffer> {
        target.validate()?;
        mask.validate()?;
        blend::apply_alpha(target, mask)
    }

    /// Build a copy of `target` whose alpha follows the (resized) mask's luma.
    pub fn apply_mask(
        &self,
        target: &RasterBuffer,
        mask: RasterBuffer,
    ) -> EngraveResult<RasterBuffer> {
        target.validate()?;
        mask.validate()?;
        blend::apply_mask(target, mask)
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(FilterCapability::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/engine.rs"]
mod tests;
