use crate::{foundation::color::round_channel, raster::buffer::RasterBuffer};

const MAX_AMOUNT: f32 = 500.0;
const AMOUNT_SCALE: f32 = 0.016;
const MAX_RADIUS: f32 = 50.0;
const MAX_THRESHOLD: f32 = 255.0;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Calibrated unsharp-mask parameters.
///
/// Raw inputs are capped, never rejected: amount at `500` then scaled by `0.016` (a negative
/// amount softens instead of sharpening), radius at `50` then doubled, rounded and made positive
/// (a radius that rounds to 0 disables the filter), threshold to `0..=255`.
pub struct UnsharpMask {
    amount: f32,
    radius: u32,
    threshold: u8,
}

impl UnsharpMask {
    /// Calibrate raw user parameters.
    pub fn new(amount: f32, radius: f32, threshold: f32) -> Self {
        let finite = |v: f32| if v.is_nan() { 0.0 } else { v };
        Self {
            amount: finite(amount).min(MAX_AMOUNT) * AMOUNT_SCALE,
            radius: (finite(radius).min(MAX_RADIUS) * 2.0).round().abs() as u32,
            threshold: finite(threshold).clamp(0.0, MAX_THRESHOLD).round() as u8,
        }
    }

    /// Scaled sharpening amount.
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Blur passes.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Minimum per-channel difference that gets sharpened; 0 sharpens everything.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// `true` when applying the mask cannot change any pixel.
    pub fn is_noop(&self) -> bool {
        self.radius == 0
    }

    /// Combine `buf` with its blurred copy in place. Alpha is left untouched.
    pub(crate) fn sharpen(&self, buf: &mut RasterBuffer, blurred: &RasterBuffer) {
        for (orig, blur) in buf.pixels_mut().iter_mut().zip(blurred.pixels()) {
            *orig = orig.with_rgb(
                self.channel(orig.r(), blur.r()),
                self.channel(orig.g(), blur.g()),
                self.channel(orig.b(), blur.b()),
            );
        }
    }

    fn channel(&self, orig: u8, blur: u8) -> u8 {
        let diff = i32::from(orig) - i32::from(blur);
        if self.threshold > 0 && diff.unsigned_abs() < u32::from(self.threshold) {
            return orig;
        }
        round_channel(self.amount * diff as f32 + f32::from(orig))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/unsharp.rs"]
mod tests;
