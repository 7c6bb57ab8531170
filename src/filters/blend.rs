use crate::{
    foundation::{
        color::{ALPHA_MAX, Color, clamp_alpha, mul_div255},
        error::EngraveResult,
    },
    raster::buffer::RasterBuffer,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MultiplyMode {
    /// `base · (top / 255)`
    Single,
    /// `base · (top / 255)²`
    Double,
}

fn multiply(base: u8, top: u8, mode: MultiplyMode) -> u8 {
    match mode {
        MultiplyMode::Single => mul_div255(base, top),
        MultiplyMode::Double => {
            let t = u32::from(top);
            ((u32::from(base) * t * t + 32_512) / 65_025).min(255) as u8
        }
    }
}

/// Multiply-blend `top` onto `base` with its top-left corner at `(dx, dy)`. Pixels of `top`
/// that land outside `base` are skipped. Alphas add, saturating at fully transparent.
pub(crate) fn overlay(
    base: &mut RasterBuffer,
    top: &RasterBuffer,
    dx: i64,
    dy: i64,
    mode: MultiplyMode,
) {
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));
    for ty in 0..top.height() {
        let y = dy + i64::from(ty);
        if !(0..bh).contains(&y) {
            continue;
        }
        for tx in 0..top.width() {
            let x = dx + i64::from(tx);
            if !(0..bw).contains(&x) {
                continue;
            }
            let (Some(b), Some(t)) = (base.get(x as u32, y as u32), top.get(tx, ty)) else {
                continue;
            };
            let out = Color::new(
                multiply(b.r(), t.r(), mode),
                multiply(b.g(), t.g(), mode),
                multiply(b.b(), t.b(), mode),
                clamp_alpha(i32::from(b.a()) + i32::from(t.a())),
            );
            base.set(x as u32, y as u32, out);
        }
    }
}

/// Resize a mask to the target's dimensions. The passed mask is consumed either way.
fn fit_mask(target: &RasterBuffer, mask: RasterBuffer) -> EngraveResult<RasterBuffer> {
    if mask.dimensions() == target.dimensions() {
        return Ok(mask);
    }
    let (w, h) = target.dimensions();
    mask.resampled(w, h)
}

/// New buffer with `target`'s colors and `max(mask alpha, target alpha)`.
pub(crate) fn apply_alpha(
    target: &RasterBuffer,
    mask: RasterBuffer,
) -> EngraveResult<RasterBuffer> {
    let mask = fit_mask(target, mask)?;
    let pixels = target
        .pixels()
        .iter()
        .zip(mask.pixels())
        .map(|(c, m)| c.with_alpha(c.a().max(m.a())))
        .collect();
    RasterBuffer::from_pixels(target.width(), target.height(), pixels)
}

/// New buffer whose alpha follows the mask's luma: white keeps the target opaque, black
/// makes it transparent, and a more transparent target alpha always wins.
pub(crate) fn apply_mask(
    target: &RasterBuffer,
    mask: RasterBuffer,
) -> EngraveResult<RasterBuffer> {
    let mask = fit_mask(target, mask)?;
    let pixels = target
        .pixels()
        .iter()
        .zip(mask.pixels())
        .map(|(c, m)| {
            let from_mask = ALPHA_MAX - m.luma() / 2;
            c.with_alpha(from_mask.max(c.a()))
        })
        .collect();
    RasterBuffer::from_pixels(target.width(), target.height(), pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/filters/blend.rs"]
mod tests;
