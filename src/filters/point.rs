use crate::{
    foundation::color::{ALPHA_MAX, Color, clamp_alpha, clamp_channel, round_channel},
    raster::buffer::RasterBuffer,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Signed per-channel offsets for [`crate::FilterEngine::colorize`].
pub struct ColorDelta {
    /// Red offset.
    pub r: i32,
    /// Green offset.
    pub g: i32,
    /// Blue offset.
    pub b: i32,
    /// Alpha offset (alpha saturates to `0..=127`).
    pub a: i32,
}

impl ColorDelta {
    /// Offsets with no alpha change.
    pub const fn rgb(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b, a: 0 }
    }
}

/// Offsets applied on top of grayscale to get sepia.
pub(crate) const SEPIA: ColorDelta = ColorDelta::rgb(36, -10, -42);

/// Single-pass per-pixel filters. Inputs are already validated by the engine.
pub(crate) trait PointFilters: std::fmt::Debug {
    fn name(&self) -> &'static str;
    fn grayscale(&self, buf: &mut RasterBuffer);
    fn sepia(&self, buf: &mut RasterBuffer);
    fn colorize(&self, buf: &mut RasterBuffer, delta: ColorDelta);
    fn invert(&self, buf: &mut RasterBuffer);
    fn contrast(&self, buf: &mut RasterBuffer, level: f32);
    fn pixelate(&self, buf: &mut RasterBuffer, block: u32, advanced: bool);
}

/// Contrast gain for `level` in `-100..=100`, negative meaning more contrast.
///
/// The level is rescaled onto the ±255 domain of `259(C+255) / 255(259−C)`, so `0` is the
/// identity, `100` collapses to mid gray and `-100` is a finite, steep curve.
pub(crate) fn contrast_factor(level: f32) -> f32 {
    let level = if level.is_nan() {
        0.0
    } else {
        level.clamp(-100.0, 100.0)
    };
    let c = -level * 2.55;
    (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
}

pub(crate) fn contrast_channel(factor: f32, c: u8) -> u8 {
    round_channel(factor * (f32::from(c) - 128.0) + 128.0)
}

fn sepia_pixel(c: Color) -> Color {
    let k = i32::from(c.luma());
    Color::saturating(k + SEPIA.r, k + SEPIA.g, k + SEPIA.b, i32::from(c.a()))
}

fn rounded_avg(sum: u64, n: u64) -> u8 {
    ((sum + n / 2) / n) as u8
}

#[derive(Debug, Default)]
/// Portable per-pixel implementation: coordinate loops, one pixel read and one write at a time.
pub(crate) struct ReferencePoint;

impl ReferencePoint {
    fn map(buf: &mut RasterBuffer, mut f: impl FnMut(Color) -> Color) {
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if let Some(c) = buf.get(x, y) {
                    buf.set(x, y, f(c));
                }
            }
        }
    }
}

impl PointFilters for ReferencePoint {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn grayscale(&self, buf: &mut RasterBuffer) {
        Self::map(buf, |c| {
            let k = c.luma();
            c.with_rgb(k, k, k)
        });
    }

    fn sepia(&self, buf: &mut RasterBuffer) {
        Self::map(buf, sepia_pixel);
    }

    fn colorize(&self, buf: &mut RasterBuffer, d: ColorDelta) {
        Self::map(buf, |c| {
            Color::saturating(
                i32::from(c.r()) + d.r,
                i32::from(c.g()) + d.g,
                i32::from(c.b()) + d.b,
                i32::from(c.a()) + d.a,
            )
        });
    }

    fn invert(&self, buf: &mut RasterBuffer) {
        Self::map(buf, |c| c.with_rgb(255 - c.r(), 255 - c.g(), 255 - c.b()));
    }

    fn contrast(&self, buf: &mut RasterBuffer, level: f32) {
        let f = contrast_factor(level);
        Self::map(buf, |c| {
            c.with_rgb(
                contrast_channel(f, c.r()),
                contrast_channel(f, c.g()),
                contrast_channel(f, c.b()),
            )
        });
    }

    fn pixelate(&self, buf: &mut RasterBuffer, block: u32, advanced: bool) {
        let src = buf.clone();
        let (w, h) = src.dimensions();
        let samples = if advanced { block } else { 1 };

        for ty in (0..h).step_by(block as usize) {
            for tx in (0..w).step_by(block as usize) {
                let mut sum = [0u64; 4];
                let mut n = 0u64;
                for y0 in 0..samples {
                    for x0 in 0..samples {
                        let Some(c) = src.get(tx + x0, ty + y0) else {
                            continue;
                        };
                        sum[0] += u64::from(c.r());
                        sum[1] += u64::from(c.g());
                        sum[2] += u64::from(c.b());
                        sum[3] += u64::from(c.a());
                        n += 1;
                    }
                }
                let fill = Color::new(
                    rounded_avg(sum[0], n),
                    rounded_avg(sum[1], n),
                    rounded_avg(sum[2], n),
                    rounded_avg(sum[3], n),
                );
                for y in ty..(ty + block).min(h) {
                    for x in tx..(tx + block).min(w) {
                        buf.set(x, y, fill);
                    }
                }
            }
        }
    }
}

/// 256-entry lookup table for one channel.
struct ChannelLut([u8; 256]);

impl ChannelLut {
    fn build(f: impl Fn(u8) -> u8) -> Self {
        let mut t = [0u8; 256];
        for (v, slot) in t.iter_mut().enumerate() {
            *slot = f(v as u8);
        }
        Self(t)
    }

    fn offset(d: i32) -> Self {
        Self::build(|v| clamp_channel(i32::from(v) + d))
    }

    fn get(&self, v: u8) -> u8 {
        self.0[usize::from(v)]
    }
}

#[derive(Debug, Default)]
/// Accelerated implementation: straight slice passes with lookup tables, no per-pixel
/// bounds checks.
pub(crate) struct NativePoint;

impl PointFilters for NativePoint {
    fn name(&self) -> &'static str {
        "native"
    }

    fn grayscale(&self, buf: &mut RasterBuffer) {
        for c in buf.pixels_mut() {
            let k = c.luma();
            *c = c.with_rgb(k, k, k);
        }
    }

    fn sepia(&self, buf: &mut RasterBuffer) {
        self.grayscale(buf);
        self.colorize(buf, SEPIA);
    }

    fn colorize(&self, buf: &mut RasterBuffer, d: ColorDelta) {
        let (r, g, b) = (
            ChannelLut::offset(d.r),
            ChannelLut::offset(d.g),
            ChannelLut::offset(d.b),
        );
        let mut a = [0u8; ALPHA_MAX as usize + 1];
        for (v, slot) in a.iter_mut().enumerate() {
            *slot = clamp_alpha(v as i32 + d.a);
        }
        for c in buf.pixels_mut() {
            *c = Color::new(
                r.get(c.r()),
                g.get(c.g()),
                b.get(c.b()),
                a[usize::from(c.a())],
            );
        }
    }

    fn invert(&self, buf: &mut RasterBuffer) {
        for c in buf.pixels_mut() {
            *c = Color::from_argb(c.argb() ^ 0x00FF_FFFF);
        }
    }

    fn contrast(&self, buf: &mut RasterBuffer, level: f32) {
        let f = contrast_factor(level);
        let lut = ChannelLut::build(|v| contrast_channel(f, v));
        for c in buf.pixels_mut() {
            *c = c.with_rgb(lut.get(c.r()), lut.get(c.g()), lut.get(c.b()));
        }
    }

    fn pixelate(&self, buf: &mut RasterBuffer, block: u32, advanced: bool) {
        let w = buf.width() as usize;
        let h = buf.height() as usize;
        let block = block as usize;
        let src = buf.pixels().to_vec();
        let out = buf.pixels_mut();

        for ty in (0..h).step_by(block) {
            let tile_h = block.min(h - ty);
            let sample_h = if advanced { tile_h } else { 1 };
            for tx in (0..w).step_by(block) {
                let tile_w = block.min(w - tx);
                let sample_w = if advanced { tile_w } else { 1 };

                let mut sum = [0u64; 4];
                for row in src[ty * w..].chunks(w).take(sample_h) {
                    for c in &row[tx..tx + sample_w] {
                        sum[0] += u64::from(c.r());
                        sum[1] += u64::from(c.g());
                        sum[2] += u64::from(c.b());
                        sum[3] += u64::from(c.a());
                    }
                }
                let n = (sample_w * sample_h) as u64;
                let fill = Color::new(
                    rounded_avg(sum[0], n),
                    rounded_avg(sum[1], n),
                    rounded_avg(sum[2], n),
                    rounded_avg(sum[3], n),
                );
                for row in out[ty * w..].chunks_mut(w).take(tile_h) {
                    row[tx..tx + tile_w].fill(fill);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/point.rs"]
mod tests;
