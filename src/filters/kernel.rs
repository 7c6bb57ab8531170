use crate::{
    foundation::{
        color::{Color, luma_f32, round_channel},
        error::{EngraveError, EngraveResult},
    },
    raster::buffer::RasterBuffer,
};

#[derive(Clone, Copy, Debug, PartialEq)]
/// 3×3 convolution kernel: `out = Σ(weight · sample) / divisor + offset`, per color channel.
/// Samples outside the grid repeat the nearest edge pixel; alpha is taken from the center.
pub struct Kernel3 {
    weights: [[f32; 3]; 3],
    divisor: f32,
    offset: f32,
}

impl Kernel3 {
    /// Laplacian edge detector.
    pub const EDGE_DETECT: Self = Self {
        weights: [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]],
        divisor: 1.0,
        offset: 0.0,
    };

    /// Normalized 3×3 Gaussian.
    pub const GAUSSIAN: Self = Self {
        weights: [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]],
        divisor: 16.0,
        offset: 0.0,
    };

    /// Mean removal ("sketchy" sharpen).
    pub const MEAN_REMOVAL: Self = Self {
        weights: [[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]],
        divisor: 1.0,
        offset: 0.0,
    };

    /// Custom kernel. The divisor must be finite and non-zero.
    pub fn new(weights: [[f32; 3]; 3], divisor: f32, offset: f32) -> EngraveResult<Self> {
        if weights.iter().flatten().any(|w| !w.is_finite()) {
            return Err(EngraveError::validation("kernel weights must be finite"));
        }
        if !divisor.is_finite() || divisor == 0.0 {
            return Err(EngraveError::validation(
                "kernel divisor must be finite and non-zero",
            ));
        }
        if !offset.is_finite() {
            return Err(EngraveError::validation("kernel offset must be finite"));
        }
        Ok(Self {
            weights,
            divisor,
            offset,
        })
    }

    /// Row-major weights.
    pub fn weights(&self) -> [[f32; 3]; 3] {
        self.weights
    }

    /// Divisor applied to the weighted sum.
    pub fn divisor(&self) -> f32 {
        self.divisor
    }

    /// Offset added after division.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    fn finish(&self, acc: [f32; 3], center: Color) -> Color {
        let ch = |v: f32| round_channel(v / self.divisor + self.offset);
        center.with_rgb(ch(acc[0]), ch(acc[1]), ch(acc[2]))
    }
}

fn accumulate(acc: &mut [f32; 3], weight: f32, c: Color) {
    acc[0] += weight * f32::from(c.r());
    acc[1] += weight * f32::from(c.g());
    acc[2] += weight * f32::from(c.b());
}

/// Neighborhood filters. Every implementation reads from a snapshot of the input, never from
/// pixels already written in the same pass.
pub(crate) trait Convolver: std::fmt::Debug {
    fn name(&self) -> &'static str;
    fn convolve(&self, buf: &mut RasterBuffer, kernel: &Kernel3);
    fn edge_detect(&self, buf: &mut RasterBuffer);
    /// Gaussian blur used by the unsharp mask, `passes` being the calibrated radius.
    fn gaussian_blur(&self, buf: &mut RasterBuffer, passes: u32);
}

#[derive(Debug, Default)]
/// Portable implementation: edge-clamped coordinate reads from a cloned buffer.
pub(crate) struct ReferenceConvolver;

impl Convolver for ReferenceConvolver {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn convolve(&self, buf: &mut RasterBuffer, kernel: &Kernel3) {
        let src = buf.clone();
        for y in 0..src.height() {
            for x in 0..src.width() {
                let (xi, yi) = (i64::from(x), i64::from(y));
                let mut acc = [0.0f32; 3];
                for (ky, row) in kernel.weights.iter().enumerate() {
                    for (kx, &w) in row.iter().enumerate() {
                        let c = src.get_clamped(xi + kx as i64 - 1, yi + ky as i64 - 1);
                        accumulate(&mut acc, w, c);
                    }
                }
                buf.set(x, y, kernel.finish(acc, src.get_clamped(xi, yi)));
            }
        }
    }

    /// Luma-only Laplacian: `8·center − Σ neighbors`, saturated and written as gray.
    fn edge_detect(&self, buf: &mut RasterBuffer) {
        let src = buf.clone();
        for y in 0..src.height() {
            for x in 0..src.width() {
                let (xi, yi) = (i64::from(x), i64::from(y));
                let center = src.get_clamped(xi, yi);
                let mut gray = 8.0 * luma_f32(center);
                for (dx, dy) in NEIGHBORS {
                    gray -= luma_f32(src.get_clamped(xi + dx, yi + dy));
                }
                let g = round_channel(gray);
                buf.set(x, y, center.with_rgb(g, g, g));
            }
        }
    }

    fn gaussian_blur(&self, buf: &mut RasterBuffer, passes: u32) {
        for _ in 0..passes {
            self.convolve(buf, &Kernel3::GAUSSIAN);
        }
    }
}

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Default)]
/// Accelerated implementation: one fused pass over row slices.
pub(crate) struct NativeConvolver;

impl Convolver for NativeConvolver {
    fn name(&self) -> &'static str {
        "native"
    }

    fn convolve(&self, buf: &mut RasterBuffer, kernel: &Kernel3) {
        let w = buf.width() as usize;
        let h = buf.height() as usize;
        let src = buf.pixels().to_vec();
        let out = buf.pixels_mut();

        for y in 0..h {
            let rows =
                [y.saturating_sub(1), y, (y + 1).min(h - 1)].map(|r| &src[r * w..(r + 1) * w]);
            for x in 0..w {
                let cols = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
                let mut acc = [0.0f32; 3];
                for (row, weights) in rows.iter().zip(&kernel.weights) {
                    for (&cx, &wt) in cols.iter().zip(weights) {
                        accumulate(&mut acc, wt, row[cx]);
                    }
                }
                out[y * w + x] = kernel.finish(acc, rows[1][x]);
            }
        }
    }

    /// Channel-wise Laplacian via [`Kernel3::EDGE_DETECT`].
    fn edge_detect(&self, buf: &mut RasterBuffer) {
        self.convolve(buf, &Kernel3::EDGE_DETECT);
    }

    /// A single Gaussian pass regardless of radius.
    fn gaussian_blur(&self, buf: &mut RasterBuffer, passes: u32) {
        if passes > 0 {
            self.convolve(buf, &Kernel3::GAUSSIAN);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/kernel.rs"]
mod tests;
