use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest alpha value. `0` is fully opaque, `ALPHA_MAX` fully transparent.
pub const ALPHA_MAX: u8 = 0x7F;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
/// Packed true-color value.
///
/// Bit layout: 24–30 alpha (7 bits), 16–23 red, 8–15 green, 0–7 blue. Bit 31 is always clear,
/// so every constructor masks or saturates alpha into `0..=ALPHA_MAX`.
pub struct Color(u32);

impl Color {
    /// Fully transparent black, the default canvas background.
    pub const TRANSPARENT: Self = Self(0x7F00_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0x0000_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0x00FF_FFFF);

    /// Build from a packed `0xAARRGGBB` value, dropping the top alpha bit.
    pub const fn from_argb(packed: u32) -> Self {
        Self(packed & 0x7FFF_FFFF)
    }

    /// Build from channels; alpha above [`ALPHA_MAX`] saturates.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a = if a > ALPHA_MAX { ALPHA_MAX } else { a };
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build from unbounded intermediates, saturating color to `0..=255` and alpha to
    /// `0..=ALPHA_MAX`.
    pub fn saturating(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self::new(
            clamp_channel(r),
            clamp_channel(g),
            clamp_channel(b),
            clamp_alpha(a),
        )
    }

    /// Packed `0xAARRGGBB` value.
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Alpha channel (`0..=ALPHA_MAX`).
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r(), self.g(), self.b(), a)
    }

    /// Same alpha with different color channels.
    pub const fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, self.a())
    }

    /// Rounded BT.601 luma of this color.
    pub fn luma(self) -> u8 {
        luma(self.r(), self.g(), self.b())
    }

    /// Straight-alpha RGBA8, with alpha rescaled so that 255 is opaque.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), alpha7_to_alpha8(self.a())]
    }

    /// Inverse of [`Color::to_rgba8`].
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], alpha8_to_alpha7(px[3]))
    }

    /// Composite `src` over `self` with an extra 8-bit coverage factor (straight alpha).
    pub fn over(self, src: Color, coverage: u8) -> Color {
        let so = (f32::from(coverage) / 255.0) * opacity(src.a());
        if so <= 0.0 {
            return self;
        }
        let d_o = opacity(self.a());
        let out_o = so + d_o * (1.0 - so);
        if out_o <= 0.0 {
            return self;
        }

        let mix = |s: u8, d: u8| -> u8 {
            round_channel((f32::from(s) * so + f32::from(d) * d_o * (1.0 - so)) / out_o)
        };
        let a = ((1.0 - out_o) * f32::from(ALPHA_MAX)).round() as i32;
        Color::new(
            mix(src.r(), self.r()),
            mix(src.g(), self.g()),
            mix(src.b(), self.b()),
            clamp_alpha(a),
        )
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_argb(value)
    }
}

impl From<Color> for u32 {
    fn from(value: Color) -> Self {
        value.argb()
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(0x{:08X})", self.0)
    }
}

/// Rounded BT.601 luma (`0.299 R + 0.587 G + 0.114 B`), computed in fixed point so that
/// gray inputs map to themselves.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((sum + 500) / 1000) as u8
}

/// Unrounded BT.601 luma.
pub fn luma_f32(c: Color) -> f32 {
    0.299 * f32::from(c.r()) + 0.587 * f32::from(c.g()) + 0.114 * f32::from(c.b())
}

/// Saturate a color intermediate to `0..=255`.
pub fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Saturate an alpha intermediate to `0..=ALPHA_MAX`.
pub fn clamp_alpha(v: i32) -> u8 {
    v.clamp(0, i32::from(ALPHA_MAX)) as u8
}

/// Round and saturate a float intermediate to `0..=255`. NaN maps to 0.
pub fn round_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// `round(x * y / 255)`.
pub fn mul_div255(x: u8, y: u8) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}

fn opacity(a7: u8) -> f32 {
    f32::from(ALPHA_MAX - a7.min(ALPHA_MAX)) / f32::from(ALPHA_MAX)
}

fn alpha7_to_alpha8(a7: u8) -> u8 {
    let a7 = u32::from(a7.min(ALPHA_MAX));
    (255 - (a7 * 255 + 63) / 127) as u8
}

fn alpha8_to_alpha7(a8: u8) -> u8 {
    let t = 255 - u32::from(a8);
    ((t * 127 + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
