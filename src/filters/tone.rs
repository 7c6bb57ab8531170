//! Color remapping toward a reference color. These have no accelerated counterpart and run
//! the same on every capability set.

use crate::{
    foundation::color::{Color, mul_div255},
    raster::buffer::RasterBuffer,
};

/// `c · grade / 255` per channel.
pub(crate) fn grade(buf: &mut RasterBuffer, grade: Color) {
    for c in buf.pixels_mut() {
        *c = c.with_rgb(
            mul_div255(c.r(), grade.r()),
            mul_div255(c.g(), grade.g()),
            mul_div255(c.b(), grade.b()),
        );
    }
}

/// Replace whites with `tint`: `(luma / 255) · tint`.
pub(crate) fn tint(buf: &mut RasterBuffer, tint: Color) {
    for c in buf.pixels_mut() {
        let k = c.luma();
        *c = c.with_rgb(
            mul_div255(k, tint.r()),
            mul_div255(k, tint.g()),
            mul_div255(k, tint.b()),
        );
    }
}

/// Replace blacks with `tone`: `luma + ((255 − luma) / 255) · tone`.
pub(crate) fn tone(buf: &mut RasterBuffer, tone: Color) {
    for c in buf.pixels_mut() {
        let k = c.luma();
        let inv = 255 - k;
        let ch = |t: u8| k.saturating_add(mul_div255(inv, t));
        *c = c.with_rgb(ch(tone.r()), ch(tone.g()), ch(tone.b()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/tone.rs"]
mod tests;
