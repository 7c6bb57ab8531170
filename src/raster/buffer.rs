use crate::foundation::{
    color::{ALPHA_MAX, Color},
    error::{EngraveError, EngraveResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Row-major `width × height` grid of [`Color`], origin top-left.
///
/// Dimensions are always non-zero and `pixels.len() == width * height`; every constructor
/// rejects anything else with [`EngraveError::InvalidDimension`].
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl RasterBuffer {
    /// New buffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> EngraveResult<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![background; len],
        })
    }

    /// Build from pre-packed pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> EngraveResult<Self> {
        let len = checked_len(width, height)?;
        if pixels.len() != len {
            return Err(EngraveError::invalid_dimension(format!(
                "expected {len} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Import an externally decoded `0xAARRGGBB` (7-bit alpha) buffer.
    pub fn from_argb(width: u32, height: u32, argb: &[u32]) -> EngraveResult<Self> {
        Self::from_pixels(
            width,
            height,
            argb.iter().copied().map(Color::from_argb).collect(),
        )
    }

    /// Import a straight-alpha RGBA8 image.
    pub fn from_rgba_image(img: &image::RgbaImage) -> EngraveResult<Self> {
        let pixels = img.pixels().map(|p| Color::from_rgba8(p.0)).collect();
        Self::from_pixels(img.width(), img.height(), pixels)
    }

    /// Import any decoded image, converting it to RGBA8 first.
    pub fn from_dynamic(img: &image::DynamicImage) -> EngraveResult<Self> {
        Self::from_rgba_image(&img.to_rgba8())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable row-major pixels.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Pixels of row `y`.
    pub fn row(&self, y: u32) -> Option<&[Color]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.pixels[start..start + w])
    }

    /// Pixel at `(x, y)`, `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Pixel at `(x, y)` with coordinates clamped to the nearest edge.
    pub fn get_clamped(&self, x: i64, y: i64) -> Color {
        let cx = x.clamp(0, i64::from(self.width) - 1) as u32;
        let cy = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.pixels[self.index(cx, cy)]
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` (and changes nothing) outside the grid.
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.index(x, y);
        self.pixels[i] = color;
        true
    }

    /// Fill the whole grid with one color.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Re-check the dimension invariant; every filter calls this before touching pixels.
    pub fn validate(&self) -> EngraveResult<()> {
        let len = checked_len(self.width, self.height)?;
        if self.pixels.len() != len {
            return Err(EngraveError::invalid_dimension(
                "pixel storage does not match width*height",
            ));
        }
        Ok(())
    }

    /// Export as packed `0xAARRGGBB` values.
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels.iter().map(|c| c.argb()).collect()
    }

    /// Export as a straight-alpha RGBA8 image.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixels[self.index(x, y)].to_rgba8())
        })
    }

    /// Bilinear resample to a new size. Channels (including the 7-bit alpha) are filtered
    /// as raw values, so no alpha rescaling error is introduced.
    pub fn resampled(&self, width: u32, height: u32) -> EngraveResult<Self> {
        checked_len(width, height)?;
        if (width, height) == self.dimensions() {
            return Ok(self.clone());
        }

        let raw = image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let c = self.pixels[self.index(x, y)];
            image::Rgba([c.r(), c.g(), c.b(), c.a()])
        });
        let scaled =
            image::imageops::resize(&raw, width, height, image::imageops::FilterType::Triangle);
        let pixels = scaled
            .pixels()
            .map(|p| Color::new(p[0], p[1], p[2], p[3].min(ALPHA_MAX)))
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

fn checked_len(width: u32, height: u32) -> EngraveResult<usize> {
    if width == 0 || height == 0 {
        return Err(EngraveError::invalid_dimension(format!(
            "buffer must be at least 1x1, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| EngraveError::invalid_dimension("buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
