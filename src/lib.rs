//! Engrave is a raster photo-filter and text-engraving toolkit for true-color pixel buffers.
//!
//! It works on an in-memory [`RasterBuffer`] of packed [`Color`] values with a 7-bit alpha
//! channel (`0` opaque, `127` fully transparent) and never performs file IO itself; decoding
//! and encoding happen at the `image` crate boundary.
//!
//! # Pieces
//!
//! - **Filters**: [`FilterEngine`] runs grayscale, sepia, colorize, grade/tint/tone, invert,
//!   contrast, edge detection, mean removal, pixelation, overlays, unsharp masking and
//!   alpha/luma masking. Each filter family has an accelerated and a reference
//!   implementation, picked once from a [`FilterCapability`].
//! - **Text**: [`TextEngraver`] places glyphs along circular arcs or as kerned lines, fits font
//!   sizes to widths and heights, and draws multi-row engravings described by [`RowSpec`].
//!   Glyph measurement and rasterization go through the [`GlyphMetrics`] trait;
//!   [`ParleyGlyphs`] is the production implementation.
//! - **Session**: [`Session`] owns the current buffer and swaps replacements in atomically.
//!
//! # Example
//!
//! ```
//! use engrave::{Color, FilterCapability, RasterBuffer, Session};
//!
//! let buf = RasterBuffer::new(4, 4, Color::new(200, 100, 50, 0))?;
//! let mut session = Session::with_buffer(FilterCapability::ALL, buf);
//! session.sepia()?;
//! assert_eq!(session.buffer()?.pixels()[0], Color::new(160, 114, 82, 0));
//! # Ok::<(), engrave::EngraveError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod filters;
mod foundation;
mod raster;
mod session;
mod text;

pub use filters::capability::{CAPABILITY_ENV, FilterCapability};
pub use filters::engine::FilterEngine;
pub use filters::kernel::Kernel3;
pub use filters::point::ColorDelta;
pub use filters::unsharp::UnsharpMask;
pub use foundation::color::{
    ALPHA_MAX, Color, clamp_alpha, clamp_channel, luma, luma_f32, mul_div255, round_channel,
};
pub use foundation::error::{EngraveError, EngraveResult};
pub use raster::buffer::RasterBuffer;
pub use session::config::EngraveConfig;
pub use session::engrave_session::Session;
pub use text::block_glyphs::BlockGlyphs;
pub use text::engraver::{
    DEFAULT_FONT_SIZE, DEFAULT_KERNING, DEFAULT_LINESPACING, RowSpec, RowStyle, TextEngraver,
};
pub use text::fit::{
    FitHeight, MIN_HEIGHT_FIT_SIZE, PANGRAM, TextFit, fit_text_height, fit_to_height, fit_to_width,
};
pub use text::layout::{
    Align, ArcSpec, GlyphPlacement, aligned_start_x, arc_degrees, arc_width, draw_kerned,
    kerned_start_x, layout_arc,
};
pub use text::metrics::{FontFace, GlyphDraw, GlyphMetrics, TextBox};
pub use text::parley_glyphs::ParleyGlyphs;
