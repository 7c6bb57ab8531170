use super::*;
use crate::text::block_glyphs::BlockGlyphs;

fn font() -> FontFace {
    FontFace::from_bytes("block", Vec::new())
}

#[test]
fn fitting_line_keeps_size() {
    let mut g = BlockGlyphs::default();
    let size = fit_to_width(&mut g, &font(), &["OK"], 1000.0, 15.0).unwrap();
    assert_eq!(size, 15.0);
}

#[test]
fn widest_line_decides() {
    // 10 chars at 0.5 advance: width = 5 * size, so <= 40 needs size 8
    let mut g = BlockGlyphs::new(0.5);
    let lines = ["short", "ten chars!"];
    let size = fit_to_width(&mut g, &font(), &lines, 40.0, 15.0).unwrap();
    assert_eq!(size, 8.0);
}

#[test]
fn width_fit_floors_at_one() {
    let mut g = BlockGlyphs::default();
    let size = fit_to_width(&mut g, &font(), &["wide"], 0.0, 12.0).unwrap();
    assert_eq!(size, 1.0);
}

#[test]
fn height_fit_noop_when_already_fitting() {
    let fit = fit_to_height(3, 100.0, 60.0, 15.0, 24.0);
    assert_eq!(
        fit,
        FitHeight {
            font_size: 15.0,
            linespacing: 24.0,
            height: 60.0,
            fits: true,
        }
    );
}

#[test]
fn height_fit_trims_spacing_before_size() {
    // 15 + ceil(7.5) = 23 < 24, gap 9 > 4: spacing goes first
    let fit = fit_to_height(3, 62.0, 63.0, 15.0, 24.0);
    assert_eq!(fit.linespacing, 23.0);
    assert_eq!(fit.font_size, 15.0);
    assert_eq!(fit.height, 23.0 * 3.0 - 8.0);
    assert!(fit.fits);
}

#[test]
fn height_fit_stops_at_floor() {
    let fit = fit_to_height(10, 1.0, 500.0, 15.0, 24.0);
    assert_eq!(fit.font_size, MIN_HEIGHT_FIT_SIZE);
    assert!(!fit.fits);
    assert!(fit.height > 1.0);
}

#[test]
fn text_height_fit_uses_pangram_box() {
    // block box height equals the size, so the first size below 20 fits
    let mut g = BlockGlyphs::default();
    let fit = fit_text_height(&mut g, &font(), 20.0).unwrap();
    assert_eq!(fit.font_size, 19.0);
    assert!((fit.baseline_offset - 19.0 * 0.2).abs() < 1e-4);
}
