use super::*;
use crate::foundation::color::Color;

#[test]
fn parameters_are_clamped_and_calibrated() {
    let m = UnsharpMask::new(900.0, 80.0, 400.0);
    assert_eq!(m.amount(), 500.0 * 0.016);
    assert_eq!(m.radius(), 100);
    assert_eq!(m.threshold(), 255);

    let m = UnsharpMask::new(80.0, 0.5, 3.0);
    assert!((m.amount() - 1.28).abs() < 1e-6);
    assert_eq!(m.radius(), 1);
    assert_eq!(m.threshold(), 3);
}

#[test]
fn small_or_invalid_radius_is_noop() {
    assert!(UnsharpMask::new(100.0, 0.0, 0.0).is_noop());
    assert!(UnsharpMask::new(100.0, 0.2, 0.0).is_noop());
    assert!(UnsharpMask::new(100.0, f32::NAN, 0.0).is_noop());
}

#[test]
fn sharpen_pushes_away_from_blur() {
    let m = UnsharpMask::new(62.5, 1.0, 0.0); // amount 1.0
    let mut buf = RasterBuffer::new(1, 1, Color::new(100, 200, 50, 77)).unwrap();
    let blurred = RasterBuffer::new(1, 1, Color::new(90, 210, 50, 0)).unwrap();
    m.sharpen(&mut buf, &blurred);
    assert_eq!(buf.pixels()[0], Color::new(110, 190, 50, 77));
}

#[test]
fn threshold_keeps_low_contrast_channels() {
    let m = UnsharpMask::new(62.5, 1.0, 15.0);
    let mut buf = RasterBuffer::new(1, 1, Color::new(100, 200, 250, 0)).unwrap();
    let blurred = RasterBuffer::new(1, 1, Color::new(90, 180, 200, 0)).unwrap();
    m.sharpen(&mut buf, &blurred);
    // r differs by 10 (< 15, kept); g by 20 and b by 50 are sharpened, b saturates
    assert_eq!(buf.pixels()[0], Color::new(100, 220, 255, 0));
}

#[test]
fn negative_inputs_keep_their_magnitude() {
    let m = UnsharpMask::new(-100.0, -5.0, 0.0);
    assert_eq!(m.radius(), 10);
    assert!(!m.is_noop());
    assert!((m.amount() + 1.6).abs() < 1e-6);
    assert_eq!(UnsharpMask::new(0.0, -0.2, 0.0).radius(), 0);

    // a negative amount pulls the pixel toward its blur
    let mut buf = RasterBuffer::new(1, 1, Color::new(100, 200, 50, 0)).unwrap();
    let blurred = RasterBuffer::new(1, 1, Color::new(90, 210, 50, 0)).unwrap();
    UnsharpMask::new(-31.25, 1.0, 0.0).sharpen(&mut buf, &blurred);
    assert_eq!(buf.pixels()[0], Color::new(95, 205, 50, 0));
}
