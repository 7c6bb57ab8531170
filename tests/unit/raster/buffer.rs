use super::*;

#[test]
fn zero_dimensions_are_rejected() {
    assert!(matches!(
        RasterBuffer::new(0, 4, Color::BLACK),
        Err(EngraveError::InvalidDimension(_))
    ));
    assert!(matches!(
        RasterBuffer::new(4, 0, Color::BLACK),
        Err(EngraveError::InvalidDimension(_))
    ));
}

#[test]
fn from_pixels_checks_length() {
    let err = RasterBuffer::from_pixels(2, 2, vec![Color::BLACK; 3]).unwrap_err();
    assert!(err.to_string().contains("expected 4 pixels"));
}

#[test]
fn new_fills_background() {
    let buf = RasterBuffer::new(3, 2, Color::TRANSPARENT).unwrap();
    assert!(buf.pixels().iter().all(|&c| c == Color::TRANSPARENT));
    assert_eq!(buf.dimensions(), (3, 2));
}

#[test]
fn get_set_are_bounds_checked() {
    let mut buf = RasterBuffer::new(2, 2, Color::BLACK).unwrap();
    assert!(buf.set(1, 1, Color::WHITE));
    assert!(!buf.set(2, 0, Color::WHITE));
    assert_eq!(buf.get(1, 1), Some(Color::WHITE));
    assert_eq!(buf.get(0, 2), None);
    assert_eq!(buf.row(1).unwrap(), &[Color::BLACK, Color::WHITE]);
}

#[test]
fn get_clamped_repeats_edges() {
    let mut buf = RasterBuffer::new(2, 1, Color::BLACK).unwrap();
    buf.set(1, 0, Color::WHITE);
    assert_eq!(buf.get_clamped(-3, 0), Color::BLACK);
    assert_eq!(buf.get_clamped(9, -9), Color::WHITE);
}

#[test]
fn argb_import_masks_alpha() {
    let buf = RasterBuffer::from_argb(1, 1, &[0xFF11_2233]).unwrap();
    assert_eq!(buf.to_argb(), vec![0x7F11_2233]);
}

#[test]
fn rgba_image_round_trip() {
    let mut buf = RasterBuffer::new(2, 1, Color::new(10, 20, 30, 0)).unwrap();
    buf.set(1, 0, Color::new(40, 50, 60, 64));
    let img = buf.to_rgba_image();
    assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(RasterBuffer::from_rgba_image(&img).unwrap(), buf);
}

#[test]
fn resample_keeps_constant_color_and_alpha_range() {
    let buf = RasterBuffer::new(4, 4, Color::new(100, 150, 200, 127)).unwrap();
    let out = buf.resampled(7, 3).unwrap();
    assert_eq!(out.dimensions(), (7, 3));
    assert!(
        out.pixels()
            .iter()
            .all(|&c| c == Color::new(100, 150, 200, 127))
    );
}

#[test]
fn resample_to_same_size_is_copy() {
    let mut buf = RasterBuffer::new(2, 2, Color::BLACK).unwrap();
    buf.set(0, 1, Color::WHITE);
    assert_eq!(buf.resampled(2, 2).unwrap(), buf);
    assert!(buf.resampled(0, 2).is_err());
}
