use super::*;
use crate::text::block_glyphs::BlockGlyphs;

fn engraver() -> TextEngraver {
    let mut e = TextEngraver::new(Box::new(BlockGlyphs::new(0.5)));
    e.set_font_face(FontFace::from_bytes("block", Vec::new()));
    e
}

fn scratch_font(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("engrave-fonts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, b"not really a font").unwrap();
    path
}

#[test]
fn missing_font_is_a_configuration_error_and_leaves_buffer() {
    let mut e = TextEngraver::new(Box::new(BlockGlyphs::default()));
    let mut buf = RasterBuffer::new(10, 10, Color::WHITE).unwrap();
    let before = buf.clone();
    let draw = GlyphDraw {
        x: 1.0,
        y: 8.0,
        angle_deg: 0.0,
        size: 8.0,
        color: Color::BLACK,
    };
    let err = e.add_text(&mut buf, "hi", &draw).unwrap_err();
    assert!(matches!(err, EngraveError::Configuration(_)));
    assert!(e.text_box("hi", 8.0).is_err());
    assert!(e.engrave(&mut buf).is_err());
    assert_eq!(buf, before);
}

#[test]
fn set_font_color_returns_previous() {
    let mut e = engraver();
    let red = Color::new(255, 0, 0, 0);
    assert_eq!(e.set_font_color(red), Color::BLACK);
    assert_eq!(e.set_font_color(Color::WHITE), red);
    assert_eq!(e.font_color(), Color::WHITE);
}

#[test]
fn font_registry_skips_numeric_names_and_missing_files() {
    let mut e = engraver();
    let a = scratch_font("a.ttf");
    let b = scratch_font("b.ttf");
    let added = e.add_available_fonts(
        [
            ("serif", a.clone()),
            ("42", a.clone()),
            ("ghost", PathBuf::from("/no/such/font.ttf")),
        ],
        false,
    );
    assert_eq!(added, 1);

    assert_eq!(e.add_available_fonts([("serif", b.clone())], false), 0);
    assert_eq!(e.available_fonts()["serif"], a);
    assert_eq!(e.add_available_fonts([("serif", b.clone())], true), 1);
    assert_eq!(e.available_fonts()["serif"], b);
}

#[test]
fn set_font_prefers_registered_name_then_path() {
    let mut e = TextEngraver::new(Box::new(BlockGlyphs::default()));
    let path = scratch_font("named.ttf");
    e.add_available_fonts([("fancy", path.clone())], false);

    e.set_font("fancy").unwrap();
    assert_eq!(e.font().and_then(|f| f.path()), Some(path.as_path()));

    let direct = scratch_font("direct.ttf");
    e.set_font(direct.to_str().unwrap()).unwrap();
    assert_eq!(e.font().map(|f| f.name()), Some("direct"));

    let err = e.set_font("nope").unwrap_err();
    assert!(matches!(err, EngraveError::Configuration(_)));
    assert_eq!(e.font().map(|f| f.name()), Some("direct"));
}

#[test]
fn uppercase_only_folds_before_measuring() {
    let mut e = TextEngraver::new(Box::new(BlockGlyphs::new(0.5).with_advance('A', 1.0)));
    e.set_font_face(FontFace::from_bytes("block", Vec::new()));
    assert_eq!(e.text_box("a", 10.0).unwrap().width(), 5.0);
    e.uppercase_only(true);
    assert_eq!(e.text_box("a", 10.0).unwrap().width(), 10.0);
}

#[test]
fn fit_to_width_updates_working_size() {
    let mut e = engraver();
    assert_eq!(e.fit_to_width(&["OK"], 1000.0).unwrap(), DEFAULT_FONT_SIZE);
    // 4 chars at 0.5 advance: 2 * size <= 20
    assert_eq!(e.fit_to_width(&["WIDE"], 20.0).unwrap(), 10.0);
    assert_eq!(e.font_size(), 10.0);
}

#[test]
fn fit_to_height_updates_spacing_and_size() {
    let mut e = engraver();
    let fit = e.fit_to_height(3, 62.0, 63.0);
    assert!(fit.fits);
    assert_eq!(e.linespacing(), 23.0);
    assert_eq!(e.font_size(), DEFAULT_FONT_SIZE);
}

#[test]
fn engrave_draws_rows_with_text_only() {
    let mut e = engraver();
    e.add_row_info(RowSpec {
        style: RowStyle::Arc,
        align: Align::Center,
        cx: 50.0,
        cy: 60.0,
        radius: 40.0,
        angle: 0.0,
        size: 8.0,
    });
    e.add_row_info(RowSpec {
        style: RowStyle::Line,
        align: Align::Center,
        cx: 50.0,
        cy: 90.0,
        radius: 0.0,
        angle: 0.0,
        size: 8.0,
    });
    e.add_row_info(RowSpec {
        style: RowStyle::Line,
        align: Align::Left,
        cx: 0.0,
        cy: 10.0,
        radius: 0.0,
        angle: 0.0,
        size: 8.0,
    });
    // third row has no text at all
    e.set_engraving_text(["TOP", ""]);

    let mut buf = RasterBuffer::new(100, 100, Color::WHITE).unwrap();
    assert_eq!(e.engrave(&mut buf).unwrap(), 1);

    // arc text lands above the center, the empty line row stays blank
    let inked = |y0: u32, y1: u32| {
        (y0..y1).any(|y| (0..100).any(|x| buf.get(x, y) != Some(Color::WHITE)))
    };
    assert!(inked(10, 25));
    assert!(!inked(80, 100));
    assert!(!inked(0, 10));
}

#[test]
fn line_rows_center_on_anchor() {
    let mut e = engraver();
    e.add_row_info(RowSpec {
        style: RowStyle::Line,
        align: Align::Center,
        cx: 50.0,
        cy: 50.0,
        radius: 0.0,
        angle: 0.0,
        size: 10.0,
    });
    e.set_engraving_text(["ABCD"]);
    let mut buf = RasterBuffer::new(100, 100, Color::WHITE).unwrap();
    e.engrave(&mut buf).unwrap();

    // 4 * 5px = 20px wide centered on 50 → columns 40..60
    assert_eq!(buf.get(40, 45), Some(Color::BLACK));
    assert_eq!(buf.get(59, 45), Some(Color::BLACK));
    assert_eq!(buf.get(39, 45), Some(Color::WHITE));
    assert_eq!(buf.get(60, 45), Some(Color::WHITE));
}

#[test]
fn row_spec_json_defaults() {
    let row: RowSpec = serde_json::from_str(r#"{"cx": 1, "cy": 2, "size": 9}"#).unwrap();
    assert_eq!(row.style, RowStyle::Arc);
    assert_eq!(row.align, Align::Left);
    assert_eq!(row.radius, 0.0);
}

#[test]
fn failing_row_is_skipped_and_later_rows_still_draw() {
    let mut e = engraver();
    let line = |cy: f32| RowSpec {
        style: RowStyle::Line,
        align: Align::Left,
        cx: 10.0,
        cy,
        radius: 0.0,
        angle: 0.0,
        size: 10.0,
    };
    e.add_row_info(line(20.0));
    // arc row left at the default radius of 0
    e.add_row_info(RowSpec {
        style: RowStyle::Arc,
        ..line(40.0)
    });
    e.add_row_info(line(60.0));
    e.set_engraving_text(["AB", "CD", "EF"]);

    let mut buf = RasterBuffer::new(100, 80, Color::WHITE).unwrap();
    assert_eq!(e.engrave(&mut buf).unwrap(), 2);

    let inked = |y: u32| buf.row(y).unwrap().iter().any(|&c| c != Color::WHITE);
    assert!(inked(15));
    assert!(inked(55));
    assert!((25..50).all(|y| !inked(y)));
}
