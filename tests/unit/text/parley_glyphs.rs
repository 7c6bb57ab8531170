use super::*;

const FONT_CANDIDATES: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
];

fn system_font() -> Option<FontFace> {
    let path = std::env::var("ENGRAVE_TEST_FONT")
        .ok()
        .into_iter()
        .chain(FONT_CANDIDATES.iter().map(|p| p.to_string()))
        .find(|p| std::path::Path::new(p).is_file())?;
    Some(FontFace::load(path).unwrap())
}

fn draw(x: f32, y: f32, size: f32) -> GlyphDraw {
    GlyphDraw {
        x,
        y,
        angle_deg: 0.0,
        size,
        color: Color::BLACK,
    }
}

fn inked_columns(buf: &RasterBuffer) -> Vec<u32> {
    (0..buf.width())
        .filter(|&x| (0..buf.height()).any(|y| buf.get(x, y) != Some(Color::WHITE)))
        .collect()
}

fn inked_rows(buf: &RasterBuffer) -> Vec<u32> {
    (0..buf.height())
        .filter(|&y| buf.row(y).unwrap().iter().any(|&c| c != Color::WHITE))
        .collect()
}

#[test]
fn run_is_inked_across_its_whole_box() {
    let Some(font) = system_font() else {
        eprintln!("no DejaVuSansMono found, skipping");
        return;
    };
    let mut glyphs = ParleyGlyphs::new();
    let mut buf = RasterBuffer::new(160, 60, Color::WHITE).unwrap();
    let drawn = glyphs
        .draw_text(&mut buf, &font, &draw(10.0, 40.0, 24.0), "MMMMMMMM")
        .unwrap();

    let (x0, _, x1, _) = drawn.bounds();
    let cols = inked_columns(&buf);
    let first = *cols.first().unwrap() as f32;
    let last = *cols.last().unwrap() as f32;
    assert!(first < x0 + 6.0, "first inked column {first}, box starts {x0}");
    assert!(last > x1 - 6.0, "last inked column {last}, box ends {x1}");
    assert!(cols.len() as f32 > (x1 - x0) * 0.6);
}

#[test]
fn glyph_stands_on_the_baseline() {
    let Some(font) = system_font() else {
        eprintln!("no DejaVuSansMono found, skipping");
        return;
    };
    let mut glyphs = ParleyGlyphs::new();
    let mut buf = RasterBuffer::new(40, 50, Color::WHITE).unwrap();
    glyphs
        .draw_text(&mut buf, &font, &draw(8.0, 36.0, 24.0), "M")
        .unwrap();

    let rows = inked_rows(&buf);
    let top = *rows.first().unwrap();
    let bottom = *rows.last().unwrap();
    // no descender: ink ends at the baseline and rises a cap height above it
    assert!(bottom <= 37, "ink reaches row {bottom}");
    assert!(top < 36 - 12, "ink starts at row {top}");
    assert!(rows.len() >= 12);
}

#[test]
fn measured_width_grows_with_text() {
    let Some(font) = system_font() else {
        eprintln!("no DejaVuSansMono found, skipping");
        return;
    };
    let mut glyphs = ParleyGlyphs::new();
    let one = glyphs.text_box(&font, 20.0, "M").unwrap();
    let four = glyphs.text_box(&font, 20.0, "MMMM").unwrap();
    assert!(one.width() > 0.0 && one.height() > 0.0);
    // monospaced: four glyphs are four advances
    assert!((four.width() - 4.0 * one.width()).abs() < 0.5);
}

#[test]
fn fonts_with_the_same_stem_get_separate_cache_entries() {
    let root = std::env::temp_dir().join(format!("engrave-stem-{}", std::process::id()));
    let mut keys = Vec::new();
    for dir in ["a", "b"] {
        let dir = root.join(dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Regular.ttf");
        std::fs::write(&path, dir.to_string_lossy().as_bytes()).unwrap();
        let font = FontFace::load(&path).unwrap();
        assert_eq!(font.name(), "Regular");
        keys.push(cache_key(&font));
    }
    assert_ne!(keys[0], keys[1]);

    let memory = FontFace::from_bytes("inline", Vec::new());
    assert_eq!(cache_key(&memory), "inline");
}
