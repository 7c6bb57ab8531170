use super::*;
use crate::{foundation::color::Color, text::block_glyphs::BlockGlyphs};

fn font() -> FontFace {
    FontFace::from_bytes("block", Vec::new())
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn arc_degrees_full_circle() {
    let r = 50.0;
    assert!(close(arc_degrees(std::f32::consts::TAU * r, r), 360.0));
    assert!(close(arc_degrees(10.0, -r), -arc_degrees(10.0, r)));
}

#[test]
fn arc_width_sums_characters_and_applies_kerning() {
    let mut g = BlockGlyphs::new(0.5);
    let w = arc_width(&mut g, &font(), 10.0, "abcd", 1.5).unwrap();
    assert!(close(w, 30.0));
}

#[test]
fn single_glyph_is_centered_on_top_meridian() {
    let mut g = BlockGlyphs::default();
    let spec = ArcSpec {
        cx: 100.0,
        cy: 100.0,
        radius: 50.0,
        start_deg: 0.0,
        size: 12.0,
    };
    let placed = layout_arc(&mut g, &font(), &spec, 1.02, "A").unwrap();
    assert_eq!(placed.len(), 1);
    let p = &placed[0];
    assert!(close(p.angle_deg, p.slot_deg / 2.0));
    assert!(close(p.rotation_deg, 0.0));

    let rad = p.angle_deg.to_radians();
    assert!(close(p.x, 100.0 - rad.sin() * 50.0));
    assert!(close(p.y, 100.0 - rad.cos() * 50.0));
    assert!(p.y < 100.0);
}

#[test]
fn equal_glyphs_spread_symmetrically() {
    let mut g = BlockGlyphs::default();
    let spec = ArcSpec {
        cx: 0.0,
        cy: 0.0,
        radius: 80.0,
        start_deg: 0.0,
        size: 10.0,
    };
    let placed = layout_arc(&mut g, &font(), &spec, 1.0, "ABC").unwrap();
    let rot: Vec<f32> = placed.iter().map(|p| p.rotation_deg).collect();
    assert!(close(rot[1], 0.0));
    assert!(close(rot[0], -rot[2]));
    assert!(rot[0] > 0.0);
    // angles step down by one slot per glyph
    assert!(close(placed[0].angle_deg - placed[1].angle_deg, placed[0].slot_deg));
}

#[test]
fn start_angle_rotates_the_run() {
    let mut g = BlockGlyphs::default();
    let mut spec = ArcSpec {
        cx: 0.0,
        cy: 0.0,
        radius: 80.0,
        start_deg: 0.0,
        size: 10.0,
    };
    let centered = layout_arc(&mut g, &font(), &spec, 1.0, "AB").unwrap();
    spec.start_deg = 30.0;
    let rotated = layout_arc(&mut g, &font(), &spec, 1.0, "AB").unwrap();
    for (a, b) in centered.iter().zip(&rotated) {
        assert!(close(a.angle_deg - 30.0, b.angle_deg));
    }
}

#[test]
fn negative_radius_hangs_below_and_mirrors() {
    let mut g = BlockGlyphs::default();
    let up = ArcSpec {
        cx: 100.0,
        cy: 100.0,
        radius: 50.0,
        start_deg: 0.0,
        size: 12.0,
    };
    let down = ArcSpec {
        radius: -50.0,
        ..up
    };
    let a = layout_arc(&mut g, &font(), &up, 1.02, "AB").unwrap();
    let b = layout_arc(&mut g, &font(), &down, 1.02, "AB").unwrap();
    for (u, d) in a.iter().zip(&b) {
        assert!(close(u.angle_deg, -d.angle_deg));
        assert!(close(u.rotation_deg, -d.rotation_deg));
        assert!(d.y > 100.0);
        // the origin moves out by one font size
        let reach = ((d.x - 100.0).powi(2) + (d.y - 100.0).powi(2)).sqrt();
        assert!(close(reach, 62.0));
    }
}

#[test]
fn thin_glyphs_get_at_least_a_hyphen_slot() {
    let mut g = BlockGlyphs::new(0.6).with_advance('i', 0.1);
    let spec = ArcSpec {
        cx: 0.0,
        cy: 0.0,
        radius: 40.0,
        start_deg: 0.0,
        size: 10.0,
    };
    let placed = layout_arc(&mut g, &font(), &spec, 1.0, "iA").unwrap();
    assert!(close(placed[0].slot_deg, placed[1].slot_deg));
}

#[test]
fn zero_radius_is_rejected() {
    let mut g = BlockGlyphs::default();
    let spec = ArcSpec {
        cx: 0.0,
        cy: 0.0,
        radius: 0.0,
        start_deg: 0.0,
        size: 10.0,
    };
    let err = layout_arc(&mut g, &font(), &spec, 1.0, "A").unwrap_err();
    assert!(matches!(err, EngraveError::ParameterOutOfRange(_)));
}

#[test]
fn kerned_start_shifts_by_alignment() {
    assert_eq!(kerned_start_x(50.0, 5, 2.0, Align::Left), 50.0);
    assert_eq!(kerned_start_x(50.0, 5, 2.0, Align::Center), 46.0);
    assert_eq!(kerned_start_x(50.0, 5, 2.0, Align::Right), 42.0);
    assert_eq!(kerned_start_x(50.0, 0, 2.0, Align::Right), 50.0);
}

#[test]
fn kerned_run_advances_past_each_drawn_box() {
    let mut g = BlockGlyphs::new(0.5);
    let mut buf = RasterBuffer::new(40, 20, Color::WHITE).unwrap();
    let base = GlyphDraw {
        x: 0.0,
        y: 15.0,
        angle_deg: 0.0,
        size: 10.0,
        color: Color::BLACK,
    };
    let boxes = draw_kerned(&mut g, &mut buf, &font(), &base, 1.02, Align::Left, "ab").unwrap();
    assert_eq!(boxes.len(), 2);
    assert!(close(boxes[0].0[0], 0.0));
    assert!(close(boxes[1].0[0], 6.02));
}

#[test]
fn aligned_start_uses_whole_width() {
    assert_eq!(aligned_start_x(100.0, 40.0, Align::Left), 100.0);
    assert_eq!(aligned_start_x(100.0, 40.0, Align::Center), 80.0);
    assert_eq!(aligned_start_x(100.0, 40.0, Align::Right), 60.0);
}

#[test]
fn align_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Align::Center).unwrap(), "\"center\"");
    let a: Align = serde_json::from_str("\"right\"").unwrap();
    assert_eq!(a, Align::Right);
}
