use super::*;

#[test]
fn every_lowercase_letter_has_ink() {
    for c in 'a'..='z' {
        let rows = glyph(c).expect("lowercase glyph");
        assert!(rows.iter().any(|&r| r != 0), "glyph {c} is blank");
        assert!(rows.iter().all(|&r| r < 0x20), "glyph {c} wider than 5 columns");
    }
    assert!(glyph('A').is_none());
    assert!(glyph(' ').is_none());
}

#[test]
fn draw_text_at_unit_scale_paints_solid_color() {
    let mut img = RgbImage::new(40, 40);
    // Scale such that one font unit is exactly 2 pixels.
    let scale = 2.0 / UNIT_AT_SCALE_ONE;
    draw_text(&mut img, "l", (0, 20), scale, [200, 10, 30]);
    // Row 0 of 'l' is 0x0C: columns 1 and 2 are set, so pixels x=2..6, y=6..8 are fully covered.
    assert_eq!(img.get_pixel(3, 6).0, [200, 10, 30]);
    assert_eq!(img.get_pixel(0, 6).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(39, 39).0, [0, 0, 0]);
}

#[test]
fn draw_text_clips_outside_the_image() {
    let mut img = RgbImage::new(8, 8);
    draw_text(&mut img, "wxyz", (-30, 200), 1.0, [255, 255, 255]);
    draw_text(&mut img, "abc", (6, 7), 1.0, [255, 255, 255]);
    assert!(img.pixels().any(|p| p.0 != [0, 0, 0]));
}

#[test]
fn draw_text_ignores_non_positive_scale() {
    let mut img = RgbImage::new(8, 8);
    draw_text(&mut img, "abc", (0, 7), 0.0, [255, 255, 255]);
    draw_text(&mut img, "abc", (0, 7), f64::NAN, [255, 255, 255]);
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
}
