//! Embedded 5x7 lowercase bitmap font used to stamp text onto images.

use image::RgbImage;

use super::composite::over;

/// Glyph cell height in font units.
pub(crate) const GLYPH_ROWS: u32 = 7;
/// Glyph cell width in font units.
pub(crate) const GLYPH_COLS: u32 = 5;
/// Horizontal advance per glyph in font units, including one column of spacing.
pub(crate) const ADVANCE: u32 = GLYPH_COLS + 1;

/// Pixel size of one font unit at `font_scale == 1.0`.
const UNIT_AT_SCALE_ONE: f64 = 22.0 / 7.0;
const SUPERSAMPLE: u32 = 4;

// One byte per row, bit 4 is the leftmost column.
const GLYPHS: [[u8; 7]; 26] = [
    [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F], // a
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E], // b
    [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E], // c
    [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F], // d
    [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E], // e
    [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08], // f
    [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E], // g
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11], // h
    [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E], // i
    [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C], // j
    [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12], // k
    [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // l
    [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11], // m
    [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11], // n
    [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E], // o
    [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10], // p
    [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01], // q
    [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10], // r
    [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E], // s
    [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06], // t
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D], // u
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04], // v
    [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A], // w
    [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11], // x
    [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E], // y
    [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F], // z
];

/// Row bitmap for a lowercase ASCII letter.
pub(crate) fn glyph(c: char) -> Option<&'static [u8; 7]> {
    if c.is_ascii_lowercase() {
        Some(&GLYPHS[(c as u8 - b'a') as usize])
    } else {
        None
    }
}

#[inline]
fn covered(rows: &[u8; 7], gx: f64, gy: f64) -> bool {
    if gx < 0.0 || gy < 0.0 {
        return false;
    }
    let (col, row) = (gx as u32, gy as u32);
    if col >= GLYPH_COLS || row >= GLYPH_ROWS {
        return false;
    }
    rows[row as usize] & (1 << (GLYPH_COLS - 1 - col)) != 0
}

/// Draw `text` with its bottom-left corner at `origin`, anti-aliased by supersampled coverage.
///
/// Unknown characters advance the pen without drawing. Anything outside `dst` is clipped.
pub(crate) fn draw_text(
    dst: &mut RgbImage,
    text: &str,
    origin: (i64, i64),
    font_scale: f64,
    color: [u8; 3],
) {
    let unit = font_scale * UNIT_AT_SCALE_ONE;
    if unit.is_nan() || unit <= 0.0 {
        return;
    }
    let top = origin.1 as f64 - f64::from(GLYPH_ROWS) * unit;
    let (w, h) = (i64::from(dst.width()), i64::from(dst.height()));
    let samples = SUPERSAMPLE * SUPERSAMPLE;

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let left = origin.0 as f64 + (i as f64) * f64::from(ADVANCE) * unit;

        let x0 = (left.floor() as i64).max(0);
        let x1 = ((left + f64::from(GLYPH_COLS) * unit).ceil() as i64).min(w);
        let y0 = (top.floor() as i64).max(0);
        let y1 = ((top + f64::from(GLYPH_ROWS) * unit).ceil() as i64).min(h);

        for py in y0..y1 {
            for px in x0..x1 {
                let mut hits = 0u32;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let fx = px as f64 + (f64::from(sx) + 0.5) / f64::from(SUPERSAMPLE);
                        let fy = py as f64 + (f64::from(sy) + 0.5) / f64::from(SUPERSAMPLE);
                        if covered(rows, (fx - left) / unit, (fy - top) / unit) {
                            hits += 1;
                        }
                    }
                }
                if hits == 0 {
                    continue;
                }
                let alpha = (hits * 255 / samples) as u8;
                let p = dst.get_pixel_mut(px as u32, py as u32);
                p.0 = over(p.0, color, alpha);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/font.rs"]
mod tests;
