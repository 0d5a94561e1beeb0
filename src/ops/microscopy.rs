//! Acquisition artifacts typical of microscopy and scanned slides: ink stains, trapped air
//! bubbles, vignetted corners and handwritten annotations.
//!
//! Every placement decision is drawn from the caller's generator.

use image::RgbImage;
use rand::Rng;

use super::{composite::Layer, font};
use crate::{
    assets::inks::Stencil,
    foundation::{
        error::{CorruptError, CorruptResult},
        math::clip_u8,
    },
};

/// Distance kept between stamped stencils and the image border.
const STAIN_MARGIN: i64 = 10;
/// Minimum number of bubbles per call.
const MIN_BUBBLES: i64 = 7;
const MIN_BUBBLE_RADIUS: i64 = 3;
const BUBBLE_BORDER: i64 = 2;
const BUBBLE_RIM: [u8; 4] = [255, 255, 255, 130];
const BUBBLE_CORE: [u8; 4] = [255, 255, 255, 100];
const MIN_LETTERS: i64 = 3;
const MIN_FONT_CENTS: i64 = 14;
const TEXT_MARGIN: i64 = 10;
/// Horizontal room reserved per letter when placing a word.
const TEXT_ROOM_PER_LETTER: i64 = 8;

/// Inclusive integer draw that collapses to `lo` when the range is empty.
fn randint<R: Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64) -> i64 {
    if hi <= lo { lo } else { rng.gen_range(lo..=hi) }
}

/// Stamp up to `max_marks` stencils, darkening each channel by `1 - absorption`.
///
/// With `max_marks > 1` the count is drawn from `1..=max_marks`; otherwise exactly `max_marks`
/// stencils are stamped. A stencil that does not fit inside the margins is skipped.
pub(crate) fn stain_deposit<R: Rng + ?Sized>(
    src: &RgbImage,
    stencils: &[Stencil],
    max_marks: i64,
    rng: &mut R,
) -> RgbImage {
    let num_marks = if max_marks > 1 {
        rng.gen_range(1..=max_marks)
    } else {
        max_marks.max(0)
    };
    let mut out = src.clone();
    if stencils.is_empty() {
        return out;
    }
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));

    for _ in 0..num_marks {
        let stencil = &stencils[rng.gen_range(0..stencils.len())];
        let x_hi = w - i64::from(stencil.width) - STAIN_MARGIN;
        let y_hi = h - i64::from(stencil.height) - STAIN_MARGIN;
        if x_hi < STAIN_MARGIN || y_hi < STAIN_MARGIN {
            tracing::trace!(
                stencil_w = stencil.width,
                stencil_h = stencil.height,
                "stencil does not fit, skipped"
            );
            continue;
        }
        let x0 = rng.gen_range(STAIN_MARGIN..=x_hi) as u32;
        let y0 = rng.gen_range(STAIN_MARGIN..=y_hi) as u32;

        for sy in 0..stencil.height {
            for sx in 0..stencil.width {
                let keep = 1.0 - stencil.absorption(sx, sy);
                let p = out.get_pixel_mut(x0 + sx, y0 + sy);
                for c in p.0.iter_mut() {
                    *c = clip_u8(f64::from(*c) * keep);
                }
            }
        }
    }
    out
}

/// Overlay translucent white bubbles: a rim of radius `r + 2` and a slightly clearer core.
pub(crate) fn bubble<R: Rng + ?Sized>(
    src: &RgbImage,
    max_radius: i64,
    max_bubbles: i64,
    rng: &mut R,
) -> RgbImage {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    let count = randint(rng, MIN_BUBBLES, max_bubbles);
    let mut layer = Layer::transparent(src.width(), src.height());

    for _ in 0..count {
        let radius = randint(rng, MIN_BUBBLE_RADIUS, max_radius);
        let cx = randint(rng, radius, w - radius);
        let cy = randint(rng, radius, h - radius);
        layer.fill_disk(cx, cy, radius + BUBBLE_BORDER, BUBBLE_RIM);
        layer.fill_disk(cx, cy, radius, BUBBLE_CORE);
    }

    let mut out = src.clone();
    layer.paste_over(&mut out);
    out
}

/// Zero every pixel outside the centered disk of radius `base * multiplier`, where `base` is the
/// distance from the integer center to the nearest edge.
pub(crate) fn black_corner(src: &RgbImage, multiplier: f64) -> CorruptResult<RgbImage> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(CorruptError::invalid_argument(format!(
            "black corner multiplier must be finite and >= 0, got {multiplier}"
        )));
    }
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    let (cx, cy) = (w / 2, h / 2);
    let base = cx.min(cy).min(w - cx).min(h - cy);
    let radius = (base as f64 * multiplier) as i64;
    let r2 = radius * radius;

    let mut out = src.clone();
    for (x, y, p) in out.enumerate_pixels_mut() {
        let (dx, dy) = (i64::from(x) - cx, i64::from(y) - cy);
        if dx * dx + dy * dy > r2 {
            p.0 = [0, 0, 0];
        }
    }
    Ok(out)
}

/// Scribble `1..=max_words` random lowercase words in random colors.
///
/// Word length is drawn from `3..=max_letters` and font scale from `[0.14, max_font_scale]` in
/// steps of 0.01.
pub(crate) fn characters<R: Rng + ?Sized>(
    src: &RgbImage,
    max_words: i64,
    max_letters: i64,
    max_font_scale: f64,
    rng: &mut R,
) -> RgbImage {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    let mut out = src.clone();
    let num_words = randint(rng, 1, max_words);
    let max_cents = (max_font_scale * 100.0) as i64;

    for _ in 0..num_words {
        let num_letters = randint(rng, MIN_LETTERS, max_letters);
        let font_scale = randint(rng, MIN_FONT_CENTS, max_cents) as f64 / 100.0;
        let word: String = (0..num_letters)
            .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
            .collect();
        let x = randint(rng, TEXT_MARGIN, w - TEXT_ROOM_PER_LETTER * num_letters);
        let y = randint(rng, TEXT_MARGIN, h - TEXT_MARGIN);
        let color: [u8; 3] = [rng.r#gen(), rng.r#gen(), rng.r#gen()];
        font::draw_text(&mut out, &word, (x, y), font_scale, color);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ops/microscopy.rs"]
mod tests;
