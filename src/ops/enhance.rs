use image::RgbImage;

use crate::foundation::{
    error::{CorruptError, CorruptResult},
    image::luma_601,
    math::unit_to_u8,
};

fn check_factor(name: &str, factor: f64) -> CorruptResult<f32> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(CorruptError::invalid_argument(format!(
            "{name} factor must be finite and >= 0, got {factor}"
        )));
    }
    Ok(factor as f32)
}

/// `degenerate + factor * (src - degenerate)`, clipped and truncated to u8.
#[inline]
fn blend(degenerate: f32, src: u8, factor: f32) -> u8 {
    let v = degenerate + factor * (f32::from(src) - degenerate);
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v as u8
    }
}

fn map_samples(src: &RgbImage, f: impl Fn(u8) -> u8) -> RgbImage {
    let (w, h) = src.dimensions();
    let out: Vec<u8> = src.as_raw().iter().map(|&v| f(v)).collect();
    RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h))
}

/// Scale intensities towards (factor < 1) or away from black.
pub(crate) fn brightness(src: &RgbImage, factor: f64) -> CorruptResult<RgbImage> {
    let factor = check_factor("brightness", factor)?;
    Ok(map_samples(src, |v| blend(0.0, v, factor)))
}

/// Blend against a flat gray at the image's mean luma.
pub(crate) fn contrast(src: &RgbImage, factor: f64) -> CorruptResult<RgbImage> {
    let factor = check_factor("contrast", factor)?;
    let n = u64::from(src.width()) * u64::from(src.height());
    let sum: u64 = src
        .pixels()
        .map(|p| u64::from(luma_601(p.0[0], p.0[1], p.0[2])))
        .sum();
    let mean = if n == 0 {
        0.0
    } else {
        (sum as f64 / n as f64 + 0.5).floor() as f32
    };
    Ok(map_samples(src, |v| blend(mean, v, factor)))
}

/// Gamma remap with unit gain via a 256-entry lookup table.
pub(crate) fn gamma(src: &RgbImage, gamma: f64) -> CorruptResult<RgbImage> {
    if !gamma.is_finite() || gamma < 0.0 {
        return Err(CorruptError::invalid_argument(format!(
            "gamma must be finite and >= 0, got {gamma}"
        )));
    }
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = (255.0 + 1.0 - 1e-3) * (i as f64 / 255.0).powf(gamma);
        *slot = v.clamp(0.0, 255.0) as u8;
    }
    Ok(map_samples(src, |v| lut[v as usize]))
}

/// Shift HSV saturation by `offset`, clipping it to `[0, 1]`.
pub(crate) fn saturate(src: &RgbImage, offset: f64) -> CorruptResult<RgbImage> {
    if !offset.is_finite() {
        return Err(CorruptError::invalid_argument(format!(
            "saturation offset must be finite, got {offset}"
        )));
    }
    let (w, h) = src.dimensions();
    let mut out = Vec::with_capacity(src.as_raw().len());
    for px in src.as_raw().chunks_exact(3) {
        let rgb = [
            f64::from(px[0]) / 255.0,
            f64::from(px[1]) / 255.0,
            f64::from(px[2]) / 255.0,
        ];
        let [hue, s, v] = rgb_to_hsv(rgb);
        let [r, g, b] = hsv_to_rgb([hue, (s + offset).clamp(0.0, 1.0), v]);
        out.extend([unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)]);
    }
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

/// RGB in `[0, 1]` to HSV with hue in `[0, 1)`.
pub(crate) fn rgb_to_hsv([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };
    if delta == 0.0 {
        return [0.0, s, v];
    }
    let h = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    [(h / 6.0).rem_euclid(1.0), s, v]
}

/// Inverse of [`rgb_to_hsv`].
pub(crate) fn hsv_to_rgb([h, s, v]: [f64; 3]) -> [f64; 3] {
    let h6 = h * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/enhance.rs"]
mod tests;
