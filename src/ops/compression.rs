use anyhow::Context;
use image::{ImageFormat, RgbImage, codecs::jpeg::JpegEncoder};

use crate::foundation::{
    error::{CorruptError, CorruptResult},
    math::round_u8,
};

/// Shrink by `factor` with a box filter, then box-resize back to the original size.
pub(crate) fn pixelate(src: &RgbImage, factor: f64) -> CorruptResult<RgbImage> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(CorruptError::invalid_argument(format!(
            "pixelate factor must be > 0, got {factor}"
        )));
    }
    let (w, h) = src.dimensions();
    let small_w = ((f64::from(w) * factor) as u32).max(1);
    let small_h = ((f64::from(h) * factor) as u32).max(1);

    let small = resize_box(src, small_w, small_h);
    Ok(resize_box(&small, w, h))
}

/// Lossy JPEG encode/decode round trip at `quality` (1..=100).
pub(crate) fn jpeg_round_trip(src: &RgbImage, quality: u8) -> CorruptResult<RgbImage> {
    if !(1..=100).contains(&quality) {
        return Err(CorruptError::invalid_argument(format!(
            "jpeg quality must be in [1, 100], got {quality}"
        )));
    }
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(src)
        .context("encode jpeg")?;
    let decoded = image::load_from_memory_with_format(&buf, ImageFormat::Jpeg)
        .context("decode jpeg")?;
    let out = decoded.to_rgb8();
    if out.dimensions() != src.dimensions() {
        return Err(CorruptError::numeric_range(
            "jpeg round trip changed image dimensions",
        ));
    }
    Ok(out)
}

/// Per-output-sample contributions `(first source index, normalized weights)`.
struct Coeffs {
    start: Vec<usize>,
    weights: Vec<Vec<f64>>,
}

/// Box-filter resampling coefficients.
///
/// A source sample contributes when its center falls inside the output sample's footprint; all
/// contributions weigh the same. Upsampling therefore degenerates to nearest-neighbour.
fn box_coeffs(in_len: u32, out_len: u32) -> Coeffs {
    let scale = f64::from(in_len) / f64::from(out_len);
    let filter_scale = scale.max(1.0);
    let support = 0.5 * filter_scale;
    let ss = 1.0 / filter_scale;

    let mut start = Vec::with_capacity(out_len as usize);
    let mut weights = Vec::with_capacity(out_len as usize);
    for o in 0..out_len {
        let center = (f64::from(o) + 0.5) * scale;
        let lo = ((center - support + 0.5) as i64).max(0) as usize;
        let hi = ((center + support + 0.5) as i64).min(i64::from(in_len)) as usize;

        let mut ws: Vec<f64> = (lo..hi)
            .map(|i| {
                let x = (i as f64 - center + 0.5) * ss;
                if (-0.5..0.5).contains(&x) { 1.0 } else { 0.0 }
            })
            .collect();
        let sum: f64 = ws.iter().sum();
        if sum > 0.0 {
            ws.iter_mut().for_each(|w| *w /= sum);
        } else {
            // Footprint narrower than one sample: take the nearest one.
            let nearest = (center as usize).min(in_len as usize - 1);
            start.push(nearest);
            weights.push(vec![1.0]);
            continue;
        }
        start.push(lo);
        weights.push(ws);
    }
    Coeffs { start, weights }
}

fn resize_box(src: &RgbImage, out_w: u32, out_h: u32) -> RgbImage {
    let (w, h) = src.dimensions();
    if (w, h) == (out_w, out_h) {
        return src.clone();
    }
    let tmp = horizontal_pass(src.as_raw(), w, h, out_w);
    let out = vertical_pass(&tmp, out_w, h, out_h);
    RgbImage::from_raw(out_w, out_h, out).unwrap_or_else(|| RgbImage::new(out_w, out_h))
}

fn horizontal_pass(src: &[u8], width: u32, height: u32, out_w: u32) -> Vec<u8> {
    let k = box_coeffs(width, out_w);
    let mut dst = vec![0u8; (out_w * height * 3) as usize];
    for y in 0..height as usize {
        let row = y * width as usize * 3;
        for x in 0..out_w as usize {
            let mut acc = [0.0f64; 3];
            for (i, &wt) in k.weights[x].iter().enumerate() {
                let idx = row + (k.start[x] + i) * 3;
                for c in 0..3 {
                    acc[c] += wt * f64::from(src[idx + c]);
                }
            }
            let out_idx = (y * out_w as usize + x) * 3;
            for c in 0..3 {
                dst[out_idx + c] = round_u8(acc[c]);
            }
        }
    }
    dst
}

fn vertical_pass(src: &[u8], width: u32, height: u32, out_h: u32) -> Vec<u8> {
    let k = box_coeffs(height, out_h);
    let stride = width as usize * 3;
    debug_assert_eq!(src.len(), stride * height as usize);
    let mut dst = vec![0u8; stride * out_h as usize];
    for y in 0..out_h as usize {
        for x in 0..width as usize {
            let mut acc = [0.0f64; 3];
            for (i, &wt) in k.weights[y].iter().enumerate() {
                let idx = (k.start[y] + i) * stride + x * 3;
                for c in 0..3 {
                    acc[c] += wt * f64::from(src[idx + c]);
                }
            }
            let out_idx = y * stride + x * 3;
            for c in 0..3 {
                dst[out_idx + c] = round_u8(acc[c]);
            }
        }
    }
    dst
}

#[cfg(test)]
#[path = "../../tests/unit/ops/compression.rs"]
mod tests;
