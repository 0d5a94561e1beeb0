use image::RgbImage;

use crate::foundation::{
    error::{CorruptError, CorruptResult},
    math::{q16_to_u8, round_u8, unit_to_u8},
};

const SIGMA_EPSILON: f64 = 1.0e-12;

/// Isotropic Gaussian blur with an odd `kernel_size` and the default sigma for that size.
pub(crate) fn gaussian_blur(src: &RgbImage, kernel_size: u32) -> CorruptResult<RgbImage> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(CorruptError::invalid_argument(format!(
            "gaussian blur kernel size must be odd and positive, got {kernel_size}"
        )));
    }
    if kernel_size == 1 {
        return Ok(src.clone());
    }

    let sigma = default_sigma(kernel_size as usize);
    let kernel = gaussian_kernel_q16(kernel_size / 2, sigma)?;
    let (w, h) = src.dimensions();
    let mut tmp = vec![0u8; src.as_raw().len()];
    let mut out = vec![0u8; src.as_raw().len()];

    horizontal_pass(src.as_raw(), &mut tmp, w, h, &kernel);
    vertical_pass(&tmp, &mut out, w, h, &kernel);
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

/// Sigma used when only a kernel size is given.
fn default_sigma(kernel_size: usize) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> CorruptResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CorruptError::invalid_argument("blur sigma must be > 0"));
    }

    let weights_f = gaussian_weights(radius as usize, sigma);
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Normalized symmetric Gaussian weights over `-radius..=radius`.
fn gaussian_weights(radius: usize, sigma: f64) -> Vec<f64> {
    let r = radius as i64;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Mirror an out-of-range index without repeating the edge sample (`dcb|abcd|cba`).
pub(crate) fn reflect101(i: i64, n: usize) -> usize {
    let n = n as i64;
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as usize;
    for y in 0..height as usize {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = reflect101(x as i64 + ki as i64 - radius, w);
                let idx = (y * w + sx) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (y * w + x) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = width as usize;
    let h = height as usize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = reflect101(y as i64 + ki as i64 - radius, h);
                let idx = (sy * w + x) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (y * w + x) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

/// Square correlation kernel stored row-major.
#[derive(Clone, Debug)]
pub(crate) struct Kernel2d {
    pub(crate) size: usize,
    pub(crate) weights: Vec<f64>,
}

/// Anti-aliased disk used by the defocus blur.
///
/// Small radii are drawn on a fixed 17x17 grid and smoothed with a 3x3 Gaussian; larger radii get
/// a `(2r+1)`-wide grid and a 5x5 Gaussian.
pub(crate) fn disk_kernel(radius: f64, alias_blur: f64) -> Kernel2d {
    let (coords, smooth): (Vec<f64>, usize) = if radius <= 8.0 {
        ((-8..=8).map(f64::from).collect(), 3)
    } else {
        let n = (2.0 * radius + 1.0).ceil() as usize;
        ((0..n).map(|i| -radius + i as f64).collect(), 5)
    };
    let size = coords.len();
    let r2 = radius * radius;

    let mut weights = Vec::with_capacity(size * size);
    for &y in &coords {
        for &x in &coords {
            weights.push(if x * x + y * y <= r2 { 1.0 } else { 0.0 });
        }
    }
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        weights.iter_mut().for_each(|w| *w /= sum);
    }

    let sigma = if alias_blur > 0.0 {
        alias_blur
    } else {
        default_sigma(smooth)
    };
    let g = gaussian_weights(smooth / 2, sigma);
    let mut smoothing = Vec::with_capacity(smooth * smooth);
    for &gy in &g {
        for &gx in &g {
            smoothing.push(gy * gx);
        }
    }
    let smoothing = Kernel2d {
        size: smooth,
        weights: smoothing,
    };

    Kernel2d {
        size,
        weights: correlate_plane(&weights, size, size, &smoothing),
    }
}

/// 2D correlation of a single plane with reflect-101 borders and a centered anchor.
pub(crate) fn correlate_plane(plane: &[f64], width: usize, height: usize, k: &Kernel2d) -> Vec<f64> {
    let half = (k.size / 2) as i64;
    let mut out = vec![0.0f64; plane.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for ky in 0..k.size {
                let sy = reflect101(y as i64 + ky as i64 - half, height);
                let row = &k.weights[ky * k.size..(ky + 1) * k.size];
                for (kx, &kw) in row.iter().enumerate() {
                    if kw == 0.0 {
                        continue;
                    }
                    let sx = reflect101(x as i64 + kx as i64 - half, width);
                    acc += kw * plane[sy * width + sx];
                }
            }
            out[y * width + x] = acc;
        }
    }
    out
}

/// Convolve each channel with a disk of `radius`, smoothed by `alias_blur`.
pub(crate) fn defocus_blur(src: &RgbImage, radius: f64, alias_blur: f64) -> CorruptResult<RgbImage> {
    if !radius.is_finite() || radius < 0.0 || !alias_blur.is_finite() {
        return Err(CorruptError::invalid_argument(format!(
            "defocus blur needs a finite non-negative radius, got ({radius}, {alias_blur})"
        )));
    }
    let kernel = disk_kernel(radius, alias_blur);
    let (w, h) = src.dimensions();
    let (wu, hu) = (w as usize, h as usize);
    let raw = src.as_raw();

    let mut out = vec![0u8; raw.len()];
    for c in 0..3 {
        let plane: Vec<f64> = raw.iter().skip(c).step_by(3).map(|&v| f64::from(v) / 255.0).collect();
        let blurred = correlate_plane(&plane, wu, hu, &kernel);
        for (i, v) in blurred.into_iter().enumerate() {
            out[i * 3 + c] = unit_to_u8(v);
        }
    }
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

/// Kernel width for a 1D blur: `2 * ceil(radius) + 1`, or derived from sigma when radius is 0.
fn optimal_kernel_width(radius: f64, sigma: f64) -> usize {
    if radius > SIGMA_EPSILON {
        return (2.0 * radius.ceil() + 1.0) as usize;
    }
    let s = sigma.abs().max(SIGMA_EPSILON);
    ((2.0 * (3.0 * s).ceil() + 1.0) as usize).max(3)
}

/// One-sided directional blur along `angle_deg` (0 points along +x).
pub(crate) fn motion_blur(
    src: &RgbImage,
    radius: f64,
    sigma: f64,
    angle_deg: f64,
) -> CorruptResult<RgbImage> {
    if !radius.is_finite() || !sigma.is_finite() || !angle_deg.is_finite() {
        return Err(CorruptError::invalid_argument(format!(
            "motion blur parameters must be finite, got ({radius}, {sigma}, {angle_deg})"
        )));
    }
    let width = optimal_kernel_width(radius, sigma);
    let s = if sigma.abs() < SIGMA_EPSILON {
        SIGMA_EPSILON
    } else {
        sigma
    };
    let mut kernel: Vec<f64> = (0..width)
        .map(|i| {
            let x = i as f64;
            (-(x * x) / (2.0 * s * s)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);

    let theta = angle_deg.to_radians();
    let px = width as f64 * theta.sin();
    let py = width as f64 * theta.cos();
    let hyp = px.hypot(py);
    let offsets: Vec<(i64, i64)> = (0..width)
        .map(|i| {
            let i = i as f64;
            (
                (i * py / hyp - 0.5).ceil() as i64,
                (i * px / hyp - 0.5).ceil() as i64,
            )
        })
        .collect();

    let (w, h) = src.dimensions();
    let (wi, hi) = (i64::from(w), i64::from(h));
    let raw = src.as_raw();
    let mut out = vec![0u8; raw.len()];
    for y in 0..hi {
        for x in 0..wi {
            let mut acc = [0.0f64; 3];
            for (&k, &(ox, oy)) in kernel.iter().zip(&offsets) {
                if k == 0.0 {
                    continue;
                }
                let sx = (x + ox).clamp(0, wi - 1);
                let sy = (y + oy).clamp(0, hi - 1);
                let idx = ((sy * wi + sx) * 3) as usize;
                for c in 0..3 {
                    acc[c] += k * f64::from(raw[idx + c]);
                }
            }
            let out_idx = ((y * wi + x) * 3) as usize;
            for c in 0..3 {
                out[out_idx + c] = round_u8(acc[c]);
            }
        }
    }
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

/// Linear sampling table for one axis of a center-cropped zoom.
struct AxisMap {
    lo: Vec<usize>,
    hi: Vec<usize>,
    t: Vec<f64>,
}

fn zoom_axis(len: usize, factor: f64) -> AxisMap {
    let crop = ((len as f64 / factor).ceil() as usize).clamp(1, len);
    let offset = (len - crop) / 2;
    let zoomed = ((crop as f64 * factor).round() as usize).max(len);
    let trim = (zoomed - len) / 2;

    let mut map = AxisMap {
        lo: Vec::with_capacity(len),
        hi: Vec::with_capacity(len),
        t: Vec::with_capacity(len),
    };
    for o in 0..len {
        let pos = if zoomed > 1 {
            (o + trim) as f64 * (crop - 1) as f64 / (zoomed - 1) as f64
        } else {
            0.0
        };
        let lo = (pos.floor() as usize).min(crop - 1);
        let hi = (lo + 1).min(crop - 1);
        map.lo.push(offset + lo);
        map.hi.push(offset + hi);
        map.t.push(pos - lo as f64);
    }
    map
}

/// Average the image with bilinear center zooms at each factor.
pub(crate) fn zoom_blur(src: &RgbImage, factors: &[f64]) -> CorruptResult<RgbImage> {
    if let Some(bad) = factors.iter().find(|f| !f.is_finite() || **f < 1.0) {
        return Err(CorruptError::invalid_argument(format!(
            "zoom factors must be finite and >= 1, got {bad}"
        )));
    }
    let (w, h) = src.dimensions();
    let (wu, hu) = (w as usize, h as usize);
    let img: Vec<f64> = src.as_raw().iter().map(|&v| f64::from(v) / 255.0).collect();
    let mut acc = img.clone();

    for &factor in factors {
        let xs = zoom_axis(wu, factor);
        let ys = zoom_axis(hu, factor);
        for y in 0..hu {
            let (y0, y1, ty) = (ys.lo[y], ys.hi[y], ys.t[y]);
            for x in 0..wu {
                let (x0, x1, tx) = (xs.lo[x], xs.hi[x], xs.t[x]);
                for c in 0..3 {
                    let p = |yy: usize, xx: usize| img[(yy * wu + xx) * 3 + c];
                    let top = p(y0, x0) * (1.0 - tx) + p(y0, x1) * tx;
                    let bottom = p(y1, x0) * (1.0 - tx) + p(y1, x1) * tx;
                    acc[(y * wu + x) * 3 + c] += top * (1.0 - ty) + bottom * ty;
                }
            }
        }
    }

    let n = (factors.len() + 1) as f64;
    let out: Vec<u8> = acc.into_iter().map(|v| unit_to_u8(v / n)).collect();
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/filter.rs"]
mod tests;
