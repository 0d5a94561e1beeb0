use image::RgbImage;
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};

use crate::foundation::{
    error::{CorruptError, CorruptResult},
    math::unit_to_u8,
};

fn normal(scale: f64) -> CorruptResult<Normal<f64>> {
    if scale.is_nan() || scale < 0.0 {
        return Err(CorruptError::invalid_argument(format!(
            "noise scale must be finite and >= 0, got {scale}"
        )));
    }
    Normal::new(0.0, scale).map_err(|e| {
        CorruptError::invalid_argument(format!("noise scale must be finite and >= 0, got {scale}: {e}"))
    })
}

fn map_unit<R: Rng + ?Sized>(
    src: &RgbImage,
    rng: &mut R,
    mut f: impl FnMut(f64, &mut R) -> f64,
) -> RgbImage {
    let (w, h) = src.dimensions();
    let out: Vec<u8> = src
        .as_raw()
        .iter()
        .map(|&v| unit_to_u8(f(f64::from(v) / 255.0, rng)))
        .collect();
    RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h))
}

/// Additive Gaussian noise with standard deviation `scale` in `[0, 1]` intensity units.
pub(crate) fn gaussian<R: Rng + ?Sized>(
    src: &RgbImage,
    scale: f64,
    rng: &mut R,
) -> CorruptResult<RgbImage> {
    let dist = normal(scale)?;
    Ok(map_unit(src, rng, |x, rng| x + dist.sample(rng)))
}

/// Multiplicative Gaussian noise: `x + x * N(0, scale)`.
pub(crate) fn speckle<R: Rng + ?Sized>(
    src: &RgbImage,
    scale: f64,
    rng: &mut R,
) -> CorruptResult<RgbImage> {
    let dist = normal(scale)?;
    Ok(map_unit(src, rng, |x, rng| x + x * dist.sample(rng)))
}

/// Photon noise: `Poisson(x * photons) / photons`.
pub(crate) fn shot<R: Rng + ?Sized>(
    src: &RgbImage,
    photons: f64,
    rng: &mut R,
) -> CorruptResult<RgbImage> {
    if !photons.is_finite() || photons <= 0.0 {
        return Err(CorruptError::invalid_argument(format!(
            "shot noise photon count must be > 0, got {photons}"
        )));
    }
    // One distribution per input level; a zero rate always yields zero.
    let mut table: Vec<Option<Poisson<f64>>> = Vec::with_capacity(256);
    for level in 0..=255u8 {
        let rate = f64::from(level) / 255.0 * photons;
        table.push(if rate > 0.0 {
            Some(Poisson::new(rate).map_err(|e| {
                CorruptError::invalid_argument(format!("invalid poisson rate {rate}: {e}"))
            })?)
        } else {
            None
        });
    }

    let (w, h) = src.dimensions();
    let out: Vec<u8> = src
        .as_raw()
        .iter()
        .map(|&v| {
            let count = table[v as usize].as_ref().map_or(0.0, |d| d.sample(rng));
            unit_to_u8(count / photons)
        })
        .collect();
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

/// Salt-and-pepper noise.
///
/// A fraction `amount` of all samples is replaced; each replaced sample is white or black with
/// equal probability. The replacement mask is drawn for the whole image before the salt/pepper
/// choice, so a given generator state always produces the same mask.
pub(crate) fn impulse<R: Rng + ?Sized>(
    src: &RgbImage,
    amount: f64,
    rng: &mut R,
) -> CorruptResult<RgbImage> {
    if !(0.0..=1.0).contains(&amount) {
        return Err(CorruptError::invalid_argument(format!(
            "impulse noise amount must be in [0, 1], got {amount}"
        )));
    }
    let raw = src.as_raw();
    let flipped: Vec<bool> = (0..raw.len()).map(|_| rng.gen_bool(amount)).collect();
    let salted: Vec<bool> = (0..raw.len()).map(|_| rng.gen_bool(0.5)).collect();

    let out: Vec<u8> = raw
        .iter()
        .zip(flipped.iter().zip(&salted))
        .map(|(&v, (&flip, &salt))| match (flip, salt) {
            (false, _) => v,
            (true, true) => 255,
            (true, false) => 0,
        })
        .collect();
    let (w, h) = src.dimensions();
    Ok(RgbImage::from_raw(w, h, out).unwrap_or_else(|| RgbImage::new(w, h)))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/noise.rs"]
mod tests;
