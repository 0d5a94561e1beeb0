use std::{fmt, sync::Arc};

use anyhow::Context;
use image::RgbImage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::{compression, enhance, filter, microscopy, noise};
use crate::{
    assets::inks::InkBank,
    config::schedule::{Mode, Schedule, ZoomSteps, uniform},
    foundation::{
        error::{CorruptError, CorruptResult},
        image::Image,
    },
};

/// Seed of the throwaway generator impulse noise uses in augmentation mode.
pub const AUGMENT_IMPULSE_SEED: u64 = 99_999;
/// Motion blur direction is drawn uniformly from `[-45, 45]` degrees on every call.
pub const MOTION_ANGLE_RANGE_DEG: f64 = 45.0;

/// Operator family of a [`Corruption`], independent of its registry name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum CorruptionKind {
    Pixelate,
    JpegCompression,
    GaussianBlur,
    DefocusBlur,
    MotionBlur,
    ZoomBlur,
    Brightness,
    Contrast,
    GammaCorrection,
    Saturate,
    GaussianNoise,
    SpeckleNoise,
    ShotNoise,
    ImpulseNoise,
    StainDeposit,
    Bubble,
    BlackCorner,
    Characters,
}

impl CorruptionKind {
    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pixelate => "pixelate",
            Self::JpegCompression => "jpeg_compression",
            Self::GaussianBlur => "gaussian_blur",
            Self::DefocusBlur => "defocus_blur",
            Self::MotionBlur => "motion_blur",
            Self::ZoomBlur => "zoom_blur",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::GammaCorrection => "gamma_correction",
            Self::Saturate => "saturate",
            Self::GaussianNoise => "gaussian_noise",
            Self::SpeckleNoise => "speckle_noise",
            Self::ShotNoise => "shot_noise",
            Self::ImpulseNoise => "impulse_noise",
            Self::StainDeposit => "stain_deposit",
            Self::Bubble => "bubble",
            Self::BlackCorner => "black_corner",
            Self::Characters => "characters",
        }
    }
}

impl fmt::Display for CorruptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured corruption operator: one variant per operator family, each owning its schedule.
///
/// Most variants draw their randomness from the generator passed to [`Corruption::apply`].
/// Impulse noise instead owns a seeded generator so that evaluation sets can be rebuilt
/// bit-for-bit; this is why `apply` takes `&mut self`.
#[derive(Clone, Debug)]
pub enum Corruption {
    /// Box-filter down/up sampling by a resize factor in `(0, 1]`.
    Pixelate(Schedule<f64>),
    /// JPEG encode/decode at a quality in `[1, 100]`.
    JpegCompression(Schedule<f64>),
    /// Gaussian blur at an odd kernel size.
    GaussianBlur(Schedule<f64>),
    /// Disk-kernel blur at `(radius, alias_blur)`.
    DefocusBlur(Schedule<(f64, f64)>),
    /// Directional blur at `(radius, sigma)` with a random angle.
    MotionBlur(Schedule<(f64, f64)>),
    /// Average of center zooms.
    ZoomBlur(Schedule<ZoomSteps>),
    /// Blend against black.
    Brightness(Schedule<f64>),
    /// Blend against the mean luma.
    Contrast(Schedule<f64>),
    /// Power-law intensity remap.
    GammaCorrection(Schedule<f64>),
    /// HSV saturation offset.
    Saturate(Schedule<f64>),
    /// Additive Gaussian noise.
    GaussianNoise(Schedule<f64>),
    /// Multiplicative Gaussian noise.
    SpeckleNoise(Schedule<f64>),
    /// Poisson photon noise at a photon count.
    ShotNoise(Schedule<f64>),
    /// Salt-and-pepper noise with an owned generator.
    ImpulseNoise {
        /// Replacement fraction per severity.
        schedule: Schedule<f64>,
        /// Generator used in severity mode.
        rng: ChaCha8Rng,
    },
    /// Ink stencils stamped onto the image.
    StainDeposit {
        /// Maximum number of marks per severity.
        schedule: Schedule<f64>,
        /// Stencil bank; the packaged bank is used when `None`.
        inks: Option<Arc<InkBank>>,
    },
    /// Translucent bubbles at `(max_radius, max_bubbles)`.
    Bubble(Schedule<(f64, f64)>),
    /// Circular vignette at a radius multiplier.
    BlackCorner(Schedule<f64>),
    /// Random text at `(max_words, max_letters, max_font_scale)`.
    Characters(Schedule<(f64, f64, f64)>),
}

/// Parameters resolved for a single call, after sampling and integer truncation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Params {
    Pixelate { factor: f64 },
    JpegCompression { quality: u8 },
    GaussianBlur { kernel_size: u32 },
    DefocusBlur { radius: f64, alias_blur: f64 },
    MotionBlur { radius: f64, sigma: f64 },
    ZoomBlur { factors: Vec<f64> },
    Brightness { factor: f64 },
    Contrast { factor: f64 },
    GammaCorrection { gamma: f64 },
    Saturate { offset: f64 },
    GaussianNoise { scale: f64 },
    SpeckleNoise { scale: f64 },
    ShotNoise { photons: f64 },
    ImpulseNoise { amount: f64 },
    StainDeposit { max_marks: i64 },
    Bubble { max_radius: i64, max_bubbles: i64 },
    BlackCorner { multiplier: f64 },
    Characters { max_words: i64, max_letters: i64, max_font_scale: f64 },
}

impl Params {
    /// Flatten to scalars in declaration order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Self::Pixelate { factor }
            | Self::Brightness { factor }
            | Self::Contrast { factor } => vec![*factor],
            Self::JpegCompression { quality } => vec![f64::from(*quality)],
            Self::GaussianBlur { kernel_size } => vec![f64::from(*kernel_size)],
            Self::DefocusBlur { radius, alias_blur } => vec![*radius, *alias_blur],
            Self::MotionBlur { radius, sigma } => vec![*radius, *sigma],
            Self::ZoomBlur { factors } => factors.clone(),
            Self::GammaCorrection { gamma } => vec![*gamma],
            Self::Saturate { offset } => vec![*offset],
            Self::GaussianNoise { scale } | Self::SpeckleNoise { scale } => vec![*scale],
            Self::ShotNoise { photons } => vec![*photons],
            Self::ImpulseNoise { amount } => vec![*amount],
            Self::StainDeposit { max_marks } => vec![*max_marks as f64],
            Self::Bubble {
                max_radius,
                max_bubbles,
            } => vec![*max_radius as f64, *max_bubbles as f64],
            Self::BlackCorner { multiplier } => vec![*multiplier],
            Self::Characters {
                max_words,
                max_letters,
                max_font_scale,
            } => vec![*max_words as f64, *max_letters as f64, *max_font_scale],
        }
    }
}

impl Corruption {
    /// Impulse noise whose severity-mode generator is seeded with `seed`.
    pub fn impulse_noise(schedule: Schedule<f64>, seed: u64) -> Self {
        Self::ImpulseNoise {
            schedule,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Stain deposit backed by the packaged ink bank.
    pub fn stain_deposit(schedule: Schedule<f64>) -> Self {
        Self::StainDeposit {
            schedule,
            inks: None,
        }
    }

    /// Replace the ink bank of a stain-deposit operator. Other operators are returned unchanged.
    pub fn with_inks(self, bank: Arc<InkBank>) -> Self {
        match self {
            Self::StainDeposit { schedule, .. } => Self::StainDeposit {
                schedule,
                inks: Some(bank),
            },
            other => other,
        }
    }

    /// Reset the owned generator, if the operator has one. Returns whether anything changed.
    pub fn reseed(&mut self, seed: u64) -> bool {
        match self {
            Self::ImpulseNoise { rng, .. } => {
                *rng = ChaCha8Rng::seed_from_u64(seed);
                true
            }
            _ => false,
        }
    }

    /// Operator family.
    pub fn kind(&self) -> CorruptionKind {
        match self {
            Self::Pixelate(_) => CorruptionKind::Pixelate,
            Self::JpegCompression(_) => CorruptionKind::JpegCompression,
            Self::GaussianBlur(_) => CorruptionKind::GaussianBlur,
            Self::DefocusBlur(_) => CorruptionKind::DefocusBlur,
            Self::MotionBlur(_) => CorruptionKind::MotionBlur,
            Self::ZoomBlur(_) => CorruptionKind::ZoomBlur,
            Self::Brightness(_) => CorruptionKind::Brightness,
            Self::Contrast(_) => CorruptionKind::Contrast,
            Self::GammaCorrection(_) => CorruptionKind::GammaCorrection,
            Self::Saturate(_) => CorruptionKind::Saturate,
            Self::GaussianNoise(_) => CorruptionKind::GaussianNoise,
            Self::SpeckleNoise(_) => CorruptionKind::SpeckleNoise,
            Self::ShotNoise(_) => CorruptionKind::ShotNoise,
            Self::ImpulseNoise { .. } => CorruptionKind::ImpulseNoise,
            Self::StainDeposit { .. } => CorruptionKind::StainDeposit,
            Self::Bubble(_) => CorruptionKind::Bubble,
            Self::BlackCorner(_) => CorruptionKind::BlackCorner,
            Self::Characters(_) => CorruptionKind::Characters,
        }
    }

    /// Whether the operator carries its own generator state.
    pub fn owns_rng(&self) -> bool {
        matches!(self, Self::ImpulseNoise { .. })
    }

    /// Number of severity levels.
    pub fn levels(&self) -> usize {
        match self {
            Self::Pixelate(s)
            | Self::JpegCompression(s)
            | Self::GaussianBlur(s)
            | Self::Brightness(s)
            | Self::Contrast(s)
            | Self::GammaCorrection(s)
            | Self::Saturate(s)
            | Self::GaussianNoise(s)
            | Self::SpeckleNoise(s)
            | Self::ShotNoise(s)
            | Self::BlackCorner(s)
            | Self::ImpulseNoise { schedule: s, .. }
            | Self::StainDeposit { schedule: s, .. } => s.len(),
            Self::DefocusBlur(s) | Self::MotionBlur(s) | Self::Bubble(s) => s.len(),
            Self::ZoomBlur(s) => s.len(),
            Self::Characters(s) => s.len(),
        }
    }

    /// Schedule presets as JSON, in severity order.
    pub fn schedule_json(&self) -> CorruptResult<serde_json::Value> {
        let v = match self {
            Self::Pixelate(s)
            | Self::JpegCompression(s)
            | Self::GaussianBlur(s)
            | Self::Brightness(s)
            | Self::Contrast(s)
            | Self::GammaCorrection(s)
            | Self::Saturate(s)
            | Self::GaussianNoise(s)
            | Self::SpeckleNoise(s)
            | Self::ShotNoise(s)
            | Self::BlackCorner(s)
            | Self::ImpulseNoise { schedule: s, .. }
            | Self::StainDeposit { schedule: s, .. } => serde_json::to_value(s),
            Self::DefocusBlur(s) | Self::MotionBlur(s) | Self::Bubble(s) => serde_json::to_value(s),
            Self::ZoomBlur(s) => serde_json::to_value(s),
            Self::Characters(s) => serde_json::to_value(s),
        };
        Ok(v.with_context(|| format!("serialize {} schedule", self.kind()))?)
    }

    /// Resolve the parameters for one call without touching any pixels.
    ///
    /// Augmentation mode samples between the first and last presets using `rng`. Integer-valued
    /// parameters are truncated after sampling.
    pub fn resolve<R: Rng + ?Sized>(&self, mode: Mode, rng: &mut R) -> CorruptResult<Params> {
        let params = match self {
            Self::Pixelate(s) => Params::Pixelate {
                factor: s.resolve(mode, rng)?,
            },
            Self::JpegCompression(s) => Params::JpegCompression {
                quality: (s.resolve(mode, rng)? as i64).clamp(1, 100) as u8,
            },
            Self::GaussianBlur(s) => {
                let raw = s.resolve(mode, rng)? as i64;
                let kernel = match mode {
                    Mode::Augment if raw % 2 == 0 => raw - 1,
                    _ => raw,
                };
                if kernel < 1 || kernel % 2 == 0 {
                    return Err(CorruptError::invalid_argument(format!(
                        "gaussian blur kernel size must be odd and positive, got {kernel}"
                    )));
                }
                Params::GaussianBlur {
                    kernel_size: u32::try_from(kernel).map_err(|_| {
                        CorruptError::invalid_argument(format!("kernel size {kernel} too large"))
                    })?,
                }
            }
            Self::DefocusBlur(s) => {
                let (radius, alias_blur) = s.resolve(mode, rng)?;
                Params::DefocusBlur { radius, alias_blur }
            }
            Self::MotionBlur(s) => {
                let (radius, sigma) = s.resolve(mode, rng)?;
                Params::MotionBlur { radius, sigma }
            }
            Self::ZoomBlur(s) => Params::ZoomBlur {
                factors: s.resolve(mode, rng)?.factors(),
            },
            Self::Brightness(s) => Params::Brightness {
                factor: s.resolve(mode, rng)?,
            },
            Self::Contrast(s) => Params::Contrast {
                factor: s.resolve(mode, rng)?,
            },
            Self::GammaCorrection(s) => Params::GammaCorrection {
                gamma: s.resolve(mode, rng)?,
            },
            Self::Saturate(s) => Params::Saturate {
                offset: s.resolve(mode, rng)?,
            },
            Self::GaussianNoise(s) => Params::GaussianNoise {
                scale: s.resolve(mode, rng)?,
            },
            Self::SpeckleNoise(s) => Params::SpeckleNoise {
                scale: s.resolve(mode, rng)?,
            },
            Self::ShotNoise(s) => Params::ShotNoise {
                photons: s.resolve(mode, rng)?,
            },
            Self::ImpulseNoise { schedule, .. } => Params::ImpulseNoise {
                amount: schedule.resolve(mode, rng)?,
            },
            Self::StainDeposit { schedule, .. } => Params::StainDeposit {
                max_marks: schedule.resolve(mode, rng)? as i64,
            },
            Self::Bubble(s) => {
                let (radius, bubbles) = s.resolve(mode, rng)?;
                Params::Bubble {
                    max_radius: radius as i64,
                    max_bubbles: bubbles as i64,
                }
            }
            Self::BlackCorner(s) => Params::BlackCorner {
                multiplier: s.resolve(mode, rng)?,
            },
            Self::Characters(s) => {
                let (words, letters, font_scale) = s.resolve(mode, rng)?;
                Params::Characters {
                    max_words: words as i64,
                    max_letters: letters as i64,
                    max_font_scale: font_scale,
                }
            }
        };
        Ok(params)
    }

    /// Corrupt `image`, returning a new image of the same shape and layout.
    ///
    /// Single-channel input is processed as replicated RGB and reduced back to luma.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        image: &Image,
        mode: Mode,
        rng: &mut R,
    ) -> CorruptResult<Image> {
        let params = self.resolve(mode, rng)?;
        tracing::debug!(corruption = %self.kind(), ?mode, ?params, "apply corruption");
        if image.is_empty() {
            return Ok(image.clone());
        }
        let src = image.to_rgb();
        let out = self.render(&params, &src, mode, rng)?;
        Ok(Image::from_rgb_as(out, image.layout()))
    }

    /// `apply` with the `(severity, augmentation)` calling convention; `severity` is ignored in
    /// augmentation mode.
    pub fn apply_call<R: Rng + ?Sized>(
        &mut self,
        image: &Image,
        severity: i64,
        augmentation: bool,
        rng: &mut R,
    ) -> CorruptResult<Image> {
        let mode = Mode::from_call(severity, augmentation)?;
        self.apply(image, mode, rng)
    }

    fn render<R: Rng + ?Sized>(
        &mut self,
        params: &Params,
        src: &RgbImage,
        mode: Mode,
        rng: &mut R,
    ) -> CorruptResult<RgbImage> {
        let out = match params {
            Params::Pixelate { factor } => compression::pixelate(src, *factor)?,
            Params::JpegCompression { quality } => compression::jpeg_round_trip(src, *quality)?,
            Params::GaussianBlur { kernel_size } => filter::gaussian_blur(src, *kernel_size)?,
            Params::DefocusBlur { radius, alias_blur } => {
                filter::defocus_blur(src, *radius, *alias_blur)?
            }
            Params::MotionBlur { radius, sigma } => {
                let angle = uniform(-MOTION_ANGLE_RANGE_DEG, MOTION_ANGLE_RANGE_DEG, rng);
                filter::motion_blur(src, *radius, *sigma, angle)?
            }
            Params::ZoomBlur { factors } => filter::zoom_blur(src, factors)?,
            Params::Brightness { factor } => enhance::brightness(src, *factor)?,
            Params::Contrast { factor } => enhance::contrast(src, *factor)?,
            Params::GammaCorrection { gamma } => enhance::gamma(src, *gamma)?,
            Params::Saturate { offset } => enhance::saturate(src, *offset)?,
            Params::GaussianNoise { scale } => noise::gaussian(src, *scale, rng)?,
            Params::SpeckleNoise { scale } => noise::speckle(src, *scale, rng)?,
            Params::ShotNoise { photons } => noise::shot(src, *photons, rng)?,
            Params::ImpulseNoise { amount } => match (mode, &mut *self) {
                (Mode::Augment, _) => {
                    let mut fresh = ChaCha8Rng::seed_from_u64(AUGMENT_IMPULSE_SEED);
                    noise::impulse(src, *amount, &mut fresh)?
                }
                (Mode::Severity(_), Self::ImpulseNoise { rng: owned, .. }) => {
                    noise::impulse(src, *amount, owned)?
                }
                (Mode::Severity(_), _) => noise::impulse(src, *amount, rng)?,
            },
            Params::StainDeposit { max_marks } => {
                let bank = match &*self {
                    Self::StainDeposit {
                        inks: Some(bank), ..
                    } => Arc::clone(bank),
                    _ => InkBank::packaged()?,
                };
                let stencils = bank.bucket(mode.severity())?;
                microscopy::stain_deposit(src, stencils, *max_marks, rng)
            }
            Params::Bubble {
                max_radius,
                max_bubbles,
            } => microscopy::bubble(src, *max_radius, *max_bubbles, rng),
            Params::BlackCorner { multiplier } => microscopy::black_corner(src, *multiplier)?,
            Params::Characters {
                max_words,
                max_letters,
                max_font_scale,
            } => microscopy::characters(src, *max_words, *max_letters, *max_font_scale, rng),
        };
        if out.dimensions() != src.dimensions() {
            return Err(CorruptError::numeric_range(format!(
                "{} changed image size from {:?} to {:?}",
                self.kind(),
                src.dimensions(),
                out.dimensions()
            )));
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ops/corruption.rs"]
mod tests;
