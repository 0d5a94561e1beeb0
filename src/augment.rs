//! Training-time augmentation: one random corruption (or none) per call.

use rand::Rng;

use crate::{
    config::{registry::Registry, schedule::Mode},
    foundation::{
        error::{CorruptError, CorruptResult},
        image::Image,
    },
    ops::corruption::Corruption,
};

/// Name reported for the no-op choice.
pub const IDENTITY: &str = "identity";

/// What a sampler call picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Input returned unchanged.
    Identity,
    /// Named corruption applied in augmentation mode.
    Corruption(String),
}

impl Choice {
    /// Registry name of the choice, or [`IDENTITY`].
    pub fn name(&self) -> &str {
        match self {
            Self::Identity => IDENTITY,
            Self::Corruption(name) => name,
        }
    }
}

/// Draws uniformly from the pool's corruptions plus identity, then applies the pick with
/// parameters sampled between the mildest and strongest presets.
///
/// Calls are independent: nothing is remembered between draws.
#[derive(Clone, Debug)]
pub struct AugmentationSampler {
    pool: Vec<(String, Corruption)>,
}

impl AugmentationSampler {
    /// Build a sampler over `pool`. Fails with InvalidArgument if the pool is empty.
    pub fn new(pool: Registry) -> CorruptResult<Self> {
        if pool.is_empty() {
            return Err(CorruptError::invalid_argument(
                "augmentation pool must contain at least one corruption",
            ));
        }
        Ok(Self {
            pool: pool.into_entries(),
        })
    }

    /// Corruption names in the pool, without identity.
    pub fn names(&self) -> Vec<&str> {
        self.pool.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of equally likely outcomes, identity included.
    pub fn outcomes(&self) -> usize {
        self.pool.len() + 1
    }

    /// Augment one image.
    pub fn sample<R: Rng + ?Sized>(&mut self, image: &Image, rng: &mut R) -> CorruptResult<Image> {
        self.sample_with_choice(image, rng).map(|(img, _)| img)
    }

    /// Augment one image and report which outcome was drawn.
    pub fn sample_with_choice<R: Rng + ?Sized>(
        &mut self,
        image: &Image,
        rng: &mut R,
    ) -> CorruptResult<(Image, Choice)> {
        let pick = rng.gen_range(0..self.outcomes());
        let Some((name, op)) = self.pool.get_mut(pick) else {
            tracing::debug!(choice = IDENTITY, "augmentation sampled");
            return Ok((image.clone(), Choice::Identity));
        };
        tracing::debug!(choice = %name, "augmentation sampled");
        let out = op.apply(image, Mode::Augment, rng)?;
        Ok((out, Choice::Corruption(name.clone())))
    }
}

#[cfg(test)]
#[path = "../tests/unit/augment.rs"]
mod tests;
