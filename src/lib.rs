//! medcorrupt generates reproducible, parameterized corruptions of medical images for robustness
//! benchmarks.
//!
//! Every corruption supports two invocation modes:
//!
//! - **Severity** ([`Mode::Severity`]): parameters come from a fixed five-level [`Schedule`], used
//!   to build evaluation sets.
//! - **Augmentation** ([`Mode::Augment`]): parameters are sampled uniformly between the mildest
//!   and strongest presets, used at training time through [`AugmentationSampler`].
//!
//! # Overview
//!
//! 1. **Configure**: [`Registry::for_dataset`] builds the ordered, dataset-tuned operator set.
//! 2. **Corrupt**: [`Corruption::apply`] turns one [`Image`] into a new one of the same shape.
//! 3. **Generate** (optional): [`generate_corrupted_set`] runs every operator at every severity
//!    over a test split, in parallel if asked.
//!
//! Randomness is always an explicit generator. Impulse noise owns a seeded generator so evaluation
//! sets can be rebuilt bit-for-bit; every other operator draws from the generator passed in.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Training-time augmentation sampler.
pub mod augment;
/// Schedules, registries and lookup tables.
pub mod config;
/// Batch generation of evaluation sets.
pub mod generate;
/// Corruption operators.
pub mod ops;

pub use crate::assets::inks::{InkBank, MIN_BUCKET, Stencil};
pub use crate::augment::{AugmentationSampler, Choice, IDENTITY};
pub use crate::config::registry::{DEFAULT_IMPULSE_SEED, Manifest, ManifestEntry, Registry};
pub use crate::config::schedule::{Mode, Preset, SEVERITY_LEVELS, Schedule, ZoomSteps};
pub use crate::config::tables::{Dataset, Fold};
pub use crate::foundation::error::{CorruptError, CorruptResult};
pub use crate::foundation::image::{ChannelLayout, Image};
pub use crate::foundation::math::{derive_seed, derive_seed_indexed};
pub use crate::generate::{
    CorruptedSet, GenerateOpts, generate_corrupted_set, generate_with_registry, image_seed,
};
pub use crate::ops::corruption::{
    AUGMENT_IMPULSE_SEED, Corruption, CorruptionKind, MOTION_ANGLE_RANGE_DEG, Params,
};
