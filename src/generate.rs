//! In-memory generation of severity-indexed evaluation sets.
//!
//! For every registry entry the helper corrupts every image at severities `0..5`, stores the
//! result in the dataset's channel layout and repeats the labels alongside. Storage is left to the
//! caller.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::{
    config::{
        registry::Registry,
        schedule::{Mode, SEVERITY_LEVELS},
        tables::Dataset,
    },
    foundation::{
        error::{CorruptError, CorruptResult},
        image::{ChannelLayout, Image},
        math::{derive_seed, derive_seed_indexed},
    },
    ops::corruption::Corruption,
};

/// Controls for [`generate_corrupted_set`].
#[derive(Clone, Debug)]
pub struct GenerateOpts {
    /// Run seed every per-image generator is derived from.
    pub seed: u64,
    /// Restrict generation to these corruption names. `None` generates every entry.
    pub corruptions: Option<Vec<String>>,
    /// Corrupt images in parallel.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            seed: 0,
            corruptions: None,
            parallel: false,
            threads: None,
        }
    }
}

/// Corrupted copies of a test split for one corruption.
///
/// Entries are ordered severity-major: all images at severity 0, then all at severity 1, etc.
#[derive(Clone, Debug)]
pub struct CorruptedSet<L> {
    /// Registry name of the corruption.
    pub corruption: String,
    /// Corrupted images in the dataset's channel layout.
    pub images: Vec<Image>,
    /// Labels, repeated once per severity.
    pub labels: Vec<L>,
    /// Severity each image was generated at.
    pub severities: Vec<usize>,
}

impl<L> CorruptedSet<L> {
    /// Number of corrupted images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Generator seed for one image of one corruption at one severity.
///
/// Independent of scheduling, so parallel and sequential runs produce identical sets.
pub fn image_seed(run_seed: u64, corruption: &str, severity: usize, index: usize) -> u64 {
    let per_corruption = derive_seed(run_seed, corruption);
    let per_severity = derive_seed_indexed(per_corruption, severity as u64);
    derive_seed_indexed(per_severity, index as u64)
}

/// Build the corrupted evaluation sets for `dataset`.
#[tracing::instrument(skip(images, labels, opts), fields(images = images.len()))]
pub fn generate_corrupted_set<L: Clone + Send + Sync>(
    dataset: Dataset,
    images: &[Image],
    labels: &[L],
    opts: &GenerateOpts,
) -> CorruptResult<Vec<CorruptedSet<L>>> {
    let registry = Registry::for_dataset(dataset)?;
    let registry = match &opts.corruptions {
        Some(names) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            registry.subset(&names)?
        }
        None => registry,
    };
    generate_with_registry(registry, images, labels, opts)
}

/// [`generate_corrupted_set`] over an explicit registry. `opts.corruptions` is ignored.
pub fn generate_with_registry<L: Clone + Send + Sync>(
    mut registry: Registry,
    images: &[Image],
    labels: &[L],
    opts: &GenerateOpts,
) -> CorruptResult<Vec<CorruptedSet<L>>> {
    if images.len() != labels.len() {
        return Err(CorruptError::invalid_argument(format!(
            "got {} images but {} labels",
            images.len(),
            labels.len()
        )));
    }
    let layout = registry.dataset().channel_layout();
    registry.seed_generators(opts.seed);
    let pool = if opts.parallel {
        Some(build_thread_pool(opts.threads)?)
    } else {
        None
    };

    let mut sets = Vec::with_capacity(registry.len());
    for (name, op) in registry.iter_mut() {
        tracing::info!(corruption = name, "generating corrupted set");
        let mut out = Vec::with_capacity(images.len() * SEVERITY_LEVELS);
        let mut severities = Vec::with_capacity(images.len() * SEVERITY_LEVELS);
        for severity in 0..SEVERITY_LEVELS {
            let batch = match &pool {
                // Owned generator state is one sequential stream.
                Some(pool) if !op.owns_rng() => {
                    corrupt_parallel(pool, op, name, severity, images, layout, opts.seed)?
                }
                _ => corrupt_sequential(op, name, severity, images, layout, opts.seed)?,
            };
            out.extend(batch);
            severities.extend(std::iter::repeat_n(severity, images.len()));
        }
        let labels = (0..SEVERITY_LEVELS)
            .flat_map(|_| labels.iter().cloned())
            .collect();
        sets.push(CorruptedSet {
            corruption: name.to_owned(),
            images: out,
            labels,
            severities,
        });
    }
    Ok(sets)
}

fn corrupt_one(
    op: &mut Corruption,
    name: &str,
    severity: usize,
    index: usize,
    image: &Image,
    layout: ChannelLayout,
    run_seed: u64,
) -> CorruptResult<Image> {
    let mut rng = ChaCha8Rng::seed_from_u64(image_seed(run_seed, name, severity, index));
    let corrupted = op.apply(image, Mode::Severity(severity), &mut rng)?;
    let stored = conform(corrupted, layout);
    check_output(image, &stored, layout, name)?;
    Ok(stored)
}

fn corrupt_sequential(
    op: &mut Corruption,
    name: &str,
    severity: usize,
    images: &[Image],
    layout: ChannelLayout,
    run_seed: u64,
) -> CorruptResult<Vec<Image>> {
    images
        .iter()
        .enumerate()
        .map(|(i, img)| corrupt_one(op, name, severity, i, img, layout, run_seed))
        .collect()
}

fn corrupt_parallel(
    pool: &rayon::ThreadPool,
    op: &Corruption,
    name: &str,
    severity: usize,
    images: &[Image],
    layout: ChannelLayout,
    run_seed: u64,
) -> CorruptResult<Vec<Image>> {
    pool.install(|| {
        images
            .par_iter()
            .enumerate()
            .map_init(
                || op.clone(),
                |worker_op, (i, img)| {
                    corrupt_one(worker_op, name, severity, i, img, layout, run_seed)
                },
            )
            .collect::<CorruptResult<Vec<_>>>()
    })
}

/// Convert an operator result to the stored channel layout.
fn conform(image: Image, layout: ChannelLayout) -> Image {
    match (image.layout(), layout) {
        (ChannelLayout::Rgb, ChannelLayout::Gray) => image.to_luma(),
        (ChannelLayout::Gray, ChannelLayout::Rgb) => Image::from_rgb(image.to_rgb()),
        _ => image,
    }
}

fn check_output(
    input: &Image,
    output: &Image,
    layout: ChannelLayout,
    name: &str,
) -> CorruptResult<()> {
    let expected = (input.width() as usize) * (input.height() as usize) * layout.channels();
    if output.width() != input.width()
        || output.height() != input.height()
        || output.layout() != layout
        || output.as_bytes().len() != expected
    {
        return Err(CorruptError::numeric_range(format!(
            "{name} produced shape {:?} for input {:?}",
            output.shape(),
            input.shape()
        )));
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> CorruptResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CorruptError::invalid_argument(
            "generation 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CorruptError::configuration(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/generate.rs"]
mod tests;
