//! Per-dataset corruption registries.
//!
//! Each dataset has a fixed, ordered set of named operators with dataset-tuned schedules. Entry
//! order matters: it is the order evaluation sets are generated and reported in.

use std::collections::HashSet;

use serde::Serialize;

use super::{
    schedule::{ZoomSteps, pair, scalar, triple, zoom},
    tables::{Dataset, Fold},
};
use crate::{
    foundation::{
        error::{CorruptError, CorruptResult},
        image::ChannelLayout,
        math::derive_seed,
    },
    ops::corruption::{Corruption, CorruptionKind},
};

/// Seed impulse-noise operators start from until [`Registry::seed_generators`] is called.
pub const DEFAULT_IMPULSE_SEED: u64 = 0;

/// Ordered mapping of corruption name to configured operator for one dataset.
#[derive(Clone, Debug)]
pub struct Registry {
    dataset: Dataset,
    entries: Vec<(String, Corruption)>,
}

/// Serializable description of one registry entry.
#[derive(Clone, Debug, Serialize)]
pub struct ManifestEntry {
    /// Registry name.
    pub name: String,
    /// Operator family.
    pub kind: CorruptionKind,
    /// Reporting fold, if the name belongs to one.
    pub fold: Option<Fold>,
    /// Presets in severity order.
    pub presets: serde_json::Value,
}

/// Serializable description of a registry.
#[derive(Clone, Debug, Serialize)]
pub struct Manifest {
    /// Dataset identifier.
    pub dataset: Dataset,
    /// Layout corrupted images are stored in.
    pub channels: ChannelLayout,
    /// Entries in registry order.
    pub corruptions: Vec<ManifestEntry>,
}

impl Registry {
    /// Build the compiled-in registry for `dataset`.
    #[tracing::instrument]
    pub fn for_dataset(dataset: Dataset) -> CorruptResult<Self> {
        let entries = builtin(dataset)?;
        if entries.is_empty() {
            return Err(CorruptError::configuration(format!(
                "dataset {dataset} has no corruptions"
            )));
        }
        let registry = Self::from_entries(dataset, entries)?;
        tracing::debug!(corruptions = registry.len(), "registry built");
        Ok(registry)
    }

    /// Build the registry for a dataset identifier such as `"dermamnist"`.
    pub fn for_name(name: &str) -> CorruptResult<Self> {
        Self::for_dataset(name.parse()?)
    }

    /// Wrap a custom entry list. Names must be unique.
    pub fn from_entries<S: Into<String>>(
        dataset: Dataset,
        entries: impl IntoIterator<Item = (S, Corruption)>,
    ) -> CorruptResult<Self> {
        let entries: Vec<(String, Corruption)> =
            entries.into_iter().map(|(n, c)| (n.into(), c)).collect();
        let mut seen = HashSet::new();
        for (name, _) in &entries {
            if !seen.insert(name.as_str()) {
                return Err(CorruptError::configuration(format!(
                    "duplicate corruption name '{name}' for {dataset}"
                )));
            }
        }
        Ok(Self { dataset, entries })
    }

    /// Dataset the registry was built for.
    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    /// Corruption names in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Operator registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Corruption> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Mutable operator registered under `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Corruption> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Corruption)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Mutable entries in registry order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Corruption)> {
        self.entries.iter_mut().map(|(n, c)| (n.as_str(), c))
    }

    /// Registry restricted to `names`, kept in registry order. Unknown names fail with NotFound.
    pub fn subset(&self, names: &[&str]) -> CorruptResult<Self> {
        if let Some(missing) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(CorruptError::not_found(format!(
                "corruption '{missing}' is not registered for {}",
                self.dataset
            )));
        }
        Ok(Self {
            dataset: self.dataset,
            entries: self
                .entries
                .iter()
                .filter(|(n, _)| names.contains(&n.as_str()))
                .cloned()
                .collect(),
        })
    }

    /// Reseed every operator that owns a generator from `seed` and its name. Returns how many
    /// operators were reseeded.
    pub fn seed_generators(&mut self, seed: u64) -> usize {
        let mut reseeded = 0;
        for (name, op) in &mut self.entries {
            if op.reseed(derive_seed(seed, name)) {
                reseeded += 1;
            }
        }
        reseeded
    }

    /// Describe the registry.
    pub fn manifest(&self) -> CorruptResult<Manifest> {
        let corruptions = self
            .entries
            .iter()
            .map(|(name, op)| {
                Ok(ManifestEntry {
                    name: name.clone(),
                    kind: op.kind(),
                    fold: Fold::of(name),
                    presets: op.schedule_json()?,
                })
            })
            .collect::<CorruptResult<Vec<_>>>()?;
        Ok(Manifest {
            dataset: self.dataset,
            channels: self.dataset.channel_layout(),
            corruptions,
        })
    }

    /// [`Registry::manifest`] as JSON.
    pub fn manifest_json(&self) -> CorruptResult<serde_json::Value> {
        let manifest = self.manifest()?;
        serde_json::to_value(&manifest)
            .map_err(|e| CorruptError::configuration(format!("serialize manifest: {e}")))
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Corruption)> {
        self.entries
    }
}

type Entries = Vec<(&'static str, Corruption)>;

fn builtin(dataset: Dataset) -> CorruptResult<Entries> {
    match dataset {
        Dataset::PathMnist => pathmnist(),
        Dataset::BloodMnist => bloodmnist(),
        Dataset::DermaMnist => dermamnist(),
        Dataset::RetinaMnist => retinamnist(),
        Dataset::TissueMnist => tissuemnist(),
        Dataset::OctMnist => octmnist(),
        Dataset::BreastMnist => breastmnist(),
        Dataset::ChestMnist => chestmnist(),
        Dataset::PneumoniaMnist => pneumoniamnist(),
        Dataset::OrganAMnist | Dataset::OrganCMnist | Dataset::OrganSMnist => organmnist(),
    }
}

fn impulse(presets: [f64; 5]) -> CorruptResult<Corruption> {
    Ok(Corruption::impulse_noise(scalar(presets)?, DEFAULT_IMPULSE_SEED))
}

fn stain(presets: [f64; 5]) -> CorruptResult<Corruption> {
    Ok(Corruption::stain_deposit(scalar(presets)?))
}

fn pathmnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.8, 0.6, 0.40, 0.30, 0.25])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0])?)),
        (
            "defocus_blur",
            Corruption::DefocusBlur(pair([(3.0, 0.1), (4.0, 0.1), (5.0, 0.2), (6.0, 0.2), (7.0, 0.3)])?),
        ),
        (
            "motion_blur",
            Corruption::MotionBlur(pair([(5.0, 5.0), (10.0, 5.0), (15.0, 5.0), (15.0, 8.0), (15.0, 12.0)])?),
        ),
        ("brightness_up", Corruption::Brightness(scalar([1.1, 1.15, 1.2, 1.22, 1.25])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.85, 0.80, 0.75, 0.72, 0.70])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.8, 0.7, 0.6, 0.55, 0.5])?)),
        ("saturate", Corruption::Saturate(scalar([0.05, 0.10, 0.15, 0.20, 0.25])?)),
        ("stain_deposit", stain([1.0, 2.0, 3.0, 4.0, 5.0])?),
        (
            "bubble",
            Corruption::Bubble(pair([(7.0, 15.0), (10.0, 15.0), (12.0, 15.0), (15.0, 20.0), (17.0, 25.0)])?),
        ),
    ])
}

fn bloodmnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.6, 0.5, 0.40, 0.30, 0.25])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0])?)),
        (
            "defocus_blur",
            Corruption::DefocusBlur(pair([(2.0, 0.01), (3.0, 0.1), (4.0, 0.1), (5.0, 0.1), (6.0, 0.1)])?),
        ),
        (
            "motion_blur",
            Corruption::MotionBlur(pair([(3.0, 3.0), (5.0, 5.0), (10.0, 5.0), (10.0, 7.0), (10.0, 9.0)])?),
        ),
        ("brightness_up", Corruption::Brightness(scalar([1.1, 1.2, 1.3, 1.35, 1.4])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.9, 0.8, 0.7, 0.6, 0.5])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.1, 1.15, 1.2, 1.25, 1.3])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.9, 0.8, 0.7, 0.6, 0.5])?)),
        ("saturate", Corruption::Saturate(scalar([0.05, 0.10, 0.15, 0.17, 0.20])?)),
        ("stain_deposit", stain([1.0, 2.0, 3.0, 3.0, 3.0])?),
        (
            "bubble",
            Corruption::Bubble(pair([(5.0, 10.0), (7.0, 10.0), (10.0, 10.0), (12.0, 12.0), (15.0, 12.0)])?),
        ),
    ])
}

fn dermamnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.7, 0.5, 0.40, 0.30, 0.25])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([30.0, 20.0, 15.0, 10.0, 7.0])?)),
        ("gaussian_noise", Corruption::GaussianNoise(scalar([0.04, 0.08, 0.12, 0.18, 0.26])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.05, 0.15, 0.2, 0.35, 0.45])?)),
        ("impulse_noise", impulse([0.01, 0.03, 0.06, 0.09, 0.17])?),
        ("shot_noise", Corruption::ShotNoise(scalar([60.0, 25.0, 18.0, 10.0, 5.0])?)),
        (
            "defocus_blur",
            Corruption::DefocusBlur(pair([(4.0, 0.1), (5.0, 0.2), (6.0, 0.3), (7.0, 0.4), (8.0, 0.5)])?),
        ),
        (
            "motion_blur",
            Corruption::MotionBlur(pair([(10.0, 5.0), (15.0, 5.0), (15.0, 8.0), (15.0, 12.0), (20.0, 15.0)])?),
        ),
        (
            "zoom_blur",
            Corruption::ZoomBlur(zoom([
                ZoomSteps::new(1.11, 0.01),
                ZoomSteps::new(1.16, 0.01),
                ZoomSteps::new(1.21, 0.02),
                ZoomSteps::new(1.26, 0.02),
                ZoomSteps::new(1.31, 0.03),
            ])?),
        ),
        ("brightness_up", Corruption::Brightness(scalar([1.1, 1.2, 1.3, 1.4, 1.5])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.9, 0.8, 0.7, 0.6, 0.5])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.8, 0.7, 0.6, 0.5, 0.4])?)),
        ("black_corner", Corruption::BlackCorner(scalar([1.10, 1.05, 1.00, 0.90, 0.95])?)),
        (
            "characters",
            Corruption::Characters(triple([
                (1.0, 6.0, 0.14),
                (2.0, 7.0, 0.15),
                (3.0, 8.0, 0.16),
                (4.0, 9.0, 0.17),
                (6.0, 10.0, 0.18),
            ])?),
        ),
    ])
}

fn retinamnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.8, 0.60, 0.50, 0.40, 0.35])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([30.0, 25.0, 20.0, 10.0, 5.0])?)),
        ("gaussian_noise", Corruption::GaussianNoise(scalar([0.04, 0.08, 0.12, 0.16, 0.20])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.10, 0.15, 0.20, 0.25, 0.30])?)),
        // Historically six presets; only the first five are reachable.
        (
            "defocus_blur",
            Corruption::DefocusBlur(pair([(4.0, 0.1), (5.0, 0.2), (6.0, 0.3), (7.0, 0.4), (8.0, 0.5)])?),
        ),
        (
            "motion_blur",
            Corruption::MotionBlur(pair([(8.0, 5.0), (15.0, 5.0), (15.0, 8.0), (15.0, 12.0), (20.0, 15.0)])?),
        ),
        ("brightness_down", Corruption::Brightness(scalar([0.9, 0.8, 0.7, 0.6, 0.5])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
    ])
}

fn tissuemnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.40, 0.30, 0.20, 0.15, 0.10])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([25.0, 20.0, 15.0, 10.0, 7.0])?)),
        ("impulse_noise", impulse([0.01, 0.015, 0.02, 0.025, 0.03])?),
        ("gaussian_blur", Corruption::GaussianBlur(scalar([13.0, 15.0, 17.0, 21.0, 25.0])?)),
        ("brightness_up", Corruption::Brightness(scalar([1.3, 1.4, 1.5, 1.6, 1.7])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.8, 0.7, 0.6, 0.5, 0.4])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
    ])
}

fn octmnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.30, 0.25, 0.20, 0.15, 0.10])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([30.0, 15.0, 10.0, 7.0, 5.0])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.15, 0.30, 0.40, 0.50, 0.60])?)),
        (
            "defocus_blur",
            Corruption::DefocusBlur(pair([(0.5, 0.6), (1.0, 0.5), (1.5, 0.1), (2.0, 0.5), (2.5, 0.1)])?),
        ),
        (
            "motion_blur",
            Corruption::MotionBlur(pair([(10.0, 3.0), (15.0, 5.0), (15.0, 8.0), (15.0, 12.0), (20.0, 15.0)])?),
        ),
        ("contrast_down", Corruption::Contrast(scalar([0.6, 0.4, 0.3, 0.2, 0.15])?)),
    ])
}

fn breastmnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.30, 0.25, 0.20, 0.15, 0.10])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.10, 0.15, 0.20, 0.25, 0.30])?)),
        (
            "motion_blur",
            Corruption::MotionBlur(pair([(5.0, 5.0), (9.0, 7.0), (9.0, 10.0), (13.0, 10.0), (17.0, 12.0)])?),
        ),
        ("brightness_up", Corruption::Brightness(scalar([1.4, 1.5, 1.6, 1.8, 2.0])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.55, 0.5, 0.45, 0.4, 0.3])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
    ])
}

fn chestmnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.30, 0.25, 0.20, 0.15, 0.10])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0])?)),
        ("gaussian_noise", Corruption::GaussianNoise(scalar([0.04, 0.08, 0.12, 0.18, 0.26])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.05, 0.15, 0.2, 0.35, 0.45])?)),
        ("impulse_noise", impulse([0.01, 0.03, 0.06, 0.09, 0.17])?),
        ("shot_noise", Corruption::ShotNoise(scalar([60.0, 25.0, 18.0, 10.0, 5.0])?)),
        // Historically six presets; only the first five are reachable.
        ("gaussian_blur", Corruption::GaussianBlur(scalar([3.0, 5.0, 7.0, 9.0, 11.0])?)),
        ("brightness_up", Corruption::Brightness(scalar([1.1, 1.2, 1.3, 1.4, 1.5])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.9, 0.8, 0.7, 0.6, 0.5])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
        ("gamma_corr_up", Corruption::GammaCorrection(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("gamma_corr_down", Corruption::GammaCorrection(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
    ])
}

fn pneumoniamnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.8, 0.7, 0.6, 0.5, 0.40])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0])?)),
        ("gaussian_noise", Corruption::GaussianNoise(scalar([0.04, 0.05, 0.06, 0.07, 0.08])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.05, 0.07, 0.10, 0.15, 0.20])?)),
        ("impulse_noise", impulse([0.005, 0.01, 0.013, 0.017, 0.02])?),
        ("shot_noise", Corruption::ShotNoise(scalar([300.0, 200.0, 150.0, 100.0, 80.0])?)),
        // Historically six presets; only the first five are reachable.
        ("gaussian_blur", Corruption::GaussianBlur(scalar([3.0, 5.0, 7.0, 9.0, 11.0])?)),
        ("brightness_up", Corruption::Brightness(scalar([1.1, 1.2, 1.3, 1.4, 1.5])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.9, 0.8, 0.7, 0.6, 0.5])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
        ("gamma_corr_up", Corruption::GammaCorrection(scalar([1.1, 1.2, 1.3, 1.4, 1.6])?)),
        ("gamma_corr_down", Corruption::GammaCorrection(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
    ])
}

/// Shared by the axial, coronal and sagittal organ datasets.
fn organmnist() -> CorruptResult<Entries> {
    Ok(vec![
        ("pixelate", Corruption::Pixelate(scalar([0.7, 0.6, 0.5, 0.40, 0.35])?)),
        ("jpeg_compression", Corruption::JpegCompression(scalar([50.0, 30.0, 15.0, 10.0, 7.0])?)),
        ("gaussian_noise", Corruption::GaussianNoise(scalar([0.04, 0.08, 0.12, 0.16, 0.20])?)),
        ("speckle_noise", Corruption::SpeckleNoise(scalar([0.05, 0.10, 0.20, 0.30, 0.40])?)),
        ("impulse_noise", impulse([0.01, 0.02, 0.03, 0.05, 0.08])?),
        ("shot_noise", Corruption::ShotNoise(scalar([200.0, 100.0, 50.0, 25.0, 15.0])?)),
        ("gaussian_blur", Corruption::GaussianBlur(scalar([11.0, 13.0, 15.0, 17.0, 21.0])?)),
        ("brightness_up", Corruption::Brightness(scalar([1.2, 1.3, 1.4, 1.5, 1.6])?)),
        ("brightness_down", Corruption::Brightness(scalar([0.8, 0.75, 0.7, 0.65, 0.60])?)),
        ("contrast_up", Corruption::Contrast(scalar([1.3, 1.4, 1.6, 1.7, 1.8])?)),
        ("contrast_down", Corruption::Contrast(scalar([0.8, 0.7, 0.6, 0.55, 0.5])?)),
        ("gamma_corr_up", Corruption::GammaCorrection(scalar([1.3, 1.4, 1.6, 1.8, 2.0])?)),
        ("gamma_corr_down", Corruption::GammaCorrection(scalar([0.9, 0.8, 0.7, 0.6, 0.4])?)),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/config/registry.rs"]
mod tests;
