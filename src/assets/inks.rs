//! Ink stencil bank used by the stain-deposit corruption.
//!
//! The packaged bank is embedded in the binary and parsed at most once per process. Callers that
//! want a different stencil set can build their own [`InkBank`] and hand it to the operator as an
//! `Arc`.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, OnceLock},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CorruptError, CorruptResult};

const PACKAGED_INKS: &[u8] = include_bytes!("../../assets/inks.json");
const FORMAT_VERSION: u32 = 1;

/// Smallest bucket key; severities below it share this bucket.
pub const MIN_BUCKET: u32 = 3;

/// Binary ink stencil. `alpha / 255` is the fraction of light absorbed at each pixel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stencil {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major absorption values.
    pub alpha: Vec<u8>,
}

impl Stencil {
    /// Absorption in `[0, 1]` at `(x, y)`.
    #[inline]
    pub fn absorption(&self, x: u32, y: u32) -> f64 {
        f64::from(self.alpha[(y * self.width + x) as usize]) / 255.0
    }

    fn validate(&self) -> CorruptResult<()> {
        let expected = (self.width as usize) * (self.height as usize);
        if expected == 0 || self.alpha.len() != expected {
            return Err(CorruptError::asset_load(format!(
                "stencil {}x{} has {} alpha samples",
                self.width,
                self.height,
                self.alpha.len()
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct InkBankFile {
    version: u32,
    buckets: BTreeMap<String, Vec<Stencil>>,
}

/// Immutable set of stencils grouped by size bucket.
#[derive(Clone, Debug)]
pub struct InkBank {
    buckets: BTreeMap<u32, Vec<Stencil>>,
}

static PACKAGED: OnceLock<Result<Arc<InkBank>, String>> = OnceLock::new();

impl InkBank {
    /// Shared handle to the bank embedded in the crate. Parsed on first call only.
    pub fn packaged() -> CorruptResult<Arc<InkBank>> {
        PACKAGED
            .get_or_init(|| {
                Self::from_json(PACKAGED_INKS)
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(CorruptError::asset_load)
    }

    /// Parse a bank from its JSON representation.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_json(bytes: &[u8]) -> CorruptResult<Self> {
        let file: InkBankFile = serde_json::from_slice(bytes)
            .map_err(|e| CorruptError::asset_load(format!("parse ink bank: {e}")))?;
        if file.version != FORMAT_VERSION {
            return Err(CorruptError::asset_load(format!(
                "unsupported ink bank version {} (expected {FORMAT_VERSION})",
                file.version
            )));
        }

        let mut buckets = BTreeMap::new();
        for (key, stencils) in file.buckets {
            let k: u32 = key
                .parse()
                .map_err(|_| CorruptError::asset_load(format!("bucket key '{key}' is not an integer")))?;
            if stencils.is_empty() {
                return Err(CorruptError::asset_load(format!("bucket {k} is empty")));
            }
            for s in &stencils {
                s.validate()?;
            }
            buckets.insert(k, stencils);
        }
        if !buckets.contains_key(&MIN_BUCKET) {
            return Err(CorruptError::asset_load(format!(
                "ink bank is missing bucket {MIN_BUCKET}"
            )));
        }

        tracing::debug!(buckets = buckets.len(), "ink bank loaded");
        Ok(Self { buckets })
    }

    /// Read and parse a bank from disk.
    pub fn load(path: impl AsRef<Path>) -> CorruptResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read ink bank {}", path.display()))
            .map_err(|e| CorruptError::asset_load(format!("{e:#}")))?;
        Self::from_json(&bytes)
    }

    /// Bucket key for a severity: `max(3, severity)`. Augmentation calls carry no severity and use
    /// the smallest bucket.
    pub fn bucket_key(severity: Option<usize>) -> u32 {
        severity
            .map(|s| u32::try_from(s).unwrap_or(u32::MAX))
            .unwrap_or(0)
            .max(MIN_BUCKET)
    }

    /// Stencils for `severity`.
    pub fn bucket(&self, severity: Option<usize>) -> CorruptResult<&[Stencil]> {
        let key = Self::bucket_key(severity);
        self.buckets
            .get(&key)
            .map(Vec::as_slice)
            .ok_or_else(|| CorruptError::asset_load(format!("ink bank has no bucket {key}")))
    }

    /// Available bucket keys in ascending order.
    pub fn bucket_keys(&self) -> Vec<u32> {
        self.buckets.keys().copied().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/inks.rs"]
mod tests;
