//! Severity schedules: five ordered parameter presets per corruption.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::foundation::error::{CorruptError, CorruptResult};

/// Number of presets every schedule carries (severities `0..=4`, shown to users as `1..=5`).
pub const SEVERITY_LEVELS: usize = 5;

/// How an operator resolves its parameters for one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Index the schedule at the given severity.
    Severity(usize),
    /// Sample uniformly between the first and last presets.
    Augment,
}

impl Mode {
    /// Translate the `(severity, augmentation)` calling convention.
    ///
    /// `severity` is ignored when `augmentation` is set; otherwise it must be non-negative. The
    /// upper bound is checked against the schedule when the operator resolves its parameters.
    pub fn from_call(severity: i64, augmentation: bool) -> CorruptResult<Self> {
        if augmentation {
            return Ok(Self::Augment);
        }
        usize::try_from(severity)
            .map(Self::Severity)
            .map_err(|_| {
                CorruptError::invalid_argument(format!(
                    "severity must be in [0, {SEVERITY_LEVELS}) when augmentation is off, got {severity}"
                ))
            })
    }

    /// Severity index, if any.
    pub fn severity(self) -> Option<usize> {
        match self {
            Self::Severity(s) => Some(s),
            Self::Augment => None,
        }
    }
}

/// Parameter preset stored in a [`Schedule`].
pub trait Preset: Clone + fmt::Debug + PartialEq + Serialize {
    /// Number of scalar parameters in one preset.
    const ARITY: usize;

    /// Build a preset from an untyped row. Fails if `values.len() != ARITY`.
    fn from_values(values: &[f64]) -> CorruptResult<Self>;

    /// Flatten to scalars, in declaration order.
    fn values(&self) -> Vec<f64>;

    /// Sample a preset inside the range spanned by `lo` and `hi`, independently per dimension.
    fn sample_between<R: Rng + ?Sized>(lo: &Self, hi: &Self, rng: &mut R) -> Self;

    /// Reject values the operator cannot work with.
    fn validate(&self) -> CorruptResult<()> {
        if self.values().iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(CorruptError::configuration(format!(
                "preset {self:?} contains non-finite values"
            )))
        }
    }
}

/// Uniform draw in the closed range spanned by `a` and `b`, in either order.
pub(crate) fn uniform<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> f64 {
    if a == b {
        return a;
    }
    let t: f64 = rng.r#gen();
    a + (b - a) * t
}

fn arity_error(expected: usize, values: &[f64]) -> CorruptError {
    CorruptError::invalid_argument(format!(
        "preset arity mismatch: expected {expected} values, got {} ({values:?})",
        values.len()
    ))
}

impl Preset for f64 {
    const ARITY: usize = 1;

    fn from_values(values: &[f64]) -> CorruptResult<Self> {
        match values {
            [v] => Ok(*v),
            _ => Err(arity_error(Self::ARITY, values)),
        }
    }

    fn values(&self) -> Vec<f64> {
        vec![*self]
    }

    fn sample_between<R: Rng + ?Sized>(lo: &Self, hi: &Self, rng: &mut R) -> Self {
        uniform(*lo, *hi, rng)
    }
}

impl Preset for (f64, f64) {
    const ARITY: usize = 2;

    fn from_values(values: &[f64]) -> CorruptResult<Self> {
        match values {
            [a, b] => Ok((*a, *b)),
            _ => Err(arity_error(Self::ARITY, values)),
        }
    }

    fn values(&self) -> Vec<f64> {
        vec![self.0, self.1]
    }

    fn sample_between<R: Rng + ?Sized>(lo: &Self, hi: &Self, rng: &mut R) -> Self {
        (uniform(lo.0, hi.0, rng), uniform(lo.1, hi.1, rng))
    }
}

impl Preset for (f64, f64, f64) {
    const ARITY: usize = 3;

    fn from_values(values: &[f64]) -> CorruptResult<Self> {
        match values {
            [a, b, c] => Ok((*a, *b, *c)),
            _ => Err(arity_error(Self::ARITY, values)),
        }
    }

    fn values(&self) -> Vec<f64> {
        vec![self.0, self.1, self.2]
    }

    fn sample_between<R: Rng + ?Sized>(lo: &Self, hi: &Self, rng: &mut R) -> Self {
        (
            uniform(lo.0, hi.0, rng),
            uniform(lo.1, hi.1, rng),
            uniform(lo.2, hi.2, rng),
        )
    }
}

/// Zoom factor sequence `1.0, 1.0 + step, ...` up to (excluding) `stop`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ZoomSteps {
    /// Exclusive upper bound of the sequence.
    pub stop: f64,
    /// Increment between consecutive factors.
    pub step: f64,
}

impl ZoomSteps {
    /// First zoom factor of every sequence.
    pub const START: f64 = 1.0;

    /// Construct a sequence description.
    pub const fn new(stop: f64, step: f64) -> Self {
        Self { stop, step }
    }

    /// Materialize the zoom factors.
    ///
    /// The element count is `ceil((stop - start) / step)`, residue included, so
    /// `new(1.11, 0.01)` yields twelve factors, the last one just above `1.11`.
    pub fn factors(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.stop <= Self::START {
            return Vec::new();
        }
        let n = ((self.stop - Self::START) / self.step).ceil().max(0.0) as usize;
        (0..n).map(|i| Self::START + i as f64 * self.step).collect()
    }

    /// Largest factor in the sequence, or `START` when it is empty.
    pub fn max_factor(&self) -> f64 {
        self.factors().last().copied().unwrap_or(Self::START)
    }
}

impl Preset for ZoomSteps {
    const ARITY: usize = 2;

    fn from_values(values: &[f64]) -> CorruptResult<Self> {
        match values {
            [stop, step] => Ok(Self::new(*stop, *step)),
            _ => Err(arity_error(Self::ARITY, values)),
        }
    }

    fn values(&self) -> Vec<f64> {
        vec![self.stop, self.step]
    }

    /// The sampled sequence runs from `1.0` to a maximum drawn in `[1.0, hi.max_factor()]`, with
    /// a step drawn between the two presets' steps.
    fn sample_between<R: Rng + ?Sized>(lo: &Self, hi: &Self, rng: &mut R) -> Self {
        let stop = uniform(Self::START, hi.max_factor(), rng);
        let step = uniform(lo.step, hi.step, rng);
        Self::new(stop, step)
    }

    fn validate(&self) -> CorruptResult<()> {
        if !self.stop.is_finite() || !self.step.is_finite() || self.step <= 0.0 {
            return Err(CorruptError::configuration(format!(
                "zoom steps need a finite stop and a positive step, got {self:?}"
            )));
        }
        if self.stop < Self::START {
            return Err(CorruptError::configuration(format!(
                "zoom stop must be >= {}, got {}",
                Self::START,
                self.stop
            )));
        }
        Ok(())
    }
}

/// Exactly [`SEVERITY_LEVELS`] ordered presets of increasing corruption strength.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schedule<P> {
    presets: Vec<P>,
}

impl<P: Preset> Schedule<P> {
    /// Validate and wrap a preset list.
    pub fn new(presets: Vec<P>) -> CorruptResult<Self> {
        if presets.len() != SEVERITY_LEVELS {
            return Err(CorruptError::configuration(format!(
                "schedule must have exactly {SEVERITY_LEVELS} presets, got {}",
                presets.len()
            )));
        }
        for p in &presets {
            p.validate()?;
        }
        Ok(Self { presets })
    }

    /// Build from untyped rows, checking each row's arity against `P::ARITY`.
    pub fn from_rows(rows: &[Vec<f64>]) -> CorruptResult<Self> {
        let presets = rows
            .iter()
            .map(|row| P::from_values(row))
            .collect::<CorruptResult<Vec<_>>>()?;
        Self::new(presets)
    }

    /// All presets in severity order.
    pub fn presets(&self) -> &[P] {
        &self.presets
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Always `false` for a validated schedule.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Preset for the mildest severity.
    pub fn first(&self) -> &P {
        &self.presets[0]
    }

    /// Preset for the strongest severity.
    pub fn last(&self) -> &P {
        &self.presets[self.presets.len() - 1]
    }

    /// Preset at `severity`, failing if the index is outside the schedule.
    pub fn at(&self, severity: usize) -> CorruptResult<&P> {
        self.presets.get(severity).ok_or_else(|| {
            CorruptError::invalid_argument(format!(
                "severity {severity} out of range [0, {})",
                self.presets.len()
            ))
        })
    }

    /// Resolve the parameters for one call.
    pub fn resolve<R: Rng + ?Sized>(&self, mode: Mode, rng: &mut R) -> CorruptResult<P> {
        match mode {
            Mode::Severity(s) => self.at(s).cloned(),
            Mode::Augment => Ok(P::sample_between(self.first(), self.last(), rng)),
        }
    }
}

/// Build a compiled-in scalar schedule.
pub(crate) fn scalar(presets: [f64; SEVERITY_LEVELS]) -> CorruptResult<Schedule<f64>> {
    Schedule::new(presets.to_vec())
}

/// Build a compiled-in pair schedule.
pub(crate) fn pair(presets: [(f64, f64); SEVERITY_LEVELS]) -> CorruptResult<Schedule<(f64, f64)>> {
    Schedule::new(presets.to_vec())
}

/// Build a compiled-in triple schedule.
pub(crate) fn triple(
    presets: [(f64, f64, f64); SEVERITY_LEVELS],
) -> CorruptResult<Schedule<(f64, f64, f64)>> {
    Schedule::new(presets.to_vec())
}

/// Build a compiled-in zoom schedule.
pub(crate) fn zoom(presets: [ZoomSteps; SEVERITY_LEVELS]) -> CorruptResult<Schedule<ZoomSteps>> {
    Schedule::new(presets.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/config/schedule.rs"]
mod tests;
