//! Compiled-in configuration: schedules, per-dataset registries and lookup tables.

/// Per-dataset ordered operator registries.
pub mod registry;
/// Five-level severity schedules and invocation modes.
pub mod schedule;
/// Dataset identifiers, channel convention and reporting folds.
pub mod tables;
