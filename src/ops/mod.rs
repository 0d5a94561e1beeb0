//! Corruption operators.
//!
//! [`corruption::Corruption`] is the public entry point; the sibling modules hold the pixel
//! kernels it dispatches to. Kernels operate on RGB buffers only.

pub(crate) mod composite;
pub(crate) mod compression;
/// Operator family, resolved parameters and dispatch.
pub mod corruption;
pub(crate) mod enhance;
pub(crate) mod filter;
pub(crate) mod font;
pub(crate) mod microscopy;
pub(crate) mod noise;
