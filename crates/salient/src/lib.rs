//! Response-surface I/O, run configuration and CLI around `salient-core`.
//!
//! - [`surface`] – binary and JSON response-surface files.
//! - [`app`] – JSON run configuration and the load/preprocess/extract/dump
//!   pipeline shared by the CLI and examples.
//! - [`logging`] – `tracing` subscriber setup.
//!
//! The core API is re-exported from the crate root.

pub mod app;
pub mod logging;
pub mod surface;

pub use salient_core::*;

use anyhow::Result;

/// Extract `[row, column]` corners from a [`ResponseMap`].
pub fn extract_corners_map(map: &ResponseMap, params: &ExtractParams<f32>) -> Result<Vec<[usize; 2]>> {
    Ok(extract_corners(&map.view()?, params)?)
}

/// Extract scored corners from a [`ResponseMap`] and wrap them into features.
pub fn extract_features_map(
    map: &ResponseMap,
    params: &ExtractParams<f32>,
    octave: u32,
    extent: f32,
) -> Result<Vec<Feature>> {
    let scored = extract_scored(&map.view()?, params)?;
    Ok(features_from_scored(&scored, octave, extent, extent)?)
}
