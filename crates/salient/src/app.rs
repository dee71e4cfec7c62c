//! Shared application-level helpers for the CLI and examples.
//!
//! These functions wire up I/O (load a response surface, optional
//! normalization and range remapping, JSON output) around the `salient-core`
//! extraction API so the CLI and examples share the same behavior.

use crate::surface::load_surface;
use anyhow::{bail, Context, Result};
use salient_core::norm::try_ranged;
use salient_core::{
    extract_scored, features_from_scored, normalized, Error, ExtractParams, Feature, NormKind,
    ResponseMap, TiePolicy,
};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, num::NonZeroUsize, path::Path, path::PathBuf};
use tracing::{debug, info, warn};

/// Run configuration, usually read from a JSON file with [`load_config`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Response surface to read (`.bin` or `.json`).
    pub surface: PathBuf,
    /// Keep at most this many corners; absent or zero keeps all.
    pub count: Option<usize>,
    /// Exclusive response threshold, applied after preprocessing.
    pub threshold: Option<f32>,
    pub ties: Option<TiePolicy>,
    /// Divide the surface by this norm before extraction.
    pub normalize: Option<NormKind>,
    /// Remap the surface onto `[min, max]` before extraction.
    pub range: Option<[f32; 2]>,
    pub octave: Option<u32>,
    /// Square extent assigned to every feature, in pixels.
    pub extent: Option<f32>,
    pub output_json: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// JSON result of a run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionDump {
    pub surface: String,
    pub width: usize,
    pub height: usize,
    pub threshold: f32,
    pub count: Option<usize>,
    pub corners: Vec<Feature>,
}

/// Load the surface named by `cfg`, extract features and write the JSON dump.
///
/// The dump goes to `cfg.output_json`, or next to the surface as
/// `<surface>.corners.json`. It is also returned.
pub fn run_extraction(cfg: &ExtractionConfig) -> Result<ExtractionDump> {
    let mut map = load_surface(&cfg.surface)?;
    info!(
        surface = %cfg.surface.display(),
        w = map.w,
        h = map.h,
        "loaded response surface"
    );

    let dump = extract_from_map(&mut map, cfg)?;

    let json_out = cfg
        .output_json
        .clone()
        .unwrap_or_else(|| cfg.surface.with_extension("corners.json"));
    write_json(&json_out, &dump)?;
    info!(corners = dump.corners.len(), out = %json_out.display(), "wrote corners");

    Ok(dump)
}

/// Preprocess `map` in place as configured and extract features from it.
pub fn extract_from_map(map: &mut ResponseMap, cfg: &ExtractionConfig) -> Result<ExtractionDump> {
    preprocess(map, cfg)?;

    let mut params = ExtractParams::<f32>::default();
    apply_params_overrides(&mut params, cfg);

    let view = map.view()?;
    let scored = extract_scored(&view, &params)?;
    debug!(
        candidates = scored.len(),
        threshold = params.threshold,
        "ranked corners"
    );

    let extent = cfg.extent.unwrap_or(1.0);
    let corners = features_from_scored(&scored, cfg.octave.unwrap_or(0), extent, extent)?;

    Ok(ExtractionDump {
        surface: cfg.surface.to_string_lossy().into_owned(),
        width: map.w,
        height: map.h,
        threshold: params.threshold,
        count: params.count.map(|c| c.get()),
        corners,
    })
}

fn preprocess(map: &mut ResponseMap, cfg: &ExtractionConfig) -> Result<()> {
    if let Some(kind) = cfg.normalize {
        let mut view = map.view_mut()?;
        normalized(&mut view, kind);
        debug!(?kind, "normalized surface");
    }

    if let Some([lo, hi]) = cfg.range {
        if lo.is_nan() || hi.is_nan() || lo >= hi {
            bail!("range must satisfy min < max, got [{lo}, {hi}]");
        }
        let mut view = map.view_mut()?;
        match try_ranged(&mut view, lo, hi) {
            Ok(_) => debug!(lo, hi, "remapped surface range"),
            // A flat surface has nothing to rank; leave it as is.
            Err(Error::DegenerateRange { value }) => {
                warn!(value, "surface is constant, skipping range remap")
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn apply_params_overrides(params: &mut ExtractParams<f32>, cfg: &ExtractionConfig) {
    if let Some(n) = cfg.count {
        params.count = NonZeroUsize::new(n);
    }
    if let Some(t) = cfg.threshold {
        params.threshold = t;
    }
    if let Some(ties) = cfg.ties {
        params.ties = ties;
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

/// Read a JSON run configuration.
pub fn load_config(path: &Path) -> Result<ExtractionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: ExtractionConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
