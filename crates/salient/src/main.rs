use anyhow::{Context, Result};
use salient::app::{load_config, run_extraction};
use salient::logging::init_tracing;
use std::path::PathBuf;

fn main() -> Result<()> {
    let config: PathBuf = std::env::args()
        .nth(1)
        .context("usage: salient <config.json>")?
        .into();

    let cfg = load_config(&config)?;
    init_tracing(cfg.log_level.as_deref())?;

    let dump = run_extraction(&cfg)?;
    for (i, f) in dump.corners.iter().enumerate().take(10) {
        println!("#{i:<3} row {:>5} col {:>5} score {:.6}", f.x, f.y, f.score);
    }
    if dump.corners.len() > 10 {
        println!("... {} corners total", dump.corners.len());
    }
    Ok(())
}
