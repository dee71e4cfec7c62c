//! Tracing subscriber setup for the CLI and examples.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install a global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `"debug"` or
/// `"salient=trace"`) is used, falling back to `info`.
pub fn init_tracing(default_level: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = default_level.unwrap_or("info");
            EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?
        }
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("tracing subscriber already installed")?;
    Ok(())
}
