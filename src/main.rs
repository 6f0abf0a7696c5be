//! SPRi dashboard binary.
//!
//! Usage: `spriview [CONFIG.yaml]`. Log verbosity follows `RUST_LOG`
//! (default `info`).

use std::path::PathBuf;

use spriview::{run_dashboard, DashboardConfig, DashboardError};

fn main() -> Result<(), DashboardError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let cfg = DashboardConfig::load(explicit.as_deref())?;
    run_dashboard(cfg)
}
