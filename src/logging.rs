//! Tracing setup for the `tododactyl` binary.
//!
//! `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
//! when verbose output is requested.

use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .compact()
        .try_init()
}
