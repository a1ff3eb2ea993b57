//! # Tododactyl CLI
//!
//! ## Environment Variables
//!
//! - `DB_URI` or `MONGODB_URL`: MongoDB connection string
//! - `DATABASE_NAME`: target database (or pass `--database`)
//! - `RUST_LOG`: log filter, defaults to `info`

use std::sync::Arc;

use clap::ArgMatches;
use tododactyl::{ConnectionManager, StoreConfig, TodoRepository, logging};

mod cli;
mod demo;

// Global flags are read from the innermost matched subcommand.
fn leaf(matches: &ArgMatches) -> &ArgMatches {
    match matches.subcommand() {
        Some((_, sub_matches)) => sub_matches,
        None => matches,
    }
}

async fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let database = leaf(matches).get_one::<String>("database").map(String::as_str);
    let config = StoreConfig::from_env_with_database(database)?;

    let manager = Arc::new(ConnectionManager::new(config));
    let repo = TodoRepository::new(manager.clone());

    manager.connect().await?;
    let result = cli::handle_cli(matches, &repo).await;
    manager.disconnect().await?;

    result
}

#[tokio::main]
async fn main() {
    let matches = cli::cli().get_matches();

    if let Err(e) = logging::init_tracing(leaf(&matches).get_flag("verbose")) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(&matches).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
