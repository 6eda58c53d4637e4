//! Validate command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file and load every CRD source")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    match utils::get_config_path(matches) {
        Some(path) => println!("Configuration file: {:?}", path),
        None => println!("No configuration file found, using defaults"),
    }

    let config = utils::load_config(matches)?;

    println!("Configuration is valid!");
    println!("Version: {}", config.version);
    println!("Provider prefix: {}", config.provider_prefix);
    println!("Built-in data sources: {}", if config.include_builtin { "enabled" } else { "disabled" });
    println!("CRD sources: {}", config.crd_sources.len());
    println!("Output path: {:?}", config.output.base_path);

    for source in &config.crd_sources {
        println!("  - {} ({:?})", source.name, source.path);
    }

    let app = utils::create_app(config)?;
    println!("Data sources: {}", app.provider().len());

    Ok(())
}
