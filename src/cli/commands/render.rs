//! Render command implementation

use crate::cli::utils;
use anyhow::{anyhow, Context, Result};
use clap::{ArgMatches, Command};
use manifest_generator::Severity;
use std::io::Read;
use tracing::info;

pub fn command() -> Command {
    Command::new("render")
        .about("Render a manifest from a data source configuration")
        .arg(utils::config_arg())
        .arg(utils::data_source_arg())
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("YAML configuration keyed by attribute name (`-` for stdin)")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("state")
                .long("state")
                .help("Print the full resulting state instead of the manifest")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    let app = utils::create_app(config)?;

    let type_name = matches
        .get_one::<String>("data-source")
        .map(String::as_str)
        .unwrap_or_default();
    let input = matches
        .get_one::<String>("input")
        .ok_or_else(|| anyhow!("--input is required"))?;

    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };
    let caller_config: serde_yaml::Value =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {input}"))?;

    info!("Rendering {} from {}", type_name, input);
    let response = app.read(type_name, caller_config).await?;

    for diagnostic in response.diagnostics.iter() {
        match diagnostic.severity {
            Severity::Error => eprintln!("Error: {}", diagnostic_line(diagnostic)),
            Severity::Warning => eprintln!("Warning: {}", diagnostic_line(diagnostic)),
        }
    }

    if response.diagnostics.has_errors() {
        return Err(anyhow!(
            "{} error(s) in configuration for {}",
            response.diagnostics.errors().count(),
            type_name
        ));
    }

    if matches.get_flag("state") {
        if let Some(state) = &response.state {
            print!("{}", serde_yaml::to_string(state)?);
        }
    } else if let Some(yaml) = response.yaml() {
        print!("{yaml}");
    }

    Ok(())
}

fn diagnostic_line(diagnostic: &manifest_generator::Diagnostic) -> String {
    match &diagnostic.path {
        Some(path) => format!("{} at {}: {}", diagnostic.summary, path, diagnostic.detail),
        None => format!("{}: {}", diagnostic.summary, diagnostic.detail),
    }
}
