//! Generate command implementation

use crate::cli::utils;
use crate::config::OrganizationStrategy;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use manifest_generator::GenerationResult;
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("generate")
        .about("Write the attribute schema of every data source plus an index")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory")
                .value_name("DIR"),
        )
        .arg(
            clap::Arg::new("organization")
                .long("organization")
                .help("Directory layout of generated documents")
                .value_parser(["api_version", "flat", "hierarchical"]),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Starting schema document generation");

    let mut config = utils::load_config(matches)?;

    // Override output path if specified
    if let Some(output_path) = matches.get_one::<String>("output") {
        config.output.base_path = PathBuf::from(output_path);
    }

    if let Some(organization) = matches.get_one::<String>("organization") {
        config.output.organization = match organization.as_str() {
            "flat" => OrganizationStrategy::Flat,
            "hierarchical" => OrganizationStrategy::Hierarchical,
            _ => OrganizationStrategy::ApiVersion,
        };
    }

    let app = utils::create_app(config)?;
    let result = app.generate().await?;

    println!("Generation completed!");
    println!("Data sources processed: {}", result.results.len());
    println!("Files generated: {}", result.files_generated());
    println!(
        "Processing time: {}",
        crate::utils::format_duration(std::time::Duration::from_millis(result.processing_time_ms))
    );

    for source_result in &result.results {
        let status = if source_result.is_success() { "ok" } else { "failed" };
        println!(
            "  {}: {} files generated ({status})",
            source_result.type_name,
            source_result.files_generated.len()
        );
        for error in &source_result.errors {
            eprintln!("    Error: {error}");
        }
    }

    if let Some(index_path) = &result.index_path {
        println!("Index: {:?}", index_path);
    }

    check_result(&result)
}

/// Fails when any data source could not be written
fn check_result(result: &GenerationResult) -> Result<()> {
    match result.error_count() {
        0 => Ok(()),
        count => {
            let failed: Vec<&str> = result
                .results
                .iter()
                .filter(|r| !r.is_success())
                .map(|r| r.type_name.as_str())
                .collect();
            Err(anyhow!(
                "{count} error(s) while generating schema documents for {}",
                failed.join(", ")
            ))
        }
    }
}
