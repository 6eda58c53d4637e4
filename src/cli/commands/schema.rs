//! Schema command implementation

use crate::cli::utils;
use crate::{ManifestGenError, SchemaDocument};
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("schema")
        .about("Print the attribute schema of a data source")
        .arg(utils::config_arg())
        .arg(utils::data_source_arg())
        .arg(
            clap::Arg::new("format")
                .long("format")
                .help("Output format")
                .value_parser(["yaml", "json"])
                .default_value("yaml"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    let app = utils::create_app(config)?;

    let type_name = matches
        .get_one::<String>("data-source")
        .map(String::as_str)
        .unwrap_or_default();
    let data_source = app
        .provider()
        .data_source(type_name)
        .ok_or_else(|| ManifestGenError::UnknownDataSource(type_name.to_string()))?;

    let document = SchemaDocument::new(type_name, data_source.as_ref());
    let output = match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => serde_json::to_string_pretty(&document)? + "\n",
        _ => serde_yaml::to_string(&document)?,
    };
    print!("{output}");

    Ok(())
}
