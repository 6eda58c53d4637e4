//! List command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("list")
        .about("List registered data sources")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("detailed")
                .long("detailed")
                .help("Show API version, kind and attribute count")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    let app = utils::create_app(config)?;
    let provider = app.provider();

    if provider.is_empty() {
        println!("No data sources registered.");
        return Ok(());
    }

    for type_name in provider.type_names() {
        if !matches.get_flag("detailed") {
            println!("{type_name}");
            continue;
        }

        if let Some(data_source) = provider.data_source(type_name) {
            println!(
                "{}  {} {} ({} attributes)",
                type_name,
                data_source.api_version(),
                data_source.kind(),
                data_source.schema().attribute_count()
            );
        }
    }

    Ok(())
}
