//! Info command implementation

use crate::provider::contour;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .long("detailed")
            .help("Show detailed information")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("ManifestGen - CRD manifest data sources");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Built-in: {} {}", contour::API_VERSION, contour::KIND);

    if detailed {
        println!("\nDetailed Information:");
        println!("  - Attribute schemas derived from CRD OpenAPI v3 schemas");
        println!("  - snake_case attributes mapped back to camelCase manifest fields");
        println!("  - Declarative validators: length, numeric bounds, enums, patterns");
        println!("  - Kubernetes name, label and annotation rules on metadata");
        println!("  - Unset optional fields omitted from rendered YAML");
        println!("  - Diagnostics collected with attribute paths");
    }

    Ok(())
}
