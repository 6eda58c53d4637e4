//! Init command implementation

use crate::config::{Config, CrdSource};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(".manifest-gen.yaml"),
        )
        .arg(
            clap::Arg::new("example")
                .short('e')
                .long("example")
                .help("Create example configuration")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite an existing file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Output path is required"))?;
    let example = matches.get_flag("example");

    if output_path.exists() && !matches.get_flag("force") {
        return Err(anyhow!(
            "Configuration file already exists: {:?} (use --force to overwrite)",
            output_path
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);

    let config = if example {
        create_example_config()
    } else {
        Config::default()
    };

    config.save_to_file(&output_path)?;

    info!("Configuration file created: {:?}", output_path);

    if example {
        println!("Example configuration created with a sample CRD source.");
        println!("Edit the file to point at your CRD directories.");
    } else {
        println!("Default configuration file created.");
        println!("The built-in ContourConfiguration data source is enabled.");
    }

    Ok(())
}

fn create_example_config() -> Config {
    let mut config = Config::default();

    config.crd_sources.push(CrdSource {
        name: "example-crds".to_string(),
        path: PathBuf::from("./crds"),
        filters: vec!["example.com/*".to_string()],
    });

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".manifest-gen.yaml");
        let path_arg = path.to_string_lossy().to_string();

        let matches = command()
            .try_get_matches_from(["init", "--example", "--output", path_arg.as_str()])
            .unwrap();
        run(&matches).await.unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.crd_sources[0].name, "example-crds");

        // Second run without --force refuses to overwrite
        assert!(run(&matches).await.is_err());
    }
}
