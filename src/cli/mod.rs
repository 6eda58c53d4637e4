//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("manifest-gen")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Render Kubernetes manifests from CRD-derived data sources")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::list::command())
            .subcommand(commands::schema::command())
            .subcommand(commands::render::command())
            .subcommand(commands::generate::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("list", sub_matches)) => commands::list::run(sub_matches).await,
            Some(("schema", sub_matches)) => commands::schema::run(sub_matches).await,
            Some(("render", sub_matches)) => commands::render::run(sub_matches).await,
            Some(("generate", sub_matches)) => commands::generate::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use std::path::PathBuf;
    use tracing::debug;

    /// `--config` argument shared by every command that loads a configuration
    pub fn config_arg() -> clap::Arg {
        clap::Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    /// Get configuration file path from arguments or the default locations
    pub fn get_config_path(matches: &clap::ArgMatches) -> Option<PathBuf> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Some(PathBuf::from(config_path));
        }

        let default_paths = [
            PathBuf::from(".manifest-gen.yaml"),
            PathBuf::from(".manifest-gen.yml"),
            PathBuf::from("manifest-gen.yaml"),
            PathBuf::from("manifest-gen.yml"),
        ];

        if let Some(path) = default_paths.iter().find(|path| path.exists()) {
            return Some(path.clone());
        }

        crate::utils::get_config_dir()
            .ok()
            .map(|dir| dir.join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Load configuration from file, or the defaults when none is found
    pub fn load_config(matches: &clap::ArgMatches) -> Result<crate::Config> {
        match get_config_path(matches) {
            Some(config_path) => {
                debug!("Loading configuration from {:?}", config_path);
                crate::Config::from_file(&config_path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(crate::Config::default())
            }
        }
    }

    /// Create ManifestGen instance
    pub fn create_app(config: crate::Config) -> Result<crate::ManifestGen> {
        crate::ManifestGen::new(config)
    }

    /// `--data-source` argument naming a registered type name
    pub fn data_source_arg() -> clap::Arg {
        clap::Arg::new("data-source")
            .short('d')
            .long("data-source")
            .help("Data source type name (see `manifest-gen list`)")
            .value_name("TYPE")
            .required(true)
    }
}
