//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{CrdSource, OutputConfig};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Prefix of every data source type name (`k8s` gives `k8s_..._manifest`)
    #[serde(default = "default_provider_prefix")]
    pub provider_prefix: String,

    /// Directories of CRD documents to turn into data sources
    #[serde(default)]
    pub crd_sources: Vec<CrdSource>,

    /// Output configuration for `generate`
    #[serde(default)]
    pub output: OutputConfig,

    /// Register the bundled ContourConfiguration data source
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
}

fn default_provider_prefix() -> String {
    "k8s".to_string()
}

fn default_include_builtin() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        if !is_valid_prefix(&self.provider_prefix) {
            return Err(anyhow!(
                "Invalid provider prefix '{}': use lowercase letters, digits and underscores, starting with a letter",
                self.provider_prefix
            ));
        }

        if self.crd_sources.is_empty() && !self.include_builtin {
            return Err(anyhow!(
                "At least one CRD source must be configured when include_builtin is disabled"
            ));
        }

        for source in &self.crd_sources {
            source.validate()?;
        }

        let mut names: Vec<&str> = self.crd_sources.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(anyhow!("Duplicate CRD source name: {}", pair[0]));
        }

        self.output.validate()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            provider_prefix: default_provider_prefix(),
            crd_sources: Vec::new(),
            output: OutputConfig::default(),
            include_builtin: default_include_builtin(),
        }
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
