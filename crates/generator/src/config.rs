//! Output configuration for generated schema documents

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("output base path cannot be empty")]
pub struct EmptyBasePath;

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base path for generated files
    pub base_path: PathBuf,

    /// Organization strategy for output files
    pub organization: OrganizationStrategy,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), EmptyBasePath> {
        if self.base_path.as_os_str().is_empty() {
            return Err(EmptyBasePath);
        }
        Ok(())
    }

    /// Directory that holds the documents of one API version
    pub fn version_dir(&self, api_version: &str) -> PathBuf {
        self.organization.version_dir(&self.base_path, api_version)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./generated"),
            organization: OrganizationStrategy::ApiVersion,
        }
    }
}

/// Organization strategy for output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationStrategy {
    /// Organize by API version (e.g., projectcontour.io_v1alpha1/)
    ApiVersion,

    /// Flat organization (all files in one directory)
    Flat,

    /// Hierarchical organization (projectcontour.io/v1alpha1/)
    Hierarchical,
}

impl OrganizationStrategy {
    pub fn version_dir(&self, base: &Path, api_version: &str) -> PathBuf {
        match self {
            OrganizationStrategy::ApiVersion => base.join(api_version.replace('/', "_")),
            OrganizationStrategy::Flat => base.to_path_buf(),
            OrganizationStrategy::Hierarchical => match api_version.split_once('/') {
                Some((group, version)) => base.join(group).join(version),
                None => base.join(api_version),
            },
        }
    }
}
