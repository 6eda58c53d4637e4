//! CRD source configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A local directory of CRD documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrdSource {
    /// Name of the source
    pub name: String,

    /// Directory to scan; `~` and environment variables are expanded
    pub path: PathBuf,

    /// Glob patterns matched against `group/version`
    #[serde(default)]
    pub filters: Vec<String>,
}

impl CrdSource {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(anyhow!("CRD source name cannot be empty"));
        }

        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("CRD source path cannot be empty: {}", self.name));
        }

        for filter in &self.filters {
            glob::Pattern::new(filter)
                .map_err(|e| anyhow!("Invalid CRD source filter '{}': {}", filter, e))?;
        }

        Ok(())
    }

    /// Path with `~` and environment variables expanded
    pub fn expanded_path(&self) -> Result<PathBuf> {
        let path = self.path.to_string_lossy();
        let expanded = shellexpand::full(&path)
            .map_err(|e| anyhow!("Failed to expand CRD source path {}: {}", path, e))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }
}
