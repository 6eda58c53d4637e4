//! Manifest Generator Library
//!
//! Schema-driven manifest data sources: each served version of a Kubernetes
//! CustomResourceDefinition becomes a data source whose attributes mirror the
//! CRD's OpenAPI schema and whose read renders the manifest as YAML.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod provider;
pub mod utils;

pub use config::{Config, CrdSource, OrganizationStrategy, OutputConfig};
pub use document::{GenerationIndex, IndexEntry, SchemaDocument};
pub use error::ManifestGenError;
pub use manifest_crd::{CrdParser, CrdSchema};
pub use manifest_generator::{Diagnostics, GenerationResult, SourceResult};
pub use provider::{DataSource, ManifestDataSource, Provider, ReadRequest, ReadResponse};

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Main application context that coordinates all components
pub struct ManifestGen {
    config: Config,
    provider: Provider,
}

impl ManifestGen {
    /// Create a new ManifestGen instance, registering the built-in data
    /// source and every CRD found in the configured sources
    pub fn new(config: Config) -> Result<Self> {
        let mut provider = if config.include_builtin {
            Provider::with_builtins(config.provider_prefix.clone())?
        } else {
            Provider::new(config.provider_prefix.clone())
        };

        let crd_parser = CrdParser::new();
        for source in &config.crd_sources {
            let path = source.expanded_path()?;
            let schemas = crd_parser
                .parse_from_directory(&path, &source.filters)
                .with_context(|| format!("Failed to load CRD source {}", source.name))?;
            let registered = provider.register_crds(schemas)?;
            info!(
                "Loaded {} data sources from CRD source {}",
                registered.len(),
                source.name
            );
        }

        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Read one data source with a caller configuration
    pub async fn read(&self, type_name: &str, config: serde_yaml::Value) -> Result<ReadResponse> {
        Ok(self.provider.read(type_name, config).await?)
    }

    /// Write one schema document per data source plus `index.yaml`
    pub async fn generate(&self) -> Result<GenerationResult> {
        info!("Starting schema document generation");

        let start_time = Instant::now();
        let base_path = &self.config.output.base_path;
        utils::ensure_directory(base_path)?;

        let mut result = GenerationResult::default();
        let mut entries = Vec::new();

        for type_name in self.provider.type_names() {
            let mut source_result = SourceResult::new(type_name);

            match self.write_schema_document(type_name, base_path).await {
                Ok(entry) => {
                    source_result.files_generated.push(base_path.join(&entry.path));
                    entries.push(entry);
                }
                Err(e) => {
                    warn!("Failed to generate schema document for {}: {:#}", type_name, e);
                    source_result.errors.push(format!("{e:#}"));
                }
            }

            result.results.push(source_result);
        }

        let index = GenerationIndex {
            generated_at: Utc::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            provider: self.provider.type_name().to_string(),
            data_sources: entries,
        };
        let index_path = base_path.join("index.yaml");
        tokio::fs::write(&index_path, serde_yaml::to_string(&index)?)
            .await
            .with_context(|| format!("Failed to write {:?}", index_path))?;
        result.index_path = Some(index_path);

        let generation_time = start_time.elapsed();
        result.processing_time_ms = generation_time.as_millis() as u64;
        info!("Generation completed in {:?}", generation_time);

        Ok(result)
    }

    async fn write_schema_document(&self, type_name: &str, base_path: &Path) -> Result<IndexEntry> {
        let data_source = self
            .provider
            .data_source(type_name)
            .ok_or_else(|| ManifestGenError::UnknownDataSource(type_name.to_string()))?;

        let document = SchemaDocument::new(type_name, data_source.as_ref());
        let content = serde_yaml::to_string(&document)?;

        let dir = self.config.output.version_dir(data_source.api_version());
        utils::ensure_directory(&dir)?;
        let file_path = dir.join(format!("{}.yaml", utils::sanitize_filename(type_name)));
        tokio::fs::write(&file_path, &content)
            .await
            .with_context(|| format!("Failed to write {:?}", file_path))?;

        Ok(IndexEntry {
            type_name: type_name.to_string(),
            api_version: data_source.api_version().to_string(),
            kind: data_source.kind().to_string(),
            path: utils::relative_to(&file_path, base_path),
            sha256: utils::calculate_string_hash(&content),
            attribute_count: data_source.schema().attribute_count(),
        })
    }
}
