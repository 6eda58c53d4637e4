//! Provider host: a registry of manifest data sources keyed by type name

pub mod contour;
pub mod data_source;
pub mod manifest;

pub use data_source::{DataSource, MetadataRequest, MetadataResponse, ReadRequest, ReadResponse};
pub use manifest::ManifestDataSource;

use crate::ManifestGenError;
use manifest_crd::CrdSchema;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registered data sources of one provider.
///
/// Data sources are shared behind `Arc`, so a `Provider` can serve any
/// number of concurrent reads.
pub struct Provider {
    type_name: String,
    data_sources: BTreeMap<String, Arc<dyn DataSource>>,
}

impl Provider {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            data_sources: BTreeMap::new(),
        }
    }

    /// Provider with the bundled ContourConfiguration data source registered
    pub fn with_builtins(type_name: impl Into<String>) -> anyhow::Result<Self> {
        let mut provider = Self::new(type_name);
        provider.register(Arc::new(contour::contour_configuration_data_source()?))?;
        Ok(provider)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Register a data source under the type name it reports
    pub fn register(&mut self, data_source: Arc<dyn DataSource>) -> Result<String, ManifestGenError> {
        let type_name = data_source
            .metadata(&MetadataRequest {
                provider_type_name: self.type_name.clone(),
            })
            .type_name;

        if self.data_sources.contains_key(&type_name) {
            return Err(ManifestGenError::DuplicateDataSource(type_name));
        }

        debug!("Registered data source {}", type_name);
        self.data_sources.insert(type_name.clone(), data_source);
        Ok(type_name)
    }

    /// Build and register one data source per CRD schema.
    /// Schemas whose type name is already registered are skipped.
    pub fn register_crds(&mut self, schemas: Vec<CrdSchema>) -> Result<Vec<String>, ManifestGenError> {
        let mut registered = Vec::new();

        for crd in schemas {
            let crd_name = crd.name.clone();
            let data_source = ManifestDataSource::from_crd(crd).map_err(|source| {
                ManifestGenError::Schema {
                    crd: crd_name.clone(),
                    source,
                }
            })?;

            match self.register(Arc::new(data_source)) {
                Ok(type_name) => registered.push(type_name),
                Err(ManifestGenError::DuplicateDataSource(type_name)) => {
                    info!("Skipping {} from {}: already registered", type_name, crd_name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(registered)
    }

    pub fn data_source(&self, type_name: &str) -> Option<Arc<dyn DataSource>> {
        self.data_sources.get(type_name).cloned()
    }

    /// Registered type names in sorted order
    pub fn type_names(&self) -> Vec<&str> {
        self.data_sources.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.data_sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_sources.is_empty()
    }

    /// Read a data source by type name
    pub async fn read(&self, type_name: &str, config: Value) -> Result<ReadResponse, ManifestGenError> {
        let data_source = self
            .data_source(type_name)
            .ok_or_else(|| ManifestGenError::UnknownDataSource(type_name.to_string()))?;

        debug!("Reading data source {}", type_name);
        Ok(data_source.read(ReadRequest::new(config)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTOUR: &str = "k8s_projectcontour_io_contour_configuration_v1alpha1_manifest";

    #[test]
    fn test_builtins_are_registered() {
        let provider = Provider::with_builtins("k8s").unwrap();
        assert_eq!(provider.type_names(), vec![CONTOUR]);
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut provider = Provider::with_builtins("k8s").unwrap();
        let again = contour::contour_configuration_data_source().unwrap();
        let err = provider.register(Arc::new(again)).unwrap_err();
        assert!(matches!(err, ManifestGenError::DuplicateDataSource(name) if name == CONTOUR));
    }

    #[test]
    fn test_register_crds_skips_duplicates() {
        let mut provider = Provider::with_builtins("k8s").unwrap();
        let crd = contour::contour_configuration_crd().unwrap();
        let registered = provider.register_crds(vec![crd]).unwrap();
        assert!(registered.is_empty());
        assert_eq!(provider.len(), 1);
    }

    #[tokio::test]
    async fn test_read_unknown_data_source() {
        let provider = Provider::new("k8s");
        let err = provider.read("k8s_missing_manifest", Value::Null).await.unwrap_err();
        assert!(matches!(err, ManifestGenError::UnknownDataSource(_)));
    }
}
