//! Data source contract between the provider host and its implementations

use async_trait::async_trait;
use manifest_generator::{DataSourceSchema, Diagnostics};
use serde_yaml::Value;

/// Request for the data source's type name
#[derive(Debug, Clone)]
pub struct MetadataRequest {
    /// Provider prefix, e.g. `k8s`
    pub provider_type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataResponse {
    pub type_name: String,
}

/// Caller configuration keyed by snake_case attribute names
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub config: Value,
}

impl ReadRequest {
    pub fn new(config: Value) -> Self {
        Self { config }
    }
}

/// Outcome of a read. `state` is `None` whenever `diagnostics` holds an error.
#[derive(Debug, Default)]
pub struct ReadResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    /// The computed `yaml` attribute of the new state
    pub fn yaml(&self) -> Option<&str> {
        self.state.as_ref()?.get("yaml")?.as_str()
    }
}

/// A read-only data source served by the provider.
///
/// Implementations hold no mutable state so reads can run concurrently.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn metadata(&self, request: &MetadataRequest) -> MetadataResponse;

    fn schema(&self) -> &DataSourceSchema;

    /// `apiVersion` stamped on every rendered manifest
    fn api_version(&self) -> &str;

    /// `kind` stamped on every rendered manifest
    fn kind(&self) -> &str;

    async fn read(&self, request: ReadRequest) -> ReadResponse;
}
