//! Documents written by `generate`

use chrono::{DateTime, Utc};
use manifest_generator::DataSourceSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::provider::DataSource;

/// Attribute schema of one data source, as written to disk and printed by `schema`
#[derive(Debug, Serialize)]
pub struct SchemaDocument<'a> {
    pub type_name: &'a str,
    pub api_version: &'a str,
    pub kind: &'a str,
    #[serde(flatten)]
    pub schema: &'a DataSourceSchema,
}

impl<'a> SchemaDocument<'a> {
    pub fn new(type_name: &'a str, data_source: &'a dyn DataSource) -> Self {
        Self {
            type_name,
            api_version: data_source.api_version(),
            kind: data_source.kind(),
            schema: data_source.schema(),
        }
    }
}

/// `index.yaml` at the output base path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIndex {
    pub generated_at: DateTime<Utc>,
    pub generator_version: String,
    pub provider: String,
    pub data_sources: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub type_name: String,
    pub api_version: String,
    pub kind: String,
    /// Relative to the output base path
    pub path: PathBuf,
    /// SHA256 of the document content
    pub sha256: String,
    pub attribute_count: usize,
}
