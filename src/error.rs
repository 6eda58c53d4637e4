//! Typed errors of the provider host

use manifest_generator::SchemaBuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestGenError {
    #[error("unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("data source already registered: {0}")]
    DuplicateDataSource(String),

    #[error("failed to build schema for CRD {crd}")]
    Schema {
        crd: String,
        #[source]
        source: SchemaBuildError,
    },
}
