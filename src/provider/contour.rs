//! Built-in data source for Contour's `ContourConfiguration` CRD

use anyhow::{anyhow, Context, Result};
use manifest_crd::{CrdParser, CrdSchema};
use std::path::Path;

use super::manifest::ManifestDataSource;

pub const API_VERSION: &str = "projectcontour.io/v1alpha1";
pub const KIND: &str = "ContourConfiguration";

const CRD_PATH: &str = "crds/projectcontour.io_contourconfigurations.yaml";
const CRD_DOCUMENT: &str = include_str!("../../crds/projectcontour.io_contourconfigurations.yaml");

/// The bundled `projectcontour.io/v1alpha1` ContourConfiguration schema
pub fn contour_configuration_crd() -> Result<CrdSchema> {
    CrdParser::new()
        .parse_str(CRD_DOCUMENT, Path::new(CRD_PATH))?
        .into_iter()
        .find(|schema| schema.api_version == API_VERSION && schema.kind == KIND)
        .ok_or_else(|| anyhow!("Bundled CRD does not serve {} {}", API_VERSION, KIND))
}

/// `k8s_projectcontour_io_contour_configuration_v1alpha1_manifest`
pub fn contour_configuration_data_source() -> Result<ManifestDataSource> {
    let crd = contour_configuration_crd()?;
    ManifestDataSource::from_crd(crd).context("Failed to build ContourConfiguration schema")
}
