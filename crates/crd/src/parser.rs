//! CRD parser implementation

use crate::schema::CrdSchema;
use crate::types::ValidationRules;
use anyhow::{anyhow, Result};
use glob::Pattern;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct CrdParser;

impl Default for CrdParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CrdParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse CRDs from a directory, applying filters
    pub fn parse_from_directory(
        &self,
        dir_path: &Path,
        filters: &[String],
    ) -> Result<Vec<CrdSchema>> {
        info!("Parsing CRDs from directory: {:?}", dir_path);

        if !dir_path.is_dir() {
            return Err(anyhow!("CRD source is not a directory: {:?}", dir_path));
        }

        let mut schemas = Vec::new();

        for entry in WalkDir::new(dir_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();

            match path.extension() {
                Some(ext) if ext == "yaml" || ext == "yml" => {}
                _ => continue,
            }

            match self.parse_crd_file(path) {
                Ok(mut crd_schemas) => {
                    crd_schemas.retain(|schema| self.matches_filters(schema, filters));
                    schemas.extend(crd_schemas);
                }
                Err(e) => {
                    debug!("Failed to parse {} as CRD: {}", path.display(), e);
                }
            }
        }

        info!("Found {} CRD schemas after filtering", schemas.len());
        Ok(schemas)
    }

    /// Parse a single CRD file
    pub fn parse_crd_file(&self, path: &Path) -> Result<Vec<CrdSchema>> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content, path)
    }

    /// Parse every CRD document in a (possibly multi-document) YAML string
    pub fn parse_str(&self, content: &str, source_path: &Path) -> Result<Vec<CrdSchema>> {
        let mut schemas = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let doc = serde_yaml::Value::deserialize(document)?;
            if doc.is_null() {
                continue;
            }
            schemas.extend(self.extract_crd_from_document(&doc, source_path)?);
        }

        Ok(schemas)
    }

    /// Extract one schema per served version from a YAML document
    fn extract_crd_from_document(
        &self,
        doc: &serde_yaml::Value,
        source_path: &Path,
    ) -> Result<Vec<CrdSchema>> {
        match doc.get("kind").and_then(|k| k.as_str()) {
            Some("CustomResourceDefinition") => {}
            _ => return Ok(Vec::new()),
        }

        let metadata = doc
            .get("metadata")
            .ok_or_else(|| anyhow!("CRD missing metadata"))?;

        let name = metadata
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| anyhow!("CRD missing name"))?;

        let spec = doc.get("spec").ok_or_else(|| anyhow!("CRD missing spec"))?;

        let group = spec
            .get("group")
            .and_then(|g| g.as_str())
            .ok_or_else(|| anyhow!("CRD missing group"))?;

        let names = spec.get("names");

        let kind = names
            .and_then(|n| n.get("kind"))
            .and_then(|k| k.as_str())
            .ok_or_else(|| anyhow!("CRD {name} missing spec.names.kind"))?;

        // Fallback to the first segment of `<plural>.<group>`
        let plural = names
            .and_then(|n| n.get("plural"))
            .and_then(|p| p.as_str())
            .unwrap_or_else(|| name.split('.').next().unwrap_or(name));

        let scope = spec
            .get("scope")
            .and_then(|s| s.as_str())
            .unwrap_or("Namespaced");

        let versions = spec
            .get("versions")
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| anyhow!("CRD missing versions"))?;

        let mut crd_schemas = Vec::new();

        for version_doc in versions {
            let version_name = version_doc
                .get("name")
                .and_then(|n| n.as_str())
                .ok_or_else(|| anyhow!("CRD version missing name"))?;

            let served = version_doc
                .get("served")
                .and_then(|s| s.as_bool())
                .unwrap_or(true);
            if !served {
                debug!("Skipping unserved version {}/{}", group, version_name);
                continue;
            }

            let schema = version_doc
                .get("schema")
                .and_then(|s| s.get("openAPIV3Schema"))
                .ok_or_else(|| anyhow!("CRD version {version_name} missing openAPIV3Schema"))?;

            crd_schemas.push(CrdSchema {
                name: name.to_string(),
                group: group.to_string(),
                version: version_name.to_string(),
                api_version: format!("{group}/{version_name}"),
                kind: kind.to_string(),
                plural: plural.to_string(),
                scope: scope.to_string(),
                schema: schema.clone(),
                source_path: source_path.to_path_buf(),
                validation_rules: ValidationRules::from_schema(schema),
            });
        }

        Ok(crd_schemas)
    }

    /// Check if a CRD schema matches the given filters
    pub fn matches_filters(&self, schema: &CrdSchema, filters: &[String]) -> bool {
        if filters.is_empty() {
            return true;
        }

        filters.iter().any(|filter| self.matches_filter(schema, filter))
    }

    /// Check if a CRD schema matches a specific filter pattern
    fn matches_filter(&self, schema: &CrdSchema, filter: &str) -> bool {
        let pattern = match Pattern::new(filter) {
            Ok(p) => p,
            Err(_) => return false,
        };

        pattern.matches(&schema.api_version)
    }
}
