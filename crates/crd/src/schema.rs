//! CRD schema definition and implementation

use crate::types::ValidationRules;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One served version of a parsed CRD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrdSchema {
    /// CRD name (`<plural>.<group>`)
    pub name: String,

    /// API group
    pub group: String,

    /// API version
    pub version: String,

    /// Full API version (group/version)
    pub api_version: String,

    /// Resource kind (from spec.names.kind)
    pub kind: String,

    /// Plural resource name (from spec.names.plural)
    pub plural: String,

    /// `Namespaced` or `Cluster`
    pub scope: String,

    /// OpenAPI v3 schema
    pub schema: serde_yaml::Value,

    /// Source file path
    pub source_path: PathBuf,

    /// Validation rules of the root schema node
    pub validation_rules: ValidationRules,
}

impl CrdSchema {
    /// Get the kind name (from spec.names.kind)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope != "Cluster"
    }

    /// Get the root schema properties
    pub fn properties(&self) -> Option<&serde_yaml::Mapping> {
        self.schema.get("properties")?.as_mapping()
    }

    /// Get the schema description
    pub fn description(&self) -> Option<&str> {
        self.validation_rules.description.as_deref()
    }

    /// Check if a root property is required
    pub fn is_field_required(&self, field_name: &str) -> bool {
        self.validation_rules.is_required(field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_with(root: &str) -> CrdSchema {
        let schema: serde_yaml::Value = serde_yaml::from_str(root).unwrap();
        CrdSchema {
            name: "widgets.test.example.com".to_string(),
            group: "test.example.com".to_string(),
            version: "v1".to_string(),
            api_version: "test.example.com/v1".to_string(),
            kind: "Widget".to_string(),
            plural: "widgets".to_string(),
            scope: "Namespaced".to_string(),
            validation_rules: ValidationRules::from_schema(&schema),
            schema,
            source_path: PathBuf::from("test.yaml"),
        }
    }

    #[test]
    fn test_crd_schema_accessors() {
        let schema = schema_with(
            r#"
            description: Widget is a test resource.
            type: object
            required: [spec]
            properties:
              spec:
                type: object
                properties:
                  size:
                    type: integer
        "#,
        );

        assert_eq!(schema.kind(), "Widget");
        assert!(schema.is_namespaced());
        assert_eq!(schema.description(), Some("Widget is a test resource."));
        assert!(schema.is_field_required("spec"));
        assert_eq!(schema.properties().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_cluster_scope() {
        let mut schema = schema_with("type: object");
        schema.scope = "Cluster".to_string();
        assert!(!schema.is_namespaced());
        assert!(schema.properties().is_none());
    }
}
