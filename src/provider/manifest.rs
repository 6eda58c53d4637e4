//! Manifest data source derived from a CRD schema

use async_trait::async_trait;
use manifest_crd::CrdSchema;
use manifest_generator::naming::data_source_type_name;
use manifest_generator::{DataSourceSchema, Decoder, ManifestRenderer, SchemaBuildError, SchemaBuilder};
use serde_yaml::Value;
use tracing::{debug, warn};

use super::data_source::{DataSource, MetadataRequest, MetadataResponse, ReadRequest, ReadResponse};

/// Renders a manifest of one CRD version into the computed `yaml` attribute
#[derive(Debug, Clone)]
pub struct ManifestDataSource {
    crd: CrdSchema,
    schema: DataSourceSchema,
    renderer: ManifestRenderer,
}

impl ManifestDataSource {
    pub fn from_crd(crd: CrdSchema) -> Result<Self, SchemaBuildError> {
        let schema = SchemaBuilder::new().build(&crd)?;
        let renderer = ManifestRenderer::new(crd.api_version.clone(), crd.kind.clone());

        debug!(
            "Built schema for {} with {} attributes",
            crd.api_version,
            schema.attribute_count()
        );

        Ok(Self {
            crd,
            schema,
            renderer,
        })
    }

    pub fn crd(&self) -> &CrdSchema {
        &self.crd
    }
}

#[async_trait]
impl DataSource for ManifestDataSource {
    fn metadata(&self, request: &MetadataRequest) -> MetadataResponse {
        MetadataResponse {
            type_name: data_source_type_name(
                &request.provider_type_name,
                &self.crd.group,
                &self.crd.kind,
                &self.crd.version,
            ),
        }
    }

    fn schema(&self) -> &DataSourceSchema {
        &self.schema
    }

    fn api_version(&self) -> &str {
        self.renderer.api_version()
    }

    fn kind(&self) -> &str {
        self.renderer.kind()
    }

    async fn read(&self, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();

        let config = match Decoder::decode(&self.schema, &request.config) {
            Ok((config, warnings)) => {
                response.diagnostics = warnings;
                config
            }
            Err(diagnostics) => {
                debug!(
                    "Rejected {} configuration with {} diagnostics",
                    self.crd.kind,
                    diagnostics.len()
                );
                response.diagnostics = diagnostics;
                return response;
            }
        };

        let yaml = match self.renderer.render(&self.schema, &config) {
            Ok(yaml) => yaml,
            Err(e) => {
                warn!("Failed to render {} manifest: {}", self.crd.kind, e);
                response
                    .diagnostics
                    .add_error("Failed to marshal manifest", e.to_string());
                return response;
            }
        };

        let mut state = config.to_yaml();
        if let Value::Mapping(fields) = &mut state {
            fields.insert(Value::String("yaml".to_string()), Value::String(yaml));
        }
        response.state = Some(state);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifest_crd::CrdParser;
    use std::path::Path;

    const GADGET_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: gadgets.example.com
spec:
  group: example.com
  names:
    kind: Gadget
    plural: gadgets
  scope: Cluster
  versions:
  - name: v1beta1
    served: true
    schema:
      openAPIV3Schema:
        type: object
        properties:
          spec:
            type: object
            properties:
              maxRetries:
                type: integer
                minimum: 1
"#;

    fn gadget() -> ManifestDataSource {
        let mut schemas = CrdParser::new()
            .parse_str(GADGET_CRD, Path::new("gadget.yaml"))
            .unwrap();
        ManifestDataSource::from_crd(schemas.remove(0)).unwrap()
    }

    #[test]
    fn test_metadata_type_name() {
        let response = gadget().metadata(&MetadataRequest {
            provider_type_name: "k8s".to_string(),
        });
        assert_eq!(response.type_name, "k8s_example_com_gadget_v1beta1_manifest");
    }

    #[tokio::test]
    async fn test_read_sets_yaml_state() {
        let config = serde_yaml::from_str("metadata:\n  name: one\nspec:\n  max_retries: 3\n").unwrap();
        let response = gadget().read(ReadRequest::new(config)).await;

        assert!(!response.diagnostics.has_errors());
        assert_eq!(
            response.yaml().unwrap(),
            "apiVersion: example.com/v1beta1\nkind: Gadget\nmetadata:\n  name: one\nspec:\n  maxRetries: 3\n"
        );
        let state = response.state.unwrap();
        assert_eq!(state["spec"]["max_retries"], Value::from(3));
    }

    #[tokio::test]
    async fn test_read_failure_has_no_state() {
        let config = serde_yaml::from_str("metadata:\n  name: one\nspec:\n  max_retries: 0\n").unwrap();
        let response = gadget().read(ReadRequest::new(config)).await;

        assert!(response.state.is_none());
        assert!(response.yaml().is_none());
        assert!(response.diagnostics.has_error_at("spec.max_retries"));
    }
}
