//! Derive a data source attribute schema from a CRD's OpenAPI schema

use crate::attribute::{Attribute, AttributeType, DataSourceSchema, ElementType};
use crate::naming::to_snake_case;
use crate::validation::Validator;
use manifest_crd::{CrdSchema, ValidationRules};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Root properties owned by the renderer or by the API server
const RESERVED_ROOT_PROPERTIES: &[&str] = &["apiVersion", "kind", "metadata", "status"];

#[derive(Debug, Error)]
pub enum SchemaBuildError {
    #[error("CRD {crd} has no openAPIV3Schema properties")]
    MissingProperties { crd: String },

    #[error("invalid pattern for {path}: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: regex::Error,
    },

    #[error("attribute name {name} at {path} is produced by both {first} and {second}")]
    NameCollision {
        path: String,
        name: String,
        first: String,
        second: String,
    },
}

pub struct SchemaBuilder;

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the attribute schema for one CRD version
    pub fn build(&self, crd: &CrdSchema) -> Result<DataSourceSchema, SchemaBuildError> {
        let properties = crd
            .properties()
            .ok_or_else(|| SchemaBuildError::MissingProperties {
                crd: crd.name.clone(),
            })?;

        let mut attributes = vec![Self::yaml_attribute(), Self::metadata_attribute(crd)];
        attributes.extend(self.build_attributes(
            properties,
            &crd.validation_rules,
            "",
            RESERVED_ROOT_PROPERTIES,
        )?);
        check_collisions(&attributes, "")?;

        let description = crd
            .description()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} manifest", crd.kind()));

        let schema = DataSourceSchema {
            description,
            attributes,
        };

        debug!(
            "Built schema for {} ({}) with {} attributes",
            crd.kind(),
            crd.api_version,
            schema.attribute_count()
        );

        Ok(schema)
    }

    fn yaml_attribute() -> Attribute {
        Attribute::new("yaml", "yaml", AttributeType::String)
            .computed()
            .with_description("The generated manifest in YAML format.")
    }

    fn metadata_attribute(crd: &CrdSchema) -> Attribute {
        let mut attributes = vec![Attribute::new("name", "name", AttributeType::String)
            .required()
            .with_description("Unique identifier for this object.")
            .with_validators(vec![Validator::DnsSubdomain])];

        if crd.is_namespaced() {
            attributes.push(
                Attribute::new("namespace", "namespace", AttributeType::String)
                    .required()
                    .with_description("Namespace that contains this object.")
                    .with_validators(vec![Validator::DnsLabel]),
            );
        }

        attributes.push(
            Attribute::new(
                "labels",
                "labels",
                AttributeType::Map {
                    element: ElementType::String,
                    element_validators: Vec::new(),
                },
            )
            .with_description("Key-value pairs used to organize and categorize objects.")
            .with_validators(vec![Validator::LabelKeys, Validator::LabelValues]),
        );

        attributes.push(
            Attribute::new(
                "annotations",
                "annotations",
                AttributeType::Map {
                    element: ElementType::String,
                    element_validators: Vec::new(),
                },
            )
            .with_description("Unstructured key-value data attached to this object.")
            .with_validators(vec![Validator::AnnotationKeys]),
        );

        Attribute::new("metadata", "metadata", AttributeType::Object { attributes })
            .required()
            .with_description("Data that helps uniquely identify this object.")
    }

    fn build_attributes(
        &self,
        properties: &serde_yaml::Mapping,
        parent_rules: &ValidationRules,
        path: &str,
        skip: &[&str],
    ) -> Result<Vec<Attribute>, SchemaBuildError> {
        let mut attributes = Vec::with_capacity(properties.len());

        for (key, node) in properties {
            let Some(wire_name) = key.as_str() else {
                continue;
            };
            if skip.contains(&wire_name) {
                continue;
            }

            let name = to_snake_case(wire_name);
            let child_path = join_path(path, &name);
            let required = parent_rules.is_required(wire_name);
            attributes.push(self.build_attribute(wire_name, name, node, required, &child_path)?);
        }

        check_collisions(&attributes, path)?;
        Ok(attributes)
    }

    fn build_attribute(
        &self,
        wire_name: &str,
        name: String,
        node: &serde_yaml::Value,
        required: bool,
        path: &str,
    ) -> Result<Attribute, SchemaBuildError> {
        let rules = ValidationRules::from_schema(node);
        let attribute_type = self.attribute_type(node, &rules, path)?;
        let validators = self.validators(&attribute_type, &rules, path)?;

        let mut attribute =
            Attribute::new(name, wire_name, attribute_type).with_validators(validators);
        if required {
            attribute = attribute.required();
        }
        if let Some(description) = rules.description {
            attribute = attribute.with_description(description);
        }
        Ok(attribute)
    }

    fn attribute_type(
        &self,
        node: &serde_yaml::Value,
        rules: &ValidationRules,
        path: &str,
    ) -> Result<AttributeType, SchemaBuildError> {
        if rules.int_or_string || rules.preserve_unknown_fields {
            return Ok(AttributeType::Dynamic);
        }

        let attribute_type = match node.get("type").and_then(|t| t.as_str()) {
            Some("string") => AttributeType::String,
            Some("integer") => AttributeType::Int64,
            Some("number") => AttributeType::Float64,
            Some("boolean") => AttributeType::Bool,
            Some("array") => self.array_type(node, path)?,
            Some("object") | None => self.object_type(node, rules, path)?,
            Some(_) => AttributeType::Dynamic,
        };

        Ok(attribute_type)
    }

    fn array_type(
        &self,
        node: &serde_yaml::Value,
        path: &str,
    ) -> Result<AttributeType, SchemaBuildError> {
        let Some(items) = node.get("items") else {
            return Ok(AttributeType::List {
                element: ElementType::Dynamic,
                element_validators: Vec::new(),
            });
        };

        let item_rules = ValidationRules::from_schema(items);
        match self.attribute_type(items, &item_rules, path)? {
            AttributeType::Object { attributes } => Ok(AttributeType::ListOfObjects { attributes }),
            item_type => {
                let element = element_type(&item_type);
                let element_validators = if element == ElementType::Dynamic {
                    Vec::new()
                } else {
                    self.validators(&item_type, &item_rules, path)?
                };
                Ok(AttributeType::List {
                    element,
                    element_validators,
                })
            }
        }
    }

    fn object_type(
        &self,
        node: &serde_yaml::Value,
        rules: &ValidationRules,
        path: &str,
    ) -> Result<AttributeType, SchemaBuildError> {
        if let Some(properties) = node.get("properties").and_then(|p| p.as_mapping()) {
            if !properties.is_empty() {
                let attributes = self.build_attributes(properties, rules, path, &[])?;
                return Ok(AttributeType::Object { attributes });
            }
        }

        if let Some(additional) = node.get("additionalProperties") {
            if additional.is_mapping() {
                let value_rules = ValidationRules::from_schema(additional);
                let value_type = self.attribute_type(additional, &value_rules, path)?;
                let element = element_type(&value_type);
                let element_validators = if element == ElementType::Dynamic {
                    Vec::new()
                } else {
                    self.validators(&value_type, &value_rules, path)?
                };
                return Ok(AttributeType::Map {
                    element,
                    element_validators,
                });
            }
        }

        Ok(AttributeType::Dynamic)
    }

    fn validators(
        &self,
        attribute_type: &AttributeType,
        rules: &ValidationRules,
        path: &str,
    ) -> Result<Vec<Validator>, SchemaBuildError> {
        let mut validators = Vec::new();

        match attribute_type {
            AttributeType::String => {
                validators.extend(Validator::string_length(rules.min_length, rules.max_length));
                if let Some(pattern) = &rules.pattern {
                    let validator = Validator::regex(pattern).map_err(|source| {
                        SchemaBuildError::InvalidPattern {
                            path: path.to_string(),
                            source,
                        }
                    })?;
                    validators.push(validator);
                }
                validators.extend(Validator::one_of(&rules.enum_values));
            }
            AttributeType::Int64 => {
                let min = rules
                    .minimum
                    .map(|m| int_lower_bound(m, rules.exclusive_minimum.unwrap_or(false)));
                let max = rules
                    .maximum
                    .map(|m| int_upper_bound(m, rules.exclusive_maximum.unwrap_or(false)));
                validators.extend(Validator::int_range(min, max));
            }
            AttributeType::Float64 => {
                validators.extend(Validator::float_range(rules.minimum, rules.maximum));
            }
            AttributeType::List { .. } | AttributeType::ListOfObjects { .. } => {
                validators.extend(Validator::list_size(rules.min_items, rules.max_items));
            }
            _ => {}
        }

        Ok(validators)
    }
}

fn element_type(attribute_type: &AttributeType) -> ElementType {
    match attribute_type {
        AttributeType::String => ElementType::String,
        AttributeType::Int64 => ElementType::Int64,
        AttributeType::Float64 => ElementType::Float64,
        AttributeType::Bool => ElementType::Bool,
        _ => ElementType::Dynamic,
    }
}

fn int_lower_bound(minimum: f64, exclusive: bool) -> i64 {
    let bound = minimum.ceil() as i64;
    if exclusive && minimum.fract() == 0.0 {
        bound + 1
    } else {
        bound
    }
}

fn int_upper_bound(maximum: f64, exclusive: bool) -> i64 {
    let bound = maximum.floor() as i64;
    if exclusive && maximum.fract() == 0.0 {
        bound - 1
    } else {
        bound
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn check_collisions(attributes: &[Attribute], path: &str) -> Result<(), SchemaBuildError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for attribute in attributes {
        if let Some(first) = seen.insert(&attribute.name, &attribute.wire_name) {
            return Err(SchemaBuildError::NameCollision {
                path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
                name: attribute.name.clone(),
                first: first.to_string(),
                second: attribute.wire_name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn crd(root: &str, scope: &str) -> CrdSchema {
        let schema: serde_yaml::Value = serde_yaml::from_str(root).unwrap();
        CrdSchema {
            name: "widgets.test.example.com".to_string(),
            group: "test.example.com".to_string(),
            version: "v1".to_string(),
            api_version: "test.example.com/v1".to_string(),
            kind: "Widget".to_string(),
            plural: "widgets".to_string(),
            scope: scope.to_string(),
            validation_rules: ValidationRules::from_schema(&schema),
            schema,
            source_path: PathBuf::from("widgets.yaml"),
        }
    }

    const WIDGET_SCHEMA: &str = r#"
type: object
required: [spec]
properties:
  apiVersion:
    type: string
  kind:
    type: string
  metadata:
    type: object
  spec:
    type: object
    required: [size]
    properties:
      size:
        type: integer
        minimum: 0
        maximum: 10
        exclusiveMaximum: true
      ratio:
        type: number
        minimum: 0.5
      colorMode:
        type: string
        enum: [rgb, cmyk]
      timeout:
        type: string
        pattern: ^\d+s$
      httpVersions:
        type: array
        minItems: 1
        items:
          type: string
          enum: [HTTP/1.1, HTTP/2]
      labelsSet:
        type: object
        additionalProperties:
          type: string
          maxLength: 63
      parts:
        type: array
        items:
          type: object
          required: [name]
          properties:
            name:
              type: string
      extra:
        type: object
        x-kubernetes-preserve-unknown-fields: true
      marker:
        type: object
      port:
        x-kubernetes-int-or-string: true
  status:
    type: object
    properties:
      ready:
        type: boolean
"#;

    #[test]
    fn test_root_attributes() {
        let schema = SchemaBuilder::new().build(&crd(WIDGET_SCHEMA, "Namespaced")).unwrap();
        let names: Vec<&str> = schema.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["yaml", "metadata", "spec"]);

        assert!(schema.attribute("yaml").unwrap().computed);
        assert!(schema.attribute("spec").unwrap().required);
        assert!(schema.find("metadata.name").unwrap().required);
        assert!(schema.find("metadata.namespace").unwrap().required);
        assert!(schema.find("metadata.labels").unwrap().is_optional());
    }

    #[test]
    fn test_cluster_scoped_metadata_has_no_namespace() {
        let schema = SchemaBuilder::new().build(&crd(WIDGET_SCHEMA, "Cluster")).unwrap();
        assert!(schema.find("metadata.namespace").is_none());
    }

    #[test]
    fn test_types_and_names() {
        let schema = SchemaBuilder::new().build(&crd(WIDGET_SCHEMA, "Namespaced")).unwrap();

        let color = schema.find("spec.color_mode").unwrap();
        assert_eq!(color.wire_name, "colorMode");
        assert!(matches!(color.attribute_type, AttributeType::String));

        assert!(matches!(
            schema.find("spec.http_versions").unwrap().attribute_type,
            AttributeType::List {
                element: ElementType::String,
                ..
            }
        ));
        assert!(matches!(
            schema.find("spec.labels_set").unwrap().attribute_type,
            AttributeType::Map {
                element: ElementType::String,
                ..
            }
        ));
        assert!(matches!(
            schema.find("spec.parts").unwrap().attribute_type,
            AttributeType::ListOfObjects { .. }
        ));
        assert!(schema.find("spec.parts.name").unwrap().required);
        assert!(matches!(
            schema.find("spec.extra").unwrap().attribute_type,
            AttributeType::Dynamic
        ));
        assert!(matches!(
            schema.find("spec.marker").unwrap().attribute_type,
            AttributeType::Dynamic
        ));
        assert!(matches!(
            schema.find("spec.port").unwrap().attribute_type,
            AttributeType::Dynamic
        ));
        assert!(schema.find("status").is_none());
    }

    #[test]
    fn test_validators_follow_rules() {
        let schema = SchemaBuilder::new().build(&crd(WIDGET_SCHEMA, "Namespaced")).unwrap();

        let size = schema.find("spec.size").unwrap();
        assert!(matches!(
            size.validators.as_slice(),
            [Validator::IntBetween { min: 0, max: 9 }]
        ));

        let ratio = schema.find("spec.ratio").unwrap();
        assert!(matches!(ratio.validators.as_slice(), [Validator::FloatAtLeast { .. }]));

        let timeout = schema.find("spec.timeout").unwrap();
        assert!(matches!(timeout.validators.as_slice(), [Validator::RegexMatches { .. }]));

        let versions = schema.find("spec.http_versions").unwrap();
        assert!(matches!(
            versions.validators.as_slice(),
            [Validator::ListSizeAtLeast { min: 1 }]
        ));
        match &versions.attribute_type {
            AttributeType::List {
                element_validators, ..
            } => assert!(matches!(element_validators.as_slice(), [Validator::OneOf { .. }])),
            other => panic!("unexpected type {other:?}"),
        }
    }

    #[test]
    fn test_map_values_carry_validators() {
        let schema = SchemaBuilder::new().build(&crd(WIDGET_SCHEMA, "Namespaced")).unwrap();
        match &schema.find("spec.labels_set").unwrap().attribute_type {
            AttributeType::Map {
                element_validators, ..
            } => assert!(element_validators
                .iter()
                .any(|v| matches!(v, Validator::LengthAtMost { max: 63 }))),
            other => panic!("unexpected type {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let root = r#"
type: object
properties:
  spec:
    type: object
    properties:
      broken:
        type: string
        pattern: "(unclosed"
"#;
        let err = SchemaBuilder::new()
            .build(&crd(root, "Namespaced"))
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::InvalidPattern { ref path, .. } if path == "spec.broken"));
    }

    #[test]
    fn test_name_collision_is_reported() {
        let root = r#"
type: object
properties:
  spec:
    type: object
    properties:
      tlsMode:
        type: string
      tls_mode:
        type: string
"#;
        let err = SchemaBuilder::new()
            .build(&crd(root, "Namespaced"))
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::NameCollision { ref name, .. } if name == "tls_mode"));
    }

    #[test]
    fn test_missing_properties() {
        let err = SchemaBuilder::new()
            .build(&crd("type: object", "Namespaced"))
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::MissingProperties { .. }));
    }

    #[test]
    fn test_exclusive_integer_bounds() {
        assert_eq!(int_lower_bound(0.0, true), 1);
        assert_eq!(int_lower_bound(0.5, true), 1);
        assert_eq!(int_upper_bound(255.0, false), 255);
        assert_eq!(int_upper_bound(255.0, true), 254);
    }
}
