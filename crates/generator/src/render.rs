//! Render decoded configuration into a Kubernetes manifest

use crate::attribute::{Attribute, AttributeType, DataSourceSchema};
use crate::value::ConfigValue;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("value at {path} does not match its {expected} attribute")]
    ShapeMismatch { path: String, expected: String },

    #[error("failed to marshal manifest: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

/// Renders manifests for one CRD version. `apiVersion` and `kind` are
/// owned by the renderer and always override anything in the input.
#[derive(Debug, Clone)]
pub struct ManifestRenderer {
    api_version: String,
    kind: String,
}

impl ManifestRenderer {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Build the manifest document with camelCase keys and unset values omitted
    pub fn manifest(
        &self,
        schema: &DataSourceSchema,
        value: &ConfigValue,
    ) -> Result<Mapping, RenderError> {
        let mut manifest = Mapping::new();
        manifest.insert("apiVersion".into(), self.api_version.clone().into());
        manifest.insert("kind".into(), self.kind.clone().into());

        for attribute in &schema.attributes {
            if attribute.computed || matches!(attribute.wire_name.as_str(), "apiVersion" | "kind") {
                continue;
            }
            let field = value.get(&attribute.name).unwrap_or(&ConfigValue::Null);
            if let Some(rendered) = wire_value(&attribute.attribute_type, field, &attribute.name)? {
                manifest.insert(attribute.wire_name.clone().into(), rendered);
            }
        }

        Ok(manifest)
    }

    pub fn render(
        &self,
        schema: &DataSourceSchema,
        value: &ConfigValue,
    ) -> Result<String, RenderError> {
        let manifest = self.manifest(schema, value)?;
        Ok(serde_yaml::to_string(&manifest)?)
    }
}

/// `None` means the field is omitted from the manifest: the value is unset,
/// or it is an object whose fields are all unset
fn wire_value(
    attribute_type: &AttributeType,
    value: &ConfigValue,
    path: &str,
) -> Result<Option<Value>, RenderError> {
    let rendered = match (attribute_type, value) {
        (_, ConfigValue::Null) => None,
        (_, ConfigValue::Dynamic(v)) => (!v.is_null()).then(|| v.clone()),
        (AttributeType::Object { attributes }, ConfigValue::Object(_)) => {
            let mapping = object_fields(attributes, value, path)?;
            (!mapping.is_empty()).then_some(Value::Mapping(mapping))
        }
        (AttributeType::ListOfObjects { attributes }, ConfigValue::List(items)) => {
            let mut sequence = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{index}]");
                if !matches!(item, ConfigValue::Object(_)) {
                    return Err(shape_mismatch(&item_path, attribute_type));
                }
                // Elements keep their position, even when every field is unset
                sequence.push(Value::Mapping(object_fields(attributes, item, &item_path)?));
            }
            Some(Value::Sequence(sequence))
        }
        // A list or map the caller set is rendered even when it is empty
        (AttributeType::List { .. }, ConfigValue::List(items)) => {
            Some(Value::Sequence(items.iter().filter_map(scalar_value).collect()))
        }
        (AttributeType::Map { .. }, ConfigValue::Map(entries)) => {
            let mut mapping = Mapping::new();
            for (key, entry) in entries {
                if let Some(rendered) = scalar_value(entry) {
                    mapping.insert(key.clone().into(), rendered);
                }
            }
            Some(Value::Mapping(mapping))
        }
        (AttributeType::String, ConfigValue::String(_))
        | (AttributeType::Int64, ConfigValue::Int(_))
        | (AttributeType::Float64, ConfigValue::Float(_))
        | (AttributeType::Float64, ConfigValue::Int(_))
        | (AttributeType::Bool, ConfigValue::Bool(_)) => scalar_value(value),
        _ => return Err(shape_mismatch(path, attribute_type)),
    };

    Ok(rendered)
}

fn object_fields(
    attributes: &[Attribute],
    value: &ConfigValue,
    path: &str,
) -> Result<Mapping, RenderError> {
    let mut mapping = Mapping::new();
    for attribute in attributes {
        let field = value.get(&attribute.name).unwrap_or(&ConfigValue::Null);
        let field_path = format!("{path}.{}", attribute.name);
        if let Some(rendered) = wire_value(&attribute.attribute_type, field, &field_path)? {
            mapping.insert(attribute.wire_name.clone().into(), rendered);
        }
    }
    Ok(mapping)
}

fn scalar_value(value: &ConfigValue) -> Option<Value> {
    match value {
        ConfigValue::String(s) => Some(Value::String(s.clone())),
        ConfigValue::Int(i) => Some(Value::from(*i)),
        ConfigValue::Float(f) => Some(Value::from(*f)),
        ConfigValue::Bool(b) => Some(Value::Bool(*b)),
        ConfigValue::Dynamic(v) if !v.is_null() => Some(v.clone()),
        _ => None,
    }
}

fn shape_mismatch(path: &str, attribute_type: &AttributeType) -> RenderError {
    RenderError::ShapeMismatch {
        path: path.to_string(),
        expected: attribute_type.type_label(),
    }
}
