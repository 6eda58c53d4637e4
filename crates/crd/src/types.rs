//! CRD types and data structures

use serde::{Deserialize, Serialize};

/// Validation rules extracted from an OpenAPI schema node
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ValidationRules {
    /// Minimum length for strings
    pub min_length: Option<usize>,

    /// Maximum length for strings
    pub max_length: Option<usize>,

    /// Pattern for strings (regex)
    pub pattern: Option<String>,

    /// Minimum value for numbers
    pub minimum: Option<f64>,

    /// Maximum value for numbers
    pub maximum: Option<f64>,

    /// Exclusive minimum
    pub exclusive_minimum: Option<bool>,

    /// Exclusive maximum
    pub exclusive_maximum: Option<bool>,

    /// Minimum number of array items
    pub min_items: Option<usize>,

    /// Maximum number of array items
    pub max_items: Option<usize>,

    /// Enum values, scalars rendered as strings
    pub enum_values: Vec<String>,

    /// Description
    pub description: Option<String>,

    /// Required property names of an object node
    pub required: Vec<String>,

    /// `x-kubernetes-preserve-unknown-fields`
    pub preserve_unknown_fields: bool,

    /// `x-kubernetes-int-or-string`
    pub int_or_string: bool,
}

impl ValidationRules {
    /// Extract validation rules from an OpenAPI schema node
    pub fn from_schema(schema: &serde_yaml::Value) -> Self {
        let mut rules = ValidationRules::default();

        if let Some(min_length) = schema.get("minLength").and_then(|v| v.as_u64()) {
            rules.min_length = Some(min_length as usize);
        }

        if let Some(max_length) = schema.get("maxLength").and_then(|v| v.as_u64()) {
            rules.max_length = Some(max_length as usize);
        }

        if let Some(pattern) = schema.get("pattern").and_then(|v| v.as_str()) {
            rules.pattern = Some(pattern.to_string());
        }

        if let Some(minimum) = schema.get("minimum").and_then(|v| v.as_f64()) {
            rules.minimum = Some(minimum);
        }

        if let Some(maximum) = schema.get("maximum").and_then(|v| v.as_f64()) {
            rules.maximum = Some(maximum);
        }

        if let Some(exclusive_minimum) = schema.get("exclusiveMinimum").and_then(|v| v.as_bool()) {
            rules.exclusive_minimum = Some(exclusive_minimum);
        }

        if let Some(exclusive_maximum) = schema.get("exclusiveMaximum").and_then(|v| v.as_bool()) {
            rules.exclusive_maximum = Some(exclusive_maximum);
        }

        if let Some(min_items) = schema.get("minItems").and_then(|v| v.as_u64()) {
            rules.min_items = Some(min_items as usize);
        }

        if let Some(max_items) = schema.get("maxItems").and_then(|v| v.as_u64()) {
            rules.max_items = Some(max_items as usize);
        }

        if let Some(enum_values) = schema.get("enum").and_then(|v| v.as_sequence()) {
            rules.enum_values = enum_values.iter().filter_map(scalar_to_string).collect();
        }

        if let Some(description) = schema.get("description").and_then(|v| v.as_str()) {
            rules.description = Some(description.to_string());
        }

        if let Some(required) = schema.get("required").and_then(|v| v.as_sequence()) {
            rules.required = required
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect();
        }

        rules.preserve_unknown_fields = schema
            .get("x-kubernetes-preserve-unknown-fields")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        rules.int_or_string = schema
            .get("x-kubernetes-int-or-string")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        rules
    }

    /// Whether the named property is listed as required
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
