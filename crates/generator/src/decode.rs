//! Decode caller configuration into typed values

use crate::attribute::{Attribute, AttributeType, DataSourceSchema, ElementType};
use crate::diagnostics::{AttributePath, Diagnostics};
use crate::validation::Validator;
use crate::value::ConfigValue;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Decodes a configuration document keyed by snake_case attribute names.
///
/// Every problem is collected as a diagnostic; decoding only succeeds when
/// no error was reported. Warnings are returned alongside the value.
pub struct Decoder;

impl Decoder {
    pub fn decode(
        schema: &DataSourceSchema,
        config: &Value,
    ) -> Result<(ConfigValue, Diagnostics), Diagnostics> {
        let mut diags = Diagnostics::new();
        let root = AttributePath::root();

        let value = match unwrap_tagged(config) {
            Value::Null => decode_object(&schema.attributes, &Mapping::new(), &root, &mut diags),
            Value::Mapping(mapping) => decode_object(&schema.attributes, mapping, &root, &mut diags),
            other => {
                diags.add_error(
                    "Invalid configuration",
                    format!(
                        "Expected a mapping of attribute names to values, got {}.",
                        kind_of(other)
                    ),
                );
                ConfigValue::Null
            }
        };

        if diags.has_errors() {
            Err(diags)
        } else {
            Ok((value, diags))
        }
    }
}

fn decode_object(
    attributes: &[Attribute],
    mapping: &Mapping,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> ConfigValue {
    for key in mapping.keys() {
        match key.as_str() {
            Some(name) if attributes.iter().any(|a| a.name == name) => {}
            Some(name) => {
                let mut detail = format!("An argument named {name:?} is not expected here.");
                if let Some(attribute) = attributes.iter().find(|a| a.wire_name == name) {
                    detail.push_str(&format!(" Did you mean {:?}?", attribute.name));
                }
                diags.add_attribute_error(&path.attribute(name), "Unsupported argument", detail);
            }
            None => diags.add_attribute_error(
                path,
                "Invalid attribute name",
                format!("Attribute names must be strings, got {}.", kind_of(key)),
            ),
        }
    }

    let mut fields = BTreeMap::new();

    for attribute in attributes {
        let child = path.attribute(&attribute.name);
        let raw = mapping
            .get(attribute.name.as_str())
            .map(unwrap_tagged)
            .filter(|v| !v.is_null());

        let value = match raw {
            None => {
                if attribute.required {
                    diags.add_attribute_error(
                        &child,
                        "Missing required argument",
                        format!(
                            "The argument {:?} is required, but no definition was found.",
                            attribute.name
                        ),
                    );
                }
                ConfigValue::Null
            }
            Some(_) if attribute.computed => {
                diags.add_attribute_error(
                    &child,
                    "Invalid configuration",
                    format!(
                        "{:?} is computed by the data source and cannot be set.",
                        attribute.name
                    ),
                );
                ConfigValue::Null
            }
            Some(raw) => {
                if attribute.is_deprecated() {
                    diags.add_attribute_warning(
                        &child,
                        "Deprecated attribute",
                        format!("{:?} will be removed in a future release.", attribute.name),
                    );
                }
                let value = decode_value(&attribute.attribute_type, raw, &child, diags);
                run_validators(&attribute.validators, &value, &child, diags);
                value
            }
        };

        fields.insert(attribute.name.clone(), value);
    }

    ConfigValue::Object(fields)
}

fn decode_value(
    attribute_type: &AttributeType,
    raw: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> ConfigValue {
    match attribute_type {
        AttributeType::String => decode_element(ElementType::String, raw, path, diags),
        AttributeType::Int64 => decode_element(ElementType::Int64, raw, path, diags),
        AttributeType::Float64 => decode_element(ElementType::Float64, raw, path, diags),
        AttributeType::Bool => decode_element(ElementType::Bool, raw, path, diags),
        AttributeType::Dynamic => ConfigValue::Dynamic(raw.clone()),
        AttributeType::List {
            element,
            element_validators,
        } => {
            let Value::Sequence(items) = raw else {
                return type_mismatch(attribute_type, raw, path, diags);
            };
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_path = path.index(index);
                let Some(item) = non_null_element(item, &item_path, diags) else {
                    continue;
                };
                let value = decode_element(*element, item, &item_path, diags);
                run_validators(element_validators, &value, &item_path, diags);
                values.push(value);
            }
            ConfigValue::List(values)
        }
        AttributeType::Map {
            element,
            element_validators,
        } => {
            let Value::Mapping(mapping) = raw else {
                return type_mismatch(attribute_type, raw, path, diags);
            };
            let mut entries = BTreeMap::new();
            for (key, item) in mapping {
                let Some(key) = scalar_key(key) else {
                    diags.add_attribute_error(
                        path,
                        "Invalid map key",
                        format!("Map keys must be strings, got {}.", kind_of(key)),
                    );
                    continue;
                };
                let item_path = path.key(&key);
                let Some(item) = non_null_element(item, &item_path, diags) else {
                    continue;
                };
                let value = decode_element(*element, item, &item_path, diags);
                run_validators(element_validators, &value, &item_path, diags);
                if entries.insert(key.clone(), value).is_some() {
                    diags.add_attribute_error(
                        &item_path,
                        "Invalid map key",
                        format!("Duplicate map key {key:?}: keys are compared as strings."),
                    );
                }
            }
            ConfigValue::Map(entries)
        }
        AttributeType::Object { attributes } => match raw {
            Value::Mapping(mapping) => decode_object(attributes, mapping, path, diags),
            _ => type_mismatch(attribute_type, raw, path, diags),
        },
        AttributeType::ListOfObjects { attributes } => {
            let Value::Sequence(items) = raw else {
                return type_mismatch(attribute_type, raw, path, diags);
            };
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_path = path.index(index);
                let Some(item) = non_null_element(item, &item_path, diags) else {
                    continue;
                };
                match item {
                    Value::Mapping(mapping) => {
                        values.push(decode_object(attributes, mapping, &item_path, diags))
                    }
                    other => {
                        diags.add_attribute_error(
                            &item_path,
                            "Incorrect attribute value type",
                            format!("An object is required, got {}.", kind_of(other)),
                        );
                    }
                }
            }
            ConfigValue::List(values)
        }
    }
}

fn decode_element(
    element: ElementType,
    raw: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> ConfigValue {
    let decoded = match (element, raw) {
        (ElementType::Dynamic, _) => Some(ConfigValue::Dynamic(raw.clone())),

        (ElementType::String, Value::String(s)) => Some(ConfigValue::String(s.clone())),
        // Scalars convert to strings the way HCL does
        (ElementType::String, Value::Number(n)) => Some(ConfigValue::String(n.to_string())),
        (ElementType::String, Value::Bool(b)) => Some(ConfigValue::String(b.to_string())),

        (ElementType::Int64, Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(ConfigValue::Int(i)),
            None => whole_number(n.as_f64()).map(ConfigValue::Int),
        },
        (ElementType::Int64, Value::String(s)) => s.trim().parse::<i64>().ok().map(ConfigValue::Int),

        (ElementType::Float64, Value::Number(n)) => n.as_f64().map(ConfigValue::Float),
        (ElementType::Float64, Value::String(s)) => {
            s.trim().parse::<f64>().ok().map(ConfigValue::Float)
        }

        (ElementType::Bool, Value::Bool(b)) => Some(ConfigValue::Bool(*b)),
        (ElementType::Bool, Value::String(s)) => match s.as_str() {
            "true" => Some(ConfigValue::Bool(true)),
            "false" => Some(ConfigValue::Bool(false)),
            _ => None,
        },

        _ => None,
    };

    match decoded {
        Some(value) => value,
        None => {
            diags.add_attribute_error(
                path,
                "Incorrect attribute value type",
                format!(
                    "Inappropriate value for attribute {path}: {} required, got {}.",
                    element_label(element),
                    describe(raw)
                ),
            );
            ConfigValue::Null
        }
    }
}

fn run_validators(
    validators: &[Validator],
    value: &ConfigValue,
    path: &AttributePath,
    diags: &mut Diagnostics,
) {
    if value.is_null() {
        return;
    }
    for validator in validators {
        if let Err(message) = validator.validate(value) {
            diags.add_attribute_error(
                path,
                "Invalid Attribute Value",
                format!("Attribute {path} {message}"),
            );
        }
    }
}

fn type_mismatch(
    attribute_type: &AttributeType,
    raw: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> ConfigValue {
    diags.add_attribute_error(
        path,
        "Incorrect attribute value type",
        format!(
            "Inappropriate value for attribute {path}: {} required, got {}.",
            attribute_type.type_label(),
            kind_of(raw)
        ),
    );
    ConfigValue::Null
}

fn non_null_element<'a>(
    item: &'a Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> Option<&'a Value> {
    let item = unwrap_tagged(item);
    if item.is_null() {
        diags.add_attribute_error(
            path,
            "Invalid collection element",
            "Collection elements must not be null.",
        );
        None
    } else {
        Some(item)
    }
}

fn whole_number(value: Option<f64>) -> Option<i64> {
    let value = value?;
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn scalar_key(key: &Value) -> Option<String> {
    match unwrap_tagged(key) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn unwrap_tagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => unwrap_tagged(&tagged.value),
        other => other,
    }
}

fn element_label(element: ElementType) -> &'static str {
    match element {
        ElementType::String => "string",
        ElementType::Int64 => "whole number",
        ElementType::Float64 => "number",
        ElementType::Bool => "bool",
        ElementType::Dynamic => "any value",
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Bool(b) => format!("bool {b}"),
        other => kind_of(other).to_string(),
    }
}
