//! Typed configuration values produced by the decoder

use std::collections::BTreeMap;

/// A configuration value decoded against the attribute schema.
///
/// `Object` is keyed by attribute (snake_case) name and holds an entry for
/// every attribute of the schema, `Null` when the caller left it unset.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
    Object(BTreeMap<String, ConfigValue>),
    Dynamic(serde_yaml::Value),
}

impl ConfigValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Look up an attribute of an object value
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Follow a dotted attribute path such as `spec.envoy.listener`
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        path.split('.')
            .try_fold(self, |value, segment| value.get(segment))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert back to a plain YAML value keyed by attribute name.
    /// Unset attributes are kept as explicit nulls.
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            ConfigValue::Null => serde_yaml::Value::Null,
            ConfigValue::String(s) => serde_yaml::Value::String(s.clone()),
            ConfigValue::Int(i) => serde_yaml::Value::from(*i),
            ConfigValue::Float(f) => serde_yaml::Value::from(*f),
            ConfigValue::Bool(b) => serde_yaml::Value::Bool(*b),
            ConfigValue::List(items) => {
                serde_yaml::Value::Sequence(items.iter().map(ConfigValue::to_yaml).collect())
            }
            ConfigValue::Map(entries) | ConfigValue::Object(entries) => {
                let mut mapping = serde_yaml::Mapping::new();
                for (key, value) in entries {
                    mapping.insert(serde_yaml::Value::String(key.clone()), value.to_yaml());
                }
                serde_yaml::Value::Mapping(mapping)
            }
            ConfigValue::Dynamic(value) => value.clone(),
        }
    }
}
