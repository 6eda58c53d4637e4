//! Attribute schema of a manifest data source

use crate::validation::Validator;
use serde::Serialize;

/// Element type of list and map attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    String,
    Int64,
    Float64,
    Bool,
    Dynamic,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int64,
    Float64,
    Bool,
    List {
        element: ElementType,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        element_validators: Vec<Validator>,
    },
    Map {
        element: ElementType,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        element_validators: Vec<Validator>,
    },
    Object {
        attributes: Vec<Attribute>,
    },
    ListOfObjects {
        attributes: Vec<Attribute>,
    },
    /// Free-form value passed through unchanged
    Dynamic,
}

impl AttributeType {
    /// Nested attributes of object-like types
    pub fn attributes(&self) -> Option<&[Attribute]> {
        match self {
            AttributeType::Object { attributes } | AttributeType::ListOfObjects { attributes } => {
                Some(attributes)
            }
            _ => None,
        }
    }

    pub fn type_label(&self) -> String {
        match self {
            AttributeType::String => "string".to_string(),
            AttributeType::Int64 => "int64".to_string(),
            AttributeType::Float64 => "float64".to_string(),
            AttributeType::Bool => "bool".to_string(),
            AttributeType::List { element, .. } => format!("list of {}", element_label(*element)),
            AttributeType::Map { element, .. } => format!("map of {}", element_label(*element)),
            AttributeType::Object { .. } => "object".to_string(),
            AttributeType::ListOfObjects { .. } => "list of objects".to_string(),
            AttributeType::Dynamic => "dynamic".to_string(),
        }
    }
}

fn element_label(element: ElementType) -> &'static str {
    match element {
        ElementType::String => "string",
        ElementType::Int64 => "int64",
        ElementType::Float64 => "float64",
        ElementType::Bool => "bool",
        ElementType::Dynamic => "dynamic",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    /// snake_case name at the configuration boundary
    pub name: String,

    /// camelCase field name in the rendered manifest
    pub wire_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    pub computed: bool,

    #[serde(rename = "type")]
    pub attribute_type: AttributeType,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    /// Optional, caller-supplied attribute
    pub fn new(name: impl Into<String>, wire_name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            wire_name: wire_name.into(),
            description: None,
            required: false,
            computed: false,
            attribute_type,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set by the data source, never by the caller
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self.required = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators.extend(validators);
        self
    }

    pub fn is_optional(&self) -> bool {
        !self.required && !self.computed
    }

    /// The schema description marks the field for removal
    pub fn is_deprecated(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| d.contains("Deprecated"))
    }
}

/// Full schema of one data source
#[derive(Debug, Clone, Serialize)]
pub struct DataSourceSchema {
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl DataSourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Resolve a dotted attribute path such as
    /// `spec.envoy.listener.socket_options.tos`
    pub fn find(&self, path: &str) -> Option<&Attribute> {
        let mut segments = path.split('.');
        let mut current = self.attribute(segments.next()?)?;
        for segment in segments {
            current = current
                .attribute_type
                .attributes()?
                .iter()
                .find(|a| a.name == segment)?;
        }
        Some(current)
    }

    /// Total number of attributes, nested ones included
    pub fn attribute_count(&self) -> usize {
        fn count(attributes: &[Attribute]) -> usize {
            attributes
                .iter()
                .map(|a| 1 + a.attribute_type.attributes().map_or(0, count))
                .sum()
        }
        count(&self.attributes)
    }
}
