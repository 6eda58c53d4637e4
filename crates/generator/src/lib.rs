//! Schema-driven manifest rendering for CRD data sources
//!
//! A [`DataSourceSchema`] is derived from a CRD's OpenAPI schema by the
//! [`SchemaBuilder`]. Caller configuration is decoded against it by the
//! [`Decoder`] and turned into a manifest by the [`ManifestRenderer`].

pub mod attribute;
pub mod builder;
pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod naming;
pub mod render;
pub mod result;
pub mod validation;
pub mod value;

pub use attribute::{Attribute, AttributeType, DataSourceSchema, ElementType};
pub use builder::{SchemaBuildError, SchemaBuilder};
pub use decode::Decoder;
pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use render::{ManifestRenderer, RenderError};
pub use result::{GenerationResult, SourceResult};
pub use validation::Validator;
pub use value::ConfigValue;
