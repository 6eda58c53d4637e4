//! Configuration management for ManifestGen

pub mod config;
pub mod source;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::Config;
pub use manifest_generator::config::{OrganizationStrategy, OutputConfig};
pub use source::CrdSource;
