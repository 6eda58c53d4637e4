//! Configuration tests

use super::*;
use rstest::rstest;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn crd_source(name: &str) -> CrdSource {
    CrdSource {
        name: name.to_string(),
        path: PathBuf::from("./crds"),
        filters: vec!["projectcontour.io/*".to_string()],
    }
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config.version, parsed.version);
    assert_eq!(parsed.provider_prefix, "k8s");
    assert!(parsed.include_builtin);
}

#[test]
fn test_config_defaults_for_missing_fields() {
    let parsed: Config = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
    assert_eq!(parsed.provider_prefix, "k8s");
    assert!(parsed.crd_sources.is_empty());
    assert_eq!(parsed.output.organization, OrganizationStrategy::ApiVersion);
    assert!(parsed.validate().is_ok());
}

#[test]
fn test_config_from_file() {
    let mut config = Config::default();
    config.crd_sources.push(crd_source("contour"));

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.version, loaded.version);
    assert_eq!(loaded.crd_sources.len(), 1);
    assert_eq!(loaded.crd_sources[0].filters, vec!["projectcontour.io/*"]);
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.include_builtin = false;
    assert!(config.validate().is_err());

    config.crd_sources.push(crd_source("contour"));
    assert!(config.validate().is_ok());

    config.crd_sources.push(crd_source("contour"));
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_version() {
    let mut config = Config::default();
    config.version = "2.0".to_string();
    assert!(config.validate().is_err());
}

#[rstest]
#[case("k8s", true)]
#[case("my_k8s2", true)]
#[case("K8s", false)]
#[case("k8s-", false)]
#[case("2k8s", false)]
#[case("", false)]
fn test_provider_prefix(#[case] prefix: &str, #[case] valid: bool) {
    let mut config = Config::default();
    config.provider_prefix = prefix.to_string();
    assert_eq!(config.validate().is_ok(), valid);
}

#[test]
fn test_source_path_expansion() {
    std::env::set_var("MANIFEST_GEN_TEST_CRDS", "/tmp/crds");
    let source = CrdSource {
        name: "env".to_string(),
        path: PathBuf::from("$MANIFEST_GEN_TEST_CRDS/contour"),
        filters: Vec::new(),
    };
    assert_eq!(
        source.expanded_path().unwrap(),
        PathBuf::from("/tmp/crds/contour")
    );
}

#[test]
fn test_invalid_filter() {
    let mut source = crd_source("bad");
    source.filters = vec!["projectcontour.io/[v1".to_string()];
    assert!(source.validate().is_err());
}
