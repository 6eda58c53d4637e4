use manifest_gen::{Config, CrdSource, GenerationIndex, ManifestGen, OrganizationStrategy};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WIDGET_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
    plural: widgets
  scope: Namespaced
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                colorName:
                  type: string
                  enum: [red, blue]
                size:
                  type: integer
                  minimum: 1
                  maximum: 10
    - name: v1beta1
      served: false
      schema:
        openAPIV3Schema:
          type: object
"#;

const CONTOUR: &str = "k8s_projectcontour_io_contour_configuration_v1alpha1_manifest";
const WIDGET: &str = "k8s_example_com_widget_v1_manifest";

fn config_with_widgets(dir: &Path) -> Config {
    let crd_dir = dir.join("crds");
    std::fs::create_dir_all(&crd_dir).unwrap();
    std::fs::write(crd_dir.join("widget.yaml"), WIDGET_CRD).unwrap();
    std::fs::write(crd_dir.join("notes.txt"), "not yaml").unwrap();

    let mut config = Config::default();
    config.crd_sources.push(CrdSource {
        name: "widgets".to_string(),
        path: crd_dir,
        filters: vec!["example.com/*".to_string()],
    });
    config.output.base_path = dir.join("generated");
    config
}

#[tokio::test]
async fn test_crd_sources_are_registered() {
    let temp_dir = TempDir::new().unwrap();
    let app = ManifestGen::new(config_with_widgets(temp_dir.path())).unwrap();

    assert_eq!(app.provider().type_names(), vec![WIDGET, CONTOUR]);

    let config = serde_yaml::from_str(
        "metadata:\n  name: w\n  namespace: default\nspec:\n  size: 3\n  color_name: red\n",
    )
    .unwrap();
    let response = app.read(WIDGET, config).await.unwrap();
    assert_eq!(
        response.yaml().unwrap(),
        "apiVersion: example.com/v1\nkind: Widget\nmetadata:\n  name: w\n  namespace: default\nspec:\n  colorName: red\n  size: 3\n"
    );

    let config = serde_yaml::from_str(
        "metadata:\n  name: w\n  namespace: default\nspec:\n  size: 11\n  color_name: green\n",
    )
    .unwrap();
    let response = app.read(WIDGET, config).await.unwrap();
    assert!(response.diagnostics.has_error_at("spec.size"));
    assert!(response.diagnostics.has_error_at("spec.color_name"));
}

#[tokio::test]
async fn test_filters_exclude_other_groups() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_with_widgets(temp_dir.path());
    config.crd_sources[0].filters = vec!["projectcontour.io/*".to_string()];
    config.include_builtin = false;

    let app = ManifestGen::new(config).unwrap();
    assert!(app.provider().is_empty());
}

#[tokio::test]
async fn test_unknown_data_source_is_an_error() {
    let app = ManifestGen::new(Config::default()).unwrap();
    assert!(app.read("k8s_missing_manifest", serde_yaml::Value::Null).await.is_err());
}

#[tokio::test]
async fn test_generate_writes_documents_and_index() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_widgets(temp_dir.path());
    let base_path = config.output.base_path.clone();

    let app = ManifestGen::new(config).unwrap();
    let result = app.generate().await.unwrap();

    assert_eq!(result.error_count(), 0);
    assert_eq!(result.files_generated(), 3);

    let contour_doc = base_path.join(format!("projectcontour.io_v1alpha1/{CONTOUR}.yaml"));
    let widget_doc = base_path.join(format!("example.com_v1/{WIDGET}.yaml"));
    assert!(contour_doc.exists());
    assert!(widget_doc.exists());

    let document: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&widget_doc).unwrap()).unwrap();
    assert_eq!(document["type_name"].as_str(), Some(WIDGET));
    assert_eq!(document["kind"].as_str(), Some("Widget"));
    assert!(document["attributes"].as_sequence().is_some());

    let index: GenerationIndex =
        serde_yaml::from_str(&std::fs::read_to_string(base_path.join("index.yaml")).unwrap())
            .unwrap();
    assert_eq!(index.provider, "k8s");
    assert_eq!(index.data_sources.len(), 2);
    let entry = index
        .data_sources
        .iter()
        .find(|e| e.type_name == WIDGET)
        .unwrap();
    assert_eq!(entry.path, PathBuf::from(format!("example.com_v1/{WIDGET}.yaml")));
    assert_eq!(entry.sha256.len(), 64);
}

#[tokio::test]
async fn test_generate_reports_failed_sources() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_with_widgets(temp_dir.path());
    let base_path = config.output.base_path.clone();
    std::fs::create_dir_all(&base_path).unwrap();
    std::fs::write(base_path.join("projectcontour.io_v1alpha1"), "not a directory").unwrap();

    let app = ManifestGen::new(config).unwrap();
    let result = app.generate().await.unwrap();

    assert_eq!(result.error_count(), 1);
    let failed: Vec<&str> = result
        .results
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.type_name.as_str())
        .collect();
    assert_eq!(failed, vec![CONTOUR]);

    let index: GenerationIndex =
        serde_yaml::from_str(&std::fs::read_to_string(base_path.join("index.yaml")).unwrap())
            .unwrap();
    assert_eq!(index.data_sources.len(), 1);
    assert_eq!(index.data_sources[0].type_name, WIDGET);
}

#[tokio::test]
async fn test_generate_flat_layout() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.output.base_path = temp_dir.path().join("out");
    config.output.organization = OrganizationStrategy::Flat;

    let app = ManifestGen::new(config).unwrap();
    app.generate().await.unwrap();

    assert!(temp_dir.path().join(format!("out/{CONTOUR}.yaml")).exists());
    assert!(temp_dir.path().join("out/index.yaml").exists());
}

#[test]
fn test_missing_crd_directory_fails() {
    let mut config = Config::default();
    config.crd_sources.push(CrdSource {
        name: "missing".to_string(),
        path: PathBuf::from("/nonexistent/manifest-gen/crds"),
        filters: Vec::new(),
    });
    assert!(ManifestGen::new(config).is_err());
}
