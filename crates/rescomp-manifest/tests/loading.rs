//! Manifest loading and validation behavior.

use rescomp_core::{Severity, WarningCode};
use rescomp_manifest::{Direction, ManifestLoader, ManifestValidator};
use std::io::Write;
use tempfile::NamedTempFile;

const FULL_MANIFEST: &str = r#"
entities:
  Parent:
    file: parents.json
    pk: id
    root: true
    slugField: slug
    orderBy: { field: id, direction: desc }
    output:
      blobTemplate: "parents/{slug}.json"
      index:
        blob: "indexes/parents.json"
        fields: [id, slug, name]
    children:
      - entity: Child
        as: children
        fk: { field: parentId }
        orderBy: { field: id, direction: asc }
        maxDepth: 4
  Child:
    file: children.json
    pk: id
"#;

fn write_manifest(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

fn load(yaml: &str) -> rescomp_manifest::Manifest {
    let file = write_manifest(yaml);
    let result = ManifestLoader::new().load(file.path());
    assert!(!result.has_errors(), "warnings: {:?}", result.warnings);
    result.manifest.unwrap()
}

#[test]
fn loads_a_complete_manifest() {
    let manifest = load(FULL_MANIFEST);
    assert_eq!(manifest.entities.len(), 2);

    let parent = manifest.entity("Parent").unwrap();
    assert_eq!(parent.file, "parents.json");
    assert_eq!(parent.primary_key, "id");
    assert!(parent.is_root);
    assert_eq!(parent.slug_field.as_deref(), Some("slug"));

    let order = parent.order_by.as_ref().unwrap();
    assert_eq!(order.field, "id");
    assert_eq!(order.direction, Some(Direction::Desc));

    let child = &parent.children[0];
    assert_eq!(child.entity, "Child");
    assert_eq!(child.output_name(), "children");
    assert_eq!(child.fk_field, "parentId");
    assert_eq!(child.max_depth, Some(4));

    let output = parent.output.as_ref().unwrap();
    assert_eq!(output.blob_template, "parents/{slug}.json");
    let index = output.index.as_ref().unwrap();
    assert_eq!(index.blob, "indexes/parents.json");
    assert_eq!(index.fields, ["id", "slug", "name"]);

    let child_entity = manifest.entity("Child").unwrap();
    assert!(!child_entity.is_root);
    assert!(child_entity.children.is_empty());
    assert!(child_entity.output.is_none());
}

#[test]
fn output_name_defaults_to_entity_name() {
    let manifest = load(
        r#"
entities:
  Parent:
    file: parents.json
    pk: id
    root: true
    children:
      - entity: Child
        fk: { field: parentId }
  Child:
    file: children.json
    pk: id
"#,
    );
    let parent = manifest.entity("Parent").unwrap();
    assert_eq!(parent.children[0].output_name(), "Child");
}

#[test]
fn missing_file_reports_invalid_manifest() {
    let result = ManifestLoader::new().load(std::path::Path::new("/nonexistent/manifest.yml"));
    assert!(result.has_errors());
    assert!(result.manifest.is_none());
    assert_eq!(result.warnings[0].code, WarningCode::InvalidManifest);
}

#[test]
fn unparsable_yaml_reports_invalid_manifest() {
    let file = write_manifest("entities: [not: a: map");
    let result = ManifestLoader::new().load(file.path());
    assert!(result.has_errors());
    assert!(result.manifest.is_none());
}

#[test]
fn validator_accepts_the_full_manifest() {
    let manifest = load(FULL_MANIFEST);
    let warnings = ManifestValidator::new().validate(&manifest);
    assert!(warnings.is_empty(), "warnings: {:?}", warnings);
}

#[test]
fn empty_manifest_is_rejected() {
    let manifest = load("entities: {}");
    let warnings = ManifestValidator::new().validate(&manifest);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningCode::InvalidManifest);
    assert_eq!(warnings[0].severity, Severity::Error);
}

#[test]
fn missing_file_and_pk_are_rejected() {
    let manifest = load("entities: { Parent: { root: true } }");
    let warnings = ManifestValidator::new().validate(&manifest);
    let missing_key: Vec<_> = warnings
        .iter()
        .filter(|w| w.code == WarningCode::MissingKey)
        .collect();
    assert_eq!(missing_key.len(), 2);
    assert!(missing_key.iter().all(|w| w.severity == Severity::Error));
}

#[test]
fn unknown_child_entity_is_rejected() {
    let manifest = load(
        r#"
entities:
  Parent:
    file: parents.json
    pk: id
    children:
      - entity: Ghost
        fk: { field: parentId }
"#,
    );
    let warnings = ManifestValidator::new().validate(&manifest);
    assert!(warnings
        .iter()
        .any(|w| w.code == WarningCode::InvalidManifest && w.message.contains("Ghost")));
}

#[test]
fn missing_fk_field_is_rejected() {
    let manifest = load(
        r#"
entities:
  Parent:
    file: parents.json
    pk: id
    children:
      - entity: Child
  Child:
    file: children.json
    pk: id
"#,
    );
    let warnings = ManifestValidator::new().validate(&manifest);
    assert!(warnings
        .iter()
        .any(|w| w.code == WarningCode::MissingForeignKey && w.severity == Severity::Error));
}

#[test]
fn invalid_order_direction_is_rejected() {
    let manifest = load(
        r#"
entities:
  Parent:
    file: parents.json
    pk: id
    orderBy: { field: id, direction: sideways }
"#,
    );
    let warnings = ManifestValidator::new().validate(&manifest);
    assert!(warnings
        .iter()
        .any(|w| w.code == WarningCode::InvalidManifest && w.message.contains("direction")));
}

#[test]
fn fk_double_registration_is_rejected() {
    let manifest = load(
        r#"
entities:
  Alpha:
    file: alphas.json
    pk: id
    children:
      - entity: Child
        fk: { field: parentId }
  Beta:
    file: betas.json
    pk: id
    children:
      - entity: Child
        fk: { field: parentId }
  Child:
    file: children.json
    pk: id
"#,
    );
    let warnings = ManifestValidator::new().validate(&manifest);
    assert!(warnings.iter().any(|w| w.code == WarningCode::InvalidManifest
        && w.severity == Severity::Error
        && w.message.contains("declared by both")));
}

#[test]
fn same_parent_may_declare_distinct_fk_fields() {
    let manifest = load(
        r#"
entities:
  Parent:
    file: parents.json
    pk: id
    children:
      - entity: Child
        as: owned
        fk: { field: ownerId }
      - entity: Child
        as: sponsored
        fk: { field: sponsorId }
  Child:
    file: children.json
    pk: id
"#,
    );
    let warnings = ManifestValidator::new().validate(&manifest);
    assert!(warnings.is_empty(), "warnings: {:?}", warnings);
}
