//! Raw loading and index construction behavior.

use std::collections::BTreeMap;
use std::fs;

use rescomp_core::{CancelFlag, KeyKind, KeyValue, Severity, WarningCode};
use rescomp_index::{IndexBuilder, RawDataLoader, RawLoadResult};
use rescomp_manifest::{ChildRelationship, Entity, Manifest};
use tempfile::TempDir;

fn entity(name: &str, file: &str, pk: &str) -> Entity {
    Entity {
        name: name.to_string(),
        file: file.to_string(),
        primary_key: pk.to_string(),
        ..Entity::default()
    }
}

fn manifest(entities: Vec<Entity>) -> Manifest {
    Manifest {
        entities: entities
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn load(manifest: &Manifest, files: &[(&str, &str)]) -> RawLoadResult {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    RawDataLoader::new()
        .load(manifest, dir.path(), &CancelFlag::new())
        .unwrap()
}

#[test]
fn loads_valid_array_and_extracts_pk() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let result = load(&manifest, &[("things.json", r#"[{"id":1},{"id":2}]"#)]);

    assert!(!result.has_errors());
    let rows = result.data.rows("Thing");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.pk.is_some()));
    assert_eq!(rows[0].row_index, 0);
    assert_eq!(rows[1].row_index, 1);
}

#[test]
fn missing_file_is_an_error() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let result = load(&manifest, &[]);

    assert!(result.has_errors());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::RawFileNotFound && w.severity == Severity::Error));
    assert!(result.data.rows("Thing").is_empty());
}

#[test]
fn non_array_root_is_an_error() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let result = load(&manifest, &[("things.json", r#"{"id":1}"#)]);

    assert!(result.has_errors());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::RawRootNotArray && w.severity == Severity::Error));
    assert!(result.data.rows("Thing").is_empty());
}

#[test]
fn non_object_row_is_an_error_and_skipped() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let result = load(&manifest, &[("things.json", r#"[{"id":1}, 42]"#)]);

    assert!(result.has_errors());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::RawRowNotObject && w.severity == Severity::Error));
    assert_eq!(result.data.rows("Thing").len(), 1);
}

#[test]
fn unparsable_file_is_an_error() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let result = load(&manifest, &[("things.json", "not json")]);

    assert!(result.has_errors());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::RawFileInvalidJson));
}

#[test]
fn cancellation_aborts_loading() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("things.json"), "[]").unwrap();

    let cancel = CancelFlag::new();
    cancel.cancel();
    assert!(RawDataLoader::new()
        .load(&manifest, dir.path(), &cancel)
        .is_err());
}

#[test]
fn builds_injective_pk_index() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let raw = load(&manifest, &[("things.json", r#"[{"id":1},{"id":2}]"#)]);
    let indexes = IndexBuilder::new()
        .build(&manifest, &raw.data, &CancelFlag::new())
        .unwrap();

    assert!(!indexes.has_errors());
    let pk = &indexes.pk["Thing"];
    assert_eq!(pk.rows_by_key.len(), 2);
    assert_eq!(pk.rows_by_key[&KeyValue::new(KeyKind::Number, "1")], 0);
    assert_eq!(pk.rows_by_key[&KeyValue::new(KeyKind::Number, "2")], 1);
}

#[test]
fn duplicate_pk_keeps_first_row() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    // 1 and 1.0 are decimal-equal and must collide.
    let raw = load(
        &manifest,
        &[("things.json", r#"[{"id":1,"name":"first"},{"id":1.0,"name":"second"}]"#)],
    );
    let indexes = IndexBuilder::new()
        .build(&manifest, &raw.data, &CancelFlag::new())
        .unwrap();

    assert!(indexes.has_errors());
    assert!(indexes
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::DuplicatePk && w.severity == Severity::Error));
    let pk = &indexes.pk["Thing"];
    assert_eq!(pk.rows_by_key.len(), 1);
    assert_eq!(pk.rows_by_key[&KeyValue::new(KeyKind::Number, "1")], 0);
}

#[test]
fn missing_and_invalid_pk_are_errors() {
    let manifest = manifest(vec![entity("Thing", "things.json", "id")]);
    let raw = load(
        &manifest,
        &[("things.json", r#"[{"name":"nopk"},{"id":null},{"id":[1]}]"#)],
    );
    let indexes = IndexBuilder::new()
        .build(&manifest, &raw.data, &CancelFlag::new())
        .unwrap();

    assert!(indexes.has_errors());
    assert!(indexes
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::MissingPk));
    assert_eq!(
        indexes
            .warnings
            .iter()
            .filter(|w| w.code == WarningCode::InvalidPkType)
            .count(),
        2
    );
    assert!(indexes.pk["Thing"].rows_by_key.is_empty());
}

#[test]
fn builds_fk_index_with_row_order_preserved() {
    let mut parent = entity("Parent", "parents.json", "id");
    parent.children = vec![ChildRelationship {
        entity: "Child".to_string(),
        fk_field: "parentId".to_string(),
        ..ChildRelationship::default()
    }];
    let manifest = manifest(vec![parent, entity("Child", "children.json", "id")]);

    let raw = load(
        &manifest,
        &[
            ("parents.json", r#"[{"id":1}]"#),
            (
                "children.json",
                r#"[{"id":10,"parentId":1},{"id":11,"parentId":1},{"id":12}]"#,
            ),
        ],
    );
    let indexes = IndexBuilder::new()
        .build(&manifest, &raw.data, &CancelFlag::new())
        .unwrap();

    // The orphan row only warns; it is excluded from this index.
    assert!(!indexes.has_errors());
    assert!(indexes
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::MissingFk && w.severity == Severity::Warning));

    assert_eq!(indexes.fk.len(), 1);
    let fk = indexes.fk_lookup("Child", "parentId").unwrap();
    assert_eq!(fk.parent, "Parent");
    let rows = &fk.rows_by_key[&KeyValue::new(KeyKind::Number, "1")];
    assert_eq!(rows, &[0, 1]);
}

#[test]
fn invalid_fk_value_warns_and_is_skipped() {
    let mut parent = entity("Parent", "parents.json", "id");
    parent.children = vec![ChildRelationship {
        entity: "Child".to_string(),
        fk_field: "parentId".to_string(),
        ..ChildRelationship::default()
    }];
    let manifest = manifest(vec![parent, entity("Child", "children.json", "id")]);

    let raw = load(
        &manifest,
        &[
            ("parents.json", r#"[{"id":1}]"#),
            (
                "children.json",
                r#"[{"id":10,"parentId":null},{"id":11,"parentId":{"nested":1}}]"#,
            ),
        ],
    );
    let indexes = IndexBuilder::new()
        .build(&manifest, &raw.data, &CancelFlag::new())
        .unwrap();

    assert!(!indexes.has_errors());
    assert_eq!(
        indexes
            .warnings
            .iter()
            .filter(|w| w.code == WarningCode::InvalidFkType && w.severity == Severity::Warning)
            .count(),
        2
    );
    let fk = indexes.fk_lookup("Child", "parentId").unwrap();
    assert!(fk.rows_by_key.is_empty());
}

#[test]
fn fk_index_resolves_nested_field_paths() {
    let mut parent = entity("Parent", "parents.json", "id");
    parent.children = vec![ChildRelationship {
        entity: "Child".to_string(),
        fk_field: "fields.parentId".to_string(),
        ..ChildRelationship::default()
    }];
    let manifest = manifest(vec![parent, entity("Child", "children.json", "id")]);

    let raw = load(
        &manifest,
        &[
            ("parents.json", r#"[{"id":1}]"#),
            (
                "children.json",
                r#"[{"id":10,"fields":{"parentId":1}},{"id":11,"fields":{"parentId":1}}]"#,
            ),
        ],
    );
    let indexes = IndexBuilder::new()
        .build(&manifest, &raw.data, &CancelFlag::new())
        .unwrap();

    assert!(!indexes.has_errors());
    assert!(!indexes
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::MissingFk));
    let fk = indexes.fk_lookup("Child", "fields.parentId").unwrap();
    assert_eq!(fk.rows_by_key[&KeyValue::new(KeyKind::Number, "1")].len(), 2);
}
