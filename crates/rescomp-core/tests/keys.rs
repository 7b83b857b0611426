//! Canonical key and field path behavior.

use rescomp_core::{canonicalize_key, FieldPath, KeyKind, KeyValue, Severity, Warning, WarningCode};
use serde_json::json;

fn key_of(raw: &str) -> KeyValue {
    let value = serde_json::from_str(raw).unwrap();
    canonicalize_key(&value).unwrap()
}

#[test]
fn decimal_equal_numbers_share_a_key() {
    let one = key_of("1");
    assert_eq!(one, key_of("1.0"));
    assert_eq!(one, key_of("1.00"));
    assert_eq!(one.value, "1");
    assert_eq!(one.kind, KeyKind::Number);
}

#[test]
fn trailing_zeros_are_trimmed() {
    assert_eq!(key_of("1.50").value, "1.5");
    assert_eq!(key_of("10.0").value, "10");
    assert_eq!(key_of("0.25").value, "0.25");
}

#[test]
fn every_zero_spelling_becomes_zero() {
    for raw in ["0", "0.0", "-0", "-0.0", "0.000", "-0e5"] {
        assert_eq!(key_of(raw).value, "0", "raw input {raw:?}");
    }
}

#[test]
fn negative_numbers_keep_their_sign() {
    assert_eq!(key_of("-1.50").value, "-1.5");
    assert_eq!(key_of("-42").value, "-42");
}

#[test]
fn strings_and_booleans_map_directly() {
    assert_eq!(key_of("\"abc\""), KeyValue::new(KeyKind::String, "abc"));
    assert_eq!(key_of("true"), KeyValue::new(KeyKind::Boolean, "true"));
    assert_eq!(key_of("false"), KeyValue::new(KeyKind::Boolean, "false"));
}

#[test]
fn string_and_number_keys_never_collide() {
    assert_ne!(key_of("\"1\""), key_of("1"));
}

#[test]
fn non_scalars_are_rejected() {
    for raw in ["null", "{\"a\":1}", "[1]"] {
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert!(canonicalize_key(&value).is_err(), "raw input {raw:?}");
    }
}

#[test]
fn rejected_keys_report_as_invalid_key_errors() {
    for raw in ["null", "{\"a\":1}", "[1]"] {
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        let warning = Warning::from(canonicalize_key(&value).unwrap_err());
        assert_eq!(warning.code, WarningCode::InvalidKey, "raw input {raw:?}");
        assert_eq!(warning.severity, Severity::Error, "raw input {raw:?}");
    }
}

#[test]
fn key_ordering_is_kind_then_value() {
    let s = KeyValue::new(KeyKind::String, "z");
    let n = KeyValue::new(KeyKind::Number, "1");
    let b = KeyValue::new(KeyKind::Boolean, "false");
    assert!(s < n);
    assert!(n < b);
    assert!(KeyValue::new(KeyKind::Number, "1") < KeyValue::new(KeyKind::Number, "2"));
}

#[test]
fn field_path_resolves_nested_objects() {
    let row = json!({ "fields": { "parentId": 7 }, "id": 1 });
    assert_eq!(
        FieldPath::parse("fields.parentId").resolve(&row),
        Some(&json!(7))
    );
    assert_eq!(FieldPath::parse("id").resolve(&row), Some(&json!(1)));
}

#[test]
fn field_path_misses_return_none() {
    let row = json!({ "fields": 3, "id": 1 });
    assert_eq!(FieldPath::parse("fields.parentId").resolve(&row), None);
    assert_eq!(FieldPath::parse("missing").resolve(&row), None);
    assert_eq!(FieldPath::parse("").resolve(&row), None);
    assert_eq!(FieldPath::parse("id").resolve(&json!([1])), None);
}
