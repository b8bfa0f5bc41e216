use super::*;
use serde_json::json;

#[test]
fn empty_partial_is_identity() {
    let base = json!({"a": 1, "b": {"c": [1, 2]}});
    assert_eq!(merge(&base, &json!({})), base);
}

#[test]
fn base_is_never_mutated() {
    let base = json!({"a": {"x": 1, "y": 2}});
    let snapshot = base.clone();
    let _ = merge(&base, &json!({"a": {"x": 5}, "b": 3}));
    assert_eq!(base, snapshot);
}

#[test]
fn nested_partial_preserves_sibling_keys() {
    let base = json!({"a": {"x": 1, "y": 2}});
    let merged = merge(&base, &json!({"a": {"x": 5}}));
    assert_eq!(merged, json!({"a": {"x": 5, "y": 2}}));
}

#[test]
fn arrays_replace_wholesale() {
    let base = json!({"a": [1, 2]});
    let merged = merge(&base, &json!({"a": [9]}));
    assert_eq!(merged, json!({"a": [9]}));
}

#[test]
fn explicit_null_overwrites() {
    let base = json!({"a": 1, "b": 2});
    let merged = merge(&base, &json!({"a": null}));
    assert_eq!(merged, json!({"a": null, "b": 2}));
}

#[test]
fn primitive_replaces_object_wholesale() {
    let base = json!({"a": {"x": 1}});
    let merged = merge(&base, &json!({"a": 3}));
    assert_eq!(merged, json!({"a": 3}));
}

#[test]
fn new_branches_are_deep_copied() {
    let base = json!({"a": 1});
    let merged = merge(&base, &json!({"b": {"c": {"d": 2}}}));
    assert_eq!(merged, json!({"a": 1, "b": {"c": {"d": 2}}}));
}

#[test]
fn non_object_partial_keeps_base() {
    let base = json!({"a": 1});
    assert_eq!(merge(&base, &json!(42)), base);
    assert_eq!(merge(&base, &json!([1, 2, 3])), base);
    assert_eq!(merge(&base, &json!(null)), base);
}
