use normcache_types::{CacheRef, KeySpec, REF_KEY};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn render_flat_specifier() {
    let specs = vec![KeySpec::field("filter"), KeySpec::field("sort")];
    assert_eq!(KeySpec::render(&specs), "filter,sort");
}

#[test]
fn render_nested_specifier() {
    let specs = vec![
        KeySpec::field("filter"),
        KeySpec::Nested(vec![KeySpec::field("status"), KeySpec::field("tags")]),
        KeySpec::field("sort"),
    ];
    assert_eq!(KeySpec::render(&specs), "filter,(status,tags),sort");
}

#[test]
fn render_empty_specifier() {
    assert_eq!(KeySpec::render(&[]), "");
}

#[test]
fn specifier_serde_shape() {
    let specs = vec![
        KeySpec::field("a"),
        KeySpec::Nested(vec![KeySpec::field("b")]),
    ];
    let value = serde_json::to_value(&specs).unwrap();
    assert_eq!(value, json!(["a", ["b"]]));
    let back: Vec<KeySpec> = serde_json::from_value(value).unwrap();
    assert_eq!(back, specs);
}

// ── references ───────────────────────────────────────────────────

#[test]
fn reference_wire_shape() {
    let r = CacheRef::new("Task:1");
    assert_eq!(r.to_value(), json!({REF_KEY: "Task:1"}));
}

#[test]
fn reference_probe() {
    assert_eq!(CacheRef::of(&json!({"__ref": "Task:1"})), Some("Task:1"));
    assert_eq!(CacheRef::of(&json!({"id": 1})), None);
    assert_eq!(CacheRef::of(&json!("Task:1")), None);
}

#[test]
fn references_equal_by_identity_string() {
    assert_eq!(CacheRef::new("Task:1"), CacheRef::new(String::from("Task:1")));
    assert_ne!(CacheRef::new("Task:1"), CacheRef::new("Task:2"));
}
