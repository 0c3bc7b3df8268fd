use normcache_types::{EventKind, SubscriptionEvent};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── classification ───────────────────────────────────────────────

#[test]
fn created_event_is_classified() {
    let payload = json!({"taskCreated": {"id": 1, "title": "a"}});
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Created);
    assert_eq!(event.row, &json!({"id": 1, "title": "a"}));
}

#[test]
fn updated_event_is_classified_as_changed() {
    let payload = json!({"taskUpdated": {"id": 1}});
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Changed);
}

#[test]
fn changed_spelling_is_also_recognized() {
    let payload = json!({"taskChanged": {"id": 1}});
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Changed);
}

#[test]
fn removed_event_is_classified() {
    let payload = json!({"taskRemoved": {"id": 9}});
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Removed);
    assert_eq!(event.row, &json!({"id": 9}));
}

#[test]
fn created_wins_over_removed_when_both_present() {
    let payload = json!({
        "taskRemoved": {"id": 2},
        "taskCreated": {"id": 1},
    });
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Created);
    assert_eq!(event.row, &json!({"id": 1}));
}

#[test]
fn updated_wins_over_removed() {
    let payload = json!({
        "taskRemoved": {"id": 2},
        "taskUpdated": {"id": 1},
    });
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Changed);
}

// ── degraded payloads ────────────────────────────────────────────

#[test]
fn unrecognized_payload_is_none() {
    assert!(SubscriptionEvent::from_payload("task", &json!({"other": 1})).is_none());
    assert!(SubscriptionEvent::from_payload("task", &json!({})).is_none());
    assert!(SubscriptionEvent::from_payload("task", &json!(null)).is_none());
}

#[test]
fn null_event_field_is_skipped() {
    // A null created field falls through to the removed field.
    let payload = json!({
        "taskCreated": null,
        "taskRemoved": {"id": 4},
    });
    let event = SubscriptionEvent::from_payload("task", &payload).unwrap();
    assert_eq!(event.kind, EventKind::Removed);
}

#[test]
fn prefix_must_match_exactly() {
    let payload = json!({"nodeStatusCreated": {"id": 1}});
    assert!(SubscriptionEvent::from_payload("task", &payload).is_none());
    assert!(SubscriptionEvent::from_payload("nodeStatus", &payload).is_some());
}
