use normcache_sync::{SubscriptionRegistry, Unsubscribe};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every unsubscribe invocation by document key.
#[derive(Clone, Default)]
struct Teardowns(Rc<RefCell<Vec<String>>>);

impl Teardowns {
    fn tracker(&self, document: &str) -> Unsubscribe {
        let log = self.0.clone();
        let document = document.to_string();
        Box::new(move || log.borrow_mut().push(document))
    }

    fn seen(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

#[test]
fn subscribes_each_document_once() {
    let teardowns = Teardowns::default();
    let mut registry = SubscriptionRegistry::new();
    let mut started = 0;

    registry.sync_subscriptions(&["q1", "q2"], "Task", &json!({"a": 1}), |doc, _vars| {
        started += 1;
        teardowns.tracker(doc)
    });

    assert_eq!(started, 2);
    assert_eq!(registry.len(), 2);
    assert!(registry.is_subscribed("q1"));
    assert!(registry.is_subscribed("q2"));
}

#[test]
fn repeated_sync_with_same_variables_does_not_resubscribe() {
    let teardowns = Teardowns::default();
    let mut registry = SubscriptionRegistry::new();
    let mut started = 0;

    for _ in 0..3 {
        registry.sync_subscriptions(&["q1"], "Task", &json!({"a": 1}), |doc, _| {
            started += 1;
            teardowns.tracker(doc)
        });
    }

    assert_eq!(started, 1);
    assert_eq!(teardowns.seen(), Vec::<String>::new());
}

#[test]
fn equivalent_variable_shapes_do_not_resubscribe() {
    let teardowns = Teardowns::default();
    let mut registry = SubscriptionRegistry::new();
    let mut started = 0;

    registry.sync_subscriptions(&["q1"], "Task", &json!({}), |doc, _| {
        started += 1;
        teardowns.tracker(doc)
    });
    // A differently-spelled "no filters" object is the same subscription.
    registry.sync_subscriptions(&["q1"], "Task", &json!({}), |doc, _| {
        started += 1;
        teardowns.tracker(doc)
    });

    assert_eq!(started, 1);
}

#[test]
fn changed_variables_tear_down_and_resubscribe() {
    let teardowns = Teardowns::default();
    let mut registry = SubscriptionRegistry::new();
    let mut started = 0;

    registry.sync_subscriptions(&["q1"], "Task", &json!({"page": 1}), |doc, _| {
        started += 1;
        teardowns.tracker(doc)
    });
    registry.sync_subscriptions(&["q1"], "Task", &json!({"page": 2}), |doc, _| {
        started += 1;
        teardowns.tracker(doc)
    });

    assert_eq!(started, 2);
    assert_eq!(teardowns.seen(), vec!["q1".to_string()]);
    assert_eq!(registry.len(), 1);
}

#[test]
fn other_data_types_survive_a_variable_change() {
    let teardowns = Teardowns::default();
    let mut registry = SubscriptionRegistry::new();

    registry.sync_subscriptions(&["tasks-q"], "Task", &json!({"a": 1}), |doc, _| {
        teardowns.tracker(doc)
    });
    registry.sync_subscriptions(&["users-q"], "User", &json!({"a": 1}), |doc, _| {
        teardowns.tracker(doc)
    });

    // Task variables change; the User subscription must stay untouched.
    registry.sync_subscriptions(&["tasks-q"], "Task", &json!({"a": 2}), |doc, _| {
        teardowns.tracker(doc)
    });

    assert_eq!(teardowns.seen(), vec!["tasks-q".to_string()]);
    assert!(registry.is_subscribed("users-q"));
    assert!(registry.is_subscribed("tasks-q"));
}

#[test]
fn clear_unsubscribes_everything() {
    let teardowns = Teardowns::default();
    let mut registry = SubscriptionRegistry::new();

    registry.sync_subscriptions(&["q1", "q2"], "Task", &json!({}), |doc, _| {
        teardowns.tracker(doc)
    });
    registry.clear();

    let mut seen = teardowns.seen();
    seen.sort();
    assert_eq!(seen, vec!["q1".to_string(), "q2".to_string()]);
    assert!(registry.is_empty());
}

#[test]
fn drop_unsubscribes_everything() {
    let teardowns = Teardowns::default();
    {
        let mut registry = SubscriptionRegistry::new();
        registry.sync_subscriptions(&["q1"], "Task", &json!({}), |doc, _| {
            teardowns.tracker(doc)
        });
    }
    assert_eq!(teardowns.seen(), vec!["q1".to_string()]);
}

#[test]
fn variables_are_passed_to_the_subscribe_callback() {
    let mut registry = SubscriptionRegistry::new();
    let mut captured = None;

    registry.sync_subscriptions(&["q1"], "Task", &json!({"page": 3}), |_, vars| {
        captured = Some(vars.clone());
        Box::new(|| {})
    });

    assert_eq!(captured, Some(json!({"page": 3})));
}
