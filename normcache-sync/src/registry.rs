//! Active-subscription tracking.
//!
//! Each consumer — a screen, a controller, a session — owns one registry.
//! Subscribing the same query document twice is a no-op; changing the
//! variables for a data type tears its stale subscriptions down before new
//! ones start. Dropping the registry unsubscribes everything it tracks.

use normcache_types::compare_values;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Callback that tears down one active subscription.
pub type Unsubscribe = Box<dyn FnOnce()>;

struct ActiveSubscription {
    data_type: String,
    variables: Value,
    unsubscribe: Option<Unsubscribe>,
}

impl ActiveSubscription {
    fn teardown(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// Per-consumer registry of active subscription documents.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<String, ActiveSubscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Whether a query document is currently subscribed.
    pub fn is_subscribed(&self, document: &str) -> bool {
        self.subscriptions.contains_key(document)
    }

    /// Reconciles the registry against one consumer turn: subscriptions of
    /// `data_type` whose variables changed are torn down, then every
    /// document not yet tracked is started via `subscribe`, which returns
    /// the unsubscribe callback to retain.
    pub fn sync_subscriptions<F>(
        &mut self,
        documents: &[&str],
        data_type: &str,
        variables: &Value,
        mut subscribe: F,
    ) where
        F: FnMut(&str, &Value) -> Unsubscribe,
    {
        self.subscriptions.retain(|document, subscription| {
            let changed = subscription.data_type == data_type
                && !compare_values(variables, &subscription.variables);
            if changed {
                debug!(document = %document, data_type, "subscription variables changed; unsubscribing");
                subscription.teardown();
            }
            !changed
        });
        for document in documents {
            if self.subscriptions.contains_key(*document) {
                continue;
            }
            debug!(document = %document, data_type, "starting subscription");
            let unsubscribe = subscribe(document, variables);
            self.subscriptions.insert(
                (*document).to_string(),
                ActiveSubscription {
                    data_type: data_type.to_string(),
                    variables: variables.clone(),
                    unsubscribe: Some(unsubscribe),
                },
            );
        }
    }

    /// Tears down every tracked subscription.
    pub fn clear(&mut self) {
        for (document, mut subscription) in self.subscriptions.drain() {
            debug!(document = %document, "unsubscribing");
            subscription.teardown();
        }
    }
}

impl Drop for SubscriptionRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}
