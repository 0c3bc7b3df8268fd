//! Subscription-event classification.
//!
//! Real-time payloads carry the affected row under a field named after the
//! entity type: `taskCreated`, `taskUpdated` / `taskChanged`, `taskRemoved`.
//! Classification probes those fields in priority order; the first one that
//! is present and truthy is the event attended to.

use crate::compare::is_truthy;
use serde_json::Value;

/// The kind of change a subscription event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A row joined the collection.
    Created,
    /// A row's fields changed. Membership is unaffected.
    Changed,
    /// A row left the collection.
    Removed,
}

/// A classified subscription event, borrowing the row from its raw payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriptionEvent<'a> {
    pub kind: EventKind,
    /// The full or partial row the event carries.
    pub row: &'a Value,
}

impl<'a> SubscriptionEvent<'a> {
    /// Classifies a raw payload for the given event prefix (the camelCase
    /// entity name). Returns `None` when the payload carries no recognized
    /// event field — callers treat that as a no-op message.
    pub fn from_payload(prefix: &str, payload: &'a Value) -> Option<Self> {
        let probe = |suffix: &str| {
            payload
                .get(format!("{prefix}{suffix}"))
                .filter(|v| is_truthy(v))
        };
        if let Some(row) = probe("Created") {
            return Some(Self { kind: EventKind::Created, row });
        }
        // `Updated` and `Changed` are two historical spellings of one event.
        if let Some(row) = probe("Updated").or_else(|| probe("Changed")) {
            return Some(Self { kind: EventKind::Changed, row });
        }
        if let Some(row) = probe("Removed") {
            return Some(Self { kind: EventKind::Removed, row });
        }
        None
    }
}
