//! Subscription-event reducer.
//!
//! Folds one inbound subscription message into a cached query snapshot.
//! Snapshots are immutable values: every application returns a new top-level
//! map with exactly one field replaced, so readers holding the previous
//! snapshot never observe a half-applied update.
//!
//! The reducer is idempotent under replayed or out-of-order delivery: a
//! created row whose id is already cached is dropped, and removing an id
//! that is not present changes nothing.

use crate::naming::{event_prefix, list_key_for_type, ListKeyOptions};
use normcache_types::{compare_ids, row_id, EventKind, ListValue, PaginatedList, SubscriptionEvent};
use serde_json::{Map, Value};
use tracing::debug;

/// A top-level cached query result.
pub type Snapshot = Map<String, Value>;

/// Applies create/remove subscription events to a cached list field.
pub struct EventReducer {
    data_type: String,
    options: ListKeyOptions,
}

impl EventReducer {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            options: ListKeyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ListKeyOptions) -> Self {
        self.options = options;
        self
    }

    /// Applies one raw subscription payload to the previous snapshot.
    ///
    /// Changed/updated events return the snapshot unchanged: row updates
    /// propagate through the store's own field merging, only membership
    /// changes touch the list.
    pub fn apply(&self, prev: &Snapshot, payload: &Value) -> Snapshot {
        let prefix = event_prefix(&self.data_type);
        let Some(event) = SubscriptionEvent::from_payload(&prefix, payload) else {
            return prev.clone();
        };
        debug!(data_type = %self.data_type, kind = ?event.kind, "subscription event");

        let field = self.resolve_field(prev);
        let current = prev.get(&field).and_then(ListValue::from_value);
        let next = match event.kind {
            EventKind::Changed => None,
            EventKind::Created => self.apply_created(current, event.row),
            EventKind::Removed => self.apply_removed(current, event.row),
        };
        let Some(next) = next else {
            return prev.clone();
        };
        let mut snapshot = prev.clone();
        snapshot.insert(field, next);
        snapshot
    }

    /// The cache field holding this type's list: the un-prefixed spelling if
    /// the snapshot has it, the `get`-prefixed spelling otherwise.
    fn resolve_field(&self, prev: &Snapshot) -> String {
        let plain = list_key_for_type(
            &self.data_type,
            &ListKeyOptions {
                with_get_prefix: false,
                ..self.options.clone()
            },
        );
        if prev.contains_key(&plain) {
            return plain;
        }
        list_key_for_type(
            &self.data_type,
            &ListKeyOptions {
                with_get_prefix: true,
                ..self.options.clone()
            },
        )
    }

    fn apply_created(&self, current: Option<ListValue>, row: &Value) -> Option<Value> {
        // A field the snapshot does not hold yet seeds the empty default.
        let shape = current.unwrap_or_else(|| ListValue::Paginated(PaginatedList::empty()));
        let exists = shape
            .rows()
            .iter()
            .any(|cached| compare_ids(row_id(cached), row_id(row)));
        if exists {
            debug!(data_type = %self.data_type, "created row already cached");
            return None;
        }
        match shape {
            ListValue::Rows(mut rows) => {
                rows.push(row.clone());
                Some(Value::Array(rows))
            }
            ListValue::Paginated(mut list) => {
                list.rows.push(row.clone());
                list.count += 1;
                Some(list.into())
            }
        }
    }

    fn apply_removed(&self, current: Option<ListValue>, row: &Value) -> Option<Value> {
        match current {
            // Nothing cached to remove from.
            None => None,
            Some(ListValue::Rows(rows)) => Some(Value::Array(
                rows.into_iter()
                    .filter(|cached| !compare_ids(row_id(cached), row_id(row)))
                    .collect(),
            )),
            Some(ListValue::Paginated(mut list)) => {
                let before = list.rows.len();
                list.rows
                    .retain(|cached| !compare_ids(row_id(cached), row_id(row)));
                if list.rows.len() != before {
                    list.count -= 1;
                }
                Some(list.into())
            }
        }
    }
}
