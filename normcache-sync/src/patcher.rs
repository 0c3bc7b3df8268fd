//! Post-mutation cache patching.
//!
//! After a create/remove mutation settles, the affected list fields are
//! rewritten in place — references inserted or filtered out — instead of
//! refetching the lists from the network.

use crate::naming::{create_key, list_key_for_type, remove_key, ListKeyOptions};
use normcache_store::{CacheStore, ModifyContext};
use normcache_types::{id_string, is_truthy, row_id, CacheRef};
use serde_json::Value;
use tracing::{debug, warn};

/// Rewrites a list field from a mutation result.
pub struct MutationPatcher {
    data_type: String,
    list_field: Option<String>,
}

impl MutationPatcher {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            list_field: None,
        }
    }

    /// Overrides the derived list-field name.
    pub fn with_list_field(mut self, field: impl Into<String>) -> Self {
        self.list_field = Some(field.into());
        self
    }

    /// Applies a mutation result to the cache.
    ///
    /// Results carrying neither `create{Type}` nor `remove{Type}` are
    /// ignored. Rows the store cannot identify are skipped — a row without
    /// a normalized identity cannot be referenced from a list.
    pub fn apply<C: CacheStore>(&self, cache: &mut C, result: &Value) {
        let created = result
            .get(create_key(&self.data_type))
            .filter(|v| is_truthy(v));
        let removed = result
            .get(remove_key(&self.data_type))
            .filter(|v| is_truthy(v));
        let is_create = created.is_some();
        let Some(affected) = created.or(removed) else {
            return;
        };
        let rows: Vec<&Value> = match affected {
            Value::Array(items) => items.iter().collect(),
            single => vec![single],
        };
        let field = self
            .list_field
            .clone()
            .unwrap_or_else(|| list_key_for_type(&self.data_type, &ListKeyOptions::default()));

        for row in rows {
            let Some(id) = id_string(row_id(row)) else {
                warn!(data_type = %self.data_type, "mutation row has no usable id; skipped");
                continue;
            };
            let probe = CacheRef::new(format!("{}:{id}", self.data_type)).to_value();
            let Some(identity) = cache.identify(&probe) else {
                continue;
            };
            debug!(data_type = %self.data_type, field = %field, identity = %identity, is_create, "patching list field");
            cache.modify_field(&field, &mut |current, ctx| {
                patch_list(current, &identity, is_create, ctx)
            });
        }
    }
}

/// Patches one cached list value: insert or filter a reference, keeping the
/// paginated `count` in step. Reference comparisons are string-identity.
fn patch_list(current: Value, identity: &str, is_create: bool, ctx: &ModifyContext) -> Value {
    match current {
        Value::Array(rows) => {
            if is_create {
                if rows.iter().any(|r| CacheRef::of(r) == Some(identity)) {
                    return Value::Array(rows);
                }
                let mut next = vec![ctx.to_reference(identity)];
                next.extend(rows);
                Value::Array(next)
            } else {
                Value::Array(
                    rows.into_iter()
                        .filter(|r| CacheRef::of(r) != Some(identity))
                        .collect(),
                )
            }
        }
        Value::Object(mut map) => {
            let rows = map
                .get("rows")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let count = map
                .get("count")
                .and_then(Value::as_i64)
                .unwrap_or(rows.len() as i64);
            if is_create {
                if rows.iter().any(|r| CacheRef::of(r) == Some(identity)) {
                    return Value::Object(map);
                }
                let mut next = vec![ctx.to_reference(identity)];
                next.extend(rows);
                map.insert("count".to_string(), Value::from(count + 1));
                map.insert("rows".to_string(), Value::Array(next));
                Value::Object(map)
            } else {
                let before = rows.len();
                let next: Vec<Value> = rows
                    .into_iter()
                    .filter(|r| CacheRef::of(r) != Some(identity))
                    .collect();
                if next.len() != before {
                    map.insert("count".to_string(), Value::from(count - 1));
                }
                map.insert("rows".to_string(), Value::Array(next));
                Value::Object(map)
            }
        }
        other => other,
    }
}
