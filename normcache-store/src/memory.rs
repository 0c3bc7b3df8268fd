//! Minimal in-memory normalized store.
//!
//! Entities are stored once, keyed `Type:id`; list fields hold references
//! into that table. Each list field keeps one entry per distinct rendered
//! key-args value and folds incoming query results through its registered
//! merge policy. The store is synchronous and single-threaded; every write
//! completes before control returns to the caller.

use crate::error::{StoreError, StoreResult};
use crate::interface::{CacheStore, FieldReader, ListFieldPolicy, MergeContext, ModifyContext};
use normcache_types::{id_string, CacheRef, KeySpec, REF_KEY};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

const TYPENAME_KEY: &str = "__typename";

/// In-memory normalized cache.
#[derive(Default)]
pub struct MemoryCache {
    /// Canonical entities, keyed `Type:id`.
    entities: HashMap<String, Map<String, Value>>,
    /// Cached list-field entries: field name → rendered key-args → value.
    fields: HashMap<String, HashMap<String, Value>>,
    /// Merge policies, per field name.
    policies: HashMap<String, Box<dyn ListFieldPolicy>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the merge policy for a list field.
    pub fn register_policy(&mut self, field: impl Into<String>, policy: Box<dyn ListFieldPolicy>) {
        self.policies.insert(field.into(), policy);
    }

    /// Folds an incoming list-field result into the cache through the
    /// field's registered policy. Rows carrying `__typename` and `id` are
    /// normalized into the entity table and replaced by references; a field
    /// without a policy stores the normalized value as-is.
    pub fn write_list(&mut self, field: &str, args: &Value, variables: &Value, incoming: &Value) {
        let normalized = self.normalize(incoming);
        let key = self.entry_key(field, args);
        let existing = self.fields.get(field).and_then(|m| m.get(&key)).cloned();
        let merged = match self.policies.get(field) {
            Some(policy) => {
                let ctx = MergeContext {
                    args,
                    variables,
                    reader: &*self,
                };
                policy.merge(existing.as_ref(), &normalized, &ctx)
            }
            None => normalized,
        };
        debug!(field, key = %key, "list field written");
        self.fields
            .entry(field.to_string())
            .or_default()
            .insert(key, merged);
    }

    /// Reads the cached entry of `field` for one set of arguments.
    pub fn read_list(&self, field: &str, args: &Value) -> Option<Value> {
        let key = self.entry_key(field, args);
        self.fields.get(field).and_then(|m| m.get(&key)).cloned()
    }

    /// The canonical entity stored under an identity, if any.
    pub fn entity(&self, identity: &str) -> Option<&Map<String, Value>> {
        self.entities.get(identity)
    }

    /// Serializes the entire cache — entities and field entries — into one
    /// JSON value, e.g. for handing a warm cache across process boundaries.
    pub fn extract(&self) -> Value {
        let entities: Map<String, Value> = self
            .entities
            .iter()
            .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
            .collect();
        let fields: Map<String, Value> = self
            .fields
            .iter()
            .map(|(field, entries)| {
                let entries: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                (field.clone(), Value::Object(entries))
            })
            .collect();
        let mut snapshot = Map::new();
        snapshot.insert("entities".to_string(), Value::Object(entities));
        snapshot.insert("fields".to_string(), Value::Object(fields));
        Value::Object(snapshot)
    }

    /// Restores a cache previously serialized with [`MemoryCache::extract`].
    /// Policies are not part of the snapshot and must be re-registered.
    pub fn restore(snapshot: &Value) -> StoreResult<Self> {
        let map = snapshot
            .as_object()
            .ok_or_else(|| StoreError::MalformedSnapshot("expected a top-level object".into()))?;
        let entities: HashMap<String, Map<String, Value>> = match map.get("entities") {
            Some(section) => serde_json::from_value(section.clone())?,
            None => HashMap::new(),
        };
        let fields: HashMap<String, HashMap<String, Value>> = match map.get("fields") {
            Some(section) => serde_json::from_value(section.clone())?,
            None => HashMap::new(),
        };
        Ok(Self {
            entities,
            fields,
            policies: HashMap::new(),
        })
    }

    fn entry_key(&self, field: &str, args: &Value) -> String {
        self.policies
            .get(field)
            .map(|p| KeySpec::render(&p.key_args(args)))
            .unwrap_or_default()
    }

    /// Replaces identifiable objects with references, storing their fields
    /// in the entity table. Non-identifiable containers are walked so that
    /// rows nested under paginated wrappers normalize too.
    fn normalize(&mut self, value: &Value) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.normalize(item)).collect())
            }
            Value::Object(map) => {
                if map.contains_key(REF_KEY) {
                    return value.clone();
                }
                if let Some(identity) = identify_object(map) {
                    self.upsert_entity(&identity, map);
                    return CacheRef::new(identity).to_value();
                }
                let fields = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.normalize(v)))
                    .collect();
                Value::Object(fields)
            }
            other => other.clone(),
        }
    }

    /// Shallow field merge into the canonical entity: newer fields replace
    /// older ones, fields absent from the incoming object survive.
    fn upsert_entity(&mut self, identity: &str, incoming: &Map<String, Value>) {
        let normalized: Vec<(String, Value)> = incoming
            .iter()
            .map(|(k, v)| (k.clone(), self.normalize(v)))
            .collect();
        let entity = self.entities.entry(identity.to_string()).or_default();
        for (field, value) in normalized {
            entity.insert(field, value);
        }
    }
}

/// Derives `Type:id` from a `{__typename, id}` object.
fn identify_object(map: &Map<String, Value>) -> Option<String> {
    let typename = map.get(TYPENAME_KEY).and_then(Value::as_str)?;
    let id = id_string(map.get("id")?)?;
    Some(format!("{typename}:{id}"))
}

impl FieldReader for MemoryCache {
    fn read_field(&self, field: &str, value: &Value) -> Option<Value> {
        if let Some(identity) = CacheRef::of(value) {
            return self.entities.get(identity).and_then(|e| e.get(field)).cloned();
        }
        value.get(field).cloned()
    }
}

impl CacheStore for MemoryCache {
    fn identify(&self, value: &Value) -> Option<String> {
        if let Some(identity) = CacheRef::of(value) {
            return Some(identity.to_string());
        }
        value.as_object().and_then(identify_object)
    }

    fn modify_field(&mut self, field: &str, patch: &mut dyn FnMut(Value, &ModifyContext) -> Value) {
        let Some(entries) = self.fields.get_mut(field) else {
            return;
        };
        let ctx = ModifyContext;
        for value in entries.values_mut() {
            let current = std::mem::take(value);
            *value = patch(current, &ctx);
        }
        debug!(field, "list field patched");
    }
}
