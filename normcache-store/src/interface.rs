//! Interfaces between the sync engine and a normalized store.
//!
//! These traits are the seam: the engine's policies and patchers are written
//! against them, and the store invokes policies through them during its own
//! write path. Implementations must be pure — no I/O, no blocking — because
//! the store calls them synchronously while merging.

use normcache_types::{CacheRef, KeySpec};
use serde_json::Value;

/// Resolves field values, following normalized references where needed.
pub trait FieldReader {
    /// Reads `field` from `value`. When `value` is a `{__ref}` reference,
    /// the read follows it to the canonical entity; plain objects are read
    /// directly. `None` for unknown fields or dangling references.
    fn read_field(&self, field: &str, value: &Value) -> Option<Value>;
}

/// Context handed to a list-field merge function.
pub struct MergeContext<'a> {
    /// The field arguments of the incoming query.
    pub args: &'a Value,
    /// The operation variables of the incoming query.
    pub variables: &'a Value,
    /// Field access into the normalized graph.
    pub reader: &'a dyn FieldReader,
}

/// A cache-field policy for a list-typed field: which arguments key the
/// cache entry, and how an incoming result folds into the existing one.
pub trait ListFieldPolicy {
    /// Derives the key-args specifier for one set of field arguments.
    fn key_args(&self, args: &Value) -> Vec<KeySpec>;

    /// Merges an incoming field value into the existing cached value.
    fn merge(&self, existing: Option<&Value>, incoming: &Value, ctx: &MergeContext<'_>) -> Value;
}

/// Context handed to a field patch closure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifyContext;

impl ModifyContext {
    /// Builds a reference value for a normalized identity.
    pub fn to_reference(&self, identity: &str) -> Value {
        CacheRef::new(identity).to_value()
    }
}

/// The patch surface a store exposes to the post-mutation patcher.
pub trait CacheStore {
    /// Derives the canonical identity of a value: a `{__ref}` passes its
    /// identity through, a `{__typename, id}` object is keyed from its type
    /// and id. `None` when no identity can be derived.
    fn identify(&self, value: &Value) -> Option<String>;

    /// Applies `patch` to every cached entry of `field`. The closure
    /// receives the current field value and returns its replacement.
    fn modify_field(&mut self, field: &str, patch: &mut dyn FnMut(Value, &ModifyContext) -> Value);
}
