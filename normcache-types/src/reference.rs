//! Normalized-store references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which a normalized reference carries its identity.
pub const REF_KEY: &str = "__ref";

/// A reference to a normalized object's canonical identity.
///
/// Two references are equal iff their identity strings are equal; identity
/// of the wrapping value never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheRef {
    #[serde(rename = "__ref")]
    pub id: String,
}

impl CacheRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The reference identity carried by a value, if it is a reference.
    pub fn of(value: &Value) -> Option<&str> {
        value.get(REF_KEY).and_then(Value::as_str)
    }

    /// The wire shape of the reference: `{"__ref": "<identity>"}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(REF_KEY.to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }
}
