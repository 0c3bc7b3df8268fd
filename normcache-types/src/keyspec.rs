//! Key-args specifiers.
//!
//! A key-args specifier names the subset of a field's query arguments that
//! participates in its cache key; arguments left out of the specifier do not
//! multiply cache entries. Specifiers nest: an object-valued argument
//! contributes its own nested specifier.

use serde::{Deserialize, Serialize};

/// One component of a key-args specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    /// A literal argument name.
    Field(String),
    /// The specifier of a nested object- or array-valued argument.
    Nested(Vec<KeySpec>),
}

impl KeySpec {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Renders a specifier list into the deterministic string a store uses
    /// as part of a field's cache key.
    pub fn render(specs: &[KeySpec]) -> String {
        let parts: Vec<String> = specs
            .iter()
            .map(|spec| match spec {
                KeySpec::Field(name) => name.clone(),
                KeySpec::Nested(inner) => format!("({})", KeySpec::render(inner)),
            })
            .collect();
        parts.join(",")
    }
}
