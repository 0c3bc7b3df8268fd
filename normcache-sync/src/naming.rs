//! List-field naming conventions.
//!
//! The cache and the GraphQL API spell the same logical list several ways —
//! `nodeStatuses`, `getNodeStatuses`, `getNodeStatusList`, versioned
//! `getNodeStatusesV2`. All derivations funnel through here so the rest of
//! the engine can probe the historical spellings in one fixed order.

use heck::ToLowerCamelCase;

/// Options controlling how a list-field name is derived from an entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListKeyOptions {
    /// Version tag appended after pluralization (e.g. `"V2"`).
    pub suffix: Option<String>,
    /// Prepend `get` and keep the PascalCase type name.
    pub with_get_prefix: bool,
}

impl ListKeyOptions {
    /// Options with a `get` prefix.
    pub fn get_prefixed() -> Self {
        Self {
            with_get_prefix: true,
            ..Self::default()
        }
    }
}

/// Derives the cache field name for an entity type's list query.
///
/// Pluralization is deliberately naive — trailing `s` becomes `se`, then
/// trailing `y` becomes `ie`, then `s` is appended — because the result must
/// string-match the field names of an existing API, irregular plurals and
/// all. `NodeStatus` → `nodeStatuses`, `Company` → `companies`.
pub fn list_key_for_type(data_type: &str, options: &ListKeyOptions) -> String {
    let suffix = options.suffix.as_deref().unwrap_or("");
    if options.with_get_prefix {
        format!("get{}s{}", plural_stem(data_type), suffix)
    } else {
        format!("{}s{}", plural_stem(&data_type.to_lower_camel_case()), suffix)
    }
}

fn plural_stem(name: &str) -> String {
    let stem = match name.strip_suffix('s') {
        Some(base) => format!("{base}se"),
        None => name.to_string(),
    };
    match stem.strip_suffix('y') {
        Some(base) => format!("{base}ie"),
        None => stem,
    }
}

/// The camelCase prefix subscription event fields carry for a type
/// (`NodeStatus` → `nodeStatus`, as in `nodeStatusCreated`).
pub fn event_prefix(data_type: &str) -> String {
    data_type.to_lower_camel_case()
}

/// Response field candidates for a type, in probe priority order: the
/// versioned key first, then the derived key, then the `get…List` spelling,
/// then the naive camelCase plural.
pub fn response_key_candidates(data_type: &str, options: &ListKeyOptions) -> [String; 4] {
    let versioned = ListKeyOptions {
        suffix: Some("V2".to_string()),
        with_get_prefix: options.with_get_prefix,
    };
    [
        list_key_for_type(data_type, &versioned),
        list_key_for_type(data_type, options),
        format!("get{data_type}List"),
        format!("{}s", data_type.to_lower_camel_case()),
    ]
}

/// The mutation-result field carrying created rows (`create{Type}`).
pub fn create_key(data_type: &str) -> String {
    format!("create{data_type}")
}

/// The mutation-result field carrying removed rows (`remove{Type}`).
pub fn remove_key(data_type: &str) -> String {
    format!("remove{data_type}")
}
