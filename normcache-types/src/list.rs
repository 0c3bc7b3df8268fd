//! Cached list shapes.
//!
//! A list field is cached either as a bare array of rows or as a paginated
//! `{rows, count, pageInfo}` wrapper. Which shape applies is dictated by the
//! query's declared return type, so the engine detects it from the raw value
//! at every call site instead of unifying the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Pagination cursor attached to a paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current: u64,
    pub total: u64,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self { current: 1, total: 1 }
    }
}

/// A paginated collection as returned by list queries.
///
/// `count` is the size of the logical collection, not `rows.len()` — `rows`
/// may hold a single page. Fields beyond the known three (server-specific
/// metadata) are preserved verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginatedList {
    #[serde(default)]
    pub rows: Vec<Value>,
    #[serde(default)]
    pub count: i64,
    #[serde(rename = "pageInfo", default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaginatedList {
    /// The safe default callers fall back to when a response carries no
    /// recognizable list field.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            count: 0,
            page_info: Some(PageInfo::default()),
            extra: Map::new(),
        }
    }

    /// Adopts a bare row array, with `count` set to its length.
    pub fn from_rows(rows: Vec<Value>) -> Self {
        Self {
            count: rows.len() as i64,
            rows,
            page_info: None,
            extra: Map::new(),
        }
    }
}

impl From<PaginatedList> for Value {
    fn from(list: PaginatedList) -> Self {
        let mut map = list.extra;
        map.insert("rows".to_string(), Value::Array(list.rows));
        map.insert("count".to_string(), Value::Number(Number::from(list.count)));
        if let Some(info) = list.page_info {
            let mut page_info = Map::new();
            page_info.insert("current".to_string(), Value::Number(Number::from(info.current)));
            page_info.insert("total".to_string(), Value::Number(Number::from(info.total)));
            map.insert("pageInfo".to_string(), Value::Object(page_info));
        }
        Value::Object(map)
    }
}

/// A cached list field in either of its two wire shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ListValue {
    /// A bare array of rows.
    Rows(Vec<Value>),
    /// A `{rows, count, pageInfo}` wrapper.
    Paginated(PaginatedList),
}

impl ListValue {
    /// Detects the shape of a cached field value.
    ///
    /// Arrays become [`ListValue::Rows`]; objects carrying a `rows` array
    /// become [`ListValue::Paginated`]. Anything else is not a list field.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(rows) => Some(Self::Rows(rows.clone())),
            Value::Object(map) if map.get("rows").is_some_and(Value::is_array) => {
                serde_json::from_value(value.clone()).ok().map(Self::Paginated)
            }
            _ => None,
        }
    }

    /// The rows of the list, regardless of shape.
    pub fn rows(&self) -> &[Value] {
        match self {
            Self::Rows(rows) => rows,
            Self::Paginated(list) => &list.rows,
        }
    }
}

impl From<ListValue> for Value {
    fn from(list: ListValue) -> Self {
        match list {
            ListValue::Rows(rows) => Value::Array(rows),
            ListValue::Paginated(paginated) => paginated.into(),
        }
    }
}
