//! Response unwrapping.

use crate::naming::{response_key_candidates, ListKeyOptions};
use normcache_types::{is_truthy, ListValue, PaginatedList};
use serde_json::Value;
use tracing::debug;

/// Extracts the paginated-list payload from a raw query response,
/// tolerating every naming convention the API has gone through.
///
/// No match — or no response at all — degrades to the empty default list,
/// so callers never null-check.
#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    data_type: String,
    options: ListKeyOptions,
}

impl ResponseExtractor {
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

    /// Unwraps a raw response, probing candidate field names in priority
    /// order; the first present-and-truthy field wins.
    pub fn extract(&self, response: Option<&Value>) -> PaginatedList {
        let Some(data) = response else {
            return PaginatedList::empty();
        };
        for candidate in response_key_candidates(&self.data_type, &self.options) {
            let Some(value) = data.get(&candidate).filter(|v| is_truthy(v)) else {
                continue;
            };
            debug!(data_type = %self.data_type, field = %candidate, "response list field matched");
            return match ListValue::from_value(value) {
                Some(ListValue::Paginated(list)) => list,
                Some(ListValue::Rows(rows)) => PaginatedList::from_rows(rows),
                None => PaginatedList::empty(),
            };
        }
        PaginatedList::empty()
    }
}
