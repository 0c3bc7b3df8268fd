//! Core data model for Normcache.
//!
//! This crate defines the fundamental, schema-agnostic types used throughout
//! the cache synchronization engine:
//! - Loose comparators for row identifiers and query-variable values
//! - List shapes (bare row arrays and paginated wrappers)
//! - Normalized references
//! - Subscription-event classification
//! - Key-args specifiers
//!
//! Everything operates on `serde_json::Value`: the engine never learns the
//! application's row schemas, it only preserves and rewrites shape.

mod compare;
mod event;
mod keyspec;
mod list;
mod reference;

pub use compare::{compare_ids, compare_values, id_string, is_truthy, row_id};
pub use event::{EventKind, SubscriptionEvent};
pub use keyspec::KeySpec;
pub use list::{ListValue, PageInfo, PaginatedList};
pub use reference::{CacheRef, REF_KEY};
