//! Cache synchronization engine for Normcache.
//!
//! Keeps a normalized cache consistent with the server without refetching:
//! paginated query results merge into cached lists, real-time subscription
//! events add and remove rows, and mutation results patch list fields in
//! place.
//!
//! # Architecture
//!
//! - **Naming**: derives every historical spelling of a type's list field
//! - **Response**: unwraps a query response into a paginated list
//! - **Reducer**: folds subscription events into cached query snapshots
//! - **Policy**: per-field key-args and merge functions installed on the store
//! - **Patcher**: rewrites list fields after create/remove mutations
//! - **Registry**: tracks a consumer's active subscriptions
//!
//! Everything here is pure, synchronous data transformation: events and
//! responses arrive with their data already in hand, snapshots are treated
//! as immutable values, and no function performs I/O or blocks. The engine
//! originates no fatal errors — malformed input degrades to safe defaults.
//!
//! # Example
//!
//! ```
//! use normcache_sync::{EventReducer, ResponseExtractor, Snapshot};
//! use serde_json::json;
//!
//! let extractor = ResponseExtractor::new("Task");
//! let list = extractor.extract(Some(&json!({
//!     "getTasks": {"rows": [{"id": 1}], "count": 1},
//! })));
//! assert_eq!(list.count, 1);
//!
//! let mut prev = Snapshot::new();
//! prev.insert("getTasks".to_string(), list.into());
//!
//! let reducer = EventReducer::new("Task");
//! let next = reducer.apply(&prev, &json!({"taskCreated": {"id": 2}}));
//! assert_eq!(next["getTasks"]["count"], json!(2));
//! ```

mod naming;
mod patcher;
mod policy;
mod reducer;
mod registry;
mod response;

pub use naming::{
    create_key, event_prefix, list_key_for_type, remove_key, response_key_candidates,
    ListKeyOptions,
};
pub use patcher::MutationPatcher;
pub use policy::{key_args_for, InfiniteListPolicy, ListPolicy, PaginatedListPolicy};
pub use reducer::{EventReducer, Snapshot};
pub use registry::{SubscriptionRegistry, Unsubscribe};
pub use response::ResponseExtractor;
