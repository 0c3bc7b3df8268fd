//! Field merge policies.
//!
//! Installed on a normalized store's list fields. Key-args keep one cached
//! entry per argument *shape* — argument values do not multiply entries, the
//! merge reconciles them — and the merge concatenates pages with
//! reference-identity dedup and optional sort-directive ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use normcache_store::{ListFieldPolicy, MergeContext};
use normcache_types::{CacheRef, KeySpec};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Derives the key-args specifier from a field's argument value.
///
/// String entries of argument arrays participate literally; object- and
/// array-valued arguments contribute their nested specifier when it is
/// non-empty. Object walks include every key name, so two queries with the
/// same argument shape share one cache entry regardless of filter values.
pub fn key_args_for(args: &Value) -> Vec<KeySpec> {
    match args {
        Value::Array(items) => {
            let mut specs = Vec::new();
            for item in items {
                match item {
                    Value::String(name) => specs.push(KeySpec::field(name.clone())),
                    _ => {
                        let nested = key_args_for(item);
                        if !nested.is_empty() {
                            specs.push(KeySpec::Nested(nested));
                        }
                    }
                }
            }
            specs
        }
        Value::Object(map) => {
            let mut specs = Vec::new();
            for (key, value) in map {
                specs.push(KeySpec::field(key.clone()));
                if value.is_object() || value.is_array() {
                    let nested = key_args_for(value);
                    if !nested.is_empty() {
                        specs.push(KeySpec::Nested(nested));
                    }
                }
            }
            specs
        }
        _ => Vec::new(),
    }
}

// ── sort directives ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
struct SortDirective {
    field: String,
    direction: SortDirection,
}

/// `sort: {field, direction}` from the field arguments, falling back to the
/// operation variables. Both parts must be non-empty strings; the direction
/// is case-insensitive and anything other than `desc` sorts ascending.
fn sort_directive(ctx: &MergeContext<'_>) -> Option<SortDirective> {
    let sort = ctx
        .args
        .get("sort")
        .filter(|v| !v.is_null())
        .or_else(|| ctx.variables.get("sort").filter(|v| !v.is_null()))?;
    let field = sort
        .get("field")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let direction = sort
        .get("direction")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let direction = if direction.eq_ignore_ascii_case("desc") {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    Some(SortDirective {
        field: field.to_string(),
        direction,
    })
}

/// Sort key for one row. Date-parseable strings order by their epoch
/// seconds; other values order within their type, types in a fixed rank.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Missing,
    Bool(bool),
    Number(f64),
    Time(i64),
    Text(String),
    Other,
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Time(_) => 3,
            Self::Text(_) => 4,
            Self::Other => 5,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn sort_key(ctx: &MergeContext<'_>, field: &str, row: &Value) -> SortKey {
    match ctx.reader.read_field(field, row) {
        None | Some(Value::Null) => SortKey::Missing,
        Some(Value::Bool(b)) => SortKey::Bool(b),
        Some(Value::Number(n)) => SortKey::Number(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => match parse_datetime(&s) {
            Some(epoch) => SortKey::Time(epoch),
            None => SortKey::Text(s),
        },
        Some(_) => SortKey::Other,
    }
}

/// Epoch seconds of a date-formatted string, if it is one.
fn parse_datetime(s: &str) -> Option<i64> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.timestamp());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc().timestamp());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    None
}

// ── row merging ──────────────────────────────────────────────────

/// Order-preserving dedup by reference identity; the first occurrence wins.
/// Rows without a reference have no identity to collide on and are kept.
fn dedup_by_ref(rows: Vec<Value>) -> Vec<Value> {
    let mut seen: HashSet<String> = HashSet::new();
    rows.into_iter()
        .filter(|row| match CacheRef::of(row) {
            Some(identity) => seen.insert(identity.to_string()),
            None => true,
        })
        .collect()
}

/// Concatenates existing and incoming rows, dedups by reference, and — when
/// the query carries a sort directive — re-orders by the sorted field read
/// through the store. Without a directive, arrival order is preserved.
fn merge_rows(existing: &[Value], incoming: &[Value], ctx: &MergeContext<'_>) -> Vec<Value> {
    let rows = dedup_by_ref(existing.iter().chain(incoming).cloned().collect());
    let Some(directive) = sort_directive(ctx) else {
        return rows;
    };
    debug!(field = %directive.field, direction = ?directive.direction, "sorting merged rows");
    let mut keyed: Vec<(SortKey, Value)> = rows
        .into_iter()
        .map(|row| (sort_key(ctx, &directive.field, &row), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b);
        match directive.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

fn wrapped_rows(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Object(map)) => map
            .get("rows")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

fn bare_rows(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(rows)) => rows.as_slice(),
        _ => &[],
    }
}

// ── policies ─────────────────────────────────────────────────────

/// Policy for `{rows, count, pageInfo}` paginated list fields.
///
/// `rows` accumulates across responses; every other field — count, pageInfo,
/// server metadata — is replaced by the newest response.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginatedListPolicy;

impl ListFieldPolicy for PaginatedListPolicy {
    fn key_args(&self, args: &Value) -> Vec<KeySpec> {
        key_args_for(args)
    }

    fn merge(&self, existing: Option<&Value>, incoming: &Value, ctx: &MergeContext<'_>) -> Value {
        let rows = merge_rows(wrapped_rows(existing), wrapped_rows(Some(incoming)), ctx);
        let mut merged = Map::new();
        if let Some(Value::Object(map)) = existing {
            merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Value::Object(map) = incoming {
            merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged.insert("rows".to_string(), Value::Array(rows));
        Value::Object(merged)
    }
}

/// Paginated policy whose cache key ignores the `pagination` argument, so
/// successive pages of an infinite list fold into one cached entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteListPolicy;

impl ListFieldPolicy for InfiniteListPolicy {
    fn key_args(&self, args: &Value) -> Vec<KeySpec> {
        match args {
            Value::Object(map) => {
                let filtered: Map<String, Value> = map
                    .iter()
                    .filter(|(key, _)| key.as_str() != "pagination")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                key_args_for(&Value::Object(filtered))
            }
            _ => key_args_for(args),
        }
    }

    fn merge(&self, existing: Option<&Value>, incoming: &Value, ctx: &MergeContext<'_>) -> Value {
        PaginatedListPolicy.merge(existing, incoming, ctx)
    }
}

/// Policy for bare `Row[]` list fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPolicy;

impl ListFieldPolicy for ListPolicy {
    fn key_args(&self, args: &Value) -> Vec<KeySpec> {
        key_args_for(args)
    }

    fn merge(&self, existing: Option<&Value>, incoming: &Value, ctx: &MergeContext<'_>) -> Value {
        let rows = merge_rows(bare_rows(existing), bare_rows(Some(incoming)), ctx);
        debug!(total = rows.len(), "merged list field");
        Value::Array(rows)
    }
}
