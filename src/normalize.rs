//! Key ordering for digest input.
//!
//! Normalization is shallow: only the top-level keys of a mapping are
//! reordered. Nested values keep whatever order they already have.

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// Three-way comparison of two keys. Ordinal (byte-wise), not locale aware.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Return a copy of `map` with its keys in ascending [`compare`] order.
#[must_use]
pub fn normalize(map: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare(a, b));
    entries.into_iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
