//! Normalization of list endpoint payloads.
//!
//! The backend answers list requests with several envelope conventions
//! depending on the endpoint version. Every payload is classified into one
//! [`Shape`] and turned into a [`ListEnvelope`]; unrecognized payloads become
//! an empty envelope rather than an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform paginated list: `{count, next, previous, results}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> ListEnvelope<T> {
    /// Wraps an unpaginated list.
    pub fn from_items(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            next: None,
            previous: None,
            results,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<ListEnvelope<U>, E> {
        Ok(ListEnvelope {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Recognized payload conventions, in matching order.
#[derive(Debug)]
enum Shape {
    /// `[...]`
    Bare(Vec<Value>),
    /// `{results: [...], count?, next?, previous?}`
    Paged(Map<String, Value>),
    /// `{data: [...]}`
    DataArray(Vec<Value>),
    /// `{data: {results: [...], ...}}`
    NestedPaged(Map<String, Value>),
    Unknown,
}

fn has_results_array(map: &Map<String, Value>) -> bool {
    map.get("results").is_some_and(Value::is_array)
}

fn classify(value: Value) -> Shape {
    match value {
        Value::Array(items) => Shape::Bare(items),
        Value::Object(mut map) => {
            if has_results_array(&map) {
                return Shape::Paged(map);
            }
            match map.remove("data") {
                Some(Value::Array(items)) => Shape::DataArray(items),
                Some(Value::Object(inner)) if has_results_array(&inner) => Shape::NestedPaged(inner),
                _ => Shape::Unknown,
            }
        }
        _ => Shape::Unknown,
    }
}

fn link(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn from_paged(mut map: Map<String, Value>) -> ListEnvelope<Value> {
    let results = match map.remove("results") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let count = map
        .get("count")
        .and_then(Value::as_u64)
        .and_then(|c| usize::try_from(c).ok())
        .unwrap_or(results.len());

    ListEnvelope {
        count,
        next: link(&map, "next"),
        previous: link(&map, "previous"),
        results,
    }
}

/// Turns any JSON payload into a [`ListEnvelope`]. Never fails.
pub fn normalize(value: Value) -> ListEnvelope<Value> {
    match classify(value) {
        Shape::Bare(items) | Shape::DataArray(items) => ListEnvelope::from_items(items),
        Shape::Paged(map) | Shape::NestedPaged(map) => from_paged(map),
        Shape::Unknown => ListEnvelope::default(),
    }
}

/// Normalizes then deserializes every result into `T`.
pub fn normalize_as<T: DeserializeOwned>(value: Value) -> serde_json::Result<ListEnvelope<T>> {
    normalize(value).try_map(serde_json::from_value)
}
