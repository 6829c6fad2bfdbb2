//! Input and output containers for flow operations
//!
//! A [`Collection`] is either a dense sequence or a [`Keyed`] mapping. The
//! variant is the only thing operations look at to decide the shape of their
//! result.

pub mod aggregate;
pub mod keyed;
pub mod sink;

pub use aggregate::Aggregate;
pub use keyed::Keyed;
pub use sink::ResultSink;

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use crate::core::errors::{FlowError, Result};

/// Sequence or string-keyed mapping of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection<T> {
    Sequence(Vec<T>),
    Keyed(Keyed<T>),
}

/// Shape of a collection with its items taken out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Sequence(usize),
    Keyed(Vec<String>),
}

impl Shape {
    pub fn len(&self) -> usize {
        match self {
            Shape::Sequence(len) => *len,
            Shape::Keyed(keys) => keys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Sequence(_) => "sequence",
            Shape::Keyed(_) => "keyed",
        }
    }
}

impl<T> Collection<T> {
    /// Build a keyed collection, rejecting repeated keys
    pub fn keyed<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        Keyed::from_entries(entries).map(Collection::Keyed)
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Sequence(items) => items.len(),
            Collection::Keyed(keyed) => keyed.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, Collection::Keyed(_))
    }

    pub fn as_sequence(&self) -> Option<&[T]> {
        match self {
            Collection::Sequence(items) => Some(items),
            Collection::Keyed(_) => None,
        }
    }

    pub fn as_keyed(&self) -> Option<&Keyed<T>> {
        match self {
            Collection::Sequence(_) => None,
            Collection::Keyed(keyed) => Some(keyed),
        }
    }

    /// Split into the shape and the items in enumeration order
    pub fn into_parts(self) -> (Shape, Vec<T>) {
        match self {
            Collection::Sequence(items) => (Shape::Sequence(items.len()), items),
            Collection::Keyed(keyed) => {
                let (keys, items) = keyed.into_parts();
                (Shape::Keyed(keys), items)
            }
        }
    }

    /// Transform every item, keeping keys and positions
    pub fn map<U, F>(self, mut f: F) -> Collection<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Collection::Sequence(items) => Collection::Sequence(items.into_iter().map(f).collect()),
            Collection::Keyed(keyed) => {
                let (keys, items) = keyed.into_parts();
                let items = items.into_iter().map(&mut f).collect();
                Collection::Keyed(Keyed::from_parts(keys, items))
            }
        }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Collection::Sequence(items)
    }
}

impl<T> From<Keyed<T>> for Collection<T> {
    fn from(keyed: Keyed<T>) -> Self {
        Collection::Keyed(keyed)
    }
}

impl<T> From<BTreeMap<String, T>> for Collection<T> {
    fn from(map: BTreeMap<String, T>) -> Self {
        Collection::Keyed(Keyed::from(map))
    }
}

impl TryFrom<Value> for Collection<Value> {
    type Error = FlowError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Collection::Sequence(items)),
            Value::Object(map) => Keyed::from_entries(map).map(Collection::Keyed),
            other => Err(FlowError::validation(format!(
                "expected a JSON array or object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Collection::Sequence(items) => items.serialize(serializer),
            Collection::Keyed(keyed) => keyed.serialize(serializer),
        }
    }
}
