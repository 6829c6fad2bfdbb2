use std::collections::{BTreeMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::errors::{FlowError, Result};

/// String-keyed items in enumeration (insertion) order with unique keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed<T> {
    entries: Vec<(String, T)>,
}

impl<T> Keyed<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from key/item pairs, rejecting repeated keys
    pub fn from_entries<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        let mut seen = HashSet::new();
        let mut keyed = Self::new();
        for (key, item) in entries {
            let key = key.into();
            if !seen.insert(key.clone()) {
                return Err(FlowError::validation_field("duplicate key in keyed collection", key));
            }
            keyed.entries.push((key, item));
        }
        Ok(keyed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<T>) {
        self.entries.into_iter().unzip()
    }

    /// Pair keys back with items. Callers guarantee the keys are unique.
    pub(crate) fn from_parts(keys: Vec<String>, items: Vec<T>) -> Self {
        Self {
            entries: keys.into_iter().zip(items).collect(),
        }
    }
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Keyed<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T> From<BTreeMap<String, T>> for Keyed<T> {
    fn from(map: BTreeMap<String, T>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for Keyed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
