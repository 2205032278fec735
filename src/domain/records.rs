// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flat key mapping shared by every record parser.
//!
//! Parsers flatten their source into `Records`: an insertion-ordered map from
//! a delimiter-joined key to one or more raw string values. Inserting a key
//! that is already present coalesces the values into an ordered list instead
//! of overwriting.

use indexmap::IndexMap;

/// One or more raw values recorded under a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordValue {
    /// A key seen once.
    Single(String),
    /// A key seen more than once, in insertion order.
    Multi(Vec<String>),
}

impl RecordValue {
    /// Returns the first recorded value.
    pub fn first(&self) -> &str {
        match self {
            RecordValue::Single(v) => v,
            RecordValue::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Returns all recorded values in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            RecordValue::Single(v) => vec![v.as_str()],
            RecordValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Returns true if the key was seen more than once.
    pub fn is_multi(&self) -> bool {
        matches!(self, RecordValue::Multi(_))
    }

    fn push(&mut self, value: String) {
        match self {
            RecordValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = RecordValue::Multi(vec![first, value]);
            }
            RecordValue::Multi(values) => values.push(value),
        }
    }
}

/// An ordered mapping from flat keys to raw values.
///
/// # Examples
///
/// ```
/// use nametree::domain::records::{RecordValue, Records};
///
/// let mut records = Records::new();
/// records.insert("hosts", "a");
/// records.insert("port", "80");
/// records.insert("hosts", "b");
///
/// assert_eq!(
///     records.get("hosts"),
///     Some(&RecordValue::Multi(vec!["a".to_string(), "b".to_string()]))
/// );
/// assert_eq!(records.keys().collect::<Vec<_>>(), vec!["hosts", "port"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Records {
    entries: IndexMap<String, RecordValue>,
}

impl Records {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value, coalescing with any value already under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            indexmap::map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(RecordValue::Single(value));
            }
        }
    }

    /// Returns the value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.entries.get(key)
    }

    /// Returns true if `key` was recorded.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends every entry of `other`, coalescing repeated keys.
    pub fn extend(&mut self, other: Records) {
        for (key, value) in other.entries {
            match value {
                RecordValue::Single(v) => self.insert(key, v),
                RecordValue::Multi(values) => {
                    for v in values {
                        self.insert(key.clone(), v);
                    }
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Records {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut records = Records::new();
        for (k, v) in iter {
            records.insert(k, v);
        }
        records
    }
}
