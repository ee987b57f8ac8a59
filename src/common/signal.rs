//! Signal maps resolved from the design metadata.
//!
//! The metadata tool lists each design port as a `key value` pair. For inputs
//! the key is the zero-based position of the port and the value its internal
//! signal name; for outputs both columns name the signal.

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mapping from a positional index or logical name to an internal signal name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignalMap {
    entries: BTreeMap<String, String>,
}

impl SignalMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the metadata tool listing.
    ///
    /// Each line must split into exactly two whitespace-separated fields;
    /// any other line is skipped. A repeated key keeps its last value.
    pub fn from_listing(listing: &str) -> Self {
        let mut map = Self::new();
        for line in listing.lines() {
            let mut fields = line.split_whitespace();
            if let (Some(key), Some(value), None) = (fields.next(), fields.next(), fields.next()) {
                map.insert(key, value);
            }
        }
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Looks up the signal bound to the zero-based position `index`.
    pub fn at_position(&self, index: usize) -> Option<&str> {
        self.get(&index.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the signal names bound to positions `0..len`, or `None` when a
    /// position is missing.
    pub fn positional_names(&self) -> Option<Vec<&str>> {
        (0..self.len()).map(|i| self.at_position(i)).collect()
    }

    /// Iterates `(key, signal)` pairs in index order.
    ///
    /// Keys that parse as integers sort numerically and before any other key;
    /// the rest sort lexicographically.
    pub fn iter_ordered(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort_by(|a, b| compare_keys(a.0, b.0));
        pairs.into_iter()
    }
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignalMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
