//! Rebuild a target file's content on top of a reference file's layout
//!
//! The reference supplies line order, comments and blank lines; the target
//! store supplies values. For a key the target repeats, occurrence *i* in
//! the reference receives the target's occurrence *i* value.

use std::collections::HashMap;

use crate::line::{property_line, split_property};
use crate::store::OrderedStore;

/// Per-key read position over a store's occurrence history
///
/// Reading never mutates the store, so the same store can be reconciled any
/// number of times.
#[derive(Debug)]
pub struct HistoryCursor<'a> {
    store: &'a OrderedStore,
    positions: HashMap<&'a str, usize>,
}

impl<'a> HistoryCursor<'a> {
    pub fn new(store: &'a OrderedStore) -> Self {
        Self {
            store,
            positions: HashMap::new(),
        }
    }

    /// Value for the next occurrence of `key`, if the store knows the key.
    ///
    /// Duplicated keys yield their history in file order; once the history
    /// is exhausted, and for keys seen once, the latest value is returned.
    pub fn next_value(&mut self, key: &str) -> Option<&'a str> {
        let store = self.store;
        let (stored_key, latest) = store.get_key_value(key)?;
        match store.history(stored_key) {
            Some(history) => {
                let position = self.positions.entry(stored_key).or_insert(0);
                let value = history
                    .get(*position)
                    .map(String::as_str)
                    .unwrap_or(latest);
                *position += 1;
                Some(value)
            }
            None => Some(latest),
        }
    }

    /// Occurrences of `key` consumed so far
    pub fn consumed(&self, key: &str) -> usize {
        self.positions.get(key).copied().unwrap_or(0)
    }
}

/// Replay `reference_lines` in order, substituting values from `store`.
///
/// Property lines whose key the store knows become `key=<value>`; every
/// other line is copied verbatim.
pub fn rebuild<S: AsRef<str>>(reference_lines: &[S], store: &OrderedStore) -> Vec<String> {
    let mut cursor = HistoryCursor::new(store);
    reference_lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            split_property(line)
                .and_then(|(key, _)| cursor.next_value(key).map(|v| property_line(key, v)))
                .unwrap_or_else(|| line.to_string())
        })
        .collect()
}
