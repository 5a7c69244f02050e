//! Ordered key/value store parsed from a properties file
//!
//! Keeps the file's full line list, an insertion-ordered map of each key to
//! its latest value, and for keys that occur more than once the value of
//! every occurrence in file order.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::codec;
use crate::line::{is_property, split_property};

/// Parsed properties file
///
/// Built once from decoded lines and then only read, except for map upserts
/// issued by the editor on a [`Document`](crate::document::Document).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedStore {
    /// Every parsed line, in file order
    lines: Vec<String>,
    /// Key -> latest value, in first-seen order
    properties: IndexMap<String, String>,
    /// Key -> value of every occurrence, earliest first (duplicated keys only)
    history: HashMap<String, Vec<String>>,
}

impl OrderedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse already decoded and unescaped lines.
    ///
    /// Property lines without a resolvable key are skipped; parsing never
    /// fails.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for line in lines {
            store.push_line(line.into());
        }
        tracing::trace!(
            line_count = store.lines.len(),
            key_count = store.properties.len(),
            duplicated = store.history.len(),
            "parsed properties"
        );
        store
    }

    /// Parse raw file bytes (Latin-1 decode, then unescape each line)
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(codec::decode_lines(bytes))
    }

    /// Parse text whose lines are already unescaped
    pub fn from_text(text: &str) -> Self {
        Self::parse(text.lines())
    }

    fn push_line(&mut self, line: String) {
        match split_property(&line) {
            Some((key, value)) => self.record(key.to_string(), value),
            None if is_property(&line) => {
                tracing::debug!(line = %line, "skipping property line without a key");
            }
            None => {}
        }
        self.lines.push(line);
    }

    fn record(&mut self, key: String, value: String) {
        match self.properties.get_mut(&key) {
            Some(current) => {
                tracing::debug!(key = %key, "duplicate key");
                let history = self
                    .history
                    .entry(key)
                    .or_insert_with(|| vec![current.clone()]);
                history.push(value.clone());
                *current = value;
            }
            None => {
                self.properties.insert(key, value);
            }
        }
    }

    /// Insert or replace a key's current value, keeping its map position
    pub(crate) fn upsert(&mut self, key: &str, value: &str) {
        match self.properties.get_mut(key) {
            Some(current) => *current = value.to_string(),
            None => {
                self.properties.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Latest value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Stored key and latest value for `key`
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &str)> {
        self.properties
            .get_key_value(key)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.properties.values().any(|v| v == value)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Keys and latest values, in first-seen order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every occurrence value of a duplicated key, earliest first.
    ///
    /// `None` for keys seen at most once.
    pub fn history(&self, key: &str) -> Option<&[String]> {
        self.history.get(key).map(Vec::as_slice)
    }

    /// Number of times `key` occurred in the parsed file
    pub fn occurrences(&self, key: &str) -> usize {
        match self.history.get(key) {
            Some(values) => values.len(),
            None => usize::from(self.properties.contains_key(key)),
        }
    }

    /// Duplicated keys with their occurrence counts, in first-seen order
    pub fn duplicated_keys(&self) -> Vec<(&str, usize)> {
        self.properties
            .keys()
            .filter_map(|k| self.history.get(k).map(|h| (k.as_str(), h.len())))
            .collect()
    }

    /// Keys whose latest value equals `value`
    pub fn keys_by_value(&self, value: &str) -> Vec<&str> {
        self.properties()
            .filter(|(_, v)| *v == value)
            .map(|(k, _)| k)
            .collect()
    }

    /// Parsed lines in file order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The parsed content as read, one line per `\n`, used for backups
    pub fn old_content(&self) -> String {
        self.lines.iter().fold(String::new(), |mut acc, line| {
            acc.push_str(line);
            acc.push('\n');
            acc
        })
    }
}
