//! Read-only diffing queries on a [`Document`].

use crate::difference::DifferenceRecord;
use crate::document::Document;
use crate::line::{is_property, line_key, line_value, split_property};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Document {
    /// Keys whose target value is empty.
    ///
    /// Each record's anchor is the key before it in the target's map order.
    pub fn empty_keys(&self) -> Vec<DifferenceRecord> {
        let mut result = Vec::new();
        let mut preceding = "";
        for (key, value) in self.target.properties() {
            if value.is_empty() {
                result.push(DifferenceRecord::new(
                    key,
                    self.reference_value(key),
                    "",
                    preceding,
                ));
            }
            preceding = key;
        }
        result
    }

    /// Reference keys the target has no value for, in reference order.
    ///
    /// Each record's anchor is the key of the content line just before it,
    /// comment lines included, so inserting at that anchor restores the
    /// reference layout.
    pub fn keys_to_translate(&self) -> Vec<DifferenceRecord> {
        let mut result = Vec::new();
        let mut preceding = "";
        for line in &self.content {
            let key = line_key(line);
            if is_property(line) && !self.target.contains_key(key) {
                result.push(DifferenceRecord::new(
                    key,
                    Some(line_value(line)),
                    "",
                    preceding,
                ));
            }
            preceding = key;
        }
        result
    }

    /// Keys whose target value is empty, with their reference values
    pub fn bad_keys(&self) -> Vec<DifferenceRecord> {
        let mut result = Vec::new();
        let mut preceding = "";
        for (key, value) in self.target.properties() {
            if self.is_bad_key(key) {
                result.push(DifferenceRecord::new(
                    key,
                    self.reference_value(key),
                    value,
                    preceding,
                ));
            }
            preceding = key;
        }
        result
    }

    /// A key is bad when the target has no value for it
    pub fn is_bad_key(&self, key: &str) -> bool {
        self.target.get(key).map_or(true, str::is_empty)
    }

    /// Search keys by substring.
    ///
    /// The key match is case-sensitive. With `translate_only`, only
    /// [`keys_to_translate`](Self::keys_to_translate) results are searched;
    /// otherwise every property line of the content. A non-empty `value`
    /// additionally requires the reference value to contain it, ignoring
    /// case.
    pub fn search(
        &self,
        name: &str,
        translate_only: bool,
        value: Option<&str>,
    ) -> Vec<DifferenceRecord> {
        let value = value.filter(|v| !v.is_empty());
        let value_matches = |reference: Option<&str>| match value {
            Some(v) => reference.is_some_and(|r| contains_ignore_case(r, v)),
            None => true,
        };

        if translate_only {
            return self
                .keys_to_translate()
                .into_iter()
                .filter(|d| d.key.contains(name) && value_matches(d.reference_value.as_deref()))
                .collect();
        }

        let mut result = Vec::new();
        let mut preceding = "";
        for line in &self.content {
            let key = line_key(line);
            if key.contains(name) && is_property(line) {
                let reference = self.reference_value(key);
                if value_matches(reference.as_deref()) {
                    result.push(DifferenceRecord::new(
                        key,
                        reference,
                        self.target.get(key).unwrap_or_default(),
                        preceding,
                    ));
                }
            }
            preceding = key;
        }
        result
    }

    /// Property keys in the content containing `name`, ignoring case
    pub fn find_keys_by_name_like(&self, name: &str) -> Vec<&str> {
        self.content
            .iter()
            .filter(|line| is_property(line))
            .map(|line| line_key(line))
            .filter(|key| contains_ignore_case(key, name))
            .collect()
    }

    /// Value of the last reference line for `key`
    pub fn reference_value(&self, key: &str) -> Option<String> {
        self.reference
            .lines()
            .iter()
            .rev()
            .filter_map(|line| split_property(line))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Reference keys whose value equals `value`
    pub fn keys_by_reference_value(&self, value: &str) -> Vec<&str> {
        self.reference
            .lines()
            .iter()
            .filter_map(|line| split_property(line))
            .filter(|(_, v)| v == value)
            .map(|(k, _)| k)
            .collect()
    }

    /// Target keys whose value equals `value`
    pub fn keys_by_value(&self, value: &str) -> Vec<&str> {
        self.target.keys_by_value(value)
    }
}
