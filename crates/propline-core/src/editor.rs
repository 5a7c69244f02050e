//! Insert/update operations on a [`Document`].
//!
//! Only the last occurrence of a key is ever edited; earlier duplicates keep
//! their own values.

use crate::document::Document;
use crate::errors::{PropError, Result};
use crate::line::{form_content, is_property, line_key};

/// Result of an [`insert_or_update`](Document::insert_or_update) call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// An existing line for the key was replaced in place
    Updated { index: usize },
    /// A new line was inserted after the anchor
    Inserted { index: usize },
    /// Nothing changed because the value was empty
    Rejected,
}

impl EditOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, EditOutcome::Rejected)
    }

    /// Content index of the edited line, if any
    pub fn index(&self) -> Option<usize> {
        match self {
            EditOutcome::Updated { index } | EditOutcome::Inserted { index } => Some(*index),
            EditOutcome::Rejected => None,
        }
    }
}

impl Document {
    /// Set `key` to `value`, inserting it after `anchor_key` if absent.
    ///
    /// The last content line for `key` is replaced in place when one exists.
    /// Otherwise a new line goes right after the last line whose key is
    /// `anchor_key`, or at the top when the anchor is not found. An empty
    /// value is rejected without touching the document.
    pub fn insert_or_update(&mut self, anchor_key: &str, key: &str, value: &str) -> EditOutcome {
        if value.is_empty() {
            tracing::debug!(key = %key, "rejected edit with empty value");
            return EditOutcome::Rejected;
        }

        let content = form_content(key, value);
        let outcome = match self.last_index_of(key) {
            Some(index) => {
                self.content[index] = content;
                EditOutcome::Updated { index }
            }
            None => {
                let index = self.last_index_of(anchor_key).map_or(0, |i| i + 1);
                self.content.insert(index, content);
                EditOutcome::Inserted { index }
            }
        };
        self.target.upsert(key, value);

        tracing::debug!(key = %key, anchor = %anchor_key, outcome = ?outcome, "edited key");
        outcome
    }

    /// Replace the content line at `index` with `key`/`value`.
    ///
    /// # Errors
    ///
    /// `LineOutOfRange` if `index` is past the end of the content.
    pub fn modify_at(&mut self, index: usize, key: &str, value: &str) -> Result<()> {
        let len = self.content.len();
        let line = self
            .content
            .get_mut(index)
            .ok_or(PropError::LineOutOfRange { index, len })?;
        *line = form_content(key, value);
        self.target.upsert(key, value);
        Ok(())
    }

    /// Give every property line its own key as value.
    ///
    /// Produces a pseudo-locale whose values make untranslated strings easy to
    /// spot. Returns the number of lines edited.
    pub fn fill_values_with_keys(&mut self) -> usize {
        let lines: Vec<(String, bool)> = self
            .content
            .iter()
            .map(|line| (line_key(line).to_string(), is_property(line)))
            .collect();

        let mut edited = 0;
        let mut preceding = String::new();
        for (key, property) in lines {
            if property && self.insert_or_update(&preceding, &key, &key).is_success() {
                edited += 1;
            }
            preceding = key;
        }
        edited
    }
}
