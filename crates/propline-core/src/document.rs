//! A target properties file reconciled against its reference file
//!
//! The document's content list follows the reference layout with the
//! target's values substituted. Edits go through
//! [`insert_or_update`](Document::insert_or_update) and friends so the
//! content list and the target's key map stay consistent; the diffing
//! queries read both without mutating anything.

use crate::codec::{decode_lines, escape};
use crate::line::{is_property, line_key};
use crate::reconcile::rebuild;
use crate::store::OrderedStore;

/// Target store, read-only reference store and the reconciled content
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) target: OrderedStore,
    pub(crate) reference: OrderedStore,
    pub(crate) content: Vec<String>,
}

impl Document {
    /// Reconcile `target` against `reference`'s line layout
    pub fn new(target: OrderedStore, reference: OrderedStore) -> Self {
        let content = rebuild(reference.lines(), &target);
        Self {
            target,
            reference,
            content,
        }
    }

    /// Build from raw target and reference file bytes
    pub fn from_bytes(target: &[u8], reference: &[u8]) -> Self {
        Self::new(
            OrderedStore::parse(decode_lines(target)),
            OrderedStore::parse(decode_lines(reference)),
        )
    }

    /// Build from already unescaped target and reference text
    pub fn from_texts(target: &str, reference: &str) -> Self {
        Self::new(
            OrderedStore::from_text(target),
            OrderedStore::from_text(reference),
        )
    }

    /// The target file's key map and parsed lines
    pub fn target(&self) -> &OrderedStore {
        &self.target
    }

    /// The reference file, as loaded
    pub fn reference(&self) -> &OrderedStore {
        &self.reference
    }

    /// Reconciled content lines, unescaped
    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Current value of `key` in the target
    pub fn get(&self, key: &str) -> Option<&str> {
        self.target.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.target.contains_key(key)
    }

    /// Number of keys in the target
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Index of the last content line whose key is `key`
    pub(crate) fn last_index_of(&self, key: &str) -> Option<usize> {
        self.content.iter().rposition(|line| line_key(line) == key)
    }

    /// Serialize the content for writing.
    ///
    /// Every line is escaped and newline-terminated. Property lines whose key
    /// the target lacks are left out, so untranslated keys are never written
    /// with the reference value.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.content {
            if is_property(line) && !self.target.contains_key(line_key(line)) {
                continue;
            }
            out.push_str(&escape(line));
            out.push('\n');
        }
        out
    }

    /// The target as it was read, escaped for writing as a backup
    pub fn old_text(&self) -> String {
        let mut out = String::new();
        for line in self.target.lines() {
            out.push_str(&escape(line));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_follows_reference_layout() {
        let doc = Document::from_texts("b=B\na=A\n", "# top\na=1\n\nb=2\n");
        assert_eq!(doc.content(), &["# top", "a=A", "", "b=B"]);
    }

    #[test]
    fn test_target_only_keys_stay_in_map() {
        let doc = Document::from_texts("a=A\nextra=E\n", "a=1\n");
        assert_eq!(doc.content(), &["a=A"]);
        assert_eq!(doc.get("extra"), Some("E"));
    }

    #[test]
    fn test_to_text_omits_untranslated_keys() {
        let doc = Document::from_texts("a=A\n", "# c\na=1\nb=2\n");
        assert_eq!(doc.to_text(), "# c\na=A\n");
    }

    #[test]
    fn test_to_text_escapes_each_record() {
        let doc = Document::from_texts("k=\u{e9}\n", "k=e\n");
        assert_eq!(doc.to_text(), "k=\\u00E9\n");
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let original = "# comment\na=1\nb=caf\\u00E9\n\nc=x\\u000ay\n";
        let doc = Document::from_bytes(original.as_bytes(), original.as_bytes());
        assert_eq!(doc.to_text(), original);
    }

    #[test]
    fn test_old_text_is_target_as_read() {
        let doc = Document::from_texts("b=\u{e9}\n# note\n", "a=1\n");
        assert_eq!(doc.old_text(), "b=\\u00E9\n# note\n");
    }
}
