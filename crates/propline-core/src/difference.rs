//! Difference records reported by the diffing queries.

use serde::{Deserialize, Serialize};

/// One key that differs between a target file and its reference
///
/// `preceding_key` is the key of the line just before this one, so a caller
/// can insert a missing key in the right place with
/// [`Document::insert_or_update`](crate::document::Document::insert_or_update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    /// Property key
    pub key: String,
    /// Value in the reference file, if the reference has the key
    pub reference_value: Option<String>,
    /// Value in the target file (empty when missing)
    pub current_value: String,
    /// Key of the preceding line, used as insertion anchor
    pub preceding_key: String,
}

impl DifferenceRecord {
    pub fn new(
        key: impl Into<String>,
        reference_value: Option<String>,
        current_value: impl Into<String>,
        preceding_key: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            reference_value,
            current_value: current_value.into(),
            preceding_key: preceding_key.into(),
        }
    }
}

impl std::fmt::Display for DifferenceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.key,
            self.reference_value.as_deref().unwrap_or(""),
            self.current_value,
            self.preceding_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_tab_separated() {
        let record = DifferenceRecord::new("b", Some("2".to_string()), "", "a");
        assert_eq!(record.to_string(), "b\t2\t\ta");
    }

    #[test]
    fn test_serializes_missing_reference_as_null() {
        let record = DifferenceRecord::new("k", None, "v", "");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["reference_value"].is_null());
        assert_eq!(json["preceding_key"], "");
    }
}
