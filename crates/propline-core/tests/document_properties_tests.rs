// End-to-end behaviour of a reconciled document: parse, reconcile, edit,
// query and serialize.

mod common;

use common::{document, join};
use propline_core::{DifferenceRecord, Document, EditOutcome};

#[test]
fn test_parse_then_serialize_round_trips() {
    // Given: a file with comments, blanks, escapes and an empty value
    let raw = "# Messages\n\ngreeting=Hello\nfarewell=Au revoir \\u00E0 bient\\u00F4t\nnote=line\\u000anext\nempty=\n";

    // When: it is used as both target and reference and serialized
    let doc = Document::from_bytes(raw.as_bytes(), raw.as_bytes());

    // Then: the same records come back in the same order
    assert_eq!(doc.to_text(), raw);
    assert_eq!(doc.get("farewell"), Some("Au revoir \u{e0} bient\u{f4}t"));
    assert_eq!(doc.get("note"), Some("line\nnext"));
}

#[test]
fn test_duplicate_keys_reconcile_positionally() {
    // Given: reference and target both repeat key `a` three times
    let doc = document(&["a=1", "a=2", "a=3"], &["a=1", "a=2", "a=3"]);

    // Then: each occurrence keeps its own value
    assert_eq!(doc.content(), &["a=1", "a=2", "a=3"]);

    // And: the map holds the latest one
    assert_eq!(doc.get("a"), Some("3"));
}

#[test]
fn test_duplicate_keys_interleaved_with_other_lines() {
    // Given: target duplicates separated by unrelated lines
    let doc = document(
        &["x=one", "# c", "x=two"],
        &["x=EN1", "y=EN", "x=EN2"],
    );

    // Then: reference layout, target values per occurrence, untranslated y kept
    assert_eq!(doc.content(), &["x=one", "y=EN", "x=two"]);
    assert_eq!(doc.to_text(), "x=one\nx=two\n");
}

#[test]
fn test_missing_translation_detected() {
    // Given: reference {a, b, c} and target {a, c}
    let doc = document(&["a=X", "c=Y"], &["a=1", "b=2", "c=3"]);

    // When: asking for keys to translate
    let missing = doc.keys_to_translate();

    // Then: exactly b, with its reference value and anchor a
    assert_eq!(
        missing,
        vec![DifferenceRecord::new("b", Some("2".into()), "", "a")]
    );
}

#[test]
fn test_empty_value_detected() {
    // Given: target {a: 1, b: ""}
    let doc = document(&["a=1", "b="], &["a=1", "b=2"]);

    // When: asking for empty keys
    let empty = doc.empty_keys();

    // Then: exactly b, anchored after a
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].key, "b");
    assert_eq!(empty[0].preceding_key, "a");
}

#[test]
fn test_insert_anchoring() {
    // Given: content [a=1, c=3]
    let mut doc = document(&["a=1", "c=3"], &["a=1", "c=3"]);

    // When: inserting b after a
    let outcome = doc.insert_or_update("a", "b", "2");

    // Then: b lands between a and c
    assert_eq!(outcome, EditOutcome::Inserted { index: 1 });
    assert_eq!(doc.content(), &["a=1", "b=2", "c=3"]);
}

#[test]
fn test_insert_or_update_twice_is_idempotent() {
    // Given: a document without key b
    let mut doc = document(&["a=1", "c=3"], &["a=1", "c=3"]);

    // When: the same insert is applied twice
    let first = doc.insert_or_update("a", "b", "2");
    let second = doc.insert_or_update("a", "b", "2");

    // Then: one line for b, at the index chosen by the first call
    assert_eq!(first, EditOutcome::Inserted { index: 1 });
    assert_eq!(second, EditOutcome::Updated { index: 1 });
    let b_lines = doc.content().iter().filter(|l| l.starts_with("b=")).count();
    assert_eq!(b_lines, 1);
    assert_eq!(doc.to_text(), join(&["a=1", "b=2", "c=3"]));
}

#[test]
fn test_translating_missing_keys_through_records() {
    // Given: a target lagging behind the reference
    let mut doc = document(&["a=A"], &["# top", "a=1", "b=2", "", "c=3"]);

    // When: every missing key is filled at its anchor
    for record in doc.keys_to_translate() {
        let value = format!("{}!", record.reference_value.unwrap_or_default());
        doc.insert_or_update(&record.preceding_key, &record.key, &value);
    }

    // Then: nothing is left to translate and the layout follows the reference
    assert!(doc.keys_to_translate().is_empty());
    assert_eq!(doc.to_text(), "# top\na=A\nb=2!\n\nc=3!\n");
}

#[test]
fn test_multi_separator_value_quirk_preserved() {
    // Given: a value with extra separators
    let doc = document(&["url=http://x?a=b"], &["url=http://x?a=b"]);

    // Then: the extra separators are dropped from the value
    assert_eq!(doc.get("url"), Some("http://x?ab"));
}

#[test]
fn test_reference_never_mutated_by_edits() {
    // Given: a document
    let mut doc = document(&["a=1"], &["a=EN", "b=EN"]);
    let reference_before = doc.reference().clone();

    // When: it is edited
    doc.insert_or_update("a", "b", "deux");
    doc.insert_or_update("b", "c", "trois");

    // Then: the reference store is unchanged
    assert_eq!(doc.reference(), &reference_before);
}
