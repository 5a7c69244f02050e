#![allow(clippy::unwrap_used, clippy::expect_used)]

use propline_core::logging_facility::test_capture::init_test_capture;
use propline_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_BYTES, FIELD_ERR_CODE, FIELD_LINE_COUNT,
    FIELD_PATH,
};
use propline_store::persist::{read_lines, save};
use propline_store::{StoreConfig, WriteRegistry};
use tempfile::TempDir;

#[test]
fn test_save_and_read_emit_lifecycle_events() {
    // Given: test capture and a fresh file
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logged.properties");
    let registry = WriteRegistry::new();
    let config = StoreConfig::default();

    // When: the file is saved and read back
    save(&registry, &path, "a=1\nb=2\n", &config).unwrap();
    read_lines(&registry, &path, &config).unwrap();

    // Then: save logs start and end with the byte count
    capture.assert_event_exists("save", EVENT_START);
    let save_end = capture
        .events_for_op("save")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("Should have save end event");
    assert_eq!(save_end.fields.get(FIELD_BYTES), Some(&"8".to_string()));

    // And: the read reports its line count and path
    let read_start = capture
        .events_for_op("read_properties")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_START)
                && e.fields.get(FIELD_PATH) == Some(&path.display().to_string())
        });
    assert!(read_start.is_some(), "Should have read start event for the path");
    let read_end = capture
        .events_for_op("read_properties")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("Should have read end event");
    assert_eq!(read_end.fields.get(FIELD_LINE_COUNT), Some(&"2".to_string()));
}

#[test]
fn test_failed_read_logs_error_code() {
    // Given: test capture and a missing file
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unique_missing_for_logging.properties");

    // When: reading it
    let result = read_lines(&WriteRegistry::new(), &path, &StoreConfig::default());
    assert!(result.is_err());

    // Then: an end_error event carries ERR_IO
    let errors: Vec<_> = capture
        .events_for_op("read_properties")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .filter(|e| {
            e.fields
                .get(FIELD_PATH)
                .is_some_and(|p| p.contains("unique_missing_for_logging"))
        })
        .collect();
    assert!(!errors.is_empty());
    assert_eq!(errors[0].fields.get(FIELD_ERR_CODE), Some(&"ERR_IO".to_string()));
}
