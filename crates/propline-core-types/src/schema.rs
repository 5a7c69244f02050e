//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// File identifiers
pub const FIELD_PATH: &str = "path";
pub const FIELD_KEY: &str = "key";

// Write queue
pub const FIELD_TICKET: &str = "ticket";
pub const FIELD_QUEUE_LEN: &str = "queue_len";

// Collection sizes
pub const FIELD_LINE_COUNT: &str = "line_count";
pub const FIELD_KEY_COUNT: &str = "key_count";
pub const FIELD_BYTES: &str = "bytes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
