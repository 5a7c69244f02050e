//! propline Core - order-preserving model of locale properties files
//!
//! This crate provides the in-memory side of propline:
//! - Line codec (Latin-1 read, backslash unescape, ASCII-safe escape)
//! - Line classification (property line vs. opaque content)
//! - Ordered key/value store with duplicate-key history
//! - Reconciliation of a target file onto a reference file's layout
//! - Insert/update editing and diffing queries on the reconciled document
//!
//! File access and write serialization live in `propline-store`.

pub mod codec;
pub mod difference;
pub mod differ;
pub mod document;
pub mod editor;
pub mod errors;
pub mod line;
pub mod locale;
pub mod logging_facility;
pub mod reconcile;
pub mod store;

// Re-export commonly used types
pub use difference::DifferenceRecord;
pub use document::Document;
pub use editor::EditOutcome;
pub use errors::{ExError, ExErrorKind, PropError, Result};
pub use locale::locale_tag;
pub use store::OrderedStore;
