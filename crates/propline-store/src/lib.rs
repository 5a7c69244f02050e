//! propline Store - file access for locale properties files
//!
//! Provides:
//! - Per-path write serialization with FIFO tickets and read/write exclusion
//! - Latin-1 reading and whole-file UTF-8 writing through the codec
//! - Versioned backups under a sibling `temp` directory
//! - `PropertiesFile` handle tying a target file to its reference file

pub mod config;
pub mod errors;
pub mod file;
pub mod persist;
pub mod queue;

// Re-export key types
pub use config::StoreConfig;
pub use errors::Result;
pub use file::{generate_pseudo_locale, PropertiesFile};
pub use queue::{CancelToken, ReadGuard, WriteGuard, WriteRegistry, WriteTicket};
