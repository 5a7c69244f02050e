use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PropError
pub type Result<T> = std::result::Result<T, PropError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    NotFound,

    // Integration/IO
    Io,
    /// A blocking wait on the write queue was cancelled; treated as an I/O failure
    Interrupted,
    Timeout,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Interrupted => "ERR_INTERRUPTED",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for failures that callers should treat as I/O failures
    pub fn is_io_class(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Io | ExErrorKind::Interrupted | ExErrorKind::Timeout
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus file/line context
/// for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    line: Option<usize>,
    line_text: Option<String>,
    key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            line: None,
            line_text: None,
            key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line number context
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add raw line text context
    pub fn with_line_text(mut self, text: impl Into<String>) -> Self {
        self.line_text = Some(text.into());
        self
    }

    /// Add property key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Get the 1-based line number context, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the raw line text context, if any
    pub fn line_text(&self) -> Option<&str> {
        self.line_text.as_deref()
    }

    /// Get the property key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(line) = self.line {
            write!(f, " (line {}", line)?;
            if let Some(text) = &self.line_text {
                write!(f, ": {:?}", text)?;
            }
            write!(f, ")")?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for propline operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropError {
    // ===== I/O Errors =====
    /// Reading a properties file failed part way through
    #[error("Error on line {line} : {text} while reading {path}: {reason}")]
    ReadFailed {
        path: PathBuf,
        line: usize,
        text: String,
        reason: String,
    },

    /// Writing a properties file failed
    #[error("Error while saving file to location {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// A queued writer or waiting reader was cancelled
    #[error("Wait on {path} was interrupted")]
    WaitInterrupted { path: PathBuf },

    /// A queued writer or waiting reader gave up after its deadline
    #[error("Wait on {path} timed out (ticket {ticket})")]
    WaitTimedOut { path: PathBuf, ticket: u64 },

    // ===== Input Errors =====
    /// Content line index is past the end of the content list
    #[error("Line index {index} out of range (content has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    /// A path has no usable file name
    #[error("There is an error in file path, please check: {name}")]
    InvalidFileName { name: String },
}

impl From<PropError> for ExError {
    fn from(err: PropError) -> Self {
        match err {
            PropError::ReadFailed {
                path,
                line,
                text,
                reason,
            } => ExError::new(ExErrorKind::Io)
                .with_op("read_properties")
                .with_path(path)
                .with_line(line)
                .with_line_text(text)
                .with_message(reason),

            PropError::WriteFailed { path, reason } => ExError::new(ExErrorKind::Io)
                .with_op("save")
                .with_path(path)
                .with_message(reason),

            PropError::WaitInterrupted { path } => ExError::new(ExErrorKind::Interrupted)
                .with_path(path)
                .with_message("Wait for file access was interrupted"),

            PropError::WaitTimedOut { path, ticket } => ExError::new(ExErrorKind::Timeout)
                .with_path(path)
                .with_message(format!("Ticket {} timed out waiting for file access", ticket)),

            PropError::LineOutOfRange { index, len } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("modify_at")
                .with_line(index + 1)
                .with_message(format!("Content has only {} lines", len)),

            PropError::InvalidFileName { name } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("locale_tag")
                .with_message(format!("No usable file name in '{}'", name)),
        }
    }
}
