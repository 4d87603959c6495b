//! Error handling for the grinder
//!
//! One error type covers every failure class: startup (entropy and backend
//! init), collaborator protocol violations, malformed input, and file I/O.

use std::fmt;
use std::path::Path;

/// Result type alias for grinder operations
pub type Result<T> = std::result::Result<T, GrindError>;

/// Error types for grinding, encoding and decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrindError {
    /// The OS entropy source could not be read
    Entropy(String),
    /// The batch search backend refused to initialize
    BackendInit(String),
    /// Hard failure reported by the backend during a search
    Backend(String),
    /// The backend returned a response that cannot be trusted
    ProtocolViolation(String),
    /// Malformed hex, wrong-length targets, bad metadata
    InvalidInput(String),
    /// File or stream I/O errors, with the operation that failed
    Io { operation: String, message: String },
    /// Invalid settings
    Config(String),
    /// The grind was stopped through its cancellation token
    Cancelled,
    /// The caller-imposed batch limit ran out before a match
    BatchLimit { batches: u64, attempts: u64 },
}

impl GrindError {
    /// Wrap an I/O error together with the operation and path it concerned
    pub fn io(operation: &str, path: &Path, err: std::io::Error) -> Self {
        GrindError::Io {
            operation: format!("{operation} {}", path.display()),
            message: err.to_string(),
        }
    }

    /// Wrap an I/O error on a stream such as stdin or stdout
    pub fn stream(operation: &str, err: std::io::Error) -> Self {
        GrindError::Io {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }

    /// Fatal errors abort the whole invocation; only cancellation is not one
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GrindError::Cancelled)
    }
}

impl fmt::Display for GrindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrindError::Entropy(msg) => write!(f, "Entropy error: {msg}"),
            GrindError::BackendInit(msg) => write!(f, "Backend initialization failed: {msg}"),
            GrindError::Backend(msg) => write!(f, "Backend error: {msg}"),
            GrindError::ProtocolViolation(msg) => write!(f, "Backend protocol violation: {msg}"),
            GrindError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            GrindError::Io { operation, message } => {
                write!(f, "I/O error during {operation}: {message}")
            }
            GrindError::Config(msg) => write!(f, "Configuration error: {msg}"),
            GrindError::Cancelled => write!(f, "Grind cancelled"),
            GrindError::BatchLimit { batches, attempts } => write!(
                f,
                "No match after {batches} batches ({attempts} attempts), batch limit reached"
            ),
        }
    }
}

impl std::error::Error for GrindError {}

impl From<std::io::Error> for GrindError {
    fn from(err: std::io::Error) -> Self {
        GrindError::stream("stream access", err)
    }
}
