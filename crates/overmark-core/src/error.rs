//! Error types for overmark

use thiserror::Error;

/// Main error type for overmark operations
#[derive(Error, Debug)]
pub enum OvermarkError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A host edit addressed a line that does not exist
    #[error("Line {line} is out of range (document has {len} lines)")]
    LineOutOfRange {
        /// Requested line index
        line: usize,
        /// Number of lines in the document
        len: usize,
    },
}

/// Result type alias for overmark operations
pub type Result<T> = std::result::Result<T, OvermarkError>;
