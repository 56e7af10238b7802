//! Error types for raw recording handling

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown raw field: {0}")]
    UnknownField(String),

    #[error("Raw field index out of range: {index} (schema has {count} fields)")]
    FieldIndexOutOfRange { index: usize, count: usize },

    #[error("Row {row} has {actual} fields, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Recording '{0}' has no samples")]
    EmptyRecording(String),
}

/// Result type alias
pub type CoreResult<T> = Result<T, CoreError>;
