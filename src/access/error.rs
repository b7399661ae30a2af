//! Row access error types.

use crate::types::{ConversionError, TypeTag};
use thiserror::Error;

/// Errors that can occur while encoding or decoding rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowDataError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Buffer too small: requires {required} bytes but only {available} available")]
    BufferTooSmall { required: usize, available: usize },

    #[error("Invalid width {width} for field '{field}' of type {type_tag}")]
    InvalidWidth {
        field: String,
        type_tag: TypeTag,
        width: usize,
    },

    #[error("Corrupt row directory: {0}")]
    CorruptDirectory(String),

    #[error("Field index {index} out of bounds for row with {field_count} fields")]
    FieldIndexOutOfBounds { index: usize, field_count: usize },

    #[error("Value count {actual} doesn't match field count {expected}")]
    FieldCountMismatch { expected: usize, actual: usize },

    #[error("Field '{field}' already written; reset the target before writing again")]
    AlreadyWritten { field: String },
}

/// Result type for row access operations.
pub type RowDataResult<T> = Result<T, RowDataError>;
