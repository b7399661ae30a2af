//! Error types for expression composition and evaluation.

use crate::access::RowDataError;
use crate::types::ConversionError;
use std::fmt;

/// Errors that can occur while composing or evaluating expressions
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Wrong number of arguments for a fixed-arity function
    WrongArity {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// No composer registered under this name
    UnknownFunction { name: String },

    /// Column position past the end of the bound row
    ColumnIndexOutOfBounds { index: usize, row_size: usize },

    /// A value could not be converted
    Conversion(ConversionError),

    /// The bound row could not be decoded
    RowData(RowDataError),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::WrongArity {
                function,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Function {} expects {} arguments, got {}",
                    function, expected, actual
                )
            }

            ExpressionError::UnknownFunction { name } => {
                write!(f, "Unknown function: {}", name)
            }

            ExpressionError::ColumnIndexOutOfBounds { index, row_size } => {
                write!(
                    f,
                    "Column index {} out of bounds for row with {} columns",
                    index, row_size
                )
            }

            ExpressionError::Conversion(err) => write!(f, "{}", err),

            ExpressionError::RowData(err) => write!(f, "Row access failed: {}", err),
        }
    }
}

impl std::error::Error for ExpressionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpressionError::Conversion(err) => Some(err),
            ExpressionError::RowData(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConversionError> for ExpressionError {
    fn from(err: ConversionError) -> Self {
        ExpressionError::Conversion(err)
    }
}

impl From<RowDataError> for ExpressionError {
    fn from(err: RowDataError) -> Self {
        ExpressionError::RowData(err)
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
