//! Conversion error types.

use crate::types::TypeTag;
use thiserror::Error;

/// Errors raised when a value cannot be read or written as a requested kind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Inconvertible types: cannot convert {from} to {to}")]
    InconvertibleTypes { from: TypeTag, to: TypeTag },

    #[error("Malformed {target} value: {reason}")]
    MalformedValue { target: TypeTag, reason: String },

    #[error("Operation not supported for type {type_tag}")]
    UnsupportedOperation { type_tag: TypeTag },
}

impl ConversionError {
    pub fn inconvertible(from: TypeTag, to: TypeTag) -> Self {
        ConversionError::InconvertibleTypes { from, to }
    }

    pub fn malformed(target: TypeTag, reason: impl Into<String>) -> Self {
        ConversionError::MalformedValue {
            target,
            reason: reason.into(),
        }
    }

    /// Whether an operator that declares a fallback value may absorb this error.
    ///
    /// `UnsupportedOperation` never is: there is no defined value to fall back to.
    pub fn is_tolerable(&self) -> bool {
        matches!(
            self,
            ConversionError::InconvertibleTypes { .. } | ConversionError::MalformedValue { .. }
        )
    }
}

/// Result type for conversions.
pub type ConversionResult<T> = Result<T, ConversionError>;
