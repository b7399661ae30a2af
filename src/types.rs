//! Typed value layer.
//!
//! This module provides the value model shared by the row codec and the
//! expression engine:
//!
//! - **TypeTag**: Closed set of logical kinds a value or column can have
//! - **Value**: Canonical in-memory representation, one variant per kind
//! - **Extractors**: Conversions between kinds and raw representations
//! - **ValueSource / ValueTarget**: Uniform read/write capabilities over
//!   scalar holders and row buffers alike

pub mod error;
pub mod extract;
pub mod source;
pub mod type_tag;
pub mod value;

pub use error::{ConversionError, ConversionResult};
pub use source::{ValueHolder, ValueSource, ValueTarget};
pub use type_tag::TypeTag;
pub use value::Value;
