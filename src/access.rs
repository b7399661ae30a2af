//! Access layer for row-oriented storage of typed values.
//!
//! This module provides abstractions for moving values in and out of
//! encoded rows:
//!
//! - **FieldDef / RowDef**: Static layout metadata supplied by the schema
//! - **Codec**: Per-field binary encoding with zero width as the null marker
//! - **RowDataSource / RowDataTarget**: Value views bound to one field of one buffer
//! - **RowData**: A complete encoded row with its field directory
//! - **Row**: What expression evaluation reads columns through
//!
//! ## Row Binary Layout
//!
//! ```text
//! +------------------+---------------------------+------------------+
//! | Field Count      | End Offsets               | Payload          |
//! | (u16 LE)         | [u32 LE; field count]     | [u8; ...]        |
//! +------------------+---------------------------+------------------+
//! ```
//!
//! Offsets are relative to the payload start; field `i` spans
//! `end[i - 1]..end[i]`. A null field has zero width.

pub mod codec;
pub mod conversion;
pub mod error;
pub mod field_def;
pub mod row;
pub mod row_data;
pub mod row_def;

pub use codec::{decode_field, encode_field, encoded_width};
pub use conversion::{RowDataSource, RowDataTarget};
pub use error::{RowDataError, RowDataResult};
pub use field_def::{FieldDef, FieldWidth};
pub use row::{Row, ValuesRow};
pub use row_data::RowData;
pub use row_def::RowDef;
