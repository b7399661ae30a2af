//! Value views bound to a single field of a row buffer.
//!
//! A view is created by `bind` for the duration of one read or write and
//! borrows the buffer only for its own lifetime.

use crate::access::codec::{decode_field, encode_field};
use crate::access::{FieldDef, RowDataError};
use crate::types::{TypeTag, Value, ValueSource, ValueTarget};

/// Reads one field of an encoded row
#[derive(Debug, Clone, Copy)]
pub struct RowDataSource<'a> {
    field: &'a FieldDef,
    bytes: &'a [u8],
    offset: usize,
    width: usize,
}

impl<'a> RowDataSource<'a> {
    /// Bind to the `width` bytes of `field` starting at `bytes[offset]`
    pub fn bind(field: &'a FieldDef, bytes: &'a [u8], offset: usize, width: usize) -> Self {
        Self {
            field,
            bytes,
            offset,
            width,
        }
    }

    pub fn field_def(&self) -> &FieldDef {
        self.field
    }

    pub fn offset_and_width(&self) -> (usize, usize) {
        (self.offset, self.width)
    }
}

impl ValueSource for RowDataSource<'_> {
    type Error = RowDataError;

    fn type_tag(&self) -> TypeTag {
        if self.width == 0 {
            TypeTag::Null
        } else {
            self.field.type_tag()
        }
    }

    fn is_null(&self) -> bool {
        self.width == 0
    }

    fn value(&self) -> Result<Value, RowDataError> {
        decode_field(self.field, self.bytes, self.offset, self.width)
    }
}

/// Writes one field of a row under construction
#[derive(Debug)]
pub struct RowDataTarget<'a> {
    field: &'a FieldDef,
    bytes: &'a mut [u8],
    offset: usize,
    last_encoded_length: Option<usize>,
}

impl<'a> RowDataTarget<'a> {
    /// Bind to `field`, writing at `bytes[offset]`
    pub fn bind(field: &'a FieldDef, bytes: &'a mut [u8], offset: usize) -> Self {
        Self {
            field,
            bytes,
            offset,
            last_encoded_length: None,
        }
    }

    /// Bytes consumed by the last write; zero if nothing was written or the value was null
    pub fn last_encoded_length(&self) -> usize {
        self.last_encoded_length.unwrap_or(0)
    }

    /// Allow another write at the same position, overwriting the previous one
    pub fn reset(&mut self) {
        self.last_encoded_length = None;
    }
}

impl ValueTarget for RowDataTarget<'_> {
    type Error = RowDataError;

    fn target_type(&self) -> TypeTag {
        self.field.type_tag()
    }

    fn put(&mut self, value: Value) -> Result<(), RowDataError> {
        if self.last_encoded_length.is_some() {
            return Err(RowDataError::AlreadyWritten {
                field: self.field.name().to_string(),
            });
        }
        let written = encode_field(self.field, &value, self.bytes, self.offset)?;
        self.last_encoded_length = Some(written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConversionError;

    #[test]
    fn test_linked_conversion() -> Result<(), RowDataError> {
        let field = FieldDef::new("c1", TypeTag::Double);
        let mut bytes = vec![0u8; 128];

        let width = {
            let mut target = RowDataTarget::bind(&field, &mut bytes, 0);
            target.put(Value::Double(1.0))?;
            target.last_encoded_length()
        };
        assert_eq!(width, 8);

        let source = RowDataSource::bind(&field, &bytes, 0, width);
        assert!(!source.is_null());
        assert_eq!(source.type_tag(), TypeTag::Double);
        assert_eq!(source.value()?, Value::Double(1.0));
        assert_eq!(source.read_as(TypeTag::Long)?, Value::Long(1));
        assert_eq!(source.offset_and_width(), (0, 8));
        Ok(())
    }

    #[test]
    fn test_write_as_converts() -> Result<(), RowDataError> {
        let field = FieldDef::new("c1", TypeTag::Long);
        let mut bytes = vec![0u8; 16];
        let mut target = RowDataTarget::bind(&field, &mut bytes, 4);
        target.write_as(&Value::varchar("-9"), TypeTag::Long)?;
        assert_eq!(target.last_encoded_length(), 8);

        let source = RowDataSource::bind(&field, &bytes, 4, 8);
        assert_eq!(source.value()?, Value::Long(-9));
        Ok(())
    }

    #[test]
    fn test_write_once_until_reset() -> Result<(), RowDataError> {
        let field = FieldDef::new("c1", TypeTag::Long);
        let mut bytes = vec![0u8; 8];
        let mut target = RowDataTarget::bind(&field, &mut bytes, 0);

        target.put(Value::Long(1))?;
        assert_eq!(
            target.put(Value::Long(2)),
            Err(RowDataError::AlreadyWritten {
                field: "c1".to_string()
            })
        );

        target.reset();
        assert_eq!(target.last_encoded_length(), 0);
        target.put(Value::Null)?;
        assert_eq!(target.last_encoded_length(), 0);
        Ok(())
    }

    #[test]
    fn test_zero_width_source_is_null() -> Result<(), RowDataError> {
        let field = FieldDef::new("c1", TypeTag::Varchar);
        let bytes = [0xFFu8; 4];
        let source = RowDataSource::bind(&field, &bytes, 2, 0);
        assert!(source.is_null());
        assert_eq!(source.type_tag(), TypeTag::Null);
        assert_eq!(source.value()?, Value::Null);
        assert_eq!(source.read_as(TypeTag::UBigInt)?, Value::Null);
        Ok(())
    }

    #[test]
    fn test_unsupported_field() {
        let field = FieldDef::new("c1", TypeTag::Unsupported);
        let bytes = [0u8; 4];
        let source = RowDataSource::bind(&field, &bytes, 0, 4);
        assert_eq!(
            source.value(),
            Err(RowDataError::Conversion(
                ConversionError::UnsupportedOperation {
                    type_tag: TypeTag::Unsupported
                }
            ))
        );
    }
}
