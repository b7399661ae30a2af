//! Encoded rows with a field directory.

use crate::access::{
    encoded_width, FieldWidth, Row, RowDataError, RowDataResult, RowDataSource, RowDataTarget,
    RowDef,
};
use crate::types::{Value, ValueSource, ValueTarget};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::trace;
use std::sync::Arc;

const FIELD_COUNT_SIZE: usize = 2;
const DIRECTORY_ENTRY_SIZE: usize = 4;

fn header_size(field_count: usize) -> usize {
    FIELD_COUNT_SIZE + field_count * DIRECTORY_ENTRY_SIZE
}

/// One encoded row: header, directory of end offsets, then field payloads
#[derive(Debug, Clone)]
pub struct RowData {
    row_def: Arc<RowDef>,
    bytes: Bytes,
    /// Absolute offset and width of each field
    directory: Vec<(usize, usize)>,
}

impl RowData {
    /// Encode `values` according to `row_def`
    pub fn encode(row_def: Arc<RowDef>, values: &[Value]) -> RowDataResult<Self> {
        let field_count = row_def.field_count();
        if values.len() != field_count {
            return Err(RowDataError::FieldCountMismatch {
                expected: field_count,
                actual: values.len(),
            });
        }
        let count = u16::try_from(field_count).map_err(|_| {
            RowDataError::CorruptDirectory(format!("{} fields exceed u16 range", field_count))
        })?;

        let mut payload: Vec<u8> = Vec::new();
        let mut ends = Vec::with_capacity(field_count);
        let mut cursor = 0;

        for (field, value) in row_def.fields().iter().zip(values) {
            // Sized by the value itself, never by the declared maximum
            payload.resize(cursor + encoded_width(field, value)?, 0);
            let mut target = RowDataTarget::bind(field, &mut payload, cursor);
            target.put(value.clone())?;
            cursor += target.last_encoded_length();
            let end = u32::try_from(cursor).map_err(|_| {
                RowDataError::CorruptDirectory(format!("row payload of {} bytes too large", cursor))
            })?;
            ends.push(end);
        }

        let mut buf = BytesMut::with_capacity(header_size(field_count) + cursor);
        buf.put_u16_le(count);
        for end in ends {
            buf.put_u32_le(end);
        }
        buf.put_slice(&payload);
        trace!(
            "encoded row with {} fields into {} bytes",
            field_count,
            buf.len()
        );

        Self::from_bytes(row_def, buf.freeze())
    }

    /// Wrap encoded bytes, validating the directory against `row_def`
    pub fn from_bytes(row_def: Arc<RowDef>, bytes: impl Into<Bytes>) -> RowDataResult<Self> {
        let bytes = bytes.into();
        if bytes.len() < FIELD_COUNT_SIZE {
            return Err(RowDataError::BufferTooSmall {
                required: FIELD_COUNT_SIZE,
                available: bytes.len(),
            });
        }

        let mut header = &bytes[..];
        let field_count = header.get_u16_le() as usize;
        if field_count != row_def.field_count() {
            return Err(RowDataError::FieldCountMismatch {
                expected: row_def.field_count(),
                actual: field_count,
            });
        }

        let payload_start = header_size(field_count);
        if bytes.len() < payload_start {
            return Err(RowDataError::BufferTooSmall {
                required: payload_start,
                available: bytes.len(),
            });
        }
        let payload_len = bytes.len() - payload_start;

        let mut directory = Vec::with_capacity(field_count);
        let mut start = 0;
        for field in row_def.fields() {
            let end = header.get_u32_le() as usize;
            if end < start || end > payload_len {
                return Err(RowDataError::CorruptDirectory(format!(
                    "field '{}' ends at {} (previous end {}, payload {} bytes)",
                    field.name(),
                    end,
                    start,
                    payload_len
                )));
            }
            let width = end - start;
            if let FieldWidth::Fixed(size) = field.width() {
                if width != 0 && width != size {
                    return Err(RowDataError::InvalidWidth {
                        field: field.name().to_string(),
                        type_tag: field.type_tag(),
                        width,
                    });
                }
            }
            directory.push((payload_start + start, width));
            start = end;
        }

        if start != payload_len {
            return Err(RowDataError::CorruptDirectory(format!(
                "{} trailing bytes after last field",
                payload_len - start
            )));
        }

        trace!(
            "decoded directory for {} fields over {} bytes",
            field_count,
            bytes.len()
        );
        Ok(Self {
            row_def,
            bytes,
            directory,
        })
    }

    pub fn row_def(&self) -> &Arc<RowDef> {
        &self.row_def
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Absolute offset and encoded width of a field
    pub fn offset_and_width(&self, index: usize) -> RowDataResult<(usize, usize)> {
        self.directory
            .get(index)
            .copied()
            .ok_or(RowDataError::FieldIndexOutOfBounds {
                index,
                field_count: self.directory.len(),
            })
    }

    pub fn is_null(&self, index: usize) -> RowDataResult<bool> {
        Ok(self.offset_and_width(index)?.1 == 0)
    }

    /// Value view bound to one field of this row
    pub fn source(&self, index: usize) -> RowDataResult<RowDataSource<'_>> {
        let (offset, width) = self.offset_and_width(index)?;
        let field = self
            .row_def
            .field(index)
            .ok_or(RowDataError::FieldIndexOutOfBounds {
                index,
                field_count: self.row_def.field_count(),
            })?;
        Ok(RowDataSource::bind(field, &self.bytes, offset, width))
    }

    pub fn values(&self) -> RowDataResult<Vec<Value>> {
        (0..self.directory.len()).map(|i| Row::value(self, i)).collect()
    }
}

impl Row for RowData {
    fn field_count(&self) -> usize {
        self.directory.len()
    }

    fn value(&self, index: usize) -> RowDataResult<Value> {
        self.source(index)?.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::field_def::MAX_VARIABLE_WIDTH;
    use crate::access::FieldDef;
    use crate::types::TypeTag;

    fn row_def() -> Arc<RowDef> {
        Arc::new(RowDef::new(vec![
            FieldDef::new("id", TypeTag::Long),
            FieldDef::new("name", TypeTag::Varchar).with_width(32).unwrap(),
            FieldDef::new("flag", TypeTag::Bool),
            FieldDef::new("mask", TypeTag::UBigInt),
        ]))
    }

    #[test]
    fn test_encode_decode() -> RowDataResult<()> {
        let values = vec![
            Value::Long(42),
            Value::varchar("Hello"),
            Value::Bool(true),
            Value::ubigint(u64::MAX),
        ];

        let row = RowData::encode(row_def(), &values)?;
        assert_eq!(row.values()?, values);

        // header + 8 + (1 + 5) + 1 + 8
        assert_eq!(row.len(), 2 + 4 * 4 + 23);
        assert_eq!(row.offset_and_width(0)?, (18, 8));
        assert_eq!(row.offset_and_width(1)?, (26, 6));
        Ok(())
    }

    #[test]
    fn test_null_fields_have_zero_width() -> RowDataResult<()> {
        let values = vec![Value::Long(1), Value::Null, Value::Null, Value::ubigint(3)];
        let row = RowData::encode(row_def(), &values)?;

        assert!(row.is_null(1)?);
        assert!(row.is_null(2)?);
        assert!(!row.is_null(3)?);
        assert_eq!(row.offset_and_width(2)?.1, 0);
        assert_eq!(row.len(), 2 + 4 * 4 + 16);
        assert_eq!(row.values()?, values);
        Ok(())
    }

    #[test]
    fn test_from_bytes_round_trip() -> RowDataResult<()> {
        let values = vec![
            Value::Long(-5),
            Value::varchar(""),
            Value::Bool(false),
            Value::Null,
        ];
        let encoded = RowData::encode(row_def(), &values)?;
        let decoded = RowData::from_bytes(row_def(), encoded.as_bytes().to_vec())?;
        assert_eq!(decoded.values()?, values);
        Ok(())
    }

    #[test]
    fn test_field_count_mismatch() {
        assert_eq!(
            RowData::encode(row_def(), &[Value::Long(1)]).unwrap_err(),
            RowDataError::FieldCountMismatch {
                expected: 4,
                actual: 1
            }
        );

        let mut bytes = vec![3u8, 0];
        bytes.extend_from_slice(&[0u8; 12]);
        assert!(matches!(
            RowData::from_bytes(row_def(), bytes),
            Err(RowDataError::FieldCountMismatch { actual: 3, .. })
        ));
    }

    #[test]
    fn test_corrupt_directory() {
        let single = Arc::new(RowDef::new(vec![FieldDef::new("id", TypeTag::Long)]));

        // End offset beyond payload
        let mut bytes = vec![1u8, 0];
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            RowData::from_bytes(single.clone(), bytes),
            Err(RowDataError::CorruptDirectory(_))
        ));

        // Width that does not match the fixed field width
        let mut bytes = vec![1u8, 0];
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 4]);
        assert!(matches!(
            RowData::from_bytes(single.clone(), bytes),
            Err(RowDataError::InvalidWidth { width: 4, .. })
        ));

        // Truncated header
        assert!(matches!(
            RowData::from_bytes(single, vec![1u8]),
            Err(RowDataError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_field_index_out_of_bounds() -> RowDataResult<()> {
        let row = RowData::encode(
            row_def(),
            &[Value::Long(1), Value::Null, Value::Null, Value::Null],
        )?;
        assert_eq!(
            row.value(4),
            Err(RowDataError::FieldIndexOutOfBounds {
                index: 4,
                field_count: 4
            })
        );
        Ok(())
    }

    #[test]
    fn test_payload_sized_by_values() -> RowDataResult<()> {
        let wide: Vec<FieldDef> = (0..64)
            .map(|i| {
                FieldDef::new(format!("c{}", i), TypeTag::Varchar).with_width(MAX_VARIABLE_WIDTH)
            })
            .collect::<RowDataResult<_>>()?;
        let row_def = Arc::new(RowDef::new(wide));
        let values = vec![Value::varchar("x"); 64];

        let row = RowData::encode(row_def, &values)?;
        // header + 64 * (3-byte prefix + 1)
        assert_eq!(row.len(), 2 + 4 * 64 + 64 * 4);
        assert_eq!(row.values()?, values);
        Ok(())
    }

    #[test]
    fn test_empty_row_def() -> RowDataResult<()> {
        let row = RowData::encode(Arc::new(RowDef::default()), &[])?;
        assert_eq!(row.as_bytes(), &[0u8, 0]);
        assert!(row.values()?.is_empty());
        Ok(())
    }
}
