//! Per-field binary encoding.
//!
//! | Type | Encoding |
//! |------|----------|
//! | INT, LONG, DATE, TIME, TIMESTAMP | Two's complement LE at the declared width |
//! | U_INT | Unsigned LE at the declared width |
//! | U_BIGINT | 8 bytes unsigned LE |
//! | FLOAT, DOUBLE | IEEE-754 bit pattern LE |
//! | DECIMAL | 16 bytes (`rust_decimal` serialization) |
//! | BOOL | 1 byte, 0 or 1 |
//! | VARCHAR, VARBINARY | LE length prefix (1-3 bytes) then payload |
//!
//! A null value always encodes to zero bytes, and a zero-width field always
//! decodes to null.

use crate::access::{FieldDef, FieldWidth, RowDataError, RowDataResult};
use crate::types::extract::{bits_to_double, convert, double_to_bits, low_u64};
use crate::types::{ConversionError, TypeTag, Value};
use bytes::{Buf, BufMut};
use num_bigint::BigUint;
use rust_decimal::Decimal;

const DECIMAL_FLAG_MASK: u32 = 0x8000_0000 | 0x00FF_0000;

fn unsupported(field: &FieldDef) -> RowDataResult<()> {
    if field.type_tag() == TypeTag::Unsupported {
        return Err(ConversionError::UnsupportedOperation {
            type_tag: TypeTag::Unsupported,
        }
        .into());
    }
    Ok(())
}

fn fixed_size(field: &FieldDef) -> usize {
    match field.width() {
        FieldWidth::Fixed(size) => size,
        FieldWidth::Variable { .. } => 0,
    }
}

fn check_signed_range(field: &FieldDef, value: i64, size: usize) -> RowDataResult<()> {
    if size < 8 {
        let bits = (size * 8) as u32;
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        if value < min || value > max {
            return Err(ConversionError::malformed(
                field.type_tag(),
                format!("{} does not fit in {} bytes", value, size),
            )
            .into());
        }
    }
    Ok(())
}

fn check_unsigned_range(field: &FieldDef, value: u64, size: usize) -> RowDataResult<()> {
    if size < 8 && value >> (size * 8) != 0 {
        return Err(ConversionError::malformed(
            field.type_tag(),
            format!("{} does not fit in {} bytes", value, size),
        )
        .into());
    }
    Ok(())
}

/// Number of bytes `value` (already converted to the field's type) occupies
fn encoded_len(field: &FieldDef, value: &Value) -> RowDataResult<usize> {
    let payload = match value {
        Value::Null => return Ok(0),
        Value::Varchar(s) => s.len(),
        Value::Varbinary(b) => b.len(),
        _ => return Ok(fixed_size(field)),
    };

    match field.width() {
        FieldWidth::Variable { max_width } if payload <= max_width => {
            Ok(field.prefix_width() + payload)
        }
        FieldWidth::Variable { max_width } => Err(ConversionError::malformed(
            field.type_tag(),
            format!("{} bytes exceeds maximum width {}", payload, max_width),
        )
        .into()),
        FieldWidth::Fixed(_) => Err(RowDataError::InvalidWidth {
            field: field.name().to_string(),
            type_tag: field.type_tag(),
            width: payload,
        }),
    }
}

/// Bytes [`encode_field`] would write for `value`, zero for null
pub fn encoded_width(field: &FieldDef, value: &Value) -> RowDataResult<usize> {
    unsupported(field)?;
    let value = convert(value, field.type_tag())?;
    encoded_len(field, &value)
}

/// Encode `value` as `field`'s type at `buf[offset..]`.
///
/// The value is converted to the field's type first. Returns the number of
/// bytes written, which is zero for null.
pub fn encode_field(
    field: &FieldDef,
    value: &Value,
    buf: &mut [u8],
    offset: usize,
) -> RowDataResult<usize> {
    unsupported(field)?;
    let value = convert(value, field.type_tag())?;
    let required = encoded_len(field, &value)?;
    if required == 0 {
        return Ok(0);
    }

    let available = buf.len().saturating_sub(offset);
    if required > available {
        return Err(RowDataError::BufferTooSmall {
            required,
            available,
        });
    }

    let size = fixed_size(field);
    let mut out = &mut buf[offset..offset + required];
    match &value {
        Value::Int(v) => {
            check_signed_range(field, *v as i64, size)?;
            out.put_int_le(*v as i64, size);
        }
        Value::Long(v) => {
            check_signed_range(field, *v, size)?;
            out.put_int_le(*v, size);
        }
        Value::Date(v) => out.put_i32_le(*v),
        Value::Time(v) | Value::Timestamp(v) => out.put_i64_le(*v),
        Value::UInt(v) => {
            check_unsigned_range(field, *v as u64, size)?;
            out.put_uint_le(*v as u64, size);
        }
        Value::UBigInt(v) => {
            if v.bits() > 64 {
                return Err(ConversionError::malformed(
                    TypeTag::UBigInt,
                    format!("{} does not fit in 64 bits", v),
                )
                .into());
            }
            out.put_u64_le(low_u64(v));
        }
        Value::Float(v) => out.put_u32_le(v.to_bits()),
        Value::Double(v) => out.put_u64_le(double_to_bits(*v)),
        Value::Decimal(d) => out.put_slice(&d.serialize()),
        Value::Bool(b) => out.put_u8(*b as u8),
        Value::Varchar(s) => {
            out.put_uint_le(s.len() as u64, field.prefix_width());
            out.put_slice(s.as_bytes());
        }
        Value::Varbinary(bytes) => {
            out.put_uint_le(bytes.len() as u64, field.prefix_width());
            out.put_slice(bytes);
        }
        Value::Null => {}
    }

    Ok(required)
}

fn take_variable<'a>(field: &FieldDef, mut input: &'a [u8]) -> RowDataResult<&'a [u8]> {
    let prefix = field.prefix_width();
    if input.len() < prefix {
        return Err(RowDataError::InvalidWidth {
            field: field.name().to_string(),
            type_tag: field.type_tag(),
            width: input.len(),
        });
    }
    let len = input.get_uint_le(prefix) as usize;
    if len != input.len() {
        return Err(RowDataError::CorruptDirectory(format!(
            "field '{}' declares {} payload bytes but spans {}",
            field.name(),
            len,
            input.len()
        )));
    }
    Ok(input)
}

/// Flags word of a serialized decimal: sign in bit 31, scale in bits 16-23,
/// every other bit zero.
fn check_decimal_flags(raw: &[u8; 16]) -> RowDataResult<()> {
    let mut head = &raw[..4];
    let flags = head.get_u32_le();
    let scale = (flags >> 16) & 0xFF;
    if flags & !DECIMAL_FLAG_MASK != 0 || scale > Decimal::MAX_SCALE {
        return Err(ConversionError::malformed(
            TypeTag::Decimal,
            format!("invalid flags {:#010x}", flags),
        )
        .into());
    }
    Ok(())
}

/// Decode the `width` bytes at `buf[offset..]` as `field`'s type.
///
/// A zero width decodes to `Null` without looking at the buffer.
pub fn decode_field(
    field: &FieldDef,
    buf: &[u8],
    offset: usize,
    width: usize,
) -> RowDataResult<Value> {
    if width == 0 {
        return Ok(Value::Null);
    }
    unsupported(field)?;

    let end = offset
        .checked_add(width)
        .filter(|end| *end <= buf.len())
        .ok_or(RowDataError::BufferTooSmall {
            required: offset.saturating_add(width),
            available: buf.len(),
        })?;

    if let FieldWidth::Fixed(size) = field.width() {
        if width != size {
            return Err(RowDataError::InvalidWidth {
                field: field.name().to_string(),
                type_tag: field.type_tag(),
                width,
            });
        }
    }

    let mut input = &buf[offset..end];
    let value = match field.type_tag() {
        TypeTag::Int => Value::Int(input.get_int_le(width) as i32),
        TypeTag::Long => Value::Long(input.get_int_le(width)),
        TypeTag::UInt => Value::UInt(input.get_uint_le(width) as u32),
        TypeTag::UBigInt => Value::UBigInt(BigUint::from(input.get_u64_le())),
        TypeTag::Float => Value::Float(f32::from_bits(input.get_u32_le())),
        TypeTag::Double => Value::Double(bits_to_double(input.get_u64_le())),
        TypeTag::Decimal => {
            let mut raw = [0u8; 16];
            input.copy_to_slice(&mut raw);
            check_decimal_flags(&raw)?;
            Value::Decimal(Decimal::deserialize(raw))
        }
        TypeTag::Bool => match input.get_u8() {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            other => {
                return Err(ConversionError::malformed(
                    TypeTag::Bool,
                    format!("invalid boolean byte {:#04x}", other),
                )
                .into())
            }
        },
        TypeTag::Date => Value::Date(input.get_i32_le()),
        TypeTag::Time => Value::Time(input.get_i64_le()),
        TypeTag::Timestamp => Value::Timestamp(input.get_i64_le()),
        TypeTag::Varchar => {
            let payload = take_variable(field, input)?;
            let text = String::from_utf8(payload.to_vec())
                .map_err(|e| ConversionError::malformed(TypeTag::Varchar, e.to_string()))?;
            Value::Varchar(text)
        }
        TypeTag::Varbinary => Value::Varbinary(take_variable(field, input)?.to_vec()),
        TypeTag::Null => Value::Null,
        TypeTag::Unsupported => unreachable!("rejected above"),
    };

    Ok(value)
}
