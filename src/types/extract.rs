//! Extractors: conversions from a value's native kind to a requested raw
//! representation.
//!
//! Every extractor is a pure function of the value. Asking for a
//! representation the native kind cannot provide fails with
//! [`ConversionError::InconvertibleTypes`]; text that does not parse fails
//! with [`ConversionError::MalformedValue`].

use crate::types::{ConversionError, ConversionResult, TypeTag, Value};
use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::str::FromStr;

/// 2^63 as a double; the first value past `i64::MAX`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// IEEE-754 bit pattern of a double.
pub fn double_to_bits(value: f64) -> u64 {
    value.to_bits()
}

/// Inverse of [`double_to_bits`]; exact for every pattern, signed zero included.
pub fn bits_to_double(bits: u64) -> f64 {
    f64::from_bits(bits)
}

/// Low 64 bits of a big integer, i.e. `value AND 0xFFFFFFFFFFFFFFFF`.
pub fn low_u64(value: &BigUint) -> u64 {
    value.iter_u64_digits().next().unwrap_or(0)
}

/// `value AND 0xFFFFFFFFFFFFFFFF`, kept at arbitrary precision.
pub fn mask_u64(value: &BigUint) -> BigUint {
    BigUint::from(low_u64(value))
}

fn inconvertible(value: &Value, to: TypeTag) -> ConversionError {
    ConversionError::inconvertible(value.type_tag(), to)
}

fn out_of_range(value: &Value, to: TypeTag) -> ConversionError {
    ConversionError::malformed(to, format!("{} is out of range", value))
}

fn double_to_long(value: f64) -> ConversionResult<i64> {
    if value.is_finite() && value >= -TWO_POW_63 && value < TWO_POW_63 {
        Ok(value.trunc() as i64)
    } else {
        Err(ConversionError::malformed(
            TypeTag::Long,
            format!("{} is out of range", value),
        ))
    }
}

fn double_to_ubigint(value: f64) -> ConversionResult<BigUint> {
    if !value.is_finite() {
        return Err(ConversionError::malformed(
            TypeTag::UBigInt,
            format!("{} is not finite", value),
        ));
    }
    let truncated = value.trunc();
    if truncated >= 0.0 {
        BigUint::from_f64(truncated).ok_or_else(|| {
            ConversionError::malformed(TypeTag::UBigInt, format!("{} is out of range", value))
        })
    } else {
        // Negative inputs keep their 64-bit two's complement pattern.
        double_to_long(truncated).map(|v| BigUint::from(v as u64))
    }
}

fn parse_ubigint(text: &str) -> ConversionResult<BigUint> {
    let trimmed = text.trim();
    let malformed =
        |reason: String| ConversionError::malformed(TypeTag::UBigInt, format!("'{}': {}", text, reason));

    if trimmed.starts_with('-') {
        let signed = trimmed
            .parse::<i64>()
            .map_err(|e| malformed(e.to_string()))?;
        return Ok(BigUint::from(signed as u64));
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("invalid digit found in string".to_string()));
    }
    BigUint::from_str(digits).map_err(|e| malformed(e.to_string()))
}

/// Read a value as a signed 64-bit integer.
///
/// Unsigned big integers are reinterpreted through their low 64 bits;
/// floating point and decimal values truncate toward zero.
pub fn get_long(value: &Value) -> ConversionResult<i64> {
    match value {
        Value::Int(v) => Ok(*v as i64),
        Value::Long(v) | Value::Time(v) | Value::Timestamp(v) => Ok(*v),
        Value::UInt(v) => Ok(*v as i64),
        Value::Date(v) => Ok(*v as i64),
        Value::UBigInt(v) => Ok(low_u64(v) as i64),
        Value::Float(v) => double_to_long(*v as f64),
        Value::Double(v) => double_to_long(*v),
        Value::Decimal(d) => d
            .trunc()
            .to_i64()
            .ok_or_else(|| out_of_range(value, TypeTag::Long)),
        Value::Bool(b) => Ok(*b as i64),
        Value::Varchar(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| ConversionError::malformed(TypeTag::Long, format!("'{}': {}", s, e))),
        Value::Varbinary(_) | Value::Null => Err(inconvertible(value, TypeTag::Long)),
    }
}

/// Read a value as a non-negative integer of arbitrary precision.
///
/// Negative signed inputs map to their 64-bit two's complement pattern, so
/// `-1` reads as `0xFFFFFFFFFFFFFFFF`.
pub fn get_ubigint(value: &Value) -> ConversionResult<BigUint> {
    match value {
        Value::Int(v) => Ok(BigUint::from(*v as i64 as u64)),
        Value::Long(v) | Value::Time(v) | Value::Timestamp(v) => Ok(BigUint::from(*v as u64)),
        Value::Date(v) => Ok(BigUint::from(*v as i64 as u64)),
        Value::UInt(v) => Ok(BigUint::from(*v)),
        Value::UBigInt(v) => Ok(v.clone()),
        Value::Float(v) => double_to_ubigint(*v as f64),
        Value::Double(v) => double_to_ubigint(*v),
        Value::Decimal(d) => {
            let truncated = d.trunc();
            let converted = if truncated.is_sign_negative() {
                truncated.to_i64().map(|v| BigUint::from(v as u64))
            } else {
                truncated.to_u128().map(BigUint::from)
            };
            converted.ok_or_else(|| out_of_range(value, TypeTag::UBigInt))
        }
        Value::Bool(b) => Ok(BigUint::from(*b as u64)),
        Value::Varchar(s) => parse_ubigint(s),
        Value::Varbinary(_) | Value::Null => Err(inconvertible(value, TypeTag::UBigInt)),
    }
}

/// Read a value as a double.
pub fn get_double(value: &Value) -> ConversionResult<f64> {
    match value {
        Value::Int(v) => Ok(*v as f64),
        Value::Long(v) | Value::Time(v) | Value::Timestamp(v) => Ok(*v as f64),
        Value::UInt(v) => Ok(*v as f64),
        Value::Date(v) => Ok(*v as f64),
        Value::UBigInt(v) => v
            .to_f64()
            .ok_or_else(|| out_of_range(value, TypeTag::Double)),
        Value::Float(v) => Ok(*v as f64),
        Value::Double(v) => Ok(*v),
        Value::Decimal(d) => d
            .to_f64()
            .ok_or_else(|| out_of_range(value, TypeTag::Double)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Varchar(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ConversionError::malformed(TypeTag::Double, format!("'{}': {}", s, e))),
        Value::Varbinary(_) | Value::Null => Err(inconvertible(value, TypeTag::Double)),
    }
}

/// Read a value as a decimal.
pub fn get_decimal(value: &Value) -> ConversionResult<Decimal> {
    match value {
        Value::Int(v) => Ok(Decimal::from(*v)),
        Value::Long(v) | Value::Time(v) | Value::Timestamp(v) => Ok(Decimal::from(*v)),
        Value::UInt(v) => Ok(Decimal::from(*v)),
        Value::Date(v) => Ok(Decimal::from(*v)),
        Value::UBigInt(v) => Decimal::from_str(&v.to_string())
            .map_err(|e| ConversionError::malformed(TypeTag::Decimal, e.to_string())),
        Value::Float(v) => {
            Decimal::from_f32(*v).ok_or_else(|| out_of_range(value, TypeTag::Decimal))
        }
        Value::Double(v) => {
            Decimal::from_f64(*v).ok_or_else(|| out_of_range(value, TypeTag::Decimal))
        }
        Value::Decimal(d) => Ok(*d),
        Value::Bool(b) => Ok(Decimal::from(*b as i64)),
        Value::Varchar(s) => Decimal::from_str(s.trim()).map_err(|e| {
            ConversionError::malformed(TypeTag::Decimal, format!("'{}': {}", s, e))
        }),
        Value::Varbinary(_) | Value::Null => Err(inconvertible(value, TypeTag::Decimal)),
    }
}

/// Read a value as a boolean; numbers are true when non-zero.
pub fn get_bool(value: &Value) -> ConversionResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Int(v) => Ok(*v != 0),
        Value::Long(v) | Value::Time(v) | Value::Timestamp(v) => Ok(*v != 0),
        Value::UInt(v) => Ok(*v != 0),
        Value::Date(v) => Ok(*v != 0),
        Value::UBigInt(v) => Ok(!v.is_zero()),
        Value::Float(v) => Ok(*v != 0.0),
        Value::Double(v) => Ok(*v != 0.0),
        Value::Decimal(d) => Ok(!d.is_zero()),
        Value::Varchar(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConversionError::malformed(
                TypeTag::Bool,
                format!("'{}' is not a boolean", s),
            )),
        },
        Value::Varbinary(_) | Value::Null => Err(inconvertible(value, TypeTag::Bool)),
    }
}

/// Read a value as text.
pub fn get_string(value: &Value) -> ConversionResult<String> {
    match value {
        Value::Varchar(s) => Ok(s.clone()),
        Value::Varbinary(bytes) => String::from_utf8(bytes.clone())
            .map_err(|e| ConversionError::malformed(TypeTag::Varchar, e.to_string())),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(v) => Ok(v.to_string()),
        Value::Long(v) | Value::Time(v) | Value::Timestamp(v) => Ok(v.to_string()),
        Value::UInt(v) => Ok(v.to_string()),
        Value::Date(v) => Ok(v.to_string()),
        Value::UBigInt(v) => Ok(v.to_string()),
        Value::Float(v) => Ok(v.to_string()),
        Value::Double(v) => Ok(v.to_string()),
        Value::Decimal(d) => Ok(d.to_string()),
        Value::Null => Err(inconvertible(value, TypeTag::Varchar)),
    }
}

/// Read a value as raw bytes. Only text and binary kinds have a byte form.
pub fn get_bytes(value: &Value) -> ConversionResult<Vec<u8>> {
    match value {
        Value::Varbinary(bytes) => Ok(bytes.clone()),
        Value::Varchar(s) => Ok(s.as_bytes().to_vec()),
        _ => Err(inconvertible(value, TypeTag::Varbinary)),
    }
}

/// Convert a value to the requested kind.
///
/// `Null` converts to `Null` of any kind. Narrowing conversions are range
/// checked and fail with `MalformedValue` rather than wrapping.
pub fn convert(value: &Value, target: TypeTag) -> ConversionResult<Value> {
    if target == TypeTag::Unsupported {
        return Err(ConversionError::UnsupportedOperation { type_tag: target });
    }
    if value.is_null() {
        return Ok(Value::Null);
    }
    if value.type_tag() == target {
        return Ok(value.clone());
    }
    if !value.type_tag().can_convert_to(target) {
        return Err(inconvertible(value, target));
    }

    match target {
        TypeTag::Int => i32::try_from(get_long(value)?)
            .map(Value::Int)
            .map_err(|_| out_of_range(value, target)),
        TypeTag::Long => get_long(value).map(Value::Long),
        TypeTag::UInt => get_ubigint(value)?
            .to_u32()
            .map(Value::UInt)
            .ok_or_else(|| out_of_range(value, target)),
        TypeTag::UBigInt => get_ubigint(value).map(Value::UBigInt),
        TypeTag::Float => get_double(value).map(|v| Value::Float(v as f32)),
        TypeTag::Double => get_double(value).map(Value::Double),
        TypeTag::Decimal => get_decimal(value).map(Value::Decimal),
        TypeTag::Varchar => get_string(value).map(Value::Varchar),
        TypeTag::Varbinary => get_bytes(value).map(Value::Varbinary),
        TypeTag::Bool => get_bool(value).map(Value::Bool),
        TypeTag::Date => i32::try_from(get_long(value)?)
            .map(Value::Date)
            .map_err(|_| out_of_range(value, target)),
        TypeTag::Time => get_long(value).map(Value::Time),
        TypeTag::Timestamp => get_long(value).map(Value::Timestamp),
        TypeTag::Null | TypeTag::Unsupported => Err(inconvertible(value, target)),
    }
}
