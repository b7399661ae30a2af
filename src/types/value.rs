use crate::types::TypeTag;
use num_bigint::BigUint;
use rust_decimal::Decimal;
use std::fmt;

/// Values that can be computed on or stored in a row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i32),
    Long(i64),
    UInt(u32),
    /// Non-negative integer of arbitrary precision; stored rows keep 64 bits.
    UBigInt(BigUint),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Varchar(String),
    Varbinary(Vec<u8>),
    Bool(bool),
    /// Days since 1970-01-01
    Date(i32),
    /// Seconds since midnight
    Time(i64),
    /// Seconds since the Unix epoch
    Timestamp(i64),
}

impl Value {
    /// Get the native type of this value
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Int(_) => TypeTag::Int,
            Value::Long(_) => TypeTag::Long,
            Value::UInt(_) => TypeTag::UInt,
            Value::UBigInt(_) => TypeTag::UBigInt,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
            Value::Decimal(_) => TypeTag::Decimal,
            Value::Varchar(_) => TypeTag::Varchar,
            Value::Varbinary(_) => TypeTag::Varbinary,
            Value::Bool(_) => TypeTag::Bool,
            Value::Date(_) => TypeTag::Date,
            Value::Time(_) => TypeTag::Time,
            Value::Timestamp(_) => TypeTag::Timestamp,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn ubigint(value: u64) -> Self {
        Value::UBigInt(BigUint::from(value))
    }

    pub fn varchar(value: impl Into<String>) -> Self {
        Value::Varchar(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::UBigInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Varchar(v) => write!(f, "'{}'", v),
            Value::Varbinary(bytes) => {
                write!(f, "X'")?;
                for b in bytes {
                    write!(f, "{:02X}", b)?;
                }
                write!(f, "'")
            }
            Value::Bool(v) => write!(f, "{}", if *v { "TRUE" } else { "FALSE" }),
            Value::Date(v) => write!(f, "DATE {}", v),
            Value::Time(v) => write!(f, "TIME {}", v),
            Value::Timestamp(v) => write!(f, "TIMESTAMP {}", v),
        }
    }
}
