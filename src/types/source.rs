//! Read and write capabilities over values.
//!
//! A [`ValueSource`] yields a value, converted on request to another kind. A
//! [`ValueTarget`] accepts a value and commits it to a backing store. Both
//! are implemented by the scalar [`ValueHolder`] and by the field-bound row
//! views in [`crate::access`].

use crate::types::extract;
use crate::types::{ConversionError, TypeTag, Value};
use num_bigint::BigUint;

/// Something a value can be read from
pub trait ValueSource {
    type Error: From<ConversionError>;

    /// Native kind of the current value
    fn type_tag(&self) -> TypeTag;

    fn is_null(&self) -> bool {
        self.type_tag() == TypeTag::Null
    }

    /// Current value in its native kind
    fn value(&self) -> Result<Value, Self::Error>;

    /// Current value converted to `tag`
    fn read_as(&self, tag: TypeTag) -> Result<Value, Self::Error> {
        let value = self.value()?;
        Ok(extract::convert(&value, tag)?)
    }
}

/// Something a value can be committed to
pub trait ValueTarget {
    type Error: From<ConversionError>;

    /// Kind the target stores
    fn target_type(&self) -> TypeTag;

    /// Commit a value already of the target's kind (or `Null`)
    fn put(&mut self, value: Value) -> Result<(), Self::Error>;

    /// Convert `value` to `tag`, then commit it
    fn write_as(&mut self, value: &Value, tag: TypeTag) -> Result<(), Self::Error> {
        let converted = extract::convert(value, tag)?;
        self.put(converted)
    }
}

/// Scratch slot holding one scalar value.
///
/// Evaluation nodes own one each and overwrite it on every row. A holder
/// created with [`typed`](Self::typed) stores one declared kind and converts
/// what it is given; an untyped holder from [`new`](Self::new) takes any kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueHolder {
    declared: Option<TypeTag>,
    value: Value,
}

impl ValueHolder {
    pub fn new() -> Self {
        Self {
            declared: None,
            value: Value::Null,
        }
    }

    /// Holder that only stores values of `tag` (or null)
    pub fn typed(tag: TypeTag) -> Self {
        Self {
            declared: Some(tag),
            value: Value::Null,
        }
    }

    pub fn holding(value: Value) -> Self {
        Self {
            declared: None,
            value,
        }
    }

    pub fn get(&self) -> &Value {
        &self.value
    }

    pub fn put_null(&mut self) {
        self.value = Value::Null;
    }

    pub fn put_ubigint(&mut self, value: BigUint) {
        self.value = Value::UBigInt(value);
    }

    pub fn clear(&mut self) {
        self.put_null();
    }
}

impl Default for ValueHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSource for ValueHolder {
    type Error = ConversionError;

    fn type_tag(&self) -> TypeTag {
        self.value.type_tag()
    }

    fn value(&self) -> Result<Value, ConversionError> {
        Ok(self.value.clone())
    }
}

impl ValueTarget for ValueHolder {
    type Error = ConversionError;

    /// Declared kind; an untyped holder reports the kind it currently holds
    fn target_type(&self) -> TypeTag {
        self.declared.unwrap_or_else(|| self.value.type_tag())
    }

    fn put(&mut self, value: Value) -> Result<(), ConversionError> {
        self.value = match self.declared {
            Some(tag) => extract::convert(&value, tag)?,
            None => value,
        };
        Ok(())
    }
}
