use crate::access::{RowDataError, RowDataResult};
use crate::types::Value;

/// A row that expression evaluation can read columns from
pub trait Row: Send + Sync {
    fn field_count(&self) -> usize;

    /// Value of the field at `index`, decoded if necessary
    fn value(&self, index: usize) -> RowDataResult<Value>;
}

/// Row held as already-decoded values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValuesRow {
    values: Vec<Value>,
}

impl ValuesRow {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for ValuesRow {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl Row for ValuesRow {
    fn field_count(&self) -> usize {
        self.values.len()
    }

    fn value(&self, index: usize) -> RowDataResult<Value> {
        self.values
            .get(index)
            .cloned()
            .ok_or(RowDataError::FieldIndexOutOfBounds {
                index,
                field_count: self.values.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_row() {
        let row = ValuesRow::from(vec![Value::Long(1), Value::Null]);
        assert_eq!(row.field_count(), 2);
        assert_eq!(row.value(0), Ok(Value::Long(1)));
        assert_eq!(row.value(1), Ok(Value::Null));
        assert_eq!(
            row.value(2),
            Err(RowDataError::FieldIndexOutOfBounds {
                index: 2,
                field_count: 2
            })
        );
    }

    #[test]
    fn test_empty_row() {
        let row = ValuesRow::default();
        assert_eq!(row.field_count(), 0);
        assert!(row.values().is_empty());
        assert!(row.value(0).is_err());
    }
}
