//! Expression evaluation implementation.

use crate::access::Row;
use crate::expression::{Expression, ExpressionError, ExpressionResult};
use crate::types::{Value, ValueHolder, ValueTarget};
use std::sync::Arc;

/// Mutable, per-context mirror of an [`Expression`].
///
/// Each execution context builds its own tree with
/// [`Expression::evaluation`], binds a row with [`of`](Self::of), and calls
/// [`eval`](Self::eval) once per row. The returned value lives in the node's
/// scratch slot and is overwritten by the next call.
pub trait ExpressionEvaluation: Send {
    /// Bind the row subsequent evaluations read from, recursively
    fn of(&mut self, row: Arc<dyn Row>);

    /// Compute this node's value for the bound row
    fn eval(&mut self) -> ExpressionResult<&Value>;
}

/// Evaluation that always yields the same value
#[derive(Debug)]
pub struct LiteralEvaluation {
    holder: ValueHolder,
}

impl LiteralEvaluation {
    pub fn new(value: Value) -> Self {
        Self {
            holder: ValueHolder::holding(value),
        }
    }

    /// Constant null, used in place of null-contaminated expressions
    pub fn null() -> Self {
        Self::new(Value::Null)
    }
}

impl ExpressionEvaluation for LiteralEvaluation {
    fn of(&mut self, _row: Arc<dyn Row>) {}

    fn eval(&mut self) -> ExpressionResult<&Value> {
        Ok(self.holder.get())
    }
}

/// Evaluation reading one field of the bound row
pub struct ColumnEvaluation {
    position: usize,
    row: Option<Arc<dyn Row>>,
    holder: ValueHolder,
}

impl ColumnEvaluation {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            row: None,
            holder: ValueHolder::new(),
        }
    }
}

impl ExpressionEvaluation for ColumnEvaluation {
    fn of(&mut self, row: Arc<dyn Row>) {
        self.row = Some(row);
    }

    fn eval(&mut self) -> ExpressionResult<&Value> {
        let row_size = self.row.as_ref().map_or(0, |row| row.field_count());
        let row = match &self.row {
            Some(row) if self.position < row_size => row,
            _ => {
                return Err(ExpressionError::ColumnIndexOutOfBounds {
                    index: self.position,
                    row_size,
                })
            }
        };

        let value = row.value(self.position)?;
        self.holder.put(value)?;
        Ok(self.holder.get())
    }
}

/// Helper function to evaluate an expression once against a row
pub fn evaluate_expression(expr: &dyn Expression, row: Arc<dyn Row>) -> ExpressionResult<Value> {
    let mut evaluation = expr.evaluation();
    evaluation.of(row);
    evaluation.eval().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{FieldDef, RowData, RowDef, ValuesRow};
    use crate::expression::{ColumnExpression, LiteralExpression};
    use crate::types::TypeTag;

    fn values_row(values: Vec<Value>) -> Arc<dyn Row> {
        Arc::new(ValuesRow::new(values))
    }

    #[test]
    fn test_literal_evaluation() -> ExpressionResult<()> {
        let mut evaluation = LiteralExpression::new(Value::Long(42)).evaluation();
        assert_eq!(evaluation.eval()?, &Value::Long(42));

        // Binding a row changes nothing
        evaluation.of(values_row(vec![Value::Long(1)]));
        assert_eq!(evaluation.eval()?, &Value::Long(42));

        let mut null = LiteralEvaluation::null();
        assert_eq!(null.eval()?, &Value::Null);
        Ok(())
    }

    #[test]
    fn test_column_evaluation_rebinds() -> ExpressionResult<()> {
        let column = ColumnExpression::new(1, TypeTag::Varchar);
        let mut evaluation = column.evaluation();

        evaluation.of(values_row(vec![Value::Long(1), Value::varchar("a")]));
        assert_eq!(evaluation.eval()?, &Value::varchar("a"));

        evaluation.of(values_row(vec![Value::Long(2), Value::Null]));
        assert_eq!(evaluation.eval()?, &Value::Null);
        Ok(())
    }

    #[test]
    fn test_column_out_of_bounds() {
        let mut evaluation = ColumnExpression::new(3, TypeTag::Long).evaluation();
        assert_eq!(
            evaluation.eval().unwrap_err(),
            ExpressionError::ColumnIndexOutOfBounds {
                index: 3,
                row_size: 0
            }
        );

        evaluation.of(values_row(vec![Value::Long(1)]));
        assert_eq!(
            evaluation.eval().unwrap_err(),
            ExpressionError::ColumnIndexOutOfBounds {
                index: 3,
                row_size: 1
            }
        );
    }

    #[test]
    fn test_column_over_row_data() -> ExpressionResult<()> {
        let row_def = Arc::new(RowDef::new(vec![
            FieldDef::new("id", TypeTag::Long),
            FieldDef::new("price", TypeTag::Double),
        ]));
        let row = RowData::encode(row_def.clone(), &[Value::Long(7), Value::Double(9.5)])?;

        let price = ColumnExpression::for_field(&row_def.fields()[1]);
        assert_eq!(
            evaluate_expression(&price, Arc::new(row))?,
            Value::Double(9.5)
        );
        Ok(())
    }
}
