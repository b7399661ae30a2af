//! Bitwise operator family: `bitand`, `bitor`, `bitxor`, `leftshift` and
//! `rightshift`.
//!
//! Operands are read as non-negative integers of arbitrary precision and
//! every result is masked to its low 64 bits. An operand that cannot be
//! extracted (inconvertible kind, unparsable text, negative shift amount) is
//! logged at debug level and the result is `0`; evaluation carries on.

use crate::access::Row;
use crate::expression::composer::ExpressionComposer;
use crate::expression::eval::{ExpressionEvaluation, LiteralEvaluation};
use crate::expression::{Expression, ExpressionError, ExpressionResult};
use crate::types::extract::{get_long, get_ubigint, mask_u64};
use crate::types::{ConversionError, ConversionResult, TypeTag, Value, ValueHolder};
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;

/// Bitwise operators over unsigned 64-bit operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitOperator {
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
}

impl BitOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BitOperator::BitwiseAnd => "BITWISE_AND",
            BitOperator::BitwiseOr => "BITWISE_OR",
            BitOperator::BitwiseXor => "BITWISE_XOR",
            BitOperator::LeftShift => "LEFT_SHIFT",
            BitOperator::RightShift => "RIGHT_SHIFT",
        }
    }

    /// Name the operator is registered under
    pub fn function_name(&self) -> &'static str {
        match self {
            BitOperator::BitwiseAnd => "bitand",
            BitOperator::BitwiseOr => "bitor",
            BitOperator::BitwiseXor => "bitxor",
            BitOperator::LeftShift => "leftshift",
            BitOperator::RightShift => "rightshift",
        }
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, BitOperator::LeftShift | BitOperator::RightShift)
    }

    /// Expected operand types: the shift amount is a signed long
    pub fn operand_types(&self) -> [TypeTag; 2] {
        if self.is_shift() {
            [TypeTag::UBigInt, TypeTag::Long]
        } else {
            [TypeTag::UBigInt, TypeTag::UBigInt]
        }
    }

    /// Compute the unmasked result.
    pub fn apply(&self, left: &Value, right: &Value) -> ConversionResult<BigUint> {
        let lhs = get_ubigint(left)?;
        match self {
            BitOperator::BitwiseAnd => Ok(lhs & get_ubigint(right)?),
            BitOperator::BitwiseOr => Ok(lhs | get_ubigint(right)?),
            BitOperator::BitwiseXor => Ok(lhs ^ get_ubigint(right)?),
            BitOperator::LeftShift => {
                let amount = shift_amount(right)?;
                // Bits shifted past position 63 are masked off anyway.
                if amount >= 64 {
                    Ok(BigUint::zero())
                } else {
                    Ok(mask_u64(&lhs) << amount as usize)
                }
            }
            BitOperator::RightShift => {
                let amount = shift_amount(right)?;
                if amount >= lhs.bits() {
                    Ok(BigUint::zero())
                } else {
                    Ok(lhs >> amount as usize)
                }
            }
        }
    }
}

fn shift_amount(value: &Value) -> ConversionResult<u64> {
    let amount = get_long(value)?;
    u64::try_from(amount).map_err(|_| {
        ConversionError::malformed(TypeTag::Long, format!("negative shift amount {}", amount))
    })
}

/// Binary bitwise expression node
#[derive(Debug)]
pub struct BinaryBitExpression {
    op: BitOperator,
    value_type: TypeTag,
    children: Vec<Box<dyn Expression>>,
}

impl BinaryBitExpression {
    pub fn new(left: Box<dyn Expression>, op: BitOperator, right: Box<dyn Expression>) -> Self {
        let value_type = if left.value_type() == TypeTag::Null || right.value_type() == TypeTag::Null
        {
            TypeTag::Null
        } else {
            TypeTag::UBigInt
        };

        Self {
            op,
            value_type,
            children: vec![left, right],
        }
    }

    pub fn operator(&self) -> BitOperator {
        self.op
    }
}

impl Expression for BinaryBitExpression {
    fn value_type(&self) -> TypeTag {
        self.value_type
    }

    fn children(&self) -> &[Box<dyn Expression>] {
        &self.children
    }

    fn null_is_contaminating(&self) -> bool {
        true
    }

    fn evaluation(&self) -> Box<dyn ExpressionEvaluation> {
        if self.value_type == TypeTag::Null {
            return Box::new(LiteralEvaluation::null());
        }
        Box::new(BitEvaluation {
            op: self.op,
            left: self.children[0].evaluation(),
            right: self.children[1].evaluation(),
            holder: ValueHolder::typed(TypeTag::UBigInt),
        })
    }

    fn name(&self) -> String {
        self.op.as_str().to_string()
    }
}

struct BitEvaluation {
    op: BitOperator,
    left: Box<dyn ExpressionEvaluation>,
    right: Box<dyn ExpressionEvaluation>,
    holder: ValueHolder,
}

impl ExpressionEvaluation for BitEvaluation {
    fn of(&mut self, row: Arc<dyn Row>) {
        self.left.of(row.clone());
        self.right.of(row);
    }

    fn eval(&mut self) -> ExpressionResult<&Value> {
        let left = self.left.eval()?;
        let right = self.right.eval()?;
        if left.is_null() || right.is_null() {
            self.holder.put_null();
            return Ok(self.holder.get());
        }

        let result = match self.op.apply(left, right) {
            Ok(result) => result,
            Err(err) if err.is_tolerable() => {
                debug!("{} - assume 0 as input", err);
                BigUint::zero()
            }
            Err(err) => return Err(ExpressionError::Conversion(err)),
        };

        self.holder.put_ubigint(mask_u64(&result));
        Ok(self.holder.get())
    }
}

/// Composer for one bitwise operator
#[derive(Debug)]
pub struct BitComposer {
    op: BitOperator,
}

impl BitComposer {
    pub const fn new(op: BitOperator) -> Self {
        Self { op }
    }

    fn wrong_arity(&self, actual: usize) -> ExpressionError {
        ExpressionError::WrongArity {
            function: self.op.function_name().to_string(),
            expected: 2,
            actual,
        }
    }
}

impl ExpressionComposer for BitComposer {
    fn name(&self) -> &'static str {
        self.op.function_name()
    }

    fn argument_types(&self, argument_types: &mut Vec<TypeTag>) -> ExpressionResult<()> {
        if argument_types.len() != 2 {
            return Err(self.wrong_arity(argument_types.len()));
        }
        let [first, second] = self.op.operand_types();
        argument_types[0] = first;
        argument_types[1] = second;
        Ok(())
    }

    fn compose_type(&self, argument_types: &[TypeTag]) -> TypeTag {
        if argument_types.contains(&TypeTag::Null) {
            TypeTag::Null
        } else {
            TypeTag::UBigInt
        }
    }

    fn compose(
        &self,
        arguments: Vec<Box<dyn Expression>>,
    ) -> ExpressionResult<Box<dyn Expression>> {
        let [left, right]: [Box<dyn Expression>; 2] = arguments
            .try_into()
            .map_err(|arguments: Vec<_>| self.wrong_arity(arguments.len()))?;
        Ok(Box::new(BinaryBitExpression::new(left, self.op, right)))
    }
}

pub static BIT_AND_COMPOSER: BitComposer = BitComposer::new(BitOperator::BitwiseAnd);
pub static BIT_OR_COMPOSER: BitComposer = BitComposer::new(BitOperator::BitwiseOr);
pub static BIT_XOR_COMPOSER: BitComposer = BitComposer::new(BitOperator::BitwiseXor);
pub static LEFT_SHIFT_COMPOSER: BitComposer = BitComposer::new(BitOperator::LeftShift);
pub static RIGHT_SHIFT_COMPOSER: BitComposer = BitComposer::new(BitOperator::RightShift);
