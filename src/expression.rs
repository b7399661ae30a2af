//! Scalar expression framework.
//!
//! This module provides:
//! - Immutable, statically typed expression trees shared across threads
//! - Per-context evaluations that compute one value per bound row
//! - Composers that check arity and argument types before a tree is built
//! - The bitwise operator family

pub mod bitwise;
pub mod composer;
pub mod error;
pub mod eval;
pub mod expr;

pub use bitwise::{BinaryBitExpression, BitComposer, BitOperator};
pub use composer::{compose_expression, compose_scalar, scalar, scalar_names, ExpressionComposer};
pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate_expression, ExpressionEvaluation};
pub use expr::{children_evaluations, ColumnExpression, Expression, LiteralExpression};
