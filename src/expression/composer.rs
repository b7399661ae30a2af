//! Expression composition: arity and type checking at construction time.
//!
//! Composition runs in three steps, each of which must succeed before the
//! next: the composer's [`argument_types`](ExpressionComposer::argument_types)
//! validates arity and rewrites the expected argument types (type checked),
//! every argument's static type is checked against its expected type, and
//! finally [`compose`](ExpressionComposer::compose) builds the node
//! (composed). Nothing here looks at argument values.

use crate::expression::bitwise::{
    BIT_AND_COMPOSER, BIT_OR_COMPOSER, BIT_XOR_COMPOSER, LEFT_SHIFT_COMPOSER,
    RIGHT_SHIFT_COMPOSER,
};
use crate::expression::{Expression, ExpressionError, ExpressionResult};
use crate::types::{ConversionError, TypeTag};
use log::trace;

/// Stateless policy object bound to one operator
pub trait ExpressionComposer: Send + Sync {
    /// Name the composer is registered under
    fn name(&self) -> &'static str;

    /// Validate arity and rewrite each entry to the type the operator expects
    fn argument_types(&self, argument_types: &mut Vec<TypeTag>) -> ExpressionResult<()>;

    /// Result type for arguments of the given static types
    fn compose_type(&self, argument_types: &[TypeTag]) -> TypeTag;

    /// Build the expression node.
    ///
    /// Fails with `WrongArity` for a wrong argument count. Argument types are
    /// not checked here.
    fn compose(&self, arguments: Vec<Box<dyn Expression>>)
        -> ExpressionResult<Box<dyn Expression>>;
}

/// Every registered scalar, looked up by name
static SCALARS: [&dyn ExpressionComposer; 5] = [
    &BIT_AND_COMPOSER,
    &BIT_OR_COMPOSER,
    &BIT_XOR_COMPOSER,
    &LEFT_SHIFT_COMPOSER,
    &RIGHT_SHIFT_COMPOSER,
];

/// Find a registered composer by name (case-insensitive)
pub fn scalar(name: &str) -> Option<&'static dyn ExpressionComposer> {
    SCALARS
        .iter()
        .copied()
        .find(|composer| composer.name().eq_ignore_ascii_case(name))
}

/// Names of all registered scalars
pub fn scalar_names() -> impl Iterator<Item = &'static str> {
    SCALARS.iter().map(|composer| composer.name())
}

/// Check `arguments` against `composer` and build the expression
pub fn compose_expression(
    composer: &dyn ExpressionComposer,
    arguments: Vec<Box<dyn Expression>>,
) -> ExpressionResult<Box<dyn Expression>> {
    let actual: Vec<TypeTag> = arguments.iter().map(|arg| arg.value_type()).collect();
    let mut expected = actual.clone();
    composer.argument_types(&mut expected)?;

    for (&from, &to) in actual.iter().zip(&expected) {
        if from == TypeTag::Unsupported {
            return Err(ConversionError::UnsupportedOperation { type_tag: from }.into());
        }
        if !from.can_convert_to(to) {
            return Err(ConversionError::inconvertible(from, to).into());
        }
    }

    let result_type = composer.compose_type(&actual);
    let expression = composer.compose(arguments)?;
    trace!(
        "composed {} over {:?} as {}",
        composer.name(),
        actual,
        result_type
    );
    debug_assert_eq!(expression.value_type(), result_type);
    Ok(expression)
}

/// Look up `name` and compose it over `arguments`
pub fn compose_scalar(
    name: &str,
    arguments: Vec<Box<dyn Expression>>,
) -> ExpressionResult<Box<dyn Expression>> {
    let composer = scalar(name).ok_or_else(|| ExpressionError::UnknownFunction {
        name: name.to_string(),
    })?;
    compose_expression(composer, arguments)
}
