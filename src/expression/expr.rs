//! Expression tree nodes.
//!
//! Nodes are immutable once composed and can be shared across threads; all
//! per-row state lives in the [`ExpressionEvaluation`] each node produces.

use crate::access::FieldDef;
use crate::expression::eval::{ColumnEvaluation, ExpressionEvaluation, LiteralEvaluation};
use crate::types::{TypeTag, Value};
use std::fmt;

/// Immutable, statically typed node of a scalar computation tree
pub trait Expression: fmt::Debug + Send + Sync {
    /// Result type, known before any row is processed
    fn value_type(&self) -> TypeTag;

    fn children(&self) -> &[Box<dyn Expression>];

    /// Whether a statically null child forces this node's result to null
    fn null_is_contaminating(&self) -> bool {
        false
    }

    /// Whether this expression contains no column references
    fn is_constant(&self) -> bool {
        self.children().iter().all(|child| child.is_constant())
    }

    /// Create a fresh evaluation tree for one execution context
    fn evaluation(&self) -> Box<dyn ExpressionEvaluation>;

    /// Short label used when describing the tree
    fn name(&self) -> String;

    fn describe(&self, out: &mut String) {
        out.push_str(&self.name());
        let children = self.children();
        if !children.is_empty() {
            out.push('(');
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                child.describe(out);
            }
            out.push(')');
        }
    }
}

impl fmt::Display for dyn Expression + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.describe(&mut out);
        f.write_str(&out)
    }
}

/// Evaluations for every child, in order
pub fn children_evaluations(expression: &dyn Expression) -> Vec<Box<dyn ExpressionEvaluation>> {
    expression
        .children()
        .iter()
        .map(|child| child.evaluation())
        .collect()
}

/// Literal constant value
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpression {
    value: Value,
}

impl LiteralExpression {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Expression for LiteralExpression {
    fn value_type(&self) -> TypeTag {
        self.value.type_tag()
    }

    fn children(&self) -> &[Box<dyn Expression>] {
        &[]
    }

    fn is_constant(&self) -> bool {
        true
    }

    fn evaluation(&self) -> Box<dyn ExpressionEvaluation> {
        Box::new(LiteralEvaluation::new(self.value.clone()))
    }

    fn name(&self) -> String {
        self.value.to_string()
    }
}

/// Reference to a field of the bound row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnExpression {
    position: usize,
    type_tag: TypeTag,
    name: Option<String>,
}

impl ColumnExpression {
    pub fn new(position: usize, type_tag: TypeTag) -> Self {
        Self {
            position,
            type_tag,
            name: None,
        }
    }

    /// Column typed and named after a schema field
    pub fn for_field(field: &FieldDef) -> Self {
        Self {
            position: field.position(),
            type_tag: field.type_tag(),
            name: Some(field.name().to_string()),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl Expression for ColumnExpression {
    fn value_type(&self) -> TypeTag {
        self.type_tag
    }

    fn children(&self) -> &[Box<dyn Expression>] {
        &[]
    }

    fn is_constant(&self) -> bool {
        false
    }

    fn evaluation(&self) -> Box<dyn ExpressionEvaluation> {
        Box::new(ColumnEvaluation::new(self.position))
    }

    fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("${}", self.position),
        }
    }
}
