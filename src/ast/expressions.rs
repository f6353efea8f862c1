use std::fmt;

use crate::{
    ast::Opcode,
    evaluator::{Evaluator, ExpressionEvaluationError},
    value::{Field, Value},
};

/// Abstract Syntax Tree node representing a parsed query.
///
/// The meaning of `literal` depends on the opcode:
///
/// - `Get` / `Default`: a field name (or, for `Default`, an integer constant)
/// - `Subscript`: the index text
/// - arithmetic and functions: unused, left empty
///
/// Cloning copies the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub opcode: Opcode,
    pub literal: String,
    pub children: Vec<Expression>,
}

impl Default for Expression {
    /// A bare `Get` with an empty literal; rejected by evaluation until filled in.
    fn default() -> Self {
        Expression::new(Opcode::Get, "")
    }
}

impl Expression {
    pub fn new(opcode: Opcode, literal: impl Into<String>) -> Self {
        Expression {
            opcode,
            literal: literal.into(),
            children: Vec::new(),
        }
    }

    /// A `Default` terminal: a top-level field name or an integer constant.
    pub fn leaf(literal: impl Into<String>) -> Self {
        Expression::new(Opcode::Default, literal)
    }

    pub fn with_children(
        opcode: Opcode,
        literal: impl Into<String>,
        children: Vec<Expression>,
    ) -> Self {
        Expression {
            opcode,
            literal: literal.into(),
            children,
        }
    }

    /// A two-operand arithmetic node.
    pub fn binary(opcode: Opcode, left: Expression, right: Expression) -> Self {
        Expression::with_children(opcode, "", vec![left, right])
    }

    /// Evaluates this expression against a sequence of top-level fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsoneval::{parse_document, parse_expression, Value};
    ///
    /// let fields = parse_document(r#"{"a": {"b": 5}}"#).unwrap();
    /// let expr = parse_expression("a.b").unwrap();
    ///
    /// assert_eq!(expr.evaluate(&fields).unwrap(), Value::Integer(5));
    /// ```
    pub fn evaluate(&self, fields: &[Field]) -> Result<Value, ExpressionEvaluationError> {
        Evaluator::new(fields).evaluate(self)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let arrow = if depth > 0 { "-> " } else { "" };

        if self.literal.is_empty() {
            writeln!(f, "{}{}{}", indent, arrow, self.opcode)?;
        } else {
            writeln!(f, "{}{}{} {}", indent, arrow, self.opcode, self.literal)?;
        }

        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Renders the tree one node per line, children indented under their parent:
///
/// ```text
/// GET a
///   -> SUBSCRIPT 1
///     -> DEFAULT b
/// ```
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
