use std::fmt;

use log::trace;
use thiserror::Error;

use crate::{
    ast::{Expression, Opcode},
    value::{Field, Value},
};

/// What went wrong while evaluating a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// No field with the requested name in scope
    UnknownField,

    /// A value had the wrong shape for the operation (e.g. indexing a string)
    WrongShape,

    /// A literal was missing or could not be interpreted
    InvalidLiteral,

    /// Division by zero
    DivideByZero,

    /// Subscript past the end of an array
    IndexOutOfRange,

    /// `min`/`max` over nothing
    EmptyArray,

    /// Integer arithmetic overflowed
    Overflow,

    /// The node carries the `Invalid` opcode
    InvalidOpcode,

    /// A node has the wrong number of children for its opcode
    MalformedExpression,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EvalErrorKind::UnknownField => "unknown field",
            EvalErrorKind::WrongShape => "wrong value shape",
            EvalErrorKind::InvalidLiteral => "invalid literal",
            EvalErrorKind::DivideByZero => "division by zero",
            EvalErrorKind::IndexOutOfRange => "index out of range",
            EvalErrorKind::EmptyArray => "empty array",
            EvalErrorKind::Overflow => "integer overflow",
            EvalErrorKind::InvalidOpcode => "invalid opcode",
            EvalErrorKind::MalformedExpression => "malformed expression",
        };
        f.write_str(text)
    }
}

/// Error raised when a query cannot be evaluated against a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ExpressionEvaluationError {
    pub kind: EvalErrorKind,
    pub message: String,
}

impl ExpressionEvaluationError {
    pub fn new(kind: EvalErrorKind, message: impl Into<String>) -> Self {
        ExpressionEvaluationError {
            kind,
            message: message.into(),
        }
    }
}

type EvalResult<T> = Result<T, ExpressionEvaluationError>;

/// Evaluates an expression against the top-level fields of a document.
pub fn evaluate(expr: &Expression, fields: &[Field]) -> Result<Value, ExpressionEvaluationError> {
    Evaluator::new(fields).evaluate(expr)
}

/// Tree-walking evaluator bound to one document.
///
/// Evaluation only reads the document and the expression, so the same
/// evaluator can run any number of expressions and always gives the same
/// answer for the same input.
pub struct Evaluator<'a> {
    fields: &'a [Field],
}

/// Finds the first field with an exactly matching name.
fn find_field<'a>(scope: &[&'a Field], name: &str) -> Option<&'a Field> {
    scope.iter().copied().find(|field| field.name == name)
}

fn is_integer_literal(literal: &str) -> bool {
    !literal.is_empty() && literal.bytes().all(|b| b.is_ascii_digit())
}

impl<'a> Evaluator<'a> {
    pub fn new(fields: &'a [Field]) -> Self {
        Evaluator { fields }
    }

    /// Evaluates `expr` with the document's top-level fields in scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsoneval::{parse_document, parse_expression, Evaluator, Value};
    ///
    /// let fields = parse_document(r#"{"a": [10, 20, 30]}"#).unwrap();
    /// let evaluator = Evaluator::new(&fields);
    ///
    /// let expr = parse_expression("a[1] + size(a)").unwrap();
    /// assert_eq!(evaluator.evaluate(&expr).unwrap(), Value::Integer(23));
    /// ```
    pub fn evaluate(&self, expr: &Expression) -> EvalResult<Value> {
        let scope: Vec<&'a Field> = self.fields.iter().collect();
        self.eval_node(expr, &scope)
    }

    fn eval_node(&self, expr: &Expression, scope: &[&'a Field]) -> EvalResult<Value> {
        trace!("evaluating {} '{}'", expr.opcode, expr.literal);

        if expr.opcode.requires_literal() && expr.literal.is_empty() {
            return Err(ExpressionEvaluationError::new(
                EvalErrorKind::InvalidLiteral,
                format!("{} requires a literal", expr.opcode),
            ));
        }

        match expr.opcode {
            Opcode::Default => self.eval_default(&expr.literal, scope),
            Opcode::Get => {
                let child = self.single_child(expr)?;
                let nested = self.nested_scope(&expr.literal, scope)?;
                self.eval_node(child, &nested)
            }
            Opcode::Subscript => {
                let child = self.single_child(expr)?;
                self.eval_subscript(&expr.literal, child, scope)
            }
            Opcode::Size => {
                let child = self.single_child(expr)?;
                match self.eval_node(child, scope)? {
                    Value::Array(items) => i64::try_from(items.len())
                        .map(Value::Integer)
                        .map_err(|_| {
                            ExpressionEvaluationError::new(
                                EvalErrorKind::Overflow,
                                "array length does not fit in an integer",
                            )
                        }),
                    other => Err(ExpressionEvaluationError::new(
                        EvalErrorKind::WrongShape,
                        format!("SIZE expects an array, found {}", other.type_name()),
                    )),
                }
            }
            Opcode::Min | Opcode::Max => self.eval_extremum(expr, scope),
            Opcode::Add => self.eval_arithmetic(expr, scope, i64::checked_add),
            Opcode::Sub => self.eval_arithmetic(expr, scope, i64::checked_sub),
            Opcode::Mult => self.eval_arithmetic(expr, scope, i64::checked_mul),
            Opcode::Div => self.eval_arithmetic(expr, scope, i64::checked_div),
            Opcode::Invalid => Err(ExpressionEvaluationError::new(
                EvalErrorKind::InvalidOpcode,
                "cannot evaluate an INVALID node",
            )),
        }
    }

    fn single_child<'e>(&self, expr: &'e Expression) -> EvalResult<&'e Expression> {
        match expr.children.as_slice() {
            [child] => Ok(child),
            children => Err(ExpressionEvaluationError::new(
                EvalErrorKind::MalformedExpression,
                format!(
                    "{} expects exactly one operand, found {}",
                    expr.opcode,
                    children.len()
                ),
            )),
        }
    }

    fn eval_default(&self, literal: &str, scope: &[&'a Field]) -> EvalResult<Value> {
        if is_integer_literal(literal) {
            return literal.parse::<i64>().map(Value::Integer).map_err(|_| {
                ExpressionEvaluationError::new(
                    EvalErrorKind::InvalidLiteral,
                    format!("integer literal out of range: {}", literal),
                )
            });
        }

        find_field(scope, literal)
            .map(|field| (*field.value).clone())
            .ok_or_else(|| {
                ExpressionEvaluationError::new(
                    EvalErrorKind::UnknownField,
                    format!("no field named '{}'", literal),
                )
            })
    }

    /// Resolves the fields visible inside the field called `name`.
    ///
    /// A nested field exposes itself; an array exposes its elements, which
    /// must all be fields.
    fn nested_scope(&self, name: &str, scope: &[&'a Field]) -> EvalResult<Vec<&'a Field>> {
        let field = find_field(scope, name).ok_or_else(|| {
            ExpressionEvaluationError::new(
                EvalErrorKind::UnknownField,
                format!("no field named '{}'", name),
            )
        })?;

        let value: &'a Value = &field.value;
        match value {
            Value::Field(inner) => Ok(vec![inner]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_field().ok_or_else(|| {
                        ExpressionEvaluationError::new(
                            EvalErrorKind::WrongShape,
                            format!(
                                "field '{}' holds an array with a non-field {} element",
                                name,
                                item.type_name()
                            ),
                        )
                    })
                })
                .collect(),
            other => Err(ExpressionEvaluationError::new(
                EvalErrorKind::WrongShape,
                format!(
                    "field '{}' holds {} {}, not nested fields",
                    name,
                    if matches!(other, Value::Integer(_)) { "an" } else { "a" },
                    other.type_name()
                ),
            )),
        }
    }

    fn eval_subscript(
        &self,
        literal: &str,
        child: &Expression,
        scope: &[&'a Field],
    ) -> EvalResult<Value> {
        let index = literal.parse::<usize>().map_err(|_| {
            ExpressionEvaluationError::new(
                EvalErrorKind::InvalidLiteral,
                format!("'{}' is not a valid array index", literal),
            )
        })?;

        match self.eval_node(child, scope)? {
            Value::Array(items) => {
                let len = items.len();
                items.into_iter().nth(index).ok_or_else(|| {
                    ExpressionEvaluationError::new(
                        EvalErrorKind::IndexOutOfRange,
                        format!("index {} is out of range for array of length {}", index, len),
                    )
                })
            }
            other => Err(ExpressionEvaluationError::new(
                EvalErrorKind::WrongShape,
                format!("cannot index into {}", other.type_name()),
            )),
        }
    }

    fn eval_integer(&self, expr: &Expression, scope: &[&'a Field], op: Opcode) -> EvalResult<i64> {
        let value = self.eval_node(expr, scope)?;
        value.as_integer().ok_or_else(|| {
            ExpressionEvaluationError::new(
                EvalErrorKind::WrongShape,
                format!("{} expects integer operands, found {}", op, value.type_name()),
            )
        })
    }

    fn eval_extremum(&self, expr: &Expression, scope: &[&'a Field]) -> EvalResult<Value> {
        let numbers: Vec<i64> = match expr.children.as_slice() {
            [] => {
                return Err(ExpressionEvaluationError::new(
                    EvalErrorKind::MalformedExpression,
                    format!("{} expects at least one operand", expr.opcode),
                ));
            }
            [child] => match self.eval_node(child, scope)? {
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_integer().ok_or_else(|| {
                            ExpressionEvaluationError::new(
                                EvalErrorKind::WrongShape,
                                format!(
                                    "{} expects an array of integers, found a {} element",
                                    expr.opcode,
                                    item.type_name()
                                ),
                            )
                        })
                    })
                    .collect::<EvalResult<_>>()?,
                other => {
                    return Err(ExpressionEvaluationError::new(
                        EvalErrorKind::WrongShape,
                        format!("{} expects an array, found {}", expr.opcode, other.type_name()),
                    ));
                }
            },
            children => children
                .iter()
                .map(|child| self.eval_integer(child, scope, expr.opcode))
                .collect::<EvalResult<_>>()?,
        };

        let result = if expr.opcode == Opcode::Min {
            numbers.iter().min()
        } else {
            numbers.iter().max()
        };

        result.copied().map(Value::Integer).ok_or_else(|| {
            ExpressionEvaluationError::new(
                EvalErrorKind::EmptyArray,
                format!("{} of an empty array", expr.opcode),
            )
        })
    }

    /// Applies `op` to both operands; `None` from `op` means overflow.
    fn eval_arithmetic(
        &self,
        expr: &Expression,
        scope: &[&'a Field],
        op: fn(i64, i64) -> Option<i64>,
    ) -> EvalResult<Value> {
        let [left, right] = expr.children.as_slice() else {
            return Err(ExpressionEvaluationError::new(
                EvalErrorKind::MalformedExpression,
                format!(
                    "{} expects two operands, found {}",
                    expr.opcode,
                    expr.children.len()
                ),
            ));
        };

        let a = self.eval_integer(left, scope, expr.opcode)?;
        let b = self.eval_integer(right, scope, expr.opcode)?;

        if expr.opcode == Opcode::Div && b == 0 {
            return Err(ExpressionEvaluationError::new(
                EvalErrorKind::DivideByZero,
                format!("cannot divide {} by zero", a),
            ));
        }

        op(a, b).map(Value::Integer).ok_or_else(|| {
            ExpressionEvaluationError::new(
                EvalErrorKind::Overflow,
                format!("{} of {} and {} overflows", expr.opcode, a, b),
            )
        })
    }
}
