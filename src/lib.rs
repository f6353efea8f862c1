pub mod ast;
pub mod cli;
pub mod document;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{Expression, Opcode, Token};
pub use document::{DocumentFormatError, DocumentParser, parse_document, parse_file};
pub use evaluator::{EvalErrorKind, Evaluator, ExpressionEvaluationError, evaluate};
pub use lexer::Lexer;
pub use output::to_json;
pub use parser::{ExpressionSyntaxError, Parser, parse_expression};
pub use value::{Field, Value};
