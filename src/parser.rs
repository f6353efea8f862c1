use std::mem;

use log::debug;
use thiserror::Error;

use crate::{
    ast::{Expression, Opcode, Token},
    lexer::{self, Lexer},
};

/// Errors raised while turning a query string into an [`Expression`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionSyntaxError {
    /// Nothing but whitespace
    #[error("empty query")]
    Empty,

    /// A `)` or `]` with no opener before it
    #[error("unmatched '{ch}' at position {position}")]
    UnmatchedCloser { ch: char, position: usize },

    /// An opener that is never closed
    #[error("unclosed '{0}'")]
    Unclosed(char),

    /// A character outside the query alphabet
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    /// The token stream did not match the grammar
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: Token },

    /// A call to a name that is not `min`, `max` or `size`
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A function called with the wrong number of arguments
    #[error("function '{name}' takes {expected}, got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    /// `.` after something that is not a field name, e.g. `a[0].b`
    #[error("field access must follow a field name")]
    MisplacedDot,

    /// The query nests, or builds a tree, deeper than [`MAX_DEPTH`]
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Limit on both parser recursion and the height of the resulting tree.
pub const MAX_DEPTH: usize = 256;

/// Parses a raw query string into an expression tree.
///
/// Whitespace is insignificant and removed first; bracket balance is
/// checked before the grammar is applied.
pub fn parse_expression(query: &str) -> Result<Expression, ExpressionSyntaxError> {
    let stripped = lexer::preprocess(query)?;
    let mut parser = Parser::new(Lexer::new(&stripped))?;
    let expr = parser.parse()?;

    debug!("parsed query '{}' into {} root", stripped, expr.opcode);
    Ok(expr)
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
    /// Height of the expression most recently built
    height: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ExpressionSyntaxError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            depth: 0,
            height: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ExpressionSyntaxError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> ExpressionSyntaxError {
        ExpressionSyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current_token.clone(),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ExpressionSyntaxError> {
        if self.current_token != expected {
            return Err(self.unexpected(&expected.to_string()));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        self.current_token == *token
    }

    /// Runs `parse` one nesting level deeper.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Expression, ExpressionSyntaxError>,
    ) -> Result<Expression, ExpressionSyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionSyntaxError::TooDeep(MAX_DEPTH));
        }

        self.depth += 1;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    /// Records a new node placed above a subtree of height `below`.
    fn grow(&mut self, below: usize) -> Result<(), ExpressionSyntaxError> {
        if below >= MAX_DEPTH {
            return Err(ExpressionSyntaxError::TooDeep(MAX_DEPTH));
        }
        self.height = below + 1;
        Ok(())
    }

    /// Parse primary expressions: integers, names, chains, calls and groups
    fn parse_primary(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(digits) => {
                self.advance()?;
                self.height = 1;
                Ok(Expression::leaf(digits))
            }

            Token::Identifier(name) => {
                self.advance()?;

                if self.check(&Token::LParen) {
                    self.nested(|parser| parser.parse_call(name))
                } else if self.check(&Token::Dot) {
                    self.advance()?; // consume '.'

                    if !matches!(self.current_token, Token::Identifier(_)) {
                        return Err(self.unexpected("identifier after '.'"));
                    }

                    // The remainder is evaluated inside the nested field
                    let rest = self.nested(Self::parse_postfix)?;
                    self.grow(self.height)?;
                    Ok(Expression::with_children(Opcode::Get, name, vec![rest]))
                } else {
                    self.height = 1;
                    Ok(Expression::leaf(name))
                }
            }

            Token::LParen => {
                self.advance()?;
                let expr = self.nested(Self::parse_expression)?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }

            token => {
                self.current_token = token;
                Err(self.unexpected("an operand"))
            }
        }
    }

    /// Parse `min(...)`, `max(...)` or `size(...)`; the name is already consumed
    fn parse_call(&mut self, name: String) -> Result<Expression, ExpressionSyntaxError> {
        let opcode =
            Opcode::from_keyword(&name).ok_or(ExpressionSyntaxError::UnknownFunction(name.clone()))?;

        self.expect(Token::LParen)?;

        let mut args = vec![];
        let mut tallest = 0;
        while !self.check(&Token::RParen) {
            args.push(self.parse_expression()?);
            tallest = tallest.max(self.height);

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
                if self.check(&Token::RParen) {
                    return Err(self.unexpected("an argument after ','"));
                }
            }
        }
        self.expect(Token::RParen)?;

        match (opcode, args.len()) {
            (_, 0) => Err(ExpressionSyntaxError::Arity {
                name,
                expected: "at least one argument",
                got: 0,
            }),
            (Opcode::Size, n) if n > 1 => Err(ExpressionSyntaxError::Arity {
                name,
                expected: "exactly one argument",
                got: n,
            }),
            _ => {
                self.grow(tallest)?;
                Ok(Expression::with_children(opcode, "", args))
            }
        }
    }

    /// Parse subscripts trailing a primary expression
    fn parse_postfix(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        let mut expr = self.parse_primary()?;

        while self.check(&Token::LBracket) {
            self.advance()?; // consume '['

            let index = match mem::replace(&mut self.current_token, Token::Eof) {
                Token::Integer(digits) => digits,
                token => {
                    self.current_token = token;
                    return Err(self.unexpected("an integer index"));
                }
            };
            self.advance()?;
            self.expect(Token::RBracket)?;

            self.grow(self.height)?;
            expr = Expression::with_children(Opcode::Subscript, index, vec![expr]);
        }

        if self.check(&Token::Dot) {
            return Err(ExpressionSyntaxError::MisplacedDot);
        }

        Ok(expr)
    }

    /// Parse unary minus, represented as `0 - operand`
    fn parse_unary(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        if self.check(&Token::Minus) {
            self.advance()?;
            let operand = self.nested(Self::parse_unary)?;
            self.grow(self.height)?;
            return Ok(Expression::binary(
                Opcode::Sub,
                Expression::leaf("0"),
                operand,
            ));
        }
        self.parse_postfix()
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current_token {
                Token::Star => Opcode::Mult,
                Token::Slash => Opcode::Div,
                _ => break,
            };

            self.advance()?;
            let left_height = self.height;
            let right = self.parse_unary()?;
            self.grow(left_height.max(self.height))?;

            left = Expression::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => Opcode::Add,
                Token::Minus => Opcode::Sub,
                _ => break,
            };

            self.advance()?;
            let left_height = self.height;
            let right = self.parse_multiplicative()?;
            self.grow(left_height.max(self.height))?;

            left = Expression::binary(op, left, right);
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        self.parse_additive()
    }

    /// Parse a complete query, rejecting anything left over
    pub fn parse(&mut self) -> Result<Expression, ExpressionSyntaxError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("an operator or end of query"));
        }
        Ok(expr)
    }
}
