use std::fmt;

/// Lexical token of a query.
///
/// Whitespace is stripped before lexing, so the token stream never carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Literals
    /// Unsigned integer literal, kept as its source text
    ///
    /// The text is carried verbatim so that subscripts and constants keep the
    /// exact digits the user wrote (and overflow is reported at evaluation).
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// ```
    Integer(String),

    // Identifiers
    /// Field name or function keyword
    ///
    /// Must start with a letter or underscore, followed by letters, digits or
    /// underscores. `min`, `max` and `size` are only keywords when followed by `(`.
    ///
    /// # Examples
    /// ```text
    /// orders
    /// item_count
    /// MAX
    /// ```
    Identifier(String),

    // Arithmetic
    /// Addition
    Plus,

    /// Subtraction or unary negation
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    // Delimiters
    /// Left bracket opening a subscript
    LBracket,

    /// Right bracket
    RBracket,

    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Dot chaining a nested field access
    Dot,

    /// Comma separating function arguments
    Comma,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(digits) => write!(f, "integer '{}'", digits),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Dot => f.write_str("'.'"),
            Token::Comma => f.write_str("','"),
            Token::Eof => f.write_str("end of query"),
        }
    }
}
