use crate::{ast::Token, parser::ExpressionSyntaxError};

/// Strips all whitespace from a query and checks bracket balance.
///
/// Parentheses and square brackets are counted independently; a closer that
/// would drive its counter negative, or an opener left unclosed, rejects the
/// query before any structural parsing happens.
pub fn preprocess(query: &str) -> Result<String, ExpressionSyntaxError> {
    let stripped: String = query.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return Err(ExpressionSyntaxError::Empty);
    }

    let mut open_paren = 0usize;
    let mut open_bracket = 0usize;

    for (position, ch) in stripped.chars().enumerate() {
        match ch {
            '(' => open_paren += 1,
            '[' => open_bracket += 1,
            ')' => {
                open_paren = open_paren
                    .checked_sub(1)
                    .ok_or(ExpressionSyntaxError::UnmatchedCloser { ch, position })?;
            }
            ']' => {
                open_bracket = open_bracket
                    .checked_sub(1)
                    .ok_or(ExpressionSyntaxError::UnmatchedCloser { ch, position })?;
            }
            _ => {}
        }
    }

    if open_paren > 0 {
        return Err(ExpressionSyntaxError::Unclosed('('));
    }
    if open_bracket > 0 {
        return Err(ExpressionSyntaxError::Unclosed('['));
    }

    Ok(stripped)
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_number(&mut self) -> Token {
        let mut digits = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::Integer(digits)
    }

    pub fn next_token(&mut self) -> Result<Token, ExpressionSyntaxError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::Eof,
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                return Ok(Token::Identifier(self.read_identifier()));
            }
            Some(ch) if ch.is_ascii_digit() => return Ok(self.read_number()),
            Some('.') => Token::Dot,
            Some(',') => Token::Comma,
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Star,
            Some('/') => Token::Slash,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some('[') => Token::LBracket,
            Some(']') => Token::RBracket,
            Some(ch) => {
                return Err(ExpressionSyntaxError::UnexpectedChar {
                    ch,
                    position: self.position,
                });
            }
        };

        if token != Token::Eof {
            self.advance();
        }
        Ok(token)
    }

    /// Lexes the remaining input, ending with a single `Token::Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ExpressionSyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_keywords_are_identifiers() {
    let mut lexer = Lexer::new("MAX(a)");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("MAX".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("a".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_chain_and_subscript() {
    let mut lexer = Lexer::new("a.b[10]");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("a".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Dot));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("b".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::LBracket));
    assert_eq!(lexer.next_token(), Ok(Token::Integer("10".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::RBracket));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}
