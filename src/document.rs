//! Recursive-descent reader for documents.
//!
//! The document grammar looks like JSON but is narrower:
//!
//! ```text
//! document := '{' field (',' field)* '}'
//! field    := string ':' value
//! value    := '{' field '}'        // exactly one field
//!           | '[' (value (',' value)* ','?)? ']'
//!           | string
//!           | integer
//! ```
//!
//! There are no floats, booleans or nulls, and a brace that appears as a
//! value wraps exactly one field rather than an arbitrary map. The reader
//! keeps a single character of lookahead and skips whitespace before every
//! structural token.

use std::{fs, io, path::Path, path::PathBuf};

use log::{debug, trace};
use thiserror::Error;

use crate::value::{Field, Value};

/// Errors raised while reading a document.
#[derive(Debug, Error)]
pub enum DocumentFormatError {
    /// The document file could not be opened or read
    #[error("could not open file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source contained nothing but whitespace
    #[error("empty document")]
    Empty,

    /// The text violated the grammar
    #[error("{message} at line {line}, column {column}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
}

/// Reads a document from a file on disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Field>, DocumentFormatError> {
    let path = path.as_ref();
    debug!("reading document from {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| DocumentFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text)
}

/// Reads a document from text, returning its top-level fields in order.
pub fn parse_document(text: &str) -> Result<Vec<Field>, DocumentFormatError> {
    let fields = DocumentParser::new(text).parse()?;
    debug!("parsed document with {} top-level fields", fields.len());
    Ok(fields)
}

/// Resolves the character following a backslash inside a string.
fn escape_char(code: char) -> char {
    match code {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{08}',
        'f' => '\u{0c}',
        'a' => '\u{07}',
        'v' => '\u{0b}',
        '0' => '\0',
        // '\\', '\'', '"' and unknown codes stand for themselves
        other => other,
    }
}

/// Deepest nesting of arrays and braces the reader accepts.
pub const MAX_DEPTH: usize = 256;

fn is_printable(ch: char) -> bool {
    ch.is_ascii() && !ch.is_ascii_control()
}

pub struct DocumentParser {
    input: Vec<char>,
    position: usize,
    depth: usize,
}

impl DocumentParser {
    pub fn new(input: &str) -> Self {
        DocumentParser {
            input: input.chars().collect(),
            position: 0,
            depth: 0,
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

    /// Skips whitespace, then consumes and returns the next character.
    fn next_structural(&mut self) -> Option<char> {
        self.skip_whitespace();
        let ch = self.current_char();
        if ch.is_some() {
            self.advance();
        }
        ch
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> DocumentFormatError {
        let mut line = 1;
        let mut column = 1;
        for ch in self.input.iter().take(position) {
            if *ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        DocumentFormatError::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Error pointing at the character that was just consumed.
    fn error(&self, message: impl Into<String>) -> DocumentFormatError {
        self.error_at(self.position.saturating_sub(1), message)
    }

    fn expect(&mut self, expected: char, context: &str) -> Result<(), DocumentFormatError> {
        match self.next_structural() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.error(format!(
                "expected '{}' {}, found '{}'",
                expected, context, ch
            ))),
            None => Err(self.error_at(
                self.position,
                format!("expected '{}' {}, found end of input", expected, context),
            )),
        }
    }

    /// Parses the whole input as a document.
    pub fn parse(mut self) -> Result<Vec<Field>, DocumentFormatError> {
        self.skip_whitespace();
        if self.current_char().is_none() {
            return Err(DocumentFormatError::Empty);
        }

        self.expect('{', "to open the document")?;

        let mut fields = Vec::new();
        loop {
            fields.push(self.read_field()?);

            match self.next_structural() {
                Some(',') => continue,
                Some('}') => break,
                Some(ch) => {
                    return Err(self.error(format!(
                        "expected ',' or '}}' after field, found '{}'",
                        ch
                    )));
                }
                None => {
                    return Err(
                        self.error_at(self.position, "unterminated document, expected '}'")
                    );
                }
            }
        }

        self.skip_whitespace();
        if let Some(ch) = self.current_char() {
            return Err(self.error_at(
                self.position,
                format!("trailing characters after document: '{}'", ch),
            ));
        }

        Ok(fields)
    }

    fn read_field(&mut self) -> Result<Field, DocumentFormatError> {
        self.expect('"', "to start a field name")?;
        let name = self.read_string()?;
        self.expect(':', "after field name")?;
        let value = self.read_value()?;

        trace!("read field '{}'", name);
        Ok(Field::new(name, value))
    }

    fn read_value(&mut self) -> Result<Value, DocumentFormatError> {
        self.skip_whitespace();

        match self.current_char() {
            Some('{') => {
                self.advance();
                self.nested(|parser| {
                    let field = parser.read_field()?;
                    parser.expect('}', "after nested field")?;
                    Ok(Value::Field(field))
                })
            }
            Some('[') => {
                self.advance();
                self.nested(Self::read_array)
            }
            Some('"') => {
                self.advance();
                Ok(Value::String(self.read_string()?))
            }
            Some(_) => self.read_integer(),
            None => Err(self.error_at(self.position, "expected a value, found end of input")),
        }
    }

    /// Runs `read` one nesting level deeper; the opener is already consumed.
    fn nested(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<Value, DocumentFormatError>,
    ) -> Result<Value, DocumentFormatError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_DEPTH)));
        }

        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    /// Reads array elements; the opening '[' is already consumed.
    fn read_array(&mut self) -> Result<Value, DocumentFormatError> {
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some(']') => {
                    self.advance();
                    break;
                }
                None => {
                    return Err(self.error_at(self.position, "unterminated array, expected ']'"));
                }
                Some(_) => {}
            }

            items.push(self.read_value()?);

            match self.next_structural() {
                Some(',') => continue,
                Some(']') => break,
                Some(ch) => {
                    return Err(self.error(format!(
                        "expected ',' or ']' in array, found '{}'",
                        ch
                    )));
                }
                None => {
                    return Err(self.error_at(self.position, "unterminated array, expected ']'"));
                }
            }
        }

        Ok(Value::Array(items))
    }

    /// Reads string contents; the opening quote is already consumed.
    fn read_string(&mut self) -> Result<String, DocumentFormatError> {
        let start = self.position.saturating_sub(1);
        let mut result = String::new();

        while let Some(ch) = self.current_char() {
            self.advance();

            if !is_printable(ch) {
                return Err(self.error(format!(
                    "invalid character {:?} in string",
                    ch
                )));
            }

            match ch {
                '"' => return Ok(result),
                '\\' => match self.current_char() {
                    Some(code) if is_printable(code) => {
                        self.advance();
                        result.push(escape_char(code));
                    }
                    Some(code) => {
                        self.advance();
                        return Err(self.error(format!(
                            "invalid character {:?} in escape sequence",
                            code
                        )));
                    }
                    None => break,
                },
                _ => result.push(ch),
            }
        }

        Err(self.error_at(start, "unterminated string"))
    }

    fn read_integer(&mut self) -> Result<Value, DocumentFormatError> {
        let start = self.position;
        let mut literal = String::new();

        if let Some(sign @ ('-' | '+')) = self.current_char() {
            literal.push(sign);
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                literal.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if !literal.chars().any(|c| c.is_ascii_digit()) {
            let found = self.input.get(start).copied().unwrap_or(' ');
            return Err(self.error_at(start, format!("expected a value, found '{}'", found)));
        }

        literal
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| self.error_at(start, format!("integer literal out of range: {}", literal)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_table() {
        let fields = parse_document(r#"{"s": "a\nb\t\"q\"\\\0\z"}"#).unwrap();
        assert_eq!(*fields[0].value, Value::String("a\nb\t\"q\"\\\0z".to_string()));
    }

    #[test]
    fn test_error_location() {
        let err = parse_document("{\n  \"a\" 1}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected ':' after field name, found '1' at line 2, column 7"
        );
    }

    #[test]
    fn test_tab_in_string_is_rejected() {
        assert!(parse_document("{\"a\": \"x\ty\"}").is_err());
    }
}
