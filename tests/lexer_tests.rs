// tests/lexer_tests.rs

use jsoneval::ast::Token;
use jsoneval::lexer::{preprocess, Lexer};
use jsoneval::ExpressionSyntaxError;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        (".", Token::Dot),
        (",", Token::Comma),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

// ============================================================================
// Identifiers and Numbers
// ============================================================================

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("item_count _private x1"),
        vec![
            Token::Identifier("item_count".to_string()),
            Token::Identifier("_private".to_string()),
            Token::Identifier("x1".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_integers_keep_their_digits() {
    assert_eq!(
        tokens("007 42"),
        vec![
            Token::Integer("007".to_string()),
            Token::Integer("42".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_number_then_identifier_splits() {
    assert_eq!(
        tokens("1a"),
        vec![
            Token::Integer("1".to_string()),
            Token::Identifier("a".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_full_query() {
    assert_eq!(
        tokens("max(a.b)-a[0]"),
        vec![
            Token::Identifier("max".to_string()),
            Token::LParen,
            Token::Identifier("a".to_string()),
            Token::Dot,
            Token::Identifier("b".to_string()),
            Token::RParen,
            Token::Minus,
            Token::Identifier("a".to_string()),
            Token::LBracket,
            Token::Integer("0".to_string()),
            Token::RBracket,
            Token::Eof,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("a%b");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("a".to_string())));
    assert_eq!(
        lexer.next_token(),
        Err(ExpressionSyntaxError::UnexpectedChar { ch: '%', position: 1 })
    );
}

// ============================================================================
// Preprocessing
// ============================================================================

#[test]
fn test_preprocess_strips_whitespace() {
    assert_eq!(preprocess(" a . b [ 1 ]\t+\n2 ").unwrap(), "a.b[1]+2");
}

#[test]
fn test_preprocess_rejects_empty() {
    assert_eq!(preprocess("  \n "), Err(ExpressionSyntaxError::Empty));
}

#[test]
fn test_preprocess_counts_independently() {
    // Interleaving is not a balance error; the grammar rejects it later
    assert!(preprocess("([)]").is_ok());
    assert!(preprocess("(a[0])").is_ok());
}

#[test]
fn test_preprocess_rejects_early_closer() {
    assert_eq!(
        preprocess("a)("),
        Err(ExpressionSyntaxError::UnmatchedCloser { ch: ')', position: 1 })
    );
    assert_eq!(
        preprocess("]a["),
        Err(ExpressionSyntaxError::UnmatchedCloser { ch: ']', position: 0 })
    );
}

#[test]
fn test_preprocess_rejects_unclosed() {
    assert_eq!(preprocess("a[1"), Err(ExpressionSyntaxError::Unclosed('[')));
    assert_eq!(preprocess("min(a"), Err(ExpressionSyntaxError::Unclosed('(')));
}
