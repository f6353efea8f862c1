// tests/document_tests.rs

use jsoneval::document::MAX_DEPTH;
use jsoneval::{parse_document, parse_file, DocumentFormatError, Field, Value};
use rstest::rstest;
use std::io::Write;

fn field(name: &str, value: Value) -> Field {
    Field::new(name, value)
}

fn array(values: Vec<Value>) -> Value {
    Value::Array(values)
}

// ============================================================================
// Well-formed documents
// ============================================================================

#[test]
fn test_scalar_fields() {
    let fields = parse_document(r#"{"name": "Alice", "age": 30, "delta": -7}"#).unwrap();
    assert_eq!(
        fields,
        vec![
            field("name", Value::String("Alice".into())),
            field("age", Value::Integer(30)),
            field("delta", Value::Integer(-7)),
        ]
    );
}

#[test]
fn test_field_count_matches_top_level_entries() {
    let fields = parse_document(r#"{"a": 1, "b": [1, 2], "c": {"d": "x"}, "e": "y"}"#).unwrap();
    assert_eq!(fields.len(), 4);
}

#[test]
fn test_nested_single_field() {
    let fields = parse_document(r#"{"a": {"b": {"c": 5}}}"#).unwrap();
    assert_eq!(
        fields,
        vec![field(
            "a",
            Value::Field(field("b", Value::Field(field("c", Value::Integer(5)))))
        )]
    );
}

#[test]
fn test_arrays_hold_any_value() {
    let fields = parse_document(r#"{"a": [1, "two", [3], {"four": 4}]}"#).unwrap();
    assert_eq!(
        *fields[0].value,
        array(vec![
            Value::Integer(1),
            Value::String("two".into()),
            array(vec![Value::Integer(3)]),
            Value::Field(field("four", Value::Integer(4))),
        ])
    );
}

#[test]
fn test_empty_array() {
    let fields = parse_document(r#"{"a": []}"#).unwrap();
    assert_eq!(*fields[0].value, array(vec![]));
}

#[test]
fn test_trailing_comma_in_array() {
    let fields = parse_document(r#"{"a": [1, 2,]}"#).unwrap();
    assert_eq!(*fields[0].value, array(vec![Value::Integer(1), Value::Integer(2)]));
}

#[test]
fn test_duplicate_names_are_kept_in_order() {
    let fields = parse_document(r#"{"a": 1, "a": 2}"#).unwrap();
    assert_eq!(fields, vec![field("a", Value::Integer(1)), field("a", Value::Integer(2))]);
}

#[test]
fn test_whitespace_everywhere() {
    let text = "\n\t{ \"a\"\n:\n[ 1 ,\n 2 ]\t, \"b\" : { \"c\" : \"d e\" } }\n";
    let fields = parse_document(text).unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(*fields[1].value, Value::Field(field("c", Value::String("d e".into()))));
}

#[test]
fn test_render_then_reparse() {
    let text = r#"{"a": {"b": [1, -2, "x", {"c": []}]}, "d": "say \"hi\"\n\\ \t"}"#;
    let fields = parse_document(text).unwrap();

    let rendered: Vec<String> = fields
        .iter()
        .map(|f| {
            let inner = f.to_string();
            inner[1..inner.len() - 1].to_string()
        })
        .collect();
    let reparsed = parse_document(&format!("{{{}}}", rendered.join(", "))).unwrap();

    assert_eq!(reparsed, fields);
}

// ============================================================================
// Malformed documents
// ============================================================================

#[rstest]
#[case::missing_value(r#"{"a": }"#)]
#[case::missing_colon(r#"{"a" 1}"#)]
#[case::unquoted_name(r#"{a: 1}"#)]
#[case::no_open_brace(r#""a": 1"#)]
#[case::missing_close_brace(r#"{"a": 1"#)]
#[case::bad_delimiter(r#"{"a": 1; "b": 2}"#)]
#[case::unterminated_string(r#"{"a": "abc}"#)]
#[case::unterminated_array(r#"{"a": [1, 2"#)]
#[case::bad_array_delimiter(r#"{"a": [1 2]}"#)]
#[case::multi_field_nested_object(r#"{"a": {"b": 1, "c": 2}}"#)]
#[case::empty_object(r#"{}"#)]
#[case::float(r#"{"a": 1.5}"#)]
#[case::boolean(r#"{"a": true}"#)]
#[case::bare_sign(r#"{"a": -}"#)]
#[case::overflow(r#"{"a": 99999999999999999999}"#)]
#[case::trailing(r#"{"a": 1} x"#)]
#[case::non_ascii("{\"a\": \"caf\u{e9}\"}")]
fn test_format_errors(#[case] text: &str) {
    assert!(
        matches!(parse_document(text), Err(DocumentFormatError::Syntax { .. })),
        "expected a syntax error for {}",
        text
    );
}

fn nested_arrays(depth: usize) -> String {
    format!(r#"{{"a": {}1{}}}"#, "[".repeat(depth), "]".repeat(depth))
}

#[test]
fn test_nesting_at_limit() {
    assert!(parse_document(&nested_arrays(MAX_DEPTH)).is_ok());
}

#[test]
fn test_deep_arrays_are_rejected() {
    let err = parse_document(&nested_arrays(10_000)).unwrap_err();
    assert!(matches!(err, DocumentFormatError::Syntax { .. }));
    assert!(err.to_string().starts_with("nesting deeper than 256 levels"));
}

#[test]
fn test_deep_braces_are_rejected() {
    let text = format!(r#"{{"a": {}1{}}}"#, r#"{"a": "#.repeat(10_000), "}".repeat(10_000));
    assert!(matches!(parse_document(&text), Err(DocumentFormatError::Syntax { .. })));
}

#[test]
fn test_empty_source() {
    assert!(matches!(parse_document(""), Err(DocumentFormatError::Empty)));
    assert!(matches!(parse_document(" \n\t "), Err(DocumentFormatError::Empty)));
}

#[test]
fn test_missing_value_message() {
    let err = parse_document(r#"{"a": }"#).unwrap_err();
    assert_eq!(err.to_string(), "expected a value, found '}' at line 1, column 7");
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"a": [10, 20, 30]}}"#).unwrap();

    let fields = parse_file(file.path()).unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "a");
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = parse_file(&path).unwrap_err();
    assert!(matches!(err, DocumentFormatError::Io { .. }));
    assert!(err.to_string().starts_with("could not open file"));
}
