use std::fmt;

/// A node of a parsed document.
///
/// Documents are built from four shapes only: strings, integers, arrays and
/// fields. A [`Field`] is a value in its own right, which is how
/// brace-wrapped sub-objects nest inside arrays and inside other fields.
///
/// Every container owns its children, so dropping a value drops the whole
/// subtree below it.
///
/// # Examples
///
/// ```
/// use jsoneval::{Field, Value};
///
/// let string = Value::String("hello".to_string());
/// let integer = Value::Integer(42);
/// let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
/// let field = Value::Field(Field::new("answer", Value::Integer(42)));
///
/// assert_eq!(array.to_string(), "[1, 2]");
/// assert_eq!(field.to_string(), r#"{"answer": 42}"#);
/// # let _ = (string, integer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text with escape sequences already resolved
    String(String),

    /// 64-bit signed integer
    Integer(i64),

    /// Ordered sequence of values, in document order
    Array(Vec<Value>),

    /// A single name/value pair
    Field(Field),
}

/// A name paired with exactly one owned value.
///
/// The root of a document is a `Vec<Field>`; fields are looked up by exact,
/// case-sensitive name and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: Box<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Field {
            name: name.into(),
            value: Box::new(value),
        }
    }
}

impl Value {
    /// Get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as field
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Value::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Human-readable name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Array(_) => "array",
            Value::Field(_) => "field",
        }
    }

    /// Text form of the value, same as its `Display` output.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write_quoted(f, s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Field(field) => write!(f, "{}", field),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_quoted(f, &self.name)?;
        write!(f, ": {}}}", self.value)
    }
}

/// Writes `text` between double quotes, escaping it so the document reader
/// resolves it back to the same characters.
fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in text.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0c}' => f.write_str("\\f")?,
            '\u{07}' => f.write_str("\\a")?,
            '\u{0b}' => f.write_str("\\v")?,
            '\0' => f.write_str("\\0")?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str("\"")
}

impl From<Field> for Value {
    fn from(field: Field) -> Self {
        Value::Field(field)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

#[test]
fn test_render_nested() {
    let value = Value::Field(Field::new(
        "a",
        Value::Array(vec![
            Value::Integer(-1),
            Value::String("x".into()),
            Value::Field(Field::new("b", Value::Array(vec![]))),
        ]),
    ));
    assert_eq!(value.render(), r#"{"a": [-1, "x", {"b": []}]}"#);
}

#[test]
fn test_render_escapes_strings() {
    let value = Value::Field(Field::new("s", Value::from("say \"hi\"\n\\")));
    assert_eq!(value.render(), r#"{"s": "say \"hi\"\n\\"}"#);
}

#[test]
fn test_accessors() {
    let array = Value::Array(vec![Value::Integer(7)]);
    assert_eq!(array.as_array().map(|items| items.len()), Some(1));
    assert_eq!(array.as_integer(), None);
    assert!(Value::Field(Field::new("f", 1i64.into())).as_field().is_some());
}

#[test]
fn test_type_names() {
    assert_eq!(Value::Integer(1).type_name(), "integer");
    assert_eq!(Value::Array(vec![]).type_name(), "array");
    assert_eq!(Value::from("s").type_name(), "string");
}
