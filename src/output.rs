//! Result formatting.
//!
//! A result can be printed in two ways:
//!
//! - **Text** via [`OutputFormat::Text`] - the value's own rendering
//!   (`{"name": value}`, `[a, b]`, `"text"`, `42`)
//! - **JSON** via [`to_json()`] - a `serde_json::Value`, compact or pretty.
//!   A field becomes a one-key object.
//!
//! # Examples
//!
//! ```
//! use jsoneval::{Field, Value};
//! use jsoneval::output::{OutputFormat, to_json};
//!
//! let value = Value::Field(Field::new("n", Value::Integer(1)));
//!
//! assert_eq!(OutputFormat::Text.format(&value).unwrap(), r#"{"n": 1}"#);
//! assert_eq!(OutputFormat::Json.format(&value).unwrap(), r#"{"n":1}"#);
//! assert_eq!(to_json(&value), serde_json::json!({"n": 1}));
//! ```

use crate::value::Value;

/// How a result is written to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    PrettyJson,
}

impl OutputFormat {
    pub fn format(self, value: &Value) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Text => Ok(value.render()),
            OutputFormat::Json => serde_json::to_string(&to_json(value)),
            OutputFormat::PrettyJson => serde_json::to_string_pretty(&to_json(value)),
        }
    }
}

/// Convert a Value to serde_json::Value
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Integer(n) => serde_json::Value::Number((*n).into()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Field(field) => {
            let mut map = serde_json::Map::new();
            map.insert(field.name.clone(), to_json(&field.value));
            serde_json::Value::Object(map)
        }
    }
}

#[test]
fn test_pretty_json_escapes_strings() {
    let value = Value::Array(vec![Value::String("a\"b".into()), Value::Integer(-3)]);
    assert_eq!(
        OutputFormat::PrettyJson.format(&value).unwrap(),
        "[\n  \"a\\\"b\",\n  -3\n]"
    );
}
