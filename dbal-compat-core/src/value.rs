//! Parameter values, declared parameter types and parameter keys

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, QueryError, Result};

/// A SQL value that can be bound to a placeholder
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 64-bit float
    F64(f64),
    /// String value
    String(String),
    /// Bytes value
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the dynamic type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) | Value::I64(_) => "int",
            Value::F64(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Integer view of the value, if it is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I32(i) => Some(i64::from(*i)),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Text view of the value; bytes are decoded lossily, null has no text
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::I32(i) => Some(i.to_string()),
            Value::I64(i) => Some(i.to_string()),
            Value::F64(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

// Implement From for common types
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<u32> for Value {
    fn from(val: u32) -> Self {
        Value::I64(i64::from(val))
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// Declared data type of a bound parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParamType {
    Null,
    Int,
    Str,
    Bool,
    /// Derive the type from the value when it is bound
    #[default]
    Auto,
}

impl ParamType {
    /// The type `Auto` resolves to for this value
    pub fn guess(value: &Value) -> ParamType {
        match value {
            Value::Bool(_) => ParamType::Bool,
            Value::I32(_) | Value::I64(_) => ParamType::Int,
            Value::Null => ParamType::Null,
            _ => ParamType::Str,
        }
    }

    /// Resolve a declared type against a value.
    ///
    /// `Auto` becomes the guessed type; any other declared type must equal the
    /// guessed one.
    pub fn resolve(self, placeholder: &str, value: &Value) -> Result<ParamType> {
        let actual = ParamType::guess(value);
        if self == ParamType::Auto || self == actual {
            return Ok(actual);
        }
        Err(Error::Query(QueryError::TypeMismatch {
            placeholder: placeholder.to_string(),
            expected: self.as_str(),
            found: value.type_name(),
        }))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Null => "null",
            ParamType::Int => "int",
            ParamType::Str => "string",
            ParamType::Bool => "bool",
            ParamType::Auto => "auto",
        }
    }
}

/// Identifies a parameter inside SQL text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamKey {
    /// 1-based position of a `?` marker
    Positional(usize),
    /// Named marker including the leading colon, e.g. `:uid`
    Named(String),
}

impl ParamKey {
    /// Named key, adding the leading colon when it is missing
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.starts_with(':') {
            ParamKey::Named(name)
        } else {
            ParamKey::Named(format!(":{name}"))
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Positional(n) => write!(f, "{n}"),
            ParamKey::Named(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ParamKey {
    fn from(position: usize) -> Self {
        ParamKey::Positional(position)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Named(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Named(name)
    }
}

/// A parameter ready to be handed to the driver
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub key: ParamKey,
    pub value: Value,
    /// Never `Auto`
    pub param_type: ParamType,
}

impl BoundParameter {
    /// Bind a value with an automatically derived type
    pub fn auto(key: ParamKey, value: Value) -> Self {
        let param_type = ParamType::guess(&value);
        Self {
            key,
            value,
            param_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_default_is_null() {
        assert_eq!(Value::default(), Value::Null);
    }

    #[test]
    fn test_named_key_adds_colon() {
        assert_eq!(ParamKey::named("uid"), ParamKey::Named(":uid".to_string()));
        assert_eq!(ParamKey::named(":uid"), ParamKey::Named(":uid".to_string()));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(42i32)), Value::I32(42));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_guess_types() {
        assert_eq!(ParamType::guess(&Value::Bool(false)), ParamType::Bool);
        assert_eq!(ParamType::guess(&Value::I32(1)), ParamType::Int);
        assert_eq!(ParamType::guess(&Value::I64(1)), ParamType::Int);
        assert_eq!(ParamType::guess(&Value::Null), ParamType::Null);
        assert_eq!(ParamType::guess(&Value::F64(1.5)), ParamType::Str);
        assert_eq!(ParamType::guess(&Value::from("x")), ParamType::Str);
    }

    #[test]
    fn test_resolve_declared_type() {
        assert_eq!(
            ParamType::Auto.resolve(":a", &Value::I32(4)).unwrap(),
            ParamType::Int
        );
        assert_eq!(
            ParamType::Int.resolve(":a", &Value::I64(4)).unwrap(),
            ParamType::Int
        );

        let err = ParamType::Int.resolve(":a", &Value::from("4")).unwrap_err();
        assert!(matches!(
            err,
            Error::Query(QueryError::TypeMismatch {
                expected: "int",
                found: "string",
                ..
            })
        ));
        assert!(ParamType::Null.resolve(":a", &Value::Bool(true)).is_err());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Value::Bytes(b"pages".to_vec()).as_text().unwrap(), "pages");
        assert_eq!(Value::I64(7).as_text().unwrap(), "7");
        assert_eq!(Value::Null.as_text(), None);
    }

    #[test]
    fn test_param_key_display() {
        assert_eq!(ParamKey::from(2).to_string(), "2");
        assert_eq!(ParamKey::from(":uid").to_string(), ":uid");
    }
}
