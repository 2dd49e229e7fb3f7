//! Typed scalar values
//!
//! Values serialize externally tagged, e.g. `{"int": 5}` or `{"string": "x"}`,
//! and `"null"` for the null value.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A typed scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
}

impl Value {
    /// Create an integer value
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    /// Create a string value
    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    /// Returns the type name used in explain output and errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
        }
    }

    /// Returns the integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two values of compatible types.
    ///
    /// Numeric values compare across int/double. Returns `None` when the
    /// types are not comparable (including any null operand).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Double(b)) => (*a as f64).partial_cmp(b),
            (Value::Double(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "'{}'", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        assert_eq!(serde_json::to_value(Value::int(5)).unwrap(), json!({"int": 5}));
        assert_eq!(
            serde_json::to_value(Value::string("x")).unwrap(),
            json!({"string": "x"})
        );
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), json!("null"));

        let parsed: Value = serde_json::from_value(json!({"double": 1.5})).unwrap();
        assert_eq!(parsed, Value::Double(1.5));
    }

    #[test]
    fn test_numeric_comparison_crosses_int_and_double() {
        assert_eq!(Value::Int(3).compare(&Value::Double(2.5)), Some(Ordering::Greater));
        assert_eq!(Value::Double(3.0).compare(&Value::Int(3)), Some(Ordering::Equal));
    }

    #[test]
    fn test_mismatched_types_are_not_comparable() {
        assert_eq!(Value::Int(1).compare(&Value::string("1")), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(Value::Bool(true).compare(&Value::Int(1)), None);
    }
}
