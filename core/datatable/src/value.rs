//! FILENAME: core/datatable/src/value.rs
//! PURPOSE: Defines the value stored in a single table cell.
//! CONTEXT: Detail tables and report tables both hold `Value`s. `Value::Null`
//! is the null sentinel: it marks a missing measure, a dimension column that
//! does not apply to a report row, or a statistic that cannot be computed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The content of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric content, or `None` for anything that is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// Renders the value the way it appears in filter metadata.
/// Integral numbers are printed without a fractional part (2021, not 2021.0).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_strips_integral_fraction() {
        assert_eq!(Value::Number(2021.0).to_string(), "2021");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::text("Dept 1").to_string(), "Dept 1");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some(4.0)), Value::Number(4.0));
    }

    #[test]
    fn test_json_untagged_form() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, 1.5, "a", true]"#).unwrap();
        assert_eq!(
            values,
            vec![Value::Null, Value::Number(1.5), Value::text("a"), Value::Boolean(true)]
        );
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    }
}
