use serde_json::Value as Json;
use std::fmt;

/// A single cell of a normalized row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The scalar field was absent from the upstream record
    Missing,
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Fill value for target columns a row does not carry
    pub const ZERO: Value = Value::Integer(0);

    /// Convert an upstream JSON value into a cell. Nested arrays and objects are kept as
    /// their JSON text.
    pub fn from_json(json: &Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Real).unwrap_or(Value::Null),
            },
            Json::String(s) => Value::Text(s.clone()),
            Json::Array(_) | Json::Object(_) => Value::Text(json.to_string()),
        }
    }

    /// Convert a counter entry. Only JSON numbers are counters.
    pub fn counter_from_json(json: &Json) -> Option<Self> {
        match json {
            Json::Number(_) => Some(Self::from_json(json)),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Text written into a CSV field. Absent and null values become empty fields.
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::Missing | Value::Null => String::new(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            Value::Missing | Value::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            Value::Bool(b) => stmt.raw_bind_parameter(idx, i64::from(*b))?,
            Value::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            Value::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            Value::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "<missing>"),
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other.to_csv_field()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Short name of a JSON value's type, used in error messages
pub fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(&json!(5)), Value::Integer(5));
        assert_eq!(Value::from_json(&json!(1.5)), Value::Real(1.5));
        assert_eq!(Value::from_json(&json!("SCAR")), Value::Text("SCAR".into()));
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!([1, 2])), Value::Text("[1,2]".into()));
    }

    #[test]
    fn test_counter_rejects_non_numbers() {
        assert_eq!(Value::counter_from_json(&json!(3)), Some(Value::Integer(3)));
        assert_eq!(Value::counter_from_json(&json!("3")), None);
        assert_eq!(Value::counter_from_json(&json!(true)), None);
        assert_eq!(Value::counter_from_json(&json!(null)), None);
    }

    #[test]
    fn test_csv_field() {
        assert_eq!(Value::Missing.to_csv_field(), "");
        assert_eq!(Value::Bool(false).to_csv_field(), "False");
        assert_eq!(Value::Real(2.25).to_csv_field(), "2.25");
        assert_eq!(Value::ZERO.to_csv_field(), "0");
    }
}
