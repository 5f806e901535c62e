// File: src/value.rs
// Purpose: Values carried in a file's data map

use std::collections::HashMap;
use std::fmt;

/// Supported value types in file data
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
    Null,
}

/// A file's data map
pub type Data = HashMap<String, Value>;

impl Value {
    /// Convert value to boolean
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(arr) => !arr.is_empty(),
            Value::Object(obj) => !obj.is_empty(),
            Value::Null => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Resolves a dotted name (`user.name`) against a data map
///
/// ```
/// use rhtmx_dispatch::{lookup, Data, Value};
///
/// let mut user = Data::new();
/// user.insert("name".into(), Value::from("Bob"));
/// let mut data = Data::new();
/// data.insert("user".into(), Value::Object(user));
///
/// assert_eq!(lookup(&data, "user.name"), Some(&Value::from("Bob")));
/// assert_eq!(lookup(&data, "user.age"), None);
/// ```
pub fn lookup<'a>(data: &'a Data, name: &str) -> Option<&'a Value> {
    let mut parts = name.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            // Integers print without the trailing .0; past 1e15 the cast would lose digits
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(arr) => {
                let items: Vec<String> = arr.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Object(_) => f.write_str("[Object]"),
            Value::Null => Ok(()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Builds a data map from a JSON object; other JSON values give an empty map
pub fn data_from_json(json: serde_json::Value) -> Data {
    match Value::from(json) {
        Value::Object(map) => map,
        _ => Data::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(-42.0).to_string(), "-42");
        assert_eq!(Value::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_to_bool() {
        assert!(Value::from("x").to_bool());
        assert!(!Value::from("").to_bool());
        assert!(!Value::Null.to_bool());
    }

    #[test]
    fn test_from_json() {
        let data = data_from_json(json!({
            "title": "Home",
            "site": { "name": "Docs", "year": 2024 },
            "tags": ["a"]
        }));

        assert_eq!(lookup(&data, "title"), Some(&Value::from("Home")));
        assert_eq!(lookup(&data, "site.year"), Some(&Value::Number(2024.0)));
        assert_eq!(lookup(&data, "tags.0"), None);
        assert!(data_from_json(json!([1, 2])).is_empty());
    }
}
