//! JSON value types.
//!
//! [`JsonValue`] is a closed sum type over the six JSON variants. Callers
//! inspect it with `match` or with the typed accessors below.
//!
//! - Numbers are `f64`; `1` and `1.0` are the same value.
//! - Objects use `BTreeMap`, so equality ignores source key order. The
//!   sorted iteration order is an implementation detail.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::JsonError;

/// Map type backing [`JsonValue::Object`].
pub type Map = BTreeMap<String, JsonValue>;

/// A parsed JSON value.
///
/// Every value owns its data; nothing borrows from the parsed input.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    /// JSON null literal
    #[default]
    Null,
    /// JSON boolean (true/false)
    Bool(bool),
    /// JSON number as a 64-bit float
    Number(f64),
    /// JSON string with all escapes decoded
    String(String),
    /// JSON array of values, in source order
    Array(Vec<JsonValue>),
    /// JSON object; a repeated key keeps the last value
    Object(Map),
}

impl JsonValue {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number value if this is a Number, None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value from an object by key.
    ///
    /// Returns `None` both for a missing key and for a non-object; a present
    /// key holding `null` returns `Some(&JsonValue::Null)`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get a value from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    /// Returns the type name as a string for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    /// Nesting depth of this value: 0 for scalars, 1 for a flat container.
    ///
    /// Walks the tree with an explicit stack, so trees built with
    /// `Limits::unbounded()` cannot overflow the call stack here.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];

        while let Some((value, level)) = stack.pop() {
            match value {
                JsonValue::Array(arr) => {
                    max = max.max(level + 1);
                    stack.extend(arr.iter().map(|v| (v, level + 1)));
                }
                JsonValue::Object(map) => {
                    max = max.max(level + 1);
                    stack.extend(map.values().map(|v| (v, level + 1)));
                }
                _ => {}
            }
        }

        max
    }
}

impl FromStr for JsonValue {
    type Err = JsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parser::parse(s.as_bytes())
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(f64::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(arr: Vec<JsonValue>) -> Self {
        JsonValue::Array(arr)
    }
}

impl From<Map> for JsonValue {
    fn from(map: Map) -> Self {
        JsonValue::Object(map)
    }
}

impl FromIterator<(String, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        JsonValue::Object(iter.into_iter().collect())
    }
}
