//! State value type definitions
//!
//! Defines the tagged value stored in each element, the element cell itself and
//! typed key handles for the well-known keys shared with collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Value held by a state element: flag, number, text or a list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value yet
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer value (counters, indices)
    Int(i64),
    /// Floating point value (rewards, ratios)
    Float(f64),
    /// Text value (face names, status lines)
    Text(String),
    /// Ordered sequence (e.g. page identifiers)
    List(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "-"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
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

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Conversion from a stored value back into a concrete type
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_list()?.iter().map(T::from_value).collect()
    }
}

/// A single named value cell owned by the store
///
/// Elements handed out by the store are snapshots; mutating one has no effect
/// on the store itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub(super) value: Value,
}

impl Element {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Typed handle for a key whose value type is known by convention
///
/// The store stays type-agnostic; the handle only fixes how collaborators
/// convert the value at the boundary.
pub struct Key<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

/// Well-known keys shared between the store and its collaborators
pub mod keys {
    use super::Key;

    /// Current expression identifier, matched against the face table
    pub const FACE: Key<String> = Key::new("face");
    /// Ordered sequence of page identifiers
    pub const PAGES: Key<Vec<String>> = Key::new("pages");
    /// Index into `PAGES`
    pub const CURRENT_PAGE: Key<i64> = Key::new("current_page");
    /// Free-form status line
    pub const STATUS: Key<String> = Key::new("status");
    /// Formatted uptime (HH:MM:SS)
    pub const UPTIME: Key<String> = Key::new("uptime");
    /// Current wifi channel
    pub const CHANNEL: Key<i64> = Key::new("channel");
    /// Number of access points in view
    pub const APS: Key<i64> = Key::new("aps");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality_is_structural() {
        assert_eq!(Value::from(vec!["a", "b"]), Value::from(vec!["a", "b"]));
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::Int(1));
    }

    #[test]
    fn test_from_value_conversions() {
        let pages = Value::from(vec!["main", "stats"]);
        assert_eq!(
            Vec::<String>::from_value(&pages),
            Some(vec!["main".to_string(), "stats".to_string()])
        );
        assert_eq!(i64::from_value(&pages), None);
        assert_eq!(f64::from_value(&Value::Int(3)), Some(3.0));

        // A list with a non-text entry does not convert to Vec<String>
        let mixed = Value::List(vec![Value::from("a"), Value::Int(2)]);
        assert_eq!(Vec::<String>::from_value(&mixed), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(Value::Null.to_string(), "-");
        assert_eq!(Value::from("(◕‿‿◕)").to_string(), "(◕‿‿◕)");
    }

    #[test]
    fn test_deserialize_untagged() {
        let value: Value = serde_yaml::from_str("[main, 2, 1.5, true, ~]").unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::from("main"),
                Value::Int(2),
                Value::Float(1.5),
                Value::Bool(true),
                Value::Null,
            ])
        );
    }
}
