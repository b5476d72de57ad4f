//! Runtime values for the interpreter

use std::fmt;

/// Runtime value
///
/// Object payloads are owned: a value's heap data is freed when the value is
/// dropped, and handing a value to a caller moves that ownership with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Null,
    /// IEEE-754 double
    Number(f64),
    /// Heap-backed object
    Object(Obj),
}

/// Heap object kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Obj {
    String(ObjString),
}

/// Owned string buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjString {
    chars: Box<str>,
}

impl ObjString {
    pub fn new(chars: impl Into<Box<str>>) -> Self {
        ObjString { chars: chars.into() }
    }

    /// Byte length
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.chars
    }

    /// New string holding `self` followed by `other`
    pub fn concat(&self, other: &ObjString) -> ObjString {
        let mut chars = String::with_capacity(self.len() + other.len());
        chars.push_str(&self.chars);
        chars.push_str(&other.chars);
        ObjString::new(chars)
    }
}

impl Value {
    pub fn string(chars: impl Into<Box<str>>) -> Self {
        Value::Object(Obj::String(ObjString::new(chars)))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Object(Obj::String(_)) => "string",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Object(Obj::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Object(obj) => write!(f, "{obj}"),
        }
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::String(s) => f.write_str(s.as_str()),
        }
    }
}
