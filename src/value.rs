//! Value types for the parameterization engine.
//!
//! A single [`Value`] enum represents both template documents and context
//! values. It mirrors the JSON data model (null, bool, number, string,
//! array, ordered object) plus a function variant for caller-supplied
//! callables. Objects use `IndexMap` so key insertion order survives the
//! walk; document-order evaluation depends on it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{ParamError, ParamResult};

/// A caller-supplied callable: takes already-evaluated arguments and
/// returns one value. Callables may close over mutable state (through
/// atomics, mutexes, etc.); the engine invokes them in strict document
/// order and never caches their results.
pub type Callable = Arc<dyn Fn(&[Value]) -> ParamResult<Value> + Send + Sync>;

/// A template or context value.
#[derive(Clone, Default)]
pub enum Value {
    /// JSON null
    #[default]
    Null,
    /// A boolean: `true`, `false`
    Bool(bool),
    /// An integer: `120`, `-5`
    Int(i64),
    /// A floating-point number: `1.2`, `0.5`
    Float(f64),
    /// A string: `"hello"`
    Str(String),
    /// An array of values
    Array(Vec<Value>),
    /// An object - uses IndexMap for ordered keys
    Object(IndexMap<String, Value>),
    /// A caller-supplied function (context only)
    Func(Callable),
}

impl Value {
    /// Get the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Func(_) => "function",
        }
    }

    /// Build a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Build a function value from a closure.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> ParamResult<Value> + Send + Sync + 'static,
    {
        Value::Func(Arc::new(f))
    }

    /// True for Int and Float values.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of this value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> ParamResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(ParamError::type_error(format!(
                "expected bool, got {}",
                self.type_name()
            ))),
        }
    }

    pub fn as_str(&self) -> ParamResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(ParamError::type_error(format!(
                "expected string, got {}",
                self.type_name()
            ))),
        }
    }

    pub fn as_array(&self) -> ParamResult<&Vec<Value>> {
        match self {
            Value::Array(a) => Ok(a),
            _ => Err(ParamError::type_error(format!(
                "expected array, got {}",
                self.type_name()
            ))),
        }
    }

    pub fn as_object(&self) -> ParamResult<&IndexMap<String, Value>> {
        match self {
            Value::Object(o) => Ok(o),
            _ => Err(ParamError::type_error(format!(
                "expected object, got {}",
                self.type_name()
            ))),
        }
    }

    /// The textual form used by interpolation markers and by `+` when
    /// one operand is a string. Containers and functions have no
    /// textual form and fail with a type error.
    pub fn display_string(&self) -> ParamResult<String> {
        match self {
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(n.to_string()),
            Value::Str(s) => Ok(s.clone()),
            Value::Array(_) | Value::Object(_) | Value::Func(_) => {
                Err(ParamError::type_error(format!(
                    "cannot convert {} to a string",
                    self.type_name()
                )))
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(map) => f.debug_map().entries(map).finish(),
            Value::Func(_) => write!(f, "<function>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Functions compare by identity
            (Value::Func(a), Value::Func(b)) => Arc::ptr_eq(a, b),
            // Numerically equal Int/Float compare equal
            (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
            _ => false,
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = ParamError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::Number(n.into()),
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .ok_or_else(|| {
                    ParamError::type_error("non-finite float has no JSON representation")
                })?,
            Value::Str(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .into_iter()
                    .map(serde_json::Value::try_from)
                    .collect::<ParamResult<_>>()?,
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| Ok((k, serde_json::Value::try_from(v)?)))
                    .collect::<ParamResult<_>>()?,
            ),
            Value::Func(_) => {
                return Err(ParamError::type_error(
                    "function values have no JSON representation",
                ))
            }
        })
    }
}
