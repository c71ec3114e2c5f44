//! Context management for the parameterization engine.
//!
//! A [`Context`] is the flat name-to-value environment that expressions
//! are evaluated against. The engine only reads it; the sole mutable
//! state reachable from a walk is whatever a registered callable closes
//! over.

use indexmap::IndexMap;

use crate::error::{ParamError, ParamResult};
use crate::value::Value;

/// A mapping from names to values and callables.
#[derive(Clone, Default)]
pub struct Context {
    bindings: IndexMap<String, Value>,
}

impl Context {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }

    /// Bind a name to a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Bind a name to a callable.
    pub fn func<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> ParamResult<Value> + Send + Sync + 'static,
    {
        self.bindings.insert(name.into(), Value::func(f));
        self
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Look up a name or fail with a reference error.
    pub fn get_or_err(&self, name: &str) -> ParamResult<&Value> {
        self.get(name).ok_or_else(|| ParamError::reference(name))
    }

    /// Check whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
