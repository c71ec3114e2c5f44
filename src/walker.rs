//! Template tree walker and construct dispatcher.
//!
//! Recursively transforms a template value against a context. Objects
//! carrying a reserved construct shape (`$if`/`$then`/`$else`,
//! `$switch` plus case keys, `$eval`) trigger engine-driven branching;
//! every other object and array is rebuilt by recursing into its
//! children in insertion/index order. Scalar strings go through the
//! scanner. Traversal order is a contract: callables may be stateful,
//! so evaluation is strictly depth-first in document order.

use indexmap::IndexMap;

use crate::context::Context;
use crate::error::{ParamError, ParamResult};
use crate::scanner::substitute;
use crate::value::Value;

/// Configuration for a parameterization run.
#[derive(Debug, Clone)]
pub struct ParamConfig {
    /// Maximum template nesting depth before the walk fails, instead
    /// of overflowing the host stack on pathological inputs.
    pub max_depth: usize,
}

impl Default for ParamConfig {
    fn default() -> Self {
        // Conservative limit; construct branches re-enter the walker,
        // so depth tracks template nesting, not expression size.
        Self { max_depth: 64 }
    }
}

/// Resolve every expression and construct in `template` against `ctx`,
/// returning a newly built value. Fails fast on the first error with
/// no partial output.
pub fn parameterize(template: &Value, ctx: &Context) -> ParamResult<Value> {
    parameterize_with_config(template, ctx, &ParamConfig::default())
}

/// [`parameterize`] with an explicit configuration.
pub fn parameterize_with_config(
    template: &Value,
    ctx: &Context,
    config: &ParamConfig,
) -> ParamResult<Value> {
    Walker { ctx, config }.walk(template, 0)
}

struct Walker<'a> {
    ctx: &'a Context,
    config: &'a ParamConfig,
}

impl<'a> Walker<'a> {
    fn walk(&self, value: &Value, depth: usize) -> ParamResult<Value> {
        if depth > self.config.max_depth {
            return Err(ParamError::recursion_limit(self.config.max_depth));
        }
        match value {
            Value::Object(map) => self.walk_object(map, depth),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.walk(item, depth + 1)?);
                }
                Ok(Value::Array(out))
            }
            Value::Str(text) => substitute(text, self.ctx),
            // Numbers, booleans, null, and functions pass through
            other => Ok(other.clone()),
        }
    }

    fn walk_object(&self, map: &IndexMap<String, Value>, depth: usize) -> ParamResult<Value> {
        let marker_count = ["$if", "$switch", "$eval"]
            .iter()
            .filter(|key| map.contains_key(**key))
            .count();
        if marker_count > 1 {
            return Err(ParamError::construct(
                "object mixes more than one construct shape",
            ));
        }

        if map.contains_key("$if") {
            return self.walk_if(map, depth);
        }
        if map.contains_key("$switch") {
            return self.walk_switch(map, depth);
        }
        if map.contains_key("$eval") {
            return self.walk_eval(map);
        }

        let mut out = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            out.insert(key.clone(), self.walk(value, depth + 1)?);
        }
        Ok(Value::Object(out))
    }

    /// `{$if, $then, $else}`: the condition text must evaluate to a
    /// boolean; the selected branch re-enters the walker.
    fn walk_if(&self, map: &IndexMap<String, Value>, depth: usize) -> ParamResult<Value> {
        for key in map.keys() {
            if key != "$if" && key != "$then" && key != "$else" {
                return Err(ParamError::construct(format!(
                    "unexpected key `{}` in $if construct",
                    key
                )));
            }
        }
        for key in ["$then", "$else"] {
            if !map.contains_key(key) {
                return Err(ParamError::construct(format!(
                    "$if construct is missing its {} branch",
                    key
                )));
            }
        }
        let condition = self.construct_text(map, "$if")?;
        let branch = match substitute(condition, self.ctx)? {
            Value::Bool(true) => "$then",
            Value::Bool(false) => "$else",
            other => {
                return Err(ParamError::construct(format!(
                    "$if condition must evaluate to a boolean, got {}",
                    other.type_name()
                )))
            }
        };
        self.walk(&map[branch], depth + 1)
    }

    /// `{$switch, <cases>}`: the switch text selects the case key to
    /// resolve; no match is an error, there is no implicit default.
    fn walk_switch(&self, map: &IndexMap<String, Value>, depth: usize) -> ParamResult<Value> {
        if map.len() < 2 {
            return Err(ParamError::construct("$switch construct has no case keys"));
        }
        let selector = self.construct_text(map, "$switch")?;
        let case = match substitute(selector, self.ctx)? {
            Value::Str(s) => s,
            other => {
                return Err(ParamError::construct(format!(
                    "$switch selector must evaluate to a string, got {}",
                    other.type_name()
                )))
            }
        };
        let value = map.get(&case).ok_or_else(|| {
            ParamError::construct(format!("$switch value `{}` matches no case key", case))
        })?;
        self.walk(value, depth + 1)
    }

    /// `{$eval}`: the value is a scalar template string; the scanned
    /// result replaces the whole object.
    fn walk_eval(&self, map: &IndexMap<String, Value>) -> ParamResult<Value> {
        if map.len() != 1 {
            return Err(ParamError::construct(
                "$eval construct must have exactly one key",
            ));
        }
        let text = self.construct_text(map, "$eval")?;
        substitute(text, self.ctx)
    }

    /// Fetch a construct key's value, which must be a string.
    fn construct_text<'m>(
        &self,
        map: &'m IndexMap<String, Value>,
        key: &str,
    ) -> ParamResult<&'m str> {
        match map.get(key) {
            Some(Value::Str(s)) => Ok(s),
            Some(other) => Err(ParamError::construct(format!(
                "{} value must be a string, got {}",
                key,
                other.type_name()
            ))),
            None => Err(ParamError::construct(format!("missing {} key", key))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_scalars_pass_through() {
        let ctx = Context::new();
        assert_eq!(
            parameterize(&Value::Int(1), &ctx).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            parameterize(&Value::Bool(true), &ctx).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(parameterize(&Value::Null, &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_mixed_construct_shapes_fail() {
        let ctx = Context::new();
        let template = object(vec![
            ("$if", Value::str("${ 1 < 2 }")),
            ("$switch", Value::str("x")),
        ]);
        let err = parameterize(&template, &ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Construct(_)));
    }

    #[test]
    fn test_if_with_ordinary_key_fails() {
        let ctx = Context::new();
        let template = object(vec![
            ("$if", Value::str("${ 1 < 2 }")),
            ("$then", Value::str("a")),
            ("$else", Value::str("b")),
            ("extra", Value::Int(1)),
        ]);
        let err = parameterize(&template, &ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Construct(_)));
    }

    #[test]
    fn test_if_requires_boolean_condition() {
        let ctx = Context::new();
        let template = object(vec![
            ("$if", Value::str("not a marker")),
            ("$then", Value::str("a")),
            ("$else", Value::str("b")),
        ]);
        let err = parameterize(&template, &ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Construct(_)));
    }

    #[test]
    fn test_eval_with_extra_keys_fails() {
        let ctx = Context::new();
        let template = object(vec![
            ("$eval", Value::str("1")),
            ("other", Value::Int(1)),
        ]);
        let err = parameterize(&template, &ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Construct(_)));
    }

    #[test]
    fn test_switch_without_cases_fails() {
        let ctx = Context::new();
        let template = object(vec![("$switch", Value::str("x"))]);
        let err = parameterize(&template, &ctx).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Construct(_)));
    }

    #[test]
    fn test_recursion_limit() {
        // Build a template nested beyond the configured limit
        let mut template = Value::str("leaf");
        for _ in 0..10 {
            template = object(vec![("inner", template)]);
        }
        let ctx = Context::new();
        let config = ParamConfig { max_depth: 5 };
        let err = parameterize_with_config(&template, &ctx, &config).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::RecursionLimit { max_depth: 5 }));

        // Generous limit succeeds
        assert!(parameterize(&template, &ctx).is_ok());
    }

    #[test]
    fn test_object_key_order_preserved() {
        let ctx = Context::new();
        let template = object(vec![
            ("z", Value::Int(1)),
            ("a", Value::Int(2)),
            ("m", Value::Int(3)),
        ]);
        let out = parameterize(&template, &ctx).unwrap();
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
