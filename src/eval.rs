//! The expression evaluator.
//!
//! Evaluates an expression AST against a context, producing a value.
//! Each node type is routed to a dedicated handler method. Argument
//! evaluation is strictly left to right; the order is observable when
//! callables have side effects.

use crate::context::Context;
use crate::error::{ParamError, ParamResult};
use crate::ops;
use crate::parser::{BinOp, Expr};
use crate::value::Value;

/// Evaluates expression nodes against a context.
pub struct Evaluator<'a> {
    ctx: &'a Context,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over the given context.
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Evaluate an expression node.
    pub fn eval(&self, expr: &Expr) -> ParamResult<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Ident(name) => self.eval_ident(name),
            Expr::Property(base, name) => self.eval_property(base, name),
            Expr::Index(base, index) => self.eval_index(base, index),
            Expr::Call(name, args) => self.eval_call(name, args),
            Expr::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs),
        }
    }

    fn eval_ident(&self, name: &str) -> ParamResult<Value> {
        self.ctx.get_or_err(name).cloned()
    }

    fn eval_property(&self, base: &Expr, name: &str) -> ParamResult<Value> {
        let base = self.eval(base)?;
        match base {
            Value::Object(map) => map.get(name).cloned().ok_or_else(|| {
                ParamError::type_error(format!("object has no property `{}`", name))
            }),
            other => Err(ParamError::type_error(format!(
                "cannot access property `{}` on {}",
                name,
                other.type_name()
            ))),
        }
    }

    fn eval_index(&self, base: &Expr, index: &Expr) -> ParamResult<Value> {
        let base = self.eval(base)?;
        let index = self.eval(index)?;
        match (&base, &index) {
            (Value::Array(items), Value::Int(i)) => {
                let i = usize::try_from(*i).map_err(|_| {
                    ParamError::type_error(format!("negative array index {}", i))
                })?;
                items.get(i).cloned().ok_or_else(|| {
                    ParamError::type_error(format!(
                        "index {} out of bounds for array of length {}",
                        i,
                        items.len()
                    ))
                })
            }
            (Value::Object(map), Value::Str(key)) => {
                map.get(key).cloned().ok_or_else(|| {
                    ParamError::type_error(format!("object has no property `{}`", key))
                })
            }
            (base, index) => Err(ParamError::type_error(format!(
                "cannot index {} with {}",
                base.type_name(),
                index.type_name()
            ))),
        }
    }

    fn eval_call(&self, name: &str, args: &[Expr]) -> ParamResult<Value> {
        let callee = match self.ctx.get_or_err(name)? {
            Value::Func(f) => f.clone(),
            other => {
                return Err(ParamError::type_error(format!(
                    "`{}` is not callable (found {})",
                    name,
                    other.type_name()
                )))
            }
        };
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval(arg)?);
        }
        (*callee)(&evaluated)
    }

    fn eval_binary(&self, op: BinOp, lhs: &Expr, rhs: &Expr) -> ParamResult<Value> {
        let lhs = self.eval(lhs)?;
        let rhs = self.eval(rhs)?;
        match op {
            BinOp::Add => ops::add(lhs, rhs),
            BinOp::Lt => ops::lt(&lhs, &rhs).map(Value::Bool),
            BinOp::Gt => ops::gt(&lhs, &rhs).map(Value::Bool),
            BinOp::Le => ops::le(&lhs, &rhs).map(Value::Bool),
            BinOp::Ge => ops::ge(&lhs, &rhs).map(Value::Bool),
            BinOp::Eq => Ok(Value::Bool(ops::eq(&lhs, &rhs))),
            BinOp::Ne => Ok(Value::Bool(ops::ne(&lhs, &rhs))),
        }
    }
}

/// Parse and evaluate an expression source string against a context.
pub fn evaluate(source: &str, ctx: &Context) -> ParamResult<Value> {
    let expr = crate::parser::parse(source)?;
    Evaluator::new(ctx).eval(&expr)
}
