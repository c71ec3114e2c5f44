//! Operations on values.
//!
//! This module implements the `+` coercion rule and the comparison
//! operators for the expression evaluator, kept isolated from parsing
//! so they can be unit-tested on their own.

use crate::error::{ParamError, ParamResult};
use crate::value::Value;

/// Add two values.
///
/// If either operand is a string, the result is their concatenation
/// with the other operand converted to its textual form. Otherwise both
/// operands must be numeric.
pub fn add(lhs: Value, rhs: Value) -> ParamResult<Value> {
    use Value::*;
    match (lhs, rhs) {
        (Str(a), Str(b)) => Ok(Str(a + &b)),
        (Str(a), b) => Ok(Str(a + &b.display_string()?)),
        (a, Str(b)) => Ok(Str(a.display_string()? + &b)),

        (Int(a), Int(b)) => a
            .checked_add(b)
            .map(Int)
            .ok_or_else(|| ParamError::type_error("integer overflow in `+`")),
        (Int(a), Float(b)) => Ok(Float(a as f64 + b)),
        (Float(a), Int(b)) => Ok(Float(a + b as f64)),
        (Float(a), Float(b)) => Ok(Float(a + b)),

        (a, b) => Err(ParamError::type_error(format!(
            "cannot add {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

/// Less than comparison.
pub fn lt(lhs: &Value, rhs: &Value) -> ParamResult<bool> {
    compare(lhs, rhs, "<", |ord| ord == std::cmp::Ordering::Less)
}

/// Less than or equal comparison.
pub fn le(lhs: &Value, rhs: &Value) -> ParamResult<bool> {
    compare(lhs, rhs, "<=", |ord| ord != std::cmp::Ordering::Greater)
}

/// Greater than comparison.
pub fn gt(lhs: &Value, rhs: &Value) -> ParamResult<bool> {
    compare(lhs, rhs, ">", |ord| ord == std::cmp::Ordering::Greater)
}

/// Greater than or equal comparison.
pub fn ge(lhs: &Value, rhs: &Value) -> ParamResult<bool> {
    compare(lhs, rhs, ">=", |ord| ord != std::cmp::Ordering::Less)
}

/// Equality comparison. Defined for every value pair; numerically equal
/// Int/Float compare equal.
pub fn eq(lhs: &Value, rhs: &Value) -> bool {
    lhs == rhs
}

/// Inequality comparison.
pub fn ne(lhs: &Value, rhs: &Value) -> bool {
    lhs != rhs
}

/// Order two values. Numbers order numerically (Int/Float mixed),
/// strings lexicographically; anything else is a type error.
fn compare(
    lhs: &Value,
    rhs: &Value,
    symbol: &str,
    test: impl Fn(std::cmp::Ordering) -> bool,
) -> ParamResult<bool> {
    let ordering = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        (a, b) if a.is_number() && b.is_number() => {
            let (a, b) = (a.as_f64().unwrap(), b.as_f64().unwrap());
            a.partial_cmp(&b).ok_or_else(|| {
                ParamError::type_error(format!("cannot order {} {} {}", a, symbol, b))
            })?
        }
        (a, b) => {
            return Err(ParamError::type_error(format!(
                "cannot compare {} {} {}",
                a.type_name(),
                symbol,
                b.type_name()
            )))
        }
    };
    Ok(test(ordering))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_numbers() {
        assert_eq!(add(Value::Int(2), Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(
            add(Value::Int(1), Value::Float(0.5)).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_add_strings() {
        assert_eq!(
            add(Value::str("case"), Value::str("1")).unwrap(),
            Value::str("case1")
        );
    }

    #[test]
    fn test_add_coerces_to_string_when_either_side_is_string() {
        assert_eq!(
            add(Value::str("case"), Value::Int(2)).unwrap(),
            Value::str("case2")
        );
        assert_eq!(
            add(Value::Int(2), Value::str("nd")).unwrap(),
            Value::str("2nd")
        );
    }

    #[test]
    fn test_add_incompatible_types() {
        assert!(add(Value::Bool(true), Value::Int(1)).is_err());
        assert!(add(Value::Null, Value::Null).is_err());
        assert!(add(Value::Array(vec![]), Value::str("x")).is_err());
    }

    #[test]
    fn test_comparisons() {
        assert!(lt(&Value::Int(1), &Value::Int(2)).unwrap());
        assert!(!lt(&Value::Int(2), &Value::Int(1)).unwrap());
        assert!(le(&Value::Int(2), &Value::Int(2)).unwrap());
        assert!(gt(&Value::Float(2.5), &Value::Int(2)).unwrap());
        assert!(ge(&Value::Int(2), &Value::Int(2)).unwrap());
        assert!(lt(&Value::str("a"), &Value::str("b")).unwrap());
    }

    #[test]
    fn test_comparison_type_errors() {
        assert!(lt(&Value::Bool(true), &Value::Bool(false)).is_err());
        assert!(gt(&Value::str("a"), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_equality() {
        assert!(eq(&Value::Int(1), &Value::Float(1.0)));
        assert!(ne(&Value::str("1"), &Value::Int(1)));
        assert!(eq(&Value::Null, &Value::Null));
    }
}
