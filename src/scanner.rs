//! Template scanner.
//!
//! Classifies a scalar string as plain text, an interpolation marker
//! `{{ expr }}`, or a raw-expression marker `${ expr }`, and applies
//! the marker's substitution rule: interpolation stringifies the
//! evaluated result, a raw expression keeps its native type.

use lazy_static::lazy_static;
use regex::Regex;

use crate::context::Context;
use crate::error::ParamResult;
use crate::eval::evaluate;
use crate::value::Value;

lazy_static! {
    /// `{{ expr }}` - whole-string match, whitespace tolerant
    static ref INTERPOLATE_RE: Regex = Regex::new(r"(?s)^\s*\{\{(.*)\}\}\s*$").unwrap();
    /// `${ expr }` - whole-string match, whitespace tolerant
    static ref RAW_RE: Regex = Regex::new(r"(?s)^\s*\$\{(.*)\}\s*$").unwrap();
}

/// The classification of a scalar string.
#[derive(Debug, Clone, PartialEq)]
pub enum Scan<'a> {
    /// No marker; the string is literal text
    Plain,
    /// `{{ expr }}` - the evaluated result is stringified
    Interpolate(&'a str),
    /// `${ expr }` - the evaluated result keeps its type
    Raw(&'a str),
}

/// Classify a scalar string, extracting the inner expression text.
///
/// A marker must span the whole string; text around a marker makes the
/// string plain. The capture is greedy so string literals containing
/// braces stay inside the expression, which means a string carrying two
/// markers (`"{{a}} x {{b}}"`) classifies as one interpolation whose
/// inner text fails to parse. That is a SyntaxError by design: silently
/// demoting near-marker text to plain would mask template typos.
pub fn scan(text: &str) -> Scan<'_> {
    if let Some(caps) = INTERPOLATE_RE.captures(text) {
        return Scan::Interpolate(caps.get(1).unwrap().as_str().trim());
    }
    if let Some(caps) = RAW_RE.captures(text) {
        return Scan::Raw(caps.get(1).unwrap().as_str().trim());
    }
    Scan::Plain
}

/// Substitute a scalar string: evaluate its marker, if any, and apply
/// the marker's stringify-or-raw rule. Plain text is returned verbatim.
pub fn substitute(text: &str, ctx: &Context) -> ParamResult<Value> {
    match scan(text) {
        Scan::Plain => Ok(Value::str(text)),
        Scan::Interpolate(expr) => {
            let value = evaluate(expr, ctx)?;
            Ok(Value::Str(value.display_string()?))
        }
        Scan::Raw(expr) => evaluate(expr, ctx),
    }
}
