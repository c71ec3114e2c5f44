//! Error handling for template parameterization.
//!
//! This module provides a unified error type and result type for every
//! stage of the engine: lexing, parsing, evaluation, and tree walking.
//! Errors are fail-fast: the first error anywhere in a walk aborts the
//! whole `parameterize` call with no partial output.

use std::fmt;

/// The kind of parameterization error.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Malformed expression text: unmatched parentheses, bad literal,
    /// unexpected or trailing tokens
    Syntax(String),
    /// Identifier not found in the context
    Reference(String),
    /// Operation applied to values of the wrong type: non-callable
    /// invoked, projection on a non-container, incompatible operands
    Type(String),
    /// Malformed or unsatisfiable construct object: missing required
    /// key, mixed construct shapes, `$switch` value matching no case
    Construct(String),
    /// Recursion depth exceeded while walking the template
    RecursionLimit { max_depth: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax(msg) => write!(f, "syntax error: {}", msg),
            ErrorKind::Reference(name) => write!(f, "undefined identifier: {}", name),
            ErrorKind::Type(msg) => write!(f, "type error: {}", msg),
            ErrorKind::Construct(msg) => write!(f, "construct error: {}", msg),
            ErrorKind::RecursionLimit { max_depth } => {
                write!(
                    f,
                    "template nesting exceeded maximum depth ({})",
                    max_depth
                )
            }
        }
    }
}

/// An error raised during template parameterization.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamError {
    /// The kind of error
    pub kind: ErrorKind,
}

impl ParamError {
    /// Create a new error from a kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Create a syntax error.
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax(msg.into()))
    }

    /// Create a reference error for an undefined identifier.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference(name.into()))
    }

    /// Create a type error.
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type(msg.into()))
    }

    /// Create a construct error.
    pub fn construct(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Construct(msg.into()))
    }

    /// Create a recursion limit error.
    pub fn recursion_limit(max_depth: usize) -> Self {
        Self::new(ErrorKind::RecursionLimit { max_depth })
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParamError {}

impl From<ErrorKind> for ParamError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for parameterization operations.
pub type ParamResult<T> = Result<T, ParamError>;
