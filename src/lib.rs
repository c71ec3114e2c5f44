//! Parameterize: JSON template parameterization.
//!
//! Turns a nested JSON-like template into a concrete value by resolving
//! embedded expressions and control constructs against a context of
//! names, values, and callables. Scalar strings may carry two marker
//! forms: `{{ expr }}` substitutes the stringified result, `${ expr }`
//! substitutes the result with its native type preserved. Objects may
//! carry construct shapes (`$if`/`$then`/`$else`, `$switch` + cases,
//! `$eval`) that branch instead of copying.
//!
//! # Architecture
//!
//! ```text
//! Template value
//!        │
//!        ▼
//!    ┌───────────────┐
//!    │    Walker     │  (shape dispatch, constructs, document order)
//!    └───────────────┘
//!        │ scalar strings
//!        ▼
//!    ┌───────────────┐
//!    │    Scanner    │  (marker classification)
//!    └───────────────┘
//!        │ expression text
//!        ▼
//!    ┌───────────────┐
//!    │ Lexer/Parser  │  (expression AST)
//!    └───────────────┘
//!        │
//!        ▼
//!    ┌───────────────┐
//!    │   Evaluator   │  (context lookup, calls, operators)
//!    └───────────────┘
//!        │
//!        ▼
//!    Concrete value
//! ```
//!
//! # Example
//!
//! ```
//! use parameterize::{parameterize, Context, Value};
//!
//! let template = Value::from(serde_json::json!({
//!     "id": "{{ clientId }}",
//!     "image": "{{ task.$images(0).name }}",
//! }));
//!
//! let mut ctx = Context::new();
//! ctx.insert("clientId", "123");
//! ctx.insert(
//!     "task",
//!     Value::from(serde_json::json!({"images": [{"name": "ubuntu"}]})),
//! );
//!
//! let out = parameterize(&template, &ctx).unwrap();
//! assert_eq!(
//!     serde_json::Value::try_from(out).unwrap(),
//!     serde_json::json!({"id": "123", "image": "ubuntu"}),
//! );
//! ```
//!
//! The engine is synchronous and stateless: every `parameterize` call
//! walks the template depth-first in document order and builds a fresh
//! output. The only state that survives a call is whatever a context
//! callable closes over, which is exactly why evaluation order is part
//! of the contract.

mod context;
mod error;
mod eval;
mod ops;
mod parser;
mod scanner;
mod token;
mod value;
mod walker;

pub use context::Context;
pub use error::{ErrorKind, ParamError, ParamResult};
pub use eval::{evaluate, Evaluator};
pub use parser::{parse, BinOp, Expr};
pub use scanner::{scan, substitute, Scan};
pub use token::{tokenize, Token};
pub use value::{Callable, Value};
pub use walker::{parameterize, parameterize_with_config, ParamConfig};
