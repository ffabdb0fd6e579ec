//! Runtime value representation and error taxonomy
//!
//! Values are immediate: integers, floats, and strings. The dialect has no
//! boolean type; conditionals test numeric equality with zero.

use crate::span::Span;
use std::fmt;
use thiserror::Error;

/// A runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Immutable string
    Str(String),
}

impl Value {
    /// Human-readable type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// True for the numeric variants
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view, if this value is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    /// Numeric zero test; `None` for strings
    pub fn is_zero(&self) -> Option<bool> {
        match self {
            Value::Int(n) => Some(*n == 0),
            Value::Float(n) => Some(*n == 0.0),
            Value::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // Integral floats keep a trailing ".0" so float results stay
            // visibly distinct from integers (6 を 3 で除した数 prints 2.0).
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Runtime failure
///
/// Every variant carries a [`Span`]; the engine fills a dummy span with the
/// 1-based line number of the statement being executed, exactly once, so a
/// failure inside a function body reports the body line rather than the
/// call site. The early-return control flow is not an error and never
/// appears here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Token is neither a literal, a bound identifier, nor a known call
    #[error("unresolved reference: {token}")]
    UnresolvedReference { token: String, span: Span },
    /// Call to an undefined function
    #[error("unknown function: {name}")]
    UnknownFunction { name: String, span: Span },
    /// Call argument count does not match the parameter list
    #[error("function 「{name}」 expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
        span: Span,
    },
    /// Non-numeric value where a number is required
    #[error("type error: {msg}")]
    TypeError { msg: String, span: Span },
    /// Assignment target empty after trimming
    #[error("cannot assign to an empty identifier")]
    InvalidIdentifier { span: Span },
    /// Repeat count below zero
    #[error("repeat count cannot be negative: {count}")]
    NegativeRepeatCount { count: i64, span: Span },
    /// Zero divisor
    #[error("division by zero")]
    DivisionByZero { span: Span },
    /// A block opener with no matching close marker
    #[error("no closing 「以上。」 for {construct}")]
    UnterminatedBlock { construct: String, span: Span },
    /// Line matches no sentence template
    #[error("unrecognized statement: {line}")]
    SyntaxError { line: String, span: Span },
}

impl RuntimeError {
    /// The position attached to this error
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UnresolvedReference { span, .. }
            | RuntimeError::UnknownFunction { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::TypeError { span, .. }
            | RuntimeError::InvalidIdentifier { span }
            | RuntimeError::NegativeRepeatCount { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::UnterminatedBlock { span, .. }
            | RuntimeError::SyntaxError { span, .. } => *span,
        }
    }

    /// Attach a position unless one has already been recorded.
    ///
    /// Inner annotations win: once an error carries a line, outer layers
    /// leave it untouched.
    pub fn annotate(mut self, new_span: Span) -> Self {
        let span = match &mut self {
            RuntimeError::UnresolvedReference { span, .. }
            | RuntimeError::UnknownFunction { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::TypeError { span, .. }
            | RuntimeError::InvalidIdentifier { span }
            | RuntimeError::NegativeRepeatCount { span, .. }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::UnterminatedBlock { span, .. }
            | RuntimeError::SyntaxError { span, .. } => span,
        };
        if span.is_dummy() {
            *span = new_span;
        }
        self
    }
}
