//! Embedding API
//!
//! [`Keiyaku`] wraps the interpreter behind a small façade: byte-order-mark
//! stripping, whole-program execution with the entry-point convention, and
//! `RuntimeError` → `Diagnostic` conversion for host applications.

use crate::checker::Checker;
use crate::diagnostic::Diagnostic;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::Value;
use std::cell::RefCell;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// The reserved entry-point function name ("main clause")
pub const ENTRY_FUNCTION: &str = "主文";

/// Keiyaku runtime instance
///
/// # Examples
///
/// ```
/// use keiyaku_runtime::{Keiyaku, Value};
///
/// let runtime = Keiyaku::new();
/// let outputs = runtime
///     .run_source("A は 2 とする。\nA を出力する。")
///     .unwrap();
/// assert_eq!(outputs, vec![Value::Int(2)]);
/// ```
pub struct Keiyaku {
    /// Interpreter state (using interior mutability)
    interpreter: RefCell<Interpreter>,
}

impl Keiyaku {
    /// Create a new runtime instance
    pub fn new() -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::new()),
        }
    }

    /// Execute a whole program at top level.
    ///
    /// Applies the entry-point convention afterwards: if 主文 is defined
    /// and no top-level statement produced an observable effect, it is
    /// invoked with no arguments and its result discarded.
    ///
    /// Returns the ordered output record.
    pub fn run_source(&self, source: &str) -> RuntimeResult<Vec<Value>> {
        let source = strip_bom(source);
        let mut interpreter = self.interpreter.borrow_mut();

        interpreter
            .run_program(source)
            .map_err(|e| vec![Diagnostic::from_runtime_error(&e, source)])?;

        if !interpreter.has_toplevel_effect() && interpreter.has_function(ENTRY_FUNCTION) {
            interpreter
                .call_function(ENTRY_FUNCTION, Vec::new(), Span::dummy())
                .map_err(|e| vec![Diagnostic::from_runtime_error(&e, source)])?;
        }

        Ok(interpreter.outputs().to_vec())
    }

    /// Execute a program read from a file.
    pub fn run_file(&self, path: &str) -> RuntimeResult<Vec<Value>> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![Diagnostic::error(
                format!("failed to read {path}: {e}"),
                Span::dummy(),
            )]
        })?;
        self.run_source(&source)
    }

    /// Validate a program without executing it.
    pub fn check_source(&self, source: &str) -> Vec<Diagnostic> {
        Checker::new().check(strip_bom(source))
    }
}

impl Default for Keiyaku {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop a leading UTF-8 byte-order mark.
fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}
