//! REPL core logic (UI-agnostic)
//!
//! Buffers input while block markers are unbalanced so multi-line
//! constructs can be typed one sentence at a time, then feeds each
//! complete unit to a persistent interpreter. Variables and function
//! definitions survive across units; errors do not reset state.

use crate::diagnostic::Diagnostic;
use crate::grammar::Grammar;
use crate::interpreter::Interpreter;
use crate::normalize::normalize;
use crate::value::Value;

/// Result of feeding one line to the REPL
#[derive(Debug, Clone, PartialEq)]
pub enum ReplResult {
    /// Inside an unterminated block; keep reading lines
    NeedMore,
    /// A complete unit executed; the outputs it printed (possibly empty)
    Ran { outputs: Vec<Value> },
    /// Execution failed; buffered input was discarded
    Error(Diagnostic),
}

/// REPL state: the pending block buffer plus the persistent interpreter
pub struct ReplCore {
    grammar: Grammar,
    interpreter: Interpreter,
    buffer: Vec<String>,
    depth: usize,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
            interpreter: Interpreter::new(),
            buffer: Vec::new(),
            depth: 0,
        }
    }

    /// Feed one input line.
    ///
    /// Block openers raise the pending depth and the shared close marker
    /// lowers it; the buffered unit executes once the depth returns to
    /// zero.
    pub fn feed(&mut self, line: &str) -> ReplResult {
        let normalized = normalize(line);
        if self.grammar.is_opener(&normalized) {
            self.depth += 1;
        } else if self.grammar.is_close(&normalized) {
            self.depth = self.depth.saturating_sub(1);
        }
        self.buffer.push(line.to_string());
        if self.depth > 0 {
            return ReplResult::NeedMore;
        }

        let source = self.buffer.join("\n");
        self.buffer.clear();
        let already_printed = self.interpreter.outputs().len();
        match self.interpreter.run_program(&source) {
            Ok(()) => ReplResult::Ran {
                outputs: self.interpreter.outputs()[already_printed..].to_vec(),
            },
            Err(error) => ReplResult::Error(Diagnostic::from_runtime_error(&error, &source)),
        }
    }

    /// True while a block is being buffered
    pub fn pending(&self) -> bool {
        self.depth > 0
    }

    /// Sorted snapshot of the defined variables
    pub fn variables(&self) -> Vec<(String, Value)> {
        self.interpreter.variables()
    }

    /// Clear all interpreter state and any buffered input
    pub fn reset(&mut self) {
        self.interpreter = Interpreter::new();
        self.buffer.clear();
        self.depth = 0;
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
