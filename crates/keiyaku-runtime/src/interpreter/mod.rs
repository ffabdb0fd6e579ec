//! The execution engine (line-driven, tree-less)
//!
//! Programs reinterpret source text directly: a block body is extracted as
//! a contiguous line range, re-serialized once, and fed back through
//! [`Interpreter::run`] recursively. The engine owns the single live
//! environment, the function table, and the ordered output record.
//!
//! Scoping discipline: loops and conditionals execute in the enclosing
//! environment, so their assignments are visible after the block. A
//! function call swaps in a fresh table holding only the bound parameters
//! and restores the caller's table on every exit path, including errors.

mod expr;
mod stmt;

use std::collections::HashMap;

use crate::grammar::{BlockOpener, ConditionKind, Grammar};
use crate::normalize::normalize;
use crate::scanner;
use crate::span::Span;
use crate::value::{RuntimeError, Value};

/// Non-local control flow out of a `run` call
///
/// `Return` unwinds nested loops and conditionals unmodified; only a
/// function-call boundary intercepts it. It is deliberately not a
/// [`RuntimeError`] and is never annotated with positions.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
}

/// A user-defined function
///
/// The body stays unparsed until invoked; `body_line` pins its first line
/// to the original file so failures inside a call report absolute
/// positions.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
    pub body_line: usize,
}

/// Interpreter state
pub struct Interpreter {
    pub(super) grammar: Grammar,
    /// The single live environment
    pub(super) env: HashMap<String, Value>,
    /// Defined functions; a later definition overwrites an earlier one
    pub(super) functions: HashMap<String, FunctionDef>,
    /// Ordered record of printed values
    pub(super) outputs: Vec<Value>,
    /// Set when a top-level statement produced an observable effect
    pub(super) toplevel_effect: bool,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
            env: HashMap::new(),
            functions: HashMap::new(),
            outputs: Vec::new(),
            toplevel_effect: false,
        }
    }

    /// Execute a whole program at top level.
    ///
    /// A return reaching the top level stops execution; there is no
    /// enclosing call to receive the value, so it is discarded.
    pub fn run_program(&mut self, source: &str) -> Result<(), RuntimeError> {
        self.run(source, 1, true)?;
        Ok(())
    }

    /// Execute a program or an extracted block body.
    ///
    /// `base_line` is the absolute 1-based line number of the first line of
    /// `source`, so every span stays file-absolute across recursion.
    pub(crate) fn run(
        &mut self,
        source: &str,
        base_line: usize,
        top_level: bool,
    ) -> Result<Flow, RuntimeError> {
        let lines: Vec<&str> = source.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            let raw = lines[i];
            let line = normalize(raw);
            if line.is_empty() || Grammar::is_comment(&line) {
                i += 1;
                continue;
            }

            let span = Span::new(base_line + i);
            if let Some(opener) = self.grammar.opener(&line) {
                match opener {
                    BlockOpener::Function { name, params } => {
                        i = self.define_function(&lines, i, base_line, name, params)?;
                    }
                    BlockOpener::Loop { count } => {
                        match self.run_loop(&lines, i, base_line, &count)? {
                            (Flow::Return(value), _) => return Ok(Flow::Return(value)),
                            (Flow::Normal, resume) => i = resume,
                        }
                    }
                    BlockOpener::Conditional { expr, kind } => {
                        match self.run_conditional(&lines, i, base_line, &expr, kind)? {
                            (Flow::Return(value), _) => return Ok(Flow::Return(value)),
                            (Flow::Normal, resume) => i = resume,
                        }
                    }
                    // An else without a preceding conditional reads as an
                    // unrecognized statement.
                    BlockOpener::Else => {
                        return Err(RuntimeError::SyntaxError {
                            line: raw.trim().to_string(),
                            span,
                        });
                    }
                }
                continue;
            }

            match self.exec_statement(&line, raw, span).map_err(|e| e.annotate(span))? {
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Normal => {
                    if top_level {
                        self.toplevel_effect = true;
                    }
                }
            }
            i += 1;
        }
        Ok(Flow::Normal)
    }

    /// Scan a definition's body and register it, overwriting any previous
    /// function of the same name. Returns the index to resume at.
    fn define_function(
        &mut self,
        lines: &[&str],
        open_idx: usize,
        base_line: usize,
        name: String,
        params: Vec<String>,
    ) -> Result<usize, RuntimeError> {
        let construct = format!("function 「{name}」");
        let block = scanner::scan_block(&self.grammar, lines, open_idx, &construct, base_line)?;
        let body = lines[block.start..block.end].join("\n");
        self.functions.insert(
            name.clone(),
            FunctionDef {
                name,
                params,
                body,
                body_line: base_line + block.start,
            },
        );
        Ok(block.resume)
    }

    /// Execute a counted loop. The body is re-serialized once and run in
    /// sequence; each iteration sees the previous one's mutations.
    fn run_loop(
        &mut self,
        lines: &[&str],
        open_idx: usize,
        base_line: usize,
        count_expr: &str,
    ) -> Result<(Flow, usize), RuntimeError> {
        let block = scanner::scan_block(&self.grammar, lines, open_idx, "loop", base_line)?;
        let span = Span::new(base_line + open_idx);

        let count = match self.evaluate(count_expr, span)? {
            Value::Int(n) => n,
            // Fractional counts truncate toward zero.
            Value::Float(f) => f.trunc() as i64,
            other => {
                return Err(RuntimeError::TypeError {
                    msg: format!("repeat count must be numeric, got {}", other.type_name()),
                    span,
                })
            }
        };
        if count < 0 {
            return Err(RuntimeError::NegativeRepeatCount { count, span });
        }

        let body = lines[block.start..block.end].join("\n");
        for _ in 0..count {
            if let Flow::Return(value) = self.run(&body, base_line + block.start, false)? {
                return Ok((Flow::Return(value), block.resume));
            }
        }
        Ok((Flow::Normal, block.resume))
    }

    /// Execute a conditional. Both branches are scanned before the
    /// condition is evaluated; a missing or empty selected branch is a
    /// no-op.
    fn run_conditional(
        &mut self,
        lines: &[&str],
        open_idx: usize,
        base_line: usize,
        cond_expr: &str,
        kind: ConditionKind,
    ) -> Result<(Flow, usize), RuntimeError> {
        let blocks = scanner::scan_conditional(&self.grammar, lines, open_idx, base_line)?;
        let span = Span::new(base_line + open_idx);

        let cond = self.evaluate(cond_expr, span)?;
        let zero = cond.is_zero().ok_or_else(|| RuntimeError::TypeError {
            msg: format!("condition must be numeric, got {}", cond.type_name()),
            span,
        })?;
        let take_then = match kind {
            ConditionKind::IfZero => zero,
            ConditionKind::IfNonzero => !zero,
        };

        let branch = if take_then {
            Some(blocks.then_block)
        } else {
            blocks.else_block
        };
        if let Some(block) = branch {
            if !block.is_empty() {
                let body = lines[block.start..block.end].join("\n");
                if let Flow::Return(value) = self.run(&body, base_line + block.start, false)? {
                    return Ok((Flow::Return(value), blocks.resume));
                }
            }
        }
        Ok((Flow::Normal, blocks.resume))
    }

    /// Invoke a defined function.
    ///
    /// The caller's environment is swapped out for a fresh table holding
    /// only the bound parameters and restored before any result or error
    /// propagates, so a failure inside the body never corrupts the
    /// caller's scope. `None` means the body completed without returning
    /// a value.
    pub fn call_function(
        &mut self,
        name: &str,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Option<Value>, RuntimeError> {
        let func = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: name.to_string(),
                span,
            })?;
        if func.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.to_string(),
                expected: func.params.len(),
                actual: args.len(),
                span,
            });
        }

        let call_env: HashMap<String, Value> =
            func.params.iter().cloned().zip(args).collect();
        let saved = std::mem::replace(&mut self.env, call_env);
        let result = self.run(&func.body, func.body_line, false);
        self.env = saved;

        match result? {
            Flow::Return(value) => Ok(Some(value)),
            Flow::Normal => Ok(None),
        }
    }

    /// Ordered record of every printed value
    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }

    /// True once a top-level statement produced an observable effect
    pub fn has_toplevel_effect(&self) -> bool {
        self.toplevel_effect
    }

    /// True when `name` is a defined function
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Look up a defined function
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Look up a variable in the live environment
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    /// Bind a variable directly (REPL and test convenience)
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.env.insert(name.into(), value);
    }

    /// Sorted snapshot of the live environment
    pub fn variables(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<(String, Value)> = self
            .env
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
