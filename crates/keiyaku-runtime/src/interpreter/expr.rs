//! Expression evaluation
//!
//! A token resolves, in order, as: a call to a known function, a quoted
//! string, an integer literal, a floating literal, or a bound identifier.
//! A call-shaped token naming an unknown function falls through to the
//! remaining interpretations rather than failing outright.

use crate::span::Span;
use crate::value::{RuntimeError, Value};

use super::Interpreter;

impl Interpreter {
    /// Resolve a textual token into a value.
    pub(crate) fn evaluate(&mut self, token: &str, span: Span) -> Result<Value, RuntimeError> {
        let token = token.trim();

        if let Some((name, args_raw)) = self.grammar.call_shape(token) {
            if self.functions.contains_key(name) {
                let mut args = Vec::new();
                let args_raw = args_raw.trim();
                if !args_raw.is_empty() {
                    for arg in split_args(args_raw) {
                        args.push(self.evaluate(&arg, span)?);
                    }
                }
                return match self.call_function(name, args, span)? {
                    Some(value) => Ok(value),
                    // The dialect has no void value, so a returnless call
                    // cannot be used where a value is required.
                    None => Err(RuntimeError::TypeError {
                        msg: format!("function 「{name}」 did not return a value"),
                        span,
                    }),
                };
            }
        }

        if let Some(inner) = quoted_literal(token) {
            return Ok(Value::Str(inner.to_string()));
        }
        if self.grammar.is_int_literal(token) {
            if let Ok(n) = token.parse::<i64>() {
                return Ok(Value::Int(n));
            }
        }
        if self.grammar.is_float_literal(token) {
            if let Ok(n) = token.parse::<f64>() {
                return Ok(Value::Float(n));
            }
        }
        if let Some(value) = self.env.get(token) {
            return Ok(value.clone());
        }

        Err(RuntimeError::UnresolvedReference {
            token: token.to_string(),
            span,
        })
    }
}

/// The inner text of a fully quoted token, for either quote style.
/// No escape processing: the inner text is taken verbatim.
fn quoted_literal(token: &str) -> Option<&str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Some(&token[1..token.len() - 1]);
    }
    token.strip_prefix('「')?.strip_suffix('」')
}

/// Split a call's argument text on top-level commas only.
///
/// Commas inside either quote style or inside nested parentheses are not
/// split points. ASCII double quotes toggle; the bracket quotes 「」 open
/// and close without nesting.
pub(crate) fn split_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut buf = String::new();
    let mut paren_depth = 0usize;
    let mut in_dq = false;
    let mut in_jq = false;

    for ch in s.chars() {
        match ch {
            '"' if !in_jq => {
                in_dq = !in_dq;
                buf.push(ch);
            }
            '「' if !in_dq => {
                in_jq = true;
                buf.push(ch);
            }
            '」' if in_jq => {
                in_jq = false;
                buf.push(ch);
            }
            '(' if !in_dq && !in_jq => {
                paren_depth += 1;
                buf.push(ch);
            }
            ')' if !in_dq && !in_jq && paren_depth > 0 => {
                paren_depth -= 1;
                buf.push(ch);
            }
            ',' if !in_dq && !in_jq && paren_depth == 0 => {
                args.push(buf.trim().to_string());
                buf.clear();
            }
            _ => buf.push(ch),
        }
    }
    if !buf.is_empty() {
        args.push(buf.trim().to_string());
    }
    args
}
