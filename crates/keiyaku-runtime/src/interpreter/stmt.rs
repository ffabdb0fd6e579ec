//! Statement dispatch
//!
//! A canonicalized line is matched against the sentence templates in fixed
//! priority order; the first structural match wins and performs its effect
//! against the live environment.

use crate::span::Span;
use crate::statement::{ArithOp, Statement};
use crate::value::{RuntimeError, Value};

use super::{Flow, Interpreter};

impl Interpreter {
    /// Execute one plain statement line.
    ///
    /// `raw` is the original line text (before canonicalization), used for
    /// syntax-error reporting.
    pub(crate) fn exec_statement(
        &mut self,
        line: &str,
        raw: &str,
        span: Span,
    ) -> Result<Flow, RuntimeError> {
        let Some(statement) = self.grammar.parse_statement(line) else {
            return Err(RuntimeError::SyntaxError {
                line: raw.trim().to_string(),
                span,
            });
        };

        match statement {
            Statement::Alias { expr, name } => {
                let value = self.evaluate(&expr, span)?;
                self.assign(&name, value, span)?;
            }
            Statement::Arith { op, x, y, target } => {
                let xv = self.evaluate(&x, span)?;
                let yv = self.evaluate(&y, span)?;
                let value = apply_arith(op, &xv, &yv, span)?;
                self.assign(&target, value, span)?;
            }
            Statement::Assign { target, expr } => {
                let value = self.evaluate(&expr, span)?;
                self.assign(&target, value, span)?;
            }
            Statement::Print { expr } => {
                let value = self.evaluate(&expr, span)?;
                println!("{value}");
                self.outputs.push(value);
            }
            Statement::Return { expr } => {
                let value = self.evaluate(&expr, span)?;
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Bind a value in the live environment.
    fn assign(&mut self, name: &str, value: Value, span: Span) -> Result<(), RuntimeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RuntimeError::InvalidIdentifier { span });
        }
        self.env.insert(name.to_string(), value);
        Ok(())
    }
}

/// Apply an arithmetic sentence operator.
///
/// Integer pairs stay integral for add/sub/mul (overflow widens to float);
/// division always true-divides to a float, and a zero divisor is an
/// error for integer and float operands alike.
pub(crate) fn apply_arith(
    op: ArithOp,
    x: &Value,
    y: &Value,
    span: Span,
) -> Result<Value, RuntimeError> {
    let (a, b) = match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(RuntimeError::TypeError {
                msg: format!(
                    "arithmetic requires numeric operands, got {} and {}",
                    x.type_name(),
                    y.type_name()
                ),
                span,
            })
        }
    };

    if let (Value::Int(ia), Value::Int(ib)) = (x, y) {
        let exact = match op {
            ArithOp::Add => ia.checked_add(*ib),
            ArithOp::Sub => ia.checked_sub(*ib),
            ArithOp::Mul => ia.checked_mul(*ib),
            ArithOp::Div => None,
        };
        if let Some(n) = exact {
            return Ok(Value::Int(n));
        }
    }

    match op {
        ArithOp::Add => Ok(Value::Float(a + b)),
        ArithOp::Sub => Ok(Value::Float(a - b)),
        ArithOp::Mul => Ok(Value::Float(a * b)),
        ArithOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { span });
            }
            Ok(Value::Float(a / b))
        }
    }
}
