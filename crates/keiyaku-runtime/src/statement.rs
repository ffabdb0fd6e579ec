//! Enumerated statement grammar
//!
//! A plain (non-block) line parses into exactly one of these tagged forms.
//! Operand fields hold the raw expression tokens; evaluation happens later,
//! against the live environment.

/// Arithmetic sentence operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// <x>に <y> を加えた数
    Add,
    /// <x>から <y> を減じた数 ／ 差し引いた数
    Sub,
    /// <x>と <y> の積
    Mul,
    /// <x>を <y> で除した数 ／ 割った数
    Div,
}

/// A parsed plain statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `<expr>（以下「<name>」という。）` — evaluate once, name the result
    Alias { expr: String, name: String },
    /// One of the four arithmetic sentence forms; `target` receives the result
    Arith {
        op: ArithOp,
        x: String,
        y: String,
        target: String,
    },
    /// `<var>は <expr> とする。`
    Assign { target: String, expr: String },
    /// `<expr>を出力する。`
    Print { expr: String },
    /// `<expr>を返す。`
    Return { expr: String },
}
