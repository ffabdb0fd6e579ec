//! Sentence patterns of the contract dialect
//!
//! Every statement is a single sentence; block structure comes from opener
//! sentences and the one shared close marker 「以上。」. Patterns match
//! against canonicalized text (see [`crate::normalize`]), so full-width
//! digits and parentheses have already folded to their ASCII forms by the
//! time a line reaches this module.

use crate::statement::{ArithOp, Statement};
use regex::Regex;

/// Which way a conditional tests its expression against zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    /// `もし <expr> が 0 なら(ば)、以下を行う。` — true on zero
    IfZero,
    /// `もし <expr> が 0 でなければ、以下を行う。` — true on nonzero
    IfNonzero,
}

/// A block-opening sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpener {
    /// `<name>(<params>) を定義する。` (optional 関数 prefix / 関数として infix)
    Function { name: String, params: Vec<String> },
    /// `<count> 回、以下を行う。`
    Loop { count: String },
    /// Either conditional form; `expr` is the tested token
    Conditional { expr: String, kind: ConditionKind },
    /// `そうでなければ(、以下を行う。)`
    Else,
}

impl BlockOpener {
    /// Construct name used in unterminated-block reports
    pub fn describe(&self) -> String {
        match self {
            BlockOpener::Function { name, .. } => format!("function 「{name}」"),
            BlockOpener::Loop { .. } => "loop".to_string(),
            BlockOpener::Conditional { .. } => "conditional".to_string(),
            BlockOpener::Else => "else branch".to_string(),
        }
    }
}

/// Compiled sentence patterns
pub struct Grammar {
    re_alias: Regex,
    re_assign: Regex,
    re_print: Regex,
    re_add: Regex,
    re_sub1: Regex,
    re_sub2: Regex,
    re_mul: Regex,
    re_div1: Regex,
    re_div2: Regex,
    re_loop: Regex,
    re_close: Regex,
    re_return: Regex,
    re_if_zero: Regex,
    re_if_nonzero: Regex,
    re_else: Regex,
    re_func_def: Regex,
    re_call: Regex,
    re_int: Regex,
    re_float: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid sentence pattern")
}

impl Grammar {
    /// Compile the full pattern set.
    pub fn new() -> Self {
        Self {
            // The alias form may trail another sentence, so it is matched
            // unanchored at the start but anchored at the end of the line.
            re_alias: compile(
                r#"(?P<lhs>.+?)[（(]以下[「"](?P<name>[^」"]+)[」"]という。?[)）][。.]?$"#,
            ),
            re_assign: compile(r"^(?P<var>[^は]+)は (?P<expr>.+) とする。?$"),
            re_print: compile(r"^(?P<expr>.+)を出力する。?$"),
            re_add: compile(r"^(?P<x>.+)に (?P<y>.+) を加えた数を (?P<z>.+) とする。?$"),
            re_sub1: compile(r"^(?P<x>.+)から (?P<y>.+) を減じた数を (?P<z>.+) とする。?$"),
            re_sub2: compile(r"^(?P<x>.+)から (?P<y>.+) を差し引いた数を (?P<z>.+) とする。?$"),
            re_mul: compile(r"^(?P<x>.+)と (?P<y>.+) の積を (?P<z>.+) とする。?$"),
            re_div1: compile(r"^(?P<x>.+)を (?P<y>.+) で除した数を (?P<z>.+) とする。?$"),
            re_div2: compile(r"^(?P<x>.+)を (?P<y>.+) で割った数を (?P<z>.+) とする。?$"),
            re_loop: compile(r"^(?P<count>.+) 回、以下を行う。?$"),
            re_close: compile(r"^以上。?$"),
            re_return: compile(r"^(?P<expr>.+)を返す。?$"),
            re_if_zero: compile(r"^もし (?P<expr>.+) が 0 なら(?:ば)?、以下を行う。?$"),
            re_if_nonzero: compile(r"^もし (?P<expr>.+) が 0 でなければ、以下を行う。?$"),
            re_else: compile(r"^そうでなければ(?:、以下を行う。?)?$"),
            re_func_def: compile(
                r"^(?:関数 )?(?P<name>[^\s()]+)\((?P<params>[^)]*)\) を(?:関数として)?定義する。?$",
            ),
            re_call: compile(r"^(?P<name>[^\s()]+)\((?P<args>.*)\)$"),
            re_int: compile(r"^[+-]?[0-9]+$"),
            re_float: compile(r"^[+-]?(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+)$"),
        }
    }

    /// Classify a canonicalized line as a block opener, if it is one.
    pub fn opener(&self, line: &str) -> Option<BlockOpener> {
        if let Some(caps) = self.re_func_def.captures(line) {
            let params_raw = caps["params"].trim();
            let params = if params_raw.is_empty() {
                Vec::new()
            } else {
                params_raw
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            };
            return Some(BlockOpener::Function {
                name: caps["name"].to_string(),
                params,
            });
        }
        if let Some(caps) = self.re_loop.captures(line) {
            return Some(BlockOpener::Loop {
                count: caps["count"].trim().to_string(),
            });
        }
        if let Some(caps) = self.re_if_zero.captures(line) {
            return Some(BlockOpener::Conditional {
                expr: caps["expr"].trim().to_string(),
                kind: ConditionKind::IfZero,
            });
        }
        if let Some(caps) = self.re_if_nonzero.captures(line) {
            return Some(BlockOpener::Conditional {
                expr: caps["expr"].trim().to_string(),
                kind: ConditionKind::IfNonzero,
            });
        }
        if self.re_else.is_match(line) {
            return Some(BlockOpener::Else);
        }
        None
    }

    /// Cheap opener test for the block scanner's depth counting.
    pub fn is_opener(&self, line: &str) -> bool {
        self.re_func_def.is_match(line)
            || self.re_loop.is_match(line)
            || self.re_if_zero.is_match(line)
            || self.re_if_nonzero.is_match(line)
            || self.re_else.is_match(line)
    }

    /// True for the shared close marker 「以上。」
    pub fn is_close(&self, line: &str) -> bool {
        self.re_close.is_match(line)
    }

    /// True for comment lines (※ or 注 prefixes)
    pub fn is_comment(line: &str) -> bool {
        line.starts_with('※') || line.starts_with("(注)") || line.starts_with("（注）")
    }

    /// Parse a plain statement, trying the sentence templates in fixed
    /// priority order: alias, the arithmetic forms, assignment, print,
    /// return. The templates are structurally disjoint; the order matters
    /// only where a longer form embeds a shorter one.
    pub fn parse_statement(&self, line: &str) -> Option<Statement> {
        if let Some(caps) = self.re_alias.captures(line) {
            return Some(Statement::Alias {
                expr: caps["lhs"].trim().to_string(),
                name: caps["name"].trim().to_string(),
            });
        }
        let arithmetic: [(&Regex, ArithOp); 6] = [
            (&self.re_add, ArithOp::Add),
            (&self.re_sub1, ArithOp::Sub),
            (&self.re_sub2, ArithOp::Sub),
            (&self.re_mul, ArithOp::Mul),
            (&self.re_div1, ArithOp::Div),
            (&self.re_div2, ArithOp::Div),
        ];
        for (re, op) in arithmetic {
            if let Some(caps) = re.captures(line) {
                return Some(Statement::Arith {
                    op,
                    x: caps["x"].trim().to_string(),
                    y: caps["y"].trim().to_string(),
                    target: caps["z"].trim().to_string(),
                });
            }
        }
        if let Some(caps) = self.re_assign.captures(line) {
            return Some(Statement::Assign {
                target: caps["var"].trim().to_string(),
                expr: caps["expr"].trim().to_string(),
            });
        }
        if let Some(caps) = self.re_print.captures(line) {
            return Some(Statement::Print {
                expr: caps["expr"].trim().to_string(),
            });
        }
        if let Some(caps) = self.re_return.captures(line) {
            return Some(Statement::Return {
                expr: caps["expr"].trim().to_string(),
            });
        }
        None
    }

    /// Split a call-shaped token into its name and raw argument text.
    pub fn call_shape<'t>(&self, token: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = self.re_call.captures(token)?;
        Some((caps.name("name")?.as_str(), caps.name("args")?.as_str()))
    }

    /// True for an integer literal token
    pub fn is_int_literal(&self, token: &str) -> bool {
        self.re_int.is_match(token)
    }

    /// True for a floating literal token
    pub fn is_float_literal(&self, token: &str) -> bool {
        self.re_float.is_match(token)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grammar() -> Grammar {
        Grammar::new()
    }

    #[test]
    fn test_assignment_template() {
        let statement = grammar().parse_statement("A は 2 とする。");
        assert_eq!(
            statement,
            Some(Statement::Assign {
                target: "A".to_string(),
                expr: "2".to_string(),
            })
        );
    }

    #[test]
    fn test_alias_template_wins_over_assignment() {
        let statement = grammar().parse_statement("100（以下「上限」という。）");
        assert_eq!(
            statement,
            Some(Statement::Alias {
                expr: "100".to_string(),
                name: "上限".to_string(),
            })
        );
    }

    #[test]
    fn test_arithmetic_templates() {
        let g = grammar();
        let added = g.parse_statement("A に B を加えた数を C とする。");
        assert_eq!(
            added,
            Some(Statement::Arith {
                op: ArithOp::Add,
                x: "A".to_string(),
                y: "B".to_string(),
                target: "C".to_string(),
            })
        );
        // The two subtraction verbs are synonyms.
        for line in [
            "A から B を減じた数を C とする。",
            "A から B を差し引いた数を C とする。",
        ] {
            match g.parse_statement(line) {
                Some(Statement::Arith { op, .. }) => assert_eq!(op, ArithOp::Sub),
                other => panic!("expected subtraction, got {:?}", other),
            }
        }
        for line in [
            "A を B で除した数を C とする。",
            "A を B で割った数を C とする。",
        ] {
            match g.parse_statement(line) {
                Some(Statement::Arith { op, .. }) => assert_eq!(op, ArithOp::Div),
                other => panic!("expected division, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_print_and_return_templates() {
        let g = grammar();
        assert_eq!(
            g.parse_statement("C を出力する。"),
            Some(Statement::Print {
                expr: "C".to_string()
            })
        );
        assert_eq!(
            g.parse_statement("n を返す。"),
            Some(Statement::Return {
                expr: "n".to_string()
            })
        );
    }

    #[test]
    fn test_unrecognized_line() {
        assert_eq!(grammar().parse_statement("これは文ではない"), None);
    }

    #[test]
    fn test_function_definition_opener() {
        let opener = grammar().opener("倍(n) を定義する。");
        assert_eq!(
            opener,
            Some(BlockOpener::Function {
                name: "倍".to_string(),
                params: vec!["n".to_string()],
            })
        );
    }

    #[test]
    fn test_function_definition_with_optional_words() {
        let opener = grammar().opener("関数 加算(a, b) を関数として定義する。");
        assert_eq!(
            opener,
            Some(BlockOpener::Function {
                name: "加算".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
            })
        );
    }

    #[test]
    fn test_zero_parameter_definition() {
        let opener = grammar().opener("主文() を定義する。");
        assert_eq!(
            opener,
            Some(BlockOpener::Function {
                name: "主文".to_string(),
                params: Vec::new(),
            })
        );
    }

    #[test]
    fn test_loop_opener() {
        assert_eq!(
            grammar().opener("3 回、以下を行う。"),
            Some(BlockOpener::Loop {
                count: "3".to_string()
            })
        );
    }

    #[test]
    fn test_conditional_openers_are_distinct() {
        let g = grammar();
        assert_eq!(
            g.opener("もし X が 0 なら、以下を行う。"),
            Some(BlockOpener::Conditional {
                expr: "X".to_string(),
                kind: ConditionKind::IfZero,
            })
        );
        assert_eq!(
            g.opener("もし X が 0 ならば、以下を行う。"),
            Some(BlockOpener::Conditional {
                expr: "X".to_string(),
                kind: ConditionKind::IfZero,
            })
        );
        assert_eq!(
            g.opener("もし X が 0 でなければ、以下を行う。"),
            Some(BlockOpener::Conditional {
                expr: "X".to_string(),
                kind: ConditionKind::IfNonzero,
            })
        );
    }

    #[test]
    fn test_else_opener_short_and_long() {
        let g = grammar();
        assert_eq!(g.opener("そうでなければ"), Some(BlockOpener::Else));
        assert_eq!(
            g.opener("そうでなければ、以下を行う。"),
            Some(BlockOpener::Else)
        );
    }

    #[test]
    fn test_close_marker() {
        let g = grammar();
        assert!(g.is_close("以上。"));
        assert!(g.is_close("以上"));
        assert!(!g.is_close("以上です。"));
    }

    #[test]
    fn test_comment_markers() {
        assert!(Grammar::is_comment("※ これは注記"));
        assert!(Grammar::is_comment("(注) これも注記"));
        assert!(!Grammar::is_comment("A は 2 とする。"));
    }

    #[test]
    fn test_call_shape() {
        let g = grammar();
        assert_eq!(g.call_shape("倍(4)"), Some(("倍", "4")));
        assert_eq!(g.call_shape("f(g(1), 2)"), Some(("f", "g(1), 2")));
        assert_eq!(g.call_shape("f()"), Some(("f", "")));
        assert_eq!(g.call_shape("42"), None);
    }

    #[test]
    fn test_literal_shapes() {
        let g = grammar();
        assert!(g.is_int_literal("42"));
        assert!(g.is_int_literal("-7"));
        assert!(!g.is_int_literal("4.2"));
        assert!(g.is_float_literal("4.2"));
        assert!(g.is_float_literal("-.5"));
        assert!(g.is_float_literal("3."));
        assert!(!g.is_float_literal("abc"));
    }
}
