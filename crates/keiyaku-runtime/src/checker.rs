//! Static validation without execution
//!
//! Walks a program the same way the engine does — openers scanned to their
//! close markers, everything else matched against the statement templates —
//! but evaluates nothing, so it can report every problem in one pass
//! instead of stopping at the first. Expression tokens are not validated;
//! whether a token resolves depends on the environment at run time.

use crate::diagnostic::Diagnostic;
use crate::grammar::{BlockOpener, Grammar};
use crate::normalize::normalize;
use crate::scanner;
use crate::span::Span;
use crate::value::RuntimeError;

/// Structure and template validator
pub struct Checker {
    grammar: Grammar,
}

impl Checker {
    /// Create a new checker
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
        }
    }

    /// Validate a whole program; returns every diagnostic found.
    pub fn check(&self, source: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let lines: Vec<&str> = source.lines().collect();
        self.check_lines(&lines, 1, &mut diagnostics);

        // Line numbers are file-absolute, so snippets can be filled in one
        // pass at the end.
        for diag in &mut diagnostics {
            if diag.snippet.is_empty() && diag.line >= 1 {
                if let Some(line) = lines.get(diag.line - 1) {
                    diag.snippet = line.trim().to_string();
                }
            }
        }
        diagnostics
    }

    fn check_lines(&self, lines: &[&str], base_line: usize, diagnostics: &mut Vec<Diagnostic>) {
        let mut i = 0;
        while i < lines.len() {
            let line = normalize(lines[i]);
            if line.is_empty() || Grammar::is_comment(&line) {
                i += 1;
                continue;
            }

            match self.grammar.opener(&line) {
                Some(opener @ (BlockOpener::Function { .. } | BlockOpener::Loop { .. })) => {
                    match scanner::scan_block(
                        &self.grammar,
                        lines,
                        i,
                        &opener.describe(),
                        base_line,
                    ) {
                        Ok(block) => {
                            self.check_lines(
                                &lines[block.start..block.end],
                                base_line + block.start,
                                diagnostics,
                            );
                            i = block.resume;
                        }
                        Err(error) => {
                            diagnostics.push(Diagnostic::from_runtime_error(&error, ""));
                            return;
                        }
                    }
                }
                Some(BlockOpener::Conditional { .. }) => {
                    match scanner::scan_conditional(&self.grammar, lines, i, base_line) {
                        Ok(blocks) => {
                            self.check_lines(
                                &lines[blocks.then_block.start..blocks.then_block.end],
                                base_line + blocks.then_block.start,
                                diagnostics,
                            );
                            if let Some(else_block) = blocks.else_block {
                                self.check_lines(
                                    &lines[else_block.start..else_block.end],
                                    base_line + else_block.start,
                                    diagnostics,
                                );
                            }
                            i = blocks.resume;
                        }
                        Err(error) => {
                            diagnostics.push(Diagnostic::from_runtime_error(&error, ""));
                            return;
                        }
                    }
                }
                Some(BlockOpener::Else) => {
                    let error = RuntimeError::SyntaxError {
                        line: lines[i].trim().to_string(),
                        span: Span::new(base_line + i),
                    };
                    diagnostics.push(Diagnostic::from_runtime_error(&error, ""));
                    i += 1;
                }
                None => {
                    if self.grammar.parse_statement(&line).is_none() {
                        let error = RuntimeError::SyntaxError {
                            line: lines[i].trim().to_string(),
                            span: Span::new(base_line + i),
                        };
                        diagnostics.push(Diagnostic::from_runtime_error(&error, ""));
                    }
                    i += 1;
                }
            }
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_program_has_no_diagnostics() {
        let source = "A は 2 とする。\nB は 3 とする。\nA に B を加えた数を C とする。\nC を出力する。";
        assert_eq!(Checker::new().check(source), Vec::new());
    }

    #[test]
    fn test_reports_every_bad_statement() {
        let source = "A は 2 とする。\nこれは文ではない\nこれも文ではない";
        let diagnostics = Checker::new().check(source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_unterminated_block_reports_opener() {
        let source = "3 回、以下を行う。\nA は 1 とする。";
        let diagnostics = Checker::new().check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "KY0008");
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[0].snippet, "3 回、以下を行う。");
    }

    #[test]
    fn test_checks_inside_nested_bodies() {
        let source = "倍(n) を定義する。\nもし n が 0 なら、以下を行う。\n意味のない行\n以上。\nn を返す。\n以上。";
        let diagnostics = Checker::new().check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(diagnostics[0].snippet, "意味のない行");
    }

    #[test]
    fn test_stray_else_is_reported() {
        let diagnostics = Checker::new().check("そうでなければ、以下を行う。");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "KY0009");
    }
}
