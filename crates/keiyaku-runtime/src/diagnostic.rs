//! Diagnostic surface for errors
//!
//! Failures flow through one serializable Diagnostic type so the CLI can
//! render them uniformly as text or JSON.

use crate::span::Span;
use crate::value::RuntimeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Fatal error that aborts the run
    Error,
    /// Warning that does not abort the run
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A reported problem: severity, stable code, message, position, and the
/// offending source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Stable code (e.g. "KY0003")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// 1-based source line number (0 when unknown)
    pub line: usize,
    /// The offending source line text
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub snippet: String,
}

impl Diagnostic {
    /// Create an error diagnostic with a stable code
    pub fn error_with_code(code: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            line: span.line,
            snippet: String::new(),
        }
    }

    /// Create an error diagnostic with the generic code
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code("KY9999", message, span)
    }

    /// Attach the offending source line text
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Map a runtime failure to a diagnostic, attaching the offending line
    /// from `source` as the snippet.
    pub fn from_runtime_error(error: &RuntimeError, source: &str) -> Self {
        let code = match error {
            RuntimeError::TypeError { .. } => "KY0001",
            RuntimeError::UnresolvedReference { .. } => "KY0002",
            RuntimeError::UnknownFunction { .. } => "KY0003",
            RuntimeError::ArityMismatch { .. } => "KY0004",
            RuntimeError::InvalidIdentifier { .. } => "KY0005",
            RuntimeError::NegativeRepeatCount { .. } => "KY0006",
            RuntimeError::DivisionByZero { .. } => "KY0007",
            RuntimeError::UnterminatedBlock { .. } => "KY0008",
            RuntimeError::SyntaxError { .. } => "KY0009",
        };
        let span = error.span();
        let diagnostic = Self::error_with_code(code, error.to_string(), span);
        match source_line(source, span) {
            Some(snippet) => diagnostic.with_snippet(snippet),
            None => diagnostic,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.snippet.is_empty() {
            write!(f, "line {}: {}: {}", self.line, self.level, self.message)
        } else {
            write!(
                f,
                "line {}: {}: {} ({})",
                self.line, self.level, self.message, self.snippet
            )
        }
    }
}

/// The trimmed text of the span's line, if the span carries a position.
fn source_line(source: &str, span: Span) -> Option<String> {
    if span.is_dummy() {
        return None;
    }
    source
        .lines()
        .nth(span.line - 1)
        .map(|line| line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_runtime_error_attaches_snippet() {
        let source = "A は 2 とする。\nこれは文ではない";
        let error = RuntimeError::SyntaxError {
            line: "これは文ではない".to_string(),
            span: Span::new(2),
        };
        let diag = Diagnostic::from_runtime_error(&error, source);
        assert_eq!(diag.code, "KY0009");
        assert_eq!(diag.line, 2);
        assert_eq!(diag.snippet, "これは文ではない");
        assert_eq!(diag.level, DiagnosticLevel::Error);
    }

    #[test]
    fn test_dummy_span_leaves_snippet_empty() {
        let error = RuntimeError::DivisionByZero { span: Span::dummy() };
        let diag = Diagnostic::from_runtime_error(&error, "X を 0 で除した数を Y とする。");
        assert_eq!(diag.line, 0);
        assert!(diag.snippet.is_empty());
    }

    #[test]
    fn test_serializes_to_json() {
        let diag = Diagnostic::error_with_code("KY0001", "type error: oops", Span::new(3));
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"KY0001\""));
        assert!(json.contains("\"line\":3"));
        // Empty snippets are omitted from the wire format.
        assert!(!json.contains("snippet"));
    }

    #[test]
    fn test_display_format() {
        let diag = Diagnostic::error("boom", Span::new(4)).with_snippet("壊れた行");
        assert_eq!(diag.to_string(), "line 4: error: boom (壊れた行)");
    }
}
