//! Block extraction
//!
//! A construct body runs from the line after its opener to the line whose
//! close marker brings the depth counter back to zero. All four opener
//! kinds — function definition, loop header, either conditional form, and
//! the else marker — share the close marker 「以上。」, so one counter
//! counts them uniformly; counting any subset would mis-pair sibling and
//! nested constructs. Nested close markers stay inside the extracted
//! range, which keeps every body internally balanced.

use crate::grammar::{BlockOpener, Grammar};
use crate::normalize::normalize;
use crate::span::Span;
use crate::value::RuntimeError;

/// A body extracted from the surrounding program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// First body line (index into the scanned slice)
    pub start: usize,
    /// One past the last body line (the close marker's index)
    pub end: usize,
    /// Index of the line after the close marker
    pub resume: usize,
}

impl BlockSpan {
    /// True when the body contains no lines
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// THEN body plus optional ELSE body for a conditional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalSpans {
    pub then_block: BlockSpan,
    pub else_block: Option<BlockSpan>,
    /// Index of the line after the whole construct
    pub resume: usize,
}

/// Scan forward from the opener at `open_idx` to its matching close marker.
///
/// `base_line` is the absolute 1-based line number of `lines[0]`, used to
/// report the opener's position when the block never closes.
pub fn scan_block(
    grammar: &Grammar,
    lines: &[&str],
    open_idx: usize,
    construct: &str,
    base_line: usize,
) -> Result<BlockSpan, RuntimeError> {
    let mut depth = 1usize;
    let mut j = open_idx + 1;
    while j < lines.len() {
        let candidate = normalize(lines[j]);
        if grammar.is_opener(&candidate) {
            depth += 1;
        } else if grammar.is_close(&candidate) {
            depth -= 1;
            if depth == 0 {
                return Ok(BlockSpan {
                    start: open_idx + 1,
                    end: j,
                    resume: j + 1,
                });
            }
        }
        j += 1;
    }
    Err(RuntimeError::UnterminatedBlock {
        construct: construct.to_string(),
        span: Span::new(base_line + open_idx),
    })
}

/// Scan a conditional: the THEN body, then — past any blank lines — an
/// optional ELSE marker whose body is scanned the same way.
pub fn scan_conditional(
    grammar: &Grammar,
    lines: &[&str],
    open_idx: usize,
    base_line: usize,
) -> Result<ConditionalSpans, RuntimeError> {
    let then_block = scan_block(grammar, lines, open_idx, "conditional", base_line)?;

    let mut k = then_block.resume;
    while k < lines.len() && normalize(lines[k]).is_empty() {
        k += 1;
    }
    if k < lines.len() {
        if let Some(BlockOpener::Else) = grammar.opener(&normalize(lines[k])) {
            let else_block = scan_block(grammar, lines, k, "else branch", base_line)?;
            return Ok(ConditionalSpans {
                then_block,
                else_block: Some(else_block),
                resume: else_block.resume,
            });
        }
    }
    Ok(ConditionalSpans {
        then_block,
        else_block: None,
        resume: then_block.resume,
    })
}
