//! Run command - execute Keiyaku source files

use anyhow::{Context, Result};
use colored::Colorize;
use keiyaku_runtime::{Diagnostic, DiagnosticLevel, Keiyaku};
use std::fs;

/// Execute a source file.
///
/// Print statements write to stdout as the program runs; failures are
/// reported on stderr (or as JSON on stdout with `--json`).
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let runtime = Keiyaku::new();
    match runtime.run_source(&source) {
        Ok(_outputs) => Ok(()),
        Err(diagnostics) => {
            print_diagnostics(&diagnostics, file_path, json)?;
            Err(anyhow::anyhow!("Failed to execute program"))
        }
    }
}

/// Print diagnostics as text (stderr) or JSON (stdout)
pub(crate) fn print_diagnostics(
    diagnostics: &[Diagnostic],
    file_path: &str,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(diagnostics)?);
        return Ok(());
    }
    for diag in diagnostics {
        eprintln!("{}", format_diagnostic(diag, file_path));
    }
    Ok(())
}

/// Format: filename:line: level: message (snippet)
fn format_diagnostic(diag: &Diagnostic, file_path: &str) -> String {
    let level = match diag.level {
        DiagnosticLevel::Error => "error".red().bold(),
        DiagnosticLevel::Warning => "warning".yellow().bold(),
    };

    if diag.snippet.is_empty() {
        format!("{}:{}: {}: {}", file_path, diag.line, level, diag.message)
    } else {
        format!(
            "{}:{}: {}: {} ({})",
            file_path, diag.line, level, diag.message, diag.snippet
        )
    }
}
