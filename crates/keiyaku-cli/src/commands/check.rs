//! Check command - validate Keiyaku source files without executing

use anyhow::{Context, Result};
use keiyaku_runtime::Keiyaku;
use std::fs;

/// Validate a source file's block structure and sentence templates,
/// reporting every problem found.
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    let runtime = Keiyaku::new();
    let diagnostics = runtime.check_source(&source);

    if diagnostics.is_empty() {
        println!("{}: No errors found", file_path);
        return Ok(());
    }

    super::run::print_diagnostics(&diagnostics, file_path, json)?;
    Err(anyhow::anyhow!("Validation failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_check_valid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "A は 2 とする。").unwrap();
        writeln!(temp_file, "A を出力する。").unwrap();

        let result = run(temp_file.path().to_str().unwrap(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_invalid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "3 回、以下を行う。").unwrap();

        let result = run(temp_file.path().to_str().unwrap(), false);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_missing_file() {
        let result = run("nonexistent.kei", false);
        assert!(result.is_err());
    }
}
