//! REPL command implementation

use anyhow::Result;
use keiyaku_runtime::{ReplCore, ReplResult, VERSION};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Run the interactive REPL.
///
/// If `no_history` is true, disables history persistence.
pub fn run(no_history: bool) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut repl = ReplCore::new();

    let history_path = history_path();
    if !no_history {
        if let Some(ref path) = history_path {
            let _ = rl.load_history(path); // Ignore errors if file doesn't exist
        }
    }

    println!("Keiyaku v{} REPL", VERSION);
    println!("Type statements, or :quit to exit");
    println!("Commands: :quit (or :q), :reset, :help, :vars");
    println!();

    loop {
        // Block bodies keep reading under a continuation prompt until the
        // closing 以上。 arrives.
        let prompt = if repl.pending() { ".. " } else { ">> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if !repl.pending() {
                    match trimmed {
                        ":quit" | ":q" => break,
                        ":reset" => {
                            repl.reset();
                            println!("REPL state reset");
                            continue;
                        }
                        ":help" | ":h" => {
                            print_help();
                            continue;
                        }
                        ":vars" => {
                            print_vars(&repl);
                            continue;
                        }
                        "" => continue,
                        _ => {}
                    }
                }

                let _ = rl.add_history_entry(&line);
                match repl.feed(&line) {
                    ReplResult::NeedMore => {}
                    // Print statements already wrote to stdout.
                    ReplResult::Ran { .. } => {}
                    ReplResult::Error(diag) => {
                        eprintln!("error[{}]: {}", diag.code, diag.message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    if !no_history {
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }
    }
    println!("Goodbye!");
    Ok(())
}

/// History file location (~/.keiyaku_history)
fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".keiyaku_history"))
}

fn print_help() {
    println!("Keiyaku REPL commands:");
    println!("  :quit, :q      Exit the REPL");
    println!("  :reset         Clear all variables and functions");
    println!("  :vars          List defined variables");
    println!("  :help, :h      Show this help");
    println!();
    println!("Statements execute immediately; block constructs run once");
    println!("their closing 以上。 arrives.");
}

fn print_vars(repl: &ReplCore) {
    let vars = repl.variables();
    if vars.is_empty() {
        println!("No variables defined");
        return;
    }
    for (name, value) in vars {
        println!("{} = {}", name, value);
    }
}
