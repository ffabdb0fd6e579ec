use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Keiyaku programming language interpreter.
///
/// Keiyaku is a line-oriented scripting dialect styled after formal
/// Japanese contract prose: statements are sentences, and loops,
/// conditionals, and function bodies are delimited by sentence-level
/// open/close markers.
///
/// EXAMPLES:
///     keiyaku run main.kei         Run a program
///     keiyaku check main.kei       Validate without running
///     keiyaku repl                 Start interactive REPL
///
/// ENVIRONMENT VARIABLES:
///     KEIYAKU_JSON        Set to '1' for JSON diagnostics by default
///     KEIYAKU_NO_HISTORY  Set to '1' to disable REPL history
///     NO_COLOR            Set to disable colored output
#[derive(Parser)]
#[command(name = "keiyaku")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Keiyaku source file
    ///
    /// Executes the program top to bottom. If a 主文 function is defined
    /// and no top-level statement produced output or bound a variable, it
    /// is invoked automatically.
    ///
    /// EXAMPLES:
    ///     keiyaku run main.kei            Run a program
    ///     keiyaku run main.kei --json     Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Keiyaku source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "KEIYAKU_JSON")]
        json: bool,
    },

    /// Validate a Keiyaku source file without executing it
    ///
    /// Reports unbalanced block markers and lines that match no sentence
    /// template, without evaluating anything.
    ///
    /// EXAMPLES:
    ///     keiyaku check main.kei          Check for errors
    ///     keiyaku check main.kei --json   Output as JSON
    #[command(visible_alias = "c")]
    Check {
        /// Path to the Keiyaku source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "KEIYAKU_JSON")]
        json: bool,
    },

    /// Start an interactive REPL
    ///
    /// Variables and function definitions persist across inputs. Block
    /// constructs are buffered until their closing 以上。 arrives.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all definitions
    ///     :vars          List defined variables
    Repl {
        /// Disable history persistence (for privacy)
        #[arg(long, env = "KEIYAKU_NO_HISTORY")]
        no_history: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, json } => commands::run::run(&file, json),
        Commands::Check { file, json } => commands::check::run(&file, json),
        Commands::Repl { no_history } => commands::repl::run(no_history),
    }
}
