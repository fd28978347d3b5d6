use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Slate language compiler and virtual machine.
///
/// Compiles Slate source files to bytecode and executes them on the
/// built-in VM.
///
/// EXAMPLES:
///     slate run main.sl             Compile and run a program
///     slate run main.sl --fuel 100000   Abort after a step budget
///     slate disasm main.sl          Print the compiled bytecode
#[derive(Parser)]
#[command(name = "slate")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run a Slate source file
    ///
    /// Runs the program to halt and prints the value returned by `main`,
    /// if any. Diagnostics go to stderr.
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Slate source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
        /// Abort execution after this many instructions (watchdog)
        #[arg(long)]
        fuel: Option<u64>,
    },

    /// Compile a Slate source file and print its bytecode
    ///
    /// Shows the function table and one line per instruction, with all
    /// jump targets resolved.
    #[command(visible_alias = "d")]
    Disasm {
        /// Path to the Slate source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, json, fuel } => commands::run::run(&file, json, fuel),
        Commands::Disasm { file, json } => commands::disasm::disasm(&file, json),
    }
}
