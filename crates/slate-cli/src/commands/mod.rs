//! CLI subcommand implementations

pub mod disasm;
pub mod run;

use anyhow::{Context, Result};
use slate_runtime::{Diagnostic, Program};
use std::fs;

/// Read and compile a source file, printing any diagnostic to stderr
pub(crate) fn compile_file(file_path: &str, json: bool) -> Result<Program> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    slate_runtime::compile(&source).map_err(|diagnostic| {
        report(&diagnostic, json);
        anyhow::anyhow!("Failed to compile {}", file_path)
    })
}

/// Print a diagnostic to stderr in the requested format
fn report(diagnostic: &Diagnostic, json: bool) {
    if json {
        match diagnostic.to_json_string() {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", diagnostic.to_human_string()),
        }
    } else {
        eprint!("{}", diagnostic.to_human_string());
    }
}
