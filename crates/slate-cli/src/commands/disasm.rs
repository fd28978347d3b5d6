//! Disasm command - print compiled bytecode

use anyhow::Result;
use slate_runtime::disassemble;

/// Compile a source file and print its instruction dump
pub fn disasm(file_path: &str, json: bool) -> Result<()> {
    let program = super::compile_file(file_path, json)?;
    print!("{}", disassemble(&program));
    Ok(())
}
