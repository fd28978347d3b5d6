//! Program disassembler
//!
//! Renders a compiled program in a human-readable assembly-like format,
//! used for diagnostics, tests, and `slate disasm` output.

use super::Program;
use std::fmt::Write;

/// Disassemble a program to human-readable text
///
/// # Format
/// ```text
/// === Functions ===
/// add  @ 0000
/// main @ 0009
///
/// === Instructions ===
/// 0000  func add
/// 0001  load 3
/// ...
/// entry:
/// 0017  call 0009
/// ```
pub fn disassemble(program: &Program) -> String {
    let mut output = String::new();

    if !program.functions.is_empty() {
        writeln!(output, "=== Functions ===").unwrap();
        let mut functions: Vec<(&String, &usize)> = program.functions.iter().collect();
        functions.sort_by_key(|&(_, offset)| *offset);
        let width = functions.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, offset) in functions {
            writeln!(output, "{:width$} @ {:04}", name, offset, width = width).unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "=== Instructions ===").unwrap();
    for (index, inst) in program.insts.iter().enumerate() {
        if index == program.entry {
            writeln!(output, "entry:").unwrap();
        }
        writeln!(output, "{:04}  {}", index, inst).unwrap();
    }

    output
}
