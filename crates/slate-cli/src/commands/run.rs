//! Run command - compile and execute Slate source files

use anyhow::Result;
use slate_runtime::Vm;

/// Compile and run a source file to halt
///
/// Prints the value `main` returned, if any. Runtime errors abort with a
/// nonzero exit code.
pub fn run(file_path: &str, json: bool, fuel: Option<u64>) -> Result<()> {
    let program = super::compile_file(file_path, json)?;

    let mut vm = Vm::new(program);
    let result = match fuel {
        Some(fuel) => vm.run_with_fuel(fuel),
        None => vm.run(),
    };

    if let Err(err) = result {
        eprintln!("runtime error: {}", err);
        return Err(anyhow::anyhow!("Execution of {} failed", file_path));
    }

    // The value returned by main, if the program produced one
    if let Some(value) = vm.operand_stack().last() {
        println!("{}", value);
    }

    Ok(())
}
